// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object kinds and typed handles.

use super::name::QualifiedName;
use std::fmt;

/// Catalog type used to filter a query (`*FILE`, `*PGM`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectType {
    All,
    File,
    Program,
    Module,
    ServiceProgram,
    Journal,
    Library,
    /// Any other host type, given without the leading `*`.
    Other(String),
}

impl ObjectType {
    /// Catalog type string as reported on a match (`FILE`, `PGM`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::All => "ALL",
            ObjectType::File => "FILE",
            ObjectType::Program => "PGM",
            ObjectType::Module => "MODULE",
            ObjectType::ServiceProgram => "SRVPGM",
            ObjectType::Journal => "JRN",
            ObjectType::Library => "LIB",
            ObjectType::Other(other) => other,
        }
    }

    /// Filter form with the leading `*`.
    pub fn filter(&self) -> String {
        format!("*{}", self.as_str())
    }

    pub fn parse(value: &str) -> Self {
        match value.trim_start_matches('*') {
            "ALL" => ObjectType::All,
            "FILE" => ObjectType::File,
            "PGM" => ObjectType::Program,
            "MODULE" => ObjectType::Module,
            "SRVPGM" => ObjectType::ServiceProgram,
            "JRN" => ObjectType::Journal,
            "LIB" => ObjectType::Library,
            other => ObjectType::Other(other.to_string()),
        }
    }

    /// True when a catalog entry of type `reported` passes this filter.
    pub fn matches(&self, reported: &str) -> bool {
        matches!(self, ObjectType::All) || self.as_str() == reported
    }
}

/// Concrete representation chosen for a resolved object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    PhysicalFile,
    SourcePhysicalFile,
    LogicalFile,
    PrinterFile,
    SaveFile,
    Program,
    Module,
    ServiceProgram,
    Journal,
    Library,
}

impl ObjectKind {
    pub fn object_type(self) -> ObjectType {
        match self {
            ObjectKind::PhysicalFile
            | ObjectKind::SourcePhysicalFile
            | ObjectKind::LogicalFile
            | ObjectKind::PrinterFile
            | ObjectKind::SaveFile => ObjectType::File,
            ObjectKind::Program => ObjectType::Program,
            ObjectKind::Module => ObjectType::Module,
            ObjectKind::ServiceProgram => ObjectType::ServiceProgram,
            ObjectKind::Journal => ObjectType::Journal,
            ObjectKind::Library => ObjectType::Library,
        }
    }

    pub fn is_file(self) -> bool {
        self.object_type() == ObjectType::File
    }

    /// Physical, source physical and logical files carry records and members.
    pub fn is_database_file(self) -> bool {
        matches!(
            self,
            ObjectKind::PhysicalFile | ObjectKind::SourcePhysicalFile | ObjectKind::LogicalFile
        )
    }

    /// Files described by record formats: database files and DDS device
    /// files such as printer files. Save files have none.
    pub fn has_record_formats(self) -> bool {
        self.is_file() && self != ObjectKind::SaveFile
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObjectKind::PhysicalFile => "physical file",
            ObjectKind::SourcePhysicalFile => "source physical file",
            ObjectKind::LogicalFile => "logical file",
            ObjectKind::PrinterFile => "printer file",
            ObjectKind::SaveFile => "save file",
            ObjectKind::Program => "program",
            ObjectKind::Module => "module",
            ObjectKind::ServiceProgram => "service program",
            ObjectKind::Journal => "journal",
            ObjectKind::Library => "library",
        };
        f.write_str(label)
    }
}

/// An object the resolver found and classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedObject {
    reference: QualifiedName,
    kind: ObjectKind,
}

impl ResolvedObject {
    /// Build a handle without consulting the catalog.
    ///
    /// Used by [`KindRegistry`](super::KindRegistry) constructors. The
    /// `api` wrappers trust `kind`, so a handle built by hand with the
    /// wrong kind passes their checks.
    pub fn new(reference: QualifiedName, kind: ObjectKind) -> Self {
        Self { reference, kind }
    }

    pub fn reference(&self) -> &QualifiedName {
        &self.reference
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }
}

impl fmt::Display for ResolvedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reference, self.kind)
    }
}

/// Outcome of a resolution: a typed object or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ObjectHandle {
    Resolved(ResolvedObject),
    #[default]
    Null,
}

impl ObjectHandle {
    pub fn is_null(&self) -> bool {
        matches!(self, ObjectHandle::Null)
    }

    pub fn kind(&self) -> Option<ObjectKind> {
        self.as_resolved().map(ResolvedObject::kind)
    }

    pub fn reference(&self) -> Option<&QualifiedName> {
        self.as_resolved().map(ResolvedObject::reference)
    }

    pub fn as_resolved(&self) -> Option<&ResolvedObject> {
        match self {
            ObjectHandle::Resolved(obj) => Some(obj),
            ObjectHandle::Null => None,
        }
    }

    pub fn into_resolved(self) -> Option<ResolvedObject> {
        match self {
            ObjectHandle::Resolved(obj) => Some(obj),
            ObjectHandle::Null => None,
        }
    }
}

impl From<ResolvedObject> for ObjectHandle {
    fn from(obj: ResolvedObject) -> Self {
        ObjectHandle::Resolved(obj)
    }
}
