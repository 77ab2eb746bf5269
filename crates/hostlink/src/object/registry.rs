// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch table from catalog (type, attribute) to object kind.

use super::kind::{ObjectKind, ResolvedObject};
use super::name::{Library, QualifiedName};
use crate::logging;
use crate::session::{Session, SessionError};
use std::collections::HashMap;
use std::fmt;

/// Builds the resolved object for a catalog match. May query the session
/// for details the catalog does not carry.
pub type Constructor =
    Box<dyn Fn(&dyn Session, QualifiedName) -> Result<ResolvedObject, SessionError> + Send + Sync>;

/// (type, attribute) -> constructor table.
///
/// An entry registered with no attribute matches any attribute of its
/// type; exact entries take precedence.
#[derive(Default)]
pub struct KindRegistry {
    entries: HashMap<(String, Option<String>), Constructor>,
}

impl KindRegistry {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table covering the standard host object types.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("FILE", Some("PF"), Box::new(physical_file));
        registry.register_kind("FILE", Some("LF"), ObjectKind::LogicalFile);
        registry.register_kind("FILE", Some("PRTF"), ObjectKind::PrinterFile);
        registry.register_kind("FILE", Some("SAVF"), ObjectKind::SaveFile);
        registry.register_kind("PGM", None, ObjectKind::Program);
        registry.register_kind("MODULE", None, ObjectKind::Module);
        registry.register_kind("SRVPGM", None, ObjectKind::ServiceProgram);
        registry.register_kind("JRN", None, ObjectKind::Journal);
        registry.register("LIB", None, Box::new(library));
        registry
    }

    /// Add or replace the constructor for `(object_type, attribute)`.
    pub fn register(&mut self, object_type: &str, attribute: Option<&str>, constructor: Constructor) {
        let key = (object_type.to_string(), attribute.map(str::to_string));
        if self.entries.insert(key, constructor).is_some() {
            log::debug!(
                target: logging::TARGET,
                "[registry] replaced constructor for {} {}",
                object_type,
                attribute.unwrap_or("*")
            );
        }
    }

    /// Map `(object_type, attribute)` straight to `kind`.
    pub fn register_kind(&mut self, object_type: &str, attribute: Option<&str>, kind: ObjectKind) {
        self.register(
            object_type,
            attribute,
            Box::new(move |_: &dyn Session, reference: QualifiedName| {
                Ok(ResolvedObject::new(reference, kind))
            }),
        );
    }

    /// Exact match first, then the type's wildcard entry.
    pub fn lookup(&self, object_type: &str, attribute: &str) -> Option<&Constructor> {
        let exact = (!attribute.is_empty())
            .then(|| {
                self.entries
                    .get(&(object_type.to_string(), Some(attribute.to_string())))
            })
            .flatten();
        exact.or_else(|| self.entries.get(&(object_type.to_string(), None)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("KindRegistry").field("entries", &keys).finish()
    }
}

fn physical_file(
    session: &dyn Session,
    reference: QualifiedName,
) -> Result<ResolvedObject, SessionError> {
    let kind = if session.is_source_file(&reference)? {
        ObjectKind::SourcePhysicalFile
    } else {
        ObjectKind::PhysicalFile
    };
    Ok(ResolvedObject::new(reference, kind))
}

/// Libraries always live in QSYS, whatever library the catalog reported.
fn library(_: &dyn Session, reference: QualifiedName) -> Result<ResolvedObject, SessionError> {
    let reference = QualifiedName::with_library(
        reference.name(),
        Library::Named(Library::SYSTEM.to_string()),
    )
    .map_err(|e| SessionError::Other(e.to_string()))?;
    Ok(ResolvedObject::new(reference, ObjectKind::Library))
}
