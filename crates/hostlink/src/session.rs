// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Session collaborator boundary.
//!
//! The transport that physically reaches the host (sign-on, sockets, data
//! stream protocols) lives outside this crate. It plugs in by implementing
//! [`Session`] and [`ScratchHost`]:
//!
//! ```ignore
//! impl Session for HostConnection {
//!     fn call_program(&self, program: &ProgramPath, params: &mut ParameterBlock)
//!         -> Result<CallReply, SessionError> {
//!         // Send input slots, copy output slots back with Parameter::fill...
//!     }
//!     // ...
//! }
//! ```

use crate::invoke::ParameterBlock;
use crate::object::{ObjectType, QualifiedName};
use std::fmt;
use thiserror::Error;

/// Failures reported by the transport layer.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("authority failure: {0}")]
    Security(String),

    #[error("request interrupted")]
    Interrupted,

    #[error("object does not exist: {0}")]
    ObjectNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// A diagnostic message emitted by the host while running a program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemMessage {
    /// Message identifier, e.g. `CPF9801`.
    pub id: String,
    pub text: String,
}

impl SystemMessage {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for SystemMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.text)
    }
}

/// Result of running a program on the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallReply {
    /// False when the host refused or aborted the call.
    pub executed: bool,
    /// Messages in the order the host emitted them.
    pub messages: Vec<SystemMessage>,
}

impl CallReply {
    pub fn ok() -> Self {
        Self {
            executed: true,
            messages: Vec::new(),
        }
    }

    pub fn failed(messages: Vec<SystemMessage>) -> Self {
        Self {
            executed: false,
            messages,
        }
    }

    pub fn with_message(mut self, message: SystemMessage) -> Self {
        self.messages.push(message);
        self
    }
}

/// Program object to call, always addressed through the library file system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramPath(QualifiedName);

impl ProgramPath {
    /// Program shipped in `QSYS`. Only used with the fixed API names.
    pub(crate) fn system(name: &'static str) -> Self {
        Self(QualifiedName::system(name))
    }

    pub fn new(program: QualifiedName) -> Self {
        Self(program)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn qualified(&self) -> &QualifiedName {
        &self.0
    }

    /// `/QSYS.LIB/NAME.PGM` or `/QSYS.LIB/LIB.LIB/NAME.PGM`.
    pub fn ifs_path(&self) -> String {
        self.0.ifs_path("PGM")
    }
}

impl fmt::Display for ProgramPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ifs_path())
    }
}

/// Catalog attribute a query can ask for beyond name/library/type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogAttribute {
    ExtendedAttribute,
    Text,
}

/// Filter for a catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub object: QualifiedName,
    pub object_type: ObjectType,
    pub attributes: Vec<CatalogAttribute>,
}

/// One catalog match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    /// Concrete library the object was found in.
    pub library: String,
    /// Type without the leading `*`, e.g. `FILE`.
    pub object_type: String,
    /// Extended attribute, e.g. `PF`; blank when not requested or not set.
    pub attribute: String,
}

impl CatalogEntry {
    pub fn new(name: &str, library: &str, object_type: &str, attribute: &str) -> Self {
        Self {
            name: name.to_string(),
            library: library.to_string(),
            object_type: object_type.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

/// An open catalog query. Must be closed by the caller.
pub trait CatalogQuery {
    fn load(&mut self) -> Result<(), SessionError>;

    /// Number of matches after `load`.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&mut self, offset: usize, count: usize) -> Result<Vec<CatalogEntry>, SessionError>;

    fn close(&mut self) -> Result<(), SessionError>;
}

/// Program calls, catalog queries and file system probes.
pub trait Session {
    /// Run `program`. Input slots are sent as-is; the transport copies each
    /// output slot back with [`crate::invoke::Parameter::fill`].
    fn call_program(
        &self,
        program: &ProgramPath,
        params: &mut ParameterBlock,
    ) -> Result<CallReply, SessionError>;

    fn query_catalog(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Box<dyn CatalogQuery + '_>, SessionError>;

    /// True when `file` is a source physical file.
    fn is_source_file(&self, file: &QualifiedName) -> Result<bool, SessionError>;

    /// Identifier embedded in scratch object names (job number, worker id).
    fn namespace_tag(&self) -> Option<String> {
        None
    }
}

/// Remote operations on temporary user space objects.
pub trait ScratchHost {
    /// Returns false when the host refused to create the object.
    fn create_scratch(&self, spec: &crate::scratch::ScratchSpec) -> Result<bool, SessionError>;

    /// Returns false when there was nothing to delete.
    fn delete_scratch(&self, name: &QualifiedName) -> Result<bool, SessionError>;

    fn read_scratch(
        &self,
        name: &QualifiedName,
        offset: u32,
        length: u32,
    ) -> Result<Vec<u8>, SessionError>;

    /// Current size, which can exceed the initial capacity for extendible objects.
    fn scratch_size(&self, name: &QualifiedName) -> Result<u32, SessionError>;

    fn set_scratch_description(&self, name: &QualifiedName, text: &str)
        -> Result<(), SessionError>;

    fn commit_scratch(&self, name: &QualifiedName) -> Result<(), SessionError>;
}

/// Everything the invocation engine needs from a connection.
pub trait Host: Session + ScratchHost {}

impl<T: Session + ScratchHost + ?Sized> Host for T {}
