// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Qualified object references.

use crate::codec::qualified::{check_component, encode_qualified, QUALIFIED_PATH_LEN};
use crate::codec::{decode_qualified, CodecError, FieldCodec};
use std::fmt;

/// Library part of a qualified reference.
///
/// The special values are search tokens understood by the host; the catalog
/// expands them to a concrete library when it reports a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Library {
    Named(String),
    /// `*CURLIB`
    Current,
    /// `*LIBL`
    LibraryList,
    /// `*USRLIBL`
    UserLibraryList,
    /// `*ALLUSR`
    AllUser,
    /// `*ALL`
    All,
}

impl Library {
    /// Library that holds every other library object.
    pub const SYSTEM: &'static str = "QSYS";

    pub fn parse(value: &str) -> Result<Self, CodecError> {
        let lib = match value {
            "*CURLIB" => Library::Current,
            "*LIBL" => Library::LibraryList,
            "*USRLIBL" => Library::UserLibraryList,
            "*ALLUSR" => Library::AllUser,
            "*ALL" => Library::All,
            other => {
                check_component(other)?;
                Library::Named(other.to_string())
            }
        };
        Ok(lib)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Library::Named(name) => name,
            Library::Current => "*CURLIB",
            Library::LibraryList => "*LIBL",
            Library::UserLibraryList => "*USRLIBL",
            Library::AllUser => "*ALLUSR",
            Library::All => "*ALL",
        }
    }

    /// True for search tokens that the catalog resolves to a real library.
    pub fn is_search_token(&self) -> bool {
        !matches!(self, Library::Named(_))
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable (name, library) pair identifying a host object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    name: String,
    library: Library,
}

impl QualifiedName {
    pub fn new(name: &str, library: &str) -> Result<Self, CodecError> {
        check_component(name)?;
        Ok(Self {
            name: name.to_string(),
            library: Library::parse(library)?,
        })
    }

    pub fn with_library(name: &str, library: Library) -> Result<Self, CodecError> {
        check_component(name)?;
        if let Library::Named(lib) = &library {
            check_component(lib)?;
        }
        Ok(Self {
            name: name.to_string(),
            library,
        })
    }

    /// Object in `QSYS`, for names known to be valid.
    pub(crate) fn system(name: &str) -> Self {
        Self {
            name: name.to_string(),
            library: Library::Named(Library::SYSTEM.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Encode as the 20-byte qualified path token.
    pub fn encode(&self, codec: &FieldCodec) -> Result<[u8; QUALIFIED_PATH_LEN], CodecError> {
        encode_qualified(codec, &self.name, self.library.as_str())
    }

    pub fn decode(codec: &FieldCodec, bytes: &[u8]) -> Result<Self, CodecError> {
        let (name, library) = decode_qualified(codec, bytes)?;
        Self::new(&name, &library)
    }

    /// Integrated file system path, e.g. `/QSYS.LIB/MYLIB.LIB/PAYROLL.FILE`.
    pub fn ifs_path(&self, object_suffix: &str) -> String {
        let library = self.library.as_str();
        if library == Library::SYSTEM {
            format!("/QSYS.LIB/{}.{}", self.name, object_suffix)
        } else {
            format!("/QSYS.LIB/{}.LIB/{}.{}", library, self.name, object_suffix)
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.library, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CharSet;

    #[test]
    fn special_libraries_parse() {
        assert_eq!(Library::parse("*LIBL"), Ok(Library::LibraryList));
        assert_eq!(Library::parse("*CURLIB"), Ok(Library::Current));
        assert!(Library::parse("*LIBL").expect("parse").is_search_token());
        assert!(!Library::parse("MYLIB").expect("parse").is_search_token());
    }

    #[test]
    fn rejects_invalid_components() {
        assert!(QualifiedName::new("", "MYLIB").is_err());
        assert!(QualifiedName::new("PAYROLL", "LIBRARYNAME").is_err());
        assert!(QualifiedName::new("PAYROLL_FILE", "MYLIB").is_err());
    }

    #[test]
    fn encode_decode_roundtrip() {
        let codec = FieldCodec::new(CharSet::Ebcdic037);
        let name = QualifiedName::new("PAYROLL", "*LIBL").expect("name");
        let bytes = name.encode(&codec).expect("encode");
        assert_eq!(QualifiedName::decode(&codec, &bytes), Ok(name));
    }

    #[test]
    fn ifs_paths() {
        let file = QualifiedName::new("PAYROLL", "MYLIB").expect("name");
        assert_eq!(file.ifs_path("FILE"), "/QSYS.LIB/MYLIB.LIB/PAYROLL.FILE");

        let program = QualifiedName::new("QUSROBJD", "QSYS").expect("name");
        assert_eq!(program.ifs_path("PGM"), "/QSYS.LIB/QUSROBJD.PGM");
    }

    #[test]
    fn display_is_library_slash_name() {
        let name = QualifiedName::new("PAYROLL", "MYLIB").expect("name");
        assert_eq!(name.to_string(), "MYLIB/PAYROLL");
    }
}
