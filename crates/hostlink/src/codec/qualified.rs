// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! 20-byte qualified path token.
//!
//! ```text
//! +----------------------+----------------------+
//! | name (CHAR 10)       | library (CHAR 10)    |
//! +----------------------+----------------------+
//! ```

use super::{CodecError, FieldCodec};

/// Width of each name component.
pub const NAME_LEN: usize = 10;

/// Width of the full qualified path.
pub const QUALIFIED_PATH_LEN: usize = 2 * NAME_LEN;

/// Check a single component against the host naming limits.
pub fn check_component(value: &str) -> Result<(), CodecError> {
    if value.is_empty() {
        return Err(CodecError::EmptyName);
    }
    if value.chars().count() > NAME_LEN {
        return Err(CodecError::NameTooLong(value.to_string()));
    }
    Ok(())
}

pub fn encode_qualified(
    codec: &FieldCodec,
    name: &str,
    library: &str,
) -> Result<[u8; QUALIFIED_PATH_LEN], CodecError> {
    check_component(name)?;
    check_component(library)?;

    let mut out = [0u8; QUALIFIED_PATH_LEN];
    out[..NAME_LEN].copy_from_slice(&codec.char_field(name, NAME_LEN));
    out[NAME_LEN..].copy_from_slice(&codec.char_field(library, NAME_LEN));
    Ok(out)
}

/// Inverse of [`encode_qualified`]; components come back trimmed.
pub fn decode_qualified(codec: &FieldCodec, bytes: &[u8]) -> Result<(String, String), CodecError> {
    if bytes.len() != QUALIFIED_PATH_LEN {
        return Err(CodecError::Length {
            expected: QUALIFIED_PATH_LEN,
            actual: bytes.len(),
        });
    }
    Ok((
        codec.decode_trimmed(&bytes[..NAME_LEN]),
        codec.decode_trimmed(&bytes[NAME_LEN..]),
    ))
}
