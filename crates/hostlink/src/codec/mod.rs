// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-width field codec.
//!
//! Every value crossing the call boundary is a fixed-length field:
//!
//! | Kind | Layout |
//! |------|--------|
//! | `Char(n)` | `n` bytes in the host character set, space padded or truncated |
//! | `Binary(n)` | `n` bytes big-endian two's complement, `n` in {1, 2, 4, 8} |
//!
//! The codec is pure and stateless apart from the selected [`CharSet`].

pub mod charset;
pub mod qualified;

pub use charset::CharSet;
pub use qualified::{decode_qualified, encode_qualified, NAME_LEN, QUALIFIED_PATH_LEN};

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

/// Codec contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unsupported binary width {0} (expected 1, 2, 4 or 8)")]
    UnsupportedWidth(usize),

    #[error("value {value} does not fit in {width} byte(s)")]
    OutOfRange { value: i64, width: usize },

    #[error("field kind {expected:?} does not match value")]
    KindMismatch { expected: FieldKind },

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("name component is empty")]
    EmptyName,

    #[error("'{0}' is longer than 10 characters")]
    NameTooLong(String),
}

/// Layout of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Char(usize),
    Binary(usize),
}

impl FieldKind {
    pub fn width(self) -> usize {
        match self {
            FieldKind::Char(w) | FieldKind::Binary(w) => w,
        }
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Char(String),
    Binary(i64),
}

/// Encoder/decoder for fixed-width fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldCodec {
    charset: CharSet,
}

impl FieldCodec {
    pub fn new(charset: CharSet) -> Self {
        Self { charset }
    }

    pub fn charset(&self) -> CharSet {
        self.charset
    }

    pub fn encode(&self, value: &FieldValue, kind: FieldKind) -> Result<Vec<u8>, CodecError> {
        match (value, kind) {
            (FieldValue::Char(s), FieldKind::Char(width)) => Ok(self.char_field(s, width)),
            (FieldValue::Binary(v), FieldKind::Binary(width)) => encode_binary(*v, width),
            _ => Err(CodecError::KindMismatch { expected: kind }),
        }
    }

    pub fn decode(&self, bytes: &[u8], kind: FieldKind) -> Result<FieldValue, CodecError> {
        if bytes.len() != kind.width() {
            return Err(CodecError::Length {
                expected: kind.width(),
                actual: bytes.len(),
            });
        }
        match kind {
            FieldKind::Char(_) => Ok(FieldValue::Char(self.charset.decode(bytes))),
            FieldKind::Binary(width) => decode_binary(bytes, width).map(FieldValue::Binary),
        }
    }

    /// Encode `value` into exactly `width` bytes, padding with spaces.
    pub fn char_field(&self, value: &str, width: usize) -> Vec<u8> {
        let mut out: Vec<u8> = value
            .chars()
            .take(width)
            .map(|c| self.charset.encode_char(c))
            .collect();
        out.resize(width, self.charset.space());
        out
    }

    /// Decode a character field and strip trailing padding.
    pub fn decode_trimmed(&self, bytes: &[u8]) -> String {
        let decoded = self.charset.decode(bytes);
        decoded.trim_end_matches(' ').to_string()
    }
}

/// Encode a BIN(4) field, the width every length parameter uses.
pub fn bin4(value: u32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, value);
    buf
}

/// Read a big-endian u32 at `offset`.
pub fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, CodecError> {
    let end = offset + 4;
    if bytes.len() < end {
        return Err(CodecError::Length {
            expected: end,
            actual: bytes.len(),
        });
    }
    Ok(BigEndian::read_u32(&bytes[offset..end]))
}

fn encode_binary(value: i64, width: usize) -> Result<Vec<u8>, CodecError> {
    let mut out = vec![0u8; width];
    let range = || CodecError::OutOfRange { value, width };
    match width {
        1 => out[0] = i8::try_from(value).map_err(|_| range())? as u8,
        2 => BigEndian::write_i16(&mut out, i16::try_from(value).map_err(|_| range())?),
        4 => BigEndian::write_i32(&mut out, i32::try_from(value).map_err(|_| range())?),
        8 => BigEndian::write_i64(&mut out, value),
        other => return Err(CodecError::UnsupportedWidth(other)),
    }
    Ok(out)
}

fn decode_binary(bytes: &[u8], width: usize) -> Result<i64, CodecError> {
    match width {
        1 => Ok(i64::from(bytes[0] as i8)),
        2 => Ok(i64::from(BigEndian::read_i16(bytes))),
        4 => Ok(i64::from(BigEndian::read_i32(bytes))),
        8 => Ok(BigEndian::read_i64(bytes)),
        other => Err(CodecError::UnsupportedWidth(other)),
    }
}
