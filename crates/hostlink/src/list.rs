// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic header of a populated list space.
//!
//! List programs (QUSLFLD, QUSLRCD, QSRLSAVF...) write a common header
//! followed by fixed-size entries:
//!
//! ```text
//! 0x67  CHAR(1)  information status (C, P, I)
//! 0x7C  BIN(4)   offset to list data
//! 0x80  BIN(4)   size of list data
//! 0x84  BIN(4)   number of entries
//! 0x88  BIN(4)   size of each entry
//! ```

use crate::codec::{read_u32, CodecError, FieldCodec};

const STATUS_OFFSET: usize = 0x67;
const DATA_OFFSET: usize = 0x7C;
const DATA_SIZE: usize = 0x80;
const ENTRY_COUNT: usize = 0x84;
const ENTRY_SIZE: usize = 0x88;

/// Whether the program managed to write the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Complete,
    /// Accurate but truncated, e.g. the space could not grow.
    Partial,
    /// Not accurate.
    Incomplete,
    Unknown(char),
}

impl From<char> for ListStatus {
    fn from(c: char) -> Self {
        match c {
            'C' => ListStatus::Complete,
            'P' => ListStatus::Partial,
            'I' => ListStatus::Incomplete,
            other => ListStatus::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    pub status: ListStatus,
    pub data_offset: u32,
    pub data_size: u32,
    pub entry_count: u32,
    pub entry_size: u32,
}

impl ListHeader {
    /// Bytes needed to hold the header.
    pub const LEN: usize = ENTRY_SIZE + 4;

    /// Parse the header at the start of `space`; the status character is
    /// decoded with `codec`.
    pub fn parse(codec: &FieldCodec, space: &[u8]) -> Result<Self, CodecError> {
        if space.len() < Self::LEN {
            return Err(CodecError::Length {
                expected: Self::LEN,
                actual: space.len(),
            });
        }
        Ok(Self {
            status: ListStatus::from(codec.charset().decode_byte(space[STATUS_OFFSET])),
            data_offset: read_u32(space, DATA_OFFSET)?,
            data_size: read_u32(space, DATA_SIZE)?,
            entry_count: read_u32(space, ENTRY_COUNT)?,
            entry_size: read_u32(space, ENTRY_SIZE)?,
        })
    }

    /// Entries of `space`, which must be the space the header was read from.
    pub fn entries<'a>(&self, space: &'a [u8]) -> Result<Vec<&'a [u8]>, CodecError> {
        if self.entry_count == 0 {
            return Ok(Vec::new());
        }
        if self.entry_size == 0 {
            return Err(CodecError::UnsupportedWidth(0));
        }
        let start = self.data_offset as usize;
        let len = self.entry_count as usize * self.entry_size as usize;
        let data = space.get(start..start + len).ok_or(CodecError::Length {
            expected: start + len,
            actual: space.len(),
        })?;
        Ok(data.chunks_exact(self.entry_size as usize).collect())
    }
}
