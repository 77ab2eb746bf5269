// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parameter blocks.
//!
//! A block is an ordered list of slots whose positions are fixed by the
//! format being called. Variable-length receivers always start with:
//!
//! ```text
//! +-------------------------+---------------------------+---------------
//! | bytes returned (BIN 4)  | bytes available (BIN 4)   | format data...
//! +-------------------------+---------------------------+---------------
//! ```

use crate::codec::bin4;
use crate::codec::read_u32;
use crate::codec::CodecError;

/// Size of the receiver header.
pub const RECEIVER_HEADER_LEN: usize = 8;

/// Error code slot contents: bytes provided = 0, so the host reports errors
/// as messages instead of filling a structure.
const ERROR_CODE_BYTES: [u8; 4] = [0; 4];

/// One slot of a parameter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Fixed input bytes.
    Input(Vec<u8>),
    /// Receiver of `capacity` bytes, filled by the transport.
    Output { capacity: usize, data: Vec<u8> },
    /// Standard error code structure.
    ErrorCode,
}

impl Parameter {
    pub fn input(bytes: impl Into<Vec<u8>>) -> Self {
        Parameter::Input(bytes.into())
    }

    pub fn output(capacity: usize) -> Self {
        Parameter::Output {
            capacity,
            data: Vec::new(),
        }
    }

    /// Bytes sent to the host for this slot.
    pub fn input_bytes(&self) -> &[u8] {
        match self {
            Parameter::Input(bytes) => bytes,
            Parameter::Output { .. } => &[],
            Parameter::ErrorCode => &ERROR_CODE_BYTES,
        }
    }

    /// Receiver size, 0 for input-only slots.
    pub fn capacity(&self) -> usize {
        match self {
            Parameter::Output { capacity, .. } => *capacity,
            Parameter::Input(_) | Parameter::ErrorCode => 0,
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Parameter::Output { .. })
    }

    /// Store data returned by the host, truncated to the slot capacity.
    /// Ignored on input slots.
    pub fn fill(&mut self, bytes: &[u8]) {
        if let Parameter::Output { capacity, data } = self {
            let n = bytes.len().min(*capacity);
            data.clear();
            data.extend_from_slice(&bytes[..n]);
        }
    }

    pub fn output_data(&self) -> &[u8] {
        match self {
            Parameter::Output { data, .. } => data,
            Parameter::Input(_) | Parameter::ErrorCode => &[],
        }
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        match self {
            Parameter::Output { data, .. } => std::mem::take(data),
            Parameter::Input(_) | Parameter::ErrorCode => Vec::new(),
        }
    }
}

/// Ordered parameter slots for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBlock {
    slots: Vec<Parameter>,
}

impl ParameterBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: Parameter) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn push(&mut self, slot: Parameter) {
        self.slots.push(slot);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&Parameter> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.slots.get_mut(index)
    }

    pub fn slots(&self) -> &[Parameter] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Parameter] {
        &mut self.slots
    }

    /// Build the `[receiver, receiver length, tail...]` layout used by every
    /// retrieve-style program.
    pub(crate) fn receiver(length: u32, tail: &[Parameter]) -> Self {
        let mut block = Self::new()
            .with(Parameter::output(length as usize))
            .with(Parameter::input(bin4(length)));
        block.slots.extend(tail.iter().cloned());
        block
    }

    /// Resize the receiver and restate its length in slot 1.
    pub(crate) fn resize_receiver(&mut self, length: u32) {
        if let Some(slot) = self.slots.get_mut(0) {
            *slot = Parameter::output(length as usize);
        }
        if let Some(slot) = self.slots.get_mut(1) {
            *slot = Parameter::input(bin4(length));
        }
    }
}

/// `(bytes returned, bytes available)` from a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverHeader {
    pub returned: u32,
    pub available: u32,
}

impl ReceiverHeader {
    pub fn parse(data: &[u8]) -> Result<Self, CodecError> {
        Ok(Self {
            returned: read_u32(data, 0)?,
            available: read_u32(data, 4)?,
        })
    }

    /// True when the host had everything fit in the receiver.
    pub fn is_complete(&self) -> bool {
        self.available <= self.returned
    }
}
