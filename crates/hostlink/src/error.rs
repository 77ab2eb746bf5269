// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for remote calls and object resolution.

use crate::codec::CodecError;
use crate::object::ObjectKind;
use crate::session::SessionError;
use thiserror::Error;

/// Result type for remote calls
pub type CallResult<T> = Result<T, CallError>;

/// Errors that can occur while issuing a remote call
#[derive(Debug, Error)]
pub enum CallError {
    /// Session collaborator failed
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Parameter encoding failed
    #[error("encoding error: {0}")]
    Codec(#[from] CodecError),

    /// Host reported a result larger than the configured ceiling
    #[error("{program}: result of {available} bytes exceeds the {limit} byte limit")]
    ResultTooLarge {
        program: String,
        available: u32,
        limit: u32,
    },

    /// Host kept reporting more data after the attempt ceiling
    #[error("{program}: result still incomplete after {attempts} attempts")]
    RetryLimit { program: String, attempts: u32 },

    /// Receiver too short to carry the returned/available header
    #[error("{program}: reply of {length} bytes has no receiver header")]
    MalformedReply { program: String, length: usize },

    /// Format has no configured initial length
    #[error("unknown format {0}")]
    UnknownFormat(String),

    /// Operation does not apply to this object kind
    #[error("{operation} does not apply to a {kind}")]
    Unsupported {
        operation: &'static str,
        kind: ObjectKind,
    },
}

/// Errors that can occur while resolving an object reference
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("catalog error: {0}")]
    Session(#[from] SessionError),

    /// Catalog reported a name the codec cannot represent
    #[error("invalid catalog entry: {0}")]
    Codec(#[from] CodecError),

    /// No constructor is registered for this (type, attribute) pair
    #[error("no representation for type {object_type} attribute '{attribute}'")]
    Unsupported {
        object_type: String,
        attribute: String,
    },
}
