// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! hostlink: typed remote program calls for call-based host systems
//!
//! Runs system programs on a midrange host through an external session,
//! encoding parameters into the host's fixed-width layouts and decoding
//! what comes back.
//!
//! # Features
//!
//! - **Fixed-Width Codec**: EBCDIC character fields and big-endian binaries
//! - **Qualified Paths**: 20-byte name + library tokens
//! - **Object Resolution**: catalog lookup mapped to typed handles through an
//!   open (type, attribute) registry
//! - **Grow/Retry Calls**: receivers resized until the whole result fits,
//!   within a bounded retry policy
//! - **Scratch Spaces**: temporary user spaces for list programs, always
//!   cleaned up
//!
//! # Architecture
//!
//! ```text
//! HostClient
//!   |-- Resolver --> KindRegistry --> ObjectHandle
//!   `-- Invoker  --> ScratchManager
//!         |
//!         v
//!   Session + ScratchHost (transport, supplied by the caller)
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! charset = "ebcdic037"
//!
//! [retry]
//! max_attempts = 8
//! max_buffer_bytes = 16777216
//!
//! [scratch]
//! library = "QTEMP"
//! field_list_capacity = 80000
//!
//! [formats.lengths]
//! OBJD0100 = 90
//! ```

pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod invoke;
pub mod list;
pub mod logging;
pub mod object;
pub mod scratch;
pub mod session;
pub mod sim;

pub use client::HostClient;
pub use codec::{CharSet, CodecError, FieldCodec, FieldKind, FieldValue};
pub use config::{ConfigError, HostConfig, ScratchSettings};
pub use error::{CallError, CallResult, ResolveError};
pub use invoke::{
    CallOutcome, FormatTable, GrowingCall, Invoker, Parameter, ParameterBlock, RetryPolicy,
    PROGRAM_NOT_CALLED,
};
pub use list::{ListHeader, ListStatus};
pub use object::{
    KindRegistry, Library, ObjectHandle, ObjectKind, ObjectType, QualifiedName, ResolvedObject,
    Resolver,
};
pub use scratch::{ScratchManager, ScratchRequest, ScratchSpec};
pub use session::{
    CallReply, CatalogEntry, CatalogFilter, CatalogQuery, Host, ProgramPath, ScratchHost, Session,
    SessionError, SystemMessage,
};
