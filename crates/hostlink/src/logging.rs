// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Diagnostic sink.
//!
//! Every failure the crate swallows or converts is reported here exactly once,
//! through the `log` facade. The crate never installs a logger; binaries pick
//! the backend (`env_logger`, `syslog`, ...).

use crate::error::{CallError, ResolveError};
use crate::object::QualifiedName;
use crate::session::SessionError;

/// Log target shared by every record this crate emits.
pub const TARGET: &str = "hostlink";

/// Report a call that ended in an error.
pub fn report_call_failure(program: &str, err: &CallError) {
    match err {
        CallError::UnknownFormat(_) | CallError::Unsupported { .. } => {
            log::debug!(target: TARGET, "[call] {}: {}", program, err);
        }
        _ => log::warn!(target: TARGET, "[call] {}: {}", program, err),
    }
}

/// Report a resolution that fell back to a null handle.
pub fn report_resolve_failure(reference: &QualifiedName, err: &ResolveError) {
    match err {
        ResolveError::Unsupported { .. } => {
            log::debug!(target: TARGET, "[resolve] {}: {}", reference, err);
        }
        ResolveError::Session(_) | ResolveError::Codec(_) => {
            log::warn!(target: TARGET, "[resolve] {}: {}", reference, err);
        }
    }
}

/// Report a remote resource that could not be set up before a call.
pub fn report_setup_failure(what: &str, err: &SessionError) {
    log::warn!(target: TARGET, "[setup] {}: {}", what, err);
}

/// Report a failed release of a remote resource (scratch delete, query close).
pub fn report_cleanup_failure(what: &str, err: &SessionError) {
    log::warn!(target: TARGET, "[cleanup] {}: {}", what, err);
}

/// Trace one step of the grow/retry loop.
pub(crate) fn trace_retry(program: &str, attempt: u32, returned: u32, available: u32) {
    log::debug!(
        target: TARGET,
        "[call] {} attempt {}: returned={} available={}, growing receiver",
        program,
        attempt,
        returned,
        available
    );
}
