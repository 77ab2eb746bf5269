// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Temporary user spaces.
//!
//! List programs write their results into a user space rather than a
//! parameter. [`ScratchManager::with_scratch`] creates one under a random
//! name, hands it to the caller, reads back what the program wrote and
//! deletes it again:
//!
//! ```text
//! delete-if-exists -> create -> [describe, commit] -> body -> read -> delete
//!        (create refused: not_called(), body skipped)           ^ always
//! ```

use crate::error::CallError;
use crate::invoke::CallOutcome;
use crate::logging;
use crate::object::QualifiedName;
use crate::session::{CallReply, Host, ScratchHost};

/// Library scratch objects are created in by default.
pub const DEFAULT_LIBRARY: &str = "QTEMP";

/// Length of generated names.
const NAME_LEN: usize = 10;

/// Characters of the tag kept at the front of a generated name.
const TAG_LEN: usize = 4;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A scratch object as created on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchSpec {
    pub name: QualifiedName,
    /// Initial size in bytes.
    pub capacity: u32,
    pub auto_extend: bool,
    /// Initial value of every byte.
    pub fill: u8,
}

/// What a caller wants from a scratch object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchRequest {
    pub capacity: u32,
    pub auto_extend: bool,
    pub fill: u8,
    /// Text description to set after creation.
    pub description: Option<String>,
    /// Force the object to storage after creation.
    pub commit: bool,
}

impl ScratchRequest {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            auto_extend: true,
            fill: 0,
            description: None,
            commit: false,
        }
    }

    /// Set the object text and commit it.
    pub fn described(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self.commit = true;
        self
    }

    pub fn auto_extend(mut self, enabled: bool) -> Self {
        self.auto_extend = enabled;
        self
    }

    pub fn fill(mut self, value: u8) -> Self {
        self.fill = value;
        self
    }
}

/// Creates, populates and disposes of scratch objects on one host.
pub struct ScratchManager<'h, H: Host + ?Sized> {
    host: &'h H,
    library: String,
}

impl<'h, H: Host + ?Sized> ScratchManager<'h, H> {
    pub fn new(host: &'h H, library: &str) -> Self {
        Self {
            host,
            library: library.to_string(),
        }
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    /// Run `body` against a fresh scratch object.
    ///
    /// Returns [`CallOutcome::not_called`] without invoking `body` when the
    /// object cannot be created. The object is deleted on every path once
    /// it exists.
    pub fn with_scratch<F>(&self, request: &ScratchRequest, body: F) -> Result<CallOutcome, CallError>
    where
        F: FnOnce(&ScratchSpec) -> Result<CallReply, CallError>,
    {
        let name = QualifiedName::new(&self.generate_name(), &self.library)?;
        let spec = ScratchSpec {
            name,
            capacity: request.capacity,
            auto_extend: request.auto_extend,
            fill: request.fill,
        };

        // Stale object from an earlier run under the same name.
        if let Err(e) = self.host.delete_scratch(&spec.name) {
            logging::report_cleanup_failure(&spec.name.to_string(), &e);
        }

        match self.host.create_scratch(&spec) {
            Ok(true) => {}
            Ok(false) => {
                log::debug!(
                    target: logging::TARGET,
                    "[scratch] host refused to create {}",
                    spec.name
                );
                return Ok(CallOutcome::not_called());
            }
            Err(e) => {
                logging::report_setup_failure(&spec.name.to_string(), &e);
                return Ok(CallOutcome::not_called());
            }
        }

        let guard = ScratchGuard {
            host: self.host,
            name: &spec.name,
        };

        if let Some(text) = &request.description {
            if let Err(e) = self.host.set_scratch_description(&spec.name, text) {
                logging::report_setup_failure(&spec.name.to_string(), &e);
            }
        }
        if request.commit {
            if let Err(e) = self.host.commit_scratch(&spec.name) {
                logging::report_setup_failure(&spec.name.to_string(), &e);
            }
        }

        let reply = body(&spec)?;
        if !reply.executed {
            return Ok(CallOutcome::failed(reply.messages));
        }

        let size = self.host.scratch_size(&spec.name)?;
        let payload = self.host.read_scratch(&spec.name, 0, size)?;
        drop(guard);
        Ok(CallOutcome::succeeded(payload, reply.messages))
    }

    /// Random object name, led by the session's namespace tag when it has one.
    pub fn generate_name(&self) -> String {
        scratch_name(self.host.namespace_tag().as_deref())
    }
}

/// Deletes the scratch object when dropped.
struct ScratchGuard<'a, H: ScratchHost + ?Sized> {
    host: &'a H,
    name: &'a QualifiedName,
}

impl<H: ScratchHost + ?Sized> Drop for ScratchGuard<'_, H> {
    fn drop(&mut self) {
        match self.host.delete_scratch(self.name) {
            Ok(true) => {}
            Ok(false) => log::debug!(
                target: logging::TARGET,
                "[scratch] {} was already gone",
                self.name
            ),
            Err(e) => logging::report_cleanup_failure(&self.name.to_string(), &e),
        }
    }
}

/// Build a valid object name: uppercase alphanumerics, letter first.
pub(crate) fn scratch_name(tag: Option<&str>) -> String {
    let mut name = String::with_capacity(NAME_LEN);
    let tag: Vec<char> = tag
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(TAG_LEN)
        .collect();

    if !tag.first().is_some_and(char::is_ascii_alphabetic) {
        name.push(fastrand::uppercase());
    }
    name.extend(tag.iter().take(NAME_LEN - name.len()));
    while name.len() < NAME_LEN {
        name.push(ALPHANUMERIC[fastrand::usize(..ALPHANUMERIC.len())] as char);
    }
    name
}
