// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Call shapes: fixed, growing and list-into-scratch.

use super::formats::FormatTable;
use super::outcome::CallOutcome;
use super::params::{Parameter, ParameterBlock, ReceiverHeader, RECEIVER_HEADER_LEN};
use crate::codec::FieldCodec;
use crate::config::{HostConfig, ScratchSettings};
use crate::error::{CallError, CallResult};
use crate::logging;
use crate::scratch::{ScratchManager, ScratchRequest, ScratchSpec};
use crate::session::{Host, ProgramPath};
use serde::{Deserialize, Serialize};

/// Bounds on the grow/retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Calls issued before giving up, including the first one.
    pub max_attempts: u32,
    /// Largest receiver the loop will allocate.
    pub max_buffer_bytes: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            max_buffer_bytes: 16 * 1024 * 1024,
        }
    }
}

/// A variable-result call: receiver and length slots are managed by the
/// engine, `tail` holds every slot after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowingCall {
    pub format: String,
    /// Skips the format table when set.
    pub initial_length: Option<u32>,
    pub tail: Vec<Parameter>,
}

impl GrowingCall {
    pub fn new(format: &str, tail: Vec<Parameter>) -> Self {
        Self {
            format: format.to_string(),
            initial_length: None,
            tail,
        }
    }

    pub fn with_initial_length(mut self, length: u32) -> Self {
        self.initial_length = Some(length);
        self
    }
}

/// Issues remote calls on a host.
pub struct Invoker<'h, H: Host + ?Sized> {
    host: &'h H,
    codec: FieldCodec,
    formats: FormatTable,
    retry: RetryPolicy,
    scratch: ScratchSettings,
}

impl<'h, H: Host + ?Sized> Invoker<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self::with_config(host, &HostConfig::default())
    }

    pub fn with_config(host: &'h H, config: &HostConfig) -> Self {
        Self {
            host,
            codec: FieldCodec::new(config.charset),
            formats: config.formats.clone(),
            retry: config.retry,
            scratch: config.scratch.clone(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_formats(mut self, formats: FormatTable) -> Self {
        self.formats = formats;
        self
    }

    pub fn host(&self) -> &'h H {
        self.host
    }

    pub fn codec(&self) -> &FieldCodec {
        &self.codec
    }

    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    pub fn scratch_settings(&self) -> &ScratchSettings {
        &self.scratch
    }

    /// One call with no result sizing.
    ///
    /// Succeeds when the host ran the program and every diagnostic it emitted
    /// is in `accepted`. The payload is the data of the output slots, in slot
    /// order.
    pub fn call_fixed(
        &self,
        program: &ProgramPath,
        block: &mut ParameterBlock,
        accepted: &[&str],
    ) -> CallResult<CallOutcome> {
        let reply = match self.host.call_program(program, block) {
            Ok(reply) => reply,
            Err(e) => return Err(self.report(program, e.into())),
        };

        let clean = reply
            .messages
            .iter()
            .all(|m| accepted.contains(&m.id.as_str()));
        if !reply.executed || !clean {
            return Ok(CallOutcome::failed(reply.messages));
        }

        let payload = block
            .slots()
            .iter()
            .filter(|slot| slot.is_output())
            .flat_map(|slot| slot.output_data().iter().copied())
            .collect();
        Ok(CallOutcome::succeeded(payload, reply.messages))
    }

    /// Call until the receiver holds the whole result.
    ///
    /// Bytes 0..4 of the receiver report what the host returned and bytes
    /// 4..8 what it had available. While more was available the receiver is
    /// grown to that size and the call reissued, within [`RetryPolicy`].
    pub fn call_growing(&self, program: &ProgramPath, call: &GrowingCall) -> CallResult<CallOutcome> {
        self.grow(program, call)
            .map_err(|e| self.report(program, e))
    }

    fn grow(&self, program: &ProgramPath, call: &GrowingCall) -> CallResult<CallOutcome> {
        let mut length = match call.initial_length {
            Some(length) => length,
            None => self.formats.initial_length(&call.format)?,
        };
        self.check_size(program, length)?;

        let mut block = ParameterBlock::receiver(length, &call.tail);
        for attempt in 1..=self.retry.max_attempts {
            let reply = self.host.call_program(program, &mut block)?;
            if !reply.executed {
                return Ok(CallOutcome::failed(reply.messages));
            }

            let data = block.slot(0).map(Parameter::output_data).unwrap_or_default();
            if data.len() < RECEIVER_HEADER_LEN {
                return Err(CallError::MalformedReply {
                    program: program.name().to_string(),
                    length: data.len(),
                });
            }
            let header = ReceiverHeader::parse(data)?;

            if header.is_complete() {
                let end = (header.returned as usize).min(data.len());
                return Ok(CallOutcome::succeeded(data[..end].to_vec(), reply.messages));
            }

            self.check_size(program, header.available)?;
            logging::trace_retry(program.name(), attempt, header.returned, header.available);
            length = header.available;
            block.resize_receiver(length);
        }

        Err(CallError::RetryLimit {
            program: program.name().to_string(),
            attempts: self.retry.max_attempts,
        })
    }

    /// Run a list program that writes into a scratch object.
    ///
    /// `build` receives the created object and returns the parameter block
    /// that points the program at it.
    pub fn call_into_scratch<F>(
        &self,
        program: &ProgramPath,
        request: &ScratchRequest,
        build: F,
    ) -> CallResult<CallOutcome>
    where
        F: FnOnce(&ScratchSpec) -> CallResult<ParameterBlock>,
    {
        let manager = ScratchManager::new(self.host, &self.scratch.library);
        manager
            .with_scratch(request, |spec| {
                let mut block = build(spec)?;
                Ok(self.host.call_program(program, &mut block)?)
            })
            .map_err(|e| self.report(program, e))
    }

    fn check_size(&self, program: &ProgramPath, length: u32) -> CallResult<()> {
        if length > self.retry.max_buffer_bytes {
            return Err(CallError::ResultTooLarge {
                program: program.name().to_string(),
                available: length,
                limit: self.retry.max_buffer_bytes,
            });
        }
        Ok(())
    }

    fn report(&self, program: &ProgramPath, err: CallError) -> CallError {
        logging::report_call_failure(program.name(), &err);
        err
    }
}
