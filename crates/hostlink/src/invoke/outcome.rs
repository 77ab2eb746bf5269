// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Call outcomes.

use crate::error::CallError;
use crate::session::SystemMessage;

/// Message recorded when a call was never issued.
pub const PROGRAM_NOT_CALLED: &str = "ERROR: Program not called correctly";

/// Payload, diagnostics and success flag of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallOutcome {
    pub payload: Vec<u8>,
    /// Host diagnostics in emission order.
    pub messages: Vec<SystemMessage>,
    pub success: bool,
}

impl CallOutcome {
    pub fn succeeded(payload: Vec<u8>, messages: Vec<SystemMessage>) -> Self {
        Self {
            payload,
            messages,
            success: true,
        }
    }

    /// Failed call: no payload, host diagnostics kept.
    pub fn failed(messages: Vec<SystemMessage>) -> Self {
        Self {
            payload: Vec::new(),
            messages,
            success: false,
        }
    }

    /// The call was never issued (a required resource could not be set up).
    pub fn not_called() -> Self {
        Self::failed(vec![SystemMessage::new("", PROGRAM_NOT_CALLED)])
    }

    pub fn was_called(&self) -> bool {
        !self.messages.iter().any(|m| m.text == PROGRAM_NOT_CALLED)
    }

    pub fn has_message(&self, id: &str) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }
}

impl From<CallError> for CallOutcome {
    fn from(err: CallError) -> Self {
        Self::failed(vec![SystemMessage::new("", err.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionError;

    #[test]
    fn not_called_carries_sentinel() {
        let outcome = CallOutcome::not_called();
        assert!(!outcome.success);
        assert!(outcome.payload.is_empty());
        assert!(!outcome.was_called());
        assert_eq!(outcome.messages[0].text, PROGRAM_NOT_CALLED);
    }

    #[test]
    fn error_flattens_to_failure() {
        let outcome = CallOutcome::from(CallError::Session(SessionError::Interrupted));
        assert!(!outcome.success);
        assert!(outcome.was_called());
        assert_eq!(outcome.messages.len(), 1);
        assert!(outcome.messages[0].text.contains("interrupted"));
    }

    #[test]
    fn message_lookup_by_id() {
        let outcome = CallOutcome::failed(vec![SystemMessage::new("CPF9801", "not found")]);
        assert!(outcome.has_message("CPF9801"));
        assert!(!outcome.has_message("CPF9802"));
    }
}
