// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Remote invocation engine.
//!
//! Three call shapes share one parameter model:
//!
//! - **fixed**: a single call; success depends on the diagnostics
//! - **growing**: the receiver is resized until the whole result fits
//! - **scratch**: a list program writes into a temporary user space

mod engine;
mod formats;
mod outcome;
mod params;

pub use engine::{GrowingCall, Invoker, RetryPolicy};
pub use formats::{builtin as builtin_format, FormatLength, FormatTable};
pub use outcome::{CallOutcome, PROGRAM_NOT_CALLED};
pub use params::{Parameter, ParameterBlock, ReceiverHeader, RECEIVER_HEADER_LEN};
