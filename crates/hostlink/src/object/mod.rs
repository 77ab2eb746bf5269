// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host objects: qualified names, kinds and resolution.

mod kind;
mod name;
mod registry;
mod resolver;

pub use kind::{ObjectHandle, ObjectKind, ObjectType, ResolvedObject};
pub use name::{Library, QualifiedName};
pub use registry::{Constructor, KindRegistry};
pub use resolver::Resolver;
