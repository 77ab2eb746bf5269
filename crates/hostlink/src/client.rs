// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host client.
//!
//! Bundles a connection with its configuration and hands out the resolver
//! and invoker bound to it.
//!
//! # Example
//!
//! ```rust
//! use hostlink::sim::SimHost;
//! use hostlink::{api, HostClient, HostConfig, ObjectType, QualifiedName};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HostClient::new(SimHost::new(), HostConfig::default())?;
//! let payroll = QualifiedName::new("PAYROLL", "*LIBL")?;
//!
//! if let Some(file) = client.resolve(&payroll, &ObjectType::File).into_resolved() {
//!     let outcome = api::object_description(&client.invoker(), &file, "OBJD0100")?;
//!     println!("{} bytes", outcome.payload.len());
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::{ConfigError, HostConfig};
use crate::error::ResolveError;
use crate::invoke::Invoker;
use crate::object::{ObjectHandle, ObjectType, QualifiedName, ResolvedObject, Resolver};
use crate::session::Host;
use std::path::Path;

/// A host connection and the settings used for calls on it.
pub struct HostClient<H: Host> {
    host: H,
    config: HostConfig,
}

impl<H: Host> HostClient<H> {
    /// Validates `config` before accepting it.
    pub fn new(host: H, config: HostConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { host, config })
    }

    pub fn from_config_file<P: AsRef<Path>>(host: H, path: P) -> Result<Self, ConfigError> {
        let config = HostConfig::from_file(path)?;
        Ok(Self { host, config })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn invoker(&self) -> Invoker<'_, H> {
        Invoker::with_config(&self.host, &self.config)
    }

    /// Resolver with the standard kind table.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.host)
    }

    pub fn resolve(&self, reference: &QualifiedName, object_type: &ObjectType) -> ObjectHandle {
        self.resolver().resolve(reference, object_type)
    }

    pub fn try_resolve(
        &self,
        reference: &QualifiedName,
        object_type: &ObjectType,
    ) -> Result<ObjectHandle, ResolveError> {
        self.resolver().try_resolve(reference, object_type)
    }

    pub fn resolve_all(
        &self,
        reference: &QualifiedName,
        object_type: &ObjectType,
    ) -> Result<Vec<ResolvedObject>, ResolveError> {
        self.resolver().resolve_all(reference, object_type)
    }
}
