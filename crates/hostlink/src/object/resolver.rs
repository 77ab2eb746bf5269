// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Catalog-driven object resolution.
//!
//! A reference such as `*LIBL/PAYROLL` is looked up in the object catalog;
//! the first match's type and extended attribute pick the representation
//! through the [`KindRegistry`].

use super::kind::{ObjectHandle, ObjectType, ResolvedObject};
use super::name::QualifiedName;
use super::registry::KindRegistry;
use crate::error::ResolveError;
use crate::logging;
use crate::session::{CatalogAttribute, CatalogEntry, CatalogFilter, CatalogQuery, Session};
use std::ops::{Deref, DerefMut};

/// Maps qualified references to typed handles.
pub struct Resolver<'s> {
    session: &'s dyn Session,
    registry: KindRegistry,
}

impl<'s> Resolver<'s> {
    pub fn new(session: &'s dyn Session) -> Self {
        Self::with_registry(session, KindRegistry::standard())
    }

    pub fn with_registry(session: &'s dyn Session, registry: KindRegistry) -> Self {
        Self { session, registry }
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut KindRegistry {
        &mut self.registry
    }

    /// Resolve `reference`, or [`ObjectHandle::Null`] when it does not exist,
    /// has no registered representation, or the catalog failed. Failures are
    /// logged.
    pub fn resolve(&self, reference: &QualifiedName, object_type: &ObjectType) -> ObjectHandle {
        match self.try_resolve(reference, object_type) {
            Ok(handle) => handle,
            Err(e) => {
                logging::report_resolve_failure(reference, &e);
                ObjectHandle::Null
            }
        }
    }

    /// Like [`resolve`](Self::resolve) but reports why nothing was produced.
    /// A reference with no catalog match is still `Ok(Null)`.
    pub fn try_resolve(
        &self,
        reference: &QualifiedName,
        object_type: &ObjectType,
    ) -> Result<ObjectHandle, ResolveError> {
        let mut query = self.open(reference, object_type)?;
        query.load()?;
        if query.is_empty() {
            return Ok(ObjectHandle::Null);
        }
        let Some(entry) = query.entries(0, 1)?.into_iter().next() else {
            return Ok(ObjectHandle::Null);
        };
        self.construct(&entry).map(ObjectHandle::from)
    }

    /// Every catalog match, in catalog order. Matches with no registered
    /// representation are skipped.
    pub fn resolve_all(
        &self,
        reference: &QualifiedName,
        object_type: &ObjectType,
    ) -> Result<Vec<ResolvedObject>, ResolveError> {
        let mut query = self.open(reference, object_type)?;
        query.load()?;
        let count = query.len();
        let entries = query.entries(0, count)?;

        let mut resolved = Vec::with_capacity(entries.len());
        for entry in &entries {
            match self.construct(entry) {
                Ok(obj) => resolved.push(obj),
                Err(e @ ResolveError::Unsupported { .. }) => {
                    log::debug!(target: logging::TARGET, "[resolve] skipping {}: {}", entry.name, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(resolved)
    }

    fn open(
        &self,
        reference: &QualifiedName,
        object_type: &ObjectType,
    ) -> Result<OpenQuery<'s>, ResolveError> {
        let filter = CatalogFilter {
            object: reference.clone(),
            object_type: object_type.clone(),
            attributes: vec![CatalogAttribute::ExtendedAttribute],
        };
        let query = self.session.query_catalog(&filter)?;
        Ok(OpenQuery { query })
    }

    fn construct(&self, entry: &CatalogEntry) -> Result<ResolvedObject, ResolveError> {
        let object_type = entry.object_type.trim().trim_start_matches('*');
        let attribute = entry.attribute.trim();
        let constructor = self.registry.lookup(object_type, attribute).ok_or_else(|| {
            ResolveError::Unsupported {
                object_type: object_type.to_string(),
                attribute: attribute.to_string(),
            }
        })?;

        // The catalog reports the library it found the object in, which
        // replaces any search token in the request.
        let reference = QualifiedName::new(entry.name.trim(), entry.library.trim())?;
        Ok(constructor(self.session, reference)?)
    }
}

/// Closes the catalog query when dropped.
struct OpenQuery<'a> {
    query: Box<dyn CatalogQuery + 'a>,
}

impl<'a> Deref for OpenQuery<'a> {
    type Target = dyn CatalogQuery + 'a;

    fn deref(&self) -> &Self::Target {
        self.query.as_ref()
    }
}

impl DerefMut for OpenQuery<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.query.as_mut()
    }
}

impl Drop for OpenQuery<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.query.close() {
            logging::report_cleanup_failure("catalog query", &e);
        }
    }
}
