//! Append-only trail writer.
//!
//! Audit trails, system logs, and performance metrics are tamper-evident
//! by construction: this handle exposes setup and append, and nothing
//! else. There is no update or delete to misuse; the capability does not
//! exist on the type.

use std::sync::Arc;

use tracing::debug;

use crate::store::{Document, DocumentId};

use super::errors::{CollectionError, CollectionResult};
use super::manager::CollectionManager;

/// Write handle for one append-only entity family.
pub struct AuditTrailWriter {
    manager: Arc<CollectionManager>,
    family: String,
}

impl std::fmt::Debug for AuditTrailWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrailWriter")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl AuditTrailWriter {
    /// Binds a writer to an append-only family.
    ///
    /// Fails with [`CollectionError::NotAppendOnly`] when the family
    /// permits updates; mutable families go through the manager directly.
    pub fn new(manager: Arc<CollectionManager>, family: &str) -> CollectionResult<Self> {
        let spec = manager.registry().family(family)?;
        if !spec.is_append_only() {
            return Err(CollectionError::NotAppendOnly(family.to_string()));
        }
        let name = spec.name().to_string();
        debug!(family = %name, "audit trail writer bound");
        Ok(Self {
            manager,
            family: name,
        })
    }

    /// The family this writer appends to.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Idempotent collection and index setup.
    pub fn ensure(&self) -> CollectionResult<()> {
        self.manager.ensure(&self.family)
    }

    /// Validates and appends one record. The record's identity is the
    /// write itself; once accepted it can never be altered or removed
    /// through this layer.
    pub fn append(&self, record: Document) -> CollectionResult<DocumentId> {
        self.manager.insert(&self.family, record)
    }
}
