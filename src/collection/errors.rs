//! Collection-layer error taxonomy.
//!
//! Validation failures and stale writes are expected and recoverable: the
//! caller corrects its input or re-fetches and retries. Unknown families
//! and writes against append-only families are programmer errors. Store
//! failures pass through tagged; retrying them is the caller's decision.

use thiserror::Error;

use crate::schema::{SchemaError, Violation};
use crate::store::{DocumentId, StoreError};

/// Result type for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Errors returned by the collection manager and audit trail writer.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Unknown family or rejected document.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Update attempted on an append-only family.
    #[error("entity family '{0}' is append-only; documents cannot be rewritten")]
    ImmutableEntity(String),

    /// An audit trail writer was requested for a mutable family.
    #[error("entity family '{0}' is not append-only")]
    NotAppendOnly(String),

    /// The targeted document does not exist.
    #[error("document '{id}' not found in '{family}'")]
    DocumentNotFound {
        /// Entity family.
        family: String,
        /// Requested identifier.
        id: DocumentId,
    },

    /// The caller acted on an outdated view of the document; re-fetch and
    /// reapply.
    #[error("stale write to '{family}': {reason}")]
    StaleWrite {
        /// Entity family.
        family: String,
        /// What moved backwards.
        reason: String,
    },

    /// No planned index can serve the requested filter/sort combination.
    #[error("no index on '{family}' serves a query over {fields:?}")]
    UnindexedQuery {
        /// Entity family.
        family: String,
        /// Fields the query touches.
        fields: Vec<String>,
    },

    /// Passed through from the underlying store.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CollectionError {
    /// The schema violations carried by a rejection, if this is one.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            CollectionError::Schema(err) => err.violations(),
            _ => None,
        }
    }
}
