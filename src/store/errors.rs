//! Store boundary errors.
//!
//! Everything the underlying document store reports comes back through
//! this type, tagged so callers can decide whether to retry. This layer
//! never retries on its own.

use thiserror::Error;

use super::document::DocumentId;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a document store backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The named collection does not exist. Run setup first.
    #[error("collection '{0}' does not exist")]
    CollectionMissing(String),

    /// No document with the given identifier.
    #[error("document '{0}' does not exist")]
    DocumentMissing(DocumentId),

    /// Connectivity or backend-internal failure; retryable at the
    /// caller's discretion.
    #[error("store backend error: {0}")]
    Backend(String),
}
