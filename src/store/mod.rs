//! Document store boundary.
//!
//! This layer does not implement a storage engine. It talks to an existing
//! document-oriented store through [`DocumentStore`], which assumes
//! per-document atomic writes and idempotent collection/index setup. The
//! in-memory [`MemoryStore`] is the reference backend; a driver-backed
//! adapter for a real server is the embedding application's concern.

pub mod clock;
mod document;
mod errors;
mod memory;
mod query;

pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{as_document, Document, DocumentId, ID_FIELD};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{Query, RangeFilter};

use crate::index::IndexSpec;

/// A connected handle to one namespace of a document-oriented store.
///
/// Implementations must provide per-document atomic writes. `ensure_*`
/// calls are idempotent and safe to run concurrently from several
/// processes at startup.
pub trait DocumentStore: Send + Sync {
    /// Creates the collection if absent. No-op otherwise.
    fn ensure_collection(&self, collection: &str) -> StoreResult<()>;

    /// Creates the index if absent. No-op when an identical index exists;
    /// never duplicates.
    fn ensure_index(&self, collection: &str, index: &IndexSpec) -> StoreResult<()>;

    /// The indexes currently present on a collection, in creation order.
    fn list_indexes(&self, collection: &str) -> StoreResult<Vec<IndexSpec>>;

    /// Persists a document and returns its assigned identifier.
    fn insert(&self, collection: &str, document: Document) -> StoreResult<DocumentId>;

    /// Fetches one document by identifier.
    fn get(&self, collection: &str, id: DocumentId) -> StoreResult<Option<Document>>;

    /// Atomically replaces one document by identifier.
    fn replace(&self, collection: &str, id: DocumentId, document: Document) -> StoreResult<()>;

    /// Runs a read-only query and returns matching documents.
    fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>>;
}
