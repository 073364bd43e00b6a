//! Collection orchestration.
//!
//! The manager is the component callers interact with: it resolves the
//! family, validates candidates, stamps timestamps, persists through the
//! store boundary, and routes reads through an index chosen by the
//! planner. Admission order is fixed: validation happens before any write
//! reaches the store, and a rejected document is never persisted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::index::IndexPlanner;
use crate::schema::{FamilySpec, SchemaRegistry, Validator};
use crate::store::clock::{parse_timestamp, timestamp_value};
use crate::store::{Clock, Document, DocumentId, DocumentStore, Query, SystemClock, ID_FIELD};

use super::errors::{CollectionError, CollectionResult};

/// Field stamped with the creation instant on every admitted document.
pub const CREATED_AT: &str = "createdAt";
/// Field stamped with the last-write instant on mutable documents.
pub const UPDATED_AT: &str = "updatedAt";

/// Lazily consumed result of a [`CollectionManager::find`] call.
#[derive(Debug)]
pub struct Cursor {
    inner: std::vec::IntoIter<Document>,
}

impl Cursor {
    fn new(documents: Vec<Document>) -> Self {
        Self {
            inner: documents.into_iter(),
        }
    }
}

impl Iterator for Cursor {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Cursor {}

/// Orchestrates schema installation, index creation, and document
/// admission for every registered entity family.
pub struct CollectionManager {
    registry: Arc<SchemaRegistry>,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl CollectionManager {
    /// A manager over the given registry and store, using wall-clock time.
    pub fn new(registry: Arc<SchemaRegistry>, store: Arc<dyn DocumentStore>) -> Self {
        Self::with_clock(registry, store, Arc::new(SystemClock))
    }

    /// A manager with an explicit time source.
    pub fn with_clock(
        registry: Arc<SchemaRegistry>,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            store,
            clock,
        }
    }

    /// The registry this manager serves.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Idempotent setup for one family: create the collection if absent
    /// and create every planned index not already present. Safe to call
    /// on every process start, including concurrently.
    pub fn ensure(&self, family: &str) -> CollectionResult<()> {
        let spec = self.registry.family(family)?;
        self.store.ensure_collection(spec.name())?;

        let indexes = IndexPlanner::plan(spec.patterns());
        for index in &indexes {
            self.store.ensure_index(spec.name(), index)?;
        }
        debug!(family, indexes = indexes.len(), "collection ensured");
        Ok(())
    }

    /// Runs [`CollectionManager::ensure`] for every registered family.
    pub fn ensure_all(&self) -> CollectionResult<()> {
        for family in self.registry.families() {
            self.ensure(family.name())?;
        }
        Ok(())
    }

    /// Validates and persists a document, stamping `createdAt` (and, for
    /// mutable families, `updatedAt`) when absent. Returns the assigned
    /// identifier. A rejected document is never written.
    pub fn insert(&self, family: &str, mut document: Document) -> CollectionResult<DocumentId> {
        let spec = self.registry.family(family)?;

        if let Err(err) = Validator::new(&self.registry).validate(family, &document) {
            warn!(family, %err, "document rejected");
            return Err(err.into());
        }

        let now = self.clock.now();
        document
            .entry(CREATED_AT.to_string())
            .or_insert_with(|| timestamp_value(now));
        if !spec.is_append_only() {
            let created = document[CREATED_AT].clone();
            document.entry(UPDATED_AT.to_string()).or_insert(created);
        }

        let id = self.store.insert(spec.name(), document)?;
        info!(family, %id, "document admitted");
        Ok(id)
    }

    /// Merges a patch into an existing document, re-validates the merged
    /// result, and persists it with a non-decreasing `updatedAt` stamp.
    ///
    /// Append-only families reject every update. Monotone flags declared
    /// by the family can only move from unset to set; the companion stamp
    /// is written once, at the transition. A patch that would move a
    /// monotone flag or `updatedAt` backwards is a stale write: the caller
    /// saw an outdated document and must re-fetch.
    pub fn update(&self, family: &str, id: DocumentId, patch: Document) -> CollectionResult<()> {
        let spec = self.registry.family(family)?;
        if spec.is_append_only() {
            warn!(family, %id, "update refused on append-only family");
            return Err(CollectionError::ImmutableEntity(family.to_string()));
        }

        let existing = self
            .store
            .get(spec.name(), id)?
            .ok_or_else(|| CollectionError::DocumentNotFound {
                family: family.to_string(),
                id,
            })?;

        self.check_stale_timestamp(spec, &existing, &patch)?;
        self.check_monotone_flags(spec, &existing, &patch)?;

        // Identifiers are server-controlled; a patch cannot rebind one.
        debug_assert!(
            patch
                .get(ID_FIELD)
                .map_or(true, |value| *value == id.to_value()),
            "patch must not carry a foreign _id"
        );

        let mut merged = existing.clone();
        for (field, value) in patch {
            merged.insert(field, value);
        }
        merged.insert(ID_FIELD.to_string(), id.to_value());

        let now = self.clock.now();
        self.stamp_transitions(spec, &existing, &mut merged, now);
        let stamp = effective_update_instant(&existing, &merged, now);
        merged.insert(UPDATED_AT.to_string(), timestamp_value(stamp));

        if let Err(err) = Validator::new(&self.registry).validate(family, &merged) {
            warn!(family, %id, %err, "merged document rejected");
            return Err(err.into());
        }

        self.store.replace(spec.name(), id, merged)?;
        info!(family, %id, "document updated");
        Ok(())
    }

    /// Fetches one document by identifier.
    pub fn get(&self, family: &str, id: DocumentId) -> CollectionResult<Option<Document>> {
        let spec = self.registry.family(family)?;
        Ok(self.store.get(spec.name(), id)?)
    }

    /// Runs a read-only query.
    ///
    /// The filter/sort combination must be servable by one of the
    /// family's planned indexes; otherwise the query is refused instead of
    /// degenerating into a collection scan. An unconstrained query (no
    /// filter, no ordering) is an explicit full read and is allowed.
    pub fn find(&self, family: &str, query: Query) -> CollectionResult<Cursor> {
        let spec = self.registry.family(family)?;

        if !query.is_unconstrained() {
            let shape = query.shape();
            let indexes = IndexPlanner::plan(spec.patterns());
            if IndexPlanner::select(&indexes, &shape).is_none() {
                return Err(CollectionError::UnindexedQuery {
                    family: family.to_string(),
                    fields: shape.fields(),
                });
            }
        }

        let documents = self.store.query(spec.name(), &query)?;
        Ok(Cursor::new(documents))
    }

    fn check_stale_timestamp(
        &self,
        spec: &FamilySpec,
        existing: &Document,
        patch: &Document,
    ) -> CollectionResult<()> {
        let patched = patch.get(UPDATED_AT).and_then(parse_timestamp);
        let current = existing.get(UPDATED_AT).and_then(parse_timestamp);
        if let (Some(patched), Some(current)) = (patched, current) {
            if patched < current {
                return Err(CollectionError::StaleWrite {
                    family: spec.name().to_string(),
                    reason: format!(
                        "updatedAt {} is older than stored {}",
                        patched.to_rfc3339(),
                        current.to_rfc3339()
                    ),
                });
            }
        }
        Ok(())
    }

    fn check_monotone_flags(
        &self,
        spec: &FamilySpec,
        existing: &Document,
        patch: &Document,
    ) -> CollectionResult<()> {
        for transition in spec.transitions() {
            let already_set = existing
                .get(transition.flag)
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let patched_unset = patch.get(transition.flag).and_then(|v| v.as_bool()) == Some(false);
            if already_set && patched_unset {
                return Err(CollectionError::StaleWrite {
                    family: spec.name().to_string(),
                    reason: format!("{} cannot be unset once set", transition.flag),
                });
            }
        }
        Ok(())
    }

    fn stamp_transitions(
        &self,
        spec: &FamilySpec,
        existing: &Document,
        merged: &mut Document,
        now: DateTime<Utc>,
    ) {
        for transition in spec.transitions() {
            let was_set = existing
                .get(transition.flag)
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let is_set = merged
                .get(transition.flag)
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if is_set && !was_set && !merged.contains_key(transition.stamp) {
                merged.insert(transition.stamp.to_string(), timestamp_value(now));
            }
        }
    }
}

/// The stored `updatedAt` never moves backwards: take the latest of the
/// clock reading, the previously stored stamp, and a caller-supplied one.
fn effective_update_instant(
    existing: &Document,
    merged: &Document,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let mut effective = now;
    for candidate in [
        existing.get(UPDATED_AT).and_then(parse_timestamp),
        merged.get(UPDATED_AT).and_then(parse_timestamp),
    ]
    .into_iter()
    .flatten()
    {
        if candidate > effective {
            effective = candidate;
        }
    }
    effective
}
