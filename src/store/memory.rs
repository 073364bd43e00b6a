//! In-memory reference backend.
//!
//! One namespace, collections held behind a single mutex. Documents keep
//! insertion order, which doubles as the write order observed by readers;
//! identifiers are assigned at insert and never reused. Index bookkeeping
//! is idempotent so repeated setup runs converge on the same index set.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::index::{Direction, IndexSpec};

use super::document::{Document, DocumentId, ID_FIELD};
use super::errors::{StoreError, StoreResult};
use super::query::Query;
use super::DocumentStore;

#[derive(Debug, Default)]
struct CollectionState {
    documents: Vec<(DocumentId, Document)>,
    indexes: Vec<IndexSpec>,
}

/// In-memory [`DocumentStore`] over one namespace.
#[derive(Debug)]
pub struct MemoryStore {
    namespace: String,
    collections: Mutex<BTreeMap<String, CollectionState>>,
}

impl MemoryStore {
    /// A fresh, empty namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            collections: Mutex::new(BTreeMap::new()),
        }
    }

    /// The namespace this handle is connected to.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Names of the existing collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let collections = self.collections.lock().expect("store lock poisoned");
        collections.keys().cloned().collect()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> StoreResult<usize> {
        let collections = self.collections.lock().expect("store lock poisoned");
        let state = collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionMissing(collection.to_string()))?;
        Ok(state.documents.len())
    }
}

impl DocumentStore for MemoryStore {
    fn ensure_collection(&self, collection: &str) -> StoreResult<()> {
        let mut collections = self.collections.lock().expect("store lock poisoned");
        collections.entry(collection.to_string()).or_default();
        Ok(())
    }

    fn ensure_index(&self, collection: &str, index: &IndexSpec) -> StoreResult<()> {
        let mut collections = self.collections.lock().expect("store lock poisoned");
        let state = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionMissing(collection.to_string()))?;
        if !state.indexes.contains(index) {
            state.indexes.push(index.clone());
        }
        Ok(())
    }

    fn list_indexes(&self, collection: &str) -> StoreResult<Vec<IndexSpec>> {
        let collections = self.collections.lock().expect("store lock poisoned");
        let state = collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionMissing(collection.to_string()))?;
        Ok(state.indexes.clone())
    }

    fn insert(&self, collection: &str, mut document: Document) -> StoreResult<DocumentId> {
        let mut collections = self.collections.lock().expect("store lock poisoned");
        let state = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionMissing(collection.to_string()))?;

        let id = DocumentId::new();
        document.insert(ID_FIELD.to_string(), id.to_value());
        state.documents.push((id, document));
        Ok(id)
    }

    fn get(&self, collection: &str, id: DocumentId) -> StoreResult<Option<Document>> {
        let collections = self.collections.lock().expect("store lock poisoned");
        let state = collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionMissing(collection.to_string()))?;
        Ok(state
            .documents
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, document)| document.clone()))
    }

    fn replace(&self, collection: &str, id: DocumentId, mut document: Document) -> StoreResult<()> {
        let mut collections = self.collections.lock().expect("store lock poisoned");
        let state = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionMissing(collection.to_string()))?;

        let slot = state
            .documents
            .iter_mut()
            .find(|(existing, _)| *existing == id)
            .ok_or(StoreError::DocumentMissing(id))?;

        document.insert(ID_FIELD.to_string(), id.to_value());
        slot.1 = document;
        Ok(())
    }

    fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let collections = self.collections.lock().expect("store lock poisoned");
        let state = collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionMissing(collection.to_string()))?;

        let mut matches: Vec<Document> = state
            .documents
            .iter()
            .filter(|(_, document)| matches_query(document, query))
            .map(|(_, document)| document.clone())
            .collect();

        if let Some((field, direction)) = query.sort_order() {
            // Stable sort keeps write order among ties.
            matches.sort_by(|a, b| {
                let ordering = cmp_optional(a.get(field), b.get(field));
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit_value() {
            matches.truncate(limit);
        }

        Ok(matches)
    }
}

fn matches_query(document: &Document, query: &Query) -> bool {
    for (field, expected) in query.equality_filters() {
        if document.get(field) != Some(expected) {
            return false;
        }
    }

    if let Some(range) = query.range_filter() {
        let Some(value) = document.get(&range.field) else {
            return false;
        };
        if let Some(min) = &range.min {
            if cmp_values(value, min) == Ordering::Less {
                return false;
            }
        }
        if let Some(max) = &range.max {
            if cmp_values(value, max) == Ordering::Greater {
                return false;
            }
        }
    }

    true
}

fn cmp_optional(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp_values(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Total order over the value kinds that appear in filters and sorts.
/// Numbers compare numerically, strings lexicographically (RFC 3339
/// timestamps therefore compare chronologically), booleans false-first.
/// Mixed kinds compare by a fixed type rank.
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().expect("object literal")
    }

    fn store_with_logs() -> MemoryStore {
        let store = MemoryStore::new("hms_audit");
        store.ensure_collection("system_logs").unwrap();
        for (level, ts) in [
            ("INFO", "2025-03-01T10:00:00Z"),
            ("ERROR", "2025-03-01T11:00:00Z"),
            ("INFO", "2025-03-01T12:00:00Z"),
        ] {
            store
                .insert(
                    "system_logs",
                    doc(json!({"level": level, "message": "m", "timestamp": ts})),
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_insert_assigns_distinct_ids() {
        let store = MemoryStore::new("hms_audit");
        store.ensure_collection("audit_logs").unwrap();

        let a = store.insert("audit_logs", doc(json!({"action": "CREATE"}))).unwrap();
        let b = store.insert("audit_logs", doc(json!({"action": "DELETE"}))).unwrap();
        assert_ne!(a, b);

        let fetched = store.get("audit_logs", a).unwrap().unwrap();
        assert_eq!(fetched.get(ID_FIELD), Some(&a.to_value()));
        assert_eq!(fetched.get("action"), Some(&json!("CREATE")));
    }

    #[test]
    fn test_missing_collection_rejected() {
        let store = MemoryStore::new("hms_audit");
        let err = store.insert("nowhere", Document::new()).unwrap_err();
        assert!(matches!(err, StoreError::CollectionMissing(_)));
    }

    #[test]
    fn test_ensure_index_idempotent() {
        let store = MemoryStore::new("hms_audit");
        store.ensure_collection("audit_logs").unwrap();

        let index = IndexSpec::asc("userId");
        store.ensure_index("audit_logs", &index).unwrap();
        store.ensure_index("audit_logs", &index).unwrap();

        assert_eq!(store.list_indexes("audit_logs").unwrap().len(), 1);
    }

    #[test]
    fn test_equality_filter() {
        let store = store_with_logs();
        let results = store
            .query("system_logs", &Query::new().eq("level", "INFO"))
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_range_and_sort() {
        let store = store_with_logs();
        let results = store
            .query(
                "system_logs",
                &Query::new()
                    .between(
                        "timestamp",
                        Some(json!("2025-03-01T10:30:00Z")),
                        None,
                    )
                    .sort_desc("timestamp"),
            )
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get("timestamp"), Some(&json!("2025-03-01T12:00:00Z")));
    }

    #[test]
    fn test_limit_applies_after_sort() {
        let store = store_with_logs();
        let results = store
            .query(
                "system_logs",
                &Query::new().sort_desc("timestamp").limit(1),
            )
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].get("timestamp"), Some(&json!("2025-03-01T12:00:00Z")));
    }

    #[test]
    fn test_replace_keeps_identity_and_order() {
        let store = store_with_logs();
        let first = store
            .query("system_logs", &Query::new().eq("level", "ERROR"))
            .unwrap()
            .remove(0);
        let id: DocumentId = first.get(ID_FIELD).unwrap().as_str().unwrap().parse().unwrap();

        store
            .replace(
                "system_logs",
                id,
                doc(json!({"level": "ERROR", "message": "rewritten", "timestamp": "2025-03-01T11:00:00Z"})),
            )
            .unwrap();

        let fetched = store.get("system_logs", id).unwrap().unwrap();
        assert_eq!(fetched.get("message"), Some(&json!("rewritten")));
        assert_eq!(fetched.get(ID_FIELD), Some(&id.to_value()));
        assert_eq!(store.count("system_logs").unwrap(), 3);
    }

    #[test]
    fn test_replace_missing_document() {
        let store = store_with_logs();
        let err = store
            .replace("system_logs", DocumentId::new(), Document::new())
            .unwrap_err();
        assert!(matches!(err, StoreError::DocumentMissing(_)));
    }
}
