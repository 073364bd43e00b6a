//! Secondary index descriptions.
//!
//! An [`IndexSpec`] is a non-empty ordered list of `(field, direction)`
//! keys. Field order is load-bearing: a compound index serves a query only
//! through a prefix of its key list, with equality-filtered fields placed
//! before the range- or sort-ordered field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Traversal direction of one index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// The conventional numeric form (`1` ascending, `-1` descending).
    pub fn signum(&self) -> i32 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signum())
    }
}

/// An ordered, non-empty list of index keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpec {
    keys: Vec<(String, Direction)>,
}

impl IndexSpec {
    /// Builds a compound index from an ordered key list.
    ///
    /// Returns `None` for an empty key list; an index over nothing is
    /// meaningless and always a caller bug.
    pub fn compound(keys: Vec<(String, Direction)>) -> Option<Self> {
        if keys.is_empty() {
            return None;
        }
        Some(Self { keys })
    }

    /// A single-field ascending index.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            keys: vec![(field.into(), Direction::Ascending)],
        }
    }

    /// A single-field descending index.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            keys: vec![(field.into(), Direction::Descending)],
        }
    }

    /// The ordered key list.
    pub fn keys(&self) -> &[(String, Direction)] {
        &self.keys
    }

    /// The key at a position, if any.
    pub fn key_at(&self, position: usize) -> Option<(&str, Direction)> {
        self.keys.get(position).map(|(f, d)| (f.as_str(), *d))
    }

    /// Conventional index name, e.g. `patientId_1_recordDate_-1`.
    pub fn name(&self) -> String {
        let parts: Vec<String> = self
            .keys
            .iter()
            .map(|(field, dir)| format!("{}_{}", field, dir.signum()))
            .collect();
        parts.join("_")
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_names() {
        assert_eq!(IndexSpec::asc("patientId").name(), "patientId_1");
        assert_eq!(IndexSpec::desc("recordDate").name(), "recordDate_-1");
    }

    #[test]
    fn test_compound_name_preserves_order() {
        let spec = IndexSpec::compound(vec![
            ("patientId".into(), Direction::Ascending),
            ("recordDate".into(), Direction::Descending),
        ])
        .unwrap();
        assert_eq!(spec.name(), "patientId_1_recordDate_-1");
    }

    #[test]
    fn test_empty_compound_rejected() {
        assert!(IndexSpec::compound(Vec::new()).is_none());
    }

    #[test]
    fn test_direction_reversal() {
        assert_eq!(Direction::Ascending.reversed(), Direction::Descending);
        assert_eq!(Direction::Descending.signum(), -1);
    }
}
