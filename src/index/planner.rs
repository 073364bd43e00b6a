//! Index planning.
//!
//! Each entity family declares the query patterns its callers are expected
//! to run. The planner turns that declaration into the family's index set,
//! and at query time picks the index that serves a concrete query through
//! a prefix match. Queries no planned index can serve are refused upstream
//! rather than answered with a collection scan.

use super::spec::{Direction, IndexSpec};

/// One anticipated query pattern: zero or more equality-filtered fields,
/// optionally followed by one range- or order-scanned field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPattern {
    equality: Vec<String>,
    range: Option<(String, Direction)>,
}

impl QueryPattern {
    /// Point lookup on a single field.
    pub fn point(field: impl Into<String>) -> Self {
        Self {
            equality: vec![field.into()],
            range: None,
        }
    }

    /// Lookup on several equality-filtered fields together.
    pub fn lookup(fields: &[&str]) -> Self {
        debug_assert!(!fields.is_empty());
        Self {
            equality: fields.iter().map(|f| (*f).to_string()).collect(),
            range: None,
        }
    }

    /// Range or order scan over a single field.
    pub fn scan(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            equality: Vec::new(),
            range: Some((field.into(), direction)),
        }
    }

    /// Appends a range scan to an equality lookup. The equality fields stay
    /// ahead of the scanned field in the derived index.
    pub fn then_scan(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.range = Some((field.into(), direction));
        self
    }

    /// Derives the index that serves this pattern.
    pub fn index_spec(&self) -> IndexSpec {
        let mut keys: Vec<(String, Direction)> = self
            .equality
            .iter()
            .map(|f| (f.clone(), Direction::Ascending))
            .collect();
        if let Some((field, direction)) = &self.range {
            keys.push((field.clone(), *direction));
        }
        // Constructors guarantee at least one key.
        IndexSpec::compound(keys).expect("query pattern with no fields")
    }
}

/// The index-relevant outline of a concrete query: which fields are
/// equality-filtered, which field is range-filtered, and the requested
/// ordering.
#[derive(Debug, Clone, Default)]
pub struct QueryShape {
    /// Equality-filtered field names.
    pub equality: Vec<String>,
    /// Range-filtered field name, if any.
    pub range: Option<String>,
    /// Requested ordering, if any.
    pub sort: Option<(String, Direction)>,
}

impl QueryShape {
    /// True when the query carries no filter and no ordering.
    pub fn is_empty(&self) -> bool {
        self.equality.is_empty() && self.range.is_none() && self.sort.is_none()
    }

    /// Every field the shape touches, for diagnostics.
    pub fn fields(&self) -> Vec<String> {
        let mut fields = self.equality.clone();
        if let Some(range) = &self.range {
            if !fields.contains(range) {
                fields.push(range.clone());
            }
        }
        if let Some((sort, _)) = &self.sort {
            if !fields.contains(sort) {
                fields.push(sort.clone());
            }
        }
        fields
    }
}

/// Derives and selects indexes from declared query patterns.
pub struct IndexPlanner;

impl IndexPlanner {
    /// The ordered index set for a pattern declaration.
    ///
    /// Patterns that derive the same index collapse to one entry; the first
    /// occurrence keeps its position.
    pub fn plan(patterns: &[QueryPattern]) -> Vec<IndexSpec> {
        let mut specs: Vec<IndexSpec> = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let spec = pattern.index_spec();
            if !specs.contains(&spec) {
                specs.push(spec);
            }
        }
        specs
    }

    /// Picks the index that serves a query shape, if one exists.
    ///
    /// An index qualifies when its leading keys cover exactly the shape's
    /// equality fields (as a set; order among equalities is not
    /// significant) and, when a range filter is present, the next key is
    /// the range field. Among qualifying indexes, one whose next key also
    /// matches the requested sort field wins; an index can be traversed in
    /// reverse, so sort direction never disqualifies it.
    pub fn select<'a>(indexes: &'a [IndexSpec], shape: &QueryShape) -> Option<&'a IndexSpec> {
        if shape.is_empty() {
            return None;
        }

        let mut fallback: Option<&IndexSpec> = None;
        for spec in indexes {
            if !Self::prefix_covers(spec, &shape.equality) {
                continue;
            }
            let next = spec.key_at(shape.equality.len()).map(|(f, _)| f);
            if let Some(range_field) = &shape.range {
                if next != Some(range_field.as_str()) {
                    continue;
                }
            } else if shape.equality.is_empty() {
                // Pure sort: the leading key must be the sort field.
                match (&shape.sort, next) {
                    (Some((sort_field, _)), Some(first)) if first == sort_field => {}
                    _ => continue,
                }
            }

            match &shape.sort {
                Some((sort_field, _)) if next == Some(sort_field.as_str()) => return Some(spec),
                Some(_) => fallback = fallback.or(Some(spec)),
                None => return Some(spec),
            }
        }
        fallback
    }

    fn prefix_covers(spec: &IndexSpec, equality: &[String]) -> bool {
        if spec.keys().len() < equality.len() {
            return false;
        }
        let prefix = &spec.keys()[..equality.len()];
        equality.len() == prefix.len()
            && equality
                .iter()
                .all(|field| prefix.iter().any(|(key, _)| key == field))
            && prefix
                .iter()
                .all(|(key, _)| equality.iter().any(|field| field == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_patterns() -> Vec<QueryPattern> {
        vec![
            QueryPattern::point("patientId"),
            QueryPattern::point("doctorId"),
            QueryPattern::scan("recordDate", Direction::Descending),
            QueryPattern::point("patientId").then_scan("recordDate", Direction::Descending),
        ]
    }

    #[test]
    fn test_plan_preserves_declaration_order() {
        let specs = IndexPlanner::plan(&record_patterns());
        let names: Vec<String> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "patientId_1",
                "doctorId_1",
                "recordDate_-1",
                "patientId_1_recordDate_-1",
            ]
        );
    }

    #[test]
    fn test_plan_collapses_duplicate_patterns() {
        let patterns = vec![
            QueryPattern::point("userId"),
            QueryPattern::lookup(&["userId"]),
        ];
        assert_eq!(IndexPlanner::plan(&patterns).len(), 1);
    }

    #[test]
    fn test_select_equality_then_range() {
        let specs = IndexPlanner::plan(&record_patterns());
        let shape = QueryShape {
            equality: vec!["patientId".into()],
            range: Some("recordDate".into()),
            sort: Some(("recordDate".into(), Direction::Descending)),
        };
        let chosen = IndexPlanner::select(&specs, &shape).unwrap();
        assert_eq!(chosen.name(), "patientId_1_recordDate_-1");
    }

    #[test]
    fn test_select_reverse_traversal_allowed() {
        let specs = IndexPlanner::plan(&record_patterns());
        let shape = QueryShape {
            equality: vec!["patientId".into()],
            range: None,
            sort: Some(("recordDate".into(), Direction::Ascending)),
        };
        let chosen = IndexPlanner::select(&specs, &shape).unwrap();
        assert_eq!(chosen.name(), "patientId_1_recordDate_-1");
    }

    #[test]
    fn test_select_compound_equality_set() {
        let patterns = vec![QueryPattern::lookup(&["entityType", "entityId"])];
        let specs = IndexPlanner::plan(&patterns);

        // Equality fields may arrive in any order.
        let shape = QueryShape {
            equality: vec!["entityId".into(), "entityType".into()],
            range: None,
            sort: None,
        };
        assert!(IndexPlanner::select(&specs, &shape).is_some());
    }

    #[test]
    fn test_select_falls_back_when_sort_unserved() {
        let patterns = vec![QueryPattern::lookup(&["entityType", "entityId"])];
        let specs = IndexPlanner::plan(&patterns);

        let shape = QueryShape {
            equality: vec!["entityType".into(), "entityId".into()],
            range: None,
            sort: Some(("timestamp".into(), Direction::Descending)),
        };
        // The compound index narrows the match set; ordering happens on it.
        let chosen = IndexPlanner::select(&specs, &shape).unwrap();
        assert_eq!(chosen.name(), "entityType_1_entityId_1");
    }

    #[test]
    fn test_select_refuses_uncovered_equality() {
        let specs = IndexPlanner::plan(&record_patterns());
        let shape = QueryShape {
            equality: vec!["appointmentId".into()],
            range: None,
            sort: None,
        };
        assert!(IndexPlanner::select(&specs, &shape).is_none());
    }

    #[test]
    fn test_select_pure_time_scan() {
        let specs = IndexPlanner::plan(&record_patterns());
        let shape = QueryShape {
            equality: Vec::new(),
            range: Some("recordDate".into()),
            sort: Some(("recordDate".into(), Direction::Descending)),
        };
        let chosen = IndexPlanner::select(&specs, &shape).unwrap();
        assert_eq!(chosen.name(), "recordDate_-1");
    }

    #[test]
    fn test_empty_shape_selects_nothing() {
        let specs = IndexPlanner::plan(&record_patterns());
        assert!(IndexPlanner::select(&specs, &QueryShape::default()).is_none());
    }
}
