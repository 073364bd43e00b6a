//! Read query description.
//!
//! A [`Query`] expresses the access patterns this layer supports: equality
//! filters, at most one inclusive range filter, an optional single-field
//! sort, and a limit. The collection manager refuses any combination the
//! family's index set cannot serve.

use serde_json::Value;

use crate::index::{Direction, QueryShape};

/// Inclusive range filter over one field.
#[derive(Debug, Clone)]
pub struct RangeFilter {
    /// Filtered field.
    pub field: String,
    /// Lower bound, if any.
    pub min: Option<Value>,
    /// Upper bound, if any.
    pub max: Option<Value>,
}

/// A read-only query against one collection.
#[derive(Debug, Clone, Default)]
pub struct Query {
    equality: Vec<(String, Value)>,
    range: Option<RangeFilter>,
    sort: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl Query {
    /// An unconstrained query. Filters are added with the builder methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equality.push((field.into(), value.into()));
        self
    }

    /// Sets the range filter. Bounds are inclusive; either may be open.
    pub fn between(
        mut self,
        field: impl Into<String>,
        min: Option<Value>,
        max: Option<Value>,
    ) -> Self {
        self.range = Some(RangeFilter {
            field: field.into(),
            min,
            max,
        });
        self
    }

    /// Requests ascending order on a field.
    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some((field.into(), Direction::Ascending));
        self
    }

    /// Requests descending order on a field ("most recent first").
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some((field.into(), Direction::Descending));
        self
    }

    /// Caps the number of returned documents.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The equality filters.
    pub fn equality_filters(&self) -> &[(String, Value)] {
        &self.equality
    }

    /// The range filter, if any.
    pub fn range_filter(&self) -> Option<&RangeFilter> {
        self.range.as_ref()
    }

    /// The requested ordering, if any.
    pub fn sort_order(&self) -> Option<(&str, Direction)> {
        self.sort.as_ref().map(|(f, d)| (f.as_str(), *d))
    }

    /// The result cap, if any.
    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// True when the query carries no filter and no ordering.
    pub fn is_unconstrained(&self) -> bool {
        self.equality.is_empty() && self.range.is_none() && self.sort.is_none()
    }

    /// The index-relevant outline of this query.
    pub fn shape(&self) -> QueryShape {
        QueryShape {
            equality: self.equality.iter().map(|(f, _)| f.clone()).collect(),
            range: self.range.as_ref().map(|r| r.field.clone()),
            sort: self.sort.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_reflects_filters() {
        let query = Query::new()
            .eq("patientId", 1)
            .between("recordDate", Some(json!("2025-01-01T00:00:00Z")), None)
            .sort_desc("recordDate")
            .limit(10);

        let shape = query.shape();
        assert_eq!(shape.equality, vec!["patientId"]);
        assert_eq!(shape.range.as_deref(), Some("recordDate"));
        assert_eq!(
            shape.sort,
            Some(("recordDate".to_string(), Direction::Descending))
        );
        assert!(!query.is_unconstrained());
    }

    #[test]
    fn test_unconstrained_query() {
        assert!(Query::new().is_unconstrained());
        assert!(Query::new().limit(5).is_unconstrained());
        assert!(!Query::new().eq("userId", 1).is_unconstrained());
    }
}
