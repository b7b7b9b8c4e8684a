//! List-query pipeline types.
//!
//! Provides the building blocks the pipeline passes between its stages:
//! - FilterPredicate: structured, field-scoped conditions
//! - ListDirectives: client-supplied shape/order/paging instructions
//! - PaginationMeta: next/previous page descriptors
//! - ListPage: one executed page of results

use serde::{Deserialize, Serialize};

/// Raw query parameters as received from a request, in arrival order.
///
/// Never mutated in place; every pipeline stage derives its own data
/// from a borrowed view.
pub type RawQuery = Vec<(String, String)>;

/// Comparison operators recognized in filter conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Exact match.
    Equals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessOrEqual,
    /// Value in list.
    In,
}

/// Filter value types.
///
/// Raw query values are strings; `parse` types them on a best-effort
/// basis so the storage layer can compare numerically where possible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterValue {
    /// Integer value.
    Integer(i64),
    /// Float value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// String value.
    Text(String),
    /// List of values (for the In operator).
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Parse a raw string value into the narrowest matching type.
    pub fn parse(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            return FilterValue::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return FilterValue::Float(f);
        }
        match raw {
            "true" => FilterValue::Boolean(true),
            "false" => FilterValue::Boolean(false),
            _ => FilterValue::Text(raw.to_string()),
        }
    }

    /// Parse a comma-separated raw value into a list.
    pub fn parse_list(raw: &str) -> Self {
        FilterValue::List(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(FilterValue::parse)
                .collect(),
        )
    }

    /// Convert to string representation.
    pub fn as_string(&self) -> Option<String> {
        match self {
            FilterValue::Text(s) => Some(s.clone()),
            FilterValue::Integer(i) => Some(i.to_string()),
            FilterValue::Float(f) => Some(f.to_string()),
            FilterValue::Boolean(b) => Some(b.to_string()),
            FilterValue::List(_) => None,
        }
    }
}

/// A single (field, operator, value) condition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterCondition {
    /// Field to filter on.
    pub field: String,

    /// Comparison operator.
    pub operator: FilterOperator,

    /// Value to compare against.
    pub value: FilterValue,
}

/// A structured, field-scoped set of conditions.
///
/// Built once per request; immutable thereafter. An empty predicate
/// matches all records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterPredicate {
    pub conditions: Vec<FilterCondition>,
}

impl FilterPredicate {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort specification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort by.
    pub field: String,

    /// Sort direction.
    pub direction: SortDirection,
}

/// Default page number when absent or unparseable.
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size when absent or unparseable.
pub const DEFAULT_LIMIT: u64 = 25;

/// Client-supplied shape/order/paging directives.
///
/// `fields` empty means all fields. `sorts` empty means the default
/// creation-time-descending order, applied by the query builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListDirectives {
    /// Fields to project (empty = all fields).
    pub fields: Vec<String>,

    /// Sort keys applied in order; ties broken by subsequent keys.
    pub sorts: Vec<SortKey>,

    /// Page number (1-indexed).
    pub page: u64,

    /// Items per page.
    pub limit: u64,
}

impl Default for ListDirectives {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            sorts: Vec::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Reference to an adjacent page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRef {
    pub page: u64,
    pub limit: u64,
}

/// Next/previous page descriptors for a result page.
///
/// `next` is present iff more records exist past the current window;
/// `prev` iff the window does not start at the first record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

/// One executed page of results.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage {
    /// Query results as JSON values.
    pub items: Vec<serde_json::Value>,

    /// Size of this page (not the total match count).
    pub count: usize,

    /// Next/previous descriptors.
    pub pagination: PaginationMeta,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn filter_value_parse_narrows_types() {
        assert_eq!(FilterValue::parse("42"), FilterValue::Integer(42));
        assert_eq!(FilterValue::parse("4.5"), FilterValue::Float(4.5));
        assert_eq!(FilterValue::parse("true"), FilterValue::Boolean(true));
        assert_eq!(
            FilterValue::parse("boston"),
            FilterValue::Text("boston".to_string())
        );
    }

    #[test]
    fn filter_value_parse_list_splits_on_commas() {
        let list = FilterValue::parse_list("Business, Web Development,10");
        let FilterValue::List(items) = list else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], FilterValue::Text("Business".to_string()));
        assert_eq!(items[2], FilterValue::Integer(10));
    }

    #[test]
    fn directives_defaults() {
        let directives = ListDirectives::default();
        assert!(directives.fields.is_empty());
        assert!(directives.sorts.is_empty());
        assert_eq!(directives.page, 1);
        assert_eq!(directives.limit, 25);
    }

    #[test]
    fn pagination_meta_omits_absent_links() {
        let meta = PaginationMeta {
            next: Some(PageRef { page: 2, limit: 25 }),
            prev: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["next"]["page"], 2);
        assert!(json.get("prev").is_none());
    }
}
