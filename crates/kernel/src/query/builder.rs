//! List query builder using SeaQuery.
//!
//! Shapes a [`FilterPredicate`] and [`ListDirectives`] into SQL:
//! field projection, multi-key sort, WHERE conditions, and the
//! skip/take window. Builds a deferred query description; execution
//! belongs to the pipeline.

use sea_query::{
    Alias, Asterisk, Expr, ExprTrait, Order, PostgresQueryBuilder, Query, SelectStatement,
    SimpleExpr, Value,
};

use super::types::{
    FilterCondition, FilterOperator, FilterPredicate, FilterValue, ListDirectives, SortDirection,
};

/// Identifier column the storage layer always includes in projections.
const ID_COLUMN: &str = "id";

/// Default sort applied when no sort directive is given.
const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Query builder for list-pipeline queries against a single table.
pub struct ListQueryBuilder {
    table: String,
    predicate: FilterPredicate,
    directives: ListDirectives,
}

impl ListQueryBuilder {
    /// Create a new builder over `table`.
    pub fn new(
        table: impl Into<String>,
        predicate: FilterPredicate,
        directives: ListDirectives,
    ) -> Self {
        Self {
            table: table.into(),
            predicate,
            directives,
        }
    }

    /// Build the main SELECT with projection, sort, and pagination.
    pub fn build(&self) -> String {
        let mut query = Query::select();

        self.add_select_fields(&mut query);
        query.from(Alias::new(&self.table));
        self.add_filters(&mut query);
        self.add_sorts(&mut query);

        let offset = self.directives.page.saturating_sub(1) * self.directives.limit;
        query.limit(self.directives.limit);
        query.offset(offset);

        query.to_string(PostgresQueryBuilder)
    }

    /// Build the COUNT query over the same predicate.
    pub fn build_count(&self) -> String {
        let mut query = Query::select();

        query.expr(Expr::col(Asterisk).count());
        query.from(Alias::new(&self.table));
        self.add_filters(&mut query);

        query.to_string(PostgresQueryBuilder)
    }

    /// Add SELECT fields to the query.
    ///
    /// The identifier column is always included alongside any
    /// requested projection.
    fn add_select_fields(&self, query: &mut SelectStatement) {
        if self.directives.fields.is_empty() {
            query.column((Alias::new(&self.table), Asterisk));
            return;
        }

        if !self.directives.fields.iter().any(|f| f == ID_COLUMN) {
            query.column((Alias::new(&self.table), Alias::new(ID_COLUMN)));
        }
        for field in &self.directives.fields {
            query.column((Alias::new(&self.table), Alias::new(field)));
        }
    }

    /// Add WHERE conditions from the predicate.
    fn add_filters(&self, query: &mut SelectStatement) {
        for condition in &self.predicate.conditions {
            if let Some(expr) = self.build_filter_condition(condition) {
                query.and_where(expr);
            }
        }
    }

    /// Build a single filter condition.
    fn build_filter_condition(&self, condition: &FilterCondition) -> Option<SimpleExpr> {
        let col = Expr::col((Alias::new(&self.table), Alias::new(&condition.field)));

        match condition.operator {
            FilterOperator::Equals => Some(col.eq(sea_value(&condition.value)?)),
            FilterOperator::GreaterThan => Some(col.gt(sea_value(&condition.value)?)),
            FilterOperator::GreaterOrEqual => Some(col.gte(sea_value(&condition.value)?)),
            FilterOperator::LessThan => Some(col.lt(sea_value(&condition.value)?)),
            FilterOperator::LessOrEqual => Some(col.lte(sea_value(&condition.value)?)),
            FilterOperator::In => {
                let values = extract_value_list(&condition.value);
                if values.is_empty() {
                    return None;
                }
                Some(col.is_in(values))
            }
        }
    }

    /// Add ORDER BY clauses, falling back to creation time descending.
    fn add_sorts(&self, query: &mut SelectStatement) {
        if self.directives.sorts.is_empty() {
            query.order_by(
                (Alias::new(&self.table), Alias::new(DEFAULT_SORT_COLUMN)),
                Order::Desc,
            );
            return;
        }

        for sort in &self.directives.sorts {
            let order = match sort.direction {
                SortDirection::Asc => Order::Asc,
                SortDirection::Desc => Order::Desc,
            };
            query.order_by((Alias::new(&self.table), Alias::new(&sort.field)), order);
        }
    }
}

/// Convert a scalar filter value to a bindable SQL value.
fn sea_value(value: &FilterValue) -> Option<Value> {
    match value {
        FilterValue::Integer(i) => Some(Value::from(*i)),
        FilterValue::Float(f) => Some(Value::from(*f)),
        FilterValue::Boolean(b) => Some(Value::from(*b)),
        FilterValue::Text(s) => Some(Value::from(s.clone())),
        FilterValue::List(_) => None,
    }
}

/// Extract a list of scalar values from a filter value.
fn extract_value_list(value: &FilterValue) -> Vec<Value> {
    match value {
        FilterValue::List(items) => items.iter().filter_map(sea_value).collect(),
        scalar => sea_value(scalar).into_iter().collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::query::types::{FilterCondition, SortKey};

    fn predicate(conditions: Vec<FilterCondition>) -> FilterPredicate {
        FilterPredicate { conditions }
    }

    #[test]
    fn simple_query_build() {
        let directives = ListDirectives::default();
        let builder = ListQueryBuilder::new(
            "bootcamp",
            predicate(vec![FilterCondition {
                field: "housing".to_string(),
                operator: FilterOperator::Equals,
                value: FilterValue::Boolean(true),
            }]),
            directives,
        );
        let sql = builder.build();

        assert!(sql.contains("FROM \"bootcamp\""));
        assert!(sql.contains("\"housing\" = TRUE"));
        assert!(sql.contains("LIMIT 25"));
        assert!(sql.contains("OFFSET 0"));
    }

    #[test]
    fn count_query_omits_pagination_and_sort() {
        let builder = ListQueryBuilder::new(
            "bootcamp",
            predicate(vec![FilterCondition {
                field: "average_cost".to_string(),
                operator: FilterOperator::LessOrEqual,
                value: FilterValue::Integer(10000),
            }]),
            ListDirectives::default(),
        );
        let sql = builder.build_count();

        assert!(sql.contains("COUNT(*)"));
        assert!(sql.contains("\"average_cost\" <= 10000"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("ORDER BY"));
    }

    #[test]
    fn comparison_operators_render() {
        let cases = [
            (FilterOperator::GreaterThan, "\"weeks\" > 4"),
            (FilterOperator::GreaterOrEqual, "\"weeks\" >= 4"),
            (FilterOperator::LessThan, "\"weeks\" < 4"),
            (FilterOperator::LessOrEqual, "\"weeks\" <= 4"),
        ];
        for (operator, expected) in cases {
            let builder = ListQueryBuilder::new(
                "course",
                predicate(vec![FilterCondition {
                    field: "weeks".to_string(),
                    operator,
                    value: FilterValue::Integer(4),
                }]),
                ListDirectives::default(),
            );
            let sql = builder.build();
            assert!(sql.contains(expected), "missing {expected} in: {sql}");
        }
    }

    #[test]
    fn in_operator_renders_value_list() {
        let builder = ListQueryBuilder::new(
            "course",
            predicate(vec![FilterCondition {
                field: "minimum_skill".to_string(),
                operator: FilterOperator::In,
                value: FilterValue::List(vec![
                    FilterValue::Text("beginner".to_string()),
                    FilterValue::Text("intermediate".to_string()),
                ]),
            }]),
            ListDirectives::default(),
        );
        let sql = builder.build();

        assert!(sql.contains("IN"), "missing IN clause: {sql}");
        assert!(sql.contains("'beginner'"), "{sql}");
        assert!(sql.contains("'intermediate'"), "{sql}");
    }

    #[test]
    fn empty_in_list_is_skipped() {
        let builder = ListQueryBuilder::new(
            "course",
            predicate(vec![FilterCondition {
                field: "minimum_skill".to_string(),
                operator: FilterOperator::In,
                value: FilterValue::List(vec![]),
            }]),
            ListDirectives::default(),
        );
        let sql = builder.build();

        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[test]
    fn projection_always_includes_id() {
        let directives = ListDirectives {
            fields: vec!["name".to_string(), "description".to_string()],
            ..Default::default()
        };
        let builder = ListQueryBuilder::new("bootcamp", FilterPredicate::default(), directives);
        let sql = builder.build();

        assert!(sql.contains("\"bootcamp\".\"id\""), "{sql}");
        assert!(sql.contains("\"bootcamp\".\"name\""), "{sql}");
        assert!(!sql.contains("*"), "{sql}");
    }

    #[test]
    fn default_sort_is_created_at_desc() {
        let builder = ListQueryBuilder::new(
            "bootcamp",
            FilterPredicate::default(),
            ListDirectives::default(),
        );
        let sql = builder.build();

        assert!(sql.contains("ORDER BY \"bootcamp\".\"created_at\" DESC"), "{sql}");
    }

    #[test]
    fn explicit_sorts_apply_in_order() {
        let directives = ListDirectives {
            sorts: vec![
                SortKey {
                    field: "average_cost".to_string(),
                    direction: SortDirection::Desc,
                },
                SortKey {
                    field: "name".to_string(),
                    direction: SortDirection::Asc,
                },
            ],
            ..Default::default()
        };
        let builder = ListQueryBuilder::new("bootcamp", FilterPredicate::default(), directives);
        let sql = builder.build();

        let cost = sql.find("\"average_cost\" DESC").unwrap();
        let name = sql.find("\"name\" ASC").unwrap();
        assert!(cost < name, "sort keys out of order: {sql}");
    }

    #[test]
    fn pagination_offset() {
        let directives = ListDirectives {
            page: 3,
            limit: 10,
            ..Default::default()
        };
        let builder = ListQueryBuilder::new("bootcamp", FilterPredicate::default(), directives);
        let sql = builder.build();

        assert!(sql.contains("LIMIT 10"));
        assert!(sql.contains("OFFSET 20"));
    }

    #[test]
    fn text_values_are_escaped() {
        let builder = ListQueryBuilder::new(
            "bootcamp",
            predicate(vec![FilterCondition {
                field: "name".to_string(),
                operator: FilterOperator::Equals,
                value: FilterValue::Text("O'Reilly Camp".to_string()),
            }]),
            ListDirectives::default(),
        );
        let sql = builder.build();

        assert!(sql.contains("O''Reilly Camp"), "quote not escaped: {sql}");
    }
}
