//! Filter translation and directive extraction.
//!
//! Converts flat user-supplied query parameters into a structured
//! [`FilterPredicate`], recognizing `field[op]` comparison keys, and
//! derives [`ListDirectives`] from the reserved control keys.
//!
//! The rewrite is a structured walk over the parsed parameter pairs;
//! nothing is round-tripped through a serialized text form.

use super::types::{
    DEFAULT_LIMIT, DEFAULT_PAGE, FilterCondition, FilterOperator, FilterPredicate, FilterValue,
    ListDirectives, RawQuery, SortDirection, SortKey,
};

/// Control keys that shape the query rather than filter its content.
pub const CONTROL_KEYS: &[&str] = &["select", "sort", "page", "limit"];

/// Translate raw query parameters into a filter predicate.
///
/// Entries whose key is in `excluded_keys` are dropped. A key of the
/// form `field[op]` with `op` in the operator allow-list becomes a
/// comparison condition; any other key (including unrecognized
/// bracketed tokens) is kept verbatim as a literal equality condition.
///
/// Never fails: malformed input degrades to equality conditions, and
/// an empty query yields an empty predicate.
pub fn translate(raw: &RawQuery, excluded_keys: &[&str]) -> FilterPredicate {
    let mut conditions = Vec::new();

    for (key, value) in raw {
        if excluded_keys.contains(&key.as_str()) {
            continue;
        }

        let condition = match split_operator(key) {
            Some((field, operator)) => {
                let value = if operator == FilterOperator::In {
                    FilterValue::parse_list(value)
                } else {
                    FilterValue::parse(value)
                };
                FilterCondition {
                    field: field.to_string(),
                    operator,
                    value,
                }
            }
            // Unrecognized tokens stay part of the field name untouched.
            None => FilterCondition {
                field: key.clone(),
                operator: FilterOperator::Equals,
                value: FilterValue::parse(value),
            },
        };

        conditions.push(condition);
    }

    FilterPredicate { conditions }
}

/// Split a `field[op]` key into its field and recognized operator.
///
/// Returns `None` unless the key nests exactly one of the five
/// allow-listed operator tokens. This is deliberately narrow, not a
/// general expression parser.
fn split_operator(key: &str) -> Option<(&str, FilterOperator)> {
    let open = key.find('[')?;
    if !key.ends_with(']') || open == 0 {
        return None;
    }

    let field = &key[..open];
    let token = &key[open + 1..key.len() - 1];

    let operator = match token {
        "gt" => FilterOperator::GreaterThan,
        "gte" => FilterOperator::GreaterOrEqual,
        "lt" => FilterOperator::LessThan,
        "lte" => FilterOperator::LessOrEqual,
        "in" => FilterOperator::In,
        _ => return None,
    };

    Some((field, operator))
}

/// Derive list directives from the control keys, applying defaults.
///
/// `select` and `sort` are comma-separated; a leading `-` on a sort
/// field means descending. `page` and `limit` fall back to their
/// defaults when absent, non-numeric, or non-positive.
pub fn directives(raw: &RawQuery) -> ListDirectives {
    let mut directives = ListDirectives::default();

    for (key, value) in raw {
        match key.as_str() {
            "select" => {
                directives.fields = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            "sort" => {
                directives.sorts = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|field| match field.strip_prefix('-') {
                        Some(rest) => SortKey {
                            field: rest.to_string(),
                            direction: SortDirection::Desc,
                        },
                        None => SortKey {
                            field: field.to_string(),
                            direction: SortDirection::Asc,
                        },
                    })
                    .collect();
            }
            "page" => {
                directives.page = parse_positive(value).unwrap_or(DEFAULT_PAGE);
            }
            "limit" => {
                directives.limit = parse_positive(value).unwrap_or(DEFAULT_LIMIT);
            }
            _ => {}
        }
    }

    directives
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawQuery {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_query_yields_empty_predicate() {
        let predicate = translate(&raw(&[]), CONTROL_KEYS);
        assert!(predicate.is_empty());
    }

    #[test]
    fn control_keys_only_yields_empty_predicate() {
        let input = raw(&[
            ("select", "name,description"),
            ("sort", "-created_at"),
            ("page", "2"),
            ("limit", "10"),
        ]);
        let predicate = translate(&input, CONTROL_KEYS);
        assert!(predicate.is_empty());
    }

    #[test]
    fn plain_key_becomes_equality() {
        let predicate = translate(&raw(&[("housing", "true")]), CONTROL_KEYS);
        assert_eq!(
            predicate.conditions,
            vec![FilterCondition {
                field: "housing".to_string(),
                operator: FilterOperator::Equals,
                value: FilterValue::Boolean(true),
            }]
        );
    }

    #[test]
    fn operator_tokens_map_to_operators() {
        let cases = [
            ("average_cost[gt]", FilterOperator::GreaterThan),
            ("average_cost[gte]", FilterOperator::GreaterOrEqual),
            ("average_cost[lt]", FilterOperator::LessThan),
            ("average_cost[lte]", FilterOperator::LessOrEqual),
        ];
        for (key, expected) in cases {
            let predicate = translate(&raw(&[(key, "10000")]), CONTROL_KEYS);
            assert_eq!(predicate.conditions[0].field, "average_cost");
            assert_eq!(predicate.conditions[0].operator, expected);
            assert_eq!(predicate.conditions[0].value, FilterValue::Integer(10000));
        }
    }

    #[test]
    fn in_token_splits_value_into_list() {
        let predicate = translate(&raw(&[("careers[in]", "Business,UI/UX")]), CONTROL_KEYS);
        assert_eq!(predicate.conditions[0].operator, FilterOperator::In);
        assert_eq!(
            predicate.conditions[0].value,
            FilterValue::List(vec![
                FilterValue::Text("Business".to_string()),
                FilterValue::Text("UI/UX".to_string()),
            ])
        );
    }

    #[test]
    fn unrecognized_token_stays_literal() {
        let predicate = translate(&raw(&[("average_cost[near]", "10000")]), CONTROL_KEYS);
        assert_eq!(
            predicate.conditions,
            vec![FilterCondition {
                field: "average_cost[near]".to_string(),
                operator: FilterOperator::Equals,
                value: FilterValue::Integer(10000),
            }]
        );
    }

    #[test]
    fn bare_bracket_key_stays_literal() {
        let predicate = translate(&raw(&[("[gt]", "5")]), CONTROL_KEYS);
        assert_eq!(predicate.conditions[0].field, "[gt]");
        assert_eq!(predicate.conditions[0].operator, FilterOperator::Equals);
    }

    #[test]
    fn directives_defaults_from_empty_query() {
        let directives = directives(&raw(&[]));
        assert!(directives.fields.is_empty());
        assert!(directives.sorts.is_empty());
        assert_eq!(directives.page, 1);
        assert_eq!(directives.limit, 25);
    }

    #[test]
    fn directives_parse_select_and_sort() {
        let directives = directives(&raw(&[
            ("select", "name, description"),
            ("sort", "-average_cost,name"),
        ]));
        assert_eq!(directives.fields, vec!["name", "description"]);
        assert_eq!(
            directives.sorts,
            vec![
                SortKey {
                    field: "average_cost".to_string(),
                    direction: SortDirection::Desc,
                },
                SortKey {
                    field: "name".to_string(),
                    direction: SortDirection::Asc,
                },
            ]
        );
    }

    #[test]
    fn non_numeric_page_and_limit_default() {
        let directives = directives(&raw(&[("page", "abc"), ("limit", "-3")]));
        assert_eq!(directives.page, 1);
        assert_eq!(directives.limit, 25);
    }

    #[test]
    fn zero_page_defaults() {
        let directives = directives(&raw(&[("page", "0"), ("limit", "0")]));
        assert_eq!(directives.page, 1);
        assert_eq!(directives.limit, 25);
    }
}
