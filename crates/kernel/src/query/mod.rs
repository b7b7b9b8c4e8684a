//! Generic list-query pipeline.
//!
//! Every list endpoint runs the same four stages: derive directives
//! from the control keys, translate the remaining parameters into a
//! filter predicate, shape and bound the query, then execute count and
//! fetch in one transaction.

mod builder;
mod paginate;
mod pipeline;
mod translate;
mod types;

pub use builder::ListQueryBuilder;
pub use paginate::{PageWindow, metadata, window};
pub use pipeline::ListPipeline;
pub use translate::{CONTROL_KEYS, directives, translate};
pub use types::{
    FilterCondition, FilterOperator, FilterPredicate, FilterValue, ListDirectives, ListPage,
    PageRef, PaginationMeta, RawQuery, SortDirection, SortKey,
};
