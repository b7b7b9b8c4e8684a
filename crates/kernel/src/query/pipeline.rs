//! List pipeline orchestration.
//!
//! Composes directive extraction, filter translation, query shaping,
//! and pagination into one operation: raw query parameters in, a page
//! of results plus pagination metadata out.

use anyhow::{Context, Result};
use sqlx::PgPool;

use super::builder::ListQueryBuilder;
use super::paginate;
use super::translate::{self, CONTROL_KEYS};
use super::types::{ListPage, RawQuery};

/// Entity-generic list pipeline over a single table.
///
/// Each call constructs its own predicate and directives from scratch;
/// the pipeline holds no per-request state.
pub struct ListPipeline {
    pool: PgPool,
    table: String,
}

impl ListPipeline {
    /// Create a pipeline for `table`.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Execute the pipeline for one request.
    ///
    /// The count and the page fetch run sequentially inside a single
    /// transaction so the total and the returned rows cannot disagree
    /// under concurrent writes. The count covers the same filtered
    /// predicate the fetch uses. Storage faults propagate to the
    /// caller unchanged; no retries.
    pub async fn list(&self, raw: &RawQuery) -> Result<ListPage> {
        let directives = translate::directives(raw);
        let predicate = translate::translate(raw, CONTROL_KEYS);

        let builder = ListQueryBuilder::new(self.table.as_str(), predicate, directives.clone());

        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin list transaction")?;

        // Statement timeout applies within this transaction only.
        sqlx::query("SET LOCAL statement_timeout = '10s'")
            .execute(&mut *tx)
            .await
            .context("failed to set statement timeout")?;

        let count_sql = builder.build_count();
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&mut *tx)
            .await
            .context("failed to execute count query")?;

        let main_sql = builder.build();
        let items: Vec<serde_json::Value> =
            sqlx::query_scalar(&format!("SELECT row_to_json(t) FROM ({main_sql}) t"))
                .fetch_all(&mut *tx)
                .await
                .context("failed to execute list query")?;

        tx.commit()
            .await
            .context("failed to commit list transaction")?;

        let pagination = paginate::metadata(directives.page, directives.limit, total as u64);

        Ok(ListPage {
            count: items.len(),
            items,
            pagination,
        })
    }
}
