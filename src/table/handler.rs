//! Request orchestration.
//!
//! ```text
//! base query ──► filters (global, then per column) ──► counts
//!                                                        │
//!            records ◄── pagination ◄── sorting ◄────────┘
//! ```
//!
//! The records query is returned unexecuted; the caller runs it once.

use serde::Serialize;
use tracing::debug;

use crate::executor::QueryExecutor;
use crate::sql::{table_col, Dialect, Expr, Query};

use super::error::TableResult;
use super::filter::apply_filters;
use super::paging::{counts, paginate, RowCounts};
use super::params::RequestParams;
use super::registry::ColumnRegistry;
use super::sort::apply_sort;

/// Counts plus the records query for one table request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub total_rows: u64,
    pub filtered_rows: u64,
    /// Filtered, sorted and paginated; not yet executed.
    pub records: Query,
}

impl QueryResult {
    pub fn counts(&self) -> RowCounts {
        RowCounts {
            total_rows: self.total_rows,
            filtered_rows: self.filtered_rows,
        }
    }

    /// Counts plus the rendered records query, for handing to another process.
    pub fn to_summary(&self, dialect: Dialect) -> QuerySummary {
        let bound = self.records.to_bound_sql(dialect);
        QuerySummary {
            total_rows: self.total_rows,
            filtered_rows: self.filtered_rows,
            sql: bound.sql,
            params: bound.params,
        }
    }
}

/// Serializable form of a [`QueryResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySummary {
    pub total_rows: u64,
    pub filtered_rows: u64,
    pub sql: String,
    pub params: Vec<crate::sql::Value>,
}

/// Answers table requests for one registry.
pub struct TableQuery<'a, E: ?Sized> {
    registry: &'a ColumnRegistry,
    executor: &'a E,
}

impl<'a, E> TableQuery<'a, E>
where
    E: QueryExecutor + ?Sized,
{
    pub fn new(registry: &'a ColumnRegistry, executor: &'a E) -> Self {
        Self { registry, executor }
    }

    pub fn registry(&self) -> &ColumnRegistry {
        self.registry
    }

    /// Filter, count, sort and paginate `base` for `params`.
    ///
    /// Runs one count for the total, one more for the filtered rows only when
    /// the request carries a non-blank filter, and one id selection per HAVING
    /// column under a global filter.
    pub fn query_data(&self, base: Query, params: &RequestParams) -> TableResult<QueryResult> {
        let id = self.id_column();
        let filtered_by_request = params.has_filters();

        let mut filters = params.filter.clone();
        let filtered = apply_filters(self.registry, base.clone(), &mut filters, self.executor)?;

        let RowCounts {
            total_rows,
            filtered_rows,
        } = counts(self.executor, &base, &filtered, filtered_by_request, &id)?;

        let sorted = apply_sort(self.registry, filtered, &params.sort);
        let records = paginate(sorted, params.page, params.size, total_rows);

        debug!(
            total_rows,
            filtered_rows,
            page = params.page,
            "answered table request"
        );

        Ok(QueryResult {
            total_rows,
            filtered_rows,
            records,
        })
    }

    fn id_column(&self) -> Expr {
        table_col(self.registry.primary_table(), self.registry.primary_key())
    }
}
