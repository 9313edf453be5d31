//! Row counting and pagination.

use serde::Serialize;
use tracing::debug;

use crate::executor::QueryExecutor;
use crate::sql::{count_distinct, Expr, Query, SelectExpr};

use super::error::{TableQueryError, TableResult};
use super::params::PageSize;

/// Row counts reported alongside a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RowCounts {
    /// Distinct base rows before filtering.
    pub total_rows: u64,
    /// Distinct base rows after filtering.
    pub filtered_rows: u64,
}

/// Count query for the distinct `id`s of `query`.
///
/// Joins can repeat a base row, so ids are counted distinct. A grouped query
/// selects its group keys ahead of the count and yields one row per group.
pub fn count_query(query: &Query, id: &Expr) -> Query {
    let mut select: Vec<SelectExpr> = query
        .group_by
        .iter()
        .cloned()
        .map(SelectExpr::new)
        .collect();
    select.push(SelectExpr::new(count_distinct(id.clone())));
    query.reselect(select)
}

/// Number of distinct base rows `query` returns.
pub fn count_rows<E>(executor: &E, query: &Query, id: &Expr) -> TableResult<u64>
where
    E: QueryExecutor + ?Sized,
{
    let result = executor
        .count(&count_query(query, id))
        .map_err(TableQueryError::executor)?;
    Ok(result.rows())
}

/// Count the base query and, only when a filter was applied, the filtered one.
pub fn counts<E>(
    executor: &E,
    base: &Query,
    filtered: &Query,
    filtered_by_request: bool,
    id: &Expr,
) -> TableResult<RowCounts>
where
    E: QueryExecutor + ?Sized,
{
    let total_rows = count_rows(executor, base, id)?;
    let filtered_rows = if filtered_by_request {
        count_rows(executor, filtered, id)?
    } else {
        total_rows
    };

    debug!(total_rows, filtered_rows, "counted rows");
    Ok(RowCounts {
        total_rows,
        filtered_rows,
    })
}

/// Limit `query` to one page.
///
/// Nothing is limited for `PageSize::All` or when a page holds every row.
pub fn paginate(query: Query, page: u64, size: PageSize, total_rows: u64) -> Query {
    match size {
        PageSize::All => {
            debug!("page size is all, not paginating");
            query
        }
        PageSize::Rows(rows) if rows >= total_rows => {
            debug!(rows, total_rows, "page holds every row, not paginating");
            query
        }
        PageSize::Rows(rows) => {
            // SQL offsets are signed
            let offset = rows.saturating_mul(page).min(i64::MAX as u64);
            debug!(limit = rows, offset, "paginating");
            query.limit(rows).offset(offset)
        }
    }
}
