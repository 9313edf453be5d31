//! Filter engine.
//!
//! Filtering runs in two phases:
//!
//! 1. **Global**: the value in the global column's slot is compiled against
//!    every filterable column and the predicates are ORed into one WHERE
//!    condition. HAVING predicates can't sit inside a WHERE disjunction, so
//!    each one is resolved first to the ids of the matching groups and joins
//!    the disjunction as `id IN (...)`. The global slot is then removed from
//!    the filter map.
//! 2. **Per column**: every remaining slot is compiled against the column at
//!    its position. WHERE predicates are ANDed into the WHERE clause, HAVING
//!    predicates into the HAVING clause.

use tracing::debug;

use crate::executor::QueryExecutor;
use crate::sql::{table_col, Expr, ExprExt, Query};

use super::column::Predicate;
use super::compiler::{compile, is_blank};
use super::error::{TableQueryError, TableResult};
use super::params::FilterMap;
use super::registry::ColumnRegistry;

/// Apply the global filter, then the per-column filters.
///
/// The global slot is removed from `filters` before the per-column phase.
pub fn apply_filters<E>(
    registry: &ColumnRegistry,
    query: Query,
    filters: &mut FilterMap,
    executor: &E,
) -> TableResult<Query>
where
    E: QueryExecutor + ?Sized,
{
    let query = apply_global_filter(registry, query, filters, executor)?;
    Ok(apply_column_filters(registry, query, filters))
}

/// Broadcast the global filter value across all filterable columns.
pub fn apply_global_filter<E>(
    registry: &ColumnRegistry,
    query: Query,
    filters: &mut FilterMap,
    executor: &E,
) -> TableResult<Query>
where
    E: QueryExecutor + ?Sized,
{
    let Some(global) = registry.global() else {
        return Ok(query);
    };
    let Some(value) = filters.remove(&global.position()) else {
        return Ok(query);
    };
    if is_blank(&value) {
        return Ok(query);
    }

    match global_predicate(registry, &query, &value, executor)? {
        Some(predicate) => Ok(query.filter(predicate)),
        None => Ok(query),
    }
}

/// OR of every filterable column's predicate for `value`.
///
/// Noop columns are left out. HAVING predicates are run against `base` as
/// an id selection.
pub fn global_predicate<E>(
    registry: &ColumnRegistry,
    base: &Query,
    value: &str,
    executor: &E,
) -> TableResult<Option<Expr>>
where
    E: QueryExecutor + ?Sized,
{
    let mut terms = Vec::new();
    let mut having_columns = 0;

    for spec in registry.columns().iter().filter(|c| !c.is_noop()) {
        match compile(spec, value) {
            Some(Predicate::Where(expr)) => terms.push(expr),
            Some(Predicate::Having(expr)) => {
                having_columns += 1;
                terms.push(matching_ids(registry, base, expr, executor)?);
            }
            None => {}
        }
    }

    debug!(columns = terms.len(), having_columns, "compiled global filter");

    Ok(Expr::any(terms))
}

/// `id IN (...)` for the rows of `base` whose group satisfies `having`.
fn matching_ids<E>(
    registry: &ColumnRegistry,
    base: &Query,
    having: Expr,
    executor: &E,
) -> TableResult<Expr>
where
    E: QueryExecutor + ?Sized,
{
    let id = table_col(registry.primary_table(), registry.primary_key());
    let id_query = base.reselect(vec![id.clone().into()]).having(having);

    let ids = executor
        .select_ids(&id_query)
        .map_err(TableQueryError::executor)?;
    debug!(matched = ids.len(), "resolved having ids for global filter");

    Ok(id.in_list(ids.into_iter().map(Expr::Param).collect()))
}

/// AND each column's predicate into the query.
///
/// Positions with no registered column are skipped, as are noop columns and
/// blank values.
pub fn apply_column_filters(registry: &ColumnRegistry, query: Query, filters: &FilterMap) -> Query {
    let mut query = query;
    let mut applied = 0;

    for (&position, value) in filters {
        let Some(spec) = registry.lookup(position) else {
            debug!(position, "no column at filter position, skipping");
            continue;
        };
        if spec.is_noop() {
            continue;
        }

        query = match compile(spec, value) {
            Some(Predicate::Where(expr)) => query.filter(expr),
            Some(Predicate::Having(expr)) => query.having(expr),
            None => continue,
        };
        applied += 1;
    }

    debug!(applied, "applied column filters");
    query
}
