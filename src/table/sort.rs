//! Sort engine.
//!
//! Direction codes come from the table widget's sort toggle: even codes sort
//! ascending, odd codes descending.

use tracing::debug;

use crate::sql::{col, table_col, OrderByExpr, Query, SortDir};

use super::column::{ColumnKind, ColumnSpec};
use super::params::SortMap;
use super::registry::ColumnRegistry;

/// Decoded sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_code(code: i64) -> Self {
        if code.rem_euclid(2) == 0 {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

impl From<SortDirection> for SortDir {
    fn from(dir: SortDirection) -> Self {
        match dir {
            SortDirection::Asc => SortDir::Asc,
            SortDirection::Desc => SortDir::Desc,
        }
    }
}

/// ORDER BY terms for sorting `spec` in `dir`.
pub fn sort_terms(spec: &ColumnSpec, dir: SortDirection) -> Vec<OrderByExpr> {
    if let Some(sorter) = spec.sorter() {
        return sorter(dir);
    }

    let term = match spec.kind() {
        ColumnKind::External { relation, column } => OrderByExpr::new(table_col(relation, column)),
        // HAVING aliases can't be qualified
        ColumnKind::Having { .. } => OrderByExpr::new(col(spec.name())).nulls_last(),
        ColumnKind::Direct | ColumnKind::ValueMapped { .. } | ColumnKind::Custom { .. } => {
            OrderByExpr::new(table_col(spec.owner(), spec.name())).nulls_last()
        }
    };
    vec![term.with_dir(dir.into())]
}

/// Order `query` by the requested columns, in ascending position order.
///
/// When at least one position resolves, the requested ordering replaces any
/// ordering the query already had. Unknown positions are skipped.
pub fn apply_sort(registry: &ColumnRegistry, query: Query, sort: &SortMap) -> Query {
    let terms: Vec<OrderByExpr> = sort
        .iter()
        .filter_map(|(&position, &code)| match registry.lookup(position) {
            Some(spec) => Some(sort_terms(spec, SortDirection::from_code(code))),
            None => {
                debug!(position, "no column at sort position, skipping");
                None
            }
        })
        .flatten()
        .collect();

    if terms.is_empty() {
        return query;
    }

    debug!(terms = terms.len(), "applied sort");
    query.order_by(terms)
}
