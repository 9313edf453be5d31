//! Query execution seam.
//!
//! The table compiler builds queries but does not run the records query.
//! It needs a store only for row counts and for the id selection behind
//! global filtering on HAVING columns; both go through [`QueryExecutor`].
//!
//! [`SqliteExecutor`] is the bundled implementation.

mod sqlite;

pub use sqlite::{ExecutorError, ExecutorResult, SqliteExecutor};

use crate::sql::{Query, Value};

/// Result of a count query.
#[derive(Debug, Clone, PartialEq)]
pub enum CountResult {
    /// Single count row.
    Scalar(u64),
    /// One `(group key, count)` row per group of a grouped query.
    Grouped(Vec<(Value, u64)>),
}

impl CountResult {
    /// Number of rows the count stands for.
    ///
    /// A grouped result counts its groups, not the sum of their counts: each
    /// group is one base row that survived the HAVING clause.
    pub fn rows(&self) -> u64 {
        match self {
            CountResult::Scalar(n) => *n,
            CountResult::Grouped(groups) => groups.len() as u64,
        }
    }
}

/// Runs the count and id-selection queries the compiler needs.
pub trait QueryExecutor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run a count query. Grouped queries return one row per group.
    fn count(&self, query: &Query) -> Result<CountResult, Self::Error>;

    /// Run a single-column query and collect the values.
    fn select_ids(&self, query: &Query) -> Result<Vec<Value>, Self::Error>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    type Error = T::Error;

    fn count(&self, query: &Query) -> Result<CountResult, Self::Error> {
        (**self).count(query)
    }

    fn select_ids(&self, query: &Query) -> Result<Vec<Value>, Self::Error> {
        (**self).select_ids(query)
    }
}
