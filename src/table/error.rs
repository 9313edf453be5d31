//! Errors raised while answering a table request.

use thiserror::Error;

/// Result type for table request operations.
pub type TableResult<T> = Result<T, TableQueryError>;

/// Errors that can occur while answering a table request.
///
/// Request input never produces an error: unknown positions and blank
/// values are skipped, malformed numbers read as zero. Only the store can
/// fail, and its errors are passed through unchanged.
#[derive(Error, Debug)]
pub enum TableQueryError {
    /// The executor failed running a count or id-selection query.
    #[error("query execution failed: {0}")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TableQueryError {
    pub fn executor<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TableQueryError::Executor(Box::new(err))
    }
}
