//! Table request compiler.
//!
//! Turns a paginated-table request (page, size, per-column sort codes,
//! per-column filter text and an optional "search all columns" value) into
//! a filtered, sorted and paginated [`Query`](crate::sql::Query) plus row
//! counts.
//!
//! - [`column`] - column descriptors and their kinds
//! - [`registry`] - ordered column registry
//! - [`params`] - request parameter parsing
//! - [`compiler`] - one column + one value to one predicate
//! - [`filter`] - global and per-column filtering
//! - [`sort`] - ORDER BY from sort codes
//! - [`paging`] - row counts and LIMIT/OFFSET
//! - [`handler`] - request orchestration
//! - [`definition`] - TOML table definitions

pub mod column;
pub mod compiler;
pub mod definition;
mod error;
pub mod filter;
pub mod handler;
pub mod paging;
pub mod params;
pub mod registry;
pub mod sort;

pub use column::{
    ColumnKind, ColumnOptions, ColumnSpec, ColumnType, FilterStrategy, Predicate, SortStrategy,
    ValueMapper,
};
pub use compiler::compile;
pub use definition::{ColumnDefinition, DefinitionError, JoinDefinition, TableDefinition};
pub use error::{TableQueryError, TableResult};
pub use handler::{QueryResult, QuerySummary, TableQuery};
pub use paging::{paginate, RowCounts};
pub use params::{FilterMap, PageSize, RawParams, RequestParams, SortMap};
pub use registry::{ColumnRegistry, RegistryError};
pub use sort::{apply_sort, SortDirection};
