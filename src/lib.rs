//! # tablesift
//!
//! Compiles paginated-table requests into parameterized, multi-dialect SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │     RequestParams (page, size, sort map, filter map)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [table::filter]  global OR, then per-column AND
//! ┌─────────────────────────────────────────────────────────┐
//! │   ColumnRegistry ──► compiler ──► WHERE / HAVING Expr    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [table::paging]  distinct-id counts via executor
//!                          ▼ [table::sort]    ORDER BY ... NULLS LAST
//!                          ▼ [table::paging]  LIMIT / OFFSET
//! ┌─────────────────────────────────────────────────────────┐
//! │        QueryResult { total_rows, filtered_rows, Query }  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql]  Query::to_bound_sql(dialect)
//!                    SQL text + bound parameters
//! ```
//!
//! ## Example
//!
//! ```
//! use tablesift::prelude::*;
//!
//! let mut registry = ColumnRegistry::new("users");
//! registry.register("name", ColumnOptions::direct()).unwrap();
//!
//! let params = RequestParams::new(PageSize::Rows(10)).with_filter(0, "ann");
//! let query = tablesift::table::filter::apply_column_filters(
//!     &registry,
//!     Query::new().select_star().from(TableRef::new("users")),
//!     &params.filter,
//! );
//!
//! let bound = query.to_bound_sql(Dialect::Postgres);
//! assert!(bound.sql.contains("LIKE LOWER($1)"));
//! ```

pub mod config;
pub mod executor;
pub mod sql;
pub mod table;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::executor::{CountResult, QueryExecutor, SqliteExecutor};
    pub use crate::expr::{
        // Constructors
        col,
        count,
        count_distinct,
        func,
        lit_bool,
        lit_int,
        lit_null,
        lit_str,
        lower,
        param,
        raw_sql,
        star,
        table_col,
        text_cast,
        truncate_time,
        // Types
        Expr,
        ExprExt,
        TimePrecision,
    };
    pub use crate::query::{
        Join, JoinType, LimitOffset, NullsOrder, OrderByExpr, Query, SelectExpr, SortDir, TableRef,
    };
    pub use crate::sql::{BoundSql, Value};
    pub use crate::table::{
        ColumnKind, ColumnOptions, ColumnRegistry, ColumnSpec, ColumnType, PageSize, Predicate,
        QueryResult, RequestParams, SortDirection, TableDefinition, TableQuery,
    };
}

// Also export at crate root for convenience
pub use dialect::Dialect;
pub use query::Query;
pub use table::{ColumnRegistry, RequestParams, TableQuery};
