//! SQLite SQL dialect.
//!
//! SQLite differences from ANSI:
//! - Booleans are integers (1/0)
//! - No `::` shorthand, `CAST(expr AS TEXT)` instead
//! - Timestamps are text, truncated with `strftime`
//! - OFFSET requires LIMIT (`LIMIT -1` means unbounded)
//! - NULLS FIRST/LAST since 3.30

use super::helpers;
use super::SqlDialect;
use crate::sql::expr::TimePrecision;
use crate::sql::token::TokenStream;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_required_limit(limit, offset, "-1")
    }

    fn emit_time_truncate(&self, precision: TimePrecision, inner: &TokenStream) -> TokenStream {
        helpers::emit_strftime(precision, inner)
    }
}
