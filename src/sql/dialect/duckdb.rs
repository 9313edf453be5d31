//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible for everything the table compiler emits:
//! - ANSI identifier quoting (`"`)
//! - `::` cast shorthand and `date_trunc`
//! - NULLS FIRST/LAST
//! - `?` positional parameters

use super::helpers;
use super::SqlDialect;
use crate::sql::token::TokenStream;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn emit_text_cast(&self, inner: &TokenStream) -> TokenStream {
        helpers::emit_cast_postfix(inner, "text")
    }
}
