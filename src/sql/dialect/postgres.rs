//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (true/false)
//! - Numbered parameters (`$1`, `$2`, ...)
//! - `::` cast shorthand
//! - `date_trunc` for timestamp precision
//! - NULLS FIRST/LAST

use super::helpers;
use super::SqlDialect;
use crate::sql::expr::TimePrecision;
use crate::sql::token::TokenStream;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn placeholder(&self, index: usize) -> String {
        helpers::placeholder_dollar(index)
    }

    // Uses default emit_limit_offset (LIMIT ... OFFSET ...)

    fn emit_text_cast(&self, inner: &TokenStream) -> TokenStream {
        helpers::emit_cast_postfix(inner, "text")
    }

    fn emit_time_truncate(&self, precision: TimePrecision, inner: &TokenStream) -> TokenStream {
        helpers::emit_date_trunc(precision, inner)
    }
}
