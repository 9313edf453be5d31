//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backtick identifier quoting (`` `name` ``)
//! - Boolean is TINYINT(1), returns 1/0
//! - `CAST(expr AS CHAR)` for text casts
//! - `DATE_FORMAT` instead of `date_trunc`
//! - OFFSET requires LIMIT
//! - No NULLS FIRST/LAST (emulated by the ORDER BY renderer)

use super::helpers;
use super::SqlDialect;
use crate::sql::expr::TimePrecision;
use crate::sql::token::TokenStream;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_required_limit(limit, offset, "18446744073709551615")
    }

    fn supports_nulls_ordering(&self) -> bool {
        false
    }

    fn emit_text_cast(&self, inner: &TokenStream) -> TokenStream {
        helpers::emit_cast_function(inner, "CHAR")
    }

    fn emit_time_truncate(&self, precision: TimePrecision, inner: &TokenStream) -> TokenStream {
        helpers::emit_date_format(precision, inner)
    }
}
