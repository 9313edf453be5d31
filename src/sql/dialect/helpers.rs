//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::expr::TimePrecision;
use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB, SQLite
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres, DuckDB
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: MySQL, SQLite
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Placeholders
// =============================================================================

/// Numbered placeholder (`$1`, `$2`, ...).
/// Used by: Postgres
pub fn placeholder_dollar(index: usize) -> String {
    format!("${}", index)
}

// =============================================================================
// Pagination
// =============================================================================

/// Row counts past `i64::MAX` are written as `i64::MAX`.
fn count_literal(n: u64) -> Token {
    Token::LitInt(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Emit LIMIT ... OFFSET ... (standard SQL).
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit)
            .space()
            .push(count_literal(lim));
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset)
            .space()
            .push(count_literal(off));
    }

    ts
}

/// Emit LIMIT ... OFFSET ... where OFFSET needs a LIMIT in front of it.
/// Used by: SQLite, MySQL (`LIMIT -1` / `LIMIT 18446744073709551615` idioms)
pub fn emit_limit_offset_required_limit(
    limit: Option<u64>,
    offset: Option<u64>,
    unbounded: &str,
) -> TokenStream {
    if limit.is_some() || offset.is_none() {
        return emit_limit_offset_standard(limit, offset);
    }

    let mut ts = TokenStream::new();
    ts.push(Token::Limit)
        .space()
        .push(Token::Raw(unbounded.into()))
        .space()
        .push(Token::Offset)
        .space()
        .push(count_literal(offset.unwrap_or(0)));
    ts
}

// =============================================================================
// Casts
// =============================================================================

/// `inner::type` (PostgreSQL cast shorthand).
/// Used by: Postgres, DuckDB
pub fn emit_cast_postfix(inner: &TokenStream, type_name: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.append(inner).push(Token::Raw(format!("::{}", type_name)));
    ts
}

/// `CAST(inner AS type)`.
/// Used by: SQLite, MySQL
pub fn emit_cast_function(inner: &TokenStream, type_name: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName("CAST".into()))
        .lparen()
        .append(inner)
        .space()
        .push(Token::As)
        .space()
        .push(Token::Raw(type_name.into()))
        .rparen();
    ts
}

// =============================================================================
// Temporal Truncation
// =============================================================================

/// `date_trunc('second', inner)`.
/// Used by: Postgres, DuckDB
pub fn emit_date_trunc(precision: TimePrecision, inner: &TokenStream) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName("date_trunc".into()))
        .lparen()
        .push(Token::LitString(precision.unit().into()))
        .comma()
        .space()
        .append(inner)
        .rparen();
    ts
}

/// `strftime('%Y-%m-%d %H:%M:%S', inner)`.
/// Used by: SQLite
pub fn emit_strftime(precision: TimePrecision, inner: &TokenStream) -> TokenStream {
    let format = match precision {
        TimePrecision::Second => "%Y-%m-%d %H:%M:%S",
        TimePrecision::Minute => "%Y-%m-%d %H:%M",
    };
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName("strftime".into()))
        .lparen()
        .push(Token::LitString(format.into()))
        .comma()
        .space()
        .append(inner)
        .rparen();
    ts
}

/// `DATE_FORMAT(inner, '%Y-%m-%d %H:%i:%s')`.
/// Used by: MySQL
pub fn emit_date_format(precision: TimePrecision, inner: &TokenStream) -> TokenStream {
    let format = match precision {
        TimePrecision::Second => "%Y-%m-%d %H:%i:%s",
        TimePrecision::Minute => "%Y-%m-%d %H:%i",
    };
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName("date_format".into()))
        .lparen()
        .append(inner)
        .comma()
        .space()
        .push(Token::LitString(format.into()))
        .rparen();
    ts
}
