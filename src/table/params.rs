//! Request parameters.
//!
//! [`RawParams`] is the transport shape sent by the table widget: every
//! scalar may arrive as a string or a number. [`RequestParams`] is the
//! parsed view the compiler reads. Parsing never fails on malformed numbers;
//! they read as zero, the way the widget's server-side counterparts always
//! treated them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Column position to raw direction code.
pub type SortMap = BTreeMap<usize, i64>;

/// Column position to raw filter text.
pub type FilterMap = BTreeMap<usize, String>;

/// Incoming request parameters, as sent over the wire.
///
/// ```json
/// {"page": "0", "size": "10", "sort": {"0": "1"}, "filter": {"1": "frank"}}
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawParams {
    pub page: Option<JsonValue>,
    pub size: Option<JsonValue>,
    pub sort: BTreeMap<String, JsonValue>,
    pub filter: BTreeMap<String, JsonValue>,
}

/// Rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// The `"all"` sentinel: never paginate.
    All,
    Rows(u64),
}

/// Parsed request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// Zero-based page index.
    pub page: u64,
    pub size: PageSize,
    pub sort: SortMap,
    pub filter: FilterMap,
}

impl RequestParams {
    /// First page of `size` rows, no sorting or filtering.
    pub fn new(size: PageSize) -> Self {
        Self {
            page: 0,
            size,
            sort: SortMap::new(),
            filter: FilterMap::new(),
        }
    }

    /// Parse raw transport parameters. A missing size uses `default_size`.
    pub fn from_raw(raw: &RawParams, default_size: u64) -> Self {
        let page = raw.page.as_ref().map(parse_int).unwrap_or(0).max(0) as u64;

        let size = match &raw.size {
            None | Some(JsonValue::Null) => PageSize::Rows(default_size),
            Some(JsonValue::String(s)) if s == "all" => PageSize::All,
            Some(v) => PageSize::Rows(parse_int(v).max(0) as u64),
        };

        let sort = raw
            .sort
            .iter()
            .filter_map(|(key, code)| Some((parse_position(key)?, parse_int(code))))
            .collect();

        let filter = raw
            .filter
            .iter()
            .filter_map(|(key, value)| Some((parse_position(key)?, scalar_text(value)?)))
            .collect();

        Self {
            page,
            size,
            sort,
            filter,
        }
    }

    /// Parse a JSON request body.
    pub fn from_json(json: &str, default_size: u64) -> Result<Self, serde_json::Error> {
        let raw: RawParams = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw, default_size))
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn with_sort(mut self, position: usize, code: i64) -> Self {
        self.sort.insert(position, code);
        self
    }

    pub fn with_filter(mut self, position: usize, value: &str) -> Self {
        self.filter.insert(position, value.into());
        self
    }

    /// Whether any filter slot carries a non-blank value.
    pub fn has_filters(&self) -> bool {
        self.filter
            .values()
            .any(|v| !super::compiler::is_blank(v))
    }
}

/// Best-effort integer: leading sign and digits of a string, else zero.
pub fn parse_int_str(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut n: i64 = 0;
    for c in digits.chars().take_while(|c| c.is_ascii_digit()) {
        n = n.saturating_mul(10).saturating_add(i64::from(c as u8 - b'0'));
    }
    if negative {
        -n
    } else {
        n
    }
}

fn parse_int(value: &JsonValue) -> i64 {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        JsonValue::String(s) => parse_int_str(s),
        _ => 0,
    }
}

/// Map keys must be column positions; anything else can't name a column.
fn parse_position(key: &str) -> Option<usize> {
    match key.trim().parse() {
        Ok(position) => Some(position),
        Err(_) => {
            debug!(key, "ignoring non-numeric column key");
            None
        }
    }
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}
