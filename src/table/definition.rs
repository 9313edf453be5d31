//! TOML table definitions.
//!
//! A definition names the primary table, the joins its columns need and the
//! columns in display order. It produces both the [`ColumnRegistry`] and the
//! base query the registry's columns refer to.
//!
//! ```toml
//! table = "users"
//!
//! [[joins]]
//! table = "companies"
//! references = "company_id"
//!
//! [[joins]]
//! table = "posts"
//! column = "user_id"
//! references = "id"
//!
//! [[columns]]
//! name = "name"
//!
//! [[columns]]
//! name = "company"
//! relation = "companies"
//! column = "name"
//!
//! [[columns]]
//! name = "post_count"
//! having = "COUNT(posts.id)"
//!
//! [[columns]]
//! name = "created_at"
//! type = "timestamp"
//! precision = "minute"
//!
//! [[columns]]
//! name = "search"
//! global = true
//! noop = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sql::{
    raw_sql, table_col, Expr, ExprExt, JoinType, Query, SelectExpr, TableRef, TimePrecision,
};

use super::column::{ColumnOptions, ColumnType};
use super::registry::{ColumnRegistry, RegistryError};

/// Errors loading a table definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read table definition: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse table definition: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("column '{0}' has a relation but no column")]
    MissingRelationColumn(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Join type in a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Left,
    Inner,
}

/// `JOIN table ON table.column = primary.references`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JoinDefinition {
    pub table: String,
    #[serde(default, rename = "type")]
    pub join_type: JoinKind,
    #[serde(default = "default_join_column")]
    pub column: String,
    pub references: String,
}

fn default_join_column() -> String {
    "id".to_string()
}

/// Declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnTypeName {
    Text,
    Integer,
    Timestamp,
}

/// One column entry.
///
/// The kind is taken from the first of `relation`, `having` and `values`
/// that is set; with none set the column is a direct column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDefinition {
    pub name: String,
    /// Owning table of a direct column.
    pub table: Option<String>,
    pub relation: Option<String>,
    /// Column on `relation`.
    pub column: Option<String>,
    pub having: Option<String>,
    /// Filter text (lowercased) to the values matched with `IN`.
    pub values: Option<BTreeMap<String, Vec<String>>>,
    #[serde(rename = "type")]
    pub column_type: Option<ColumnTypeName>,
    pub precision: Option<TimePrecision>,
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub noop: bool,
}

impl ColumnDefinition {
    fn options(&self) -> Result<ColumnOptions, DefinitionError> {
        let mut options = if let Some(relation) = &self.relation {
            let column = self
                .column
                .as_deref()
                .ok_or_else(|| DefinitionError::MissingRelationColumn(self.name.clone()))?;
            ColumnOptions::external(relation, column)
        } else if let Some(clause) = &self.having {
            ColumnOptions::having(clause)
        } else if let Some(values) = &self.values {
            let values = values.clone();
            ColumnOptions::value_mapped(move |raw| {
                let key = raw.trim().to_lowercase();
                values.get(&key).cloned().unwrap_or_else(|| vec![key])
            })
        } else {
            ColumnOptions::direct()
        };

        if let Some(table) = &self.table {
            options = options.owned_by(table);
        }
        options = options.column_type(self.resolved_type());
        if self.global {
            options = options.global();
        }
        if self.noop {
            options = options.noop();
        }
        Ok(options)
    }

    /// A precision alone implies a timestamp column.
    fn resolved_type(&self) -> ColumnType {
        match (self.column_type, self.precision) {
            (Some(ColumnTypeName::Integer), _) => ColumnType::Integer,
            (Some(ColumnTypeName::Timestamp), precision) | (None, precision @ Some(_)) => {
                ColumnType::Timestamp(precision.unwrap_or_default())
            }
            (Some(ColumnTypeName::Text), _) | (None, None) => ColumnType::Text,
        }
    }
}

/// A table definition file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub table: String,
    pub primary_key: Option<String>,
    #[serde(default)]
    pub joins: Vec<JoinDefinition>,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Primary key, falling back to `default_key`.
    pub fn primary_key<'a>(&'a self, default_key: &'a str) -> &'a str {
        self.primary_key.as_deref().unwrap_or(default_key)
    }

    /// Register every column in order.
    pub fn registry(&self, default_key: &str) -> Result<ColumnRegistry, DefinitionError> {
        let mut registry =
            ColumnRegistry::new(&self.table).with_primary_key(self.primary_key(default_key));
        for column in &self.columns {
            registry.register(&column.name, column.options()?)?;
        }
        Ok(registry)
    }

    /// `SELECT table.*` plus external and HAVING columns under their names,
    /// with the declared joins. Grouped by the primary key when any column
    /// is a HAVING column.
    pub fn base_query(&self, default_key: &str) -> Query {
        let mut select = vec![SelectExpr::new(Expr::Star {
            table: Some(self.table.clone()),
        })];
        let mut grouped = false;

        for column in &self.columns {
            if let (Some(relation), Some(col)) = (&column.relation, &column.column) {
                select.push(table_col(relation, col).alias(&column.name));
            } else if let Some(clause) = &column.having {
                select.push(raw_sql(clause).alias(&column.name));
                grouped = true;
            }
        }

        let mut query = Query::new().select(select).from(TableRef::new(&self.table));

        for join in &self.joins {
            let join_type = match join.join_type {
                JoinKind::Left => JoinType::Left,
                JoinKind::Inner => JoinType::Inner,
            };
            let on =
                table_col(&join.table, &join.column).eq(table_col(&self.table, &join.references));
            query = query.join(join_type, TableRef::new(&join.table), on);
        }

        if grouped {
            query = query.group_by(vec![table_col(&self.table, self.primary_key(default_key))]);
        }
        query
    }
}
