//! Column registry.
//!
//! Columns are registered in display order; a column's position is its
//! registration index, which is also the id the table widget sends back in
//! sort and filter maps. The registry is built once and only read afterwards,
//! so a built registry can be shared between requests.

use thiserror::Error;
use tracing::debug;

use super::column::{ColumnOptions, ColumnSpec};

/// Configuration mistakes caught at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("column '{attempted}' cannot be the global filter: '{existing}' already is")]
    DuplicateGlobal { existing: String, attempted: String },

    #[error("column name must not be empty (position {0})")]
    EmptyName(usize),
}

/// Ordered set of column descriptors for one table.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    primary_table: String,
    primary_key: String,
    columns: Vec<ColumnSpec>,
}

impl ColumnRegistry {
    /// Create a registry whose base entity is `primary_table` (primary key `id`).
    pub fn new(primary_table: &str) -> Self {
        Self {
            primary_table: primary_table.into(),
            primary_key: "id".into(),
            columns: Vec::new(),
        }
    }

    /// Primary key used for distinct counting and id selection.
    pub fn with_primary_key(mut self, primary_key: &str) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    pub fn primary_table(&self) -> &str {
        &self.primary_table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Append a column at the next position.
    ///
    /// Returns the created spec for further configuration.
    pub fn register(
        &mut self,
        name: &str,
        options: ColumnOptions,
    ) -> Result<&mut ColumnSpec, RegistryError> {
        let position = self.columns.len();

        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName(position));
        }

        if options.global {
            if let Some(existing) = self.global() {
                return Err(RegistryError::DuplicateGlobal {
                    existing: existing.name().to_string(),
                    attempted: name.to_string(),
                });
            }
        }

        let owner = options
            .owner
            .clone()
            .unwrap_or_else(|| self.primary_table.clone());

        debug!(
            position,
            name,
            kind = options.kind.label(),
            global = options.global,
            "registered column"
        );

        self.columns
            .push(ColumnSpec::new(position, name, owner, options));
        let idx = self.columns.len() - 1;
        Ok(&mut self.columns[idx])
    }

    /// Spec registered at `position`, if any.
    pub fn lookup(&self, position: usize) -> Option<&ColumnSpec> {
        self.columns.get(position)
    }

    /// The global filter column, if one is registered.
    pub fn global(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.is_global())
    }

    /// All columns in position order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
