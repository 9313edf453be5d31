//! Column descriptors.
//!
//! A [`ColumnSpec`] describes one sortable/filterable table column. How the
//! column is queried is decided by its [`ColumnKind`]; the compiler and sort
//! engine match on the kind exhaustively.

use std::fmt;
use std::sync::Arc;

use crate::sql::{Expr, OrderByExpr, TimePrecision};

use super::sort::SortDirection;

/// Maps raw filter text to the concrete values of an `IN` list.
pub type ValueMapper = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Builds the predicate for a column with a hand-written filter.
pub type FilterStrategy = Arc<dyn Fn(&str) -> Option<Predicate> + Send + Sync>;

/// Builds the ORDER BY terms for a column with a hand-written sorter.
pub type SortStrategy = Arc<dyn Fn(SortDirection) -> Vec<OrderByExpr> + Send + Sync>;

/// A compiled filter fragment and the clause it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Where(Expr),
    Having(Expr),
}

impl Predicate {
    pub fn expr(&self) -> &Expr {
        match self {
            Predicate::Where(e) | Predicate::Having(e) => e,
        }
    }

    pub fn is_having(&self) -> bool {
        matches!(self, Predicate::Having(_))
    }
}

/// How a column is filtered and sorted.
#[derive(Clone)]
pub enum ColumnKind {
    /// Physical column on the owning entity.
    Direct,

    /// Column on a joined relation.
    External { relation: String, column: String },

    /// Aggregate expression, filterable only through HAVING.
    ///
    /// The clause is trusted configuration and is emitted verbatim.
    Having { clause: String },

    /// Physical column matched against the mapped values with `IN`.
    ValueMapped { mapper: ValueMapper },

    /// Column whose predicate is produced by an injected strategy.
    Custom { filter: FilterStrategy },
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Direct => "direct",
            ColumnKind::External { .. } => "external",
            ColumnKind::Having { .. } => "having",
            ColumnKind::ValueMapped { .. } => "value_mapped",
            ColumnKind::Custom { .. } => "custom",
        }
    }
}

impl fmt::Debug for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Direct => f.write_str("Direct"),
            ColumnKind::External { relation, column } => f
                .debug_struct("External")
                .field("relation", relation)
                .field("column", column)
                .finish(),
            ColumnKind::Having { clause } => {
                f.debug_struct("Having").field("clause", clause).finish()
            }
            ColumnKind::ValueMapped { .. } => f.write_str("ValueMapped"),
            ColumnKind::Custom { .. } => f.write_str("Custom"),
        }
    }
}

/// Storage type of the column, where it changes the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnType {
    #[default]
    Text,
    /// Non-digit filter text matches nothing instead of casting.
    Integer,
    /// Truncated to the precision before the text comparison.
    Timestamp(TimePrecision),
}

/// Options a column is registered with.
#[derive(Clone, Debug)]
#[must_use = "options have no effect until passed to ColumnRegistry::register"]
pub struct ColumnOptions {
    pub(crate) kind: ColumnKind,
    pub(crate) owner: Option<String>,
    pub(crate) column_type: ColumnType,
    pub(crate) global: bool,
    pub(crate) noop: bool,
    pub(crate) sorter: Option<SortStrategyHandle>,
}

impl ColumnOptions {
    pub fn new(kind: ColumnKind) -> Self {
        Self {
            kind,
            owner: None,
            column_type: ColumnType::default(),
            global: false,
            noop: false,
            sorter: None,
        }
    }

    pub fn direct() -> Self {
        Self::new(ColumnKind::Direct)
    }

    pub fn external(relation: &str, column: &str) -> Self {
        Self::new(ColumnKind::External {
            relation: relation.into(),
            column: column.into(),
        })
    }

    pub fn having(clause: &str) -> Self {
        Self::new(ColumnKind::Having {
            clause: clause.into(),
        })
    }

    pub fn value_mapped(mapper: impl Fn(&str) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self::new(ColumnKind::ValueMapped {
            mapper: Arc::new(mapper),
        })
    }

    pub fn custom(filter: impl Fn(&str) -> Option<Predicate> + Send + Sync + 'static) -> Self {
        Self::new(ColumnKind::Custom {
            filter: Arc::new(filter),
        })
    }

    /// Table the column lives on. Defaults to the registry's primary table.
    pub fn owned_by(mut self, owner: &str) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    pub fn integer(self) -> Self {
        self.column_type(ColumnType::Integer)
    }

    pub fn timestamp(self, precision: TimePrecision) -> Self {
        self.column_type(ColumnType::Timestamp(precision))
    }

    /// Mark as the global ("search all columns") filter.
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    /// Never filter on this column; sorting still applies.
    pub fn noop(mut self) -> Self {
        self.noop = true;
        self
    }

    pub fn sort_with(
        mut self,
        sorter: impl Fn(SortDirection) -> Vec<OrderByExpr> + Send + Sync + 'static,
    ) -> Self {
        self.sorter = Some(SortStrategyHandle(Arc::new(sorter)));
        self
    }
}

#[derive(Clone)]
pub(crate) struct SortStrategyHandle(SortStrategy);

impl fmt::Debug for SortStrategyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SortStrategy")
    }
}

/// One registered column.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    position: usize,
    name: String,
    owner: String,
    kind: ColumnKind,
    column_type: ColumnType,
    global: bool,
    noop: bool,
    sorter: Option<SortStrategyHandle>,
}

impl ColumnSpec {
    pub(crate) fn new(position: usize, name: &str, owner: String, options: ColumnOptions) -> Self {
        Self {
            position,
            name: name.into(),
            owner,
            kind: options.kind,
            column_type: options.column_type,
            global: options.global,
            noop: options.noop,
            sorter: options.sorter,
        }
    }

    /// UI-facing column id.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table `name` is qualified with.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn is_noop(&self) -> bool {
        self.noop
    }

    pub fn sorter(&self) -> Option<&SortStrategy> {
        self.sorter.as_ref().map(|h| &h.0)
    }

    /// Override the sort target after registration.
    pub fn sort_with(
        &mut self,
        sorter: impl Fn(SortDirection) -> Vec<OrderByExpr> + Send + Sync + 'static,
    ) -> &mut Self {
        self.sorter = Some(SortStrategyHandle(Arc::new(sorter)));
        self
    }

    /// Change the storage type after registration.
    pub fn set_column_type(&mut self, column_type: ColumnType) -> &mut Self {
        self.column_type = column_type;
        self
    }
}
