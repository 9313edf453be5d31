//! Predicate compiler: one column plus one filter value to one predicate.
//!
//! Filter text only ever reaches SQL as a bound parameter. Identifiers come
//! from the registry and the HAVING clauses are trusted configuration.
//!
//! | kind          | predicate                                                  |
//! |---------------|------------------------------------------------------------|
//! | external      | `LOWER(relation.column::text) LIKE LOWER(?)`  (`%v%`)      |
//! | having        | `LOWER((clause)::text) LIKE ?` in HAVING      (`%v%`)      |
//! | value-mapped  | `LOWER(owner.name::text) IN (?, ...)`                      |
//! | direct        | `LOWER(owner.name::text) LIKE LOWER(?)`       (`%v%`)      |
//! | custom        | whatever the strategy returns                              |

use tracing::trace;

use crate::sql::{
    lit_int, lower, param, raw_sql, table_col, text_cast, truncate_time, Expr, ExprExt,
};

use super::column::{ColumnKind, ColumnSpec, ColumnType, Predicate};

/// Whether a raw filter value carries no filter.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Compile the filter predicate for `spec` and the raw user `value`.
///
/// Returns `None` for a blank value regardless of the column kind.
pub fn compile(spec: &ColumnSpec, value: &str) -> Option<Predicate> {
    if is_blank(value) {
        return None;
    }

    let predicate = match spec.kind() {
        ColumnKind::Custom { filter } => return filter(value),
        _ if integer_mismatch(spec, value) => {
            let never = lit_int(0).eq(1);
            if matches!(spec.kind(), ColumnKind::Having { .. }) {
                Predicate::Having(never)
            } else {
                Predicate::Where(never)
            }
        }
        ColumnKind::External { relation, column } => {
            Predicate::Where(lower_text(table_col(relation, column)).like(lower(contains(value))))
        }
        ColumnKind::Having { clause } => Predicate::Having(
            lower_text(Expr::Paren(Box::new(raw_sql(clause)))).like(contains(value)),
        ),
        ColumnKind::ValueMapped { mapper } => {
            let values = mapper(value).into_iter().map(param).collect();
            Predicate::Where(lower_text(target(spec)).in_list(values))
        }
        ColumnKind::Direct => {
            Predicate::Where(lower_text(target(spec)).like(lower(contains(value))))
        }
    };

    trace!(
        position = spec.position(),
        kind = spec.kind().label(),
        having = predicate.is_having(),
        "compiled column predicate"
    );

    Some(predicate)
}

/// Qualified column reference, truncated first for timestamp columns.
fn target(spec: &ColumnSpec) -> Expr {
    let column = table_col(spec.owner(), spec.name());
    match spec.column_type() {
        ColumnType::Timestamp(precision) => truncate_time(column, precision),
        ColumnType::Text | ColumnType::Integer => column,
    }
}

fn lower_text(expr: Expr) -> Expr {
    lower(text_cast(expr))
}

fn contains(value: &str) -> Expr {
    param(format!("%{}%", value))
}

/// Integer columns only match digit-only input.
fn integer_mismatch(spec: &ColumnSpec, value: &str) -> bool {
    spec.column_type() == ColumnType::Integer
        && !value.trim().chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{Dialect, Value};
    use crate::table::column::ColumnOptions;
    use crate::table::registry::ColumnRegistry;

    fn spec(name: &str, options: ColumnOptions) -> ColumnSpec {
        let mut registry = ColumnRegistry::new("users");
        registry.register(name, options).unwrap().clone()
    }

    fn render(pred: &Predicate) -> (String, Vec<Value>) {
        let bound = pred.expr().to_bound_sql(Dialect::Postgres);
        (bound.sql, bound.params)
    }

    #[test]
    fn test_blank_value_yields_nothing() {
        for options in [
            ColumnOptions::direct(),
            ColumnOptions::external("companies", "name"),
            ColumnOptions::having("COUNT(posts.id)"),
            ColumnOptions::value_mapped(|v| vec![v.into()]),
            ColumnOptions::custom(|_| Some(Predicate::Where(lit_int(1).eq(1)))),
        ] {
            let spec = spec("name", options);
            assert!(compile(&spec, "").is_none());
            assert!(compile(&spec, "   ").is_none());
        }
    }

    #[test]
    fn test_direct() {
        let pred = compile(&spec("name", ColumnOptions::direct()), "Ann").unwrap();
        let (sql, params) = render(&pred);
        assert_eq!(sql, "LOWER(\"users\".\"name\"::text) LIKE LOWER($1)");
        assert_eq!(params, vec![Value::from("%Ann%")]);
        assert!(!pred.is_having());
    }

    #[test]
    fn test_external() {
        let pred = compile(
            &spec("company", ColumnOptions::external("companies", "name")),
            "acme",
        )
        .unwrap();
        let (sql, params) = render(&pred);
        assert_eq!(sql, "LOWER(\"companies\".\"name\"::text) LIKE LOWER($1)");
        assert_eq!(params, vec![Value::from("%acme%")]);
    }

    #[test]
    fn test_having() {
        let pred = compile(
            &spec("post_count", ColumnOptions::having("COUNT(posts.id)")),
            "3",
        )
        .unwrap();
        assert!(pred.is_having());
        let (sql, params) = render(&pred);
        assert_eq!(sql, "LOWER((COUNT(posts.id))::text) LIKE $1");
        assert_eq!(params, vec![Value::from("%3%")]);
    }

    #[test]
    fn test_value_mapped() {
        let options = ColumnOptions::value_mapped(|v| match v {
            "yes" => vec!["t".into(), "true".into()],
            _ => vec!["f".into()],
        });
        let pred = compile(&spec("active", options), "yes").unwrap();
        let (sql, params) = render(&pred);
        assert_eq!(sql, "LOWER(\"users\".\"active\"::text) IN ($1, $2)");
        assert_eq!(params, vec![Value::from("t"), Value::from("true")]);
    }

    #[test]
    fn test_value_mapped_empty_matches_nothing() {
        let pred = compile(&spec("active", ColumnOptions::value_mapped(|_| vec![])), "x").unwrap();
        assert_eq!(render(&pred).0, "FALSE");
    }

    #[test]
    fn test_timestamp_truncated() {
        let options = ColumnOptions::direct().timestamp(crate::sql::TimePrecision::Second);
        let pred = compile(&spec("created_at", options), "2024-01-05 10:30").unwrap();
        assert_eq!(
            render(&pred).0,
            "LOWER(DATE_TRUNC('second', \"users\".\"created_at\")::text) LIKE LOWER($1)"
        );
    }

    #[test]
    fn test_integer_guard() {
        let spec = spec("age", ColumnOptions::direct().integer());

        let pred = compile(&spec, "abc").unwrap();
        let (sql, params) = render(&pred);
        assert_eq!(sql, "0 = 1");
        assert!(params.is_empty());

        let pred = compile(&spec, "42").unwrap();
        assert_eq!(render(&pred).1, vec![Value::from("%42%")]);
    }

    #[test]
    fn test_custom_strategy() {
        let options = ColumnOptions::custom(|v| {
            Some(Predicate::Where(
                table_col("users", "code").eq(param(v.to_uppercase())),
            ))
        });
        let pred = compile(&spec("code", options), "ab").unwrap();
        let (sql, params) = render(&pred);
        assert_eq!(sql, "\"users\".\"code\" = $1");
        assert_eq!(params, vec![Value::from("AB")]);
    }

    #[test]
    fn test_user_text_never_in_sql() {
        let pred =
            compile(&spec("name", ColumnOptions::direct()), "'; DROP TABLE users; --").unwrap();
        let (sql, _) = render(&pred);
        assert!(!sql.contains("DROP"));
    }
}
