//! Integration tests for the predicate compiler across dialects.

use insta::assert_snapshot;
use tablesift::sql::{Dialect, TimePrecision, Value};
use tablesift::table::{compile, ColumnOptions, ColumnRegistry, ColumnSpec, Predicate};

fn spec(options: ColumnOptions) -> ColumnSpec {
    let mut registry = ColumnRegistry::new("users");
    registry.register("name", options).unwrap().clone()
}

fn sql(pred: &Predicate, dialect: Dialect) -> String {
    pred.expr().to_bound_sql(dialect).sql
}

#[test]
fn test_empty_value_never_compiles() {
    let kinds = vec![
        ColumnOptions::direct(),
        ColumnOptions::direct().integer(),
        ColumnOptions::direct().timestamp(TimePrecision::Second),
        ColumnOptions::external("companies", "name"),
        ColumnOptions::having("COUNT(posts.id)"),
        ColumnOptions::value_mapped(|v| vec![v.to_string()]),
    ];
    for options in kinds {
        assert!(compile(&spec(options), "").is_none());
    }
}

#[test]
fn test_direct_per_dialect() {
    let pred = compile(&spec(ColumnOptions::direct()), "ann").unwrap();

    assert_snapshot!(sql(&pred, Dialect::Postgres), @r#"LOWER("users"."name"::text) LIKE LOWER($1)"#);
    assert_snapshot!(sql(&pred, Dialect::DuckDb), @r#"LOWER("users"."name"::text) LIKE LOWER(?)"#);
    assert_snapshot!(sql(&pred, Dialect::Sqlite), @r#"LOWER(CAST("users"."name" AS TEXT)) LIKE LOWER(?)"#);
    assert_snapshot!(sql(&pred, Dialect::MySql), @"LOWER(CAST(`users`.`name` AS CHAR)) LIKE LOWER(?)");
}

#[test]
fn test_timestamp_per_dialect() {
    let pred = compile(
        &spec(ColumnOptions::direct().timestamp(TimePrecision::Minute)),
        "2024-01-05 10:30",
    )
    .unwrap();

    assert_snapshot!(
        sql(&pred, Dialect::Postgres),
        @r#"LOWER(DATE_TRUNC('minute', "users"."name")::text) LIKE LOWER($1)"#
    );
    assert_snapshot!(
        sql(&pred, Dialect::Sqlite),
        @r#"LOWER(CAST(STRFTIME('%Y-%m-%d %H:%M', "users"."name") AS TEXT)) LIKE LOWER(?)"#
    );
}

#[test]
fn test_having_pattern_is_not_lowered() {
    let pred = compile(&spec(ColumnOptions::having("SUM(orders.total)")), "ABC").unwrap();

    assert!(pred.is_having());
    let bound = pred.expr().to_bound_sql(Dialect::Postgres);
    assert_eq!(bound.sql, "LOWER((SUM(orders.total))::text) LIKE $1");
    assert_eq!(bound.params, vec![Value::from("%ABC%")]);
}

#[test]
fn test_value_mapped_binds_each_value() {
    let options = ColumnOptions::value_mapped(|v| {
        v.split(',').map(|s| s.trim().to_lowercase()).collect()
    });
    let pred = compile(&spec(options), "Open, Closed").unwrap();
    let bound = pred.expr().to_bound_sql(Dialect::Sqlite);

    assert_eq!(bound.sql, "LOWER(CAST(\"users\".\"name\" AS TEXT)) IN (?, ?)");
    assert_eq!(bound.params, vec![Value::from("open"), Value::from("closed")]);
}

#[test]
fn test_integer_guard_on_non_digits() {
    let spec = spec(ColumnOptions::direct().integer());

    for value in ["12a", "-3", "1.5", "abc"] {
        let pred = compile(&spec, value).unwrap();
        assert_eq!(sql(&pred, Dialect::Postgres), "0 = 1", "value {:?}", value);
    }
    assert!(compile(&spec, " 12 ").is_some());
}

#[test]
fn test_quotes_in_value_stay_in_params() {
    let pred = compile(&spec(ColumnOptions::direct()), "O'Brien").unwrap();
    let bound = pred.expr().to_bound_sql(Dialect::MySql);

    assert!(!bound.sql.contains("Brien"));
    assert_eq!(bound.params, vec![Value::from("%O'Brien%")]);
}
