//! Integration tests for the sort engine.

use insta::assert_snapshot;
use tablesift::executor::SqliteExecutor;
use tablesift::sql::{Dialect, Query, TableRef};
use tablesift::table::{apply_sort, ColumnOptions, ColumnRegistry, SortDirection, SortMap};

fn registry() -> ColumnRegistry {
    let mut registry = ColumnRegistry::new("users");
    registry.register("name", ColumnOptions::direct()).unwrap();
    registry
        .register("company", ColumnOptions::external("companies", "name"))
        .unwrap();
    registry
}

fn base() -> Query {
    Query::new().select_star().from(TableRef::new("users"))
}

#[test]
fn test_direction_codes() {
    assert_eq!(SortDirection::from_code(0), SortDirection::Asc);
    assert_eq!(SortDirection::from_code(1), SortDirection::Desc);
    assert_eq!(SortDirection::from_code(2), SortDirection::Asc);
    assert_eq!(SortDirection::from_code(3), SortDirection::Desc);
    assert_eq!(SortDirection::from_code(4), SortDirection::Asc);
}

#[test]
fn test_order_by_per_dialect() {
    let query = apply_sort(&registry(), base(), &SortMap::from([(0, 1)]));

    assert_snapshot!(query.to_sql(Dialect::Postgres), @r#"
    SELECT
      *
    FROM "users"
    ORDER BY "users"."name" DESC NULLS LAST
    "#);
    assert_snapshot!(query.to_sql(Dialect::MySql), @r#"
    SELECT
      *
    FROM `users`
    ORDER BY `users`.`name` IS NULL, `users`.`name` DESC
    "#);
}

#[test]
fn test_descending_puts_nulls_last_in_sqlite() {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor
        .execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO users (name) VALUES ('b'), (NULL), ('c'), ('a');",
        )
        .unwrap();

    for code in [0, 1] {
        let query = apply_sort(&registry(), base(), &SortMap::from([(0, code)]));
        let names: Vec<_> = executor
            .fetch_rows(&query)
            .unwrap()
            .into_iter()
            .map(|row| row["name"].as_str().map(str::to_string))
            .collect();

        let expected = if code == 0 {
            vec![Some("a"), Some("b"), Some("c"), None]
        } else {
            vec![Some("c"), Some("b"), Some("a"), None]
        };
        let expected: Vec<_> = expected
            .into_iter()
            .map(|n| n.map(str::to_string))
            .collect();
        assert_eq!(names, expected, "direction code {}", code);
    }
}

#[test]
fn test_external_column_sort_target() {
    let query = apply_sort(&registry(), base(), &SortMap::from([(1, 2)]));
    let sql = query.to_sql(Dialect::Postgres);
    assert!(sql.ends_with("ORDER BY \"companies\".\"name\" ASC"));
}

#[test]
fn test_unknown_position_leaves_query_unchanged() {
    let query = apply_sort(&registry(), base(), &SortMap::from([(9, 1)]));
    assert_eq!(query, base());
}
