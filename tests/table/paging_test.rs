//! Integration tests for row counting and pagination.

use tablesift::executor::{CountResult, QueryExecutor, SqliteExecutor};
use tablesift::sql::{table_col, Dialect, ExprExt, Query, TableRef};
use tablesift::table::paging::{count_query, count_rows, counts};
use tablesift::table::{paginate, PageSize};

fn store() -> SqliteExecutor {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor
        .execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER);
             INSERT INTO users (name) VALUES ('a'), ('b'), ('c');
             INSERT INTO posts (user_id) VALUES (1), (1), (1), (2);",
        )
        .unwrap();
    executor
}

fn joined() -> Query {
    Query::new()
        .select_star()
        .from(TableRef::new("users"))
        .inner_join(
            TableRef::new("posts"),
            table_col("posts", "user_id").eq(table_col("users", "id")),
        )
}

fn id() -> tablesift::sql::Expr {
    table_col("users", "id")
}

#[test]
fn test_joined_rows_counted_once() {
    let executor = store();
    // 4 joined rows, 2 distinct users
    assert_eq!(count_rows(&executor, &joined(), &id()).unwrap(), 2);
}

#[test]
fn test_grouped_count_uses_number_of_groups() {
    let executor = store();
    let grouped = joined().group_by(vec![id()]);

    let result = executor.count(&count_query(&grouped, &id())).unwrap();
    match &result {
        CountResult::Grouped(groups) => {
            // the per-group counts are 1, the number of groups is what matters
            assert!(groups.iter().all(|(_, n)| *n == 1));
        }
        other => panic!("expected grouped count, got {:?}", other),
    }
    assert_eq!(result.rows(), 2);
}

#[test]
fn test_filtered_count_skipped_without_filters() {
    let executor = store();
    let base = Query::new().select_star().from(TableRef::new("users"));
    let filtered = base
        .clone()
        .filter(table_col("users", "name").eq(tablesift::sql::param("a")));

    let unfiltered = counts(&executor, &base, &filtered, false, &id()).unwrap();
    assert_eq!(unfiltered.total_rows, 3);
    assert_eq!(unfiltered.filtered_rows, 3);

    let with_filter = counts(&executor, &base, &filtered, true, &id()).unwrap();
    assert_eq!(with_filter.total_rows, 3);
    assert_eq!(with_filter.filtered_rows, 1);
}

#[test]
fn test_paginate_offsets_by_page() {
    let executor = store();
    let base = Query::new()
        .select_star()
        .from(TableRef::new("users"))
        .order_by(vec![tablesift::sql::OrderByExpr::asc(id())]);

    let page = paginate(base, 1, PageSize::Rows(2), 3);
    assert!(page.to_sql(Dialect::Sqlite).ends_with("LIMIT 2 OFFSET 2"));

    let rows = executor.fetch_rows(&page).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "c");
}

#[test]
fn test_paginate_skipped_for_all_and_large_pages() {
    let base = Query::new().select_star().from(TableRef::new("users"));

    assert_eq!(paginate(base.clone(), 5, PageSize::All, 3), base);
    assert_eq!(paginate(base.clone(), 5, PageSize::Rows(3), 3), base);
    assert_ne!(paginate(base.clone(), 0, PageSize::Rows(2), 3), base);
}
