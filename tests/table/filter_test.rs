//! Integration tests for the filter engine against SQLite.

use tablesift::executor::SqliteExecutor;
use tablesift::sql::{table_col, ExprExt, JoinType, Query, SelectExpr, TableRef};
use tablesift::table::filter::{apply_column_filters, apply_filters, global_predicate};
use tablesift::table::{ColumnOptions, ColumnRegistry, FilterMap};

fn store() -> SqliteExecutor {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor
        .execute_batch(
            "CREATE TABLE companies (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, email TEXT, company_id INTEGER);
             CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER);
             INSERT INTO companies VALUES (1, 'Acme'), (2, 'Globex');
             INSERT INTO users VALUES
                (1, 'Frank Miller', 'fm@acme.test', 1),
                (2, 'Anna Frankel', 'anna@globex.test', 2),
                (3, 'Bob Stone', 'bob@acme.test', 1),
                (4, 'Cleo Park', 'cleo@initech.test', NULL);
             INSERT INTO posts (user_id) VALUES (1), (1), (2), (3), (3), (3), (3), (3), (3), (3), (3), (3), (3), (3), (3);",
        )
        .unwrap();
    executor
}

fn registry() -> ColumnRegistry {
    let mut registry = ColumnRegistry::new("users");
    registry.register("name", ColumnOptions::direct()).unwrap();
    registry
        .register("company", ColumnOptions::external("companies", "name"))
        .unwrap();
    registry
        .register("post_count", ColumnOptions::having("COUNT(posts.id)"))
        .unwrap();
    registry
        .register("search", ColumnOptions::direct().global().noop())
        .unwrap();
    registry
}

fn base() -> Query {
    Query::new()
        .select(vec![
            SelectExpr::new(table_col("users", "id")),
            table_col("users", "name").alias("name"),
        ])
        .from(TableRef::new("users"))
        .join(
            JoinType::Left,
            TableRef::new("companies"),
            table_col("companies", "id").eq(table_col("users", "company_id")),
        )
        .join(
            JoinType::Left,
            TableRef::new("posts"),
            table_col("posts", "user_id").eq(table_col("users", "id")),
        )
        .group_by(vec![table_col("users", "id")])
}

fn ids(executor: &SqliteExecutor, query: &Query) -> Vec<i64> {
    let mut ids: Vec<i64> = executor
        .fetch_rows(query)
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_global_or_across_where_and_having_columns() {
    let executor = store();
    let registry = registry();

    // "12" hits user 3 through post_count and nobody through text columns
    let mut filters = FilterMap::from([(3, "12".to_string())]);
    let query = apply_filters(&registry, base(), &mut filters, &executor).unwrap();
    assert_eq!(ids(&executor, &query), vec![3]);
    assert!(filters.is_empty());

    // "frank" hits users 1 and 2 by name only
    let mut filters = FilterMap::from([(3, "frank".to_string())]);
    let query = apply_filters(&registry, base(), &mut filters, &executor).unwrap();
    assert_eq!(ids(&executor, &query), vec![1, 2]);

    // "acme" hits users 1 and 3 through the joined company
    let mut filters = FilterMap::from([(3, "ACME".to_string())]);
    let query = apply_filters(&registry, base(), &mut filters, &executor).unwrap();
    assert_eq!(ids(&executor, &query), vec![1, 3]);
}

#[test]
fn test_global_predicate_shape() {
    let executor = store();
    let registry = registry();

    let predicate = global_predicate(&registry, &base(), "0", &executor)
        .unwrap()
        .unwrap();
    let bound = predicate.to_bound_sql(tablesift::sql::Dialect::Sqlite);

    assert!(bound.sql.starts_with('('));
    assert!(bound.sql.contains(" OR "));
    // post_count 0 belongs to user 4 only
    assert!(bound.sql.ends_with("\"users\".\"id\" IN (?))"));
}

#[test]
fn test_per_column_filters_intersect() {
    let executor = store();
    let registry = registry();

    let by_name = FilterMap::from([(0, "an".to_string())]);
    let by_company = FilterMap::from([(1, "acme".to_string())]);
    let both = FilterMap::from([(0, "an".to_string()), (1, "acme".to_string())]);

    let name_ids = ids(&executor, &apply_column_filters(&registry, base(), &by_name));
    let company_ids = ids(&executor, &apply_column_filters(&registry, base(), &by_company));
    let both_ids = ids(&executor, &apply_column_filters(&registry, base(), &both));

    let intersection: Vec<i64> = name_ids
        .iter()
        .copied()
        .filter(|id| company_ids.contains(id))
        .collect();
    assert_eq!(name_ids, vec![1, 2]);
    assert_eq!(company_ids, vec![1, 3]);
    assert_eq!(both_ids, intersection);
}

#[test]
fn test_having_filter_composes_with_where() {
    let executor = store();
    let registry = registry();

    let filters = FilterMap::from([(1, "acme".to_string()), (2, "12".to_string())]);
    let query = apply_column_filters(&registry, base(), &filters);

    assert!(query.having.is_some());
    assert_eq!(ids(&executor, &query), vec![3]);
}

#[test]
fn test_stale_positions_are_ignored() {
    let executor = store();
    let registry = registry();

    let mut filters = FilterMap::from([(42, "zzz".to_string())]);
    let query = apply_filters(&registry, base(), &mut filters, &executor).unwrap();
    assert_eq!(ids(&executor, &query), vec![1, 2, 3, 4]);
}
