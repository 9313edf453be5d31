//! Integration tests for column registration and lookup.

use tablesift::sql::{table_col, OrderByExpr, SortDir};
use tablesift::table::{ColumnKind, ColumnOptions, ColumnRegistry, ColumnType, RegistryError};

fn users() -> ColumnRegistry {
    let mut registry = ColumnRegistry::new("users");
    registry.register("name", ColumnOptions::direct()).unwrap();
    registry
        .register("company", ColumnOptions::external("companies", "name"))
        .unwrap();
    registry
        .register("post_count", ColumnOptions::having("COUNT(posts.id)"))
        .unwrap();
    registry
        .register("email", ColumnOptions::direct().global())
        .unwrap();
    registry
}

#[test]
fn test_lookup_returns_spec_at_each_position() {
    let registry = users();

    for (position, spec) in registry.columns().iter().enumerate() {
        let found = registry.lookup(position).unwrap();
        assert_eq!(found.position(), position);
        assert_eq!(found.name(), spec.name());
    }
}

#[test]
fn test_lookup_outside_range_is_absent() {
    let registry = users();
    assert!(registry.lookup(registry.len()).is_none());
    assert!(registry.lookup(999).is_none());
}

#[test]
fn test_kinds_are_preserved() {
    let registry = users();

    assert!(matches!(registry.lookup(0).unwrap().kind(), ColumnKind::Direct));
    match registry.lookup(1).unwrap().kind() {
        ColumnKind::External { relation, column } => {
            assert_eq!(relation, "companies");
            assert_eq!(column, "name");
        }
        other => panic!("expected external column, got {:?}", other),
    }
    assert!(matches!(
        registry.lookup(2).unwrap().kind(),
        ColumnKind::Having { clause } if clause == "COUNT(posts.id)"
    ));
}

#[test]
fn test_single_global_filter() {
    let mut registry = users();
    assert_eq!(registry.global().unwrap().position(), 3);

    let err = registry
        .register("name_again", ColumnOptions::direct().global())
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateGlobal { .. }));
    assert!(err.to_string().contains("email"));
}

#[test]
fn test_register_returns_spec_for_further_configuration() {
    let mut registry = ColumnRegistry::new("events");
    registry
        .register("starts_at", ColumnOptions::direct())
        .unwrap()
        .set_column_type(ColumnType::Integer)
        .sort_with(|dir| {
            vec![OrderByExpr::new(table_col("events", "starts_at")).with_dir(dir.into())]
        });

    let spec = registry.lookup(0).unwrap();
    assert_eq!(spec.column_type(), ColumnType::Integer);
    let terms = (spec.sorter().unwrap())(tablesift::table::SortDirection::Desc);
    assert_eq!(terms[0].dir, Some(SortDir::Desc));
}

#[test]
fn test_registry_is_shareable_between_threads() {
    let registry = std::sync::Arc::new(users());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || registry.lookup(i).map(|s| s.name().to_string()))
        })
        .collect();

    let names: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            Some("name".to_string()),
            Some("company".to_string()),
            Some("post_count".to_string()),
            Some("email".to_string()),
        ]
    );
}
