mod fixtures;

use assert_matches::assert_matches;
use fixtures::*;
use locad::{EntityGraph, Store, StoreError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_undo_underflow_changes_nothing() {
    let mut store = Store::new();
    assert_matches!(store.undo(), Err(StoreError::NothingToUndo));
    assert!(store.history().is_empty());
    assert!(store.graph().is_empty());

    store.create_concept("concept:a").unwrap();
    store.undo().unwrap();
    let graph = store.graph().clone();
    let logged = store.history().len();

    assert_matches!(store.undo(), Err(StoreError::NothingToUndo));
    assert_eq!(store.graph(), &graph);
    assert_eq!(store.history().len(), logged);
}

#[test]
fn test_undo_restores_cascaded_values() {
    let (mut store, books) = create_books_store();
    let before = store.graph().clone();

    store.delete_field(books.price.clone()).unwrap();
    let after = store.graph().clone();
    assert_eq!(store.graph().entry_value(&books.dune, &books.price), None);

    store.undo().unwrap();
    assert_eq!(store.graph(), &before);
    assert_eq!(
        store.graph().entry_value(&books.dune, &books.price),
        Some("USD 12.50")
    );

    store.redo().unwrap();
    assert_eq!(store.graph(), &after);
}

#[test]
fn test_undo_walks_back_in_order() {
    let mut store = Store::new();
    let mut states = vec![store.graph().clone()];

    store.create_concept("concept:a").unwrap();
    states.push(store.graph().clone());
    store.create_field("field:x", "concept:a").unwrap();
    states.push(store.graph().clone());
    store.create_entry("entry:1", "concept:a", None).unwrap();
    states.push(store.graph().clone());

    for expected in states.iter().rev().skip(1) {
        store.undo().unwrap();
        assert_eq!(store.graph(), expected);
    }
    assert!(!store.can_undo());
    assert_eq!(store.redo_depth(), 3);

    for expected in states.iter().skip(1) {
        store.redo().unwrap();
        assert_eq!(store.graph(), expected);
    }
    assert!(!store.can_redo());
}

#[test]
fn test_new_event_invalidates_redo() {
    let (mut store, books) = create_books_store();
    store.undo().unwrap();
    store.undo().unwrap();
    assert!(store.can_redo());

    store.rename_concept(books.concept.clone(), "Library").unwrap();
    assert!(!store.can_redo());
    assert_matches!(store.redo(), Err(StoreError::NothingToRedo));
}

#[test]
fn test_failed_command_keeps_redo() {
    let mut store = Store::new();
    store.create_concept("concept:a").unwrap();
    store.undo().unwrap();

    assert!(store.create_field("field:x", "concept:a").is_err());
    assert!(store.can_redo());
}

#[test]
fn test_time_travel_is_logged() {
    let mut store = Store::new();
    store.create_concept("concept:a").unwrap();
    store.undo().unwrap();
    store.redo().unwrap();
    store.undo().unwrap();

    let types: Vec<&str> = store.history().iter().map(|e| e.type_name()).collect();
    assert_eq!(types, vec!["CONCEPT_CREATED", "UNDO", "REDO", "UNDO"]);
    assert!(store.concepts().is_empty());
}

proptest! {
    #[test]
    fn prop_undo_redo_inverse(
        prefix in proptest::collection::vec(op_strategy(), 0..30),
        op in ordinary_op_strategy(),
    ) {
        let mut store = Store::new();
        for step in &prefix {
            apply_op(&mut store, step);
        }

        let before = store.graph().clone();
        if !apply_op(&mut store, &op) {
            prop_assert_eq!(store.graph(), &before);
            return Ok(());
        }
        let after = store.graph().clone();

        store.undo().unwrap();
        prop_assert_eq!(store.graph(), &before);
        store.redo().unwrap();
        prop_assert_eq!(store.graph(), &after);
    }

    #[test]
    fn prop_undo_everything_returns_to_empty(
        ops in proptest::collection::vec(ordinary_op_strategy(), 0..30),
    ) {
        let mut store = Store::new();
        for op in &ops {
            apply_op(&mut store, op);
        }

        while store.can_undo() {
            store.undo().unwrap();
        }
        prop_assert_eq!(store.graph(), &EntityGraph::new());
    }

    #[test]
    fn prop_redo_invalidation(
        ops in proptest::collection::vec(op_strategy(), 1..30),
        next in ordinary_op_strategy(),
    ) {
        let mut store = Store::new();
        for op in &ops {
            apply_op(&mut store, op);
        }
        if store.can_undo() {
            store.undo().unwrap();
        }

        if apply_op(&mut store, &next) {
            prop_assert!(!store.can_redo());
        }
    }
}
