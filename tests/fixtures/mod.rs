// Shared builders for integration tests
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use locad::{ConceptId, EntryId, FieldId, Store};
use proptest::prelude::*;

pub fn fixed_clock() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2021-06-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Ids of the "Books" sample
pub struct Books {
    pub concept: ConceptId,
    pub title: FieldId,
    pub price: FieldId,
    pub dune: EntryId,
    pub emma: EntryId,
}

/// A Books concept with Title and Price fields and two filled entries
pub fn create_books_store() -> (Store, Books) {
    let books = Books {
        concept: ConceptId::new("concept:books"),
        title: FieldId::new("field:title"),
        price: FieldId::new("field:price"),
        dune: EntryId::new("entry:dune"),
        emma: EntryId::new("entry:emma"),
    };

    let mut store = Store::with_clock(fixed_clock);
    store.create_concept(books.concept.clone()).unwrap();
    store.rename_concept(books.concept.clone(), "Books").unwrap();
    store.create_field(books.title.clone(), books.concept.clone()).unwrap();
    store.rename_field(books.title.clone(), "Title").unwrap();
    store.create_field(books.price.clone(), books.concept.clone()).unwrap();
    store.rename_field(books.price.clone(), "Price").unwrap();

    for (entry, title, price) in [
        (&books.dune, "Dune", "USD 12.50"),
        (&books.emma, "Emma", "=3*4"),
    ] {
        store.create_entry(entry.clone(), books.concept.clone(), None).unwrap();
        store
            .update_entry_field_value(entry.clone(), books.title.clone(), Some(title.into()))
            .unwrap();
        store
            .update_entry_field_value(entry.clone(), books.price.clone(), Some(price.into()))
            .unwrap();
    }

    (store, books)
}

/// Two concepts where an entry of the second holds a value for a field of the first
pub fn create_cross_concept_store() -> (Store, FieldId) {
    let mut store = Store::with_clock(fixed_clock);
    store.create_concept("concept:people").unwrap();
    store.create_concept("concept:pets").unwrap();
    store.create_field("field:name", "concept:people").unwrap();
    store.create_field("field:species", "concept:pets").unwrap();
    store.create_entry("entry:ada", "concept:people", None).unwrap();
    store.create_entry("entry:rex", "concept:pets", None).unwrap();
    store
        .update_entry_field_value("entry:ada", "field:name", Some("Ada".into()))
        .unwrap();
    store
        .update_entry_field_value("entry:rex", "field:name", Some("Rex".into()))
        .unwrap();

    (store, FieldId::new("field:name"))
}

/// A command drawn from small id pools so generated sequences collide often
#[derive(Debug, Clone)]
pub enum Op {
    CreateConcept(usize),
    RenameConcept(usize, String),
    CreateField(usize, usize),
    RenameField(usize, String),
    DeleteField(usize),
    CreateEntry(usize, usize),
    SetValue(usize, usize, Option<String>),
    DeleteEntry(usize),
    Undo,
    Redo,
}

impl Op {
    pub fn is_time_travel(&self) -> bool {
        matches!(self, Op::Undo | Op::Redo)
    }
}

fn concept(i: usize) -> ConceptId {
    ConceptId::new(format!("concept:{}", i))
}

fn field(i: usize) -> FieldId {
    FieldId::new(format!("field:{}", i))
}

fn entry(i: usize) -> EntryId {
    EntryId::new(format!("entry:{}", i))
}

/// Run an op through the command layer. Returns whether it was accepted.
pub fn apply_op(store: &mut Store, op: &Op) -> bool {
    let result = match op {
        Op::CreateConcept(c) => store.create_concept(concept(*c)),
        Op::RenameConcept(c, name) => store.rename_concept(concept(*c), name.clone()),
        Op::CreateField(f, c) => store.create_field(field(*f), concept(*c)),
        Op::RenameField(f, name) => store.rename_field(field(*f), name.clone()),
        Op::DeleteField(f) => store.delete_field(field(*f)),
        Op::CreateEntry(e, c) => store.create_entry(entry(*e), concept(*c), None),
        Op::SetValue(e, f, value) => store.update_entry_field_value(entry(*e), field(*f), value.clone()),
        Op::DeleteEntry(e) => store.delete_entry(entry(*e)),
        Op::Undo => store.undo(),
        Op::Redo => store.redo(),
    };
    result.is_ok()
}

pub fn ordinary_op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0..3usize).prop_map(Op::CreateConcept),
        1 => (0..3usize, "[a-z]{0,4}").prop_map(|(c, n)| Op::RenameConcept(c, n)),
        3 => (0..4usize, 0..3usize).prop_map(|(f, c)| Op::CreateField(f, c)),
        1 => (0..4usize, "[a-z]{0,4}").prop_map(|(f, n)| Op::RenameField(f, n)),
        1 => (0..4usize).prop_map(Op::DeleteField),
        3 => (0..4usize, 0..3usize).prop_map(|(e, c)| Op::CreateEntry(e, c)),
        4 => (0..4usize, 0..4usize, proptest::option::of("[a-z0-9%=. ]{0,5}"))
            .prop_map(|(e, f, v)| Op::SetValue(e, f, v)),
        1 => (0..4usize).prop_map(Op::DeleteEntry),
    ]
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => ordinary_op_strategy(),
        1 => Just(Op::Undo),
        1 => Just(Op::Redo),
    ]
}
