/// Example: Building a small table of books
///
/// This example demonstrates:
/// - Creating a concept with fields and entries
/// - Storing raw values and rendering them through a locale
/// - Undoing and redoing edits
/// - Saving the history and rebuilding the store by replay

use anyhow::Result;
use locad::*;
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("=== locad: Simple Workflow Example ===\n");

    let mut store = Store::new();
    let mut ids = IdGenerator::sequential();

    // Step 1: A concept with two fields
    println!("Step 1: Creating concept...");
    let books = ids.concept_id();
    store.create_concept(books.clone())?;
    store.rename_concept(books.clone(), "Books")?;

    let title = ids.field_id();
    let price = ids.field_id();
    store.create_field(title.clone(), books.clone())?;
    store.rename_field(title.clone(), "Title")?;
    store.create_field(price.clone(), books.clone())?;
    store.rename_field(price.clone(), "Price")?;
    println!("  ✓ Created 'Books' with fields {} and {}", title, price);

    // Step 2: Entries get a placeholder per field
    println!("\nStep 2: Adding entries...");
    let dune = ids.entry_id();
    let emma = ids.entry_id();
    store.create_entry(dune.clone(), books.clone(), None)?;
    store.create_entry(emma.clone(), books.clone(), None)?;
    store.update_entry_field_value(dune.clone(), title.clone(), Some("Dune".into()))?;
    store.update_entry_field_value(dune.clone(), price.clone(), Some("USD 12.50".into()))?;
    store.update_entry_field_value(emma.clone(), title.clone(), Some("Emma".into()))?;
    store.update_entry_field_value(emma.clone(), price.clone(), Some("=3*4+0.99".into()))?;
    println!("  ✓ Added {} entries", store.entries().len());

    // Step 3: Values render per locale, raw text is kept
    println!("\nStep 3: Rendering values...");
    for formatter in [
        ValueFormatter::new(Locale::en_us()),
        ValueFormatter::new(Locale::de_de()),
    ] {
        for entry in store.graph().concept_entries(&books) {
            let shown: Vec<String> = [&title, &price]
                .iter()
                .map(|field| formatter.format(entry.value(field), false).unwrap_or_default())
                .collect();
            println!("  [{}] {}", formatter.locale().tag, shown.join(" | "));
        }
    }

    // Step 4: Cascading delete, then undo it
    println!("\nStep 4: Undo and redo...");
    store.delete_field(price.clone())?;
    println!("  ✓ Deleted 'Price': {} field(s) left", store.fields().len());
    store.undo()?;
    println!("  ✓ Undo: price is back ({:?})", store.graph().entry_value(&dune, &price));
    store.redo()?;
    store.undo()?;
    println!("  ✓ Redo then undo: {} field(s)", store.fields().len());

    // Step 5: Persist and replay
    println!("\nStep 5: Saving and replaying...");
    let path = std::env::temp_dir().join("locad-demo-history.jsonl");
    let journal = Journal::open(PathBuf::from(&path));
    journal.save(store.history())?;
    println!("  ✓ Saved {} events to {}", store.history().len(), path.display());

    let restored = journal.load_store()?;
    assert_eq!(restored.graph(), store.graph());
    println!("  ✓ Replayed store matches (can redo: {})", restored.can_redo());

    let report = restored.graph().check_integrity();
    println!("  ✓ Integrity: {} issue(s)", report.issues.len());

    std::fs::remove_file(&path)?;
    println!("\n=== Example Complete ===");
    Ok(())
}
