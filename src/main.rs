use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use locad::config::DEFAULT_CONFIG_FILE;
use locad::{id, Config, ConceptId, EntryId, FieldId, Journal, Store, ValueFormatter};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about = "Concepts, fields and entries backed by an event log")]
struct Cli {
    #[clap(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// History file, overrides the config
    #[clap(short, long, global = true)]
    journal: Option<PathBuf>,
    /// Locale tag for rendering values, overrides the config
    #[clap(long, global = true)]
    locale: Option<String>,
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all concepts
    Concepts,
    /// Print a concept's entries as a table
    Show {
        concept: String,
        /// Show stored text instead of formatted values
        #[clap(long)]
        raw: bool,
    },
    /// Print the event log
    History,
    Concept {
        #[clap(subcommand)]
        command: ConceptCommands,
    },
    Field {
        #[clap(subcommand)]
        command: FieldCommands,
    },
    Entry {
        #[clap(subcommand)]
        command: EntryCommands,
    },
    Undo,
    Redo,
    /// Render a value the way a cell would show it
    Format {
        raw: String,
        #[clap(long)]
        editing: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConceptCommands {
    Create {
        #[clap(long)]
        name: Option<String>,
    },
    Rename {
        id: String,
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum FieldCommands {
    Create {
        concept: String,
        #[clap(long)]
        name: Option<String>,
    },
    Rename {
        id: String,
        name: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum EntryCommands {
    Create {
        concept: String,
    },
    /// Set a value; omit it to clear the cell
    Set {
        entry: String,
        field: String,
        value: Option<String>,
    },
    Delete {
        id: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(args.log_level.as_deref());

    let mut config = Config::load(&args.config)?;
    if let Some(journal) = args.journal {
        config.journal = journal;
    }
    if let Some(tag) = args.locale {
        config.locale.tag = tag;
    }

    let formatter = ValueFormatter::new(config.locale.resolve());
    let journal = Journal::open(&config.journal);
    let mut store = journal.load_store()?;

    let changed = run(args.command, &mut store, &formatter)?;
    if changed {
        info!(events = store.history().len(), "saving history");
        if !journal.persist(&store) {
            eprintln!(
                "warning: history could not be saved to {}",
                journal.path().display()
            );
        }
    }

    Ok(())
}

/// Execute one command. Returns whether the store changed.
fn run(command: Commands, store: &mut Store, formatter: &ValueFormatter) -> Result<bool> {
    match command {
        Commands::Concepts => {
            for concept in store.concepts().values() {
                println!(
                    "{}  {} ({} fields, {} entries)",
                    concept.id,
                    display_name(&concept.name, "New concept"),
                    concept.field_ids.len(),
                    concept.entry_ids.len()
                );
            }
            Ok(false)
        }
        Commands::Show { concept, raw } => {
            print_table(store, &ConceptId::new(concept), formatter, raw)?;
            Ok(false)
        }
        Commands::History => {
            for event in store.history() {
                println!("{}", serde_json::to_string(event)?);
            }
            Ok(false)
        }
        Commands::Concept { command } => match command {
            ConceptCommands::Create { name } => {
                let concept_id = id::new_concept_id();
                store.create_concept(concept_id.clone())?;
                if let Some(name) = name {
                    store.rename_concept(concept_id.clone(), name)?;
                }
                println!("{}", concept_id);
                Ok(true)
            }
            ConceptCommands::Rename { id, name } => {
                let concept_id = ConceptId::new(id);
                let current = store.concept(&concept_id).map(|c| c.name.clone());
                if current.as_deref() == Some(name.as_str()) {
                    return Ok(false);
                }
                store.rename_concept(concept_id, name)?;
                Ok(true)
            }
        },
        Commands::Field { command } => match command {
            FieldCommands::Create { concept, name } => {
                let field_id = id::new_field_id();
                store.create_field(field_id.clone(), ConceptId::new(concept))?;
                if let Some(name) = name {
                    store.rename_field(field_id.clone(), name)?;
                }
                println!("{}", field_id);
                Ok(true)
            }
            FieldCommands::Rename { id, name } => {
                let field_id = FieldId::new(id);
                let current = store.field(&field_id).map(|f| f.name.clone());
                if current.as_deref() == Some(name.as_str()) {
                    return Ok(false);
                }
                store.rename_field(field_id, name)?;
                Ok(true)
            }
            FieldCommands::Delete { id } => {
                store.delete_field(FieldId::new(id))?;
                Ok(true)
            }
        },
        Commands::Entry { command } => match command {
            EntryCommands::Create { concept } => {
                let entry_id = id::new_entry_id();
                store.create_entry(entry_id.clone(), ConceptId::new(concept), None)?;
                println!("{}", entry_id);
                Ok(true)
            }
            EntryCommands::Set {
                entry,
                field,
                value,
            } => {
                let entry_id = EntryId::new(entry);
                let field_id = FieldId::new(field);
                let value = value.map(|v| v.trim().to_string());
                let current = store.graph().entry_value(&entry_id, &field_id);
                if current == value.as_deref().filter(|v| !v.is_empty()) {
                    return Ok(false);
                }
                store.update_entry_field_value(entry_id, field_id, value)?;
                Ok(true)
            }
            EntryCommands::Delete { id } => {
                store.delete_entry(EntryId::new(id))?;
                Ok(true)
            }
        },
        Commands::Undo => {
            store.undo()?;
            Ok(true)
        }
        Commands::Redo => {
            store.redo()?;
            Ok(true)
        }
        Commands::Format { raw, editing } => {
            if let Some(text) = formatter.format(Some(&raw), editing) {
                println!("{}", text);
            }
            Ok(false)
        }
    }
}

fn print_table(
    store: &Store,
    concept_id: &ConceptId,
    formatter: &ValueFormatter,
    raw: bool,
) -> Result<()> {
    let graph = store.graph();
    let concept = graph
        .concept(concept_id)
        .with_context(|| format!("Concept not found: {}", concept_id))?;
    let fields = graph.concept_fields(concept_id);

    let mut rows = vec![std::iter::once("Row".to_string())
        .chain(fields.iter().map(|f| display_name(&f.name, "New field").to_string()))
        .collect::<Vec<_>>()];

    for (index, entry) in graph.concept_entries(concept_id).iter().enumerate() {
        let mut row = vec![(index + 1).to_string()];
        for field in &fields {
            let value = formatter.format(entry.value(&field.id), raw).unwrap_or_default();
            row.push(value);
        }
        rows.push(row);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|col| rows.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
        .collect();

    println!("{}", display_name(&concept.name, "New concept"));
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        println!("{}", line.join(" | ").trim_end());
    }

    Ok(())
}

fn display_name<'a>(name: &'a str, placeholder: &'a str) -> &'a str {
    if name.is_empty() {
        placeholder
    } else {
        name
    }
}

fn setup_logging(log_level: Option<&str>) {
    let filter = match log_level.map(str::to_lowercase).as_deref() {
        Some("trace") => Level::TRACE.to_string(),
        Some("debug") => Level::DEBUG.to_string(),
        Some("warn") => Level::WARN.to_string(),
        Some("error") => Level::ERROR.to_string(),
        Some(_) => Level::INFO.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "locad=info".to_string()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
