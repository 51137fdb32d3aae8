// locad - event-sourced concepts, fields and entries

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod graph;
pub mod id;
pub mod integrity;
pub mod journal;
pub mod locale;
pub mod model;
pub mod store;
pub mod timeline;

// Re-export main types for convenience
pub use config::{Config, LocaleConfig};
pub use error::{EntityKind, StoreError};
pub use event::{Event, EventKind};
pub use format::{classify, format_value, CellValue, FormulaError, ValueFormatter, ERROR_MARKER};
pub use graph::EntityGraph;
pub use id::{ConceptId, EntryId, FieldId, IdGenerator};
pub use integrity::{IntegrityIssue, IntegrityReport, IntegritySeverity};
pub use journal::Journal;
pub use locale::{CurrencyPlacement, Locale};
pub use model::{Concept, Entry, Field};
pub use store::{Clock, Store};
pub use timeline::{Snapshot, Timeline};
