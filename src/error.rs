use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The id namespace an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Concept,
    Field,
    Entry,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Concept => "concept",
            EntityKind::Field => "field",
            EntityKind::Entry => "entry",
        };
        f.write_str(name)
    }
}

/// Failures reported by the store. Any of these leaves the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} id already exists: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("unknown {kind} id: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A history record carries a tag this build cannot apply. Replay must stop.
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("malformed {event_type} event: {reason}")]
    MalformedEvent { event_type: String, reason: String },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

impl StoreError {
    pub(crate) fn duplicate(kind: EntityKind, id: impl fmt::Display) -> Self {
        StoreError::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
