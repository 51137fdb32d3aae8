use crate::{ConceptId, EntryId, FieldId, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the history log.
///
/// Serialized as a flat object: `{"type": "FIELD_CREATED", "date": "...", "id": ..., "concept_id": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Assigned by the store when the event is applied, if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    /// Create an undated event; the store stamps it on apply
    pub fn new(kind: EventKind) -> Self {
        Self { date: None, kind }
    }

    /// Create an event with a specific timestamp
    pub fn with_date(date: DateTime<Utc>, kind: EventKind) -> Self {
        Self {
            date: Some(date),
            kind,
        }
    }

    /// The wire tag, e.g. `"ENTRY_FIELD_UPDATED"`
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Decode one stored history record.
    ///
    /// Tags outside [`EventKind::TYPE_NAMES`] are reported as
    /// [`StoreError::UnknownEventType`]; the caller must abort replay.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let tag = match value.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => {
                return Err(StoreError::MalformedEvent {
                    event_type: other.to_string(),
                    reason: "event type must be a string".to_string(),
                })
            }
            None => {
                return Err(StoreError::MalformedEvent {
                    event_type: String::new(),
                    reason: "missing event type".to_string(),
                })
            }
        };

        if !EventKind::TYPE_NAMES.contains(&tag.as_str()) {
            return Err(StoreError::UnknownEventType(tag));
        }

        serde_json::from_value(value).map_err(|e| StoreError::MalformedEvent {
            event_type: tag,
            reason: e.to_string(),
        })
    }
}

/// Every state transition the store knows how to apply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    ConceptCreated {
        id: ConceptId,
    },

    ConceptRenamed {
        id: ConceptId,
        name: String,
    },

    FieldCreated {
        id: FieldId,
        concept_id: ConceptId,
    },

    FieldRenamed {
        id: FieldId,
        name: String,
    },

    FieldDeleted {
        id: FieldId,
    },

    EntryCreated {
        id: EntryId,
        concept_id: ConceptId,
        /// Fields seeded with empty placeholders; absent in older logs
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        field_ids: Vec<FieldId>,
    },

    EntryFieldUpdated {
        entry_id: EntryId,
        field_id: FieldId,
        #[serde(default)]
        value: Option<String>,
    },

    EntryDeleted {
        id: EntryId,
    },

    Undo,

    Redo,
}

impl EventKind {
    pub const TYPE_NAMES: &'static [&'static str] = &[
        "CONCEPT_CREATED",
        "CONCEPT_RENAMED",
        "FIELD_CREATED",
        "FIELD_RENAMED",
        "FIELD_DELETED",
        "ENTRY_CREATED",
        "ENTRY_FIELD_UPDATED",
        "ENTRY_DELETED",
        "UNDO",
        "REDO",
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::ConceptCreated { .. } => "CONCEPT_CREATED",
            EventKind::ConceptRenamed { .. } => "CONCEPT_RENAMED",
            EventKind::FieldCreated { .. } => "FIELD_CREATED",
            EventKind::FieldRenamed { .. } => "FIELD_RENAMED",
            EventKind::FieldDeleted { .. } => "FIELD_DELETED",
            EventKind::EntryCreated { .. } => "ENTRY_CREATED",
            EventKind::EntryFieldUpdated { .. } => "ENTRY_FIELD_UPDATED",
            EventKind::EntryDeleted { .. } => "ENTRY_DELETED",
            EventKind::Undo => "UNDO",
            EventKind::Redo => "REDO",
        }
    }

    /// UNDO and REDO move through snapshots instead of editing entities
    pub fn is_time_travel(&self) -> bool {
        matches!(self, EventKind::Undo | EventKind::Redo)
    }
}
