use crate::{ConceptId, EntryId, FieldId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A user-defined record type, analogous to a table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Concept {
    pub id: ConceptId,

    /// Display name, empty until renamed
    pub name: String,

    /// Columns owned by this concept, in display order
    pub field_ids: Vec<FieldId>,

    /// Rows owned by this concept, in creation order
    pub entry_ids: Vec<EntryId>,
}

impl Concept {
    /// Create an empty, unnamed concept
    pub fn new(id: ConceptId) -> Self {
        Self {
            id,
            name: String::new(),
            field_ids: Vec::new(),
            entry_ids: Vec::new(),
        }
    }

    pub fn owns_field(&self, field_id: &FieldId) -> bool {
        self.field_ids.contains(field_id)
    }

    pub fn owns_entry(&self, entry_id: &EntryId) -> bool {
        self.entry_ids.contains(entry_id)
    }
}

/// A named column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
}

impl Field {
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }
}

/// A row holding one raw text value per field.
///
/// A key mapped to `None` is a placeholder: the column exists for this row but
/// nothing has been typed into it yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub fields: IndexMap<FieldId, Option<String>>,
}

impl Entry {
    pub fn new(id: EntryId) -> Self {
        Self {
            id,
            fields: IndexMap::new(),
        }
    }

    /// Create an entry with empty placeholders for the given fields
    pub fn with_placeholders<'a>(id: EntryId, field_ids: impl IntoIterator<Item = &'a FieldId>) -> Self {
        let mut entry = Self::new(id);
        for field_id in field_ids {
            entry.fields.insert(field_id.clone(), None);
        }
        entry
    }

    /// Raw stored text for a field, if any
    pub fn value(&self, field_id: &FieldId) -> Option<&str> {
        self.fields.get(field_id).and_then(|v| v.as_deref())
    }

    /// Store a value; `None` and empty text both clear the cell
    pub fn set_value(&mut self, field_id: FieldId, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.fields.insert(field_id, value);
    }

    /// Add a `None` placeholder unless the field already has a slot
    pub fn ensure_placeholder(&mut self, field_id: &FieldId) {
        if !self.fields.contains_key(field_id) {
            self.fields.insert(field_id.clone(), None);
        }
    }

    /// Drop the field's slot entirely. Returns whether it was present.
    pub fn remove_field(&mut self, field_id: &FieldId) -> bool {
        self.fields.shift_remove(field_id).is_some()
    }
}
