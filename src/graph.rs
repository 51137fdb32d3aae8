use crate::{
    Concept, ConceptId, Entry, EntityKind, EntryId, Field, FieldId, StoreError,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// All concepts, fields and entries, indexed by id.
///
/// Entities only refer to each other by id. Relationship integrity is kept by
/// the operations below: every operation checks its preconditions first and
/// mutates only when all of them hold, so a failed call leaves the graph
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGraph {
    concepts: IndexMap<ConceptId, Concept>,
    fields: IndexMap<FieldId, Field>,
    entries: IndexMap<EntryId, Entry>,
}

impl EntityGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Concepts ==========

    pub fn create_concept(&mut self, id: &ConceptId) -> Result<(), StoreError> {
        self.ensure_concept_absent(id)?;
        self.concepts.insert(id.clone(), Concept::new(id.clone()));
        Ok(())
    }

    pub fn rename_concept(&mut self, id: &ConceptId, name: &str) -> Result<(), StoreError> {
        let concept = self
            .concepts
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Concept, id))?;
        concept.name = name.to_string();
        Ok(())
    }

    // ========== Fields ==========

    /// Add a field to a concept, backfilling placeholders into the concept's entries
    pub fn create_field(&mut self, id: &FieldId, concept_id: &ConceptId) -> Result<(), StoreError> {
        self.ensure_field_absent(id)?;
        let concept = self
            .concepts
            .get_mut(concept_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Concept, concept_id))?;

        concept.field_ids.push(id.clone());
        for entry_id in &concept.entry_ids {
            if let Some(entry) = self.entries.get_mut(entry_id) {
                entry.ensure_placeholder(id);
            }
        }

        self.fields.insert(id.clone(), Field::new(id.clone()));
        Ok(())
    }

    pub fn rename_field(&mut self, id: &FieldId, name: &str) -> Result<(), StoreError> {
        let field = self
            .fields
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Field, id))?;
        field.name = name.to_string();
        Ok(())
    }

    /// Delete a field and strip it from every entry and concept.
    ///
    /// The scan is graph-wide: entries may hold values for fields outside
    /// their own concept, so the owning concept alone is not enough.
    pub fn delete_field(&mut self, id: &FieldId) -> Result<(), StoreError> {
        if self.fields.shift_remove(id).is_none() {
            return Err(StoreError::not_found(EntityKind::Field, id));
        }

        for entry in self.entries.values_mut() {
            entry.remove_field(id);
        }
        for concept in self.concepts.values_mut() {
            concept.field_ids.retain(|field_id| field_id != id);
        }

        Ok(())
    }

    // ========== Entries ==========

    /// Add an entry to a concept with placeholders for `field_ids`
    pub fn create_entry(
        &mut self,
        id: &EntryId,
        concept_id: &ConceptId,
        field_ids: &[FieldId],
    ) -> Result<(), StoreError> {
        self.ensure_entry_absent(id)?;
        self.ensure_concept_exists(concept_id)?;
        for field_id in field_ids {
            self.ensure_field_exists(field_id)?;
        }

        if let Some(concept) = self.concepts.get_mut(concept_id) {
            concept.entry_ids.push(id.clone());
        }
        self.entries
            .insert(id.clone(), Entry::with_placeholders(id.clone(), field_ids));
        Ok(())
    }

    /// Set or clear one value.
    ///
    /// The field is not required to belong to the entry's concept.
    pub fn update_entry_field_value(
        &mut self,
        entry_id: &EntryId,
        field_id: &FieldId,
        value: Option<&str>,
    ) -> Result<(), StoreError> {
        self.ensure_field_exists(field_id)?;
        let entry = self
            .entries
            .get_mut(entry_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Entry, entry_id))?;
        entry.set_value(field_id.clone(), value.map(str::to_string));
        Ok(())
    }

    pub fn delete_entry(&mut self, id: &EntryId) -> Result<(), StoreError> {
        if self.entries.shift_remove(id).is_none() {
            return Err(StoreError::not_found(EntityKind::Entry, id));
        }

        for concept in self.concepts.values_mut() {
            concept.entry_ids.retain(|entry_id| entry_id != id);
        }

        Ok(())
    }

    // ========== Preconditions ==========

    pub fn ensure_concept_exists(&self, id: &ConceptId) -> Result<(), StoreError> {
        if self.concepts.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::not_found(EntityKind::Concept, id))
        }
    }

    pub fn ensure_concept_absent(&self, id: &ConceptId) -> Result<(), StoreError> {
        if self.concepts.contains_key(id) {
            Err(StoreError::duplicate(EntityKind::Concept, id))
        } else {
            Ok(())
        }
    }

    pub fn ensure_field_exists(&self, id: &FieldId) -> Result<(), StoreError> {
        if self.fields.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::not_found(EntityKind::Field, id))
        }
    }

    pub fn ensure_field_absent(&self, id: &FieldId) -> Result<(), StoreError> {
        if self.fields.contains_key(id) {
            Err(StoreError::duplicate(EntityKind::Field, id))
        } else {
            Ok(())
        }
    }

    pub fn ensure_entry_exists(&self, id: &EntryId) -> Result<(), StoreError> {
        if self.entries.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::not_found(EntityKind::Entry, id))
        }
    }

    pub fn ensure_entry_absent(&self, id: &EntryId) -> Result<(), StoreError> {
        if self.entries.contains_key(id) {
            Err(StoreError::duplicate(EntityKind::Entry, id))
        } else {
            Ok(())
        }
    }

    // ========== Queries ==========

    pub fn concept(&self, id: &ConceptId) -> Option<&Concept> {
        self.concepts.get(id)
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.get(id)
    }

    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn concepts(&self) -> &IndexMap<ConceptId, Concept> {
        &self.concepts
    }

    pub fn fields(&self) -> &IndexMap<FieldId, Field> {
        &self.fields
    }

    pub fn entries(&self) -> &IndexMap<EntryId, Entry> {
        &self.entries
    }

    /// The concept's fields in column order
    pub fn concept_fields(&self, concept_id: &ConceptId) -> Vec<&Field> {
        self.concepts
            .get(concept_id)
            .map(|concept| {
                concept
                    .field_ids
                    .iter()
                    .filter_map(|id| self.fields.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The concept's entries in row order
    pub fn concept_entries(&self, concept_id: &ConceptId) -> Vec<&Entry> {
        self.concepts
            .get(concept_id)
            .map(|concept| {
                concept
                    .entry_ids
                    .iter()
                    .filter_map(|id| self.entries.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The concept that lists `entry_id`, if any
    pub fn owning_concept(&self, entry_id: &EntryId) -> Option<&Concept> {
        self.concepts.values().find(|c| c.owns_entry(entry_id))
    }

    /// Raw stored text of one cell
    pub fn entry_value(&self, entry_id: &EntryId, field_id: &FieldId) -> Option<&str> {
        self.entries.get(entry_id).and_then(|e| e.value(field_id))
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty() && self.fields.is_empty() && self.entries.is_empty()
    }
}
