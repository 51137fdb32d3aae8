use crate::{
    Concept, ConceptId, Entry, EntityGraph, EntryId, Event, EventKind, Field, FieldId, Snapshot,
    StoreError, Timeline,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Source of event dates
pub type Clock = fn() -> DateTime<Utc>;

/// The event-sourced knowledge base.
///
/// Owns the entity graph, the history log and the undo/redo timeline. The
/// graph is a cache: replaying [`Store::history`] into a fresh store
/// reproduces it exactly, undo and redo included.
#[derive(Debug, Clone)]
pub struct Store {
    graph: EntityGraph,
    history: Vec<Event>,
    timeline: Timeline,
    clock: Clock,
}

impl Store {
    /// Create an empty store dated by the system clock
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Create an empty store with a custom clock
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            graph: EntityGraph::new(),
            history: Vec::new(),
            timeline: Timeline::new(),
            clock,
        }
    }

    /// Rebuild a store by applying `events` in order. Stops at the first failure.
    pub fn replay(events: impl IntoIterator<Item = Event>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.replay_into(events)?;
        Ok(store)
    }

    /// Rebuild a store from raw history records, as handed over by persistence
    pub fn replay_records(records: impl IntoIterator<Item = Value>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in records {
            store.apply(Event::from_value(record)?)?;
        }
        store.report_replay();
        Ok(store)
    }

    /// Apply `events` on top of the current state
    pub fn replay_into(&mut self, events: impl IntoIterator<Item = Event>) -> Result<(), StoreError> {
        for event in events {
            self.apply(event)?;
        }
        self.report_replay();
        Ok(())
    }

    fn report_replay(&self) {
        info!(events = self.history.len(), "history replayed");
        for issue in self.graph.check_integrity().errors() {
            warn!(?issue, "integrity issue after replay");
        }
    }

    // ========== Event Application ==========

    /// Apply one event. This is the only way the graph changes.
    ///
    /// On success the event, dated if it was not already, is appended to the
    /// history. On failure nothing changes and nothing is appended.
    pub fn apply(&mut self, mut event: Event) -> Result<(), StoreError> {
        if event.date.is_none() {
            event.date = Some((self.clock)());
        }

        match &event.kind {
            EventKind::Undo => self.timeline.undo(&mut self.graph)?,
            EventKind::Redo => self.timeline.redo(&mut self.graph)?,
            kind => {
                let before = Snapshot::capture(&self.graph);
                apply_to_graph(&mut self.graph, kind)?;
                self.timeline.record(before);
            }
        }

        debug!(
            event_type = event.type_name(),
            date = ?event.date,
            undo_depth = self.timeline.undo_depth(),
            redo_depth = self.timeline.redo_depth(),
            "event applied"
        );
        self.history.push(event);
        Ok(())
    }

    fn submit(&mut self, kind: EventKind) -> Result<(), StoreError> {
        self.apply(Event::new(kind))
    }

    // ========== Commands ==========

    pub fn create_concept(&mut self, id: impl Into<ConceptId>) -> Result<(), StoreError> {
        let id = id.into();
        self.graph.ensure_concept_absent(&id)?;
        self.submit(EventKind::ConceptCreated { id })
    }

    pub fn rename_concept(
        &mut self,
        id: impl Into<ConceptId>,
        name: impl Into<String>,
    ) -> Result<(), StoreError> {
        let id = id.into();
        self.graph.ensure_concept_exists(&id)?;
        self.submit(EventKind::ConceptRenamed {
            id,
            name: name.into(),
        })
    }

    pub fn create_field(
        &mut self,
        id: impl Into<FieldId>,
        concept_id: impl Into<ConceptId>,
    ) -> Result<(), StoreError> {
        let id = id.into();
        let concept_id = concept_id.into();
        self.graph.ensure_field_absent(&id)?;
        self.graph.ensure_concept_exists(&concept_id)?;
        self.submit(EventKind::FieldCreated { id, concept_id })
    }

    pub fn rename_field(
        &mut self,
        id: impl Into<FieldId>,
        name: impl Into<String>,
    ) -> Result<(), StoreError> {
        let id = id.into();
        self.graph.ensure_field_exists(&id)?;
        self.submit(EventKind::FieldRenamed {
            id,
            name: name.into(),
        })
    }

    pub fn delete_field(&mut self, id: impl Into<FieldId>) -> Result<(), StoreError> {
        let id = id.into();
        self.graph.ensure_field_exists(&id)?;
        self.submit(EventKind::FieldDeleted { id })
    }

    /// Create an entry. Without explicit `field_ids` it gets a placeholder for
    /// each field the concept has right now.
    pub fn create_entry(
        &mut self,
        id: impl Into<EntryId>,
        concept_id: impl Into<ConceptId>,
        field_ids: Option<Vec<FieldId>>,
    ) -> Result<(), StoreError> {
        let id = id.into();
        let concept_id = concept_id.into();
        self.graph.ensure_entry_absent(&id)?;
        self.graph.ensure_concept_exists(&concept_id)?;

        let field_ids = match field_ids {
            Some(field_ids) => {
                for field_id in &field_ids {
                    self.graph.ensure_field_exists(field_id)?;
                }
                field_ids
            }
            None => self
                .graph
                .concept(&concept_id)
                .map(|concept| concept.field_ids.clone())
                .unwrap_or_default(),
        };

        self.submit(EventKind::EntryCreated {
            id,
            concept_id,
            field_ids,
        })
    }

    /// Set one cell's raw text. `None` or empty text clears it.
    pub fn update_entry_field_value(
        &mut self,
        entry_id: impl Into<EntryId>,
        field_id: impl Into<FieldId>,
        value: Option<String>,
    ) -> Result<(), StoreError> {
        let entry_id = entry_id.into();
        let field_id = field_id.into();
        self.graph.ensure_entry_exists(&entry_id)?;
        self.graph.ensure_field_exists(&field_id)?;
        self.submit(EventKind::EntryFieldUpdated {
            entry_id,
            field_id,
            value,
        })
    }

    pub fn delete_entry(&mut self, id: impl Into<EntryId>) -> Result<(), StoreError> {
        let id = id.into();
        self.graph.ensure_entry_exists(&id)?;
        self.submit(EventKind::EntryDeleted { id })
    }

    pub fn undo(&mut self) -> Result<(), StoreError> {
        if !self.can_undo() {
            return Err(StoreError::NothingToUndo);
        }
        self.submit(EventKind::Undo)?;
        info!(undo_depth = self.timeline.undo_depth(), "undo");
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), StoreError> {
        if !self.can_redo() {
            return Err(StoreError::NothingToRedo);
        }
        self.submit(EventKind::Redo)?;
        info!(redo_depth = self.timeline.redo_depth(), "redo");
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.timeline.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.timeline.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.timeline.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.timeline.redo_depth()
    }

    // ========== Read API ==========

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Every applied event in order, UNDO and REDO markers included
    pub fn history(&self) -> &[Event] {
        &self.history
    }

    pub fn concepts(&self) -> &IndexMap<ConceptId, Concept> {
        self.graph.concepts()
    }

    pub fn fields(&self) -> &IndexMap<FieldId, Field> {
        self.graph.fields()
    }

    pub fn entries(&self) -> &IndexMap<EntryId, Entry> {
        self.graph.entries()
    }

    pub fn concept(&self, id: &ConceptId) -> Option<&Concept> {
        self.graph.concept(id)
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.graph.field(id)
    }

    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.graph.entry(id)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatch an ordinary event to the matching graph operation
fn apply_to_graph(graph: &mut EntityGraph, kind: &EventKind) -> Result<(), StoreError> {
    match kind {
        EventKind::ConceptCreated { id } => graph.create_concept(id),
        EventKind::ConceptRenamed { id, name } => graph.rename_concept(id, name),
        EventKind::FieldCreated { id, concept_id } => graph.create_field(id, concept_id),
        EventKind::FieldRenamed { id, name } => graph.rename_field(id, name),
        EventKind::FieldDeleted { id } => graph.delete_field(id),
        EventKind::EntryCreated {
            id,
            concept_id,
            field_ids,
        } => graph.create_entry(id, concept_id, field_ids),
        EventKind::EntryFieldUpdated {
            entry_id,
            field_id,
            value,
        } => graph.update_entry_field_value(entry_id, field_id, value.as_deref()),
        EventKind::EntryDeleted { id } => graph.delete_entry(id),
        EventKind::Undo | EventKind::Redo => {
            unreachable!("time-travel events are handled by the timeline")
        }
    }
}
