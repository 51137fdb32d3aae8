//! Undo/redo stacks of whole-graph snapshots.
//!
//! Every ordinary event pushes the state it replaced onto the undo stack and
//! forecloses redo. UNDO and REDO swap the current graph with the top of one
//! stack and push the state they left onto the other, so at most one stack
//! grows per applied event.

use crate::{EntityGraph, StoreError};
use std::mem;

/// A full structural copy of the entity graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(EntityGraph);

impl Snapshot {
    pub fn capture(graph: &EntityGraph) -> Self {
        Self(graph.clone())
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.0
    }

    fn into_graph(self) -> EntityGraph {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state that an ordinary event just replaced
    pub fn record(&mut self, before: Snapshot) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
    }

    /// Step back: `graph` becomes the previous state, the current one is kept for redo
    pub fn undo(&mut self, graph: &mut EntityGraph) -> Result<(), StoreError> {
        let previous = self.undo_stack.pop().ok_or(StoreError::NothingToUndo)?;
        let current = mem::replace(graph, previous.into_graph());
        self.redo_stack.push(Snapshot(current));
        Ok(())
    }

    /// Step forward: `graph` becomes the next state, the current one is kept for undo
    pub fn redo(&mut self, graph: &mut EntityGraph) -> Result<(), StoreError> {
        let next = self.redo_stack.pop().ok_or(StoreError::NothingToRedo)?;
        let current = mem::replace(graph, next.into_graph());
        self.undo_stack.push(Snapshot(current));
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
