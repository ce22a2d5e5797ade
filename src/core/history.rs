//! Undo/redo ledger of immutable graph snapshots.
//!
//! `commit` records the post-mutation state and discards any redo tail
//! (standard branching-history discard). The undo side is bounded:
//! oldest snapshots are evicted FIFO once the configured depth is
//! exceeded. Snapshots are owned here and never mutated after commit.

use std::collections::VecDeque;

use crate::config::HISTORY_DEPTH;
use crate::entities::graph::GraphSnapshot;

#[derive(Debug)]
pub struct HistoryStack {
    /// Committed states, oldest first; the back entry is the current state.
    undos: VecDeque<GraphSnapshot>,
    redos: Vec<GraphSnapshot>,
    max_depth: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::with_depth(HISTORY_DEPTH)
    }

    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undos: VecDeque::new(),
            redos: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a committed state. Clears the redo tail and evicts the
    /// oldest snapshots beyond the configured depth.
    pub fn commit(&mut self, snapshot: GraphSnapshot) {
        self.redos.clear();
        self.undos.push_back(snapshot);
        while self.undos.len() > self.max_depth {
            self.undos.pop_front();
        }
    }

    /// Step back: returns the snapshot to restore, or None when there is
    /// no earlier state to return to.
    pub fn undo(&mut self) -> Option<GraphSnapshot> {
        if self.undos.len() < 2 {
            return None;
        }
        let current = self.undos.pop_back()?;
        self.redos.push(current);
        self.undos.back().cloned()
    }

    /// Step forward after an undo: returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<GraphSnapshot> {
        let snapshot = self.redos.pop()?;
        self.undos.push_back(snapshot.clone());
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.undos.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redos.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.undos.len()
    }

    pub fn clear(&mut self) {
        self.undos.clear();
        self.redos.clear();
    }
}
