//! Undo/redo manager for the drawing surface
//!
//! Entries are whole-surface [`Snapshot`]s taken *before* a reversible
//! mutation, so undoing restores the image as it was at the last boundary.

use crate::surface::Snapshot;

/// Manages undo/redo stacks of surface snapshots
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl History {
    /// Create a new history with default depth (50)
    pub fn new() -> Self {
        Self::with_depth(50)
    }

    /// Create with custom maximum undo depth
    pub fn with_depth(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record the pre-mutation state; a new mutation invalidates redo
    pub fn push(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        self.push_undo(snapshot);
    }

    /// Drop the redo future without recording an undo point
    pub fn invalidate_redo(&mut self) {
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);

        // Trim if exceeds max depth
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Step back. `current` is only called when there is something to undo;
    /// its result goes on the redo stack. Returns the snapshot to restore.
    pub fn undo(&mut self, current: impl FnOnce() -> Snapshot) -> Option<Snapshot> {
        let target = self.undo_stack.pop()?;
        self.redo_stack.push(current());
        Some(target)
    }

    /// Step forward again; mirror image of [`History::undo`].
    pub fn redo(&mut self, current: impl FnOnce() -> Snapshot) -> Option<Snapshot> {
        let target = self.redo_stack.pop()?;
        self.push_undo(current());
        Some(target)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
