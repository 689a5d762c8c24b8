#![forbid(unsafe_code)]

//! Bounded snapshot history for undo and redo.
//!
//! [`LayoutHistory`] keeps whole [`LayoutState`] values behind [`Arc`]s.
//! States are built from `im` collections, so each snapshot shares almost
//! all of its memory with its neighbours and capturing one is O(1).
//!
//! The live state is owned by the caller (see
//! [`LayoutEditor`](crate::LayoutEditor)); the stacks only hold the states
//! on either side of it.
//!
//! ```text
//! record(k1, s0); record(k2, s1)       current = s2
//! ┌────────────────────────────────────────────┐
//! │ Undo:  [(k1, s0), (k2, s1)]                │
//! │ Redo:  []                                  │
//! └────────────────────────────────────────────┘
//!
//! undo(s2) -> s1                       current = s1
//! ┌────────────────────────────────────────────┐
//! │ Undo:  [(k1, s0)]                          │
//! │ Redo:  [(k2, s2)]                          │
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `undo_depth() <= max_depth` after every operation.
//! 2. `record` clears the redo stack.
//! 3. `undo` followed by `redo` hands back the exact state passed to `undo`.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::command::{LayoutCommandKind, LayoutState};

/// One recorded step: the command family and the state it replaced.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub kind: LayoutCommandKind,
    pub state: Arc<LayoutState>,
}

/// Undo and redo stacks of layout snapshots.
#[derive(Debug, Clone)]
pub struct LayoutHistory {
    /// Most recent at the back.
    undo_stack: VecDeque<UndoEntry>,
    /// Most recently undone at the back.
    redo_stack: VecDeque<UndoEntry>,
    max_depth: usize,
}

impl Default for LayoutHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl LayoutHistory {
    /// History retaining at most `max_depth` undo entries (minimum 1).
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Record the state that `kind` is about to replace. Clears redo.
    pub fn record(&mut self, kind: LayoutCommandKind, before: Arc<LayoutState>) {
        self.redo_stack.clear();
        self.undo_stack.push_back(UndoEntry {
            kind,
            state: before,
        });
        self.enforce_depth();
        tracing::debug!(
            target: "dashgrid.history",
            kind = %kind,
            undo_depth = self.undo_stack.len(),
            "history recorded"
        );
    }

    /// Step back. `current` moves to the redo stack and the previous state
    /// is returned, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Arc<LayoutState>) -> Option<Arc<LayoutState>> {
        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(UndoEntry {
            kind: entry.kind,
            state: current,
        });
        tracing::debug!(
            target: "dashgrid.history",
            kind = %entry.kind,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history undo"
        );
        Some(entry.state)
    }

    /// Step forward. `current` moves back onto the undo stack and the
    /// redone state is returned, or `None` when there is nothing to redo.
    pub fn redo(&mut self, current: Arc<LayoutState>) -> Option<Arc<LayoutState>> {
        let entry = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(UndoEntry {
            kind: entry.kind,
            state: current,
        });
        self.enforce_depth();
        tracing::debug!(
            target: "dashgrid.history",
            kind = %entry.kind,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history redo"
        );
        Some(entry.state)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Drop redo entries after an unrecorded change to the live state.
    ///
    /// Undo entries stay.
    pub fn clear_redo(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        tracing::debug!(
            target: "dashgrid.history",
            dropped = self.redo_stack.len(),
            "redo cleared"
        );
        self.redo_stack.clear();
    }

    // ====================================================================
    // Query
    // ====================================================================

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Kind of the command `undo` would revert.
    #[must_use]
    pub fn last_kind(&self) -> Option<LayoutCommandKind> {
        self.undo_stack.back().map(|entry| entry.kind)
    }

    // ====================================================================
    // Internal
    // ====================================================================

    fn enforce_depth(&mut self) {
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }
}
