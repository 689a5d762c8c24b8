#![forbid(unsafe_code)]

//! Editing session over one dashboard layout.
//!
//! [`LayoutEditor`] owns the live [`LayoutState`], its undo history, the
//! configuration, and the breakpoint the user is currently viewing. All
//! structural edits go through [`dispatch`](LayoutEditor::dispatch), which
//! runs the pure command engine and records the replaced state when the
//! command is undoable.

use std::sync::Arc;

use dashgrid_core::Breakpoint;

use crate::command::{LayoutCommand, LayoutCommandError, LayoutState, apply_command};
use crate::config::LayoutConfig;
use crate::history::LayoutHistory;
use crate::identity::IdentityMapping;
use crate::stash::Stash;
use crate::tree::Layout;

#[derive(Debug, Clone)]
pub struct LayoutEditor {
    state: Arc<LayoutState>,
    history: LayoutHistory,
    config: LayoutConfig,
    screen: Breakpoint,
}

impl LayoutEditor {
    #[must_use]
    pub fn new(layout: Layout, config: LayoutConfig) -> Self {
        Self {
            state: Arc::new(LayoutState::new(layout)),
            history: LayoutHistory::new(config.history_depth),
            config,
            screen: Breakpoint::PRIMARY,
        }
    }

    // ====================================================================
    // Commands
    // ====================================================================

    /// Apply `command`. Undoable commands record the replaced state; every
    /// applied command clears redo.
    ///
    /// On failure nothing changes.
    pub fn dispatch(&mut self, command: &LayoutCommand) -> Result<(), LayoutCommandError> {
        let kind = command.kind();
        let next = apply_command(&self.state, command, &self.config)?;
        let before = std::mem::replace(&mut self.state, Arc::new(next));
        if kind.is_undoable() {
            self.history.record(kind, before);
        } else {
            self.history.clear_redo();
        }
        Ok(())
    }

    /// Apply `command` without recording an undo step. Redo is cleared.
    ///
    /// Used for sanitization passes that should not appear as user edits.
    pub fn apply_without_history(
        &mut self,
        command: &LayoutCommand,
    ) -> Result<(), LayoutCommandError> {
        let next = apply_command(&self.state, command, &self.config)?;
        self.state = Arc::new(next);
        self.history.clear_redo();
        Ok(())
    }

    /// Revert the most recent undoable command. Returns `false` when there
    /// is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(Arc::clone(&self.state)) {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone command. Returns `false` when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(Arc::clone(&self.state)) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    /// Replace the whole tree. The stash and history start over.
    pub fn set_layout(&mut self, layout: Layout) {
        self.state = Arc::new(LayoutState::new(layout));
        self.history.clear();
        tracing::debug!(
            target: "dashgrid.editor",
            sections = self.state.layout.section_count(),
            "layout replaced"
        );
    }

    /// Rewrite widget identities in place. Not recorded in history.
    pub fn update_identities(&mut self, mapping: &IdentityMapping) {
        if mapping.is_empty() {
            return;
        }
        let layout = self.state.layout.remap_identities(mapping);
        self.state = Arc::new(LayoutState {
            layout,
            stash: self.state.stash.clone(),
        });
        tracing::debug!(
            target: "dashgrid.editor",
            remapped = mapping.len(),
            "identities updated"
        );
    }

    // ====================================================================
    // View state
    // ====================================================================

    /// Switch the breakpoint being edited. Never recorded in history.
    pub fn set_screen(&mut self, screen: Breakpoint) {
        self.screen = screen;
    }

    #[must_use]
    pub fn screen(&self) -> Breakpoint {
        self.screen
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.state.layout
    }

    #[must_use]
    pub fn stash(&self) -> &Stash {
        &self.state.stash
    }

    #[must_use]
    pub fn state(&self) -> &Arc<LayoutState> {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &LayoutHistory {
        &self.history
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentRef, Widget};
    use crate::path::{ItemPath, SectionPath};
    use crate::tree::{Item, Section, SectionHeader};
    use dashgrid_core::ItemSize;

    fn widget(id: &str) -> Item {
        Item::new(ItemSize::with_ratio(4, 50.0), Widget::new(id, "insight"))
    }

    fn editor() -> LayoutEditor {
        LayoutEditor::new(
            Layout::new([Section::new([widget("a"), widget("b")])]),
            LayoutConfig::default(),
        )
    }

    #[test]
    fn dispatch_records_and_undo_restores() {
        let mut ed = editor();
        let before = ed.state().clone();
        ed.dispatch(&LayoutCommand::RemoveSectionItem {
            path: ItemPath::root(0, 0),
            stash: Some("s".into()),
        })
        .expect("remove");
        assert_eq!(ed.layout().item_count(), 1);
        assert!(ed.stash().contains(&"s".into()));

        assert!(ed.undo());
        assert_eq!(**ed.state(), *before);
        assert!(ed.redo());
        assert_eq!(ed.layout().item_count(), 1);
        assert!(!ed.redo());
    }

    #[test]
    fn live_resize_bypasses_history() {
        let mut ed = editor();
        ed.dispatch(&LayoutCommand::ChangeItemWidth {
            path: ItemPath::root(0, 1),
            grid_width: 8,
        })
        .expect("resize");
        ed.dispatch(&LayoutCommand::ChangeItemsHeight {
            section: SectionPath::root(0),
            item_indexes: vec![0, 1],
            grid_height: 12,
        })
        .expect("resize");
        assert!(!ed.history().can_undo());
        assert_eq!(ed.layout().sections[0].items[1].size.xl.grid_width, 8);
        assert!(!ed.undo());
    }

    #[test]
    fn live_resize_after_undo_drops_redo() {
        let mut ed = editor();
        ed.dispatch(&LayoutCommand::ChangeSectionHeader {
            path: SectionPath::root(0),
            header: Some(SectionHeader::titled("Sales")),
        })
        .expect("header");
        assert!(ed.undo());
        assert!(ed.history().can_redo());

        ed.dispatch(&LayoutCommand::ChangeItemWidth {
            path: ItemPath::root(0, 0),
            grid_width: 3,
        })
        .expect("resize");
        assert!(!ed.history().can_redo());
        assert!(!ed.redo());
        assert_eq!(ed.layout().sections[0].items[0].size.xl.grid_width, 3);
        assert!(ed.history().can_undo());
    }

    #[test]
    fn failed_dispatch_changes_nothing() {
        let mut ed = editor();
        let before = ed.state().clone();
        let err = ed
            .dispatch(&LayoutCommand::MoveSection {
                from: SectionPath::root(4),
                to: SectionPath::root(0),
            })
            .expect_err("out of range");
        assert_eq!(err.before_hash, before.state_hash());
        assert!(Arc::ptr_eq(ed.state(), &before));
        assert!(!ed.history().can_undo());
    }

    #[test]
    fn set_layout_resets_history() {
        let mut ed = editor();
        ed.dispatch(&LayoutCommand::AddSection {
            path: SectionPath::root(1),
            section: Section::default(),
            used_stashes: vec![],
        })
        .expect("add");
        ed.set_layout(Layout::default());
        assert!(!ed.history().can_undo());
        assert_eq!(ed.layout().section_count(), 0);
    }

    #[test]
    fn apply_without_history_keeps_undo_and_drops_redo() {
        let mut ed = editor();
        for n in 1..3 {
            ed.dispatch(&LayoutCommand::AddSection {
                path: SectionPath::root(n),
                section: Section::default(),
                used_stashes: vec![],
            })
            .expect("add");
        }
        assert!(ed.undo());
        ed.apply_without_history(&LayoutCommand::RemoveIgnoredFilters {
            display_forms: vec!["x".into()],
        })
        .expect("sanitize");
        assert_eq!(ed.history().undo_depth(), 1);
        assert!(!ed.history().can_redo());
    }

    #[test]
    fn screen_and_identity_changes_are_not_recorded() {
        let mut ed = editor();
        ed.set_screen(Breakpoint::Md);
        assert_eq!(ed.screen(), Breakpoint::Md);
        let mapping: IdentityMapping =
            [(ContentRef::from("a"), ContentRef::from("a-saved"))].into_iter().collect();
        ed.update_identities(&mapping);
        assert!(ed.layout().find_content(&"a-saved".into()).is_some());
        assert!(!ed.history().can_undo());
    }

    #[test]
    fn history_depth_follows_config() {
        let config = LayoutConfig {
            history_depth: 2,
            ..LayoutConfig::default()
        };
        let mut ed = LayoutEditor::new(Layout::default(), config);
        for n in 0..5 {
            ed.dispatch(&LayoutCommand::AddSection {
                path: SectionPath::root(n),
                section: Section::default(),
                used_stashes: vec![],
            })
            .expect("add");
        }
        assert_eq!(ed.history().undo_depth(), 2);
        assert!(ed.undo());
        assert!(ed.undo());
        assert!(!ed.undo());
        assert_eq!(ed.layout().section_count(), 3);
    }
}
