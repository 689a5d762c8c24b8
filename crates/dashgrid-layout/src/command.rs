#![forbid(unsafe_code)]

//! Structural edit commands and the pure engine that applies them.
//!
//! [`apply_command`] takes the current [`LayoutState`] (layout plus stash)
//! and returns a new one. The input is never modified: the command runs on
//! a clone whose `im` collections share every untouched subtree with the
//! input, and a failure simply drops that working copy. Callers therefore
//! never observe a half-applied command.
//!
//! # Invariants preserved by every command
//!
//! 1. Section and item arrays stay contiguous, 0-indexed, and ordered at
//!    every depth.
//! 2. Every stash id named as used exists when the command starts and is
//!    gone when it ends (except the replace-with-self-stash case, where the
//!    id is rewritten instead).
//! 3. Nesting depth stays within [`LayoutConfig::max_nesting_depth`].
//! 4. Inserted and resized sizes pass validation.
//!
//! # Failure Modes
//!
//! | Condition | Failure |
//! |---|---|
//! | Hop out of range or through widget content | [`LayoutCommandFailure::Path`] |
//! | Used stash id absent | [`LayoutCommandFailure::StashNotFound`] |
//! | No widget with the identity | [`LayoutCommandFailure::ContentNotFound`] |
//! | Size outside the grid | [`LayoutCommandFailure::InvalidSize`] |
//! | Inserted layout too deep | [`LayoutCommandFailure::NestingTooDeep`] |
//! | Item moved into its own nested layout | [`LayoutCommandFailure::MoveIntoOwnSubtree`] |
//! | Section moved into a layout it contains | [`LayoutCommandFailure::MoveSectionIntoOwnSubtree`] |

use std::fmt;

use dashgrid_core::{Breakpoint, GRID_COLUMNS, ItemSize, SizeError};
use im::Vector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::LayoutConfig;
use crate::content::{Content, ContentField, ContentRef, Widget};
use crate::path::{
    ItemPath, LayoutCoordinate, PathError, SectionPath, resolve_item_mut, resolve_layout_mut,
    resolve_section_mut,
};
use crate::stash::{Stash, StashId};
use crate::tree::{Item, Layout, LayoutModelError, Section, SectionHeader};

/// Composite value produced by every command: the tree and its stash.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutState {
    pub layout: Layout,
    pub stash: Stash,
}

impl LayoutState {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            stash: Stash::default(),
        }
    }

    /// Deterministic structural hash of layout and stash.
    ///
    /// Intended for operation logs and error reports.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                mix(hash, *byte);
            }
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_str(hash: &mut u64, value: &str) {
            mix_u64(hash, value.len() as u64);
            mix_bytes(hash, value.as_bytes());
        }

        fn mix_opt_str(hash: &mut u64, value: Option<&str>) {
            match value {
                Some(value) => {
                    mix(hash, 1);
                    mix_str(hash, value);
                }
                None => mix(hash, 0),
            }
        }

        fn mix_size(hash: &mut u64, size: Option<&ItemSize>) {
            let Some(size) = size else {
                mix(hash, 0);
                return;
            };
            mix(hash, 1);
            mix(hash, size.grid_width);
            match size.grid_height {
                Some(rows) => {
                    mix(hash, 1);
                    mix_u64(hash, u64::from(rows));
                }
                None => mix(hash, 0),
            }
            match size.height_as_ratio {
                Some(ratio) => {
                    mix(hash, 1);
                    mix_u64(hash, ratio.to_bits());
                }
                None => mix(hash, 0),
            }
        }

        fn mix_widget(hash: &mut u64, widget: &Widget) {
            mix_str(hash, widget.identity.as_str());
            mix_str(hash, &widget.kind);
            mix_u64(hash, widget.fields.len() as u64);
            for (key, value) in &widget.fields {
                mix_str(hash, key);
                mix_str(hash, &value.to_string());
            }
            mix_u64(hash, widget.children.len() as u64);
            for child in &widget.children {
                mix_widget(hash, child);
            }
        }

        fn mix_items(hash: &mut u64, items: &Vector<Item>) {
            mix_u64(hash, items.len() as u64);
            for item in items {
                for bp in Breakpoint::ALL {
                    mix_size(hash, item.size.get(bp));
                }
                match &item.content {
                    Content::Widget(widget) => {
                        mix(hash, 1);
                        mix_widget(hash, widget);
                    }
                    Content::Layout(layout) => {
                        mix(hash, 2);
                        mix_layout(hash, layout);
                    }
                }
            }
        }

        fn mix_layout(hash: &mut u64, layout: &Layout) {
            mix_u64(hash, layout.sections.len() as u64);
            for section in &layout.sections {
                match &section.header {
                    Some(header) => {
                        mix(hash, 1);
                        mix_opt_str(hash, header.title.as_deref());
                        mix_opt_str(hash, header.description.as_deref());
                    }
                    None => mix(hash, 0),
                }
                mix_items(hash, &section.items);
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_layout(&mut hash, &self.layout);
        mix_u64(&mut hash, self.stash.len() as u64);
        for (id, items) in self.stash.iter() {
            mix_str(&mut hash, id.as_str());
            mix_items(&mut hash, items);
        }
        hash
    }
}

/// Supported structural layout commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayoutCommand {
    /// Insert a section; `path.section_index == len` appends.
    AddSection {
        path: SectionPath,
        section: Section,
        #[serde(default)]
        used_stashes: Vec<StashId>,
    },
    /// Remove a section, optionally moving its items into the stash.
    RemoveSection {
        path: SectionPath,
        #[serde(default)]
        stash: Option<StashId>,
    },
    /// Remove then insert. Ancestor hops of `to` address the tree before
    /// removal; its section index applies after removal.
    MoveSection { from: SectionPath, to: SectionPath },
    ChangeSectionHeader {
        path: SectionPath,
        header: Option<SectionHeader>,
    },
    /// Insert items at `path.item_index`.
    AddSectionItems {
        path: ItemPath,
        items: Vec<Item>,
        #[serde(default)]
        used_stashes: Vec<StashId>,
    },
    /// Remove then insert. Ancestor hops of `to` address the tree before
    /// removal; its final item index applies after removal.
    MoveSectionItem { from: ItemPath, to: ItemPath },
    /// Remove an item, optionally stashing it as a one-item list.
    RemoveSectionItem {
        path: ItemPath,
        #[serde(default)]
        stash: Option<StashId>,
    },
    /// Remove an item and insert `items` in its place.
    ReplaceSectionItem {
        path: ItemPath,
        items: Vec<Item>,
        #[serde(default)]
        stash: Option<StashId>,
        #[serde(default)]
        used_stashes: Vec<StashId>,
    },
    /// Replace the size of one breakpoint.
    ResizeItem {
        path: ItemPath,
        breakpoint: Breakpoint,
        size: ItemSize,
    },
    /// Live resize: set `xl.grid_height` on several items of one section.
    /// Items holding nested layouts are skipped.
    ChangeItemsHeight {
        section: SectionPath,
        item_indexes: Vec<usize>,
        grid_height: u32,
    },
    /// Live resize: set `xl.grid_width`.
    ChangeItemWidth { path: ItemPath, grid_width: u8 },
    /// Set (`Some`) or delete (`None`) a field on the widget with `identity`.
    ReplaceContentField {
        identity: ContentRef,
        field: ContentField,
        #[serde(default)]
        value: Option<Value>,
    },
    /// Drop ignored-filter entries naming any of `display_forms` from every
    /// widget in the tree.
    RemoveIgnoredFilters { display_forms: Vec<String> },
}

impl LayoutCommand {
    /// Command family.
    #[must_use]
    pub const fn kind(&self) -> LayoutCommandKind {
        match self {
            Self::AddSection { .. } => LayoutCommandKind::AddSection,
            Self::RemoveSection { .. } => LayoutCommandKind::RemoveSection,
            Self::MoveSection { .. } => LayoutCommandKind::MoveSection,
            Self::ChangeSectionHeader { .. } => LayoutCommandKind::ChangeSectionHeader,
            Self::AddSectionItems { .. } => LayoutCommandKind::AddSectionItems,
            Self::MoveSectionItem { .. } => LayoutCommandKind::MoveSectionItem,
            Self::RemoveSectionItem { .. } => LayoutCommandKind::RemoveSectionItem,
            Self::ReplaceSectionItem { .. } => LayoutCommandKind::ReplaceSectionItem,
            Self::ResizeItem { .. } => LayoutCommandKind::ResizeItem,
            Self::ChangeItemsHeight { .. } => LayoutCommandKind::ChangeItemsHeight,
            Self::ChangeItemWidth { .. } => LayoutCommandKind::ChangeItemWidth,
            Self::ReplaceContentField { .. } => LayoutCommandKind::ReplaceContentField,
            Self::RemoveIgnoredFilters { .. } => LayoutCommandKind::RemoveIgnoredFilters,
        }
    }
}

/// Stable command discriminator used in logs and undo entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommandKind {
    AddSection,
    RemoveSection,
    MoveSection,
    ChangeSectionHeader,
    AddSectionItems,
    MoveSectionItem,
    RemoveSectionItem,
    ReplaceSectionItem,
    ResizeItem,
    ChangeItemsHeight,
    ChangeItemWidth,
    ReplaceContentField,
    RemoveIgnoredFilters,
}

impl LayoutCommandKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddSection => "add_section",
            Self::RemoveSection => "remove_section",
            Self::MoveSection => "move_section",
            Self::ChangeSectionHeader => "change_section_header",
            Self::AddSectionItems => "add_section_items",
            Self::MoveSectionItem => "move_section_item",
            Self::RemoveSectionItem => "remove_section_item",
            Self::ReplaceSectionItem => "replace_section_item",
            Self::ResizeItem => "resize_item",
            Self::ChangeItemsHeight => "change_items_height",
            Self::ChangeItemWidth => "change_item_width",
            Self::ReplaceContentField => "replace_content_field",
            Self::RemoveIgnoredFilters => "remove_ignored_filters",
        }
    }

    /// Whether an editor records this command in its undo history.
    ///
    /// Live-resize commands fire continuously while dragging and bypass it.
    #[must_use]
    pub const fn is_undoable(self) -> bool {
        !matches!(self, Self::ChangeItemsHeight | Self::ChangeItemWidth)
    }
}

impl fmt::Display for LayoutCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured reasons for command failure.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutCommandFailure {
    Path(PathError),
    StashNotFound {
        id: StashId,
    },
    ContentNotFound {
        identity: ContentRef,
    },
    InvalidSize {
        breakpoint: Breakpoint,
        error: SizeError,
    },
    NestingTooDeep {
        depth: usize,
        max: usize,
    },
    MoveIntoOwnSubtree {
        from: ItemPath,
        to: ItemPath,
    },
    MoveSectionIntoOwnSubtree {
        from: SectionPath,
        to: SectionPath,
    },
    Validation(LayoutModelError),
}

impl fmt::Display for LayoutCommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(err) => write!(f, "invalid path: {err}"),
            Self::StashNotFound { id } => write!(f, "stash {id:?} not found"),
            Self::ContentNotFound { identity } => {
                write!(f, "no content with identity {identity:?}")
            }
            Self::InvalidSize { breakpoint, error } => {
                write!(f, "invalid {breakpoint} size: {error}")
            }
            Self::NestingTooDeep { depth, max } => {
                write!(f, "nesting depth {depth} would exceed limit {max}")
            }
            Self::MoveIntoOwnSubtree { from, to } => {
                write!(f, "cannot move item {from} into its own nested layout at {to}")
            }
            Self::MoveSectionIntoOwnSubtree { from, to } => {
                write!(f, "cannot move section {from} into a layout it contains at {to}")
            }
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LayoutCommandFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Path(err) => Some(err),
            Self::InvalidSize { error, .. } => Some(error),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PathError> for LayoutCommandFailure {
    fn from(err: PathError) -> Self {
        Self::Path(err)
    }
}

/// Failure payload for [`apply_command`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCommandError {
    pub kind: LayoutCommandKind,
    /// Hash of the untouched input state.
    pub before_hash: u64,
    pub reason: LayoutCommandFailure,
}

impl fmt::Display for LayoutCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "layout command {} failed: {} [before_hash={:#x}]",
            self.kind, self.reason, self.before_hash
        )
    }
}

impl std::error::Error for LayoutCommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

/// Apply one command to `state`, returning the new state.
///
/// `state` is never modified. On failure the returned error carries the
/// input's hash and the reason.
pub fn apply_command(
    state: &LayoutState,
    command: &LayoutCommand,
    config: &LayoutConfig,
) -> Result<LayoutState, LayoutCommandError> {
    let kind = command.kind();
    let _span = tracing::debug_span!("layout.command", kind = %kind).entered();

    let mut working = state.clone();
    if let Err(reason) = apply_inner(&mut working, command, config) {
        let before_hash = state.state_hash();
        tracing::warn!(
            target: "dashgrid.command",
            kind = %kind,
            before_hash = before_hash,
            reason = %reason,
            "layout command rejected"
        );
        return Err(LayoutCommandError {
            kind,
            before_hash,
            reason,
        });
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!(
            target: "dashgrid.command",
            kind = %kind,
            before_hash = state.state_hash(),
            after_hash = working.state_hash(),
            sections = working.layout.section_count(),
            stashes = working.stash.len(),
            "layout command applied"
        );
    }
    Ok(working)
}

fn apply_inner(
    state: &mut LayoutState,
    command: &LayoutCommand,
    config: &LayoutConfig,
) -> Result<(), LayoutCommandFailure> {
    match command {
        LayoutCommand::AddSection {
            path,
            section,
            used_stashes,
        } => add_section(state, path, section, used_stashes, config),
        LayoutCommand::RemoveSection { path, stash } => remove_section(state, path, stash.as_ref()),
        LayoutCommand::MoveSection { from, to } => move_section(state, from, to, config),
        LayoutCommand::ChangeSectionHeader { path, header } => {
            resolve_section_mut(&mut state.layout, path)?.header = header.clone();
            Ok(())
        }
        LayoutCommand::AddSectionItems {
            path,
            items,
            used_stashes,
        } => add_section_items(state, path, items, used_stashes, config),
        LayoutCommand::MoveSectionItem { from, to } => move_section_item(state, from, to, config),
        LayoutCommand::RemoveSectionItem { path, stash } => {
            remove_section_item(state, path, stash.as_ref())
        }
        LayoutCommand::ReplaceSectionItem {
            path,
            items,
            stash,
            used_stashes,
        } => replace_section_item(state, path, items, stash.as_ref(), used_stashes, config),
        LayoutCommand::ResizeItem {
            path,
            breakpoint,
            size,
        } => {
            size.validate()
                .map_err(|error| LayoutCommandFailure::InvalidSize {
                    breakpoint: *breakpoint,
                    error,
                })?;
            resolve_item_mut(&mut state.layout, path)?
                .size
                .set(*breakpoint, *size);
            Ok(())
        }
        LayoutCommand::ChangeItemsHeight {
            section,
            item_indexes,
            grid_height,
        } => change_items_height(state, section, item_indexes, *grid_height),
        LayoutCommand::ChangeItemWidth { path, grid_width } => {
            if *grid_width > GRID_COLUMNS {
                return Err(LayoutCommandFailure::InvalidSize {
                    breakpoint: Breakpoint::PRIMARY,
                    error: SizeError::WidthOutOfRange {
                        grid_width: *grid_width,
                    },
                });
            }
            resolve_item_mut(&mut state.layout, path)?
                .size
                .primary_mut()
                .grid_width = *grid_width;
            Ok(())
        }
        LayoutCommand::ReplaceContentField {
            identity,
            field,
            value,
        } => replace_content_field(state, identity, field, value.clone()),
        LayoutCommand::RemoveIgnoredFilters { display_forms } => {
            remove_ignored_filters(state, display_forms)
        }
    }
}

fn require_stashes(stash: &Stash, ids: &[StashId]) -> Result<(), LayoutCommandFailure> {
    match ids.iter().find(|id| !stash.contains(id)) {
        Some(id) => Err(LayoutCommandFailure::StashNotFound { id: id.clone() }),
        None => Ok(()),
    }
}

/// Validate items about to live in a layout at nesting `level`
/// (1 = top-level layout).
fn check_items<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    level: usize,
    config: &LayoutConfig,
) -> Result<(), LayoutCommandFailure> {
    let max = config.max_nesting_depth;
    for item in items {
        item.size
            .validate()
            .map_err(|(breakpoint, error)| LayoutCommandFailure::InvalidSize { breakpoint, error })?;
        if let Some(nested) = item.content.as_layout() {
            let depth = level + nested.depth();
            if depth > max {
                return Err(LayoutCommandFailure::NestingTooDeep { depth, max });
            }
            nested
                .validate(max)
                .map_err(LayoutCommandFailure::Validation)?;
        }
    }
    Ok(())
}

fn insertion_point(path: &ItemPath, len: usize) -> Result<usize, LayoutCommandFailure> {
    let index = path.item_index();
    if index > len {
        return Err(PathError::ItemOutOfRange {
            hop: path.depth() - 1,
            section_index: path.section_index(),
            index,
            len,
        }
        .into());
    }
    Ok(index)
}

fn existing_index(path: &ItemPath, len: usize) -> Result<usize, LayoutCommandFailure> {
    let index = path.item_index();
    if index >= len {
        return Err(PathError::ItemOutOfRange {
            hop: path.depth() - 1,
            section_index: path.section_index(),
            index,
            len,
        }
        .into());
    }
    Ok(index)
}

fn section_out_of_range(path: &SectionPath, len: usize) -> LayoutCommandFailure {
    PathError::SectionOutOfRange {
        hop: path.parent.len(),
        index: path.section_index,
        len,
    }
    .into()
}

fn add_section(
    state: &mut LayoutState,
    path: &SectionPath,
    section: &Section,
    used_stashes: &[StashId],
    config: &LayoutConfig,
) -> Result<(), LayoutCommandFailure> {
    require_stashes(&state.stash, used_stashes)?;
    check_items(section.items.iter(), path.parent.len() + 1, config)?;
    let layout = resolve_layout_mut(&mut state.layout, &path.parent)?;
    if path.section_index > layout.sections.len() {
        return Err(section_out_of_range(path, layout.sections.len()));
    }
    layout.sections.insert(path.section_index, section.clone());
    for id in used_stashes {
        state.stash.discard(id);
    }
    Ok(())
}

fn remove_section(
    state: &mut LayoutState,
    path: &SectionPath,
    stash: Option<&StashId>,
) -> Result<(), LayoutCommandFailure> {
    let layout = resolve_layout_mut(&mut state.layout, &path.parent)?;
    if path.section_index >= layout.sections.len() {
        return Err(section_out_of_range(path, layout.sections.len()));
    }
    let removed = layout.sections.remove(path.section_index);
    if let Some(id) = stash {
        state.stash.store(id.clone(), removed.items);
    }
    Ok(())
}

fn move_section(
    state: &mut LayoutState,
    from: &SectionPath,
    to: &SectionPath,
    config: &LayoutConfig,
) -> Result<(), LayoutCommandFailure> {
    let target_parent = section_parent_after_removal(from, to)?;
    let source = resolve_layout_mut(&mut state.layout, &from.parent)?;
    if from.section_index >= source.sections.len() {
        return Err(section_out_of_range(from, source.sections.len()));
    }
    let section = source.sections.remove(from.section_index);
    check_items(section.items.iter(), target_parent.len() + 1, config)?;
    let target = resolve_layout_mut(&mut state.layout, &target_parent)?;
    if to.section_index > target.sections.len() {
        return Err(section_out_of_range(to, target.sections.len()));
    }
    target.sections.insert(to.section_index, section);
    Ok(())
}

/// Parent hops of `to` expressed on the tree after `from` is removed.
///
/// The hop that enters `from`'s layout shifts down when it points past the
/// removed section, and is rejected when it points at the section itself.
fn section_parent_after_removal(
    from: &SectionPath,
    to: &SectionPath,
) -> Result<Vec<LayoutCoordinate>, LayoutCommandFailure> {
    let depth = from.parent.len();
    let mut hops = to.parent.clone();
    if hops.len() > depth && hops[..depth] == from.parent[..] {
        let hop = &mut hops[depth];
        if hop.section_index == from.section_index {
            return Err(LayoutCommandFailure::MoveSectionIntoOwnSubtree {
                from: from.clone(),
                to: to.clone(),
            });
        }
        if hop.section_index > from.section_index {
            hop.section_index -= 1;
        }
    }
    Ok(hops)
}

fn add_section_items(
    state: &mut LayoutState,
    path: &ItemPath,
    items: &[Item],
    used_stashes: &[StashId],
    config: &LayoutConfig,
) -> Result<(), LayoutCommandFailure> {
    require_stashes(&state.stash, used_stashes)?;
    check_items(items, path.depth(), config)?;
    let section = resolve_section_mut(&mut state.layout, &path.section_path())?;
    let at = insertion_point(path, section.items.len())?;
    for (offset, item) in items.iter().enumerate() {
        section.items.insert(at + offset, item.clone());
    }
    for id in used_stashes {
        state.stash.discard(id);
    }
    Ok(())
}

/// Destination path expressed on the tree after `from` is removed.
///
/// Only a hop that passes through `from`'s section past the removed index
/// shifts; the final hop is already post-removal.
fn destination_after_removal(
    from: &ItemPath,
    to: &ItemPath,
) -> Result<ItemPath, LayoutCommandFailure> {
    let depth = from.depth();
    let mut hops = to.coordinates().to_vec();
    if hops.len() > depth && hops[..depth - 1] == *from.parent_hops() {
        let leaf = from.leaf();
        let hop = &mut hops[depth - 1];
        if hop.section_index == leaf.section_index {
            if hop.item_index == leaf.item_index {
                return Err(LayoutCommandFailure::MoveIntoOwnSubtree {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            if hop.item_index > leaf.item_index {
                hop.item_index -= 1;
            }
        }
    }
    Ok(ItemPath::from_coordinates_unchecked(hops))
}

fn move_section_item(
    state: &mut LayoutState,
    from: &ItemPath,
    to: &ItemPath,
    config: &LayoutConfig,
) -> Result<(), LayoutCommandFailure> {
    let destination = destination_after_removal(from, to)?;
    let source = resolve_section_mut(&mut state.layout, &from.section_path())?;
    let index = existing_index(from, source.items.len())?;
    let item = source.items.remove(index);
    check_items(std::iter::once(&item), destination.depth(), config)?;
    let target = resolve_section_mut(&mut state.layout, &destination.section_path())?;
    let at = insertion_point(&destination, target.items.len())?;
    target.items.insert(at, item);
    Ok(())
}

fn remove_section_item(
    state: &mut LayoutState,
    path: &ItemPath,
    stash: Option<&StashId>,
) -> Result<(), LayoutCommandFailure> {
    let section = resolve_section_mut(&mut state.layout, &path.section_path())?;
    let index = existing_index(path, section.items.len())?;
    let removed = section.items.remove(index);
    if let Some(id) = stash {
        state.stash.store(id.clone(), Vector::unit(removed));
    }
    Ok(())
}

fn replace_section_item(
    state: &mut LayoutState,
    path: &ItemPath,
    items: &[Item],
    stash: Option<&StashId>,
    used_stashes: &[StashId],
    config: &LayoutConfig,
) -> Result<(), LayoutCommandFailure> {
    require_stashes(&state.stash, used_stashes)?;
    check_items(items, path.depth(), config)?;
    let section = resolve_section_mut(&mut state.layout, &path.section_path())?;
    let index = existing_index(path, section.items.len())?;
    let removed = section.items.remove(index);
    for (offset, item) in items.iter().enumerate() {
        section.items.insert(index + offset, item.clone());
    }
    // A used stash that is also the destination is overwritten below.
    for id in used_stashes.iter().filter(|id| Some(*id) != stash) {
        state.stash.discard(id);
    }
    if let Some(id) = stash {
        state.stash.store(id.clone(), Vector::unit(removed));
    }
    Ok(())
}

fn change_items_height(
    state: &mut LayoutState,
    path: &SectionPath,
    item_indexes: &[usize],
    grid_height: u32,
) -> Result<(), LayoutCommandFailure> {
    if grid_height == 0 {
        return Err(LayoutCommandFailure::InvalidSize {
            breakpoint: Breakpoint::PRIMARY,
            error: SizeError::ZeroGridHeight,
        });
    }
    let section = resolve_section_mut(&mut state.layout, path)?;
    let len = section.items.len();
    for &index in item_indexes {
        let item = section
            .items
            .get_mut(index)
            .ok_or(PathError::ItemOutOfRange {
                hop: path.parent.len(),
                section_index: path.section_index,
                index,
                len,
            })?;
        if item.content.is_layout() {
            continue;
        }
        item.size.primary_mut().grid_height = Some(grid_height);
    }
    Ok(())
}

fn replace_content_field(
    state: &mut LayoutState,
    identity: &ContentRef,
    field: &ContentField,
    value: Option<Value>,
) -> Result<(), LayoutCommandFailure> {
    let not_found = || LayoutCommandFailure::ContentNotFound {
        identity: identity.clone(),
    };
    let path = state.layout.find_content(identity).ok_or_else(not_found)?;
    let widget = resolve_item_mut(&mut state.layout, &path)?
        .content
        .as_widget_mut()
        .and_then(|widget| widget.find_mut(identity))
        .ok_or_else(not_found)?;
    widget.replace_field(field, value);
    Ok(())
}

fn remove_ignored_filters(
    state: &mut LayoutState,
    display_forms: &[String],
) -> Result<(), LayoutCommandFailure> {
    let targets: Vec<ItemPath> = state
        .layout
        .iter_items()
        .filter(|(_, item)| {
            item.content
                .as_widget()
                .is_some_and(|widget| widget.ignores_any(display_forms))
        })
        .map(|(path, _)| path)
        .collect();
    let mut removed = 0;
    for path in &targets {
        if let Some(widget) = resolve_item_mut(&mut state.layout, path)?
            .content
            .as_widget_mut()
        {
            removed += widget.drop_ignored_filters(display_forms);
        }
    }
    tracing::trace!(
        target: "dashgrid.command",
        widgets = targets.len(),
        removed = removed,
        "ignored filters dropped"
    );
    Ok(())
}
