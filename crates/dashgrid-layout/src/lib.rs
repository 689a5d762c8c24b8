#![forbid(unsafe_code)]

//! Layout: the nested dashboard tree, its edit commands, and responsive sizing.
//!
//! # Role in dashgrid
//! `dashgrid-layout` holds everything that reasons about where widgets sit.
//! Geometry primitives come from `dashgrid-core`; rendering and widget
//! semantics belong to the host.
//!
//! # Primary responsibilities
//! - **Tree**: [`Layout`] / [`Section`] / [`Item`] backed by `im`
//!   collections, so every edit yields a new value sharing untouched
//!   subtrees.
//! - **Paths**: [`ItemPath`] and [`SectionPath`] address any node at any
//!   depth.
//! - **Commands**: [`apply_command`] is a pure function from one
//!   [`LayoutState`] to the next; [`LayoutEditor`] adds undo/redo.
//! - **Sizing**: breakpoint derivation, virtual rows, and row height
//!   unification in [`sizing`].
//!
//! # How it fits in the system
//! A host loads a [`LayoutDocument`], opens a [`LayoutEditor`] on the
//! resulting layout, and dispatches [`LayoutCommand`]s in response to
//! drag-and-drop and property edits. Before rendering it asks [`sizing`]
//! for the heights of the breakpoint on screen.

pub mod command;
pub mod config;
pub mod content;
pub mod document;
pub mod editor;
pub mod history;
pub mod identity;
pub mod path;
pub mod sizing;
pub mod stash;
pub mod tree;

pub use command::{
    LayoutCommand, LayoutCommandError, LayoutCommandFailure, LayoutCommandKind, LayoutState,
    apply_command,
};
pub use config::{ConfigError, ContainerWidths, LayoutConfig, SizingConfig};
pub use content::{Content, ContentField, ContentRef, Widget};
pub use document::{DocumentError, LAYOUT_DOCUMENT_SCHEMA_VERSION, LayoutDocument};
pub use editor::LayoutEditor;
pub use history::{LayoutHistory, UndoEntry};
pub use identity::IdentityMapping;
pub use path::{ItemPath, LayoutCoordinate, PathError, SectionPath};
pub use sizing::{DerivedWidths, SizingError, WidthBucketTable};
pub use stash::{Stash, StashId};
pub use tree::{Item, Layout, LayoutModelError, Section, SectionHeader};

pub use dashgrid_core::{Breakpoint, ItemSize, SizeByBreakpoint};
