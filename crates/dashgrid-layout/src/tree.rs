#![forbid(unsafe_code)]

//! The layout tree.
//!
//! A [`Layout`] is an ordered list of [`Section`]s; a section is an ordered
//! list of [`Item`]s; an item's [`Content`] is either an opaque widget or a
//! nested layout. Collections are `im::Vector`s, so cloning a layout is O(1)
//! and editing through `get_mut` copies only the chunks on the path to the
//! edited node. Every edit therefore yields a new value while older values
//! (held by undo history or by readers) stay intact and share the untouched
//! subtrees.
//!
//! # Invariants
//!
//! 1. Section and item arrays are contiguous, 0-indexed, and ordered.
//! 2. A layout never contains itself: content is owned, so cycles cannot be
//!    expressed.
//! 3. Nesting depth (a top-level layout has depth 1) stays within
//!    [`LayoutConfig::max_nesting_depth`](crate::LayoutConfig).
//! 4. Every stored size passes [`ItemSize::validate`](dashgrid_core::ItemSize::validate).

use std::fmt;

use dashgrid_core::{Breakpoint, SizeByBreakpoint, SizeError};
use im::Vector;
use serde::{Deserialize, Serialize};

use crate::content::{Content, Widget};
use crate::path::{ItemPath, LayoutCoordinate};

/// Optional section metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SectionHeader {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }
}

/// One cell of the grid: a size set plus content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub size: SizeByBreakpoint,
    pub content: Content,
}

impl Item {
    #[must_use]
    pub fn new(size: impl Into<SizeByBreakpoint>, content: impl Into<Content>) -> Self {
        Self {
            size: size.into(),
            content: content.into(),
        }
    }

    /// Nesting depth contributed by this item's content (0 for widgets).
    #[must_use]
    pub fn content_depth(&self) -> usize {
        self.content.as_layout().map_or(0, Layout::depth)
    }
}

/// Ordered run of items with an optional header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SectionHeader>,
    #[serde(default)]
    pub items: Vector<Item>,
}

impl Section {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            header: None,
            items: items.into_iter().collect(),
        }
    }

    /// Set the header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, header: SectionHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// Deepest nested layout among this section's items (0 when flat).
    #[must_use]
    pub fn content_depth(&self) -> usize {
        self.items.iter().map(Item::content_depth).max().unwrap_or(0)
    }
}

/// Root or nested layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub sections: Vector<Section>,
}

impl Layout {
    #[must_use]
    pub fn new(sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            sections: sections.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of items at every depth, nested layout items included.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter())
            .map(|item| 1 + item.content.as_layout().map_or(0, Layout::item_count))
            .sum()
    }

    /// Nesting depth. A layout without nested layouts has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .sections
            .iter()
            .map(Section::content_depth)
            .max()
            .unwrap_or(0)
    }

    /// Every item with its path, depth-first in document order.
    ///
    /// A nested layout's items follow the item that owns it.
    #[must_use]
    pub fn iter_items(&self) -> std::vec::IntoIter<(ItemPath, &Item)> {
        let mut out = Vec::new();
        self.collect_items(&mut Vec::new(), &mut out);
        out.into_iter()
    }

    fn collect_items<'a>(
        &'a self,
        prefix: &mut Vec<LayoutCoordinate>,
        out: &mut Vec<(ItemPath, &'a Item)>,
    ) {
        for (section_index, section) in self.sections.iter().enumerate() {
            for (item_index, item) in section.items.iter().enumerate() {
                prefix.push(LayoutCoordinate::new(section_index, item_index));
                out.push((ItemPath::from_coordinates_unchecked(prefix.clone()), item));
                if let Some(nested) = item.content.as_layout() {
                    nested.collect_items(prefix, out);
                }
                prefix.pop();
            }
        }
    }

    /// Every widget at every depth, widget children included.
    #[must_use]
    pub fn widgets(&self) -> std::vec::IntoIter<&Widget> {
        let mut out = Vec::new();
        for (_, item) in self.iter_items() {
            if let Some(widget) = item.content.as_widget() {
                widget.walk(&mut |w| out.push(w));
            }
        }
        out.into_iter()
    }

    /// Check sizes and nesting depth.
    pub fn validate(&self, max_nesting_depth: usize) -> Result<(), LayoutModelError> {
        let depth = self.depth();
        if depth > max_nesting_depth {
            return Err(LayoutModelError::NestingTooDeep {
                depth,
                max: max_nesting_depth,
            });
        }
        for (path, item) in self.iter_items() {
            item.size
                .validate()
                .map_err(|(breakpoint, error)| LayoutModelError::InvalidSize {
                    path,
                    breakpoint,
                    error,
                })?;
        }
        Ok(())
    }
}

/// Structural validation failures for whole layouts and documents.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutModelError {
    InvalidSize {
        path: ItemPath,
        breakpoint: Breakpoint,
        error: SizeError,
    },
    NestingTooDeep {
        depth: usize,
        max: usize,
    },
    UnsupportedSchemaVersion {
        found: u16,
        expected: u16,
    },
}

impl fmt::Display for LayoutModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize {
                path,
                breakpoint,
                error,
            } => write!(f, "item {path} has invalid {breakpoint} size: {error}"),
            Self::NestingTooDeep { depth, max } => {
                write!(f, "layout nesting depth {depth} exceeds limit {max}")
            }
            Self::UnsupportedSchemaVersion { found, expected } => write!(
                f,
                "unsupported layout schema version {found} (expected {expected})"
            ),
        }
    }
}

impl std::error::Error for LayoutModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::InvalidSize { error, .. } = self {
            return Some(error);
        }
        None
    }
}
