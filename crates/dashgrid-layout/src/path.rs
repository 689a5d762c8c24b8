#![forbid(unsafe_code)]

//! Coordinate addressing for sections and items at any nesting depth.
//!
//! A path is a sequence of `(section_index, item_index)` hops. Every hop
//! except the last enters a section, picks an item, and descends into that
//! item's nested layout. The final hop names the target.
//!
//! - [`ItemPath`]: non-empty hop list; the last hop names the item.
//! - [`SectionPath`]: the hops of the owning item (empty at top level)
//!   plus the section index.
//!
//! Resolution never clamps: an out-of-range index or a hop through widget
//! content is a [`PathError`].
//!
//! # Text form
//!
//! Item paths render as `section_item` hops joined by `-`, e.g.
//! `"3_2-1_6-4_0"`. Section paths render their parent hops followed by the
//! bare section index, e.g. `"1"` or `"3_2-4"`.

use std::fmt;
use std::str::FromStr;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::tree::{Item, Layout, Section};

/// One hop of a path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCoordinate {
    pub section_index: usize,
    pub item_index: usize,
}

impl LayoutCoordinate {
    #[must_use]
    pub const fn new(section_index: usize, item_index: usize) -> Self {
        Self {
            section_index,
            item_index,
        }
    }
}

impl fmt::Display for LayoutCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.section_index, self.item_index)
    }
}

impl FromStr for LayoutCoordinate {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || PathError::Parse {
            input: s.to_owned(),
        };
        let (section, item) = s.split_once('_').ok_or_else(parse_error)?;
        Ok(Self::new(
            section.parse().map_err(|_| parse_error())?,
            item.parse().map_err(|_| parse_error())?,
        ))
    }
}

/// Address of an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<LayoutCoordinate>", into = "Vec<LayoutCoordinate>")]
pub struct ItemPath(Vec<LayoutCoordinate>);

impl ItemPath {
    pub fn new(coordinates: Vec<LayoutCoordinate>) -> Result<Self, PathError> {
        if coordinates.is_empty() {
            return Err(PathError::EmptyItemPath);
        }
        Ok(Self(coordinates))
    }

    /// Path of a top-level item.
    #[must_use]
    pub fn root(section_index: usize, item_index: usize) -> Self {
        Self(vec![LayoutCoordinate::new(section_index, item_index)])
    }

    pub(crate) fn from_coordinates_unchecked(coordinates: Vec<LayoutCoordinate>) -> Self {
        debug_assert!(!coordinates.is_empty());
        Self(coordinates)
    }

    #[must_use]
    pub fn coordinates(&self) -> &[LayoutCoordinate] {
        &self.0
    }

    /// Hops leading to the layout that owns this item.
    #[must_use]
    pub fn parent_hops(&self) -> &[LayoutCoordinate] {
        &self.0[..self.0.len() - 1]
    }

    #[must_use]
    pub fn leaf(&self) -> LayoutCoordinate {
        self.0[self.0.len() - 1]
    }

    /// Number of hops. A top-level item has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn section_index(&self) -> usize {
        self.leaf().section_index
    }

    #[must_use]
    pub fn item_index(&self) -> usize {
        self.leaf().item_index
    }

    /// Path of the section holding this item.
    #[must_use]
    pub fn section_path(&self) -> SectionPath {
        SectionPath {
            parent: self.parent_hops().to_vec(),
            section_index: self.section_index(),
        }
    }

    /// Path of the item whose nested layout holds this item.
    #[must_use]
    pub fn parent(&self) -> Option<ItemPath> {
        (self.0.len() > 1).then(|| Self(self.parent_hops().to_vec()))
    }

    /// Same section, different item index.
    #[must_use]
    pub fn with_item_index(&self, item_index: usize) -> ItemPath {
        let mut hops = self.0.clone();
        let last = hops.len() - 1;
        hops[last].item_index = item_index;
        Self(hops)
    }

    /// Descend into this item's nested layout.
    #[must_use]
    pub fn with_coordinate(&self, coordinate: LayoutCoordinate) -> ItemPath {
        let mut hops = self.0.clone();
        hops.push(coordinate);
        Self(hops)
    }

    /// Longest shared hop prefix.
    #[must_use]
    pub fn common_prefix(&self, other: &ItemPath) -> Vec<LayoutCoordinate> {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect()
    }

    /// Whether `self` is `ancestor` or lies inside its nested layout.
    #[must_use]
    pub fn is_within(&self, ancestor: &ItemPath) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Whether both items live in the same section of the same layout.
    #[must_use]
    pub fn same_section(&self, other: &ItemPath) -> bool {
        self.section_path() == other.section_path()
    }
}

impl TryFrom<Vec<LayoutCoordinate>> for ItemPath {
    type Error = PathError;

    fn try_from(value: Vec<LayoutCoordinate>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemPath> for Vec<LayoutCoordinate> {
    fn from(value: ItemPath) -> Self {
        value.0
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hop) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{hop}")?;
        }
        Ok(())
    }
}

impl FromStr for ItemPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hops = s
            .split('-')
            .map(str::parse)
            .collect::<Result<Vec<LayoutCoordinate>, _>>()?;
        Self::new(hops)
    }
}

/// Address of a section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPath {
    /// Hops to the item owning the nested layout; empty at top level.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent: Vec<LayoutCoordinate>,
    pub section_index: usize,
}

impl SectionPath {
    /// Path of a top-level section.
    #[must_use]
    pub fn root(section_index: usize) -> Self {
        Self {
            parent: Vec::new(),
            section_index,
        }
    }

    /// Section inside the nested layout of `owner`.
    #[must_use]
    pub fn nested(owner: &ItemPath, section_index: usize) -> Self {
        Self {
            parent: owner.coordinates().to_vec(),
            section_index,
        }
    }

    /// Item owning the nested layout this section lives in.
    #[must_use]
    pub fn parent_item(&self) -> Option<ItemPath> {
        ItemPath::new(self.parent.clone()).ok()
    }

    /// Item `item_index` of this section.
    #[must_use]
    pub fn item(&self, item_index: usize) -> ItemPath {
        let mut hops = self.parent.clone();
        hops.push(LayoutCoordinate::new(self.section_index, item_index));
        ItemPath(hops)
    }

    /// Sibling section in the same layout.
    #[must_use]
    pub fn with_section_index(&self, section_index: usize) -> SectionPath {
        Self {
            parent: self.parent.clone(),
            section_index,
        }
    }

    /// Whether `item` is a direct child of this section.
    #[must_use]
    pub fn is_item_in_section(&self, item: &ItemPath) -> bool {
        item.parent_hops() == self.parent.as_slice() && item.section_index() == self.section_index
    }

    /// Whether both sections live in the same layout.
    #[must_use]
    pub fn same_layout(&self, other: &SectionPath) -> bool {
        self.parent == other.parent
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hop in &self.parent {
            write!(f, "{hop}-")?;
        }
        write!(f, "{}", self.section_index)
    }
}

impl FromStr for SectionPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hops, last) = match s.rsplit_once('-') {
            Some((hops, last)) => (Some(hops), last),
            None => (None, s),
        };
        let section_index = last.parse().map_err(|_| PathError::Parse {
            input: s.to_owned(),
        })?;
        let parent = match hops {
            Some(hops) => hops
                .split('-')
                .map(str::parse)
                .collect::<Result<Vec<LayoutCoordinate>, _>>()?,
            None => Vec::new(),
        };
        Ok(Self {
            parent,
            section_index,
        })
    }
}

/// Resolution and parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    EmptyItemPath,
    /// `hop` is the 0-based hop index where resolution stopped.
    SectionOutOfRange {
        hop: usize,
        index: usize,
        len: usize,
    },
    ItemOutOfRange {
        hop: usize,
        section_index: usize,
        index: usize,
        len: usize,
    },
    NotALayout {
        hop: usize,
        coordinate: LayoutCoordinate,
    },
    Parse {
        input: String,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyItemPath => write!(f, "item path has no coordinates"),
            Self::SectionOutOfRange { hop, index, len } => write!(
                f,
                "hop {hop}: section {index} out of range (layout has {len} sections)"
            ),
            Self::ItemOutOfRange {
                hop,
                section_index,
                index,
                len,
            } => write!(
                f,
                "hop {hop}: item {index} out of range (section {section_index} has {len} items)"
            ),
            Self::NotALayout { hop, coordinate } => write!(
                f,
                "hop {hop}: item {coordinate} does not hold a nested layout"
            ),
            Self::Parse { input } => write!(f, "malformed path {input:?}"),
        }
    }
}

impl std::error::Error for PathError {}

/// A location that can be resolved to its owning section array.
pub trait LayoutLocation {
    /// Hops to the layout holding the location.
    fn layout_hops(&self) -> &[LayoutCoordinate];
    /// Index of the owning section within that layout.
    fn owning_section(&self) -> usize;
    /// Whether the owning section must already exist.
    fn requires_section(&self) -> bool;
}

impl LayoutLocation for SectionPath {
    fn layout_hops(&self) -> &[LayoutCoordinate] {
        &self.parent
    }

    fn owning_section(&self) -> usize {
        self.section_index
    }

    fn requires_section(&self) -> bool {
        false
    }
}

impl LayoutLocation for ItemPath {
    fn layout_hops(&self) -> &[LayoutCoordinate] {
        self.parent_hops()
    }

    fn owning_section(&self) -> usize {
        self.section_index()
    }

    fn requires_section(&self) -> bool {
        true
    }
}

/// Layout reached by following `hops` from `root`.
pub fn resolve_layout<'a>(
    root: &'a Layout,
    hops: &[LayoutCoordinate],
) -> Result<&'a Layout, PathError> {
    let mut layout = root;
    for (hop, coordinate) in hops.iter().enumerate() {
        let item = item_at(layout, hop, *coordinate)?;
        layout = item.content.as_layout().ok_or(PathError::NotALayout {
            hop,
            coordinate: *coordinate,
        })?;
    }
    Ok(layout)
}

/// Section array owning `location`.
///
/// For a section path the addressed section need not exist (it may be an
/// insertion point); for an item path the item's section must exist.
pub fn resolve_sections<'a, L: LayoutLocation + ?Sized>(
    root: &'a Layout,
    location: &L,
) -> Result<&'a Vector<Section>, PathError> {
    let hops = location.layout_hops();
    let layout = resolve_layout(root, hops)?;
    if location.requires_section() && location.owning_section() >= layout.sections.len() {
        return Err(PathError::SectionOutOfRange {
            hop: hops.len(),
            index: location.owning_section(),
            len: layout.sections.len(),
        });
    }
    Ok(&layout.sections)
}

pub fn resolve_section<'a>(root: &'a Layout, path: &SectionPath) -> Result<&'a Section, PathError> {
    let layout = resolve_layout(root, &path.parent)?;
    layout
        .sections
        .get(path.section_index)
        .ok_or(PathError::SectionOutOfRange {
            hop: path.parent.len(),
            index: path.section_index,
            len: layout.sections.len(),
        })
}

pub fn resolve_item<'a>(root: &'a Layout, path: &ItemPath) -> Result<&'a Item, PathError> {
    let layout = resolve_layout(root, path.parent_hops())?;
    item_at(layout, path.depth() - 1, path.leaf())
}

fn item_at(layout: &Layout, hop: usize, coordinate: LayoutCoordinate) -> Result<&Item, PathError> {
    let section = layout
        .sections
        .get(coordinate.section_index)
        .ok_or(PathError::SectionOutOfRange {
            hop,
            index: coordinate.section_index,
            len: layout.sections.len(),
        })?;
    section
        .items
        .get(coordinate.item_index)
        .ok_or(PathError::ItemOutOfRange {
            hop,
            section_index: coordinate.section_index,
            index: coordinate.item_index,
            len: section.items.len(),
        })
}

/// Mutable counterpart of [`resolve_layout`].
///
/// Copies only the chunks on the path to the target.
pub(crate) fn resolve_layout_mut<'a>(
    root: &'a mut Layout,
    hops: &[LayoutCoordinate],
) -> Result<&'a mut Layout, PathError> {
    let mut layout = root;
    for (hop, coordinate) in hops.iter().enumerate() {
        let item = item_at_mut(layout, hop, *coordinate)?;
        layout = item.content.as_layout_mut().ok_or(PathError::NotALayout {
            hop,
            coordinate: *coordinate,
        })?;
    }
    Ok(layout)
}

pub(crate) fn resolve_section_mut<'a>(
    root: &'a mut Layout,
    path: &SectionPath,
) -> Result<&'a mut Section, PathError> {
    let layout = resolve_layout_mut(root, &path.parent)?;
    let len = layout.sections.len();
    layout
        .sections
        .get_mut(path.section_index)
        .ok_or(PathError::SectionOutOfRange {
            hop: path.parent.len(),
            index: path.section_index,
            len,
        })
}

pub(crate) fn resolve_item_mut<'a>(
    root: &'a mut Layout,
    path: &ItemPath,
) -> Result<&'a mut Item, PathError> {
    let layout = resolve_layout_mut(root, path.parent_hops())?;
    item_at_mut(layout, path.depth() - 1, path.leaf())
}

fn item_at_mut(
    layout: &mut Layout,
    hop: usize,
    coordinate: LayoutCoordinate,
) -> Result<&mut Item, PathError> {
    let sections_len = layout.sections.len();
    let section = layout
        .sections
        .get_mut(coordinate.section_index)
        .ok_or(PathError::SectionOutOfRange {
            hop,
            index: coordinate.section_index,
            len: sections_len,
        })?;
    let items_len = section.items.len();
    section
        .items
        .get_mut(coordinate.item_index)
        .ok_or(PathError::ItemOutOfRange {
            hop,
            section_index: coordinate.section_index,
            index: coordinate.item_index,
            len: items_len,
        })
}
