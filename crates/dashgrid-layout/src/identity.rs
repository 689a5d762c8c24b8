#![forbid(unsafe_code)]

//! Widget identity lookup and remapping.
//!
//! After a host persists new widgets it may hand back fresh identities for
//! them. [`Layout::remap_identities`] rewrites those references everywhere
//! without touching the layout's shape.

use rustc_hash::FxHashMap;

use crate::content::{Content, ContentRef, Widget};
use crate::path::ItemPath;
use crate::tree::{Item, Layout, Section};

/// Old identity to new identity.
pub type IdentityMapping = FxHashMap<ContentRef, ContentRef>;

impl Layout {
    /// Copy of this layout with every mapped widget identity replaced, at
    /// every depth and in widget children.
    #[must_use]
    pub fn remap_identities(&self, mapping: &IdentityMapping) -> Layout {
        if mapping.is_empty() {
            return self.clone();
        }
        let mut out = self.clone();
        remap_layout(&mut out, mapping);
        out
    }

    /// Path of the item whose widget (or a widget child) has `identity`.
    #[must_use]
    pub fn find_content(&self, identity: &ContentRef) -> Option<ItemPath> {
        self.iter_items()
            .find(|(_, item)| {
                item.content
                    .as_widget()
                    .is_some_and(|widget| widget.find(identity).is_some())
            })
            .map(|(path, _)| path)
    }
}

fn remap_layout(layout: &mut Layout, mapping: &IdentityMapping) {
    for section in layout.sections.iter_mut() {
        remap_section(section, mapping);
    }
}

fn remap_section(section: &mut Section, mapping: &IdentityMapping) {
    for item in section.items.iter_mut() {
        remap_item(item, mapping);
    }
}

fn remap_item(item: &mut Item, mapping: &IdentityMapping) {
    match &mut item.content {
        Content::Widget(widget) => widget.walk_mut(&mut |w: &mut Widget| {
            if let Some(next) = mapping.get(&w.identity) {
                w.identity = next.clone();
            }
        }),
        Content::Layout(nested) => remap_layout(nested, mapping),
    }
}
