#![forbid(unsafe_code)]

//! Item content: opaque widgets or nested layouts.
//!
//! The layout core only distinguishes two shapes of [`Content`]: a nested
//! [`Layout`] it must recurse into, and a [`Widget`] it treats as an opaque
//! payload. Widgets carry an identity, a kind discriminator owned by the
//! host, a free-form field map, and an optional list of child widgets (for
//! example the visualizations held by a switcher). Identity lookups search
//! children too.
//!
//! On the wire the field map is flattened into the widget object, so any
//! key besides `type`, `identity`, `kind` and `children` is kept verbatim.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tree::Layout;

/// Stable reference to a piece of widget content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(String);

impl ContentRef {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque leaf content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub identity: ContentRef,
    /// Host-defined discriminator (e.g. `"insight"`, `"rich_text"`).
    pub kind: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
    /// Content-defined sub-collection searched by identity lookups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Widget>,
}

impl Widget {
    #[must_use]
    pub fn new(identity: impl Into<ContentRef>, kind: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            kind: kind.into(),
            fields: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set a field (builder pattern).
    #[must_use]
    pub fn with_field(mut self, field: ContentField, value: Value) -> Self {
        self.fields.insert(field.key().to_owned(), value);
        self
    }

    /// Append a child widget (builder pattern).
    #[must_use]
    pub fn with_child(mut self, child: Widget) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn field(&self, field: &ContentField) -> Option<&Value> {
        self.fields.get(field.key())
    }

    /// Set or delete a field. Returns the previous value.
    pub fn replace_field(&mut self, field: &ContentField, value: Option<Value>) -> Option<Value> {
        match value {
            Some(value) => self.fields.insert(field.key().to_owned(), value),
            None => self.fields.remove(field.key()),
        }
    }

    /// This widget or a descendant with the given identity.
    #[must_use]
    pub fn find(&self, identity: &ContentRef) -> Option<&Widget> {
        if &self.identity == identity {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(identity))
    }

    pub fn find_mut(&mut self, identity: &ContentRef) -> Option<&mut Widget> {
        if &self.identity == identity {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(identity))
    }

    /// Visit this widget and every descendant, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Widget)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub(crate) fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Widget)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Whether the ignored-filter list of this widget or a descendant names
    /// any of `display_forms`.
    pub(crate) fn ignores_any(&self, display_forms: &[String]) -> bool {
        let mut hit = false;
        self.walk(&mut |widget| {
            if let Some(Value::Array(entries)) = widget.field(&ContentField::IgnoredFilters) {
                hit |= entries
                    .iter()
                    .any(|entry| filter_matches(entry, display_forms));
            }
        });
        hit
    }

    /// Drop ignored-filter entries naming any of `display_forms` here and in
    /// every descendant. Returns the number of entries removed.
    pub(crate) fn drop_ignored_filters(&mut self, display_forms: &[String]) -> usize {
        let mut removed = 0;
        self.walk_mut(&mut |widget| {
            if let Some(Value::Array(entries)) = widget.fields.get_mut(ContentField::IgnoredFilters.key()) {
                let before = entries.len();
                entries.retain(|entry| !filter_matches(entry, display_forms));
                removed += before - entries.len();
            }
        });
        removed
    }
}

/// An ignored-filter entry is either a bare display-form string or an object
/// with a `displayForm` string.
fn filter_matches(entry: &Value, display_forms: &[String]) -> bool {
    let form = match entry {
        Value::String(form) => Some(form.as_str()),
        Value::Object(map) => map.get("displayForm").and_then(Value::as_str),
        _ => None,
    };
    form.is_some_and(|form| display_forms.iter().any(|candidate| candidate == form))
}

/// Named widget field targeted by content replacement commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentField {
    Title,
    Description,
    Drills,
    Properties,
    Configuration,
    IgnoredFilters,
    DateDataSet,
    Insight,
    Measure,
    Comparison,
    /// Any other host-defined key.
    Custom(String),
}

impl ContentField {
    /// Key under which the field is stored in [`Widget::fields`].
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Drills => "drills",
            Self::Properties => "properties",
            Self::Configuration => "configuration",
            Self::IgnoredFilters => "ignoreDashboardFilters",
            Self::DateDataSet => "dateDataSet",
            Self::Insight => "insight",
            Self::Measure => "measure",
            Self::Comparison => "comparison",
            Self::Custom(key) => key,
        }
    }
}

impl fmt::Display for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Content slot of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Widget(Widget),
    Layout(Box<Layout>),
}

impl Content {
    #[must_use]
    pub fn as_layout(&self) -> Option<&Layout> {
        match self {
            Self::Layout(layout) => Some(layout),
            Self::Widget(_) => None,
        }
    }

    pub fn as_layout_mut(&mut self) -> Option<&mut Layout> {
        match self {
            Self::Layout(layout) => Some(layout),
            Self::Widget(_) => None,
        }
    }

    #[must_use]
    pub fn as_widget(&self) -> Option<&Widget> {
        match self {
            Self::Widget(widget) => Some(widget),
            Self::Layout(_) => None,
        }
    }

    pub fn as_widget_mut(&mut self) -> Option<&mut Widget> {
        match self {
            Self::Widget(widget) => Some(widget),
            Self::Layout(_) => None,
        }
    }

    #[must_use]
    pub fn is_layout(&self) -> bool {
        matches!(self, Self::Layout(_))
    }
}

impl From<Widget> for Content {
    fn from(widget: Widget) -> Self {
        Self::Widget(widget)
    }
}

impl From<Layout> for Content {
    fn from(layout: Layout) -> Self {
        Self::Layout(Box::new(layout))
    }
}
