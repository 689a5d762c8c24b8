#![forbid(unsafe_code)]

//! Detached holding area for items removed during compound edits.
//!
//! Items moved into the [`Stash`] have no owning section until a later
//! command restores them and names the stash id as used, which deletes the
//! entry. The stash is an `im::OrdMap`, so it snapshots as cheaply as the
//! layout it travels with.

use std::fmt;

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::tree::Item;

/// Opaque stash key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StashId(String);

impl StashId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StashId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Stash id to detached item list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stash {
    entries: OrdMap<StashId, Vector<Item>>,
}

impl Stash {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &StashId) -> Option<&Vector<Item>> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &StashId) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &StashId> {
        self.entries.keys()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&StashId, &Vector<Item>)> {
        self.entries.iter()
    }

    /// Store `items` under `id`, replacing any previous entry.
    pub(crate) fn store(&mut self, id: StashId, items: Vector<Item>) {
        self.entries.insert(id, items);
    }

    /// Delete an entry. Returns `false` if it did not exist.
    pub(crate) fn discard(&mut self, id: &StashId) -> bool {
        self.entries.remove(id).is_some()
    }
}
