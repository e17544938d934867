//! Identity registry for graphs, nodes, edges, and models.
//!
//! Every object built through this crate is issued a unique [`ObjectId`] and
//! recorded here under that id and under its label, so collaborators can look
//! objects up or introspect a model's parts without holding references to them.
//!
//! The registry is an ordinary value owned by the caller and passed to
//! constructors by `&mut`; there is no process-wide instance. Dropping the
//! registry (or calling [`IdentityRegistry::clear`]) tears the bookkeeping down.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::engine::errors::ModelError;

/// A unique identifier issued by an [`IdentityRegistry`].
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of object recorded under an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    Graph,
    Node,
    Edge,
    MarkovModel,
    HiddenMarkovModel,
}

/// What the registry knows about one object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistryEntry {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub label: String,
}

/// Lookup service mapping ids and labels to registered objects.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    next_id: u64,
    by_id: FxHashMap<ObjectId, RegistryEntry>,
    /// Ids per label, in registration order
    by_label: FxHashMap<String, Vec<ObjectId>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh id and records the object under it.
    ///
    /// Ids are never reused, even after [`forget`](Self::forget); explicitly
    /// registered ids are skipped over.
    pub fn allocate(&mut self, kind: ObjectKind, label: &str) -> ObjectId {
        let mut id = ObjectId(self.next_id);
        while self.by_id.contains_key(&id) {
            id = ObjectId(id.0 + 1);
        }
        self.next_id = id.0 + 1;
        self.insert(RegistryEntry { id, kind, label: label.to_string() });
        id
    }

    /// Records an object under a caller-chosen id.
    ///
    /// # Errors
    ///
    /// * `ModelError::DuplicateId` - the id is already registered
    pub fn register(
        &mut self,
        id: ObjectId,
        kind: ObjectKind,
        label: &str,
    ) -> Result<(), ModelError> {
        if self.by_id.contains_key(&id) {
            return Err(ModelError::DuplicateId(id));
        }
        self.insert(RegistryEntry { id, kind, label: label.to_string() });
        Ok(())
    }

    fn insert(&mut self, entry: RegistryEntry) {
        self.by_label.entry(entry.label.clone()).or_default().push(entry.id);
        self.by_id.insert(entry.id, entry);
    }

    pub fn find_by_id(&self, id: ObjectId) -> Option<&RegistryEntry> {
        self.by_id.get(&id)
    }

    /// All objects registered under `label`, oldest first.
    pub fn find_by_label(&self, label: &str) -> Vec<&RegistryEntry> {
        self.by_label
            .get(label)
            .map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    /// Removes one object from the registry, returning what was known about it.
    pub fn forget(&mut self, id: ObjectId) -> Option<RegistryEntry> {
        let entry = self.by_id.remove(&id)?;
        if let Some(ids) = self.by_label.get_mut(&entry.label) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_label.remove(&entry.label);
            }
        }
        Some(entry)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_label.clear();
    }
}
