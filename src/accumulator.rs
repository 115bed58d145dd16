use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

/// An auxiliary entity side-loaded alongside primary content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: String,
    pub data: serde_json::Value,
}

impl Entity {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// Side table of entities gathered during one expansion, keyed by fullname.
///
/// Merges are additive: an existing key is never overwritten. Each expansion
/// step returns its own accumulator and the caller folds it in with
/// [`Accumulator::merge`], so concurrent branches never share a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accumulator {
    entries: BTreeMap<String, Entity>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the key was already present.
    pub fn insert(&mut self, id: impl Into<String>, entity: Entity) -> bool {
        match self.entries.entry(id.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entity);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn merge(&mut self, other: Accumulator) {
        for (id, entity) in other.entries {
            self.entries.entry(id).or_insert(entity);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Entity)> for Accumulator {
    fn from_iter<I: IntoIterator<Item = (String, Entity)>>(iter: I) -> Self {
        let mut acc = Accumulator::new();
        for (id, entity) in iter {
            acc.insert(id, entity);
        }
        acc
    }
}
