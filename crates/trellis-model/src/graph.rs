// SPDX-License-Identifier: Apache-2.0
//! Projected graph model: nodes, edges and insertion-ordered property bags.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Insertion-ordered `String -> String` map.
///
/// Property order is semantically visible to renderers (tooltips list
/// properties in fold order), so a sorted map would be wrong here. Inserting
/// an existing key overwrites its value in place, keeping the original
/// position (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    entries: Vec<(String, String)>,
}

impl PropertyBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a property, preserving first-insert position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Looks up a property value by exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` when the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of properties in the bag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the bag holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertyBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BagVisitor;

        impl<'de> Visitor<'de> for BagVisitor {
            type Value = PropertyBag;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string properties")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut bag = PropertyBag::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    bag.insert(k, v);
                }
                Ok(bag)
            }
        }

        deserializer.deserialize_map(BagVisitor)
    }
}

/// A projected graph node.
///
/// `id` is the subject/object term's raw string form and is globally unique
/// within one projection. `properties` always carries the seeded `label` and
/// `full_label` entries; literal objects are folded in keyed by the
/// predicate's extracted label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Raw term string; unique within a projection.
    pub id: String,
    /// Insertion-ordered property bag.
    pub properties: PropertyBag,
}

impl Node {
    /// Creates a node seeded with `label` and `full_label` properties.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let mut properties = PropertyBag::new();
        properties.insert(crate::PROP_LABEL, label);
        properties.insert(crate::PROP_FULL_LABEL, id.clone());
        Self { id, properties }
    }

    /// The extracted display label (empty when absent).
    #[must_use]
    pub fn label(&self) -> &str {
        self.properties.get(crate::PROP_LABEL).unwrap_or("")
    }
}

/// A projected directed edge.
///
/// `id` is the predicate's extracted label and is deliberately *not* unique:
/// the same predicate repeating between node pairs produces colliding ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Predicate-derived id (collisions allowed).
    pub id: String,
    /// Source node id.
    pub start: String,
    /// Target node id.
    pub end: String,
    /// Carries `label` (extracted) and `full_label` (raw predicate).
    pub properties: PropertyBag,
}

impl Edge {
    /// Creates an edge between two node ids from a predicate's labels.
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        label: impl Into<String>,
        full_label: impl Into<String>,
    ) -> Self {
        let label = label.into();
        let mut properties = PropertyBag::new();
        properties.insert(crate::PROP_LABEL, label.clone());
        properties.insert(crate::PROP_FULL_LABEL, full_label);
        Self {
            id: label,
            start: start.into(),
            end: end.into(),
            properties,
        }
    }

    /// The extracted display label (empty when absent).
    #[must_use]
    pub fn label(&self) -> &str {
        self.properties.get(crate::PROP_LABEL).unwrap_or("")
    }
}

/// The renderable graph a projection produces.
///
/// Node order is first-seen order and is semantically visible to the
/// renderer's default layout. Projected graphs are always directed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphModel {
    /// All nodes, in first-seen order.
    pub nodes: Vec<Node>,
    /// All edges, in arrival order.
    pub edges: Vec<Edge>,
    /// Always `true` for projected graphs.
    pub directed: bool,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphModel {
    /// Creates an empty directed graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            directed: true,
        }
    }

    /// Position of the node with the given id, if present.
    ///
    /// Linear scan; the projector maintains its own hash index while
    /// building and does not go through this.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Shared reference to the node with the given id, if present.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
