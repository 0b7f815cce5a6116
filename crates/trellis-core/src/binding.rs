// SPDX-License-Identifier: Apache-2.0
//! Binding vocabulary and the three-way binding source union.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use trellis_model::{Edge, Node, PropertyBag};

/// Dynamic value produced by a resolved binding.
///
/// Colors are strings, sizes are numbers, style bags are objects; the
/// renderer interprets them per key.
pub type BindingValue = serde_json::Value;

/// Borrowed node-or-edge view handed to computed bindings and accessors.
#[derive(Debug, Clone, Copy)]
pub enum GraphItem<'a> {
    /// A projected (or synthesized) node.
    Node(&'a Node),
    /// A projected edge.
    Edge(&'a Edge),
}

impl<'a> GraphItem<'a> {
    /// The item's id (node id, or predicate-derived edge id).
    #[must_use]
    pub fn id(&self) -> &'a str {
        match self {
            Self::Node(n) => &n.id,
            Self::Edge(e) => &e.id,
        }
    }

    /// The item's property bag.
    #[must_use]
    pub fn properties(&self) -> &'a PropertyBag {
        match self {
            Self::Node(n) => &n.properties,
            Self::Edge(e) => &e.properties,
        }
    }

    /// The item's extracted display label (empty when absent).
    #[must_use]
    pub fn label(&self) -> &'a str {
        self.properties().get(trellis_model::PROP_LABEL).unwrap_or("")
    }
}

/// Caller-supplied binding function.
///
/// Executed synchronously on the calling thread; assumed fast and
/// non-blocking. Panics propagate to the caller, never swallowed.
pub type ComputeFn = Arc<dyn Fn(&GraphItem<'_>) -> BindingValue + Send + Sync>;

/// One source of truth for a visual attribute.
///
/// An explicit sum type: the resolver never inspects value shape to guess
/// whether a string was meant as a constant or a property name.
#[derive(Clone)]
pub enum BindingSource {
    /// A literal value returned as-is.
    Constant(BindingValue),
    /// Indirection through the item's property bag.
    PropertyRef(String),
    /// A caller function invoked with the item.
    Computed(ComputeFn),
}

impl BindingSource {
    /// A constant binding.
    pub fn constant(value: impl Into<BindingValue>) -> Self {
        Self::Constant(value.into())
    }

    /// A property-name indirection binding.
    pub fn property(name: impl Into<String>) -> Self {
        Self::PropertyRef(name.into())
    }

    /// A computed binding from a caller function.
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(&GraphItem<'_>) -> BindingValue + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }
}

impl fmt::Debug for BindingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::PropertyRef(name) => f.debug_tuple("PropertyRef").field(name).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for BindingSource {
    fn from(value: &str) -> Self {
        Self::Constant(BindingValue::from(value))
    }
}

impl From<String> for BindingSource {
    fn from(value: String) -> Self {
        Self::Constant(BindingValue::from(value))
    }
}

impl From<BindingValue> for BindingSource {
    fn from(value: BindingValue) -> Self {
        Self::Constant(value)
    }
}

/// The fixed vocabulary of visual attribute keys.
///
/// Node and edge roles each use a subset; see [`NODE_BINDINGS`] and
/// [`EDGE_BINDINGS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKey {
    /// Node coordinate hint.
    Coordinate,
    /// Node or edge color.
    Color,
    /// Node size.
    Size,
    /// Node positioning type (same types prefer adjacency).
    Type,
    /// Style bag (shape, image, color...).
    Styles,
    /// Node scale factor.
    ScaleFactor,
    /// Node position.
    Position,
    /// Node layout hint.
    Layout,
    /// Additional properties bound onto the item.
    Property,
    /// Display text. Configured via the public `text` key; the internal
    /// name differs to avoid colliding with the renderer's own `label`.
    Label,
    /// Grouping: resolves to a synthetic `GroupNode`-prefixed parent id.
    Parent,
    /// Edge stroke thickness factor.
    ThicknessFactor,
    /// Edge heat.
    Heat,
}

impl BindingKey {
    /// Renderer-facing name of this key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coordinate => "coordinate",
            Self::Color => "color",
            Self::Size => "size",
            Self::Type => "type",
            Self::Styles => "styles",
            Self::ScaleFactor => "scale_factor",
            Self::Position => "position",
            Self::Layout => "layout",
            Self::Property => "property",
            Self::Label => "label",
            Self::Parent => "parent",
            Self::ThicknessFactor => "thickness_factor",
            Self::Heat => "heat",
        }
    }

    /// Parses a caller-facing configuration key (`text`,
    /// `parent_configuration`, ...) into a binding key.
    ///
    /// Used when a structured grouping bag re-registers its remaining
    /// fields as a configuration. Unknown keys yield `None` and are
    /// ignored.
    #[must_use]
    pub fn from_config_key(key: &str) -> Option<Self> {
        match key {
            "text" => Some(Self::Label),
            "color" => Some(Self::Color),
            "size" => Some(Self::Size),
            "type" => Some(Self::Type),
            "styles" => Some(Self::Styles),
            "property" => Some(Self::Property),
            "parent_configuration" => Some(Self::Parent),
            "thickness_factor" => Some(Self::ThicknessFactor),
            _ => None,
        }
    }
}

/// Attribute keys the renderer reads for nodes.
pub const NODE_BINDINGS: &[BindingKey] = &[
    BindingKey::Coordinate,
    BindingKey::Color,
    BindingKey::Size,
    BindingKey::Type,
    BindingKey::Styles,
    BindingKey::ScaleFactor,
    BindingKey::Position,
    BindingKey::Layout,
    BindingKey::Property,
    BindingKey::Label,
    BindingKey::Parent,
];

/// Attribute keys the renderer reads for edges.
pub const EDGE_BINDINGS: &[BindingKey] = &[
    BindingKey::Color,
    BindingKey::ThicknessFactor,
    BindingKey::Property,
    BindingKey::Label,
    BindingKey::Styles,
    BindingKey::Heat,
];

/// Declarative per-predicate visual configuration.
///
/// A bag of binding sources keyed by [`BindingKey`]. Callers write the
/// public `text` key via [`ElementStyle::text`]; it is stored under
/// [`BindingKey::Label`] internally.
#[derive(Debug, Clone, Default)]
pub struct ElementStyle {
    entries: BTreeMap<BindingKey, BindingSource>,
}

impl ElementStyle {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display text binding (stored under the internal label key).
    #[must_use]
    pub fn text(self, source: impl Into<BindingSource>) -> Self {
        self.bind(BindingKey::Label, source)
    }

    /// Sets the color binding.
    #[must_use]
    pub fn color(self, source: impl Into<BindingSource>) -> Self {
        self.bind(BindingKey::Color, source)
    }

    /// Sets the size binding.
    #[must_use]
    pub fn size(self, source: impl Into<BindingSource>) -> Self {
        self.bind(BindingKey::Size, source)
    }

    /// Sets the style-bag binding.
    #[must_use]
    pub fn styles(self, source: impl Into<BindingSource>) -> Self {
        self.bind(BindingKey::Styles, source)
    }

    /// Sets the additional-properties binding.
    #[must_use]
    pub fn property(self, source: impl Into<BindingSource>) -> Self {
        self.bind(BindingKey::Property, source)
    }

    /// Sets the positioning-type binding.
    #[must_use]
    pub fn node_type(self, source: impl Into<BindingSource>) -> Self {
        self.bind(BindingKey::Type, source)
    }

    /// Sets the grouping (parent configuration) binding.
    #[must_use]
    pub fn parent(self, source: impl Into<BindingSource>) -> Self {
        self.bind(BindingKey::Parent, source)
    }

    /// Sets the edge thickness-factor binding.
    #[must_use]
    pub fn thickness_factor(self, source: impl Into<BindingSource>) -> Self {
        self.bind(BindingKey::ThicknessFactor, source)
    }

    /// Sets an arbitrary binding key.
    #[must_use]
    pub fn bind(mut self, key: BindingKey, source: impl Into<BindingSource>) -> Self {
        self.entries.insert(key, source.into());
        self
    }

    /// Looks up the source bound to a key.
    #[must_use]
    pub fn get(&self, key: BindingKey) -> Option<&BindingSource> {
        self.entries.get(&key)
    }

    /// Returns `true` when no keys are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates bound `(key, source)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (BindingKey, &BindingSource)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Builds a configuration from a structured JSON bag.
    ///
    /// The grouping path uses this when a structured bag's non-`text`
    /// fields are re-registered for the synthesized group node. Unknown
    /// field names are ignored; all values become constants.
    #[must_use]
    pub fn from_bag(bag: &serde_json::Map<String, BindingValue>) -> Self {
        let mut style = Self::new();
        for (key, value) in bag {
            if let Some(binding) = BindingKey::from_config_key(key) {
                style = style.bind(binding, BindingSource::Constant(value.clone()));
            }
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_is_stored_under_label() {
        let style = ElementStyle::new().text("Person");
        assert!(style.get(BindingKey::Label).is_some());
    }

    #[test]
    fn from_bag_maps_config_keys_and_skips_unknown() {
        let bag = json!({"text": "Dept", "color": "blue", "bogus": 1});
        let serde_json::Value::Object(bag) = bag else {
            unreachable!()
        };
        let style = ElementStyle::from_bag(&bag);
        assert!(style.get(BindingKey::Label).is_some());
        assert!(style.get(BindingKey::Color).is_some());
        assert_eq!(style.iter().count(), 2);
    }

    #[test]
    fn computed_source_is_callable() {
        let src = BindingSource::compute(|item| BindingValue::from(item.label().to_uppercase()));
        let node = Node::new("http://ex.org/p#a", "a");
        let item = GraphItem::Node(&node);
        match src {
            BindingSource::Computed(f) => assert_eq!(f(&item), json!("A")),
            _ => unreachable!(),
        }
    }
}
