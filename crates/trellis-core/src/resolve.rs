// SPDX-License-Identifier: Apache-2.0
//! Per-attribute binding resolution for nodes and edges.

use std::collections::HashMap;

use crate::binding::{BindingKey, BindingSource, BindingValue, GraphItem};
use crate::config::ConfigRegistry;
use crate::hierarchy::{derive_group_label, group_node_id};
use crate::project::RoleLookup;

/// Renderer-default mapping with the fixed `(index, item)` contract.
///
/// The external renderer's inconsistent accessor shapes are normalized to
/// this signature once at the boundary; the resolver never inspects
/// parameter counts.
pub type Mapping = Box<dyn Fn(usize, &GraphItem<'_>) -> Option<BindingValue>>;

/// Conventional label-like property keys, scanned in this order when no
/// configuration resolves the label key.
const LABEL_FALLBACK_KEYS: [&str; 6] = ["name", "title", "text", "description", "caption", "label"];

/// Resolves visual attribute values for one projected scene.
///
/// Pure with respect to its inputs: resolution reads the captured registry
/// snapshot and role lookups, and invokes caller-supplied binding functions
/// synchronously (their side effects, and panics, are the caller's).
pub struct Resolver {
    snapshot: ConfigRegistry,
    roles: RoleLookup,
    /// Child id -> parent id recorded by parent/child edge rewriting.
    rule_parents: HashMap<String, String>,
}

impl Resolver {
    /// Creates a resolver over a registry snapshot and role lookups.
    #[must_use]
    pub fn new(snapshot: ConfigRegistry, roles: RoleLookup) -> Self {
        Self {
            snapshot,
            roles,
            rule_parents: HashMap::new(),
        }
    }

    /// Installs the child -> parent map produced by edge rewriting.
    ///
    /// Consulted for the `Parent` key after configuration but before the
    /// renderer default.
    #[must_use]
    pub fn with_rule_parents(mut self, parents: HashMap<String, String>) -> Self {
        self.rule_parents = parents;
        self
    }

    /// Resolves one attribute with no renderer default.
    #[must_use]
    pub fn resolve(&self, key: BindingKey, index: usize, item: &GraphItem<'_>) -> Option<BindingValue> {
        self.resolve_with(key, index, item, None)
    }

    /// Resolves one attribute, delegating to `default` when nothing else
    /// answers.
    ///
    /// Resolution order: governing configuration entry (object role then
    /// subject role for nodes; the edge registry alone for edges), then the
    /// recorded rule parent for the `Parent` key, then the conventional
    /// label fallback for the `Label` key, then `default`.
    #[must_use]
    pub fn resolve_with(
        &self,
        key: BindingKey,
        index: usize,
        item: &GraphItem<'_>,
        default: Option<&Mapping>,
    ) -> Option<BindingValue> {
        if let Some(style) = self.governing_style(item) {
            if let Some(source) = style.get(key) {
                if let Some(value) = self.apply_source(key, source, item) {
                    return Some(value);
                }
            }
        }

        if key == BindingKey::Parent {
            if let Some(parent) = self.rule_parents.get(item.id()) {
                return Some(BindingValue::from(parent.as_str()));
            }
        }

        if key == BindingKey::Label {
            if let Some(value) = label_fallback(item) {
                return Some(value);
            }
        }

        default.and_then(|mapping| mapping(index, item))
    }

    /// Returns an accessor closure for one attribute key.
    ///
    /// The produced accessor conforms to `(index, item) -> value | null`
    /// and owns the renderer default, if any.
    pub fn accessor(
        &self,
        key: BindingKey,
        default: Option<Mapping>,
    ) -> impl Fn(usize, &GraphItem<'_>) -> Option<BindingValue> + '_ {
        move |index, item| self.resolve_with(key, index, item, default.as_ref())
    }

    /// The governing configuration entry for an item, if any.
    ///
    /// Nodes resolve through the role lookups, object role winning over
    /// subject role. Edges consult only the edge registry (where the `"*"`
    /// wildcard entry also matches), never the node role lookups — a
    /// predicate label colliding with a configured node's label must not
    /// make the edge adopt that node configuration.
    fn governing_style(&self, item: &GraphItem<'_>) -> Option<&crate::binding::ElementStyle> {
        let label = item.label();
        match item {
            GraphItem::Edge(_) => self.snapshot.edge(label),
            GraphItem::Node(_) => {
                if let Some(predicate) = self.roles.objects.get(label) {
                    return self.snapshot.object(predicate);
                }
                if let Some(predicate) = self.roles.subjects.get(label) {
                    return self.snapshot.subject(predicate);
                }
                None
            }
        }
    }

    fn apply_source(
        &self,
        key: BindingKey,
        source: &BindingSource,
        item: &GraphItem<'_>,
    ) -> Option<BindingValue> {
        if key == BindingKey::Parent {
            let spec = derive_group_label(source, item)?;
            return Some(BindingValue::from(group_node_id(&spec.label)));
        }
        match source {
            BindingSource::Computed(f) => Some(f(item)),
            BindingSource::PropertyRef(name) => item
                .properties()
                .get(name)
                .map(BindingValue::from),
            BindingSource::Constant(value) => Some(value.clone()),
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("roles", &self.roles)
            .field("rule_parents", &self.rule_parents)
            .finish_non_exhaustive()
    }
}

/// Case-insensitive scan for a conventional label-like property.
fn label_fallback(item: &GraphItem<'_>) -> Option<BindingValue> {
    for candidate in LABEL_FALLBACK_KEYS {
        let found = item
            .properties()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(candidate));
        if let Some((_, value)) = found {
            return Some(BindingValue::from(value));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::binding::ElementStyle;
    use crate::config::WILDCARD;
    use crate::project::Projector;
    use serde_json::json;
    use trellis_model::{Node, Term, Triple};

    fn resource_triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(Term::resource(s), Term::resource(p), Term::resource(o))
    }

    fn project_with(registry: &ConfigRegistry, triples: &[Triple]) -> (Resolver, Vec<Node>) {
        let projection = Projector::new(registry).project(triples);
        let resolver = Resolver::new(registry.clone(), projection.roles);
        (resolver, projection.model.nodes)
    }

    #[test]
    fn object_config_overrides_default() {
        let mut registry = ConfigRegistry::new();
        registry.set_object("p", &ElementStyle::new().color("red"));
        let triples = vec![resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/b")];
        let (resolver, nodes) = project_with(&registry, &triples);

        let b = GraphItem::Node(&nodes[1]);
        let default: Mapping = Box::new(|_, _| Some(json!("grey")));
        let resolved = resolver.resolve_with(BindingKey::Color, 1, &b, Some(&default));
        assert_eq!(resolved, Some(json!("red")));
    }

    #[test]
    fn unconfigured_node_falls_to_default() {
        let registry = ConfigRegistry::new();
        let triples = vec![resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/b")];
        let (resolver, nodes) = project_with(&registry, &triples);

        let a = GraphItem::Node(&nodes[0]);
        let default: Mapping = Box::new(|_, _| Some(json!("grey")));
        let resolved = resolver.resolve_with(BindingKey::Color, 0, &a, Some(&default));
        assert_eq!(resolved, Some(json!("grey")));
    }

    #[test]
    fn object_role_wins_over_subject_role() {
        let mut registry = ConfigRegistry::new();
        registry.set_subject("p", &ElementStyle::new().color("blue"));
        registry.set_object("p", &ElementStyle::new().color("red"));
        // b is both: object of a-p-b, subject of b-p-c.
        let triples = vec![
            resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/b"),
            resource_triple("http://ex.org/b", "http://ex.org/p", "http://ex.org/c"),
        ];
        let (resolver, nodes) = project_with(&registry, &triples);

        let b = GraphItem::Node(&nodes[1]);
        assert_eq!(resolver.resolve(BindingKey::Color, 1, &b), Some(json!("red")));
    }

    #[test]
    fn property_indirection_reads_the_property() {
        let mut registry = ConfigRegistry::new();
        registry.set_subject(
            "age",
            &ElementStyle::new().size(BindingSource::property("age")),
        );
        let triples = vec![Triple::new(
            Term::resource("http://ex.org/a"),
            Term::resource("http://ex.org/age"),
            Term::literal("42"),
        )];
        let (resolver, nodes) = project_with(&registry, &triples);

        let a = GraphItem::Node(&nodes[0]);
        assert_eq!(resolver.resolve(BindingKey::Size, 0, &a), Some(json!("42")));
    }

    #[test]
    fn missing_property_indirection_falls_to_default() {
        let mut registry = ConfigRegistry::new();
        registry.set_subject(
            "p",
            &ElementStyle::new().size(BindingSource::property("no_such")),
        );
        let triples = vec![resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/b")];
        let (resolver, nodes) = project_with(&registry, &triples);

        let a = GraphItem::Node(&nodes[0]);
        let default: Mapping = Box::new(|_, _| Some(json!(30)));
        assert_eq!(
            resolver.resolve_with(BindingKey::Size, 0, &a, Some(&default)),
            Some(json!(30))
        );
    }

    #[test]
    fn computed_binding_receives_the_item() {
        let mut registry = ConfigRegistry::new();
        registry.set_subject(
            "p",
            &ElementStyle::new().text(BindingSource::compute(|item| {
                BindingValue::from(format!("<{}>", item.label()))
            })),
        );
        let triples = vec![resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/b")];
        let (resolver, nodes) = project_with(&registry, &triples);

        let a = GraphItem::Node(&nodes[0]);
        assert_eq!(resolver.resolve(BindingKey::Label, 0, &a), Some(json!("<a>")));
    }

    #[test]
    fn edge_wildcard_matches_any_edge() {
        let mut registry = ConfigRegistry::new();
        registry.set_edge(WILDCARD, &ElementStyle::new().color("grey"));
        let triples = vec![resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/b")];
        let projection = Projector::new(&registry).project(&triples);
        let resolver = Resolver::new(registry, projection.roles);

        let edge = GraphItem::Edge(&projection.model.edges[0]);
        assert_eq!(resolver.resolve(BindingKey::Color, 0, &edge), Some(json!("grey")));
    }

    #[test]
    fn edges_never_adopt_node_role_configuration() {
        let mut registry = ConfigRegistry::new();
        registry.set_object("p", &ElementStyle::new().color("red"));
        // The knows edge's label collides with a configured object's label.
        let triples = vec![
            resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/knows"),
            resource_triple("http://ex.org/x", "http://ex.org/knows", "http://ex.org/y"),
        ];
        let projection = Projector::new(&registry).project(&triples);
        let resolver = Resolver::new(registry, projection.roles);

        let edge = projection
            .model
            .edges
            .iter()
            .find(|e| e.label() == "knows")
            .expect("knows edge");
        assert_eq!(
            resolver.resolve(BindingKey::Color, 0, &GraphItem::Edge(edge)),
            None
        );
        // The knows *node* still resolves through its object role.
        let node = projection.model.node("http://ex.org/knows").expect("knows node");
        assert_eq!(
            resolver.resolve(BindingKey::Color, 0, &GraphItem::Node(node)),
            Some(json!("red"))
        );
    }

    #[test]
    fn nodes_never_consult_the_edge_registry() {
        let mut registry = ConfigRegistry::new();
        registry.set_edge(WILDCARD, &ElementStyle::new().color("grey"));
        let triples = vec![resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/b")];
        let (resolver, nodes) = project_with(&registry, &triples);

        let a = GraphItem::Node(&nodes[0]);
        assert_eq!(resolver.resolve(BindingKey::Color, 0, &a), None);
    }

    #[test]
    fn label_fallback_prefers_name_over_label() {
        let mut node = Node::new("n", "n");
        node.properties.insert("Name", "Ada");
        let resolver = Resolver::new(ConfigRegistry::new(), RoleLookup::default());
        let item = GraphItem::Node(&node);
        assert_eq!(resolver.resolve(BindingKey::Label, 0, &item), Some(json!("Ada")));
    }

    #[test]
    fn rule_parent_feeds_the_parent_key() {
        let mut parents = HashMap::new();
        parents.insert("child".to_owned(), "parent".to_owned());
        let resolver =
            Resolver::new(ConfigRegistry::new(), RoleLookup::default()).with_rule_parents(parents);
        let node = Node::new("child", "child");
        let item = GraphItem::Node(&node);
        assert_eq!(
            resolver.resolve(BindingKey::Parent, 0, &item),
            Some(json!("parent"))
        );
    }

    #[test]
    fn edge_accessor_is_reusable() {
        let mut registry = ConfigRegistry::new();
        registry.set_edge("p", &ElementStyle::new().thickness_factor(BindingSource::constant(2)));
        let triples = vec![
            resource_triple("http://ex.org/a", "http://ex.org/p", "http://ex.org/b"),
            resource_triple("http://ex.org/b", "http://ex.org/q", "http://ex.org/a"),
        ];
        let projection = Projector::new(&registry).project(&triples);
        let resolver = Resolver::new(registry, projection.roles);

        let accessor = resolver.accessor(
            BindingKey::ThicknessFactor,
            Some(Box::new(|_, _| Some(json!(1)))),
        );
        let configured = accessor(0, &GraphItem::Edge(&projection.model.edges[0]));
        let defaulted = accessor(1, &GraphItem::Edge(&projection.model.edges[1]));
        assert_eq!(configured, Some(json!(2)));
        assert_eq!(defaulted, Some(json!(1)));
    }

    #[test]
    fn unresolved_key_with_no_default_is_null() {
        let resolver = Resolver::new(ConfigRegistry::new(), RoleLookup::default());
        let node = Node::new("n", "n");
        assert_eq!(
            resolver.resolve(BindingKey::Heat, 0, &GraphItem::Node(&node)),
            None
        );
    }
}
