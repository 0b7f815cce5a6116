// SPDX-License-Identifier: Apache-2.0
//! Group-node synthesis and parent/child edge rewriting.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use trellis_model::{GraphModel, Node};

use crate::binding::{BindingKey, BindingSource, BindingValue, GraphItem};
use crate::config::ConfigRegistry;
use crate::project::RoleLookup;
use crate::resolve::Resolver;

/// Prefix for synthesized container node ids.
pub const GROUP_NODE_PREFIX: &str = "GroupNode";

/// Synthetic node id for a group label.
pub(crate) fn group_node_id(label: &str) -> String {
    format!("{GROUP_NODE_PREFIX}{label}")
}

/// A derived group: its label, plus any leftover configuration fields from
/// a structured grouping bag.
pub(crate) struct GroupSpec {
    pub(crate) label: String,
    pub(crate) bag: Option<serde_json::Map<String, BindingValue>>,
}

/// Derives the group label a grouping binding assigns to an item.
///
/// Computed bindings are invoked with the item and their result is
/// interpreted as a value. A plain-string *constant* is probed as a
/// property name first and falls back to a literal label (the configured
/// string is caller-written text, so the probe is safe); computed results
/// and property indirections are data and taken as-is. Structured bags
/// yield their `text` field as the label, with the remaining fields kept
/// for re-registration.
pub(crate) fn derive_group_label(
    source: &BindingSource,
    item: &GraphItem<'_>,
) -> Option<GroupSpec> {
    match source {
        BindingSource::Computed(f) => spec_from_value(f(item)),
        BindingSource::PropertyRef(name) => {
            item.properties().get(name).map(|value| GroupSpec {
                label: value.to_owned(),
                bag: None,
            })
        }
        BindingSource::Constant(BindingValue::String(name)) => {
            let label = item
                .properties()
                .get(name)
                .map_or_else(|| name.clone(), str::to_owned);
            Some(GroupSpec { label, bag: None })
        }
        BindingSource::Constant(value) => spec_from_value(value.clone()),
    }
}

fn spec_from_value(value: BindingValue) -> Option<GroupSpec> {
    match value {
        BindingValue::Object(mut bag) => {
            let label = match bag.remove("text") {
                Some(BindingValue::String(s)) => s,
                Some(other) => other.to_string(),
                None => return None,
            };
            Some(GroupSpec {
                label,
                bag: Some(bag),
            })
        }
        BindingValue::String(label) => Some(GroupSpec { label, bag: None }),
        BindingValue::Null => None,
        other => Some(GroupSpec {
            label: other.to_string(),
            bag: None,
        }),
    }
}

/// Output of hierarchy building: the rewritten child/parent relation plus
/// the (possibly augmented) registry snapshot and role lookups the
/// resolver should run with.
#[derive(Debug)]
pub struct Hierarchy {
    parents: HashMap<String, String>,
    registry: ConfigRegistry,
    roles: RoleLookup,
}

impl Hierarchy {
    /// Recorded parent for a node id, if any rule matched.
    #[must_use]
    pub fn parent_of(&self, node_id: &str) -> Option<&str> {
        self.parents.get(node_id).map(String::as_str)
    }

    /// Builds the resolver for this scene, carrying the augmented snapshot,
    /// role lookups and the recorded rule parents.
    #[must_use]
    pub fn into_resolver(self) -> Resolver {
        Resolver::new(self.registry, self.roles).with_rule_parents(self.parents)
    }
}

/// Post-processes a projected model: synthesizes group nodes and rewrites
/// flagged edges into parent/child membership.
#[derive(Debug)]
pub struct HierarchyBuilder {
    registry: ConfigRegistry,
    roles: RoleLookup,
}

impl HierarchyBuilder {
    /// Creates a builder over the projection's snapshot and role lookups.
    #[must_use]
    pub fn new(registry: ConfigRegistry, roles: RoleLookup) -> Self {
        Self { registry, roles }
    }

    /// Runs both passes, mutating `model` in place.
    ///
    /// Group nodes are appended after all projected nodes; matched edges
    /// are removed by one wholesale swap of the edge collection.
    #[must_use]
    pub fn build(mut self, model: &mut GraphModel) -> Hierarchy {
        self.synthesize_groups(model);
        let parents = self.rewrite_parent_edges(model);
        Hierarchy {
            parents,
            registry: self.registry,
            roles: self.roles,
        }
    }

    /// Scans nodes for grouping configurations and appends one synthetic
    /// node per distinct derived label.
    fn synthesize_groups(&mut self, model: &mut GraphModel) {
        let mut labels: Vec<String> = Vec::new();
        let mut bags: Vec<(String, serde_json::Map<String, BindingValue>)> = Vec::new();

        for node in &model.nodes {
            let item = GraphItem::Node(node);
            let style = self
                .roles
                .objects
                .get(item.label())
                .and_then(|p| self.registry.object(p))
                .or_else(|| {
                    self.roles
                        .subjects
                        .get(item.label())
                        .and_then(|p| self.registry.subject(p))
                });
            let Some(source) = style.and_then(|s| s.get(BindingKey::Parent)) else {
                continue;
            };
            let Some(spec) = derive_group_label(source, &item) else {
                continue;
            };
            if !labels.contains(&spec.label) {
                labels.push(spec.label.clone());
            }
            if let Some(bag) = spec.bag {
                bags.push((spec.label, bag));
            }
        }

        // The synthesized group predicate becomes configurable itself, for
        // one level: the bag's leftover fields govern the group node.
        for (label, bag) in bags {
            let group_id = group_node_id(&label);
            let style = crate::binding::ElementStyle::from_bag(&bag);
            if !style.is_empty() {
                self.registry.set_subject(group_id.clone(), &style);
                self.roles.subjects.insert(label, group_id);
            }
        }

        let existing: HashSet<String> = model.nodes.iter().map(|n| n.id.clone()).collect();
        let mut appended = 0usize;
        for label in labels {
            let id = group_node_id(&label);
            if existing.contains(&id) {
                continue;
            }
            model.nodes.push(Node::new(id, label));
            appended += 1;
        }
        if appended > 0 {
            debug!(groups = appended, "synthesized group nodes");
        }
    }

    /// Applies parent rules: records child -> parent and drops matched
    /// edges in one atomic replacement.
    fn rewrite_parent_edges(&self, model: &mut GraphModel) -> HashMap<String, String> {
        let rules = self.registry.parent_rules();
        let mut parents = HashMap::new();
        if rules.is_empty() {
            return parents;
        }

        let edges = std::mem::take(&mut model.edges);
        let total = edges.len();
        let mut kept = Vec::with_capacity(total);
        for edge in edges {
            match rules.iter().find(|r| r.predicate == edge.label()) {
                Some(rule) => {
                    let (child, parent) = if rule.reversed {
                        (edge.end, edge.start)
                    } else {
                        (edge.start, edge.end)
                    };
                    parents.insert(child, parent);
                }
                None => kept.push(edge),
            }
        }
        let removed = total - kept.len();
        model.edges = kept;
        if removed > 0 {
            debug!(removed, "rewrote membership edges into parent/child links");
        }
        parents
    }
}
