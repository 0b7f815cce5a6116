// SPDX-License-Identifier: Apache-2.0
//! Single-pass projection of a triple stream into the graph model.

use std::collections::HashMap;

use tracing::debug;
use trellis_model::{extract_label, Edge, GraphModel, Node, Triple};

use crate::config::ConfigRegistry;

/// Which configured predicate governs a node, recorded per role.
///
/// Keys are extracted node labels (what `item.properties.label` carries),
/// values are the governing predicate labels. Replaces the original's
/// re-querying of a local store: the roles are discovered during the same
/// pass that builds the graph.
#[derive(Debug, Clone, Default)]
pub struct RoleLookup {
    /// Node label -> predicate, for nodes seen as subjects of configured
    /// predicates.
    pub subjects: HashMap<String, String>,
    /// Node label -> predicate, for terms seen as objects of configured
    /// predicates.
    pub objects: HashMap<String, String>,
}

/// Output of one projection pass: the model plus the role lookups the
/// resolver and hierarchy builder consume.
#[derive(Debug, Clone)]
pub struct Projection {
    /// The deduplicated, first-seen-ordered graph.
    pub model: GraphModel,
    /// Role lookups recorded during the pass.
    pub roles: RoleLookup,
}

/// Projects ordered triple sequences into renderable graphs.
///
/// Holds a snapshot of the configuration registry taken at construction;
/// mutating the caller's registry afterwards does not affect this
/// projector.
#[derive(Debug, Clone)]
pub struct Projector {
    snapshot: ConfigRegistry,
}

impl Projector {
    /// Snapshots the registry and readies a projector.
    #[must_use]
    pub fn new(registry: &ConfigRegistry) -> Self {
        Self {
            snapshot: registry.clone(),
        }
    }

    /// The registry snapshot this projector was built from.
    #[must_use]
    pub fn snapshot(&self) -> &ConfigRegistry {
        &self.snapshot
    }

    /// Runs the single ordered pass over `triples`.
    ///
    /// Literal objects fold into the subject node's property bag keyed by
    /// the predicate's extracted label (last write wins); resource objects
    /// become nodes and produce edges. The seen-test is backed by a node-id
    /// hash index, never a linear scan. The returned model is an
    /// independent copy with no aliasing back into the registry.
    #[must_use]
    pub fn project(&self, triples: &[Triple]) -> Projection {
        let mut model = GraphModel::new();
        let mut roles = RoleLookup::default();
        // id -> position in model.nodes
        let mut seen: HashMap<String, usize> = HashMap::new();

        for triple in triples {
            let s_id = triple.subject.as_str();
            let o_id = triple.object.as_str();
            let literal = triple.object.is_literal();

            let p_label = extract_label(&triple.predicate, true);
            let o_label = extract_label(&triple.object, false);

            if let Some(&index) = seen.get(s_id) {
                if literal {
                    model.nodes[index].properties.insert(p_label.clone(), o_label.clone());
                }
            } else {
                let mut node = Node::new(s_id, extract_label(&triple.subject, false));
                if literal {
                    node.properties.insert(p_label.clone(), o_label.clone());
                }
                seen.insert(s_id.to_owned(), model.nodes.len());
                model.nodes.push(node);
            }

            if !literal {
                if !seen.contains_key(o_id) {
                    seen.insert(o_id.to_owned(), model.nodes.len());
                    model.nodes.push(Node::new(o_id, o_label.clone()));
                }
                model.edges.push(Edge::new(
                    s_id,
                    o_id,
                    p_label.clone(),
                    triple.predicate.as_str(),
                ));
            }

            if self.snapshot.has_subject(&p_label) {
                roles
                    .subjects
                    .insert(extract_label(&triple.subject, false), p_label.clone());
            }
            if self.snapshot.has_object(&p_label) {
                roles.objects.insert(o_label, p_label);
            }
        }

        debug!(
            nodes = model.nodes.len(),
            edges = model.edges.len(),
            triples = triples.len(),
            "projected triple stream"
        );
        Projection { model, roles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ElementStyle;
    use trellis_model::Term;

    fn triple(s: &str, p: &str, o: Term) -> Triple {
        Triple::new(Term::resource(s), Term::resource(p), o)
    }

    const A: &str = "http://ex.org/a";
    const B: &str = "http://ex.org/b";

    #[test]
    fn literals_fold_into_the_subject_node() {
        let projector = Projector::new(&ConfigRegistry::new());
        let triples = vec![
            triple(A, "http://ex.org/p1", Term::literal("x")),
            triple(A, "http://ex.org/p2", Term::literal("y")),
        ];
        let projection = projector.project(&triples);
        assert_eq!(projection.model.nodes.len(), 1);
        let node = &projection.model.nodes[0];
        assert_eq!(node.properties.get("p1"), Some("x"));
        assert_eq!(node.properties.get("p2"), Some("y"));
        assert!(projection.model.edges.is_empty());
    }

    #[test]
    fn repeated_terms_are_deduplicated() {
        let projector = Projector::new(&ConfigRegistry::new());
        let triples = vec![
            triple(A, "http://ex.org/p", Term::resource(B)),
            triple(A, "http://ex.org/q", Term::resource(B)),
        ];
        let projection = projector.project(&triples);
        assert_eq!(projection.model.nodes.len(), 2);
        assert_eq!(projection.model.edges.len(), 2);
        assert_eq!(projection.model.edges[0].start, A);
        assert_eq!(projection.model.edges[0].end, B);
    }

    #[test]
    fn later_literal_write_wins() {
        let projector = Projector::new(&ConfigRegistry::new());
        let triples = vec![
            triple(A, "http://ex.org/p", Term::literal("1")),
            triple(A, "http://ex.org/p", Term::literal("2")),
        ];
        let projection = projector.project(&triples);
        assert_eq!(projection.model.nodes.len(), 1);
        assert_eq!(projection.model.nodes[0].properties.get("p"), Some("2"));
    }

    #[test]
    fn node_order_is_first_seen() {
        let projector = Projector::new(&ConfigRegistry::new());
        let triples = vec![
            triple(B, "http://ex.org/p", Term::resource(A)),
            triple(A, "http://ex.org/p", Term::resource(B)),
        ];
        let projection = projector.project(&triples);
        let ids: Vec<&str> = projection.model.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![B, A]);
    }

    #[test]
    fn roles_record_configured_predicates_only() {
        let mut registry = ConfigRegistry::new();
        registry.set_object("p", &ElementStyle::new().color("red"));
        let projector = Projector::new(&registry);
        let triples = vec![
            triple(A, "http://ex.org/p", Term::resource(B)),
            triple(A, "http://ex.org/q", Term::resource(B)),
        ];
        let projection = projector.project(&triples);
        assert_eq!(projection.roles.objects.get("b").map(String::as_str), Some("p"));
        assert!(projection.roles.subjects.is_empty());
    }

    #[test]
    fn edge_ids_collide_by_design() {
        let projector = Projector::new(&ConfigRegistry::new());
        let triples = vec![
            triple(A, "http://ex.org/p", Term::resource(B)),
            triple(B, "http://ex.org/p", Term::resource(A)),
        ];
        let projection = projector.project(&triples);
        assert_eq!(projection.model.edges[0].id, projection.model.edges[1].id);
    }
}
