// SPDX-License-Identifier: Apache-2.0
//! Projects schema introspection rows into an overview graph.

use std::collections::HashSet;

use trellis_model::{extract_label, Edge, GraphModel, Node, Term};

use crate::error::TrellisError;

/// One introspected property with its optional domain and range classes.
#[derive(Debug, Clone)]
pub struct PropertyRow {
    /// The property term.
    pub property: Term,
    /// Declared domain class, if any.
    pub domain: Option<Term>,
    /// Declared range class, if any.
    pub range: Option<Term>,
}

/// One observed or declared class-to-class connection.
#[derive(Debug, Clone)]
pub struct ConnectionRow {
    /// Source class.
    pub source: Term,
    /// Connecting property.
    pub property: Term,
    /// Target class.
    pub target: Term,
}

/// Already-fetched schema introspection results.
///
/// Running the introspection queries (and their row limits) is the query
/// transport's concern; the core only shapes the rows into a graph.
#[derive(Debug, Clone, Default)]
pub struct SchemaRows {
    /// Discovered classes.
    pub classes: Vec<Term>,
    /// Discovered properties with domain/range.
    pub properties: Vec<PropertyRow>,
    /// Discovered class connections.
    pub connections: Vec<ConnectionRow>,
}

/// Builds a schema overview graph from introspection rows.
///
/// Unlike data projection, schema nodes are identified by their extracted
/// label. A property with only a domain contributes a `domain` edge, only
/// a range a `range` edge; a property with both is covered by the
/// connection rows.
///
/// # Errors
///
/// [`TrellisError::EmptySchema`] when no nodes or no edges result — a
/// reportable, non-fatal condition distinct from a transport failure.
pub fn project_schema(rows: &SchemaRows) -> Result<GraphModel, TrellisError> {
    let mut model = GraphModel::new();
    let mut seen: HashSet<String> = HashSet::new();

    let mut add_node = |model: &mut GraphModel, term: &Term| {
        let label = extract_label(term, false);
        if !label.is_empty() && seen.insert(label.clone()) {
            model.nodes.push(Node::new(label.clone(), label));
        }
    };

    for class in &rows.classes {
        add_node(&mut model, class);
    }

    for row in &rows.properties {
        if row.domain.is_none() && row.range.is_none() {
            continue;
        }
        let p_label = extract_label(&row.property, false);
        if let Some(domain) = &row.domain {
            add_node(&mut model, domain);
        }
        if let Some(range) = &row.range {
            add_node(&mut model, range);
        }
        match (&row.domain, &row.range) {
            (Some(domain), None) => {
                let d_label = extract_label(domain, false);
                model.edges.push(Edge::new(d_label, p_label.clone(), "domain", "domain"));
                add_node(&mut model, &row.property);
            }
            (None, Some(range)) => {
                let r_label = extract_label(range, false);
                model.edges.push(Edge::new(p_label.clone(), r_label, "range", "range"));
                add_node(&mut model, &row.property);
            }
            // Both ends declared: the connection rows cover this property.
            _ => {}
        }
    }

    for connection in &rows.connections {
        add_node(&mut model, &connection.source);
        add_node(&mut model, &connection.target);
        model.edges.push(Edge::new(
            extract_label(&connection.source, false),
            extract_label(&connection.target, false),
            extract_label(&connection.property, true),
            connection.property.as_str(),
        ));
    }

    if model.nodes.is_empty() || model.edges.is_empty() {
        return Err(TrellisError::EmptySchema);
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn domain_only_property_gets_a_domain_edge() {
        let rows = SchemaRows {
            classes: vec![Term::resource("http://ex.org/Person")],
            properties: vec![PropertyRow {
                property: Term::resource("http://ex.org/name"),
                domain: Some(Term::resource("http://ex.org/Person")),
                range: None,
            }],
            connections: vec![],
        };
        let model = project_schema(&rows).expect("schema graph");
        assert!(model.node("Person").is_some());
        assert!(model.node("name").is_some());
        assert_eq!(model.edges.len(), 1);
        assert_eq!(model.edges[0].label(), "domain");
        assert_eq!(model.edges[0].start, "Person");
        assert_eq!(model.edges[0].end, "name");
    }

    #[test]
    fn connections_link_classes_by_property_label() {
        let rows = SchemaRows {
            classes: vec![],
            properties: vec![],
            connections: vec![ConnectionRow {
                source: Term::resource("http://ex.org/Person"),
                property: Term::resource("http://ex.org/worksAt"),
                target: Term::resource("http://ex.org/Company"),
            }],
        };
        let model = project_schema(&rows).expect("schema graph");
        assert_eq!(model.nodes.len(), 2);
        assert_eq!(model.edges[0].label(), "worksAt");
    }

    #[test]
    fn both_ends_declared_defers_to_connections() {
        let rows = SchemaRows {
            classes: vec![],
            properties: vec![PropertyRow {
                property: Term::resource("http://ex.org/worksAt"),
                domain: Some(Term::resource("http://ex.org/Person")),
                range: Some(Term::resource("http://ex.org/Company")),
            }],
            connections: vec![ConnectionRow {
                source: Term::resource("http://ex.org/Person"),
                property: Term::resource("http://ex.org/worksAt"),
                target: Term::resource("http://ex.org/Company"),
            }],
        };
        let model = project_schema(&rows).expect("schema graph");
        // Person, Company; the property itself is not a node here.
        assert_eq!(model.nodes.len(), 2);
        assert_eq!(model.edges.len(), 1);
    }

    #[test]
    fn empty_introspection_is_reportable() {
        let err = project_schema(&SchemaRows::default()).expect_err("no schema");
        assert!(matches!(err, TrellisError::EmptySchema));
    }

    #[test]
    fn classes_without_edges_are_still_empty_schema() {
        let rows = SchemaRows {
            classes: vec![Term::resource("http://ex.org/Person")],
            properties: vec![],
            connections: vec![],
        };
        assert!(matches!(
            project_schema(&rows),
            Err(TrellisError::EmptySchema)
        ));
    }
}
