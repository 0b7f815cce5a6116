// SPDX-License-Identifier: Apache-2.0
//! Caller-facing assembly: configuration surface, projection pipeline and
//! renderer accessors.

use std::fmt;

use tracing::debug;
use trellis_model::{Edge, GraphModel, Node, Term, Triple};

use crate::binding::{BindingKey, BindingValue, ElementStyle, GraphItem};
use crate::config::{ConfigRegistry, PredicateSelector};
use crate::error::TrellisError;
use crate::hierarchy::HierarchyBuilder;
use crate::ingest::triples_from_rows;
use crate::project::Projector;
use crate::query::enforce_result_cap;
use crate::resolve::{Mapping, Resolver};
use crate::schema::{project_schema, SchemaRows};

/// Default maximum number of result rows requested per query.
pub const DEFAULT_RESULT_CAP: u64 = 1_000;

/// Port to the external query transport.
///
/// Implementations own endpoint selection, authentication and result-format
/// negotiation; the core only hands them capped query text and expects
/// tabular term rows back. Retries, if any, live behind this seam.
pub trait TripleSource {
    /// Runs a query and returns its result rows.
    fn query(&self, query: &str) -> Result<Vec<Vec<Term>>, TrellisError>;
}

/// One projected, resolvable scene: the graph plus its binding resolver.
pub struct SceneModel {
    /// The projected (and hierarchy-rewritten) graph.
    pub model: GraphModel,
    resolver: Resolver,
}

impl SceneModel {
    /// The scene's binding resolver.
    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolves one node attribute.
    #[must_use]
    pub fn resolve_node(
        &self,
        key: BindingKey,
        index: usize,
        node: &Node,
        default: Option<&Mapping>,
    ) -> Option<BindingValue> {
        self.resolver
            .resolve_with(key, index, &GraphItem::Node(node), default)
    }

    /// Resolves one edge attribute.
    #[must_use]
    pub fn resolve_edge(
        &self,
        key: BindingKey,
        index: usize,
        edge: &Edge,
        default: Option<&Mapping>,
    ) -> Option<BindingValue> {
        self.resolver
            .resolve_with(key, index, &GraphItem::Edge(edge), default)
    }

    /// Accessor for a node attribute key, `(index, node) -> value | null`.
    pub fn node_accessor(
        &self,
        key: BindingKey,
        default: Option<Mapping>,
    ) -> impl Fn(usize, &Node) -> Option<BindingValue> + '_ {
        move |index, node| {
            self.resolver
                .resolve_with(key, index, &GraphItem::Node(node), default.as_ref())
        }
    }

    /// Accessor for an edge attribute key, `(index, edge) -> value | null`.
    pub fn edge_accessor(
        &self,
        key: BindingKey,
        default: Option<Mapping>,
    ) -> impl Fn(usize, &Edge) -> Option<BindingValue> + '_ {
        move |index, edge| {
            self.resolver
                .resolve_with(key, index, &GraphItem::Edge(edge), default.as_ref())
        }
    }

    /// Resolved parent id for a node, if grouping or a parent rule applies.
    #[must_use]
    pub fn parent_of(&self, index: usize, node: &Node) -> Option<String> {
        self.resolve_node(BindingKey::Parent, index, node, None)
            .and_then(|v| v.as_str().map(str::to_owned))
    }
}

impl fmt::Debug for SceneModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneModel")
            .field("nodes", &self.model.nodes.len())
            .field("edges", &self.model.edges.len())
            .finish_non_exhaustive()
    }
}

/// The caller-facing graph scene: owns the configuration registry, an
/// optional query transport, and the result cap.
///
/// Configuration may be mutated freely between projections; each call to
/// [`GraphScene::visualize`] snapshots it, so an in-flight scene never
/// observes later changes.
pub struct GraphScene {
    source: Option<Box<dyn TripleSource>>,
    registry: ConfigRegistry,
    result_cap: u64,
}

impl Default for GraphScene {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphScene {
    /// Creates a scene with no transport attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            registry: ConfigRegistry::new(),
            result_cap: DEFAULT_RESULT_CAP,
        }
    }

    /// Creates a scene over a query transport.
    #[must_use]
    pub fn with_source(source: Box<dyn TripleSource>) -> Self {
        Self {
            source: Some(source),
            ..Self::new()
        }
    }

    /// Attaches or replaces the query transport.
    pub fn set_source(&mut self, source: Box<dyn TripleSource>) {
        self.source = Some(source);
    }

    /// Sets the maximum number of result rows requested per query.
    pub fn set_result_cap(&mut self, cap: u64) {
        self.result_cap = cap;
    }

    /// The current result cap.
    #[must_use]
    pub fn result_cap(&self) -> u64 {
        self.result_cap
    }

    /// Shared view of the configuration registry.
    #[must_use]
    pub fn config(&self) -> &ConfigRegistry {
        &self.registry
    }

    /// Mutable access to the configuration registry.
    pub fn config_mut(&mut self) -> &mut ConfigRegistry {
        &mut self.registry
    }

    /// Configures subject-role rendering for the given predicate(s).
    pub fn add_subject_configuration(
        &mut self,
        predicates: impl Into<PredicateSelector>,
        style: &ElementStyle,
    ) {
        self.registry.set_subject(predicates, style);
    }

    /// Configures object-role rendering for the given predicate(s).
    pub fn add_object_configuration(
        &mut self,
        predicates: impl Into<PredicateSelector>,
        style: &ElementStyle,
    ) {
        self.registry.set_object(predicates, style);
    }

    /// Configures relationship rendering for the given predicate(s).
    pub fn add_predicate_configuration(
        &mut self,
        predicates: impl Into<PredicateSelector>,
        style: &ElementStyle,
    ) {
        self.registry.set_edge(predicates, style);
    }

    /// Flags a predicate as parent/child membership.
    pub fn add_parent_configuration(&mut self, predicate: impl Into<String>, reversed: bool) {
        self.registry.set_parent_rule(predicate, reversed);
    }

    /// Deletes subject-role configuration; `"*"` clears the role.
    pub fn del_subject_configuration(&mut self, predicates: impl Into<PredicateSelector>) {
        self.registry.delete_subject(predicates);
    }

    /// Deletes object-role configuration; `"*"` clears the role.
    pub fn del_object_configuration(&mut self, predicates: impl Into<PredicateSelector>) {
        self.registry.delete_object(predicates);
    }

    /// Deletes relationship configuration; `"*"` clears the role.
    pub fn del_predicate_configuration(&mut self, predicates: impl Into<PredicateSelector>) {
        self.registry.delete_edge(predicates);
    }

    /// Removes a parent/child membership flag.
    pub fn del_parent_configuration(&mut self, predicate: &str) {
        self.registry.delete_parent_rule(predicate);
    }

    /// Runs a query through the attached transport and projects the result.
    ///
    /// The query text passes through [`enforce_result_cap`] first.
    ///
    /// # Errors
    ///
    /// [`TrellisError::MissingDataSource`] when no transport is attached;
    /// transport and result-shape errors propagate.
    pub fn show_query(&self, query: &str) -> Result<SceneModel, TrellisError> {
        let source = self
            .source
            .as_deref()
            .ok_or(TrellisError::MissingDataSource)?;
        let capped = enforce_result_cap(query, self.result_cap);
        debug!(cap = self.result_cap, "dispatching capped query");
        let rows = source.query(&capped)?;
        self.visualize_rows(rows)
    }

    /// Projects already-fetched result rows.
    ///
    /// # Errors
    ///
    /// [`TrellisError::UnsupportedResultShape`] when a row does not carry
    /// exactly three terms.
    pub fn visualize_rows(
        &self,
        rows: impl IntoIterator<Item = Vec<Term>>,
    ) -> Result<SceneModel, TrellisError> {
        let triples = triples_from_rows(rows)?;
        Ok(self.visualize(&triples))
    }

    /// Projects an already-fetched triple sequence into a scene.
    ///
    /// Snapshot semantics: the registry is cloned here; mutating it
    /// afterwards does not affect the returned scene.
    #[must_use]
    pub fn visualize(&self, triples: &[Triple]) -> SceneModel {
        let projector = Projector::new(&self.registry);
        let projection = projector.project(triples);
        let mut model = projection.model;
        let hierarchy =
            HierarchyBuilder::new(projector.snapshot().clone(), projection.roles).build(&mut model);
        SceneModel {
            model,
            resolver: hierarchy.into_resolver(),
        }
    }

    /// Projects schema introspection rows into an overview graph.
    ///
    /// # Errors
    ///
    /// [`TrellisError::EmptySchema`] when nothing was discovered.
    pub fn schema_scene(&self, rows: &SchemaRows) -> Result<GraphModel, TrellisError> {
        project_schema(rows)
    }
}

impl fmt::Debug for GraphScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphScene")
            .field("has_source", &self.source.is_some())
            .field("result_cap", &self.result_cap)
            .finish_non_exhaustive()
    }
}
