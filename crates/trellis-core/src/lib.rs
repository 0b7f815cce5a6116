// SPDX-License-Identifier: Apache-2.0
//! trellis-core: binding-resolution and graph-projection engine.
//!
//! The engine turns an ordered triple stream into a renderer-ready graph
//! model and wraps every visual attribute the renderer reads in a
//! declarative resolution chain (configured constant, property indirection,
//! caller function, renderer default). Query transport and rendering are
//! external collaborators behind narrow seams.

mod binding;
mod config;
mod error;
mod hierarchy;
mod ingest;
mod project;
mod query;
mod resolve;
mod scene;
mod schema;

pub use binding::{
    BindingKey, BindingSource, BindingValue, ComputeFn, ElementStyle, GraphItem, EDGE_BINDINGS,
    NODE_BINDINGS,
};
pub use config::{ConfigRegistry, ParentRule, PredicateSelector, WILDCARD};
pub use error::TrellisError;
pub use hierarchy::{Hierarchy, HierarchyBuilder, GROUP_NODE_PREFIX};
pub use ingest::triples_from_rows;
pub use project::{Projection, Projector, RoleLookup};
pub use query::enforce_result_cap;
pub use resolve::{Mapping, Resolver};
pub use scene::{GraphScene, SceneModel, TripleSource, DEFAULT_RESULT_CAP};
pub use schema::{project_schema, ConnectionRow, PropertyRow, SchemaRows};
