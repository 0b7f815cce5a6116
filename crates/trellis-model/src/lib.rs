// SPDX-License-Identifier: Apache-2.0
//! Pure data model for trellis: terms, triples, nodes, edges and the
//! label-extraction rule. No projection or binding logic lives here.

mod graph;
mod label;
mod term;

pub use graph::{Edge, GraphModel, Node, PropertyBag};
pub use label::extract_label;
pub use term::{Term, TermKind, Triple};

/// Reserved property key for the extracted display label.
pub const PROP_LABEL: &str = "label";
/// Reserved property key for the raw, unshortened term string.
pub const PROP_FULL_LABEL: &str = "full_label";
