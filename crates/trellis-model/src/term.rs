// SPDX-License-Identifier: Apache-2.0
//! Terms and triples: the projector's only input.

use serde::{Deserialize, Serialize};

/// Discriminant between referenceable resources and terminal scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    /// A URI-like, referenceable identifier.
    Resource,
    /// A terminal scalar value (string, number, date, ...) carried as text.
    Literal,
}

/// One position of a triple: an opaque identifier or a literal value.
///
/// Equality is exact string identity (plus kind) within a session; no IRI
/// normalization is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Resource or literal.
    pub kind: TermKind,
    /// Raw string form of the term.
    pub value: String,
}

impl Term {
    /// Creates a resource (URI-like) term.
    pub fn resource(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Resource,
            value: value.into(),
        }
    }

    /// Creates a literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Literal,
            value: value.into(),
        }
    }

    /// Returns `true` when the term is a literal.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.kind == TermKind::Literal
    }

    /// Raw string form of the term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// A subject–predicate–object fact from the source data.
///
/// Ephemeral: triples exist only as projector input and are not retained in
/// the projected model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    /// Subject term (always treated as a node).
    pub subject: Term,
    /// Predicate term (always label-extracted in edge role).
    pub predicate: Term,
    /// Object term (folded as a property when literal, a node otherwise).
    pub object: Term,
}

impl Triple {
    /// Creates a triple from its three terms.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}
