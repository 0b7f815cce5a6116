// SPDX-License-Identifier: Apache-2.0
//! Explicit configuration registry for per-predicate visual bindings.

use std::collections::HashMap;

use crate::binding::ElementStyle;

/// Reserved key meaning "clear the whole registry" on delete.
///
/// For the edge role only, a `"*"` entry additionally matches at
/// *resolution* time; subject and object resolution are always exact-match.
pub const WILDCARD: &str = "*";

/// One predicate id or a list; every registry operation accepts either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateSelector {
    /// A single predicate id.
    One(String),
    /// Several predicate ids, each configured independently.
    Many(Vec<String>),
}

impl PredicateSelector {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

impl From<&str> for PredicateSelector {
    fn from(id: &str) -> Self {
        Self::One(id.to_owned())
    }
}

impl From<String> for PredicateSelector {
    fn from(id: String) -> Self {
        Self::One(id)
    }
}

impl From<Vec<String>> for PredicateSelector {
    fn from(ids: Vec<String>) -> Self {
        Self::Many(ids)
    }
}

impl From<Vec<&str>> for PredicateSelector {
    fn from(ids: Vec<&str>) -> Self {
        Self::Many(ids.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for PredicateSelector {
    fn from(ids: &[&str]) -> Self {
        Self::Many(ids.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// Flags a relationship predicate as a parent/child membership edge.
///
/// `reversed = false` means the edge's `end` is the parent; `true` means
/// its `start` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRule {
    /// Predicate label the rule applies to.
    pub predicate: String,
    /// Whether parenthood points against edge direction.
    pub reversed: bool,
}

/// Caller-owned configuration for the three predicate roles plus parent
/// rules.
///
/// The caller mutates this between projections; the engine snapshots it at
/// projection time, so later mutation never changes an existing scene.
///
/// Predicate keys are matched against the predicate's *extracted* label
/// (`knows`, not `http://ex.org/p#knows`); callers keying by full URI will
/// not match.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    subject: HashMap<String, ElementStyle>,
    object: HashMap<String, ElementStyle>,
    edge: HashMap<String, ElementStyle>,
    parent_rules: Vec<ParentRule>,
}

impl ConfigRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures how subjects reached via the given predicate(s) render.
    ///
    /// Stores an owned snapshot of `style`; mutating the caller's value
    /// afterwards has no retroactive effect.
    pub fn set_subject(&mut self, predicates: impl Into<PredicateSelector>, style: &ElementStyle) {
        Self::set_role(&mut self.subject, predicates.into(), style);
    }

    /// Configures how objects reached via the given predicate(s) render.
    pub fn set_object(&mut self, predicates: impl Into<PredicateSelector>, style: &ElementStyle) {
        Self::set_role(&mut self.object, predicates.into(), style);
    }

    /// Configures how edges with the given predicate(s) render.
    pub fn set_edge(&mut self, predicates: impl Into<PredicateSelector>, style: &ElementStyle) {
        Self::set_role(&mut self.edge, predicates.into(), style);
    }

    /// Deletes subject-role configuration; `"*"` clears the whole role.
    pub fn delete_subject(&mut self, predicates: impl Into<PredicateSelector>) {
        Self::delete_role(&mut self.subject, predicates.into());
    }

    /// Deletes object-role configuration; `"*"` clears the whole role.
    pub fn delete_object(&mut self, predicates: impl Into<PredicateSelector>) {
        Self::delete_role(&mut self.object, predicates.into());
    }

    /// Deletes edge-role configuration; `"*"` clears the whole role.
    pub fn delete_edge(&mut self, predicates: impl Into<PredicateSelector>) {
        Self::delete_role(&mut self.edge, predicates.into());
    }

    /// Registers a parent/child rewrite rule for a predicate.
    ///
    /// Re-registering the same predicate overwrites its `reversed` flag:
    /// last registered wins, deterministically.
    pub fn set_parent_rule(&mut self, predicate: impl Into<String>, reversed: bool) {
        let predicate = predicate.into();
        if let Some(rule) = self
            .parent_rules
            .iter_mut()
            .find(|r| r.predicate == predicate)
        {
            rule.reversed = reversed;
        } else {
            self.parent_rules.push(ParentRule {
                predicate,
                reversed,
            });
        }
    }

    /// Removes the parent/child rule for a predicate, if any.
    pub fn delete_parent_rule(&mut self, predicate: &str) {
        self.parent_rules.retain(|r| r.predicate != predicate);
    }

    /// Subject-role lookup (exact match, no wildcard).
    #[must_use]
    pub fn subject(&self, predicate: &str) -> Option<&ElementStyle> {
        self.subject.get(predicate)
    }

    /// Object-role lookup (exact match, no wildcard).
    #[must_use]
    pub fn object(&self, predicate: &str) -> Option<&ElementStyle> {
        self.object.get(predicate)
    }

    /// Edge-role lookup: exact match first, then the `"*"` wildcard entry.
    #[must_use]
    pub fn edge(&self, predicate: &str) -> Option<&ElementStyle> {
        self.edge.get(predicate).or_else(|| self.edge.get(WILDCARD))
    }

    /// Returns `true` when the predicate governs the subject role.
    #[must_use]
    pub fn has_subject(&self, predicate: &str) -> bool {
        self.subject.contains_key(predicate)
    }

    /// Returns `true` when the predicate governs the object role.
    #[must_use]
    pub fn has_object(&self, predicate: &str) -> bool {
        self.object.contains_key(predicate)
    }

    /// Returns `true` when an edge entry (exact or wildcard) matches.
    #[must_use]
    pub fn has_edge(&self, predicate: &str) -> bool {
        self.edge.contains_key(predicate) || self.edge.contains_key(WILDCARD)
    }

    /// Registered parent/child rules, in registration order.
    #[must_use]
    pub fn parent_rules(&self) -> &[ParentRule] {
        &self.parent_rules
    }

    fn set_role(
        role: &mut HashMap<String, ElementStyle>,
        predicates: PredicateSelector,
        style: &ElementStyle,
    ) {
        for predicate in predicates.into_vec() {
            role.insert(predicate, style.clone());
        }
    }

    fn delete_role(role: &mut HashMap<String, ElementStyle>, predicates: PredicateSelector) {
        for predicate in predicates.into_vec() {
            if predicate == WILDCARD {
                role.clear();
            } else {
                role.remove(&predicate);
            }
        }
    }
}
