// SPDX-License-Identifier: Apache-2.0
//! Structural boundary from query-result rows into triples.

use trellis_model::{Term, Triple};

use crate::error::TrellisError;

/// Converts tabular result rows into triples.
///
/// Each row must carry exactly three terms (subject, predicate, object);
/// anything else means the caller ran a query form that does not produce
/// triples and cannot be visualized.
///
/// # Errors
///
/// [`TrellisError::UnsupportedResultShape`] on the first row whose arity is
/// not three.
pub fn triples_from_rows(
    rows: impl IntoIterator<Item = Vec<Term>>,
) -> Result<Vec<Triple>, TrellisError> {
    let mut triples = Vec::new();
    for (row, mut terms) in rows.into_iter().enumerate() {
        if terms.len() != 3 {
            return Err(TrellisError::UnsupportedResultShape {
                row,
                arity: terms.len(),
            });
        }
        let object = terms.pop().unwrap_or_else(|| Term::literal(""));
        let predicate = terms.pop().unwrap_or_else(|| Term::literal(""));
        let subject = terms.pop().unwrap_or_else(|| Term::literal(""));
        triples.push(Triple::new(subject, predicate, object));
    }
    Ok(triples)
}
