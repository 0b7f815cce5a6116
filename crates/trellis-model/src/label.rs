// SPDX-License-Identifier: Apache-2.0
//! Display-label extraction for URI-shaped terms.

use crate::term::Term;

/// Extracts a human-readable display label from a term.
///
/// Resources, and *any* term in edge role (predicates are shortened even if
/// literal-shaped), yield the fragment after the last `#`, else after the
/// last `/`, with a single trailing slash stripped first. Non-edge literals
/// are returned unchanged.
///
/// Empty output is valid (e.g. a bare `"#"` term); there are no error cases.
#[must_use]
pub fn extract_label(term: &Term, edge_role: bool) -> String {
    if term.is_literal() && !edge_role {
        return term.value.clone();
    }
    let trimmed = term.value.strip_suffix('/').unwrap_or(&term.value);
    let after_slash = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let after_hash = after_slash.rsplit('#').next().unwrap_or(after_slash);
    after_hash.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_wins_over_path() {
        let t = Term::resource("http://ex.org/foo#Bar");
        assert_eq!(extract_label(&t, false), "Bar");
    }

    #[test]
    fn path_tail_when_no_fragment() {
        let t = Term::resource("http://ex.org/a/b");
        assert_eq!(extract_label(&t, false), "b");
    }

    #[test]
    fn trailing_slash_is_stripped_first() {
        let t = Term::resource("http://ex.org/a/b/");
        assert_eq!(extract_label(&t, false), "b");
    }

    #[test]
    fn non_edge_literal_passes_through() {
        let t = Term::literal("http://ex.org/foo#Bar");
        assert_eq!(extract_label(&t, false), "http://ex.org/foo#Bar");
    }

    #[test]
    fn edge_role_shortens_even_literals() {
        let t = Term::literal("http://ex.org/foo#knows");
        assert_eq!(extract_label(&t, true), "knows");
    }

    #[test]
    fn degenerate_terms_yield_empty() {
        assert_eq!(extract_label(&Term::resource("#"), false), "");
        assert_eq!(extract_label(&Term::resource(""), false), "");
    }
}
