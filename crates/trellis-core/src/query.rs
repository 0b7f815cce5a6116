// SPDX-License-Identifier: Apache-2.0
//! Textual result-cap enforcement for outgoing queries.

use std::sync::OnceLock;

use regex::Regex;

// The pattern is a static literal; failing to compile it is unreachable.
#[allow(clippy::expect_used)]
fn limit_clause() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bLIMIT\s+(\d+)").expect("static limit pattern compiles")
    })
}

/// Caps the number of result rows a query may request.
///
/// A purely textual transform: an existing case-insensitive `LIMIT n`
/// clause with `n` above the cap is rewritten down to the cap; a clause at
/// or below the cap is left alone; a missing clause is appended. The query
/// is never otherwise parsed or validated.
#[must_use]
pub fn enforce_result_cap(query: &str, cap: u64) -> String {
    if let Some(captures) = limit_clause().captures(query) {
        let requested = captures
            .get(1)
            .and_then(|m| m.as_str().parse::<u64>().ok());
        match requested {
            // Unparseable (overflow-sized) limits are clamped too.
            Some(n) if n <= cap => query.to_owned(),
            _ => limit_clause()
                .replace(query, format!("LIMIT {cap}"))
                .into_owned(),
        }
    } else {
        format!("{query}\nLIMIT {cap}")
    }
}
