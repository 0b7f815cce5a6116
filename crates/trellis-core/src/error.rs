// SPDX-License-Identifier: Apache-2.0
//! Engine error taxonomy.

use thiserror::Error;

/// Errors surfaced by the projection engine.
///
/// Everything else — malformed caller-supplied binding functions, transport
/// failures — propagates unmodified from whoever raised it; the core never
/// retries.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// The result rows do not iterate as subject/predicate/object triples.
    ///
    /// Detected structurally (row arity), never by inspecting query syntax.
    #[error("only Select, Describe and Construct query results can be visualized (row {row} has {arity} terms, expected 3)")]
    UnsupportedResultShape {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of terms the row actually carried.
        arity: usize,
    },

    /// Schema introspection discovered no classes or properties.
    ///
    /// Reportable and non-fatal; distinct from a transport failure.
    #[error("no schema data found")]
    EmptySchema,

    /// No data source has been configured at all.
    ///
    /// A precondition failure, reported immediately rather than deferred
    /// into the projector.
    #[error("no data source configured")]
    MissingDataSource,

    /// The query transport reported a failure.
    ///
    /// Carried opaquely; retries belong to the transport, not the core.
    #[error("query transport error: {0}")]
    Transport(String),
}
