// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions arising from invalid use of a [Graph](crate::Graph)
/// or a [GraphBuilder](crate::GraphBuilder).
///
/// Both variants signal a bug on the caller's side. A missing route is not an error;
/// [find_route](crate::find_route) reports it with an empty path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The referenced vertex doesn't exist (or was pruned).
    #[error("unknown vertex: {0}")]
    UnknownVertex(i64),

    /// Nearest-vertex search was attempted on a graph without vertices.
    #[error("graph has no vertices")]
    EmptyGraph,
}
