use thiserror::Error;

use crate::graph::VertexId;

/// errors surfaced by the graph store and the instance readers
#[derive(Debug, Error)]
pub enum Error {
    /// malformed instance input; `line` is 1-based
    #[error("parse error (line {line}): {msg}")]
    Parse {
        /// 1-based offending line of the input
        line: usize,
        /// what went wrong on that line
        msg: String,
    },
    /// a vertex id out of range, or inactive where activity was required
    #[error("invalid vertex {0}")]
    InvalidVertex(VertexId),
    /// an edge-removal target was absent
    #[error("no edge between {0} and {1}")]
    NoEdge(VertexId, VertexId),
    /// underlying I/O failure while reading an instance
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;
