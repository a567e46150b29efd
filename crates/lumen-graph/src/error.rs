//! Error types for lumen-graph.

use thiserror::Error;

use crate::{EdgeTypes, PixelIndex};

/// Result type for graph construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a graph from a wiring description.
///
/// All of these are setup-time faults. A built [`Graph`](crate::Graph) never
/// produces an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An edge endpoint lies outside `0..vertex_count`.
    #[error("vertex {vertex} out of range for graph with {vertex_count} vertices")]
    VertexOutOfRange {
        vertex: PixelIndex,
        vertex_count: usize,
    },

    /// The wiring tried to connect a pixel to itself.
    #[error("self-loop at vertex {0}")]
    SelfLoop(PixelIndex),

    /// A transpose table entry must be exactly one tag.
    #[error("transpose entry for tag bit {bit} maps to {target:?}, expected a single tag")]
    TransposeNotSingleTag { bit: u32, target: EdgeTypes },

    /// Transposing twice must give back the original tag.
    #[error("transpose table is not an involution at tag bit {bit}")]
    TransposeNotInvolution { bit: u32 },

    /// A direction set holds at most four masks.
    #[error("direction set holds at most {max} masks, got {got}")]
    TooManyDirections { max: usize, got: usize },
}
