//! Error types for lumen-flow.

use lumen_graph::PixelIndex;
use thiserror::Error;

/// Result type for engine setup.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration faults detected when an engine is created or reconfigured.
///
/// Nothing in a running engine fails: a particle with nowhere to go simply
/// dies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The wiring or a direction set was malformed.
    #[error("graph error: {0}")]
    Graph(#[from] lumen_graph::Error),

    /// Speed is in pixels per second and must be positive.
    #[error("particle speed must be non-zero")]
    ZeroSpeed,

    /// Moves are timed in whole milliseconds, so at most one per millisecond.
    #[error("particle speed {got} exceeds {max} pixels per second")]
    SpeedTooHigh { max: u16, got: u16 },

    /// A spawn pixel lies outside the graph.
    #[error("spawn pixel {pixel} out of range for graph with {vertex_count} vertices")]
    SpawnPixelOutOfRange {
        pixel: PixelIndex,
        vertex_count: usize,
    },

    /// An allowed pixel lies outside the graph.
    #[error("allowed pixel {pixel} out of range for graph with {vertex_count} vertices")]
    AllowedPixelOutOfRange {
        pixel: PixelIndex,
        vertex_count: usize,
    },

    /// A spawn list was configured but holds no pixels.
    #[error("spawn pixel list is empty")]
    EmptySpawnPixels,

    /// There is nowhere to put a particle.
    #[error("graph has no vertices")]
    EmptyGraph,
}
