//! Error types for lumen-sim.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for the simulation driver.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up a simulation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("graph error: {0}")]
    Graph(#[from] lumen_graph::Error),

    #[error("flow error: {0}")]
    Flow(#[from] lumen_flow::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid flow config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("frame rate must be between 1 and {max}, got {got}")]
    FrameRate { max: u32, got: u32 },
}
