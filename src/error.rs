use std::path::PathBuf;
use thiserror::Error;

/// The main error type for topopack operations.
#[derive(Debug, Error)]
pub enum TopoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// A geometry kind this engine cannot export (configuration error).
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometryType(String),

    /// A remap table assigned a retained arc a larger index than it had,
    /// or an arc reference pointed outside the table.
    #[error("Arc index problem: arc {arc} remapped to {remapped:?}")]
    ArcIndexProblem { arc: usize, remapped: Option<usize> },

    /// Export options that cannot produce a usable grid.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
