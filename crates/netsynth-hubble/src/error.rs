//! Error types for reading and writing flow exports

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing Hubble flow files
#[derive(Debug, Error)]
pub enum HubbleError {
    /// The flow file could not be read
    #[error("failed to read flows file {}: {source}", path.display())]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The flow file could not be written
    #[error("failed to write flows file {}: {source}", path.display())]
    Write {
        /// File that was being written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A flow collection could not be encoded
    #[error("failed to encode flows: {0}")]
    Encode(#[from] serde_json::Error),

    /// Input was neither a batched collection nor NDJSON with any flow
    #[error("could not parse flows as a batched collection or NDJSON")]
    UnrecognizedFormat,
}

impl HubbleError {
    /// Create a read error for `path`
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for `path`
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for flow file operations
pub type Result<T> = std::result::Result<T, HubbleError>;
