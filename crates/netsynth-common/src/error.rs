//! Error types for policy synthesis
//!
//! Only genuinely unrecoverable conditions surface as errors. Flows or units
//! that cannot contribute a rule are skipped, not reported, and structural
//! problems in policy files are collected by the validator instead of thrown.

use thiserror::Error;

/// Main error type for netsynth operations
#[derive(Debug, Error)]
pub enum Error {
    /// The flow input was empty, so there is nothing to learn from
    #[error("no flows provided")]
    NoFlowsProvided,

    /// A policy writer was handed an empty policy set
    #[error("no policies to write")]
    NoPolicies,

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being serialized (if known)
        kind: Option<String>,
    },

    /// Invalid caller-supplied value
    #[error("validation error: {message}")]
    Validation {
        /// Description of what's invalid
        message: String,
        /// The offending field or argument (e.g., "namespace")
        field: Option<String>,
    },

    /// Filesystem error while reading or writing an artifact
    #[error("io error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a serialization error with resource kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Create a validation error naming the offending field
    pub fn validation_for_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}
