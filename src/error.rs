//! Error handling for the cough screening pipeline.
//!
//! Extraction and inference failures are always returned as typed results at
//! the component boundary; nothing in this crate is allowed to panic its way
//! out of a long-lived serving process.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ScreenError>;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum ScreenError {
    // Extraction errors
    #[error("Failed to decode audio: {reason}")]
    DecodeError {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Signal too short: {samples} samples ({duration_secs:.3}s), need at least {min_samples}")]
    TooShort {
        samples: usize,
        duration_secs: f64,
        min_samples: usize,
    },

    // Inference errors
    #[error("Model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Invalid feature vector: expected {expected} finite values, got {reason}")]
    InvalidVectorShape { expected: usize, reason: String },

    // Dataset / training errors
    #[error("Required training source missing: {path}")]
    MissingSource { path: String },

    #[error("Malformed training table: {reason}")]
    MalformedTable { reason: String },

    #[error("Training requires at least two classes, found {found}")]
    SingleClass { found: usize },

    // I/O errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScreenError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ScreenError::DecodeError { .. } => "DECODE_ERROR",
            ScreenError::TooShort { .. } => "TOO_SHORT",
            ScreenError::ModelUnavailable { .. } => "MODEL_UNAVAILABLE",
            ScreenError::InvalidVectorShape { .. } => "INVALID_VECTOR_SHAPE",
            ScreenError::MissingSource { .. } => "MISSING_SOURCE",
            ScreenError::MalformedTable { .. } => "MALFORMED_TABLE",
            ScreenError::SingleClass { .. } => "SINGLE_CLASS",
            ScreenError::FileNotFound { .. } => "FILE_NOT_FOUND",
            ScreenError::Io(_) => "IO_ERROR",
            ScreenError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable by the caller retrying with
    /// different input (as opposed to a contract violation or a halted batch)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScreenError::DecodeError { .. }
                | ScreenError::TooShort { .. }
                | ScreenError::FileNotFound { .. }
        )
    }
}
