//! Error types for the Flare library.
//!
//! All errors are represented by the [`FlareError`] enum. The first five
//! variants are the validation failures of the classification pipeline; they
//! are fatal to the call that raised them and never leave fitted state
//! half-updated. The remaining variants cover loading, configuration and
//! text analysis.
//!
//! # Examples
//!
//! ```
//! use flare::error::{FlareError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FlareError::invalid_argument("validation_fraction must be in (0, 1)"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Flare operations.
#[derive(Error, Debug)]
pub enum FlareError {
    /// The training corpus was empty or produced no tokens after filtering.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// A vectorizer was used before `fit`.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Too few examples for the requested operation.
    #[error("Insufficient data: need at least {required} examples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A feature vector does not match the dimensionality it is used against.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Labels outside {0, 1}, or label sequences of inconsistent length.
    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV reading and writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Input data does not have the expected columns or shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid argument passed to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with FlareError.
pub type Result<T> = std::result::Result<T, FlareError>;

impl FlareError {
    /// Create a new empty corpus error.
    pub fn empty_corpus<S: Into<String>>(msg: S) -> Self {
        FlareError::EmptyCorpus(msg.into())
    }

    /// Create a new not fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        FlareError::NotFitted(msg.into())
    }

    /// Create a new insufficient data error.
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        FlareError::InsufficientData { required, actual }
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        FlareError::DimensionMismatch { expected, actual }
    }

    /// Create a new invalid label error.
    pub fn invalid_label<S: Into<String>>(msg: S) -> Self {
        FlareError::InvalidLabel(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        FlareError::Analysis(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        FlareError::Schema(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        FlareError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        FlareError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FlareError::Other(msg.into())
    }
}
