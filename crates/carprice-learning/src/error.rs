//! Error types for the carprice-learning crate.
//!
//! This module defines [`PredictionError`], the error type returned by every
//! fallible operation in the crate.
//!
//! # Error Handling
//!
//! Errors fall into two groups:
//! - **Caller errors**: [`InvalidInput`](PredictionError::InvalidInput) for an
//!   empty or malformed batch, [`InvalidConfig`](PredictionError::InvalidConfig)
//!   for a bad configuration
//! - **Model errors**: the artifact is missing, unreadable or does not fit the
//!   feature batch. These are fatal for the call and are never retried.
//!
//! Malformed individual cells are not errors; the normalizer degrades them.
//!
//! # Example
//!
//! ```rust,ignore
//! use carprice_learning::{PredictionError, predict_prices};
//! use serde_json::json;
//!
//! match predict_prices(&json!([])) {
//!     Err(PredictionError::InvalidInput(msg)) => eprintln!("bad batch: {msg}"),
//!     Err(other) => eprintln!("[{}] {other}", other.error_code()),
//!     Ok(prices) => println!("{prices:?}"),
//! }
//! ```

use carprice_processing::ProcessingError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for carprice-learning operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PredictionError {
    /// The batch is empty or is not a sequence of attribute mappings.
    ///
    /// Raised before any cleaning or inference work starts.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration provided to the predictor.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The model artifact was not found at the configured path.
    #[error("Model not found: {path}")]
    ModelNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The model artifact could be read but does not describe a usable model.
    ///
    /// Common causes:
    /// - Unsupported `format_version`
    /// - A numeric feature with a zero or non-finite scale
    /// - The same feature listed twice
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// The feature batch does not match the model's input schema.
    ///
    /// A feature the model needs is missing from the batch, or has a dtype the
    /// model cannot read.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// An error occurred while computing predictions.
    #[error("Inference error: {0}")]
    InferenceError(String),

    /// The normalizer failed on a batch-level problem.
    #[error("Processing error: {0}")]
    Processing(ProcessingError),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading or writing a model artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PredictionError {
    /// Stable error code for callers that dispatch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ModelNotFound { .. } => "MODEL_NOT_FOUND",
            Self::InvalidArtifact(_) => "INVALID_ARTIFACT",
            Self::SchemaMismatch(_) => "SCHEMA_MISMATCH",
            Self::InferenceError(_) => "INFERENCE_ERROR",
            Self::Processing(inner) => inner.error_code(),
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// True for errors caused by the caller's batch rather than the model.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

// A malformed batch is reported the same way whichever crate detected it.
impl From<ProcessingError> for PredictionError {
    fn from(err: ProcessingError) -> Self {
        if err.is_invalid_input() {
            PredictionError::InvalidInput(match err {
                ProcessingError::InvalidInput(msg) => msg,
                other => other.to_string(),
            })
        } else {
            PredictionError::Processing(err)
        }
    }
}

impl Serialize for PredictionError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PredictionError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for prediction operations.
pub type Result<T> = std::result::Result<T, PredictionError>;
