//! carprice-learning: used-car price inference.
//!
//! This crate scores batches of raw car records with a pre-trained regression
//! pipeline. Records are normalized by [`carprice_processing`], passed to the
//! model, and every prediction is clamped to a non-negative price.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use carprice_learning::predict_prices;
//! use serde_json::json;
//!
//! let prices = predict_prices(&json!([
//!     {"Make": "Toyota", "Model": "Corolla", "Year": 2018, "Engine Size": 1.8,
//!      "Mileage": 45000, "Fuel Type": "Petrol", "Transmission": "Automatic"},
//!     {"Make": "Honda", "Model": "Civic", "Year": 2017, "Engine Size": 2.0,
//!      "Mileage": 60000, "Fuel Type": "Petrol", "Transmission": "Manual"}
//! ]))?;
//! assert_eq!(prices.len(), 2);
//! ```
//!
//! # Architecture
//!
//! ```text
//! raw records ──► Normalizer ──► feature batch ──► RegressionModel ──► clamp ──► prices
//!                 (carprice-processing)             (TrainedModel)
//! ```
//!
//! # Model Persistence
//!
//! A trained pipeline is a JSON [`ModelArtifact`]. It is loaded from
//! `model/final_car_price_pipeline.json` unless [`PredictorConfig`] says
//! otherwise, and is cached per path for the lifetime of the process:
//!
//! ```rust,ignore
//! let model = TrainedModel::load("model/final_car_price_pipeline.json")?;
//! model.save("backup.json")?;
//!
//! let bytes = model.to_bytes()?;
//! let model = TrainedModel::from_bytes(&bytes)?;
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PredictionError>`]. An empty or
//! malformed batch is [`PredictionError::InvalidInput`] and is reported before
//! any work is done. Artifact and schema problems are fatal for the call.
//!
//! # Thread Safety
//!
//! Loaded models are immutable and shared through `Arc`; the cache lock is
//! never held during inference.

mod cache;
mod config;
mod error;
mod model;
mod predictor;
mod types;

// Re-export public API
//
// Configuration types
pub use config::{DEFAULT_MODEL_PATH, PredictorConfig, PredictorConfigBuilder};
// Error types
pub use error::{PredictionError, Result};
// Model types
pub use model::{RegressionModel, TrainedModel};
// Model cache
pub use cache::{cached_model_count, clear_model_cache, load_cached};
// Prediction
pub use predictor::{Predictor, clamp_price, predict_prices};
// Artifact and metadata types
pub use types::{
    ARTIFACT_FORMAT_VERSION, CategoricalFeature, CategoryWeight, Metrics, ModelArtifact,
    ModelInfo, NumericFeature,
};
