//! Trained model wrapper for inference and serialization.
//!
//! This module provides the [`RegressionModel`] trait, the seam between the
//! predictor and whatever turns a feature batch into numbers, and
//! [`TrainedModel`], the implementation backed by a JSON [`ModelArtifact`].
//!
//! # Lifecycle
//!
//! A `TrainedModel` is created in one of three ways:
//!
//! 1. **From disk**: [`TrainedModel::load()`]
//! 2. **From bytes**: [`TrainedModel::from_bytes()`], e.g. an artifact kept in a database
//! 3. **From memory**: [`TrainedModel::from_artifact()`]
//!
//! All three validate the artifact before returning.
//!
//! # Example
//!
//! ```rust,ignore
//! use carprice_learning::{RegressionModel, TrainedModel};
//!
//! let model = TrainedModel::load("model/final_car_price_pipeline.json")?;
//! println!("Features: {:?}", model.feature_names());
//!
//! let prices = model.predict_batch(&features)?;
//! ```
//!
//! # Thread Safety
//!
//! `TrainedModel` is immutable after construction and is `Send + Sync`, so a
//! single instance can be shared between threads through an `Arc`.

use crate::error::{PredictionError, Result};
use crate::types::{ARTIFACT_FORMAT_VERSION, ModelArtifact, ModelInfo};
use carprice_processing::utils::is_numeric_dtype;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// A regression model that scores a normalized feature batch.
///
/// Implementations return exactly one raw (unclamped) prediction per row, in
/// row order.
pub trait RegressionModel: Send + Sync {
    /// Predict one value per row of `features`.
    fn predict_batch(&self, features: &DataFrame) -> Result<Vec<f64>>;

    /// Names of the feature columns the model reads.
    fn feature_names(&self) -> Vec<String>;
}

/// A fitted linear price pipeline ready for inference.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    artifact: ModelArtifact,
}

static_assertions::assert_impl_all!(TrainedModel: Send, Sync);

impl TrainedModel {
    /// Loads a trained model from a JSON artifact file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist ([`PredictionError::ModelNotFound`])
    /// - The file cannot be read ([`PredictionError::Io`])
    /// - The file is not a valid artifact ([`PredictionError::InvalidArtifact`])
    #[must_use = "returns the loaded model; use it or handle the error"]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PredictionError::ModelNotFound {
                path: path.display().to_string(),
            });
        }

        let bytes = std::fs::read(path)?;
        let model = Self::from_bytes(&bytes)?;

        info!(
            "Loaded model '{}' from {} ({} features)",
            model.artifact.model_name,
            path.display(),
            model.feature_count()
        );

        Ok(model)
    }

    /// Loads a model from the bytes of a JSON artifact.
    #[must_use = "returns the loaded model; use it or handle the error"]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)
            .map_err(|e| PredictionError::InvalidArtifact(e.to_string()))?;
        Self::from_artifact(artifact)
    }

    /// Wraps an in-memory artifact after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::InvalidArtifact`] if:
    /// - `format_version` is not supported
    /// - a feature name appears twice
    /// - a numeric feature has a zero or non-finite scale
    /// - any parameter is NaN or infinite
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        validate_artifact(&artifact)?;
        Ok(Self { artifact })
    }

    /// Saves the model as a JSON artifact file.
    ///
    /// Parent directories must exist.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_bytes()?)?;
        debug!("Saved model to {}", path.as_ref().display());
        Ok(())
    }

    /// Exports the model as JSON artifact bytes.
    #[must_use = "returns serialized model bytes; use them or handle the error"]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.artifact)?)
    }

    /// The underlying artifact.
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Metadata about the model.
    pub fn get_info(&self) -> ModelInfo {
        ModelInfo {
            model_name: self.artifact.model_name.clone(),
            target_column: self.artifact.target_column.clone(),
            feature_names: self.artifact.feature_names(),
            metrics: self.artifact.metrics.clone(),
        }
    }

    fn feature_count(&self) -> usize {
        self.artifact.numeric_features.len() + self.artifact.categorical_features.len()
    }

    fn feature_column<'a>(&self, features: &'a DataFrame, name: &str) -> Result<&'a Series> {
        features
            .column(name)
            .map(Column::as_materialized_series)
            .map_err(|_| {
                PredictionError::SchemaMismatch(format!(
                    "feature column '{}' is missing from the batch",
                    name
                ))
            })
    }
}

impl RegressionModel for TrainedModel {
    fn predict_batch(&self, features: &DataFrame) -> Result<Vec<f64>> {
        let mut predictions = vec![self.artifact.intercept; features.height()];

        for feature in &self.artifact.numeric_features {
            let series = self.feature_column(features, &feature.name)?;
            if !is_numeric_dtype(series.dtype()) && series.dtype() != &DataType::Null {
                return Err(PredictionError::SchemaMismatch(format!(
                    "feature '{}' must be numeric, found {}",
                    feature.name,
                    series.dtype()
                )));
            }

            let values = series.cast(&DataType::Float64)?;
            for (prediction, value) in predictions.iter_mut().zip(values.f64()?.into_iter()) {
                let x = value
                    .filter(|v| v.is_finite())
                    .unwrap_or(feature.impute_value);
                *prediction += feature.coefficient * (x - feature.mean) / feature.scale;
            }
        }

        for feature in &self.artifact.categorical_features {
            let series = self.feature_column(features, &feature.name)?;
            let values = match series.dtype() {
                DataType::String => series.clone(),
                DataType::Null => series.cast(&DataType::String)?,
                other => {
                    return Err(PredictionError::SchemaMismatch(format!(
                        "feature '{}' must be text, found {}",
                        feature.name, other
                    )));
                }
            };

            for (prediction, value) in predictions.iter_mut().zip(values.str()?.into_iter()) {
                *prediction += feature.weight(value.unwrap_or(&feature.impute_value));
            }
        }

        debug!(
            "Scored {} rows with model '{}'",
            predictions.len(),
            self.artifact.model_name
        );

        Ok(predictions)
    }

    fn feature_names(&self) -> Vec<String> {
        self.artifact.feature_names()
    }
}

fn validate_artifact(artifact: &ModelArtifact) -> Result<()> {
    if artifact.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(PredictionError::InvalidArtifact(format!(
            "unsupported format_version {} (expected {})",
            artifact.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }

    if !artifact.intercept.is_finite() {
        return Err(PredictionError::InvalidArtifact(
            "intercept must be finite".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in artifact.feature_names() {
        if !seen.insert(name.clone()) {
            return Err(PredictionError::InvalidArtifact(format!(
                "feature '{}' is listed more than once",
                name
            )));
        }
    }

    for feature in &artifact.numeric_features {
        let params = [
            feature.impute_value,
            feature.mean,
            feature.scale,
            feature.coefficient,
        ];
        if params.iter().any(|p| !p.is_finite()) {
            return Err(PredictionError::InvalidArtifact(format!(
                "numeric feature '{}' has a non-finite parameter",
                feature.name
            )));
        }
        if feature.scale == 0.0 {
            return Err(PredictionError::InvalidArtifact(format!(
                "numeric feature '{}' has a zero scale",
                feature.name
            )));
        }
    }

    for feature in &artifact.categorical_features {
        if feature.categories.iter().any(|c| !c.coefficient.is_finite()) {
            return Err(PredictionError::InvalidArtifact(format!(
                "categorical feature '{}' has a non-finite coefficient",
                feature.name
            )));
        }
    }

    Ok(())
}
