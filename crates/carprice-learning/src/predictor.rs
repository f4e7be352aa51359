//! Batch price prediction: normalize, score, clamp.

use crate::cache::load_cached;
use crate::config::PredictorConfig;
use crate::error::{PredictionError, Result};
use crate::model::{RegressionModel, TrainedModel};
use carprice_processing::{
    CleaningSummary, Normalizer, RawCarRecord, ensure_non_empty, parse_batch, records_to_frame,
};
use polars::prelude::DataFrame;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Clamp a raw model output to a valid price.
///
/// Negative and NaN outputs become `0.0`.
#[inline]
pub fn clamp_price(raw: f64) -> f64 {
    raw.max(0.0)
}

/// Turns raw car records into non-negative price estimates.
///
/// The predictor owns a [`Normalizer`] and a shared handle to a
/// [`RegressionModel`]. Both are immutable, so a predictor can be used from
/// many threads at once.
///
/// # Example
///
/// ```rust,ignore
/// use carprice_learning::{Predictor, PredictorConfig};
/// use serde_json::json;
///
/// let predictor = Predictor::from_config(PredictorConfig::default())?;
/// let prices = predictor.predict_json(&json!([
///     {"Make": "Toyota", "Model": "Corolla", "Year": 2018, "Engine Size": 1.8,
///      "Mileage": 45000, "Fuel Type": "Petrol", "Transmission": "Automatic"}
/// ]))?;
/// ```
#[derive(Clone)]
pub struct Predictor {
    normalizer: Normalizer,
    model: Arc<dyn RegressionModel>,
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predictor")
            .field("normalizer", &self.normalizer)
            .field("feature_names", &self.model.feature_names())
            .finish()
    }
}

impl Predictor {
    /// Build a predictor from configuration, loading the model artifact.
    ///
    /// With `cache_model` set, the model comes from the process-wide cache.
    ///
    /// # Errors
    ///
    /// Returns the load error if the artifact is missing or invalid.
    pub fn from_config(config: PredictorConfig) -> Result<Self> {
        let model: Arc<TrainedModel> = if config.cache_model {
            load_cached(&config.model_path)?
        } else {
            Arc::new(TrainedModel::load(&config.model_path)?)
        };

        Ok(Self::with_model(Normalizer::new(config.normalizer)?, model))
    }

    /// Build a predictor around an already loaded model.
    pub fn with_model(normalizer: Normalizer, model: Arc<dyn RegressionModel>) -> Self {
        Self { normalizer, model }
    }

    /// The normalizer that runs before inference.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Names of the features the model reads.
    pub fn feature_names(&self) -> Vec<String> {
        self.model.feature_names()
    }

    /// Predict one price per record, in input order.
    ///
    /// # Errors
    ///
    /// - [`PredictionError::InvalidInput`] if `records` is empty
    /// - model errors if the normalized batch does not fit the model
    pub fn predict(&self, records: &[RawCarRecord]) -> Result<Vec<f64>> {
        self.predict_with_summary(records).map(|(prices, _)| prices)
    }

    /// Predict prices and report what the normalizer changed.
    pub fn predict_with_summary(
        &self,
        records: &[RawCarRecord],
    ) -> Result<(Vec<f64>, CleaningSummary)> {
        ensure_non_empty(records)?;

        let start = Instant::now();
        info!("Predicting prices for {} cars", records.len());

        let raw = records_to_frame(records)?;
        let (features, summary) = self.normalizer.normalize_with_summary(raw)?;
        let prices = self.predict_normalized(&features)?;

        info!(
            "Predicted {} prices in {:?}",
            prices.len(),
            start.elapsed()
        );

        Ok((prices, summary))
    }

    /// Predict prices for a JSON array of records.
    ///
    /// The top level is validated before any work: it must be a non-empty
    /// array of objects.
    pub fn predict_json(&self, cars: &Value) -> Result<Vec<f64>> {
        let records = parse_batch(cars)?;
        self.predict(&records)
    }

    /// Predict prices for a batch that is already in the model's feature
    /// schema. The normalizer does not run.
    ///
    /// # Errors
    ///
    /// - [`PredictionError::InvalidInput`] if the batch has no rows
    /// - [`PredictionError::InferenceError`] if the model returns the wrong
    ///   number of predictions
    pub fn predict_normalized(&self, features: &DataFrame) -> Result<Vec<f64>> {
        let rows = features.height();
        if rows == 0 {
            return Err(PredictionError::InvalidInput(
                "cars must be a non-empty list of records".to_string(),
            ));
        }

        let raw = self.model.predict_batch(features)?;
        if raw.len() != rows {
            return Err(PredictionError::InferenceError(format!(
                "model returned {} predictions for {} records",
                raw.len(),
                rows
            )));
        }

        let clamped = raw.iter().filter(|p| p.is_nan() || **p < 0.0).count();
        if clamped > 0 {
            debug!("Clamped {} negative predictions to 0.0", clamped);
        }

        Ok(raw.into_iter().map(clamp_price).collect())
    }
}

/// Predict prices for a JSON array of car records with the default model.
///
/// Uses [`PredictorConfig::default()`]: the artifact at
/// `model/final_car_price_pipeline.json`, loaded once per process.
///
/// # Errors
///
/// [`PredictionError::InvalidInput`] if `cars` is not a non-empty array of
/// objects; this is checked before the model is loaded.
pub fn predict_prices(cars: &Value) -> Result<Vec<f64>> {
    let records = parse_batch(cars)?;
    Predictor::from_config(PredictorConfig::default())?.predict(&records)
}
