//! Configuration for the price predictor.
//!
//! This module provides [`PredictorConfig`] and its builder.
//!
//! # Example
//!
//! ```
//! use carprice_learning::PredictorConfig;
//!
//! let config = PredictorConfig::builder()
//!     .model_path("model/final_car_price_pipeline.json")
//!     .cache_model(false)
//!     .build()
//!     .expect("valid config");
//! ```

use crate::error::PredictionError;
use carprice_processing::NormalizerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the trained pipeline artifact lives unless told otherwise.
pub const DEFAULT_MODEL_PATH: &str = "model/final_car_price_pipeline.json";

/// Configuration for a [`Predictor`](crate::Predictor).
///
/// Use [`PredictorConfig::builder()`] to construct a configuration with the
/// builder pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Path to the JSON model artifact (default: `model/final_car_price_pipeline.json`).
    pub model_path: PathBuf,

    /// Whether to share loaded models through the process-wide cache (default: true).
    ///
    /// With caching disabled every predictor reads the artifact from disk.
    pub cache_model: bool,

    /// Settings for the normalizer that runs before inference.
    pub normalizer: NormalizerConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            cache_model: true,
            normalizer: NormalizerConfig::default(),
        }
    }
}

impl PredictorConfig {
    /// Create a new builder for `PredictorConfig`.
    #[must_use]
    pub fn builder() -> PredictorConfigBuilder {
        PredictorConfigBuilder::default()
    }
}

/// Builder for [`PredictorConfig`].
///
/// Created via [`PredictorConfig::builder()`]. All setters return `self` to
/// allow method chaining.
#[derive(Debug, Clone, Default)]
pub struct PredictorConfigBuilder {
    config: PredictorConfig,
}

impl PredictorConfigBuilder {
    /// Set the model artifact path.
    #[must_use]
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.model_path = path.into();
        self
    }

    /// Enable or disable the process-wide model cache (default: true).
    #[must_use]
    pub fn cache_model(mut self, cache: bool) -> Self {
        self.config.cache_model = cache;
        self
    }

    /// Set the normalizer configuration.
    #[must_use]
    pub fn normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.config.normalizer = normalizer;
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::InvalidConfig`] if:
    /// - `model_path` is empty
    /// - the normalizer configuration is invalid
    pub fn build(self) -> Result<PredictorConfig, PredictionError> {
        if self.config.model_path.as_os_str().is_empty() {
            return Err(PredictionError::InvalidConfig(
                "model_path must not be empty".to_string(),
            ));
        }

        self.config
            .normalizer
            .validate()
            .map_err(|e| PredictionError::InvalidConfig(e.to_string()))?;

        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = PredictorConfig::default();
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!(config.cache_model);
        assert_eq!(config.normalizer, NormalizerConfig::default());
    }

    #[test]
    fn test_builder() {
        let normalizer = NormalizerConfig::builder()
            .reference_year(2024)
            .build()
            .unwrap();
        let config = PredictorConfig::builder()
            .model_path("/tmp/model.json")
            .cache_model(false)
            .normalizer(normalizer.clone())
            .build()
            .unwrap();

        assert_eq!(config.model_path, PathBuf::from("/tmp/model.json"));
        assert!(!config.cache_model);
        assert_eq!(config.normalizer, normalizer);
    }

    #[test]
    fn test_empty_model_path() {
        let result = PredictorConfig::builder().model_path("").build();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("model_path"));
    }

    #[test]
    fn test_invalid_normalizer_is_rejected() {
        let normalizer = NormalizerConfig {
            match_threshold: 1.5,
            ..NormalizerConfig::default()
        };
        let result = PredictorConfig::builder().normalizer(normalizer).build();

        assert!(matches!(result, Err(PredictionError::InvalidConfig(_))));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: PredictorConfig =
            serde_json::from_str(r#"{"cache_model": false}"#).unwrap();

        assert!(!config.cache_model);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }
}
