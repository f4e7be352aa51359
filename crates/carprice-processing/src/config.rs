//! Configuration types for the normalization pipeline.
//!
//! The defaults reproduce the thresholds the trained price model was fitted
//! with. They are exposed so that tests can pin the reference year and so that
//! a retrained model with different bounds does not need a code change.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Minimum similarity ratio for a fuzzy match to be accepted.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Category assigned to text that matches no vocabulary entry.
pub const DEFAULT_FALLBACK_CATEGORY: &str = "Other";

/// Oldest model year accepted by numerical cleanup.
pub const DEFAULT_MIN_YEAR: i32 = 1925;

/// Largest plausible odometer reading.
pub const DEFAULT_MAX_MILEAGE: f64 = 600_000.0;

/// Largest plausible engine displacement, in litres.
pub const DEFAULT_MAX_ENGINE_SIZE: f64 = 6.0;

/// Label column, never touched by numerical cleanup.
pub const DEFAULT_TARGET_COLUMN: &str = "Price";

/// Configuration for the [`Normalizer`](crate::Normalizer).
///
/// Use [`NormalizerConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use carprice_processing::NormalizerConfig;
///
/// let config = NormalizerConfig::builder()
///     .match_threshold(0.85)
///     .reference_year(2024)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Minimum similarity ratio (0.0 - 1.0] for a fuzzy match.
    /// Default: 0.8
    pub match_threshold: f64,

    /// Replacement for categorical values that match nothing.
    /// Default: "Other"
    pub fallback_category: String,

    /// Oldest accepted `Year`, inclusive.
    /// Default: 1925
    pub min_year: i32,

    /// Year used as "now" for range checks and `Car Age`.
    /// If None, the current calendar year of the local clock is used.
    /// Default: None
    pub reference_year: Option<i32>,

    /// Largest accepted `Mileage`, inclusive. The lower bound is always 0.
    /// Default: 600000
    pub max_mileage: f64,

    /// Largest accepted `Engine Size`, inclusive. The lower bound is always 0.
    /// Default: 6.0
    pub max_engine_size: f64,

    /// Label column excluded from numerical cleanup.
    /// Default: "Price"
    pub target_column: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            fallback_category: DEFAULT_FALLBACK_CATEGORY.to_string(),
            min_year: DEFAULT_MIN_YEAR,
            reference_year: None,
            max_mileage: DEFAULT_MAX_MILEAGE,
            max_engine_size: DEFAULT_MAX_ENGINE_SIZE,
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
        }
    }
}

impl NormalizerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> NormalizerConfigBuilder {
        NormalizerConfigBuilder::default()
    }

    /// The year treated as "now": the pinned reference year, or the local calendar year.
    pub fn current_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// A copy of this configuration with the reference year pinned to
    /// [`current_year()`](Self::current_year), so that every stage of one
    /// batch sees the same year.
    pub fn with_resolved_year(&self) -> Self {
        Self {
            reference_year: Some(self.current_year()),
            ..self.clone()
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.match_threshold > 0.0 && self.match_threshold <= 1.0) {
            return Err(ConfigValidationError::InvalidThreshold(self.match_threshold));
        }

        if self.fallback_category.trim().is_empty() {
            return Err(ConfigValidationError::EmptyFallbackCategory);
        }

        let current_year = self.current_year();
        if self.min_year > current_year {
            return Err(ConfigValidationError::InvalidYearRange {
                min_year: self.min_year,
                current_year,
            });
        }

        if !self.max_mileage.is_finite() || self.max_mileage < 0.0 {
            return Err(ConfigValidationError::InvalidUpperBound {
                field: "max_mileage".to_string(),
                value: self.max_mileage,
            });
        }

        if !self.max_engine_size.is_finite() || self.max_engine_size < 0.0 {
            return Err(ConfigValidationError::InvalidUpperBound {
                field: "max_engine_size".to_string(),
                value: self.max_engine_size,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid match threshold: {0} (must be in (0.0, 1.0])")]
    InvalidThreshold(f64),

    #[error("Fallback category must not be empty")]
    EmptyFallbackCategory,

    #[error("Invalid year range: min_year {min_year} is after the current year {current_year}")]
    InvalidYearRange { min_year: i32, current_year: i32 },

    #[error("Invalid upper bound for '{field}': {value} (must be finite and non-negative)")]
    InvalidUpperBound { field: String, value: f64 },
}

impl From<ConfigValidationError> for crate::error::ProcessingError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ProcessingError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`NormalizerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct NormalizerConfigBuilder {
    match_threshold: Option<f64>,
    fallback_category: Option<String>,
    min_year: Option<i32>,
    reference_year: Option<i32>,
    max_mileage: Option<f64>,
    max_engine_size: Option<f64>,
    target_column: Option<String>,
}

impl NormalizerConfigBuilder {
    /// Set the minimum similarity ratio for fuzzy matches.
    pub fn match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = Some(threshold);
        self
    }

    /// Set the category used when no vocabulary entry is close enough.
    pub fn fallback_category(mut self, category: impl Into<String>) -> Self {
        self.fallback_category = Some(category.into());
        self
    }

    /// Set the oldest accepted model year.
    pub fn min_year(mut self, year: i32) -> Self {
        self.min_year = Some(year);
        self
    }

    /// Pin the year treated as "now".
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Set the largest accepted mileage.
    pub fn max_mileage(mut self, mileage: f64) -> Self {
        self.max_mileage = Some(mileage);
        self
    }

    /// Set the largest accepted engine size.
    pub fn max_engine_size(mut self, size: f64) -> Self {
        self.max_engine_size = Some(size);
        self
    }

    /// Set the label column excluded from numerical cleanup.
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `NormalizerConfig` or an error if validation fails.
    pub fn build(self) -> Result<NormalizerConfig, ConfigValidationError> {
        let config = NormalizerConfig {
            match_threshold: self.match_threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD),
            fallback_category: self
                .fallback_category
                .unwrap_or_else(|| DEFAULT_FALLBACK_CATEGORY.to_string()),
            min_year: self.min_year.unwrap_or(DEFAULT_MIN_YEAR),
            reference_year: self.reference_year,
            max_mileage: self.max_mileage.unwrap_or(DEFAULT_MAX_MILEAGE),
            max_engine_size: self.max_engine_size.unwrap_or(DEFAULT_MAX_ENGINE_SIZE),
            target_column: self
                .target_column
                .unwrap_or_else(|| DEFAULT_TARGET_COLUMN.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}
