//! The normalizer: raw car batch in, model-ready feature batch out.

use crate::cleaner::DataCleaner;
use crate::config::NormalizerConfig;
use crate::error::{Result, ResultExt};
use crate::features::engineer_features;
use crate::records::records_to_frame;
use crate::types::{CleaningSummary, RawCarRecord};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Runs categorical cleanup, numerical cleanup and feature engineering, in
/// that order, over a whole batch.
///
/// The normalizer holds no mutable state; one instance can serve any number
/// of batches, from any number of threads.
///
/// # Example
///
/// ```rust,ignore
/// use carprice_processing::{Normalizer, parse_batch};
/// use serde_json::json;
///
/// let records = parse_batch(&json!([
///     {"Make": "toyotta", "Model": "Corolla", "Year": 2018, "Mileage": 45000}
/// ]))?;
/// let features = Normalizer::default().normalize_records(&records)?;
/// // Make = "Toyota", Car Age = <current year - 2018>, Log Mileage ≈ 10.7144
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer, validating the configuration first.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::InvalidConfig`](crate::ProcessingError::InvalidConfig)
    /// if the configuration does not pass
    /// [`NormalizerConfig::validate`].
    pub fn new(config: NormalizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a batch of JSON records.
    pub fn normalize_records(&self, records: &[RawCarRecord]) -> Result<DataFrame> {
        let df = records_to_frame(records).context("building batch")?;
        self.normalize(df)
    }

    /// Normalize a raw batch.
    pub fn normalize(&self, df: DataFrame) -> Result<DataFrame> {
        self.normalize_with_summary(df).map(|(df, _)| df)
    }

    /// Normalize a raw batch and report what was changed.
    ///
    /// The current year is read once per batch; the `Year` range check and
    /// `Car Age` both use it.
    pub fn normalize_with_summary(&self, df: DataFrame) -> Result<(DataFrame, CleaningSummary)> {
        let start = Instant::now();
        let rows = df.height();
        let mut summary = CleaningSummary::new(rows);

        info!("Normalizing batch of {} records...", rows);

        let config = self.config.with_resolved_year();
        let cleaner = DataCleaner::new(&config);

        let (df, categorical) = cleaner.clean_categorical(df)?;
        categorical
            .into_iter()
            .for_each(|s| summary.add_column_summary(s));

        let (df, numerical) = cleaner.clean_numerical(df)?;
        numerical
            .into_iter()
            .for_each(|s| summary.add_column_summary(s));

        let (df, changes) = derive_features(df, config.current_year())?;
        summary.derived_columns = changes.derived;
        summary.dropped_columns = changes.dropped;

        debug_assert_eq!(df.height(), rows);

        info!(
            "Normalized {} records in {:?}: {} fallback categories, {} cells nulled",
            rows,
            start.elapsed(),
            summary.total_fallbacks(),
            summary.total_nulled()
        );

        Ok((df, summary))
    }

    /// Categorical cleanup stage on its own.
    pub fn clean_categorical(&self, df: DataFrame) -> Result<DataFrame> {
        DataCleaner::new(&self.config)
            .clean_categorical(df)
            .map(|(df, _)| df)
    }

    /// Numerical cleanup stage on its own.
    pub fn clean_numerical(&self, df: DataFrame) -> Result<DataFrame> {
        DataCleaner::new(&self.config)
            .clean_numerical(df)
            .map(|(df, _)| df)
    }

    /// Feature engineering stage on its own.
    pub fn engineer_features(
        &self,
        df: DataFrame,
    ) -> Result<(DataFrame, crate::features::FeatureChanges)> {
        derive_features(df, self.config.current_year())
    }
}

fn derive_features(
    df: DataFrame,
    current_year: i32,
) -> Result<(DataFrame, crate::features::FeatureChanges)> {
    debug!("Engineering features with reference year {}", current_year);
    engineer_features(df, current_year).context("feature engineering")
}
