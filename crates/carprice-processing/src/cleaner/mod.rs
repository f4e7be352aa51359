//! Cell-level cleaning of a raw car batch.
//!
//! This module provides:
//! - Categorical cleanup: sanitize free text, apply literal corrections, and
//!   reconcile against the vocabulary with fuzzy matching
//! - Numerical cleanup: coerce to numbers and null out values outside the
//!   domain range
//!
//! Neither stage ever fails because of a bad cell: such cells become null or
//! take the fallback category.

mod categorical;
mod fuzzy;
mod numerical;

pub use categorical::{
    CategoryOutcome, clean_category_value, resolve_category, sanitize_category, title_case,
};
pub use fuzzy::{best_match, similarity_ratio};
pub use numerical::{ValidRange, valid_range};

use crate::config::NormalizerConfig;
use crate::error::{Result, ResultExt};
use crate::types::ColumnSummary;
use polars::prelude::*;
use tracing::info;

/// Data cleaner for the categorical and numerical stages.
pub struct DataCleaner<'a> {
    config: &'a NormalizerConfig,
}

impl<'a> DataCleaner<'a> {
    pub fn new(config: &'a NormalizerConfig) -> Self {
        Self { config }
    }

    /// Reconcile every vocabulary column against its allowed values.
    pub fn clean_categorical(&self, df: DataFrame) -> Result<(DataFrame, Vec<ColumnSummary>)> {
        info!("Cleaning categorical columns...");
        categorical::clean_categorical_columns(df, self.config).context("categorical cleanup")
    }

    /// Coerce and range-check every numerical column.
    pub fn clean_numerical(&self, df: DataFrame) -> Result<(DataFrame, Vec<ColumnSummary>)> {
        info!("Cleaning numerical columns...");
        numerical::clean_numerical_columns(df, self.config).context("numerical cleanup")
    }
}
