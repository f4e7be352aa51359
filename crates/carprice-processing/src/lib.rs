//! Used-car record normalization for price prediction.
//!
//! Raw car records arrive from people typing into forms: misspelled makes,
//! stray digits in model names, mileages written as text, years from the
//! future. This crate turns a batch of such records into the exact feature
//! schema the trained price model expects.
//!
//! # Overview
//!
//! The [`Normalizer`] runs three stages over a polars [`DataFrame`]:
//!
//! - **Categorical cleanup**: sanitize `Make`, `Model`, `Fuel Type` and
//!   `Transmission`, apply literal corrections, and fuzzy-match against the
//!   fixed [`vocabulary`]; unknown text becomes `"Other"`
//! - **Numerical cleanup**: coerce `Year`, `Engine Size` and `Mileage` to
//!   numbers and null out values outside their domain range
//! - **Feature engineering**: replace `Year` with `Car Age` and `Mileage` with
//!   `Log Mileage`
//!
//! A bad cell never fails a batch. It becomes null (to be imputed by the
//! model pipeline) or takes the fallback category.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use carprice_processing::{Normalizer, NormalizerConfig, parse_batch};
//! use serde_json::json;
//!
//! let records = parse_batch(&json!([{
//!     "Make": "Toyota", "Model": "Corolla", "Year": 2018, "Engine Size": 1.8,
//!     "Mileage": 45000, "Fuel Type": "Petrol", "Transmission": "Automatic"
//! }]))?;
//!
//! let normalizer = Normalizer::new(NormalizerConfig::builder().reference_year(2024).build()?)?;
//! let features = normalizer.normalize_records(&records)?;
//! // Make, Model, Engine Size, Fuel Type, Transmission, Car Age, Log Mileage
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod records;
pub mod types;
pub mod utils;
pub mod vocabulary;

// Re-exports for convenient access
pub use cleaner::{
    CategoryOutcome, DataCleaner, ValidRange, best_match, clean_category_value, resolve_category,
    sanitize_category, similarity_ratio, title_case, valid_range,
};
pub use config::{ConfigValidationError, NormalizerConfig, NormalizerConfigBuilder};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use features::{FeatureChanges, car_age, engineer_features, log_mileage};
pub use pipeline::Normalizer;
pub use records::{ensure_non_empty, parse_batch, records_to_frame};
pub use types::{CleaningSummary, ColumnKind, ColumnSummary, RawCarRecord};
pub use vocabulary::{ALLOWED_CATEGORIES, LITERAL_CORRECTIONS, allowed_values};
