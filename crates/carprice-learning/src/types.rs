//! Model artifact format and model metadata.
//!
//! A trained price pipeline is stored as a JSON document that mirrors a
//! fitted scikit-learn style pipeline: per-feature imputation, standard
//! scaling for numeric features, one-hot encoding for categorical features,
//! and a linear model on top.
//!
//! # Overview
//!
//! - [`ModelArtifact`]: the serialized pipeline
//! - [`NumericFeature`] / [`CategoricalFeature`]: fitted parameters per input column
//! - [`Metrics`]: evaluation metrics recorded at training time
//! - [`ModelInfo`]: metadata returned by [`TrainedModel::get_info()`](crate::TrainedModel::get_info)
//!
//! # Example
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "model_name": "linear_regression",
//!   "target_column": "Price",
//!   "intercept": 14250.0,
//!   "numeric_features": [
//!     {"name": "Car Age", "impute_value": 6.0, "mean": 6.0, "scale": 3.5, "coefficient": -1800.0}
//!   ],
//!   "categorical_features": [
//!     {"name": "Make", "impute_value": "Toyota", "categories": [{"value": "BMW", "coefficient": 5200.0}]}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// The only artifact layout this crate reads and writes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// A fitted linear regression pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Layout version; must equal [`ARTIFACT_FORMAT_VERSION`].
    pub format_version: u32,

    /// Name of the estimator (e.g. "linear_regression", "ridge").
    pub model_name: String,

    /// Name of the column the model was trained to predict.
    pub target_column: String,

    /// Prediction for an input where every scaled feature is zero and every
    /// category is the reference level.
    pub intercept: f64,

    /// Numeric inputs, imputed then standard-scaled.
    #[serde(default)]
    pub numeric_features: Vec<NumericFeature>,

    /// Categorical inputs, imputed then one-hot encoded.
    #[serde(default)]
    pub categorical_features: Vec<CategoricalFeature>,

    /// Metrics recorded on the held-out set at training time.
    #[serde(default)]
    pub metrics: Metrics,
}

impl ModelArtifact {
    /// Names of all input features, numeric first, in artifact order.
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric_features
            .iter()
            .map(|f| f.name.clone())
            .chain(self.categorical_features.iter().map(|f| f.name.clone()))
            .collect()
    }
}

/// Fitted parameters of one numeric input column.
///
/// Contribution to the prediction: `coefficient * (x - mean) / scale`, with
/// `x = impute_value` when the cell is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericFeature {
    pub name: String,
    /// Median (or mean) of the training column.
    pub impute_value: f64,
    pub mean: f64,
    /// Standard deviation of the training column. Never zero.
    pub scale: f64,
    pub coefficient: f64,
}

/// Fitted parameters of one categorical input column.
///
/// Contribution to the prediction: the coefficient of the matching category,
/// or zero for a category that was not seen in training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub name: String,
    /// Most frequent training value, used when the cell is null.
    pub impute_value: String,
    pub categories: Vec<CategoryWeight>,
}

impl CategoricalFeature {
    /// Coefficient for `value`, zero if the value was never seen in training.
    pub fn weight(&self, value: &str) -> f64 {
        self.categories
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.coefficient)
            .unwrap_or(0.0)
    }
}

/// One-hot coefficient for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub value: String,
    pub coefficient: f64,
}

/// Regression metrics from model evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// R-squared score (coefficient of determination).
    ///
    /// Range: (-∞, 1.0], where 1.0 is perfect.
    pub r2: Option<f64>,

    /// Root Mean Squared Error, in the units of the target.
    pub rmse: Option<f64>,

    /// Mean Absolute Error, in the units of the target.
    pub mae: Option<f64>,
}

/// Information about a trained model.
///
/// Returned by [`TrainedModel::get_info()`](crate::TrainedModel::get_info).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ModelInfo {
    /// Name of the estimator.
    pub model_name: String,

    /// Name of the target column used during training.
    pub target_column: String,

    /// Names of the feature columns the model reads.
    ///
    /// When making predictions, the feature batch must contain these columns.
    pub feature_names: Vec<String>,

    /// Metrics achieved during training.
    pub metrics: Metrics,
}
