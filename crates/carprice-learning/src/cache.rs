//! Process-wide cache of loaded models.
//!
//! Reading and validating an artifact happens once per path; every later
//! request for the same path gets a clone of the same `Arc`. The lock is held
//! only for the lookup and the insert, never during inference.

use crate::error::Result;
use crate::model::TrainedModel;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

static MODEL_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<TrainedModel>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Load the model at `path`, reusing a previously loaded instance.
///
/// Failed loads are not cached; the next call tries again.
pub fn load_cached(path: impl AsRef<Path>) -> Result<Arc<TrainedModel>> {
    let path = path.as_ref();

    if let Some(model) = MODEL_CACHE.lock().get(path) {
        debug!("Model cache hit for {}", path.display());
        return Ok(Arc::clone(model));
    }

    let model = Arc::new(TrainedModel::load(path)?);

    // Another thread may have loaded the same path meanwhile; keep the first.
    let mut cache = MODEL_CACHE.lock();
    let cached = cache
        .entry(path.to_path_buf())
        .or_insert_with(|| Arc::clone(&model));
    Ok(Arc::clone(cached))
}

/// Drop every cached model.
///
/// Predictors that already hold a model keep using it.
pub fn clear_model_cache() {
    let mut cache = MODEL_CACHE.lock();
    debug!("Clearing {} cached models", cache.len());
    cache.clear();
}

/// Number of models currently cached.
pub fn cached_model_count() -> usize {
    MODEL_CACHE.lock().len()
}
