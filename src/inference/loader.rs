//! Process-wide model cache
//!
//! The model is loaded at most once per process. A failed attempt is kept
//! as `ModelSlot::Failed` and is not retried until the cache is invalidated.

use crate::inference::{LlamaEngine, LoadError, TextGenerator};
use crate::types::config::ModelConfig;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared, immutable reference to a loaded model
pub type ModelHandle = Arc<dyn TextGenerator>;

/// Model cache shared by every window of the process
pub static MODEL_CACHE: Lazy<ModelCache> = Lazy::new(ModelCache::new);

/// State of the cached load attempt
#[derive(Clone)]
pub enum ModelSlot {
    NotAttempted,
    Loaded(ModelHandle),
    Failed(LoadError),
}

impl ModelSlot {
    pub fn handle(&self) -> Option<ModelHandle> {
        match self {
            ModelSlot::Loaded(handle) => Some(handle.clone()),
            _ => None,
        }
    }
}

impl fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSlot::NotAttempted => f.write_str("NotAttempted"),
            ModelSlot::Loaded(_) => f.write_str("Loaded"),
            ModelSlot::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

/// At-most-once model loader
pub struct ModelCache {
    slot: Mutex<ModelSlot>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(ModelSlot::NotAttempted),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModelSlot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached attempt, running `loader` only if nothing was attempted yet
    ///
    /// Callers arriving while a load is in flight wait for its result.
    pub fn get_or_load<F>(&self, loader: F) -> ModelSlot
    where
        F: FnOnce() -> Result<ModelHandle, LoadError>,
    {
        let mut slot = self.lock();
        if matches!(*slot, ModelSlot::NotAttempted) {
            *slot = match loader() {
                Ok(handle) => ModelSlot::Loaded(handle),
                Err(e) => {
                    tracing::error!("Model load failed: {}", e);
                    ModelSlot::Failed(e)
                }
            };
        }
        slot.clone()
    }

    /// Current state without triggering a load
    pub fn slot(&self) -> ModelSlot {
        self.lock().clone()
    }

    /// Forget the cached attempt so the next `get_or_load` loads again
    pub fn invalidate(&self) {
        tracing::info!("Model cache invalidated");
        *self.lock() = ModelSlot::NotAttempted;
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the model at `config.model_path`
///
/// A missing file is reported without touching llama.cpp.
pub fn load_model(config: &ModelConfig) -> Result<LlamaEngine, LoadError> {
    if !config.model_path.is_file() {
        tracing::error!("Model file not found at {}", config.model_path.display());
        return Err(LoadError::NotFound(config.model_path.clone()));
    }

    tracing::info!("Loading model from {}", config.model_path.display());
    LlamaEngine::load(config)
}

/// Load through the process-wide cache
pub fn load_cached(config: &ModelConfig) -> ModelSlot {
    MODEL_CACHE.get_or_load(|| load_model(config).map(|engine| Arc::new(engine) as ModelHandle))
}
