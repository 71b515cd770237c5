//! Settings storage
//!
//! Loads the model and generation parameters from `settings.json` in the data
//! directory. The values are not editable from the UI.

use crate::storage::{get_data_dir, StorageError};
use crate::types::config::{GenerationParams, ModelConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the model path
pub const MODEL_PATH_ENV: &str = "PDFQA_MODEL_PATH";

/// Upper bounds for values read from `settings.json`
pub const MAX_CONTEXT: u32 = 131_072;
pub const MAX_THREADS: u32 = 256;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Inference context options
    #[serde(default)]
    pub model: ModelConfig,
    /// Sampling options for answers
    #[serde(default)]
    pub generation: GenerationParams,
}

impl AppSettings {
    /// Validate settings values
    ///
    /// Ensures all parameters are within acceptable ranges.
    pub fn validate(&mut self) {
        let defaults = ModelConfig::default();
        if self.model.n_ctx == 0 {
            self.model.n_ctx = defaults.n_ctx;
        }
        self.model.n_ctx = self.model.n_ctx.min(MAX_CONTEXT);
        if self.model.n_threads == 0 {
            self.model.n_threads = defaults.n_threads;
        }
        self.model.n_threads = self.model.n_threads.min(MAX_THREADS);
        if self.model.n_batch == 0 {
            self.model.n_batch = defaults.n_batch;
        }
        // A batch never needs to be larger than the context
        self.model.n_batch = self.model.n_batch.min(self.model.n_ctx);
        if self.model.model_path.as_os_str().is_empty() {
            self.model.model_path = defaults.model_path;
        }

        let generation = &mut self.generation;
        generation.temperature = generation.temperature.clamp(0.0, 2.0);
        generation.top_p = generation.top_p.clamp(0.0, 1.0);

        if generation.top_k <= 0 {
            generation.top_k = 40;
        }

        // Can't generate more than the context allows
        generation.max_tokens = generation.max_tokens.clamp(1, self.model.n_ctx);

        generation.stop.retain(|s| !s.is_empty());
    }

    /// Replace the model path when the override is set and non-empty
    pub fn with_model_path_override(mut self, value: Option<&str>) -> Self {
        if let Some(path) = value.map(str::trim).filter(|p| !p.is_empty()) {
            tracing::info!("Model path overridden by {}: {}", MODEL_PATH_ENV, path);
            self.model.model_path = PathBuf::from(path);
        }
        self
    }
}

/// Get the settings file path
fn get_settings_path() -> Result<PathBuf, StorageError> {
    Ok(get_data_dir()?.join("settings.json"))
}

/// Load settings from disk
///
/// Writes the defaults on first run so they can be edited by hand. Returns
/// default settings if the file is corrupted.
pub fn load_settings() -> AppSettings {
    let settings = match get_settings_path().and_then(|path| init_settings_at(&path)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            AppSettings::default()
        }
    };

    let env_path = std::env::var(MODEL_PATH_ENV).ok();
    settings.with_model_path_override(env_path.as_deref())
}

/// Load and validate settings from a specific file
pub fn load_settings_from(path: &Path) -> Result<AppSettings, StorageError> {
    if !path.exists() {
        tracing::info!("Settings file not found, using defaults");
        return Ok(AppSettings::default());
    }

    let json = fs::read_to_string(path)?;
    let mut settings: AppSettings = serde_json::from_str(&json)?;
    settings.validate();

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings from `path`, creating the file with defaults if it is missing
pub fn init_settings_at(path: &Path) -> Result<AppSettings, StorageError> {
    if path.exists() {
        return load_settings_from(path);
    }

    let settings = AppSettings::default();
    save_settings_to(path, &settings)?;
    tracing::info!("Wrote default settings to {}", path.display());
    Ok(settings)
}

/// Save settings to a specific file, creating parent directories
pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;

    tracing::debug!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.model.n_ctx, 2048);
        assert_eq!(settings.generation.max_tokens, 200);
        assert_eq!(settings.generation.temperature, 0.7);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = AppSettings::default();

        settings.generation.temperature = 5.0;
        settings.validate();
        assert_eq!(settings.generation.temperature, 2.0);

        settings.generation.temperature = -1.0;
        settings.validate();
        assert_eq!(settings.generation.temperature, 0.0);

        settings.generation.top_p = 2.0;
        settings.validate();
        assert_eq!(settings.generation.top_p, 1.0);

        settings.model.n_threads = 0;
        settings.validate();
        assert_eq!(settings.model.n_threads, 4);

        settings.generation.max_tokens = 100_000;
        settings.validate();
        assert_eq!(settings.generation.max_tokens, settings.model.n_ctx);
    }

    #[test]
    fn test_validation_bounds_threads_and_batch() {
        let mut settings = AppSettings::default();
        settings.model.n_threads = u32::MAX;
        settings.model.n_batch = u32::MAX;
        settings.model.n_ctx = u32::MAX;
        settings.validate();

        assert_eq!(settings.model.n_threads, MAX_THREADS);
        assert_eq!(settings.model.n_ctx, MAX_CONTEXT);
        assert_eq!(settings.model.n_batch, MAX_CONTEXT);

        settings.model.n_ctx = 1024;
        settings.validate();
        assert_eq!(settings.model.n_batch, 1024);
        assert!(i32::try_from(settings.model.n_threads).is_ok());
    }

    #[test]
    fn test_init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let first = init_settings_at(&path).unwrap();
        assert_eq!(first, AppSettings::default());
        assert!(path.is_file());

        let mut edited = first.clone();
        edited.generation.max_tokens = 64;
        save_settings_to(&path, &edited).unwrap();

        let second = init_settings_at(&path).unwrap();
        assert_eq!(second.generation.max_tokens, 64);
    }

    #[test]
    fn test_model_path_override() {
        let settings = AppSettings::default().with_model_path_override(Some("/models/x.gguf"));
        assert_eq!(settings.model.model_path, PathBuf::from("/models/x.gguf"));

        let untouched = AppSettings::default().with_model_path_override(Some("   "));
        assert_eq!(untouched.model.model_path, ModelConfig::default().model_path);

        let untouched = AppSettings::default().with_model_path_override(None);
        assert_eq!(untouched, AppSettings::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_settings_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(loaded, AppSettings::default());
    }

    #[test]
    fn test_settings_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = AppSettings::default();
        settings.model.n_threads = 8;
        settings.generation.temperature = 0.2;
        save_settings_to(&path, &settings).unwrap();

        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"generation": {"max_tokens": 64, "temperature": 0.1, "top_k": 10, "top_p": 0.5, "seed": 1, "stop": []}}"#).unwrap();

        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded.model, ModelConfig::default());
        assert_eq!(loaded.generation.max_tokens, 64);
        assert!(loaded.generation.stop.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_settings_from(&path), Err(StorageError::Json(_))));
    }
}
