//! Configuration types
//!
//! Model loading and text generation parameters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default model file, looked up relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "Llama-2-7b-chat-hf-GGUF-Q4_K_M.gguf";

/// Stop sequences that end an answer as soon as the model starts a new turn
pub const DEFAULT_STOP_SEQUENCES: [&str; 2] = ["### Human:", "### Assistant:"];

/// Options used to build the inference context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the GGUF file
    pub model_path: PathBuf,
    /// Context window size
    pub n_ctx: u32,
    /// Number of CPU threads used during generation
    pub n_threads: u32,
    /// Batch size for prompt processing
    pub n_batch: u32,
    /// Number of GPU layers to offload (0 = CPU only)
    pub n_gpu_layers: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            n_ctx: 2048,
            n_threads: 4,
            n_batch: 512,
            n_gpu_layers: 0,
        }
    }
}

/// Sampling parameters for a single completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum number of tokens in the answer
    pub max_tokens: u32,
    /// Sampling temperature (0 = greedy)
    pub temperature: f32,
    pub top_k: i32,
    pub top_p: f32,
    pub seed: u32,
    /// Literal strings that end generation early
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            seed: 0xFFFF_FFFF,
            stop: DEFAULT_STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_config() {
        let config = ModelConfig::default();
        assert_eq!(config.n_ctx, 2048);
        assert_eq!(config.n_threads, 4);
        assert_eq!(config.n_batch, 512);
        assert_eq!(config.n_gpu_layers, 0);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }

    #[test]
    fn test_default_generation_params() {
        let params = GenerationParams::default();
        assert_eq!(params.max_tokens, 200);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.stop, vec!["### Human:", "### Assistant:"]);
    }

    #[test]
    fn test_config_serialization() {
        let config = ModelConfig::default();
        let json = serde_json::to_string(&config).expect("Failed to serialize");
        let deserialized: ModelConfig = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(config, deserialized);
    }
}
