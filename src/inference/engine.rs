//! llama.cpp text generation
//!
//! Wraps a GGUF model loaded through `llama-cpp-2`. A fresh context is created
//! for every completion, so the model itself is only ever read.

use crate::inference::{
    Completion, CompletionChoice, FinishReason, InferenceError, LoadError, TextGenerator,
};
use crate::types::config::{GenerationParams, ModelConfig};
use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::context::LlamaContext;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel};
use llama_cpp_2::sampling::LlamaSampler;
use llama_cpp_2::token::LlamaToken;
use once_cell::sync::OnceCell;
use std::num::NonZeroU32;

/// Global llama.cpp backend (can only be initialized once)
static LLAMA_BACKEND: OnceCell<Result<LlamaBackend, String>> = OnceCell::new();

/// Largest byte length of a single token piece
const PIECE_BUFFER_SIZE: usize = 64;

fn get_backend() -> Result<&'static LlamaBackend, LoadError> {
    let result = LLAMA_BACKEND.get_or_init(|| {
        let mut backend = LlamaBackend::init().map_err(|e| e.to_string())?;
        backend.void_logs();
        Ok(backend)
    });
    result
        .as_ref()
        .map_err(|e| LoadError::Backend(e.clone()))
}

/// A loaded GGUF model with its fixed context options
pub struct LlamaEngine {
    model: LlamaModel,
    config: ModelConfig,
}

impl LlamaEngine {
    /// Load the model described by `config`
    ///
    /// The caller is expected to have checked that the file exists.
    pub fn load(config: &ModelConfig) -> Result<Self, LoadError> {
        let backend = get_backend()?;

        let model_params = LlamaModelParams::default().with_n_gpu_layers(config.n_gpu_layers);
        let model = LlamaModel::load_from_file(backend, &config.model_path, &model_params)
            .map_err(|e| LoadError::Model(e.to_string()))?;

        tracing::info!(
            "Model loaded: {} (n_ctx={}, threads={}, batch={}, gpu_layers={})",
            config.model_path.display(),
            config.n_ctx,
            config.n_threads,
            config.n_batch,
            config.n_gpu_layers
        );

        Ok(Self {
            model,
            config: config.clone(),
        })
    }

    fn context_params(&self) -> LlamaContextParams {
        let threads = i32::try_from(self.config.n_threads).unwrap_or(i32::MAX);
        LlamaContextParams::default()
            .with_n_ctx(NonZeroU32::new(self.config.n_ctx))
            .with_n_batch(self.config.n_batch)
            .with_n_threads(threads)
            .with_n_threads_batch(threads)
    }

    fn build_sampler(params: &GenerationParams) -> LlamaSampler {
        if params.temperature <= 0.0 {
            return LlamaSampler::greedy();
        }
        LlamaSampler::chain_simple([
            LlamaSampler::top_k(params.top_k),
            LlamaSampler::top_p(params.top_p, 1),
            LlamaSampler::temp(params.temperature),
            LlamaSampler::dist(params.seed),
        ])
    }

    /// Feed the prompt in chunks of `n_batch`, requesting logits for the last token only
    fn decode_prompt(
        &self,
        ctx: &mut LlamaContext,
        batch: &mut LlamaBatch,
        tokens: &[LlamaToken],
    ) -> Result<(), InferenceError> {
        let chunk_size = self.config.n_batch.max(1) as usize;
        let last_index = tokens.len().saturating_sub(1);

        for (chunk_index, chunk) in tokens.chunks(chunk_size).enumerate() {
            batch.clear();
            for (offset, token) in chunk.iter().enumerate() {
                let pos = chunk_index * chunk_size + offset;
                batch
                    .add(*token, pos as i32, &[0], pos == last_index)
                    .map_err(|e| InferenceError::Decode(e.to_string()))?;
            }
            ctx.decode(batch)
                .map_err(|e| InferenceError::Decode(e.to_string()))?;
        }
        Ok(())
    }
}

impl TextGenerator for LlamaEngine {
    #[tracing::instrument(skip_all, fields(prompt_len = prompt.len()))]
    fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Completion, InferenceError> {
        let backend = get_backend().map_err(|e| InferenceError::Context(e.to_string()))?;

        let tokens = self
            .model
            .str_to_token(prompt, AddBos::Always)
            .map_err(|e| InferenceError::Tokenize(e.to_string()))?;
        let budget = token_budget(tokens.len(), params.max_tokens, self.config.n_ctx)?;
        tracing::debug!("Prompt tokens: {}, budget: {}", tokens.len(), budget);

        let mut ctx = self
            .model
            .new_context(backend, self.context_params())
            .map_err(|e| InferenceError::Context(e.to_string()))?;

        let mut batch = LlamaBatch::new(self.config.n_batch.max(1) as usize, 1);
        self.decode_prompt(&mut ctx, &mut batch, &tokens)?;

        let mut sampler = Self::build_sampler(params);
        let mut output = Vec::<u8>::new();
        let mut n_cur = tokens.len();
        let mut generated = 0usize;
        let mut finish_reason = FinishReason::Length;
        let mut stop_at = None;

        while generated < budget {
            let token = sampler.sample(&ctx, batch.n_tokens() - 1);
            if self.model.is_eog_token(token) {
                finish_reason = FinishReason::Stop;
                break;
            }
            generated += 1;

            let piece = self
                .model
                .token_to_piece_bytes(token, PIECE_BUFFER_SIZE, false, None)
                .map_err(|e| InferenceError::Decode(e.to_string()))?;
            output.extend_from_slice(&piece);

            if let Some(index) = find_stop(&String::from_utf8_lossy(&output), &params.stop) {
                stop_at = Some(index);
                finish_reason = FinishReason::Stop;
                break;
            }

            batch.clear();
            batch
                .add(token, n_cur as i32, &[0], true)
                .map_err(|e| InferenceError::Decode(e.to_string()))?;
            ctx.decode(&mut batch)
                .map_err(|e| InferenceError::Decode(e.to_string()))?;
            n_cur += 1;
        }

        let mut text = String::from_utf8_lossy(&output).into_owned();
        if let Some(index) = stop_at {
            text.truncate(index);
        }

        tracing::debug!("Generated {} tokens ({:?})", generated, finish_reason);

        Ok(Completion {
            choices: vec![CompletionChoice {
                text,
                finish_reason,
            }],
            prompt_tokens: tokens.len(),
            completion_tokens: generated,
        })
    }
}

/// Number of tokens that may be generated after a prompt of `prompt_tokens`
pub fn token_budget(
    prompt_tokens: usize,
    max_tokens: u32,
    n_ctx: u32,
) -> Result<usize, InferenceError> {
    let n_ctx_tokens = n_ctx as usize;
    if prompt_tokens > n_ctx_tokens {
        return Err(InferenceError::ContextOverflow {
            prompt_tokens,
            n_ctx,
        });
    }
    Ok((max_tokens as usize).min(n_ctx_tokens - prompt_tokens))
}

/// Byte offset of the earliest stop sequence in `text`
pub fn find_stop(text: &str, stops: &[String]) -> Option<usize> {
    stops
        .iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| text.find(s.as_str()))
        .min()
}
