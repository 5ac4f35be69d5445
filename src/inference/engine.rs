//! FastBrain inference wrapper
//!
//! Loads a quantized GGUF model once and exposes a synchronous chat-completion
//! call. All tensor execution, tokenization, and sampling is delegated to
//! llama.cpp; this wrapper owns path resolution, conversation formatting, and
//! performance logging.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaChatMessage, LlamaModel, Special};
use llama_cpp_2::sampling::LlamaSampler;
use thiserror::Error;

use crate::inference::model::resolve_model_path;
use crate::storage::huggingface::format_size;
use crate::types::config::{BrainConfig, GenerateOptions};
use crate::types::message::Message;
use crate::types::model::ModelInfo;

/// Errors surfaced by the inference wrapper.
///
/// Everything except `ModelNotFound` is an engine failure passed through
/// unmodified; the wrapper never retries or falls back.
#[derive(Debug, Error)]
pub enum BrainError {
    #[error("model not found at {}: run the download_models binary first", path.display())]
    ModelNotFound { path: PathBuf },

    #[error(transparent)]
    Backend(#[from] llama_cpp_2::LLamaCppError),

    #[error(transparent)]
    ModelLoad(#[from] llama_cpp_2::LlamaModelLoadError),

    #[error(transparent)]
    ContextLoad(#[from] llama_cpp_2::LlamaContextLoadError),

    #[error(transparent)]
    ChatMessage(#[from] llama_cpp_2::NewLlamaChatMessageError),

    #[error(transparent)]
    ChatTemplate(#[from] llama_cpp_2::ChatTemplateError),

    #[error(transparent)]
    ApplyChatTemplate(#[from] llama_cpp_2::ApplyChatTemplateError),

    #[error(transparent)]
    Tokenize(#[from] llama_cpp_2::StringToTokenError),

    #[error(transparent)]
    Detokenize(#[from] llama_cpp_2::TokenToStringError),

    #[error(transparent)]
    BatchAdd(#[from] llama_cpp_2::llama_batch::BatchAddError),

    #[error(transparent)]
    Decode(#[from] llama_cpp_2::DecodeError),
}

/// Result of a single completion call. The wrapper returns only the text;
/// the token count feeds the throughput log.
struct Completion {
    text: String,
    completion_tokens: u32,
}

/// Fast local LLM brain with full GPU offload by default.
///
/// Loads the quantized GGUF model once at construction time and provides
/// [`FastBrain::generate_response`] for chat-style inference. There is no
/// reload or unload; dropping the instance releases the engine handles.
pub struct FastBrain {
    backend: LlamaBackend,
    model: LlamaModel,
    model_path: PathBuf,
    config: BrainConfig,
}

impl FastBrain {
    /// Load the model described by `config`.
    ///
    /// Fails with [`BrainError::ModelNotFound`] before touching the engine if
    /// the resolved model path does not exist on disk. The load itself is
    /// blocking and can take tens of seconds for multi-GB models.
    pub fn new(config: BrainConfig) -> Result<Self, BrainError> {
        let model_path = resolve_model_path(config.model_path.clone());

        if !model_path.exists() {
            return Err(BrainError::ModelNotFound { path: model_path });
        }

        if let Some(info) = ModelInfo::from_path(&model_path) {
            tracing::info!(
                "Loading Fast Brain model: {} ({})",
                info.name,
                format_size(info.size_bytes)
            );
        }

        let load_start = Instant::now();

        let mut backend = LlamaBackend::init()?;
        // Keep llama.cpp's own log chatter out of the operator's terminal.
        backend.void_logs();

        let model_params = LlamaModelParams::default().with_n_gpu_layers(config.gpu_layers);
        let model = LlamaModel::load_from_file(&backend, &model_path, &model_params)?;

        tracing::info!(
            "Fast Brain loaded in {:.2} seconds.",
            load_start.elapsed().as_secs_f64()
        );

        Ok(Self {
            backend,
            model,
            model_path,
            config,
        })
    }

    /// Path of the loaded model file.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Context window size the model was loaded with.
    pub fn context_size(&self) -> u32 {
        self.config.context_size
    }

    /// Generate a response to `user_input` with default options (registry
    /// system prompt, temperature 0.7, top-p 0.9, up to 1024 tokens).
    ///
    /// Blocking for the full duration of generation. Overlapping calls on the
    /// same instance from multiple threads are unsupported; callers wanting
    /// concurrency must serialize, or run each call on a dedicated worker
    /// (e.g. `tokio::task::spawn_blocking`).
    pub fn generate_response(&self, user_input: &str) -> Result<String, BrainError> {
        self.generate_with(user_input, &GenerateOptions::default())
    }

    /// Generate a response with explicit sampling options.
    ///
    /// Each call builds a fresh two-message conversation (system, user) and a
    /// fresh inference context; nothing carries over between calls.
    pub fn generate_with(
        &self,
        user_input: &str,
        opts: &GenerateOptions,
    ) -> Result<String, BrainError> {
        tracing::debug!(
            "Generating response for: {}...",
            preview(user_input, 80)
        );

        let conversation = build_conversation(&opts.system_prompt, user_input);
        let start = Instant::now();

        let completion = self.chat_completion(&conversation, opts)?;

        let elapsed = start.elapsed();
        tracing::info!(
            "Generated {} tokens in {:.2}s ({:.1} t/s)",
            completion.completion_tokens,
            elapsed.as_secs_f64(),
            tokens_per_second(completion.completion_tokens, elapsed)
        );

        Ok(completion.text)
    }

    /// Run one chat completion: apply the model's chat template, decode the
    /// prompt, then sample until end-of-generation or the token limit.
    fn chat_completion(
        &self,
        conversation: &[Message],
        opts: &GenerateOptions,
    ) -> Result<Completion, BrainError> {
        let chat = conversation
            .iter()
            .map(|m| LlamaChatMessage::new(m.role.as_str().to_string(), m.content.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        let template = self.model.chat_template(None)?;
        let prompt = self.model.apply_chat_template(&template, &chat, true)?;

        // The template emits the BOS token itself.
        let tokens = self.model.str_to_token(&prompt, AddBos::Never)?;

        let ctx_params = LlamaContextParams::default()
            .with_n_ctx(NonZeroU32::new(self.config.context_size))
            .with_n_batch(self.config.context_size);
        // Contexts are !Send and cheap relative to generation; one per call
        // keeps calls stateless.
        let mut ctx = self.model.new_context(&self.backend, ctx_params)?;

        let mut batch = LlamaBatch::new(self.config.context_size as usize, 1);
        let last_index = tokens.len() as i32 - 1;
        for (i, token) in (0_i32..).zip(tokens.iter()) {
            batch.add(*token, i, &[0], i == last_index)?;
        }
        ctx.decode(&mut batch)?;

        let mut sampler = LlamaSampler::chain_simple([
            LlamaSampler::top_p(opts.top_p, 1),
            LlamaSampler::temp(opts.temperature),
            LlamaSampler::dist(opts.seed),
        ]);

        let mut text = String::new();
        let mut completion_tokens: u32 = 0;
        let mut n_cur = batch.n_tokens();

        while completion_tokens < opts.max_tokens {
            let token = sampler.sample(&ctx, batch.n_tokens() - 1);
            sampler.accept(token);

            if self.model.is_eog_token(token) {
                break;
            }

            text.push_str(&self.model.token_to_str(token, Special::Tokenize)?);
            completion_tokens += 1;

            batch.clear();
            batch.add(token, n_cur, &[0], true)?;
            n_cur += 1;
            ctx.decode(&mut batch)?;
        }

        Ok(Completion {
            text,
            completion_tokens,
        })
    }
}

/// Build the ephemeral two-message conversation for one call.
fn build_conversation(system_prompt: &str, user_input: &str) -> Vec<Message> {
    vec![Message::system(system_prompt), Message::user(user_input)]
}

/// Completion tokens divided by wall-clock time; 0.0 when no time elapsed.
fn tokens_per_second(token_count: u32, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        token_count as f64 / secs
    } else {
        0.0
    }
}

/// First `max_chars` characters of `text`, safe on multi-byte input.
fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::message::Role;

    #[test]
    fn test_missing_model_never_loads() {
        let config = BrainConfig {
            model_path: Some(PathBuf::from("/nonexistent/dir/model.gguf")),
            ..BrainConfig::default()
        };

        let err = FastBrain::new(config).err().expect("construction must fail");
        match &err {
            BrainError::ModelNotFound { path } => {
                assert_eq!(path, &PathBuf::from("/nonexistent/dir/model.gguf"));
            }
            other => panic!("expected ModelNotFound, got {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/dir/model.gguf"));
        assert!(msg.contains("download_models"));
    }

    #[test]
    fn test_conversation_shape() {
        let turn = build_conversation("be terse", "hello");
        assert_eq!(turn.len(), 2);
        assert_eq!(turn[0].role, Role::System);
        assert_eq!(turn[0].content, "be terse");
        assert_eq!(turn[1].role, Role::User);
        assert_eq!(turn[1].content, "hello");
    }

    #[test]
    fn test_conversations_are_independent() {
        let first = build_conversation("sys", "first question");
        let second = build_conversation("sys", "second question");
        assert!(second.iter().all(|m| m.content != "first question"));
        assert_eq!(first[1].content, "first question");
    }

    #[test]
    fn test_tokens_per_second() {
        let tps = tokens_per_second(100, Duration::from_secs(2));
        assert!((tps - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tokens_per_second_zero_elapsed() {
        assert_eq!(tokens_per_second(100, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_preview_truncates_multibyte() {
        let text = "héllo wörld".repeat(20);
        let p = preview(&text, 80);
        assert_eq!(p.chars().count(), 80);
        assert!(text.starts_with(&p));
    }
}
