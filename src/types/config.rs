//! Configuration types
//!
//! Model loading and generation parameter structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::prompts::FAST_BRAIN_SYSTEM_PROMPT;

/// Offload every model layer to the GPU.
///
/// llama.cpp treats the saturated layer count as "all layers", the
/// equivalent of passing -1 through the C API.
pub const OFFLOAD_ALL_LAYERS: u32 = u32::MAX;

/// Let llama.cpp pick a random sampling seed.
pub const DEFAULT_SEED: u32 = u32::MAX;

/// Model loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainConfig {
    /// Path to the GGUF file. `None` uses the standard
    /// models/fast_brain/ location.
    pub model_path: Option<PathBuf>,
    /// Number of layers to offload to GPU (`OFFLOAD_ALL_LAYERS` = all)
    pub gpu_layers: u32,
    /// Context window size in tokens
    pub context_size: u32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            gpu_layers: OFFLOAD_ALL_LAYERS,
            context_size: 4096,
        }
    }
}

/// Generation parameters for a single completion call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// System prompt prepended to the conversation
    pub system_prompt: String,
    /// Sampling temperature (higher = more random)
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Sampling seed (`DEFAULT_SEED` lets the engine choose)
    pub seed: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            system_prompt: FAST_BRAIN_SYSTEM_PROMPT.to_string(),
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 1024,
            seed: DEFAULT_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_brain_config() {
        let config = BrainConfig::default();
        assert_eq!(config.context_size, 4096);
        assert_eq!(config.gpu_layers, OFFLOAD_ALL_LAYERS);
        assert!(config.model_path.is_none());
    }

    #[test]
    fn test_default_generate_options() {
        let opts = GenerateOptions::default();
        assert_eq!(opts.system_prompt, FAST_BRAIN_SYSTEM_PROMPT);
        assert_eq!(opts.temperature, 0.7);
        assert_eq!(opts.top_p, 0.9);
        assert_eq!(opts.max_tokens, 1024);
    }

    #[test]
    fn test_config_serialization() {
        let config = BrainConfig::default();
        let json = serde_json::to_string(&config).expect("Failed to serialize");
        let deserialized: BrainConfig =
            serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(config.context_size, deserialized.context_size);
    }
}
