//! System prompt definitions
//!
//! Centralised location for the default system prompts used by the inference
//! wrapper. Callers override per request via `GenerateOptions`.

/// Default system instruction for the Fast Brain model.
pub const FAST_BRAIN_SYSTEM_PROMPT: &str = "You are Fast Brain, a private, \
secure, local AI assistant. You are concise, helpful, and technical.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_non_empty() {
        assert!(!FAST_BRAIN_SYSTEM_PROMPT.trim().is_empty());
    }
}
