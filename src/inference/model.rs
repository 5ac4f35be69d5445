//! Model path resolution
//!
//! Computes the on-disk location of the quantized model artifact. Existence
//! is checked by the caller, not here.

use once_cell::sync::Lazy;
use std::path::PathBuf;

/// HuggingFace repository the default model is published in.
pub const DEFAULT_REPO_ID: &str = "bartowski/Meta-Llama-3.1-8B-Instruct-GGUF";

/// Filename of the default quantized model artifact.
pub const DEFAULT_MODEL_FILENAME: &str = "Meta-Llama-3.1-8B-Instruct-Q4_K_M.gguf";

/// Directory holding Fast Brain models, relative to the project root.
pub const MODEL_SUBDIR: &str = "models/fast_brain";

static DEFAULT_MODEL_PATH: Lazy<PathBuf> =
    Lazy::new(|| model_dir().join(DEFAULT_MODEL_FILENAME));

/// Project installation root.
///
/// The `FASTBRAIN_HOME` environment variable overrides it; otherwise the
/// current working directory is assumed to be the project root.
pub fn project_root() -> PathBuf {
    match std::env::var_os("FASTBRAIN_HOME") {
        Some(home) => PathBuf::from(home),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Directory where model files are stored.
pub fn model_dir() -> PathBuf {
    project_root().join(MODEL_SUBDIR)
}

/// Resolve an optional explicit model path, falling back to the default
/// models/fast_brain/ location.
pub fn resolve_model_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| DEFAULT_MODEL_PATH.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/custom.gguf");
        assert_eq!(resolve_model_path(Some(explicit.clone())), explicit);
    }

    #[test]
    fn test_default_path_layout() {
        let path = resolve_model_path(None);
        assert!(path.ends_with(
            Path::new(MODEL_SUBDIR).join(DEFAULT_MODEL_FILENAME)
        ));
    }

    #[test]
    fn test_model_dir_under_root() {
        assert!(model_dir().ends_with(MODEL_SUBDIR));
    }
}
