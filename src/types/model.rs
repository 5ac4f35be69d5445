//! Model types
//!
//! Defines model metadata structures.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Information about a model file on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Display name of the model
    pub name: String,
    /// Path to the GGUF file
    pub path: String,
    /// Model size in bytes
    pub size_bytes: u64,
}

impl ModelInfo {
    /// Build model metadata from a file path. Returns `None` if the file
    /// cannot be stat'ed.
    pub fn from_path(path: &Path) -> Option<Self> {
        let metadata = std::fs::metadata(path).ok()?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        Some(Self {
            name,
            path: path.display().to_string(),
            size_bytes: metadata.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_model_info_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny-model.Q4_K_M.gguf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"GGUF").unwrap();

        let info = ModelInfo::from_path(&path).unwrap();
        assert_eq!(info.name, "tiny-model.Q4_K_M");
        assert_eq!(info.size_bytes, 4);
    }

    #[test]
    fn test_model_info_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.gguf");
        assert!(ModelInfo::from_path(&path).is_none());
    }
}
