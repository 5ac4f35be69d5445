//! HuggingFace model downloader
//!
//! Downloads GGUF model files from HuggingFace Hub. Safe to re-run: an
//! existing non-empty file is returned without any network traffic.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Log a progress line every this many downloaded bytes.
const PROGRESS_STEP: u64 = 256 * 1024 * 1024;

/// Errors raised while fetching a model artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid model filename {0:?}")]
    InvalidFilename(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("could not determine file size from response headers")]
    MissingContentLength,

    #[error("download incomplete: got {got} bytes, expected {expected}")]
    SizeMismatch { got: u64, expected: u64 },

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the resolve URL for a file on HuggingFace Hub.
fn download_url(repo_id: &str, filename: &str) -> String {
    format!("https://huggingface.co/{repo_id}/resolve/main/{filename}")
}

/// Flatten a repo-relative filename into a safe local filename.
fn sanitize_local_filename(filename: &str) -> Result<String, DownloadError> {
    let trimmed = filename.trim();
    if trimmed.is_empty() {
        return Err(DownloadError::InvalidFilename(filename.to_string()));
    }

    let no_query = trimmed.split('?').next().unwrap_or(trimmed);
    let no_fragment = no_query.split('#').next().unwrap_or(no_query);
    let no_leading = no_fragment.trim_start_matches('/');

    let flattened = no_leading.replace('\\', "/").replace('/', "__");

    let mut sanitized = String::with_capacity(flattened.len());
    for ch in flattened.chars() {
        let invalid = matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*');
        if invalid || ch.is_control() {
            sanitized.push('_');
        } else {
            sanitized.push(ch);
        }
    }

    while sanitized.ends_with('.') || sanitized.ends_with(' ') {
        sanitized.pop();
    }

    if sanitized.is_empty() {
        return Err(DownloadError::InvalidFilename(filename.to_string()));
    }

    Ok(sanitized)
}

/// Download `filename` from the HuggingFace repo `repo_id` into `dest_dir`.
///
/// Idempotent: if the target file already exists with content, its path is
/// returned immediately. The transfer streams into a `.tmp` sibling and is
/// renamed into place only after the byte count matches Content-Length, so a
/// killed download never leaves a truncated model behind.
pub async fn download_model(
    repo_id: &str,
    filename: &str,
    dest_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let safe_filename = sanitize_local_filename(filename)?;

    let output_path = dest_dir.join(&safe_filename);
    let temp_path = dest_dir.join(format!("{safe_filename}.tmp"));

    if output_path.exists() {
        let metadata = fs::metadata(&output_path)?;
        if metadata.len() > 0 {
            tracing::info!("Model already exists: {}", output_path.display());
            return Ok(output_path);
        }
    }

    fs::create_dir_all(dest_dir)?;

    let url = download_url(repo_id, filename);
    tracing::info!("Downloading from: {url}");

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(3600)) // 1 hour timeout for large models
        .build()?;

    let mut response = client
        .get(&url)
        .header(
            "User-Agent",
            concat!("fastbrain/", env!("CARGO_PKG_VERSION")),
        )
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DownloadError::Status(response.status()));
    }

    let total_size = response
        .content_length()
        .ok_or(DownloadError::MissingContentLength)?;
    tracing::info!(
        "File size: {}. This may take a while.",
        format_size(total_size)
    );

    let mut temp_file = File::create(&temp_path).await?;
    let mut downloaded: u64 = 0;
    let mut last_progress_step: u64 = 0;

    while let Some(chunk) = response.chunk().await? {
        temp_file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        let step = downloaded / PROGRESS_STEP;
        if step > last_progress_step {
            last_progress_step = step;
            tracing::info!(
                "Downloaded {} / {}",
                format_size(downloaded),
                format_size(total_size)
            );
        }
    }
    temp_file.flush().await?;

    if downloaded != total_size {
        return Err(DownloadError::SizeMismatch {
            got: downloaded,
            expected: total_size,
        });
    }

    // Atomic publish of the completed file.
    fs::rename(&temp_path, &output_path)?;

    tracing::info!("Download complete: {}", output_path.display());

    Ok(output_path)
}

/// Get a human-readable size string
pub fn format_size(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes < 1024.0 {
        format!("{} B", bytes as u64)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else if bytes < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} MB", bytes / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url() {
        assert_eq!(
            download_url("TheBloke/Llama-2-7B-GGUF", "llama-2-7b.Q4_K_M.gguf"),
            "https://huggingface.co/TheBloke/Llama-2-7B-GGUF/resolve/main/llama-2-7b.Q4_K_M.gguf"
        );
    }

    #[test]
    fn test_sanitize_plain_filename() {
        assert_eq!(
            sanitize_local_filename("model.Q4_K_M.gguf").unwrap(),
            "model.Q4_K_M.gguf"
        );
    }

    #[test]
    fn test_sanitize_flattens_subdirectories() {
        assert_eq!(
            sanitize_local_filename("quants/model.gguf").unwrap(),
            "quants__model.gguf"
        );
    }

    #[test]
    fn test_sanitize_strips_query_and_reserved_chars() {
        assert_eq!(
            sanitize_local_filename("model.gguf?download=true").unwrap(),
            "model.gguf"
        );
        assert_eq!(sanitize_local_filename("a<b>c.gguf").unwrap(), "a_b_c.gguf");
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(sanitize_local_filename("   ").is_err());
        assert!(sanitize_local_filename("...").is_err());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[tokio::test]
    async fn test_existing_file_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.gguf");
        fs::write(&path, b"GGUF").unwrap();

        // The repo does not exist; an existing file must short-circuit before
        // any network access.
        let first = download_model("no-such-org/no-such-repo", "model.gguf", dir.path())
            .await
            .unwrap();
        let second = download_model("no-such-org/no-such-repo", "model.gguf", dir.path())
            .await
            .unwrap();

        assert_eq!(first, path);
        assert_eq!(first, second);
        assert_eq!(fs::read(&path).unwrap(), b"GGUF");
    }
}
