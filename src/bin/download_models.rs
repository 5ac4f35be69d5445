//! Fast Brain model downloader
//!
//! Fetches the quantized GGUF model from HuggingFace Hub into the local
//! models/fast_brain/ directory. Safe to re-run: an already downloaded model
//! is left untouched.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use fastbrain::inference::model::{model_dir, DEFAULT_MODEL_FILENAME, DEFAULT_REPO_ID};
use fastbrain::storage::huggingface::{download_model, format_size};
use fastbrain::types::model::ModelInfo;

#[derive(Parser, Debug)]
#[command(name = "download_models", about = "Download the Fast Brain GGUF model")]
struct Cli {
    /// HuggingFace repository to fetch from
    #[arg(long, default_value = DEFAULT_REPO_ID)]
    repo: String,

    /// File to fetch from the repository
    #[arg(long, default_value = DEFAULT_MODEL_FILENAME)]
    filename: String,

    /// Destination directory (defaults to models/fast_brain/)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    let dest_dir = cli.dir.unwrap_or_else(model_dir);

    match download_model(&cli.repo, &cli.filename, &dest_dir).await {
        Ok(path) => {
            if let Some(model) = ModelInfo::from_path(&path) {
                info!("Model ready: {} ({})", model.path, format_size(model.size_bytes));
            } else {
                info!("Model ready at: {}", path.display());
            }
        }
        Err(e) => {
            error!("Failed to download model: {e}");
            std::process::exit(1);
        }
    }
}
