//! Fast Brain chat harness
//!
//! Interactive chat loop for manual testing, plus a non-interactive smoke
//! test for validation.
//!
//! Interactive:  chat
//! Smoke test:   chat --smoke

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};

use fastbrain::inference::FastBrain;
use fastbrain::types::config::{BrainConfig, OFFLOAD_ALL_LAYERS};

const SMOKE_PROMPT: &str = "What is 2 + 2? Answer in one word.";

#[derive(Parser, Debug)]
#[command(name = "chat", about = "Fast Brain interactive chat and smoke test")]
struct Cli {
    /// Run a single non-interactive smoke test instead of the chat loop
    #[arg(long)]
    smoke: bool,

    /// Path to the GGUF model (defaults to models/fast_brain/)
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Number of layers to offload to GPU (defaults to all)
    #[arg(long)]
    gpu_layers: Option<u32>,

    /// Context window size in tokens
    #[arg(long, default_value_t = 4096)]
    context_size: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    let config = BrainConfig {
        model_path: cli.model_path,
        gpu_layers: cli.gpu_layers.unwrap_or(OFFLOAD_ALL_LAYERS),
        context_size: cli.context_size,
    };

    info!("Initialising Fast Brain...");
    let brain = match FastBrain::new(config) {
        Ok(brain) => brain,
        Err(e) => {
            error!("Failed to initialise Fast Brain: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Ready: {} (context window: {} tokens)",
        brain.model_path().display(),
        brain.context_size()
    );

    if cli.smoke {
        let passed = run_smoke_test(&brain);
        std::process::exit(if passed { 0 } else { 1 });
    }

    run_interactive_loop(&brain);
}

/// Run an interactive chat loop with per-turn timings.
fn run_interactive_loop(brain: &FastBrain) {
    info!("Fast Brain — Interactive Chat");
    info!("Type 'quit' or 'exit' to stop. Ctrl+C also works.");
    info!("--------------------------------------------------");

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("\nYou: ");
        let _ = std::io::stdout().flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                info!("Exiting.");
                break;
            }
            Ok(_) => {}
        }

        let user_input = line.trim();
        if user_input.is_empty() {
            continue;
        }
        if user_input.eq_ignore_ascii_case("quit") || user_input.eq_ignore_ascii_case("exit") {
            info!("Goodbye.");
            break;
        }

        let start = Instant::now();
        match brain.generate_response(user_input) {
            Ok(response) => {
                println!("\nFast Brain: {response}");
                info!("(Response time: {:.2}s)", start.elapsed().as_secs_f64());
            }
            Err(e) => {
                error!("Generation failed: {e}");
            }
        }
    }
}

/// Run a single non-interactive inference. Passes iff the response is
/// non-empty after trimming whitespace.
fn run_smoke_test(brain: &FastBrain) -> bool {
    info!("Smoke test prompt: {SMOKE_PROMPT}");

    let start = Instant::now();
    let response = match brain.generate_response(SMOKE_PROMPT) {
        Ok(response) => response,
        Err(e) => {
            error!("SMOKE TEST FAILED — {e}");
            return false;
        }
    };

    info!("Response: {response}");
    info!("Time: {:.2}s", start.elapsed().as_secs_f64());

    if smoke_passed(&response) {
        info!("SMOKE TEST PASSED");
        true
    } else {
        error!("SMOKE TEST FAILED — empty response");
        false
    }
}

fn smoke_passed(response: &str) -> bool {
    !response.trim().is_empty()
}
