//! Hardware validation tool
//!
//! Checks GPU availability, driver state, system RAM, and swap to verify the
//! environment is correctly configured for local inference workloads. Missing
//! diagnostics are warnings; the run always completes.

use clap::Parser;
use tracing::{info, warn};

use fastbrain::system::gpu::detect_gpu;
use fastbrain::system::resources::{bytes_to_gib, read_memory_info};

#[derive(Parser, Debug)]
#[command(name = "check_hardware", about = "Validate the inference environment")]
struct Cli {
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

    info!("==================================================");
    info!("Fast Brain Hardware Validation");
    info!("==================================================");

    check_host();
    check_gpu();
    check_memory();

    info!("==================================================");
    info!("Validation complete.");
}

fn check_host() {
    info!("--- Host ---");
    info!("fastbrain      : v{}", env!("CARGO_PKG_VERSION"));
    info!("OS             : {}", std::env::consts::OS);
    info!("Architecture   : {}", std::env::consts::ARCH);
}

fn check_gpu() {
    info!("--- GPU / Driver ---");
    let gpu = detect_gpu();

    if !gpu.is_available {
        warn!("No NVIDIA GPU detected (nvidia-smi missing or failed). Inference will run on CPU.");
        return;
    }

    info!("GPU            : {}", gpu.name);
    info!("VRAM total     : {:.2} GiB", gpu.vram_total_mb as f64 / 1024.0);
    info!("VRAM used      : {:.2} GiB", gpu.vram_used_mb as f64 / 1024.0);
    info!("Driver version : {}", gpu.driver_version);
    info!("Persistence    : {}", gpu.persistence_mode);
}

fn check_memory() {
    info!("--- System RAM / Swap ---");
    match read_memory_info() {
        Ok(mem) => {
            info!("RAM total      : {:.2} GiB", bytes_to_gib(mem.ram_total));
            info!("RAM available  : {:.2} GiB", bytes_to_gib(mem.ram_available));
            info!("Swap total     : {:.2} GiB", bytes_to_gib(mem.swap_total));
            info!("Swap free      : {:.2} GiB", bytes_to_gib(mem.swap_free));
        }
        Err(e) => {
            warn!("Could not read /proc/meminfo: {e}. Skipping memory check.");
        }
    }
}
