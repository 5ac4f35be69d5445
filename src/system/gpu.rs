//! GPU detection
//!
//! Best-effort NVIDIA GPU and driver probing via nvidia-smi. A missing tool
//! is reported as "not available", never as an error.

use std::process::Command;

/// GPU information
#[derive(Debug, Clone, Default)]
pub struct GpuInfo {
    pub name: String,
    pub vram_total_mb: u64,
    pub vram_used_mb: u64,
    pub driver_version: String,
    pub persistence_mode: String,
    pub is_available: bool,
}

impl GpuInfo {
    fn unavailable() -> Self {
        Self {
            name: "GPU not detected".to_string(),
            ..Self::default()
        }
    }
}

/// Detect the first available NVIDIA GPU (best effort)
pub fn detect_gpu() -> GpuInfo {
    let output = Command::new("nvidia-smi")
        .args([
            "--query-gpu=name,memory.total,memory.used,driver_version,persistence_mode",
            "--format=csv,noheader,nounits",
        ])
        .output();

    let Ok(output) = output else {
        return GpuInfo::unavailable();
    };

    if !output.status.success() {
        return GpuInfo::unavailable();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .find(|l| !l.trim().is_empty())
        .and_then(parse_nvidia_smi_line)
        .unwrap_or_else(GpuInfo::unavailable)
}

/// Parse one CSV line of nvidia-smi query output:
/// "NVIDIA GeForce RTX 4090, 24564, 1234, 550.54.14, Enabled"
fn parse_nvidia_smi_line(line: &str) -> Option<GpuInfo> {
    let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if parts.len() < 5 {
        return None;
    }

    let name = parts[0].to_string();
    let vram_total_mb = parts[1].parse::<u64>().ok()?;
    let vram_used_mb = parts[2].parse::<u64>().ok()?;

    Some(GpuInfo {
        name,
        vram_total_mb,
        vram_used_mb,
        driver_version: parts[3].to_string(),
        persistence_mode: parts[4].to_string(),
        is_available: true,
    })
}
