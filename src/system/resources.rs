//! System memory reporting
//!
//! Reads RAM and swap figures from /proc/meminfo for the hardware
//! validation tool.

use std::io;
use std::path::Path;

/// System memory figures, in bytes
#[derive(Debug, Clone, Default)]
pub struct MemoryInfo {
    pub ram_total: u64,
    pub ram_available: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// Read RAM and swap figures from /proc/meminfo
pub fn read_memory_info() -> io::Result<MemoryInfo> {
    let contents = std::fs::read_to_string(Path::new("/proc/meminfo"))?;
    Ok(parse_meminfo(&contents))
}

fn parse_meminfo(contents: &str) -> MemoryInfo {
    MemoryInfo {
        ram_total: parse_meminfo_field(contents, "MemTotal"),
        ram_available: parse_meminfo_field(contents, "MemAvailable"),
        swap_total: parse_meminfo_field(contents, "SwapTotal"),
        swap_free: parse_meminfo_field(contents, "SwapFree"),
    }
}

/// Extract one field from /proc/meminfo text and return its value in bytes.
/// Lines look like "MemTotal:       16384000 kB". Missing fields read as 0.
fn parse_meminfo_field(contents: &str, field: &str) -> u64 {
    for line in contents.lines() {
        let Some(rest) = line.strip_prefix(field) else {
            continue;
        };
        let Some(rest) = rest.strip_prefix(':') else {
            continue;
        };
        if let Some(value) = rest.split_whitespace().next() {
            if let Ok(kb) = value.parse::<u64>() {
                return kb * 1024;
            }
        }
    }
    0
}

/// Convert bytes to GiB for display
pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MemTotal:       32768000 kB\n\
                          MemFree:         1024000 kB\n\
                          MemAvailable:   16384000 kB\n\
                          SwapTotal:       8192000 kB\n\
                          SwapFree:        8192000 kB\n";

    #[test]
    fn test_parse_meminfo_fields() {
        let info = parse_meminfo(SAMPLE);
        assert_eq!(info.ram_total, 32_768_000 * 1024);
        assert_eq!(info.ram_available, 16_384_000 * 1024);
        assert_eq!(info.swap_total, 8_192_000 * 1024);
        assert_eq!(info.swap_free, 8_192_000 * 1024);
    }

    #[test]
    fn test_missing_field_reads_zero() {
        assert_eq!(parse_meminfo_field(SAMPLE, "HugePages_Total"), 0);
    }

    #[test]
    fn test_field_prefix_is_exact() {
        // "SwapTotal" must not match a lookup for "Swap".
        assert_eq!(parse_meminfo_field(SAMPLE, "Swap"), 0);
    }

    #[test]
    fn test_bytes_to_gib() {
        assert_eq!(bytes_to_gib(2 * 1024 * 1024 * 1024), 2.0);
        assert_eq!(bytes_to_gib(0), 0.0);
    }
}
