//! Throughput helpers for run summaries

use std::time::Duration;

/// Megabytes per second for `bytes` processed in `elapsed`
pub fn throughput_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds <= 0.0 {
        return 0.0;
    }
    (bytes as f64 / 1_048_576.0) / seconds
}

/// Format throughput as human-readable string
pub fn format_throughput(mbps: f64) -> String {
    if mbps >= 1.0 {
        format!("{mbps:.1} MB/s")
    } else {
        format!("{:.0} KB/s", mbps * 1024.0)
    }
}
