//! Hash calculation strategies
//!
//! Every strategy feeds the same chunk sequence to every requested digest
//! context, so all algorithms observe byte-identical input in the same
//! order. They differ only in where the digest updates run:
//!
//! - `SequentialStrategy`: inline on the calling thread
//! - `ParallelStrategy`: one scoped worker thread per algorithm
//!
//! `StrategySelector` picks between them from the payload size, the number
//! of algorithms and the available cores.

use crate::hashing::{CancellationToken, DigestMap, HashAlgorithm};
use crate::progress::ProgressProvider;
use crate::Result;
use std::time::Duration;

mod parallel;
mod selector;
mod sequential;

pub use parallel::ParallelStrategy;
pub use selector::{StrategyHint, StrategySelector};
pub use sequential::SequentialStrategy;

/// Default streaming chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Everything a strategy needs for one run
#[derive(Debug, Clone, Copy)]
pub struct HashingContext<'a> {
    pub payload: &'a [u8],
    /// Deduplicated, non-empty algorithm list
    pub algorithms: &'a [HashAlgorithm],
    pub config: &'a HashConfig,
    pub cancel: &'a CancellationToken,
}

impl HashingContext<'_> {
    pub fn total_bytes(&self) -> u64 {
        self.payload.len() as u64
    }

    /// Chunk size, never zero
    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size.max(1)
    }
}

/// Tunables for hash calculation strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashConfig {
    /// Bytes per streaming step
    pub chunk_size: usize,
    /// Chunks buffered per parallel worker before the dispatcher blocks
    pub queue_depth: usize,
    /// Payloads at least this large are worth fanning out to threads
    pub parallel_threshold: u64,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            queue_depth: 4,
            parallel_threshold: 1024 * 1024, // 1MB
        }
    }
}

impl HashConfig {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            ..Self::default()
        }
    }
}

/// Timing from one strategy run
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub duration: Duration,
    /// Average throughput in MB/s
    pub throughput_mbps: f64,
    /// Number of chunks dispatched
    pub chunks: u64,
}

impl PerformanceMetrics {
    pub(crate) fn measure(duration: Duration, bytes: u64, chunks: u64) -> Self {
        let throughput_mbps = if duration.as_secs_f64() > 0.0 {
            (bytes as f64 / 1_048_576.0) / duration.as_secs_f64()
        } else {
            0.0
        };
        Self {
            duration,
            throughput_mbps,
            chunks,
        }
    }
}

/// Result from strategy execution
#[derive(Debug)]
pub struct StrategyResult {
    pub digests: DigestMap,
    pub metrics: PerformanceMetrics,
}

/// Core trait for hash calculation strategies
pub trait HashingStrategy: Send + Sync {
    /// Strategy identifier for logging
    fn name(&self) -> &'static str;

    /// Stream the payload through every requested digest context
    ///
    /// Progress is reported on the calling thread, never decreases, and
    /// never exceeds the payload length. An empty payload reports nothing.
    fn execute(
        &self,
        context: &HashingContext<'_>,
        progress: &dyn ProgressProvider,
    ) -> Result<StrategyResult>;

    /// Check if this strategy can handle the given context
    fn is_suitable(&self, context: &HashingContext<'_>) -> bool;

    /// Priority score for this strategy (higher is better)
    fn priority_score(&self, context: &HashingContext<'_>) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HashConfig::default();
        assert_eq!(config.chunk_size, 8192);
        assert_eq!(config.queue_depth, 4);
        assert_eq!(config.parallel_threshold, 1_048_576);
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        assert_eq!(HashConfig::with_chunk_size(0).chunk_size, 1);

        let config = HashConfig {
            chunk_size: 0,
            ..HashConfig::default()
        };
        let cancel = CancellationToken::new();
        let context = HashingContext {
            payload: b"abc",
            algorithms: &[HashAlgorithm::Md5],
            config: &config,
            cancel: &cancel,
        };
        assert_eq!(context.chunk_size(), 1);
    }

    #[test]
    fn test_metrics_throughput() {
        let metrics = PerformanceMetrics::measure(Duration::from_secs(2), 4 * 1_048_576, 512);
        assert!((metrics.throughput_mbps - 2.0).abs() < f64::EPSILON);

        let metrics = PerformanceMetrics::measure(Duration::ZERO, 1024, 1);
        assert_eq!(metrics.throughput_mbps, 0.0);
    }
}
