//! Sequential hash calculation strategy
//!
//! Feeds each chunk to every digest context in turn on the calling thread.
//! Lowest overhead for small payloads and single algorithms.

use super::{HashingContext, HashingStrategy, PerformanceMetrics, StrategyResult};
use crate::error::InternalError;
use crate::hashing::{DigestMap, HashAlgorithm, StreamingHasher};
use crate::progress::{ProgressProvider, ProgressUpdate};
use crate::Result;
use std::time::Instant;

/// Sequential strategy - every digest update inline on the caller thread
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialStrategy;

impl SequentialStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl HashingStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn execute(
        &self,
        context: &HashingContext<'_>,
        progress: &dyn ProgressProvider,
    ) -> Result<StrategyResult> {
        let start_time = Instant::now();
        let total_bytes = context.total_bytes();

        let mut hashers: Vec<(HashAlgorithm, Box<dyn StreamingHasher>)> = context
            .algorithms
            .iter()
            .map(|&algorithm| (algorithm, algorithm.create_hasher()))
            .collect();

        let mut bytes_processed = 0u64;
        let mut chunks = 0u64;
        for chunk in context.payload.chunks(context.chunk_size()) {
            if context.cancel.is_cancelled() {
                return Err(InternalError::cancelled(bytes_processed, total_bytes).into());
            }

            for (_, hasher) in hashers.iter_mut() {
                hasher.update(chunk);
            }
            bytes_processed += chunk.len() as u64;
            chunks += 1;

            progress.report(ProgressUpdate::HashProgress {
                bytes_processed,
                total_bytes,
            });
        }

        let digests: DigestMap = hashers
            .into_iter()
            .map(|(algorithm, hasher)| (algorithm, hasher.finalize()))
            .collect();

        Ok(StrategyResult {
            digests,
            metrics: PerformanceMetrics::measure(start_time.elapsed(), bytes_processed, chunks),
        })
    }

    fn is_suitable(&self, _context: &HashingContext<'_>) -> bool {
        true
    }

    fn priority_score(&self, context: &HashingContext<'_>) -> u32 {
        let mut score: u32 = 200;

        if context.algorithms.len() == 1 {
            score += 200;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::{CancellationToken, HashConfig};
    use crate::progress::test_support::RecordingProvider;

    fn run(
        payload: &[u8],
        algorithms: &[HashAlgorithm],
        chunk_size: usize,
        cancel: &CancellationToken,
        progress: &dyn ProgressProvider,
    ) -> Result<StrategyResult> {
        let config = HashConfig::with_chunk_size(chunk_size);
        let context = HashingContext {
            payload,
            algorithms,
            config: &config,
            cancel,
        };
        SequentialStrategy::new().execute(&context, progress)
    }

    #[test]
    fn test_reports_after_every_chunk() {
        let provider = RecordingProvider::default();
        let payload = vec![7u8; 2500];
        let result = run(
            &payload,
            &[HashAlgorithm::Md5, HashAlgorithm::Sha1],
            1000,
            &CancellationToken::new(),
            &provider,
        )
        .unwrap();

        assert_eq!(provider.hash_progress(), vec![(1000, 2500), (2000, 2500), (2500, 2500)]);
        assert_eq!(result.metrics.chunks, 3);
        assert_eq!(result.digests.len(), 2);
    }

    #[test]
    fn test_empty_payload_finalizes_without_progress() {
        let provider = RecordingProvider::default();
        let result = run(
            b"",
            &[HashAlgorithm::Sha256],
            8192,
            &CancellationToken::new(),
            &provider,
        )
        .unwrap();

        assert!(provider.hash_progress().is_empty());
        assert_eq!(
            result.digests.get(HashAlgorithm::Sha256),
            Some("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
    }

    #[test]
    fn test_cancelled_before_first_chunk() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let provider = RecordingProvider::default();

        let err = run(b"abcdef", &[HashAlgorithm::Md5], 2, &cancel, &provider).unwrap_err();
        assert!(err.is_cancelled());
        assert!(provider.hash_progress().is_empty());
    }

    #[test]
    fn test_single_algorithm_scores_higher() {
        let config = HashConfig::default();
        let cancel = CancellationToken::new();
        let single = HashingContext {
            payload: b"",
            algorithms: &[HashAlgorithm::Md5],
            config: &config,
            cancel: &cancel,
        };
        let multiple = HashingContext {
            algorithms: &[HashAlgorithm::Md5, HashAlgorithm::Sha1],
            ..single
        };
        let strategy = SequentialStrategy::new();
        assert!(strategy.priority_score(&single) > strategy.priority_score(&multiple));
        assert!(strategy.is_suitable(&multiple));
    }
}
