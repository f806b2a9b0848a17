//! Parallel hash calculation strategy
//!
//! One scoped worker thread per algorithm. The calling thread slices the
//! payload into chunks and hands the same borrowed slice to every worker
//! over a bounded channel, so each digest context still sees the chunks in
//! order while different algorithms run concurrently.
//!
//! Workers publish how many bytes they have consumed through atomic
//! counters. The dispatcher reports the minimum across workers, which keeps
//! progress monotonic and bounded by the payload length.

use super::{HashingContext, HashingStrategy, PerformanceMetrics, StrategyResult};
use crate::error::InternalError;
use crate::hashing::{DigestMap, HashAlgorithm};
use crate::progress::{ProgressProvider, ProgressUpdate};
use crate::Result;
use crossbeam_channel::{Sender, bounded};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;

/// Parallel strategy - one digest worker per algorithm
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelStrategy;

impl ParallelStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl HashingStrategy for ParallelStrategy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn execute(
        &self,
        context: &HashingContext<'_>,
        progress: &dyn ProgressProvider,
    ) -> Result<StrategyResult> {
        let start_time = Instant::now();
        let total_bytes = context.total_bytes();
        let queue_depth = context.config.queue_depth.max(1);
        let consumed: Vec<AtomicU64> = context
            .algorithms
            .iter()
            .map(|_| AtomicU64::new(0))
            .collect();

        thread::scope(|scope| {
            let mut senders: Vec<Sender<&[u8]>> = Vec::with_capacity(consumed.len());
            let mut workers: Vec<(HashAlgorithm, ScopedJoinHandle<'_, String>)> =
                Vec::with_capacity(consumed.len());

            for (&algorithm, counter) in context.algorithms.iter().zip(&consumed) {
                let (tx, rx) = bounded::<&[u8]>(queue_depth);
                senders.push(tx);
                let handle = scope.spawn(move || {
                    let mut hasher = algorithm.create_hasher();
                    for chunk in rx {
                        hasher.update(chunk);
                        counter.fetch_add(chunk.len() as u64, Ordering::Release);
                    }
                    hasher.finalize()
                });
                workers.push((algorithm, handle));
            }

            let mut reported = 0u64;
            let mut chunks = 0u64;
            let mut outcome: Result<()> = Ok(());

            'dispatch: for chunk in context.payload.chunks(context.chunk_size()) {
                if context.cancel.is_cancelled() {
                    outcome = Err(InternalError::cancelled(reported, total_bytes).into());
                    break;
                }

                for (tx, (algorithm, _)) in senders.iter().zip(&workers) {
                    if tx.send(chunk).is_err() {
                        outcome = Err(InternalError::digest_finalization(
                            algorithm.display_name(),
                            "worker stopped receiving chunks",
                        )
                        .into());
                        break 'dispatch;
                    }
                }
                chunks += 1;

                let done = min_consumed(&consumed);
                if done > reported {
                    reported = done;
                    progress.report(ProgressUpdate::HashProgress {
                        bytes_processed: reported,
                        total_bytes,
                    });
                }
            }

            // Closing the channels lets every worker drain and finalize.
            drop(senders);

            let mut digests = DigestMap::new();
            for (algorithm, handle) in workers {
                match handle.join() {
                    Ok(hex) => {
                        digests.insert(algorithm, hex);
                    }
                    Err(_) => {
                        debug!("{} worker panicked", algorithm.display_name());
                        if !outcome.as_ref().is_err_and(|e| e.is_cancelled()) {
                            outcome = Err(InternalError::digest_finalization(
                                algorithm.display_name(),
                                "worker thread panicked",
                            )
                            .into());
                        }
                    }
                }
            }
            outcome?;

            if reported < total_bytes {
                progress.report(ProgressUpdate::HashProgress {
                    bytes_processed: total_bytes,
                    total_bytes,
                });
            }

            Ok(StrategyResult {
                digests,
                metrics: PerformanceMetrics::measure(start_time.elapsed(), total_bytes, chunks),
            })
        })
    }

    fn is_suitable(&self, context: &HashingContext<'_>) -> bool {
        context.algorithms.len() > 1
    }

    fn priority_score(&self, context: &HashingContext<'_>) -> u32 {
        let mut score: u32 = 100;

        if context.total_bytes() >= context.config.parallel_threshold && available_cores() >= 2 {
            score += 100 * context.algorithms.len().min(3) as u32;
        }

        score
    }
}

fn min_consumed(counters: &[AtomicU64]) -> u64 {
    counters
        .iter()
        .map(|counter| counter.load(Ordering::Acquire))
        .min()
        .unwrap_or(0)
}

pub(crate) fn available_cores() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
