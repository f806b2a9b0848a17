//! Multi-algorithm streaming hash engine
//!
//! [`HashCalculator::compute_digests`] streams one payload through a fresh
//! digest context per requested algorithm and returns a [`DigestMap`] of
//! lowercase hex digests.

use crate::error::{InternalError, ValidationError};
use crate::progress::{NullProvider, ProgressProvider};
use crate::{EngineConfig, Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod algorithms;
mod cancellation;
pub mod registry;
mod strategies;
mod traits;

pub use cancellation::CancellationToken;
pub use registry::{AlgorithmEntry, list_algorithms, new_digest_context};
pub use strategies::{
    DEFAULT_CHUNK_SIZE, HashConfig, HashingContext, HashingStrategy, ParallelStrategy,
    PerformanceMetrics, SequentialStrategy, StrategyHint, StrategyResult, StrategySelector,
};
pub use traits::StreamingHasher;

/// Supported digest algorithms, in registry order
///
/// Ordering follows the byte order of the display name, which is the order
/// digests are laid out in tables, exports and the combined digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_512,
    Blake2b,
    Blake2s,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 10] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_512,
        HashAlgorithm::Blake2b,
        HashAlgorithm::Blake2s,
    ];

    /// Pre-selected algorithm in front ends
    pub const DEFAULT: HashAlgorithm = HashAlgorithm::Sha256;

    pub fn entry(self) -> &'static AlgorithmEntry {
        registry::entry(self)
    }

    /// Lowercase slug, e.g. `sha3-256`
    pub fn id(self) -> &'static str {
        self.entry().id
    }

    /// Canonical name, e.g. `SHA3-256`
    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    /// Native digest length in bytes
    pub fn output_len(self) -> usize {
        self.entry().output_len
    }

    /// Length of the hex digest
    pub fn hex_len(self) -> usize {
        self.output_len() * 2
    }

    /// Fresh streaming context
    pub fn create_hasher(self) -> Box<dyn StreamingHasher> {
        (self.entry().constructor)()
    }
}

impl Ord for HashAlgorithm {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_name().cmp(other.display_name())
    }
}

impl PartialOrd for HashAlgorithm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        registry::lookup(s)
            .map(|entry| entry.algorithm)
            .ok_or_else(|| ValidationError::unknown_algorithm(s).into())
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HashAlgorithm> for String {
    fn from(algorithm: HashAlgorithm) -> Self {
        algorithm.display_name().to_string()
    }
}

/// Algorithm to lowercase hex digest, ordered by display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestMap(BTreeMap<HashAlgorithm, String>);

impl DigestMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous digest for this algorithm, if any
    pub fn insert(&mut self, algorithm: HashAlgorithm, hex: String) -> Option<String> {
        self.0.insert(algorithm, hex)
    }

    pub fn get(&self, algorithm: HashAlgorithm) -> Option<&str> {
        self.0.get(&algorithm).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn algorithms(&self) -> impl Iterator<Item = HashAlgorithm> + '_ {
        self.0.keys().copied()
    }

    /// Entries in display-name order
    pub fn iter(&self) -> impl Iterator<Item = (HashAlgorithm, &str)> + '_ {
        self.0.iter().map(|(algorithm, hex)| (*algorithm, hex.as_str()))
    }
}

impl FromIterator<(HashAlgorithm, String)> for DigestMap {
    fn from_iter<I: IntoIterator<Item = (HashAlgorithm, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of a single-algorithm calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashResult {
    pub algorithm: HashAlgorithm,
    pub hash: String,
    pub input_size: u64,
    pub duration: Duration,
}

/// Hash calculator
#[derive(Debug, Clone)]
pub struct HashCalculator {
    selector: Arc<StrategySelector>,
    config: HashConfig,
}

impl HashCalculator {
    pub fn new() -> Self {
        Self::with_hint(StrategyHint::Automatic)
    }

    /// Create a hash calculator with a specific strategy hint
    pub fn with_hint(hint: StrategyHint) -> Self {
        Self {
            selector: Arc::new(StrategySelector::with_hint(hint)),
            config: HashConfig::default(),
        }
    }

    /// Replace the strategy tunables
    pub fn with_config(mut self, config: HashConfig) -> Self {
        self.config = config;
        self
    }

    /// Calculator using the engine's configured chunk size
    pub fn from_engine_config(engine: &EngineConfig) -> Self {
        Self::new().with_config(HashConfig::with_chunk_size(engine.chunk_size))
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Stream `payload` through every requested algorithm
    ///
    /// Duplicate algorithms collapse to one key. An empty algorithm list is
    /// rejected with `TooFewAlgorithms`; an empty payload is not rejected.
    pub fn compute_digests(
        &self,
        payload: &[u8],
        algorithms: &[HashAlgorithm],
        progress: &dyn ProgressProvider,
    ) -> Result<DigestMap> {
        self.compute_digests_with_cancel(payload, algorithms, progress, &CancellationToken::new())
    }

    /// As [`compute_digests`](Self::compute_digests), checking `cancel`
    /// before every chunk
    pub fn compute_digests_with_cancel(
        &self,
        payload: &[u8],
        algorithms: &[HashAlgorithm],
        progress: &dyn ProgressProvider,
        cancel: &CancellationToken,
    ) -> Result<DigestMap> {
        let mut unique = algorithms.to_vec();
        unique.sort();
        unique.dedup();
        if unique.is_empty() {
            return Err(ValidationError::too_few_algorithms(0, 1).into());
        }

        let context = HashingContext {
            payload,
            algorithms: &unique,
            config: &self.config,
            cancel,
        };
        let strategy = self.selector.select(&context);
        debug!(
            "Hashing {} bytes with {} algorithm(s) using {} strategy",
            payload.len(),
            unique.len(),
            strategy.name()
        );

        let result = strategy.execute(&context, progress)?;
        debug!(
            "{} strategy finished {} chunks in {:?} ({:.1} MB/s)",
            strategy.name(),
            result.metrics.chunks,
            result.metrics.duration,
            result.metrics.throughput_mbps
        );
        Ok(result.digests)
    }

    /// Calculate one digest for in-memory data
    pub fn calculate_bytes(&self, algorithm: HashAlgorithm, data: &[u8]) -> Result<HashResult> {
        let start_time = Instant::now();
        let digests = self.compute_digests(data, &[algorithm], &NullProvider)?;
        let hash = digests.get(algorithm).map(str::to_owned).ok_or_else(|| {
            Error::from(InternalError::digest_finalization(
                algorithm.display_name(),
                "no digest returned",
            ))
        })?;

        Ok(HashResult {
            algorithm,
            hash,
            input_size: data.len() as u64,
            duration: start_time.elapsed(),
        })
    }

    /// Compare the digest of `data` against `expected`, ignoring case and
    /// surrounding whitespace
    pub fn verify(&self, data: &[u8], algorithm: HashAlgorithm, expected: &str) -> Result<bool> {
        let actual = self.calculate_bytes(algorithm, data)?;
        Ok(actual.hash.eq_ignore_ascii_case(expected.trim()))
    }

    pub fn supported_algorithms(&self) -> &'static [HashAlgorithm] {
        list_algorithms()
    }
}

impl Default for HashCalculator {
    fn default() -> Self {
        Self::new()
    }
}
