//! Filehash Core Library
//!
//! This is the core library for filehash, providing the multi-algorithm
//! streaming hash engine, input validation, the combined digest, and the
//! in-memory session history that front ends render and export.

pub mod combiner;
pub mod error;
pub mod format;
pub mod hashing;
pub mod progress;
pub mod record;
pub mod session;
pub mod validation;

// Re-export main types
pub use combiner::{combine, combine_with};
pub use error::{Error, Result};
pub use hashing::{
    CancellationToken, DigestMap, HashAlgorithm, HashCalculator, HashConfig, HashResult,
    StrategyHint,
};
pub use progress::{FnProvider, NullProvider, ProgressProvider, ProgressUpdate, SharedProvider};
pub use record::FileRecord;
pub use session::{BatchReport, FileFailure, History, HistoryEntry, Session};
pub use validation::{BatchValidation, ValidationOutcome, Validator};

use error::ValidationError;
use serde::{Deserialize, Serialize};

/// Engine limits and defaults shared by validation, hashing and the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest accepted file in bytes (inclusive)
    pub max_file_size: u64,
    /// Maximum number of files per batch
    pub max_files: usize,
    /// Minimum number of files per batch
    pub min_files: usize,
    /// Minimum number of selected algorithms
    pub min_algorithms: usize,
    /// Maximum number of selected algorithms
    pub max_algorithms: usize,
    /// Chunk size for the streaming loop
    pub chunk_size: usize,
    /// Algorithm pre-selected by front ends
    pub default_algorithm: String,
    /// Algorithm used for the combined digest
    pub combiner_algorithm: String,
    /// strftime format for history timestamps
    pub timestamp_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024 * 1024, // 1GB
            max_files: 5,
            min_files: 1,
            min_algorithms: 1,
            max_algorithms: 3,
            chunk_size: 8 * 1024,
            default_algorithm: HashAlgorithm::DEFAULT.display_name().to_string(),
            combiner_algorithm: HashAlgorithm::Sha256.display_name().to_string(),
            timestamp_format: format::DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            max_file_size: 64 * 1024, // 64KB keeps boundary tests cheap
            chunk_size: 1024,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Validation(ValidationError::invalid_configuration(
                "chunk_size must be greater than 0",
            )));
        }
        if self.min_files > self.max_files {
            return Err(Error::Validation(ValidationError::invalid_configuration(
                &format!(
                    "min_files ({}) exceeds max_files ({})",
                    self.min_files, self.max_files
                ),
            )));
        }
        if self.min_algorithms > self.max_algorithms {
            return Err(Error::Validation(ValidationError::invalid_configuration(
                &format!(
                    "min_algorithms ({}) exceeds max_algorithms ({})",
                    self.min_algorithms, self.max_algorithms
                ),
            )));
        }
        if !format::is_valid_timestamp_format(&self.timestamp_format) {
            return Err(Error::Validation(ValidationError::invalid_configuration(
                &format!("invalid timestamp_format {:?}", self.timestamp_format),
            )));
        }
        self.default_algorithm.parse::<HashAlgorithm>()?;
        Ok(())
    }

    /// The pre-selected algorithm, falling back to SHA-256 when unrecognised
    pub fn default_algorithm(&self) -> HashAlgorithm {
        self.default_algorithm
            .parse()
            .unwrap_or(HashAlgorithm::DEFAULT)
    }
}
