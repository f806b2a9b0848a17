//! Input validation ahead of hashing
//!
//! Every check is a pure predicate over sizes and counts. Nothing here stops
//! a batch: callers collect the errors and decide what to hash.

use crate::error::ValidationError;
use crate::hashing::{HashAlgorithm, registry};
use crate::record::FileRecord;
use crate::EngineConfig;
use log::debug;

type Check = std::result::Result<(), ValidationError>;

/// Per-file verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub record: FileRecord,
    pub accepted: bool,
    pub reason: Option<ValidationError>,
}

/// Files split into those that may be hashed and those that may not
#[derive(Debug, Clone, Default)]
pub struct BatchValidation {
    pub accepted: Vec<FileRecord>,
    pub rejected: Vec<ValidationOutcome>,
}

/// Limits taken from [`EngineConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_file_size: u64,
    min_files: usize,
    max_files: usize,
    min_algorithms: usize,
    max_algorithms: usize,
}

impl Validator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            min_files: config.min_files,
            max_files: config.max_files,
            min_algorithms: config.min_algorithms,
            max_algorithms: config.max_algorithms,
        }
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Sizes in `1..=max_file_size` pass
    pub fn validate_file_size(&self, size: u64) -> Check {
        if size > self.max_file_size {
            return Err(ValidationError::file_too_large(size, self.max_file_size));
        }
        if size == 0 {
            return Err(ValidationError::FileEmpty);
        }
        Ok(())
    }

    pub fn validate_file_count(&self, count: usize) -> Check {
        if count < self.min_files {
            return Err(ValidationError::too_few_files(count, self.min_files));
        }
        if count > self.max_files {
            return Err(ValidationError::too_many_files(count, self.max_files));
        }
        Ok(())
    }

    pub fn validate_algorithm_selection(&self, count: usize) -> Check {
        if count < self.min_algorithms {
            return Err(ValidationError::too_few_algorithms(count, self.min_algorithms));
        }
        if count > self.max_algorithms {
            return Err(ValidationError::too_many_algorithms(count, self.max_algorithms));
        }
        Ok(())
    }

    pub fn validate_file(&self, record: &FileRecord) -> ValidationOutcome {
        let reason = self.validate_file_size(record.size).err();
        if let Some(reason) = &reason {
            debug!("Rejected {}: {reason}", record.name);
        }
        ValidationOutcome {
            record: record.clone(),
            accepted: reason.is_none(),
            reason,
        }
    }

    /// Validate each file independently, preserving submission order
    pub fn validate_files(&self, records: &[FileRecord]) -> BatchValidation {
        let mut batch = BatchValidation::default();
        for record in records {
            let outcome = self.validate_file(record);
            if outcome.accepted {
                batch.accepted.push(outcome.record);
            } else {
                batch.rejected.push(outcome);
            }
        }
        batch
    }

    /// Parse user-chosen algorithm names and check the selection bounds
    ///
    /// Repeated names keep their first position.
    pub fn resolve_algorithms<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> std::result::Result<Vec<HashAlgorithm>, ValidationError> {
        let mut selected: Vec<HashAlgorithm> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let algorithm = registry::lookup(name)
                .map(|entry| entry.algorithm)
                .ok_or_else(|| ValidationError::unknown_algorithm(name))?;
            if !selected.contains(&algorithm) {
                selected.push(algorithm);
            }
        }
        self.validate_algorithm_selection(selected.len())?;
        Ok(selected)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
