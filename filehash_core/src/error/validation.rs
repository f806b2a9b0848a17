//! Validation related error types

use crate::format::format_size_limit;
use thiserror::Error;

/// User-input validation failures
///
/// These never abort a batch: they are collected per file or per batch and
/// reported next to the successful results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Algorithm name not present in the registry
    #[error("Unknown hash algorithm: {name}")]
    UnknownAlgorithm { name: String },

    /// File larger than the configured maximum
    #[error("File size exceeds {} limit", format_size_limit(.max))]
    FileTooLarge { size: u64, max: u64 },

    /// Zero-byte file
    #[error("File is empty")]
    FileEmpty,

    /// Fewer files than the configured minimum
    #[error("Please upload at least {min} file(s)")]
    TooFewFiles { count: usize, min: usize },

    /// More files than the configured maximum
    #[error("Maximum {max} files allowed")]
    TooManyFiles { count: usize, max: usize },

    /// Fewer algorithms selected than the configured minimum
    #[error("Please select at least {min} algorithm(s)")]
    TooFewAlgorithms { count: usize, min: usize },

    /// More algorithms selected than the configured maximum
    #[error("Maximum {max} algorithms can be selected (got {count})")]
    TooManyAlgorithms { count: usize, max: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ValidationError {
    /// Create an unknown algorithm error
    pub fn unknown_algorithm(name: &str) -> Self {
        Self::UnknownAlgorithm {
            name: name.to_string(),
        }
    }

    /// Create a file too large error
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create a too few files error
    pub fn too_few_files(count: usize, min: usize) -> Self {
        Self::TooFewFiles { count, min }
    }

    /// Create a too many files error
    pub fn too_many_files(count: usize, max: usize) -> Self {
        Self::TooManyFiles { count, max }
    }

    /// Create a too few algorithms error
    pub fn too_few_algorithms(count: usize, min: usize) -> Self {
        Self::TooFewAlgorithms { count, min }
    }

    /// Create a too many algorithms error
    pub fn too_many_algorithms(count: usize, max: usize) -> Self {
        Self::TooManyAlgorithms { count, max }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }
}
