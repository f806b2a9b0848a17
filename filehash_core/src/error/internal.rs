//! Internal library error types

use thiserror::Error;

/// Failures that are not the user's fault
#[derive(Error, Debug)]
pub enum InternalError {
    /// A digest context could not produce its output
    #[error("Digest finalization failed for {algorithm}: {message}")]
    DigestFinalization { algorithm: String, message: String },

    /// The run was cancelled through its token
    #[error("Hashing cancelled after {processed} of {total} bytes")]
    Cancelled { processed: u64, total: u64 },

    /// Internal assertion failure
    #[error("Internal assertion failed: {message}")]
    Assertion { message: String },
}

impl InternalError {
    pub fn digest_finalization(algorithm: &str, message: &str) -> Self {
        Self::DigestFinalization {
            algorithm: algorithm.to_string(),
            message: message.to_string(),
        }
    }

    pub fn cancelled(processed: u64, total: u64) -> Self {
        Self::Cancelled { processed, total }
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }
}
