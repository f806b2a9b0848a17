//! Error types for the Filehash Core Library
//!
//! This module contains all error types used throughout the library, organized
//! into logical categories for better maintainability and clarity.

use thiserror::Error;

pub mod internal;
pub mod io;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;
pub use internal::InternalError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Filehash Core Library
///
/// Errors are categorized into three main types:
/// - I/O errors: reading user files from disk
/// - Validation errors: recoverable user-input failures, reported per file or batch
/// - Internal errors: broken digest primitives and cancelled runs
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal library errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// Whether this error is a user-input validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error came from a cancelled hashing run
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Internal(InternalError::Cancelled { .. }))
    }
}

// Conversions from external error types

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}
