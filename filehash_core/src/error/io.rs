//! I/O related error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure reading a user file from disk
#[derive(Error, Debug)]
#[error("{}", describe(self))]
pub struct IoError {
    pub kind: IoErrorKind,
    /// File the failure relates to, when known
    pub path: Option<PathBuf>,
    #[source]
    pub source: Option<std::io::Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorKind {
    FileNotFound,
    PermissionDenied,
    /// Path exists but is a directory or other non-regular file
    NotAFile,
    Other,
}

impl IoError {
    pub fn file_not_found(path: &Path) -> Self {
        Self {
            kind: IoErrorKind::FileNotFound,
            path: Some(path.to_path_buf()),
            source: None,
        }
    }

    pub fn permission_denied(path: &Path, source: std::io::Error) -> Self {
        Self {
            kind: IoErrorKind::PermissionDenied,
            path: Some(path.to_path_buf()),
            source: Some(source),
        }
    }

    pub fn not_a_file(path: &Path) -> Self {
        Self {
            kind: IoErrorKind::NotAFile,
            path: Some(path.to_path_buf()),
            source: None,
        }
    }

    /// Classify a standard I/O error by its kind
    pub fn from_std(source: std::io::Error) -> Self {
        let kind = match source.kind() {
            std::io::ErrorKind::NotFound => IoErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            std::io::ErrorKind::IsADirectory => IoErrorKind::NotAFile,
            _ => IoErrorKind::Other,
        };

        Self {
            kind,
            path: None,
            source: Some(source),
        }
    }

    /// Attach the path the failure occurred on
    pub fn at(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// Final path component, for per-file reports
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }
}

fn describe(error: &IoError) -> String {
    let path = error.path.as_deref().map(Path::display);
    match (error.kind, path) {
        (IoErrorKind::FileNotFound, Some(path)) => format!("File not found: {path}"),
        (IoErrorKind::FileNotFound, None) => "File not found".to_string(),
        (IoErrorKind::PermissionDenied, Some(path)) => {
            format!("Permission denied reading {path}")
        }
        (IoErrorKind::PermissionDenied, None) => "Permission denied".to_string(),
        (IoErrorKind::NotAFile, Some(path)) => format!("Not a regular file: {path}"),
        (IoErrorKind::NotAFile, None) => "Not a regular file".to_string(),
        (IoErrorKind::Other, path) => {
            let prefix = match path {
                Some(path) => format!("Cannot read {path}"),
                None => "I/O error".to_string(),
            };
            match &error.source {
                Some(source) => format!("{prefix}: {source}"),
                None => prefix,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_file_not_found_error() {
        let path = Path::new("/uploads/invoice.pdf");
        let error = IoError::file_not_found(path);

        assert_eq!(error.kind, IoErrorKind::FileNotFound);
        assert!(error.source.is_none());
        assert_eq!(error.to_string(), "File not found: /uploads/invoice.pdf");
        assert_eq!(error.file_name().as_deref(), Some("invoice.pdf"));
    }

    #[test]
    fn test_permission_denied_error() {
        let path = Path::new("/root/secret.txt");
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let error = IoError::permission_denied(path, io_error);

        assert_eq!(error.kind, IoErrorKind::PermissionDenied);
        assert!(error.source.is_some());
        assert!(error.to_string().contains("Permission denied"));
        assert!(error.to_string().contains("/root/secret.txt"));
    }

    #[test]
    fn test_from_std_classifies_kind() {
        let error = IoError::from_std(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(error.kind, IoErrorKind::FileNotFound);
        assert!(error.path.is_none());

        let error = IoError::from_std(io::Error::other("disk on fire"));
        assert_eq!(error.kind, IoErrorKind::Other);
        assert_eq!(error.to_string(), "I/O error: disk on fire");
    }

    #[test]
    fn test_at_attaches_path() {
        let error = IoError::from_std(io::Error::other("short read")).at(Path::new("a.bin"));
        assert_eq!(error.kind, IoErrorKind::Other);
        assert_eq!(error.to_string(), "Cannot read a.bin: short read");
    }

    #[test]
    fn test_not_a_file() {
        let error = IoError::not_a_file(Path::new("/tmp"));
        assert_eq!(error.kind, IoErrorKind::NotAFile);
        assert!(error.to_string().contains("Not a regular file"));
    }
}
