//! File intake
//!
//! Turns paths on disk into [`FileRecord`]s. Sizes are checked from metadata
//! first so an oversized file is never read into memory; it is handed on as a
//! metadata-only record and validation rejects it by size.

use filehash_core::FileRecord;
use filehash_core::error::IoError;
use log::debug;
use std::path::{Path, PathBuf};

/// Files read for one batch
#[derive(Debug, Default)]
pub struct Intake {
    pub records: Vec<FileRecord>,
    /// Paths that could not be read, in submission order
    pub failures: Vec<(PathBuf, IoError)>,
}

/// Name shown for a path in tables and exports
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read one file, skipping the contents when it exceeds `max_file_size`
pub async fn read_file(path: &Path, max_file_size: u64) -> Result<FileRecord, IoError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| IoError::from_std(e).at(path))?;

    if !metadata.is_file() {
        return Err(IoError::not_a_file(path));
    }

    let name = display_name(path);
    let size = metadata.len();
    if size > max_file_size {
        debug!("{} is {size} bytes, not reading", path.display());
        return Ok(FileRecord::metadata_only(name, size));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| IoError::from_std(e).at(path))?;
    Ok(FileRecord::from_bytes(name, bytes))
}

/// Read every path in order, collecting failures instead of stopping
pub async fn read_files(paths: &[PathBuf], max_file_size: u64) -> Intake {
    let mut intake = Intake::default();

    for path in paths {
        match read_file(path, max_file_size).await {
            Ok(record) => intake.records.push(record),
            Err(error) => {
                debug!("Skipping {}: {error}", path.display());
                intake.failures.push((path.clone(), error));
            }
        }
    }

    intake
}
