//! Ingested files

use crate::error::InternalError;
use crate::Result;
use std::sync::Arc;

/// One submitted file: name, declared size and immutable contents
///
/// Cloning shares the payload. Files rejected on size before being read
/// carry their declared size and an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub size: u64,
    pub payload: Arc<[u8]>,
}

impl FileRecord {
    /// Record whose declared size is the payload length
    pub fn from_bytes(name: impl Into<String>, payload: impl Into<Arc<[u8]>>) -> Self {
        let payload = payload.into();
        Self {
            name: name.into(),
            size: payload.len() as u64,
            payload,
        }
    }

    /// Record for a file that was sized but never read
    pub fn metadata_only(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            payload: Arc::from(Vec::new()),
        }
    }

    /// Check that the declared size matches the bytes held
    pub fn ensure_loaded(&self) -> Result<()> {
        let held = self.payload.len() as u64;
        if held != self.size {
            return Err(InternalError::assertion(format!(
                "{}: declared {} bytes but holds {held}",
                self.name, self.size
            ))
            .into());
        }
        Ok(())
    }
}
