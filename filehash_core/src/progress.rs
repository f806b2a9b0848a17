//! Progress reporting abstractions
//!
//! The engine reports progress through a trait object so it never depends on
//! channels or terminal widgets. Reports always arrive on the thread that
//! called into the engine.

use std::sync::Arc;

/// Core trait for progress reporting
pub trait ProgressProvider: Send + Sync {
    /// Report a progress update
    fn report(&self, update: ProgressUpdate);

    /// Create a child provider for nested operations
    fn create_child(&self, name: &str) -> Box<dyn ProgressProvider>;

    /// Signal that the operation is complete
    fn complete(&self);
}

/// Unified progress update type
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Cumulative bytes streamed through the digest contexts of one file
    HashProgress { bytes_processed: u64, total_bytes: u64 },

    /// A batch moved on to its next file (1-based)
    BatchProgress {
        current: usize,
        total: usize,
        current_file: Option<String>,
    },

    /// Generic status message
    Status { message: String },
}

/// Null implementation for when no progress is needed
pub struct NullProvider;

impl ProgressProvider for NullProvider {
    fn report(&self, _update: ProgressUpdate) {}

    fn create_child(&self, _name: &str) -> Box<dyn ProgressProvider> {
        Box::new(NullProvider)
    }

    fn complete(&self) {}
}

/// Arc-wrapped provider for sharing across threads
pub struct SharedProvider {
    inner: Arc<dyn ProgressProvider>,
}

impl SharedProvider {
    pub fn new(provider: Arc<dyn ProgressProvider>) -> Self {
        Self { inner: provider }
    }
}

impl ProgressProvider for SharedProvider {
    fn report(&self, update: ProgressUpdate) {
        self.inner.report(update);
    }

    fn create_child(&self, _name: &str) -> Box<dyn ProgressProvider> {
        Box::new(SharedProvider {
            inner: Arc::clone(&self.inner),
        })
    }

    fn complete(&self) {
        self.inner.complete();
    }
}

/// Adapts a `(processed, total)` callback
///
/// Only hash progress reaches the callback; batch and status updates are
/// dropped.
pub struct FnProvider<F> {
    callback: Arc<F>,
}

impl<F> FnProvider<F>
where
    F: Fn(u64, u64) + Send + Sync + 'static,
{
    pub fn new(callback: F) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }
}

impl<F> ProgressProvider for FnProvider<F>
where
    F: Fn(u64, u64) + Send + Sync + 'static,
{
    fn report(&self, update: ProgressUpdate) {
        if let ProgressUpdate::HashProgress {
            bytes_processed,
            total_bytes,
        } = update
        {
            (self.callback)(bytes_processed, total_bytes);
        }
    }

    fn create_child(&self, _name: &str) -> Box<dyn ProgressProvider> {
        Box::new(FnProvider {
            callback: Arc::clone(&self.callback),
        })
    }

    fn complete(&self) {}
}

/// Helper functions for creating providers
impl dyn ProgressProvider {
    /// Create a null provider
    pub fn null() -> Box<dyn ProgressProvider> {
        Box::new(NullProvider)
    }
}
