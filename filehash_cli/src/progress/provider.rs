//! Channel-backed progress provider
//!
//! Bridges the engine's synchronous [`ProgressProvider`] calls, made from a
//! blocking hashing thread, to the async renderer.

use filehash_core::progress::{ProgressProvider, ProgressUpdate};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// Capacity of the progress channel
pub const PROGRESS_CHANNEL_CAPACITY: usize = 100;

/// Progress provider that forwards updates to a rendering task
///
/// Sends never block: when the renderer falls behind, byte updates are
/// dropped and the next one supersedes them.
pub struct ChannelProvider {
    tx: Mutex<Option<mpsc::Sender<ProgressUpdate>>>,
    name: Option<String>,
}

impl ChannelProvider {
    pub fn new(tx: mpsc::Sender<ProgressUpdate>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
            name: None,
        }
    }

    fn sender(&self) -> Option<mpsc::Sender<ProgressUpdate>> {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressProvider for ChannelProvider {
    fn report(&self, update: ProgressUpdate) {
        let update = match (&self.name, update) {
            (Some(name), ProgressUpdate::Status { message }) => ProgressUpdate::Status {
                message: format!("[{name}] {message}"),
            },
            (_, update) => update,
        };

        if let Some(tx) = self.sender() {
            let _ = tx.try_send(update);
        }
    }

    fn create_child(&self, name: &str) -> Box<dyn ProgressProvider> {
        let name = match &self.name {
            Some(parent) => format!("{parent}/{name}"),
            None => name.to_string(),
        };
        Box::new(ChannelProvider {
            tx: Mutex::new(self.sender()),
            name: Some(name),
        })
    }

    fn complete(&self) {
        // Dropping the sender lets the renderer leave its loop
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Create a provider and the receiver its updates arrive on
pub fn create_progress_infrastructure()
-> (Arc<dyn ProgressProvider>, mpsc::Receiver<ProgressUpdate>) {
    let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
    let provider = Arc::new(ChannelProvider::new(tx)) as Arc<dyn ProgressProvider>;
    (provider, rx)
}
