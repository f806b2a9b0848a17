//! Progress rendering for the CLI
//!
//! Turns [`ProgressUpdate`]s into `indicatif` bars on stderr: one byte bar
//! for the file being hashed and, for multi-file batches, a file-count bar.

use colored::*;
use filehash_core::progress::ProgressUpdate;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::mpsc;

const FILE_TEMPLATE: &str =
    "{spinner:.green} {msg} [{bar:40.cyan/blue}] {percent}% | {bytes}/{total_bytes} | {bytes_per_sec}";
const BATCH_TEMPLATE: &str = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files";

/// Render progress updates until every sender is gone
pub async fn render_progress(mut rx: mpsc::Receiver<ProgressUpdate>) {
    let mut renderer = ProgressRenderer::new();

    while let Some(update) = rx.recv().await {
        renderer.handle_update(update);
    }

    renderer.finish();
}

fn style(template: &str, chars: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .map(|style| style.progress_chars(chars))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Progress renderer that manages the visible bars
pub struct ProgressRenderer {
    multi: MultiProgress,
    file_bar: Option<ProgressBar>,
    batch_bar: Option<ProgressBar>,
    current_file: Option<String>,
    statuses: Vec<String>,
}

impl ProgressRenderer {
    /// Renderer drawing to stderr
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Renderer that tracks state without drawing
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            file_bar: None,
            batch_bar: None,
            current_file: None,
            statuses: Vec::new(),
        }
    }

    /// Handle a progress update
    pub fn handle_update(&mut self, update: ProgressUpdate) {
        match update {
            ProgressUpdate::HashProgress {
                bytes_processed,
                total_bytes,
            } => self.update_hash_progress(bytes_processed, total_bytes),

            ProgressUpdate::BatchProgress {
                current,
                total,
                current_file,
            } => self.update_batch_progress(current, total, current_file),

            ProgressUpdate::Status { message } => self.show_status(message),
        }
    }

    fn update_hash_progress(&mut self, bytes_processed: u64, total_bytes: u64) {
        let bar = self.file_bar.get_or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new(total_bytes));
            bar.set_style(style(FILE_TEMPLATE, "#>-"));
            let label = self.current_file.as_deref().unwrap_or("Hashing");
            bar.set_message(label.cyan().to_string());
            bar
        });

        bar.set_position(bytes_processed.min(total_bytes));
    }

    fn update_batch_progress(&mut self, current: usize, total: usize, current_file: Option<String>) {
        // A new file starts with a fresh byte bar
        if let Some(bar) = self.file_bar.take() {
            bar.finish_and_clear();
        }
        self.current_file = current_file;

        if total > 1 {
            let bar = self.batch_bar.get_or_insert_with(|| {
                let bar = self.multi.insert(0, ProgressBar::new(total as u64));
                bar.set_style(style(BATCH_TEMPLATE, "##-"));
                bar
            });
            bar.set_position(current.saturating_sub(1) as u64);
        }
    }

    fn show_status(&mut self, message: String) {
        let _ = self.multi.println(format!("{} {}", "→".green(), message));
        self.statuses.push(message);
    }

    /// Bytes shown on the current file bar
    pub fn file_position(&self) -> Option<u64> {
        self.file_bar.as_ref().map(ProgressBar::position)
    }

    /// Files completed according to the batch bar
    pub fn batch_position(&self) -> Option<u64> {
        self.batch_bar.as_ref().map(ProgressBar::position)
    }

    /// Status messages seen so far
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    /// Finish all progress bars
    pub fn finish(self) {
        if let Some(bar) = self.file_bar {
            bar.finish_and_clear();
        }

        if let Some(bar) = self.batch_bar {
            if let Some(len) = bar.length() {
                bar.set_position(len);
            }
            bar.finish_with_message("✓ Batch complete".green().to_string());
        }
    }
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}
