//! Session store and batch orchestration
//!
//! A [`Session`] owns the History for one interactive session. It is created
//! explicitly when the session starts and dropped when it ends; nothing is
//! kept in global state.
//!
//! `process_batch` runs one batch end to end: algorithm and file-count
//! checks, per-file validation, hashing, combining and appending. Validation
//! problems are collected into the [`BatchReport`] instead of aborting the
//! batch, and a file is only appended once every digest for it succeeded.

use crate::combiner::combine_with;
use crate::error::{InternalError, ValidationError};
use crate::format::{format_file_size, format_timestamp};
use crate::hashing::{CancellationToken, DigestMap, HashAlgorithm, HashCalculator};
use crate::progress::{ProgressProvider, ProgressUpdate};
use crate::record::FileRecord;
use crate::validation::{ValidationOutcome, Validator};
use crate::{EngineConfig, Error};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Snapshot of the History, oldest first
pub type History = Vec<Arc<HistoryEntry>>;

/// One hashed file
///
/// Fields are read-only after construction, and the combined digest is
/// always derived from the digests it was built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    file_name: String,
    file_size: u64,
    file_size_display: String,
    digests: DigestMap,
    combined: Option<String>,
    timestamp: String,
    elapsed: Duration,
}

impl HistoryEntry {
    /// Stamp a new entry with the current local time
    pub fn new(
        file_name: impl Into<String>,
        file_size: u64,
        digests: DigestMap,
        combiner: HashAlgorithm,
        timestamp_format: &str,
        elapsed: Duration,
    ) -> Self {
        let combined = combine_with(&digests, combiner);
        Self {
            file_name: file_name.into(),
            file_size,
            file_size_display: format_file_size(file_size),
            digests,
            combined,
            timestamp: format_timestamp(timestamp_format),
            elapsed,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn file_size_display(&self) -> &str {
        &self.file_size_display
    }

    pub fn digests(&self) -> &DigestMap {
        &self.digests
    }

    pub fn combined(&self) -> Option<&str> {
        self.combined.as_deref()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// A file that passed validation but could not be hashed
#[derive(Debug)]
pub struct FileFailure {
    pub name: String,
    pub error: Error,
}

/// Everything that happened to one batch, in submission order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Algorithms the batch was hashed with, empty if the selection was invalid
    pub algorithms: Vec<HashAlgorithm>,
    /// Problems with the batch as a whole
    pub batch_errors: Vec<ValidationError>,
    pub rejected: Vec<ValidationOutcome>,
    pub failed: Vec<FileFailure>,
    pub appended: Vec<Arc<HistoryEntry>>,
}

impl BatchReport {
    /// No batch error, rejection or failure
    pub fn is_clean(&self) -> bool {
        self.batch_errors.is_empty() && self.rejected.is_empty() && self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} hashed, {} rejected, {} failed",
            self.appended.len(),
            self.rejected.len(),
            self.failed.len()
        )
    }
}

/// In-memory History plus the engine settings used to fill it
#[derive(Debug)]
pub struct Session {
    config: EngineConfig,
    validator: Validator,
    calculator: HashCalculator,
    combiner: HashAlgorithm,
    history: RwLock<History>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        let combiner = config
            .combiner_algorithm
            .parse()
            .unwrap_or(crate::combiner::DEFAULT_COMBINER);
        Self {
            validator: Validator::new(&config),
            calculator: HashCalculator::from_engine_config(&config),
            combiner,
            config,
            history: RwLock::new(Vec::new()),
        }
    }

    /// Replace the calculator, e.g. to force a strategy
    pub fn with_calculator(mut self, calculator: HashCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn combiner(&self) -> HashAlgorithm {
        self.combiner
    }

    pub fn append(&self, entry: HistoryEntry) -> Arc<HistoryEntry> {
        let entry = Arc::new(entry);
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&entry));
        entry
    }

    pub fn clear(&self) {
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Snapshot of every entry, oldest first
    pub fn all(&self) -> History {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate, hash and record one batch of files
    pub fn process_batch<S: AsRef<str>>(
        &self,
        records: &[FileRecord],
        algorithm_names: &[S],
        progress: &dyn ProgressProvider,
    ) -> BatchReport {
        self.process_batch_with_cancel(records, algorithm_names, progress, &CancellationToken::new())
    }

    /// As [`process_batch`](Self::process_batch); once `cancel` fires the
    /// current and remaining files are reported as failed
    pub fn process_batch_with_cancel<S: AsRef<str>>(
        &self,
        records: &[FileRecord],
        algorithm_names: &[S],
        progress: &dyn ProgressProvider,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        match self.validator.resolve_algorithms(algorithm_names) {
            Ok(algorithms) => report.algorithms = algorithms,
            Err(error) => {
                warn!("Algorithm selection rejected: {error}");
                report.batch_errors.push(error);
            }
        }

        let max_files = self.validator.max_files();
        let mut considered = records;
        if let Err(error) = self.validator.validate_file_count(records.len()) {
            warn!("File count rejected: {error}");
            if records.len() > max_files {
                considered = &records[..max_files];
                report
                    .rejected
                    .extend(records[max_files..].iter().map(|record| ValidationOutcome {
                        record: record.clone(),
                        accepted: false,
                        reason: Some(error.clone()),
                    }));
            }
            report.batch_errors.push(error);
        }

        let validated = self.validator.validate_files(considered);
        // Rejections keep submission order: validated files come first.
        let overflow = std::mem::take(&mut report.rejected);
        report.rejected = validated.rejected;
        report.rejected.extend(overflow);

        if report.algorithms.is_empty() {
            self.finish(&report, progress);
            return report;
        }

        let total = validated.accepted.len();
        for (index, record) in validated.accepted.iter().enumerate() {
            progress.report(ProgressUpdate::BatchProgress {
                current: index + 1,
                total,
                current_file: Some(record.name.clone()),
            });

            match self.hash_record(record, &report.algorithms, progress, cancel) {
                Ok(entry) => report.appended.push(self.append(entry)),
                Err(error) => {
                    warn!("Failed to hash {}: {error}", record.name);
                    report.failed.push(FileFailure {
                        name: record.name.clone(),
                        error,
                    });
                }
            }
        }

        self.finish(&report, progress);
        report
    }

    fn hash_record(
        &self,
        record: &FileRecord,
        algorithms: &[HashAlgorithm],
        progress: &dyn ProgressProvider,
        cancel: &CancellationToken,
    ) -> crate::Result<HistoryEntry> {
        if cancel.is_cancelled() {
            return Err(InternalError::cancelled(0, record.size).into());
        }
        record.ensure_loaded()?;

        let start = Instant::now();
        let digests =
            self.calculator
                .compute_digests_with_cancel(&record.payload, algorithms, progress, cancel)?;
        let elapsed = start.elapsed();
        debug!("Hashed {} ({} bytes) in {elapsed:?}", record.name, record.size);

        Ok(HistoryEntry::new(
            record.name.clone(),
            record.size,
            digests,
            self.combiner,
            &self.config.timestamp_format,
            elapsed,
        ))
    }

    fn finish(&self, report: &BatchReport, progress: &dyn ProgressProvider) {
        let summary = report.summary();
        info!("Batch finished: {summary}");
        progress.report(ProgressUpdate::Status { message: summary });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProvider;
    use crate::progress::test_support::RecordingProvider;

    fn record(name: &str, len: usize) -> FileRecord {
        FileRecord::from_bytes(name, vec![b'x'; len])
    }

    #[test]
    fn test_session_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Session>();
    }

    #[test]
    fn test_entry_derives_combined() {
        let digests: DigestMap = [
            (HashAlgorithm::Md5, "aa".to_string()),
            (HashAlgorithm::Sha1, "bb".to_string()),
        ]
        .into_iter()
        .collect();
        let entry = HistoryEntry::new(
            "a.txt",
            1536,
            digests.clone(),
            HashAlgorithm::Sha256,
            "%Y",
            Duration::ZERO,
        );

        assert_eq!(entry.file_size_display(), "1.50 KB");
        assert_eq!(entry.combined(), combine_with(&digests, HashAlgorithm::Sha256).as_deref());
        assert_eq!(entry.timestamp().len(), 4);
    }

    #[test]
    fn test_append_and_clear() {
        let session = Session::default();
        for name in ["a", "b", "c"] {
            session.append(HistoryEntry::new(
                name,
                1,
                DigestMap::new(),
                HashAlgorithm::Sha256,
                "%H",
                Duration::ZERO,
            ));
        }
        let names: Vec<_> = session.all().iter().map(|e| e.file_name().to_string()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        session.clear();
        assert_eq!(session.len(), 0);
        assert!(session.all().is_empty());
    }

    #[test]
    fn test_snapshot_is_independent_of_later_appends() {
        let session = Session::default();
        session.process_batch(&[record("one", 10)], &["md5"], &NullProvider);
        let snapshot = session.all();
        session.process_batch(&[record("two", 10)], &["md5"], &NullProvider);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_too_many_files_processes_first_max() {
        let session = Session::new(EngineConfig::test());
        let records: Vec<_> = (0..7).map(|i| record(&format!("f{i}"), 16)).collect();

        let report = session.process_batch(&records, &["sha1"], &NullProvider);

        assert_eq!(report.appended.len(), 5);
        assert_eq!(report.batch_errors, vec![ValidationError::too_many_files(7, 5)]);
        let rejected: Vec<_> = report.rejected.iter().map(|o| o.record.name.as_str()).collect();
        assert_eq!(rejected, ["f5", "f6"]);
    }

    #[test]
    fn test_invalid_selection_hashes_nothing_but_still_validates_files() {
        let session = Session::default();
        let report = session.process_batch(
            &[record("ok.txt", 3), record("empty.txt", 0)],
            &["md5", "sha1", "sha256", "sha512"],
            &NullProvider,
        );

        assert!(report.algorithms.is_empty());
        assert_eq!(report.batch_errors, vec![ValidationError::too_many_algorithms(4, 3)]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].reason, Some(ValidationError::FileEmpty));
        assert!(session.is_empty());
    }

    #[test]
    fn test_unloaded_record_fails_without_appending() {
        let session = Session::default();
        let report = session.process_batch(
            &[FileRecord::metadata_only("ghost.bin", 10), record("real.bin", 10)],
            &["md5"],
            &NullProvider,
        );

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "ghost.bin");
        assert_eq!(report.appended.len(), 1);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_cancelled_batch_appends_nothing() {
        let session = Session::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = session.process_batch_with_cancel(
            &[record("a", 100), record("b", 100)],
            &["md5", "sha1"],
            &NullProvider,
            &cancel,
        );

        assert_eq!(report.failed.len(), 2);
        assert!(report.failed.iter().all(|f| f.error.is_cancelled()));
        assert!(session.is_empty());
    }

    #[test]
    fn test_batch_progress_and_status() {
        let session = Session::default();
        let provider = RecordingProvider::default();
        session.process_batch(&[record("a", 5), record("b", 5)], &["md5"], &provider);

        let updates = provider.updates();
        assert!(updates.contains(&ProgressUpdate::BatchProgress {
            current: 2,
            total: 2,
            current_file: Some("b".to_string()),
        }));
        assert_eq!(
            updates.last(),
            Some(&ProgressUpdate::Status {
                message: "2 hashed, 0 rejected, 0 failed".to_string()
            })
        );
    }
}
