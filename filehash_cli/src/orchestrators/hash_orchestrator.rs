//! Hash command orchestrator
//!
//! Reads the files, runs one batch through a fresh [`Session`] on the
//! blocking pool, and reports what happened to every submitted path.

use crate::error::{CliError, ExitCode};
use crate::intake::{self, Intake};
use crate::output::{
    ExportedFiles, FormatOptions, OutputFormat, TextFormatter, create_formatter, write_exports,
};
use crate::progress::{create_progress_infrastructure, render_progress};
use anyhow::{Context, Result};
use colored::*;
use filehash_core::error::IoError;
use filehash_core::{
    BatchReport, CancellationToken, EngineConfig, FileRecord, HashAlgorithm, HashCalculator,
    HashConfig, NullProvider, ProgressProvider, Session, StrategyHint,
};
use log::debug;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Width digests are cut to in the interactive table
const TABLE_HASH_WIDTH: usize = 24;

/// Everything a hash run needs besides the engine settings
#[derive(Debug, Clone)]
pub struct HashOptions {
    pub paths: Vec<PathBuf>,
    /// Algorithm names as typed by the user
    pub algorithms: Vec<String>,
    pub strategy: StrategyHint,
    pub show_progress: bool,
}

/// Result of one batch, before anything is printed
pub struct HashRun {
    pub session: Arc<Session>,
    pub report: BatchReport,
    pub read_failures: Vec<(PathBuf, IoError)>,
    pub elapsed: Duration,
}

impl HashRun {
    /// Bytes hashed across every appended entry
    pub fn bytes_hashed(&self) -> u64 {
        self.report.appended.iter().map(|e| e.file_size()).sum()
    }

    /// Turn a run that hashed nothing into an error carrying the right exit code
    pub fn ensure_hashed(&self) -> Result<(), CliError> {
        if !self.report.appended.is_empty() {
            return Ok(());
        }

        if let Some(error) = self.report.batch_errors.first()
            && self.report.algorithms.is_empty()
        {
            return Err(CliError::from_validation(error));
        }

        if self.report.rejected.is_empty()
            && self.report.failed.is_empty()
            && let Some((path, error)) = self.read_failures.first()
        {
            return Err(CliError::filesystem(&error.to_string())
                .with_context("path", &path.display().to_string()));
        }

        Err(CliError::general("No files were hashed"))
    }
}

/// Routes Ctrl-C to the running batch
///
/// One listener serves the whole process. An interrupt while a batch runs
/// cancels that batch; with nothing running the process exits.
#[derive(Clone, Default)]
pub struct InterruptGuard {
    active: Arc<Mutex<Option<CancellationToken>>>,
}

impl InterruptGuard {
    /// Install the process-wide Ctrl-C listener
    pub fn install() -> Self {
        let guard = Self::default();
        let listener = guard.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if !listener.interrupt() {
                    std::process::exit(ExitCode::Interrupted as i32);
                }
            }
        });
        guard
    }

    /// Cancel the running batch; false when nothing is running
    pub fn interrupt(&self) -> bool {
        match self.slot().as_ref() {
            Some(token) => {
                debug!("Interrupted, cancelling batch");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Token for a batch that Ctrl-C should cancel
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.slot() = Some(token.clone());
        token
    }

    /// The batch is over; Ctrl-C exits again
    pub fn end(&self) {
        self.slot().take();
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Build the session a run hashes into
pub fn build_session(engine: &EngineConfig, strategy: StrategyHint) -> Session {
    let calculator = HashCalculator::with_hint(strategy)
        .with_config(HashConfig::with_chunk_size(engine.chunk_size));
    Session::new(engine.clone()).with_calculator(calculator)
}

/// Read and hash the files in `options` as one batch
pub async fn hash_paths(
    engine: &EngineConfig,
    options: &HashOptions,
    interrupts: &InterruptGuard,
) -> Result<HashRun> {
    let start = Instant::now();
    let Intake { records, failures } =
        intake::read_files(&options.paths, engine.max_file_size).await;
    debug!(
        "Read {} file(s), {} unreadable",
        records.len(),
        failures.len()
    );

    let session = Arc::new(build_session(engine, options.strategy));
    let report = if records.is_empty() {
        BatchReport::default()
    } else {
        run_batch(
            Arc::clone(&session),
            records,
            options.algorithms.clone(),
            options.show_progress,
            interrupts,
        )
        .await?
    };

    Ok(HashRun {
        session,
        report,
        read_failures: failures,
        elapsed: start.elapsed(),
    })
}

/// Run one batch on the blocking pool, rendering progress and honouring Ctrl-C
pub async fn run_batch(
    session: Arc<Session>,
    records: Vec<FileRecord>,
    algorithms: Vec<String>,
    show_progress: bool,
    interrupts: &InterruptGuard,
) -> Result<BatchReport> {
    let (provider, progress_handle) = if show_progress {
        let (provider, rx) = create_progress_infrastructure();
        (provider, Some(tokio::spawn(render_progress(rx))))
    } else {
        (Arc::new(NullProvider) as Arc<dyn ProgressProvider>, None)
    };

    let cancel = interrupts.begin();
    let batch_provider = Arc::clone(&provider);
    let result = tokio::task::spawn_blocking(move || {
        session.process_batch_with_cancel(
            &records,
            &algorithms,
            batch_provider.as_ref(),
            &cancel,
        )
    })
    .await;

    interrupts.end();
    provider.complete();
    if let Some(handle) = progress_handle {
        let _ = handle.await;
    }

    result.context("Hashing task failed")
}

/// Print rejections and failures on stderr
pub fn print_problems(run: &HashRun) {
    for (path, error) in &run.read_failures {
        eprintln!("{} {}: {error}", "✗".red(), path.display());
    }
    for error in &run.report.batch_errors {
        eprintln!("{} {error}", "✗".red());
    }
    for outcome in &run.report.rejected {
        if let Some(reason) = &outcome.reason {
            eprintln!("{} {}: {reason}", "✗".yellow(), outcome.record.name);
        }
    }
    for failure in &run.report.failed {
        eprintln!("{} {}: {}", "✗".red(), failure.name, failure.error);
    }
}

/// Presentation settings for the hash command
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub template: Option<String>,
    pub use_color: bool,
    pub interactive: bool,
    pub export_dir: Option<PathBuf>,
    pub export_filename_template: String,
}

/// Render the run's entries and write exports when requested
pub fn render_run(run: &HashRun, render: &RenderOptions) -> Result<Option<ExportedFiles>> {
    let history = run.session.all();
    let config = run.session.config();
    let options = FormatOptions {
        use_color: render.use_color,
        template: render.template.as_deref(),
        combiner: run.session.combiner(),
        timestamp_format: &config.timestamp_format,
        hash_width: render.interactive.then_some(TABLE_HASH_WIDTH),
    };

    let formatter = create_formatter(render.format, &options)?;
    let output = formatter.format_history(&history)?;
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }

    let Some(dir) = &render.export_dir else {
        return Ok(None);
    };
    let text = TextFormatter::new(run.session.combiner(), &config.timestamp_format);
    let files = write_exports(dir, &render.export_filename_template, &history, &text)?;
    eprintln!(
        "{} Exported {} and {}",
        "✓".green(),
        files.text.display(),
        files.csv.display()
    );
    Ok(Some(files))
}

/// Resolve a `--combiner` override against the registry
pub fn apply_combiner_override(engine: &mut EngineConfig, combiner: Option<&str>) -> Result<()> {
    if let Some(name) = combiner {
        let algorithm: HashAlgorithm = name
            .parse()
            .map_err(CliError::from_core)
            .context("Invalid --combiner")?;
        engine.combiner_algorithm = algorithm.display_name().to_string();
    }
    Ok(())
}
