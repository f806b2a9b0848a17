//! Interactive session
//!
//! One [`Session`] lives for the whole shell. Files are staged with `add`,
//! hashed together with `hash`, and the History can be reviewed, exported
//! and cleared until the user quits.

use super::hash_orchestrator::{InterruptGuard, build_session, run_batch};
use crate::config::AppConfig;
use crate::intake;
use crate::output::{DetailFormatter, OutputFormatter, TableFormatter, TextFormatter, write_exports};
use crate::terminal;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input};
use filehash_core::format::pluralize;
use filehash_core::{BatchReport, FileRecord, Session, StrategyHint};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

const HELP: &str = "\
Commands:
  add <path>...        stage files for the next hash
  algorithms [name]... show or choose the algorithms to use
  hash                 hash the staged files
  history              show the results table
  details              show every digest in full
  export [dir]         write .txt and .csv exports (default: current directory)
  clear                forget every result
  help                 show this help
  quit                 leave the session";

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(Vec<PathBuf>),
    Algorithms(Vec<String>),
    Hash,
    History,
    Details,
    Export(Option<PathBuf>),
    Clear,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse a line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let parsed = match command.to_lowercase().as_str() {
            "add" => {
                if args.is_empty() {
                    anyhow::bail!("Usage: add <path>...");
                }
                Self::Add(args.iter().map(PathBuf::from).collect())
            }
            "algorithms" | "algo" => {
                Self::Algorithms(args.iter().map(|s| s.to_string()).collect())
            }
            "hash" => Self::Hash,
            "history" | "ls" => Self::History,
            "details" | "show" => Self::Details,
            "export" => Self::Export(args.first().map(PathBuf::from)),
            "clear" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => anyhow::bail!("Unknown command: {other}. Type 'help' for commands."),
        };
        Ok(Some(parsed))
    }
}

/// What the loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Shell state: the session, staged files and the algorithm selection
pub struct SessionShell {
    config: AppConfig,
    session: Arc<Session>,
    staged: Vec<FileRecord>,
    algorithms: Vec<String>,
    show_progress: bool,
    use_color: bool,
    interrupts: InterruptGuard,
}

impl SessionShell {
    pub fn new(config: AppConfig, show_progress: bool, use_color: bool) -> Self {
        let session = Arc::new(build_session(&config.engine, StrategyHint::Automatic));
        let algorithms = vec![config.engine.default_algorithm().display_name().to_string()];
        Self {
            config,
            session,
            staged: Vec::new(),
            algorithms,
            show_progress,
            use_color,
            interrupts: InterruptGuard::default(),
        }
    }

    /// Route Ctrl-C through `interrupts` while batches run
    pub fn with_interrupts(mut self, interrupts: InterruptGuard) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    /// Run one command
    pub async fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        let output = match command {
            ShellCommand::Add(paths) => self.add(&paths).await,
            ShellCommand::Algorithms(names) => self.select_algorithms(names)?,
            ShellCommand::Hash => self.hash().await?,
            ShellCommand::History => TableFormatter::new(self.use_color, Some(24))
                .format_history(&self.session.all())?,
            ShellCommand::Details => {
                if self.session.is_empty() {
                    "No files hashed yet.\n".to_string()
                } else {
                    DetailFormatter::new(self.use_color).format_history(&self.session.all())?
                }
            }
            ShellCommand::Export(dir) => self.export(dir)?,
            ShellCommand::Clear => {
                let count = self.session.len();
                self.session.clear();
                format!("Cleared {}.\n", pluralize(count, "entry", Some("entries")))
            }
            ShellCommand::Help => format!("{HELP}\n"),
            ShellCommand::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(output))
    }

    async fn add(&mut self, paths: &[PathBuf]) -> String {
        let intake = intake::read_files(paths, self.config.engine.max_file_size).await;
        let mut output = String::new();

        for record in &intake.records {
            output.push_str(&format!("Staged {} ({} bytes)\n", record.name, record.size));
        }
        for (path, error) in &intake.failures {
            output.push_str(&format!("{} {}: {error}\n", "✗".red(), path.display()));
        }

        self.staged.extend(intake.records);
        output.push_str(&format!(
            "{} staged.\n",
            pluralize(self.staged.len(), "file", None)
        ));
        output
    }

    fn select_algorithms(&mut self, names: Vec<String>) -> Result<String> {
        if !names.is_empty() {
            let resolved = self.session.validator().resolve_algorithms(&names)?;
            self.algorithms = resolved
                .iter()
                .map(|a| a.display_name().to_string())
                .collect();
        }
        Ok(format!("Algorithms: {}\n", self.algorithms.join(", ")))
    }

    async fn hash(&mut self) -> Result<String> {
        if self.staged.is_empty() {
            return Ok("No files staged. Use 'add <path>...' first.\n".to_string());
        }

        let records = std::mem::take(&mut self.staged);
        let report = run_batch(
            Arc::clone(&self.session),
            records,
            self.algorithms.clone(),
            self.show_progress,
            &self.interrupts,
        )
        .await?;

        let mut output = describe_report(&report);
        if !report.appended.is_empty() {
            output.push_str(
                &TableFormatter::new(self.use_color, Some(24)).format_history(&report.appended)?,
            );
        }
        Ok(output)
    }

    fn export(&self, dir: Option<PathBuf>) -> Result<String> {
        let dir = dir.unwrap_or_else(|| PathBuf::from("."));
        let text = TextFormatter::new(self.session.combiner(), &self.config.engine.timestamp_format);
        let files = write_exports(
            &dir,
            &self.config.output.export_filename_template,
            &self.session.all(),
            &text,
        )?;
        Ok(format!(
            "Exported {} and {}\n",
            files.text.display(),
            files.csv.display()
        ))
    }
}

/// Summary plus one line per problem
fn describe_report(report: &BatchReport) -> String {
    let mut output = String::new();
    for error in &report.batch_errors {
        output.push_str(&format!("{} {error}\n", "✗".red()));
    }
    for outcome in &report.rejected {
        if let Some(reason) = &outcome.reason {
            output.push_str(&format!("{} {}: {reason}\n", "✗".yellow(), outcome.record.name));
        }
    }
    for failure in &report.failed {
        output.push_str(&format!("{} {}: {}\n", "✗".red(), failure.name, failure.error));
    }
    output.push_str(&format!("{}\n", report.summary()));
    output
}

fn read_line(interactive: bool) -> Result<Option<String>> {
    if interactive {
        let line: String = Input::new()
            .with_prompt("filehash")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;
        return Ok(Some(line));
    }

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok((read > 0).then_some(line))
}

/// Run the shell until `quit` or end of input
pub async fn run(config: AppConfig) -> Result<()> {
    let interactive = terminal::can_prompt();
    let show_progress = interactive && terminal::should_show_progress(config.output.progress_enabled);
    let use_color = terminal::should_use_color(config.output.color_enabled);
    let mut shell = SessionShell::new(config, show_progress, use_color)
        .with_interrupts(InterruptGuard::install());

    if interactive {
        eprintln!("{}", "filehash session".bold());
        eprintln!("Type 'help' for commands, 'quit' to leave.");
    }

    while let Some(line) = read_line(interactive)? {
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e.to_string().yellow());
                continue;
            }
        };

        if command == ShellCommand::Clear
            && interactive
            && !shell.session().is_empty()
            && !Confirm::new()
                .with_prompt("Clear all results?")
                .default(false)
                .interact()
                .context("Failed to read input")?
        {
            continue;
        }

        match shell.execute(command).await {
            Ok(Flow::Continue(output)) => print!("{output}"),
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("{}", format!("Error: {e:#}").red()),
        }
    }

    log::debug!("Session ended with {} entries", shell.session().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn shell() -> SessionShell {
        SessionShell::new(AppConfig::default(), false, false)
    }

    fn text(flow: Flow) -> String {
        match flow {
            Flow::Continue(output) => output,
            Flow::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
        assert_eq!(
            ShellCommand::parse("add a.txt b.txt").unwrap(),
            Some(ShellCommand::Add(vec!["a.txt".into(), "b.txt".into()]))
        );
        assert_eq!(
            ShellCommand::parse("export out").unwrap(),
            Some(ShellCommand::Export(Some("out".into())))
        );
        assert_eq!(ShellCommand::parse("QUIT").unwrap(), Some(ShellCommand::Quit));
        assert!(ShellCommand::parse("add").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
    }

    #[tokio::test]
    async fn test_add_hash_history_clear() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("one.txt");
        let second = dir.path().join("two.txt");
        std::fs::write(&first, b"abc").unwrap();
        std::fs::write(&second, b"hello world").unwrap();

        let mut shell = shell();
        text(shell
            .execute(ShellCommand::Algorithms(vec!["md5".into(), "sha1".into()]))
            .await
            .unwrap());
        let added = text(shell
            .execute(ShellCommand::Add(vec![first, second]))
            .await
            .unwrap());
        assert!(added.contains("2 files staged."));

        let hashed = text(shell.execute(ShellCommand::Hash).await.unwrap());
        assert!(hashed.contains("2 hashed, 0 rejected, 0 failed"));
        assert_eq!(shell.session().len(), 2);
        assert_eq!(shell.staged(), 0);

        let details = text(shell.execute(ShellCommand::Details).await.unwrap());
        assert!(details.contains("900150983cd24fb0d6963f7d28e17f72"));
        assert!(details.contains("Combined (2 algorithms)"));

        let cleared = text(shell.execute(ShellCommand::Clear).await.unwrap());
        assert_eq!(cleared, "Cleared 2 entries.\n");
        assert!(shell.session().is_empty());
    }

    #[tokio::test]
    async fn test_hash_without_staged_files() {
        let mut shell = shell();
        let output = text(shell.execute(ShellCommand::Hash).await.unwrap());
        assert!(output.starts_with("No files staged"));
    }

    #[tokio::test]
    async fn test_unknown_algorithm_keeps_previous_selection() {
        let mut shell = shell();
        assert!(shell
            .execute(ShellCommand::Algorithms(vec!["whirlpool".into()]))
            .await
            .is_err());
        let output = text(shell.execute(ShellCommand::Algorithms(vec![])).await.unwrap());
        assert_eq!(output, "Algorithms: SHA-256\n");
    }

    #[tokio::test]
    async fn test_export_writes_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("data.bin");
        std::fs::write(&file, b"data").unwrap();

        let mut shell = shell();
        text(shell.execute(ShellCommand::Add(vec![file])).await.unwrap());
        text(shell.execute(ShellCommand::Hash).await.unwrap());

        let out_dir = dir.path().join("exports");
        let output = text(shell
            .execute(ShellCommand::Export(Some(out_dir.clone())))
            .await
            .unwrap());
        assert!(output.starts_with("Exported "));
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_quit() {
        let mut shell = shell();
        assert_eq!(shell.execute(ShellCommand::Quit).await.unwrap(), Flow::Quit);
    }
}
