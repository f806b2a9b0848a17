use colored::*;
use filehash_core::Error as CoreError;
use filehash_core::HashAlgorithm;
use filehash_core::error::ValidationError;
use std::error::Error as StdError;
use std::fmt;

/// CLI-specific error type with semantic exit codes
#[derive(Debug)]
pub struct CliError {
    /// The main error message
    message: String,

    /// Error category for exit code determination
    category: ErrorCategory,

    /// Additional context information
    context: Vec<(String, String)>,

    /// Suggestions for recovery
    pub suggestions: Vec<String>,

    /// Source error if any
    source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Error categories that map to exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCategory {
    General,
    Misuse,
    Filesystem,
}

/// Semantic exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    Misuse = 2,
    FilesystemError = 4,
    /// Ctrl-C with no batch running
    Interrupted = 130,
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    fn with_category(message: &str, category: ErrorCategory) -> Self {
        Self {
            message: message.to_string(),
            category,
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Create a general error
    pub fn general(message: &str) -> Self {
        Self::with_category(message, ErrorCategory::General)
    }

    /// Create a command misuse error
    pub fn misuse(message: &str) -> Self {
        let mut error = Self::with_category(message, ErrorCategory::Misuse);
        error
            .suggestions
            .push("Run 'filehash --help' for usage information".to_string());
        error
    }

    /// Create a filesystem error
    pub fn filesystem(message: &str) -> Self {
        let mut error = Self::with_category(message, ErrorCategory::Filesystem);

        if message.contains("not found") {
            error
                .suggestions
                .push("Check if the file exists and the path is correct".to_string());
        } else if message.contains("Permission denied") {
            error.suggestions.push("Check file permissions".to_string());
        }

        error
    }

    /// Classify a core library error
    pub fn from_core(error: CoreError) -> Self {
        let mut cli_error = match &error {
            CoreError::Io(io) => {
                let mut cli_error = Self::filesystem(&error.to_string());
                if let Some(path) = &io.path {
                    cli_error
                        .context
                        .push(("path".to_string(), path.display().to_string()));
                }
                cli_error
            }
            CoreError::Validation(validation) => Self::from_validation(validation),
            CoreError::Internal(_) => Self::general(&error.to_string()),
        };
        cli_error.source = Some(Box::new(error));
        cli_error
    }

    /// Classify a rejected selection or file
    pub fn from_validation(error: &ValidationError) -> Self {
        let mut cli_error = Self::misuse(&error.to_string());

        if let ValidationError::UnknownAlgorithm { name } = error {
            if let Some(closest) = closest_algorithm(name) {
                cli_error
                    .suggestions
                    .insert(0, format!("Did you mean '{closest}'?"));
            }
            cli_error
                .suggestions
                .push("Run 'filehash algorithms' to list supported algorithms".to_string());
        }

        cli_error
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.push((key.to_string(), value.to_string()));
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self.category {
            ErrorCategory::General => ExitCode::GeneralError,
            ErrorCategory::Misuse => ExitCode::Misuse,
            ErrorCategory::Filesystem => ExitCode::FilesystemError,
        }
    }

    fn prefix(&self) -> &'static str {
        match self.category {
            ErrorCategory::General => "Error",
            ErrorCategory::Misuse => "Usage Error",
            ErrorCategory::Filesystem => "File Error",
        }
    }

    /// Format the error for user display
    pub fn format_for_user(&self, debug: bool) -> String {
        let mut output = String::new();

        let prefix = match self.category {
            ErrorCategory::Misuse => self.prefix().yellow(),
            _ => self.prefix().red(),
        };
        output.push_str(&format!("{}: {}\n", prefix, self.message));

        if !self.context.is_empty() {
            output.push_str("\nContext:\n");
            for (key, value) in &self.context {
                output.push_str(&format!("  {}: {}\n", key.bold(), value));
            }
        }

        if debug && let Some(source) = &self.source {
            output.push_str("\nCaused by:\n");
            let mut current: Option<&dyn StdError> = Some(source.as_ref());
            let mut level = 1;

            while let Some(err) = current {
                output.push_str(&format!("  {level}: {err}\n"));
                current = err.source();
                level += 1;
            }
        }

        if !self.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in &self.suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.prefix(), self.message)?;

        for (key, value) in &self.context {
            write!(f, " ({key}: {value})")?;
        }

        Ok(())
    }
}

impl StdError for CliError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        Self::from_core(error)
    }
}

/// Exit code for an error that reached `main`
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if let Some(cli_error) = error.downcast_ref::<CliError>() {
        return cli_error.exit_code();
    }
    match error.downcast_ref::<CoreError>() {
        Some(CoreError::Io(_)) => ExitCode::FilesystemError,
        Some(CoreError::Validation(_)) => ExitCode::Misuse,
        _ => ExitCode::GeneralError,
    }
}

/// Registered algorithm whose display name is closest to `name`
fn closest_algorithm(name: &str) -> Option<HashAlgorithm> {
    let wanted = name.to_ascii_uppercase();
    HashAlgorithm::ALL
        .iter()
        .map(|algorithm| {
            let distance = levenshtein_distance(&wanted, algorithm.display_name());
            (distance, *algorithm)
        })
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, algorithm)| algorithm)
}

/// Simple Levenshtein distance for algorithm suggestions
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s2_chars: Vec<char> = s2.chars().collect();
    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();

    for (i, c1) in s1.chars().enumerate() {
        let mut current = vec![i + 1; s2_chars.len() + 1];
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != *c2);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[s2_chars.len()]
}
