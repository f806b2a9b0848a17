//! Rendering and export of the session History

mod export;
mod formatters;
mod table;
mod template_helpers;

pub use export::{ExportedFiles, export_filename, export_stem, write_exports};
pub use formatters::{CsvFormatter, JsonFormatter, TemplateFormatter, TextFormatter};
pub use table::{DetailFormatter, TableFormatter};

use anyhow::Result;
use filehash_core::{HashAlgorithm, HistoryEntry};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Text,
    Csv,
    Json,
    Template,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "template" => Ok(Self::Template),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// Trait for History renderers
pub trait OutputFormatter: Send + Sync {
    /// Render the entries, oldest first
    fn format_history(&self, history: &[Arc<HistoryEntry>]) -> Result<String>;
}

/// Options shared by the formatters
#[derive(Debug, Clone)]
pub struct FormatOptions<'a> {
    pub use_color: bool,
    pub template: Option<&'a str>,
    /// Combiner named in the text report note
    pub combiner: HashAlgorithm,
    /// strftime format for the report's generation time
    pub timestamp_format: &'a str,
    /// Truncate digests in the table to this many characters
    pub hash_width: Option<usize>,
}

/// Create a formatter based on output format
pub fn create_formatter(
    format: OutputFormat,
    options: &FormatOptions<'_>,
) -> Result<Box<dyn OutputFormatter>> {
    match format {
        OutputFormat::Table => Ok(Box::new(TableFormatter::new(
            options.use_color,
            options.hash_width,
        ))),
        OutputFormat::Text => Ok(Box::new(TextFormatter::new(
            options.combiner,
            options.timestamp_format,
        ))),
        OutputFormat::Csv => Ok(Box::new(CsvFormatter::new())),
        OutputFormat::Json => Ok(Box::new(JsonFormatter::new(true))),
        OutputFormat::Template => {
            let template = options
                .template
                .ok_or_else(|| anyhow::anyhow!("Template format requires --template argument"))?;
            Ok(Box::new(TemplateFormatter::new(template)?))
        }
    }
}

/// Union of the algorithms used across the History, in display-name order
pub fn algorithm_columns(history: &[Arc<HistoryEntry>]) -> Vec<HashAlgorithm> {
    history
        .iter()
        .flat_map(|entry| entry.digests().algorithms())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether any entry carries a combined digest
pub fn has_combined(history: &[Arc<HistoryEntry>]) -> bool {
    history.iter().any(|entry| entry.combined().is_some())
}


#[cfg(test)]
mod tests {
    use super::test_support::entry;
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_string("CSV").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_string("txt").unwrap(), OutputFormat::Text);
        assert!(OutputFormat::from_string("yaml").is_err());
    }

    #[test]
    fn test_algorithm_columns_are_union_in_display_order() {
        let history = vec![
            entry("a", 1, &[HashAlgorithm::Sha256]),
            entry("b", 1, &[HashAlgorithm::Md5, HashAlgorithm::Blake2b]),
        ];
        assert_eq!(
            algorithm_columns(&history),
            vec![
                HashAlgorithm::Blake2b,
                HashAlgorithm::Md5,
                HashAlgorithm::Sha256
            ]
        );
        assert!(has_combined(&history));
        assert!(!has_combined(&history[..1]));
    }

    #[test]
    fn test_template_format_requires_template() {
        let options = FormatOptions {
            use_color: false,
            template: None,
            combiner: HashAlgorithm::Sha256,
            timestamp_format: "%Y",
            hash_width: None,
        };
        assert!(create_formatter(OutputFormat::Template, &options).is_err());
        assert!(create_formatter(OutputFormat::Json, &options).is_ok());
    }
}
