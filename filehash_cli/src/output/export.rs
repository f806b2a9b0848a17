//! Export files written next to the user's results

use super::{CsvFormatter, OutputFormatter, TextFormatter};
use anyhow::{Context, Result};
use filehash_core::HistoryEntry;
use filehash_core::format::export_timestamp;
use handlebars::Handlebars;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Paths of one text and CSV export pair
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub text: PathBuf,
    pub csv: PathBuf,
}

/// Export file name from a template such as `hash_results_{{timestamp}}`
///
/// `{{timestamp}}` expands to `YYYYMMDD_HHMMSS`.
pub fn export_filename(template: &str, extension: &str) -> Result<String> {
    Ok(format!("{}.{extension}", export_stem(template)?))
}

/// Rendered export name without extension
pub fn export_stem(template: &str) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    let stem = handlebars
        .render_template(template, &json!({ "timestamp": export_timestamp() }))
        .context("Invalid export file name template")?;

    if stem.is_empty() || stem.contains(['/', '\\']) {
        anyhow::bail!("Export file name template must render to a plain file name");
    }

    Ok(stem)
}

/// Write the History as `.txt` and `.csv` into `dir`
pub fn write_exports(
    dir: &Path,
    filename_template: &str,
    history: &[Arc<HistoryEntry>],
    text: &TextFormatter,
) -> Result<ExportedFiles> {
    if history.is_empty() {
        anyhow::bail!("Nothing to export: no files have been hashed");
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    // One stem so both files carry the same timestamp
    let stem = export_stem(filename_template)?;
    let files = ExportedFiles {
        text: dir.join(format!("{stem}.txt")),
        csv: dir.join(format!("{stem}.csv")),
    };

    fs::write(&files.text, text.format_history(history)?)
        .with_context(|| format!("Failed to write {}", files.text.display()))?;
    fs::write(&files.csv, CsvFormatter::new().format_history(history)?)
        .with_context(|| format!("Failed to write {}", files.csv.display()))?;

    log::info!(
        "Exported {} entries to {} and {}",
        history.len(),
        files.text.display(),
        files.csv.display()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::entry;
    use filehash_core::HashAlgorithm;
    use tempfile::TempDir;

    #[test]
    fn test_export_filename_expands_timestamp() {
        let name = export_filename("hash_results_{{timestamp}}", "csv").unwrap();
        let stamp = name
            .strip_prefix("hash_results_")
            .and_then(|rest| rest.strip_suffix(".csv"))
            .unwrap();

        // YYYYMMDD_HHMMSS
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'_');
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_export_filename_rejects_paths() {
        assert!(export_filename("../{{timestamp}}", "txt").is_err());
        assert!(export_filename("", "txt").is_err());
    }

    #[test]
    fn test_write_exports_creates_both_files() {
        let dir = TempDir::new().unwrap();
        let history = vec![entry("a.txt", 5, &[HashAlgorithm::Md5, HashAlgorithm::Sha1])];
        let text = TextFormatter::new(HashAlgorithm::Sha256, "%Y-%m-%d");

        let files = write_exports(dir.path(), "report", &history, &text).unwrap();

        assert!(files.text.ends_with("report.txt"));
        let report = fs::read_to_string(&files.text).unwrap();
        assert!(report.contains("FILE HASH RESULTS"));
        assert!(report.contains("File #1: a.txt"));

        let csv = fs::read_to_string(&files.csv).unwrap();
        assert!(csv.starts_with("File Name,File Size,Timestamp,MD5,SHA-1,Combined Hash"));
    }

    #[test]
    fn test_export_pair_shares_timestamp() {
        let dir = TempDir::new().unwrap();
        let history = vec![entry("a.txt", 5, &[HashAlgorithm::Md5])];
        let text = TextFormatter::new(HashAlgorithm::Sha256, "%Y-%m-%d");

        let files =
            write_exports(dir.path(), "hash_results_{{timestamp}}", &history, &text).unwrap();

        assert_eq!(files.text.file_stem(), files.csv.file_stem());
        assert_eq!(files.text.extension().unwrap(), "txt");
        assert_eq!(files.csv.extension().unwrap(), "csv");
    }

    #[test]
    fn test_write_exports_refuses_empty_history() {
        let dir = TempDir::new().unwrap();
        let text = TextFormatter::new(HashAlgorithm::Sha256, "%Y");
        assert!(write_exports(dir.path(), "report", &[], &text).is_err());
    }
}
