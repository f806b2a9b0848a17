use super::{OutputFormatter, algorithm_columns, has_combined};
use anyhow::Result;
use filehash_core::format::format_timestamp;
use filehash_core::{HashAlgorithm, HistoryEntry};
use handlebars::Handlebars;
use serde_json::{Map, Value, json};
use std::sync::Arc;

const RULE_WIDTH: usize = 80;

/// Plain-text report, the layout used for `.txt` exports
pub struct TextFormatter {
    combiner: HashAlgorithm,
    timestamp_format: String,
}

impl TextFormatter {
    pub fn new(combiner: HashAlgorithm, timestamp_format: &str) -> Self {
        Self {
            combiner,
            timestamp_format: timestamp_format.to_string(),
        }
    }

    /// Render the report with an explicit generation time
    pub fn format_report(&self, history: &[Arc<HistoryEntry>], generated: &str) -> String {
        if history.is_empty() {
            return String::new();
        }

        let banner = "=".repeat(RULE_WIDTH);
        let rule = "-".repeat(RULE_WIDTH);
        let mut lines = vec![
            banner.clone(),
            "FILE HASH RESULTS".to_string(),
            banner.clone(),
            format!("Generated: {generated}"),
            format!("Total Files: {}", history.len()),
            String::new(),
        ];

        for (index, entry) in history.iter().enumerate() {
            lines.push(rule.clone());
            lines.push(format!("File #{}: {}", index + 1, entry.file_name()));
            lines.push(format!("Size: {}", entry.file_size_display()));
            lines.push(format!("Processed: {}", entry.timestamp()));
            lines.push(rule.clone());

            for (algorithm, hex) in entry.digests().iter() {
                lines.push(format!("{:12} : {}", algorithm.display_name(), hex));
            }

            if let Some(combined) = entry.combined() {
                lines.push(rule.clone());
                lines.push(format!("{:12} : {}", "COMBINED", combined));
                lines.push(format!(
                    "Note: Combined hash is {} of all individual hashes concatenated",
                    self.combiner
                ));
            }

            lines.push(String::new());
        }

        lines.push(banner.clone());
        lines.push(format!(
            "End of Report - {} file(s) processed",
            history.len()
        ));
        lines.push(banner);

        lines.join("\n")
    }
}

impl OutputFormatter for TextFormatter {
    fn format_history(&self, history: &[Arc<HistoryEntry>]) -> Result<String> {
        Ok(self.format_report(history, &format_timestamp(&self.timestamp_format)))
    }
}

/// JSON array of entries
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_history(&self, history: &[Arc<HistoryEntry>]) -> Result<String> {
        let entries: Vec<&HistoryEntry> = history.iter().map(Arc::as_ref).collect();

        if self.pretty {
            Ok(serde_json::to_string_pretty(&entries)?)
        } else {
            Ok(serde_json::to_string(&entries)?)
        }
    }
}

/// CSV with one column per algorithm seen anywhere in the History
#[derive(Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }

    fn headers(columns: &[HashAlgorithm], combined: bool) -> Vec<&'static str> {
        let mut headers = vec!["File Name", "File Size", "Timestamp"];
        headers.extend(columns.iter().map(|a| a.display_name()));
        if combined {
            headers.push("Combined Hash");
        }
        headers
    }

    fn entry_to_record(
        entry: &HistoryEntry,
        columns: &[HashAlgorithm],
        combined: bool,
    ) -> Vec<String> {
        let mut record = vec![
            entry.file_name().to_string(),
            entry.file_size_display().to_string(),
            entry.timestamp().to_string(),
        ];

        record.extend(
            columns
                .iter()
                .map(|a| entry.digests().get(*a).unwrap_or_default().to_string()),
        );

        if combined {
            record.push(entry.combined().unwrap_or_default().to_string());
        }

        record
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_history(&self, history: &[Arc<HistoryEntry>]) -> Result<String> {
        if history.is_empty() {
            return Ok(String::new());
        }

        let columns = algorithm_columns(history);
        let combined = has_combined(history);

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(Self::headers(&columns, combined))?;
        for entry in history {
            wtr.write_record(Self::entry_to_record(entry, &columns, combined))?;
        }

        let data = wtr.into_inner()?;
        Ok(String::from_utf8(data)?)
    }
}

/// User template rendered once per entry
pub struct TemplateFormatter {
    handlebars: Handlebars<'static>,
}

const TEMPLATE_NAME: &str = "user_template";

impl TemplateFormatter {
    pub fn new(template: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        super::template_helpers::register_helpers(&mut handlebars);
        handlebars.register_template_string(TEMPLATE_NAME, template)?;

        Ok(Self { handlebars })
    }

    fn entry_data(index: usize, entry: &HistoryEntry) -> Value {
        let hashes: Map<String, Value> = entry
            .digests()
            .iter()
            .map(|(algorithm, hex)| (algorithm.display_name().to_string(), json!(hex)))
            .collect();

        json!({
            "index": index,
            "file_name": entry.file_name(),
            "file_size": entry.file_size(),
            "file_size_display": entry.file_size_display(),
            "timestamp": entry.timestamp(),
            "elapsed_ms": entry.elapsed().as_millis() as u64,
            "hashes": hashes,
            "combined": entry.combined(),
        })
    }
}

impl OutputFormatter for TemplateFormatter {
    fn format_history(&self, history: &[Arc<HistoryEntry>]) -> Result<String> {
        let rendered = history
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                self.handlebars
                    .render(TEMPLATE_NAME, &Self::entry_data(i + 1, entry))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rendered.join("\n"))
    }
}
