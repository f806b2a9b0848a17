//! Terminal views of the History

use super::{OutputFormatter, algorithm_columns, has_combined};
use anyhow::Result;
use colored::*;
use filehash_core::HistoryEntry;
use filehash_core::format::{format_combined_hash_label, format_duration, format_hash_display};
use std::sync::Arc;

/// Results table: one row per entry, one column per algorithm
pub struct TableFormatter {
    use_color: bool,
    hash_width: Option<usize>,
}

impl TableFormatter {
    pub fn new(use_color: bool, hash_width: Option<usize>) -> Self {
        Self {
            use_color,
            hash_width,
        }
    }

    fn hash_cell(&self, hash: &str) -> String {
        match self.hash_width {
            Some(width) => format_hash_display(hash, width),
            None => hash.to_string(),
        }
    }

    fn rows(&self, history: &[Arc<HistoryEntry>]) -> (Vec<String>, Vec<Vec<String>>) {
        let columns = algorithm_columns(history);
        let combined = has_combined(history);

        let mut header = vec![
            "#".to_string(),
            "File Name".to_string(),
            "Size".to_string(),
            "Time".to_string(),
        ];
        header.extend(columns.iter().map(|a| a.display_name().to_string()));
        if combined {
            header.push("Combined Hash".to_string());
        }

        let rows = history
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let mut row = vec![
                    (index + 1).to_string(),
                    entry.file_name().to_string(),
                    entry.file_size_display().to_string(),
                    entry.timestamp().to_string(),
                ];
                row.extend(
                    columns
                        .iter()
                        .map(|a| self.hash_cell(entry.digests().get(*a).unwrap_or("-"))),
                );
                if combined {
                    row.push(self.hash_cell(entry.combined().unwrap_or("-")));
                }
                row
            })
            .collect();

        (header, rows)
    }
}

impl OutputFormatter for TableFormatter {
    fn format_history(&self, history: &[Arc<HistoryEntry>]) -> Result<String> {
        if history.is_empty() {
            return Ok("No files hashed yet.\n".to_string());
        }

        let (header, rows) = self.rows(history);
        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, title)| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        // Pad before colouring so escape codes do not skew the widths
        let render = |cells: &[String], paint: &dyn Fn(usize, String) -> String| {
            cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, &width))| paint(i, format!("{cell:<width$}")))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let use_color = self.use_color;
        let mut output = String::new();
        output.push_str(&render(&header, &|_, cell| {
            if use_color {
                cell.bold().to_string()
            } else {
                cell
            }
        }));
        output.push('\n');

        let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        output.push_str(&"─".repeat(total_width));
        output.push('\n');

        for row in &rows {
            output.push_str(&render(row, &|i, cell| {
                if use_color && i >= 4 {
                    cell.cyan().to_string()
                } else {
                    cell
                }
            }));
            output.push('\n');
        }

        Ok(output)
    }
}

/// Per-entry breakdown with full digests
pub struct DetailFormatter {
    use_color: bool,
}

impl DetailFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }
}

impl OutputFormatter for DetailFormatter {
    fn format_history(&self, history: &[Arc<HistoryEntry>]) -> Result<String> {
        let mut output = String::new();

        for (index, entry) in history.iter().enumerate() {
            let title = format!(
                "File #{}: {} ({})",
                index + 1,
                entry.file_name(),
                entry.file_size_display()
            );
            if self.use_color {
                output.push_str(&title.bold().to_string());
            } else {
                output.push_str(&title);
            }
            output.push('\n');
            output.push_str(&format!(
                "  Processed at: {} in {}\n",
                entry.timestamp(),
                format_duration(entry.elapsed().as_secs_f64())
            ));

            for (algorithm, hex) in entry.digests().iter() {
                let name = format!("{:<10}", algorithm.display_name());
                if self.use_color {
                    output.push_str(&format!("  {}  {}\n", name.yellow(), hex.cyan()));
                } else {
                    output.push_str(&format!("  {name}  {hex}\n"));
                }
            }

            if let Some(combined) = entry.combined() {
                output.push_str(&format!(
                    "  {}: {combined}\n",
                    format_combined_hash_label(entry.digests().len())
                ));
            }
        }

        Ok(output)
    }
}
