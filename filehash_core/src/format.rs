//! Display formatting for sizes, timestamps, digests and durations

use chrono::Local;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;

/// Fallback used when a configured timestamp format cannot be rendered
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const GIB: u64 = 1024 * 1024 * 1024;

/// Human-readable size with two decimals and 1024-based units
///
/// `1536` becomes `"1.50 KB"`, `500` becomes `"500.00 B"`.
pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} TB")
}

/// Size limit as shown in rejection messages
///
/// Whole gibibytes render compactly (`1GB`); anything else falls back to
/// [`format_file_size`].
pub fn format_size_limit(max: &u64) -> String {
    if *max >= GIB && max % GIB == 0 {
        format!("{}GB", max / GIB)
    } else {
        format_file_size(*max)
    }
}

/// Whether every specifier in `format` is a strftime specifier chrono knows
pub fn is_valid_timestamp_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Current local time in the given strftime format
///
/// A format chrono cannot render falls back to [`DEFAULT_TIMESTAMP_FORMAT`].
pub fn format_timestamp(format: &str) -> String {
    let now = Local::now();
    let mut formatted = String::new();
    if is_valid_timestamp_format(format) && write!(formatted, "{}", now.format(format)).is_ok() {
        return formatted;
    }

    log::warn!("Invalid timestamp format {format:?}, using {DEFAULT_TIMESTAMP_FORMAT:?}");
    formatted.clear();
    let _ = write!(formatted, "{}", now.format(DEFAULT_TIMESTAMP_FORMAT));
    formatted
}

/// Timestamp component of export file names (`YYYYMMDD_HHMMSS`)
pub fn export_timestamp() -> String {
    format_timestamp("%Y%m%d_%H%M%S")
}

/// Truncate long digests with a middle ellipsis
pub fn format_hash_display(hash: &str, max_len: usize) -> String {
    let chars = hash.chars().count();
    if chars <= max_len {
        return hash.to_string();
    }

    let keep = max_len.saturating_sub(3) / 2;
    let head: String = hash.chars().take(keep).collect();
    let tail: String = hash.chars().skip(chars - keep).collect();
    format!("{head}...{tail}")
}

/// `"3.20s"` below a minute, `"1m 5.5s"` above
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{seconds:.2}s");
    }

    let minutes = (seconds / 60.0).floor();
    let remaining = seconds - minutes * 60.0;
    format!("{}m {remaining:.1}s", minutes as u64)
}

/// Count followed by the singular or plural form
///
/// With no explicit plural, an `s` is appended to the singular.
pub fn pluralize(count: usize, singular: &str, plural: Option<&str>) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        match plural {
            Some(plural) => format!("{count} {plural}"),
            None => format!("{count} {singular}s"),
        }
    }
}

pub fn format_combined_hash_label(algorithms: usize) -> String {
    format!("Combined ({algorithms} algorithms)")
}
