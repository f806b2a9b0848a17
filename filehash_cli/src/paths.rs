//! Centralized path management for the filehash CLI
//!
//! The configuration file lives in the platform config directory unless
//! `FILEHASH_CONFIG` points somewhere else.

use std::path::PathBuf;

/// The name of the application directory used across all platforms
const APP_DIR: &str = "filehash";

/// The name of the configuration file
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "FILEHASH_CONFIG";

/// Returns the configuration directory
///
/// On Unix-like systems `XDG_CONFIG_HOME` wins, then `~/.config/filehash`.
/// On Windows this is `%APPDATA%/filehash`.
///
/// Falls back to `.filehash` in the current directory when no standard
/// directory can be determined.
pub fn get_config_dir() -> PathBuf {
    #[cfg(not(target_os = "windows"))]
    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg_config).join(APP_DIR);
    }

    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".filehash"))
}

/// Returns the path to the configuration file
pub fn get_config_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        Some(path) => PathBuf::from(path),
        None => get_config_dir().join(CONFIG_FILE),
    }
}
