use crate::output::OutputFormat;
use crate::paths;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use filehash_core::{EngineConfig, HashAlgorithm};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub default_format: String,
    pub color_enabled: bool,
    pub progress_enabled: bool,
    /// Handlebars template for export file names, without extension
    pub export_filename_template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "table".to_string(),
            color_enabled: true,
            progress_enabled: true,
            export_filename_template: "hash_results_{{timestamp}}".to_string(),
        }
    }
}

impl AppConfig {
    /// Apply CLI argument overrides to the configuration
    pub fn apply_cli_overrides(&mut self, no_color: bool, no_progress: bool) {
        if no_color {
            self.output.color_enabled = false;
        }
        if no_progress {
            self.output.progress_enabled = false;
        }
    }
}

/// Type of value stored under a known configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Integer,
    Boolean,
    Text,
}

const KNOWN_KEYS: &[(&str, ValueKind)] = &[
    ("engine.max_file_size", ValueKind::Integer),
    ("engine.max_files", ValueKind::Integer),
    ("engine.min_files", ValueKind::Integer),
    ("engine.min_algorithms", ValueKind::Integer),
    ("engine.max_algorithms", ValueKind::Integer),
    ("engine.chunk_size", ValueKind::Integer),
    ("engine.default_algorithm", ValueKind::Text),
    ("engine.combiner_algorithm", ValueKind::Text),
    ("engine.timestamp_format", ValueKind::Text),
    ("output.default_format", ValueKind::Text),
    ("output.color_enabled", ValueKind::Boolean),
    ("output.progress_enabled", ValueKind::Boolean),
    ("output.export_filename_template", ValueKind::Text),
];

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with the default path
    pub fn new() -> Self {
        Self {
            config_path: paths::get_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        figment.merge(
            Env::prefixed("FILEHASH_")
                .ignore(&["config"])
                .split("__"),
        )
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = self
            .figment()
            .extract()
            .context("Failed to load configuration")?;
        config
            .engine
            .validate()
            .context("Invalid engine configuration")?;
        Ok(config)
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let value = toml::Value::try_from(self.load()?)?;

        let mut current = &value;
        for part in key.split('.') {
            match current {
                toml::Value::Table(table) => {
                    current = table
                        .get(part)
                        .ok_or_else(|| anyhow::anyhow!("Key '{}' not found", key))?;
                }
                _ => anyhow::bail!("Invalid key path: {}", key),
            }
        }

        scalar_to_string(current)
            .ok_or_else(|| anyhow::anyhow!("Value at '{}' is not a simple type", key))
    }

    /// Set a configuration value by key (dot notation) and write the file
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let kind = Self::key_kind(key)?;
        let parsed = Self::parse_config_value(key, kind, value)?;
        Self::validate_config_value(key, &parsed)?;

        let mut document = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path).with_context(|| {
                format!("Failed to read {}", self.config_path.display())
            })?;
            toml::from_str(&content)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("Invalid key path: {}", key))?;
        let toml::Value::Table(root) = &mut document else {
            anyhow::bail!("Configuration file is not a TOML table");
        };
        let toml::Value::Table(table) = root
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()))
        else {
            anyhow::bail!("Invalid key path: expected table at '{}'", section);
        };
        table.insert(field.to_string(), parsed);

        let toml_string = toml::to_string_pretty(&document)?;

        // The merged result must still be a usable configuration
        let merged: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(&toml_string))
            .extract()
            .context("Configuration would no longer load")?;
        merged
            .engine
            .validate()
            .context("Configuration would no longer be valid")?;

        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, toml_string)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;

        log::debug!("Set {key} in {}", self.config_path.display());
        Ok(())
    }

    /// List all configuration values, sorted by key
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self.load()?)?;

        let mut items = Vec::new();
        Self::collect_values(&value, String::new(), &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(items)
    }

    fn collect_values(value: &toml::Value, prefix: String, items: &mut Vec<(String, String)>) {
        if let toml::Value::Table(table) = value {
            for (key, val) in table {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                Self::collect_values(val, new_prefix, items);
            }
        } else if let Some(text) = scalar_to_string(value) {
            items.push((prefix, text));
        }
    }

    fn key_kind(key: &str) -> Result<ValueKind> {
        KNOWN_KEYS
            .iter()
            .find(|(known, _)| *known == key)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))
    }

    fn parse_config_value(key: &str, kind: ValueKind, value: &str) -> Result<toml::Value> {
        Ok(match kind {
            ValueKind::Integer => {
                let num: i64 = value
                    .parse()
                    .with_context(|| format!("{key} must be an integer"))?;
                if num < 0 {
                    anyhow::bail!("{key} must not be negative");
                }
                toml::Value::Integer(num)
            }
            ValueKind::Boolean => toml::Value::Boolean(
                value
                    .parse()
                    .context("Value must be 'true' or 'false'")?,
            ),
            ValueKind::Text => toml::Value::String(value.to_string()),
        })
    }

    fn validate_config_value(key: &str, value: &toml::Value) -> Result<()> {
        match (key, value) {
            ("engine.chunk_size" | "engine.max_file_size" | "engine.max_files", toml::Value::Integer(0)) => {
                anyhow::bail!("{key} must be greater than 0");
            }
            ("engine.default_algorithm" | "engine.combiner_algorithm", toml::Value::String(name)) => {
                name.parse::<HashAlgorithm>()?;
            }
            ("output.default_format", toml::Value::String(format)) => {
                OutputFormat::from_string(format)?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Load the configuration from the default location
pub fn get_config() -> Result<AppConfig> {
    ConfigManager::new().load()
}
