//! Configuration management for herakles-task-filter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use herakles_task_filter::FilterLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::cli::{Args, ConfigFormat, LogLevel};

pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // Filter limits
    /// Top-N processes by cumulative CPU time (unset = no CPU filter)
    #[serde(default, alias = "recordcputop", alias = "record-cpu-top")]
    pub record_cpu_top: Option<usize>,
    /// Top-N processes by resident memory (unset = no memory filter)
    #[serde(default, alias = "recordmemtop", alias = "record-mem-top")]
    pub record_mem_top: Option<usize>,
    /// Maximum threads kept per process (unset = no thread filter)
    #[serde(default, alias = "threadmax", alias = "thread-max")]
    pub thread_max: Option<usize>,

    // Logging
    #[serde(default, alias = "log-level")]
    pub log_level: Option<String>,

    // Output
    #[serde(default, alias = "pretty-output")]
    pub pretty_output: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            record_cpu_top: None,
            record_mem_top: None,
            thread_max: None,
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
            pretty_output: Some(true),
        }
    }
}

impl Config {
    /// Filter limits for the library.
    pub fn limits(&self) -> FilterLimits {
        FilterLimits::new(self.record_cpu_top, self.record_mem_top, self.thread_max)
    }
}

/// Configuration validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be a positive integer (omit it to disable the filter)")]
    ZeroLimit(&'static str),

    #[error("Invalid log_level '{0}', expected one of off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    let limits = [
        ("record_cpu_top", cfg.record_cpu_top),
        ("record_mem_top", cfg.record_mem_top),
        ("thread_max", cfg.thread_max),
    ];
    for (name, value) in limits {
        if value == Some(0) {
            return Err(ConfigError::ZeroLimit(name));
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(level.to_string()));
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(n) = args.cpu_top {
        config.record_cpu_top = Some(n);
    }
    if let Some(n) = args.mem_top {
        config.record_mem_top = Some(n);
    }
    if let Some(n) = args.thread_max {
        config.thread_max = Some(n);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(log_level_name(level).to_string());
    }

    Ok(config)
}

fn log_level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Off => "off",
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/herakles/task-filter.yaml",
                "/etc/herakles/task-filter.yml",
                "/etc/herakles/task-filter.json",
                "./herakles-task-filter.yaml",
                "./herakles-task-filter.yml",
                "./herakles-task-filter.json",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders configuration in requested format
pub fn render_config(config: &Config, format: ConfigFormat) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // -------------------------------------------------------------------------
    // Tests for validate_effective_config
    // -------------------------------------------------------------------------

    #[test]
    fn test_default_config_is_valid_and_unset() {
        let cfg = Config::default();
        assert!(validate_effective_config(&cfg).is_ok());
        assert!(cfg.limits().is_unset());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let cfg = Config {
            thread_max: Some(0),
            ..Config::default()
        };
        assert_eq!(
            validate_effective_config(&cfg),
            Err(ConfigError::ZeroLimit("thread_max"))
        );
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let cfg = Config {
            log_level: Some("verbose".into()),
            ..Config::default()
        };
        assert!(matches!(
            validate_effective_config(&cfg),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Tests for load_config
    // -------------------------------------------------------------------------

    #[test]
    fn test_load_yaml_with_short_aliases() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("filter.yaml");
        fs::write(&path, "recordcputop: 5\nrecordmemtop: 3\nthreadmax: 20\n")
            .expect("Failed to write config");

        let cfg = load_config(Some(&path)).expect("config loads");
        assert_eq!(cfg.limits(), FilterLimits::new(Some(5), Some(3), Some(20)));
        assert_eq!(cfg.log_level, None);
    }

    #[test]
    fn test_load_json_and_toml() {
        let dir = tempdir().expect("Failed to create temp dir");

        let json = dir.path().join("filter.json");
        fs::write(&json, r#"{"record_cpu_top": 7, "pretty_output": false}"#)
            .expect("Failed to write config");
        let cfg = load_config(Some(&json)).expect("json loads");
        assert_eq!(cfg.record_cpu_top, Some(7));
        assert_eq!(cfg.pretty_output, Some(false));

        let toml_path = dir.path().join("filter.toml");
        fs::write(&toml_path, "thread_max = 12\nlog_level = \"debug\"\n")
            .expect("Failed to write config");
        let cfg = load_config(Some(&toml_path)).expect("toml loads");
        assert_eq!(cfg.thread_max, Some(12));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(load_config(Some(&dir.path().join("absent.yaml"))).is_err());
    }

    #[test]
    fn test_render_config_yaml_contains_limits() {
        let cfg = Config {
            record_cpu_top: Some(4),
            ..Config::default()
        };
        let yaml = render_config(&cfg, ConfigFormat::Yaml).unwrap();
        assert!(yaml.contains("record_cpu_top: 4"));
    }
}
