//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.autoreducer/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::LogLevel;
use crate::core::script::RunOptions;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AutoReducerConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<LogLevel>,
    pub log_file: Option<String>,
    pub pretty: Option<bool>,
    pub builtin_actions: Option<bool>,
    pub flush_each_step: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "autoreducer.log";
pub const DEFAULT_PRETTY: bool = true;
pub const DEFAULT_BUILTIN_ACTIONS: bool = true;
pub const DEFAULT_FLUSH_EACH_STEP: bool = false;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub log_level: LogLevel,
    pub log_file: String,
    pub pretty: bool,
    pub builtin_actions: bool,
    pub flush_each_step: bool,
}

impl ResolvedConfig {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            builtin_actions: self.builtin_actions,
            flush_each_step: self.flush_each_step,
        }
    }
}

/// Values taken from CLI flags. Boolean flags only override when set.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<LogLevel>,
    pub log_file: Option<String>,
    pub compact: bool,
    pub flush_each_step: bool,
    pub no_builtins: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.autoreducer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".autoreducer").join("config.toml"))
}

/// Loads the user config, falling back to defaults when there is no home directory.
pub fn load_config() -> Result<AutoReducerConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(AutoReducerConfig::default())
        }
    }
}

/// Reads `path`, or writes the commented template there when it is missing.
///
/// A template that cannot be written is only logged; the run continues on
/// defaults. A file that exists but does not parse is an error.
pub fn load_config_from(path: &Path) -> Result<AutoReducerConfig, ConfigError> {
    if !path.exists() {
        info!("No config file at {}, writing template", path.display());
        if let Err(e) = write_template(path) {
            warn!("Failed to write config template: {}", e);
        }
        return Ok(AutoReducerConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AutoReducerConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    debug!("Config from {}: {:?}", path.display(), config);
    Ok(config)
}

/// The template: every `[general]` key, commented out, showing its default.
///
/// Each setting line is `# key = value`, so stripping the leading `# `
/// yields a config equal to the built-in defaults.
pub fn config_template() -> String {
    let mut lines = vec![
        "# autoreducer settings. Uncomment a line to override its default.".to_string(),
        "# Precedence: CLI flags > AUTOREDUCER_* env vars > this file > defaults.".to_string(),
        String::new(),
        "# [general]".to_string(),
    ];
    let default_level = LogLevel::default()
        .to_possible_value()
        .map(|value| value.get_name().to_string())
        .unwrap_or_default();
    let settings: [(&str, String, &str); 5] = [
        ("log_level", format!("{:?}", default_level), "error | warn | info | debug | trace"),
        ("log_file", format!("{:?}", DEFAULT_LOG_FILE), "AUTOREDUCER_LOG_FILE wins"),
        ("pretty", DEFAULT_PRETTY.to_string(), "--compact forces false"),
        (
            "builtin_actions",
            DEFAULT_BUILTIN_ACTIONS.to_string(),
            "reset/merge; --no-builtins forces false",
        ),
        (
            "flush_each_step",
            DEFAULT_FLUSH_EACH_STEP.to_string(),
            "--flush-each-step forces true",
        ),
    ];
    for (key, value, note) in settings {
        lines.push(format!("# {key} = {value}    # {note}"));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn write_template(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ConfigError::Io)?;
    }
    fs::write(path, config_template()).map_err(ConfigError::Io)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AutoReducerConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Log level: CLI → env → config → default
    let log_level = cli
        .log_level
        .or_else(env_log_level)
        .or(config.general.log_level)
        .unwrap_or_default();

    // Log file: CLI → env → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| std::env::var("AUTOREDUCER_LOG_FILE").ok())
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let pretty = if cli.compact {
        false
    } else {
        config.general.pretty.unwrap_or(DEFAULT_PRETTY)
    };

    let builtin_actions = if cli.no_builtins {
        false
    } else {
        config
            .general
            .builtin_actions
            .unwrap_or(DEFAULT_BUILTIN_ACTIONS)
    };

    let flush_each_step = cli.flush_each_step
        || config
            .general
            .flush_each_step
            .unwrap_or(DEFAULT_FLUSH_EACH_STEP);

    ResolvedConfig {
        log_level,
        log_file,
        pretty,
        builtin_actions,
        flush_each_step,
    }
}

fn env_log_level() -> Option<LogLevel> {
    let raw = std::env::var("AUTOREDUCER_LOG_LEVEL").ok()?;
    match LogLevel::from_str(&raw, true) {
        Ok(level) => Some(level),
        Err(e) => {
            warn!("Ignoring AUTOREDUCER_LOG_LEVEL: {}", e);
            None
        }
    }
}
