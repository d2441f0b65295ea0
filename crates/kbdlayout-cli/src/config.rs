//! TOML configuration for the `kbdlayout` command.
//!
//! The file is optional.  It is read from `--config <path>` when given,
//! otherwise from the platform-appropriate location:
//! - Windows:  `%APPDATA%\kbdlayout\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/kbdlayout/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/kbdlayout/config.toml`
//!
//! ```toml
//! log_level = "info"
//! format = "json"
//! keep_going = true
//! ```
//!
//! Absent fields fall back to their defaults, and so does a missing file at
//! the platform location.  Command-line flags override file values.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How a parsed layout is written to standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable dump of every keymap.
    #[default]
    Text,
    /// The layout model as pretty-printed JSON.
    Json,
}

/// Settings stored in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Output format used when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,
    /// Continue with the next document after a failure.
    #[serde(default)]
    pub keep_going: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: OutputFormat::default(),
            keep_going: false,
        }
    }
}

/// Loads the configuration.
///
/// An `explicit` path must exist.  Without one, the platform config file is
/// used when present and defaults otherwise.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors (including a missing
/// explicit file) and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(explicit: Option<&Path>) -> Result<CliConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let Some(path) = config_file_path() else {
        return Ok(CliConfig::default());
    };
    match read_config(&path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(CliConfig::default())
        }
        other => other,
    }
}

fn read_config(path: &Path) -> Result<CliConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Full path of the platform config file, if a config directory is known.
pub fn config_file_path() -> Option<PathBuf> {
    platform_config_dir().map(|dir| dir.join("config.toml"))
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("kbdlayout"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("kbdlayout"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("kbdlayout")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
