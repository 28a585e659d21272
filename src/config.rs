//! Loop configuration.
//!
//! Read from a JSON file; every field is optional and falls back to its
//! default.

use crate::ui::core::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Turn on mouse reporting when the loop starts.
    pub mouse_capture: bool,
    pub exit_on_ctrl_c: bool,
    /// How often the input reader checks for shutdown while idle.
    pub input_poll_ms: u64,
    pub root_background: Color,
    /// Where log files go. Defaults to a directory under the system temp dir.
    pub log_dir: Option<PathBuf>,
    /// `tracing` filter directives, overridden by `TERMWIN_LOG`.
    pub log_filter: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mouse_capture: true,
            exit_on_ctrl_c: true,
            input_poll_ms: 50,
            root_background: Color::BLACK,
            log_dir: None,
            log_filter: None,
        }
    }
}

impl UiConfig {
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Loads `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(data) => Self::from_json_str(&data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn input_poll_interval(&self) -> Duration {
        Duration::from_millis(self.input_poll_ms.max(1))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config: {err}"),
            ConfigError::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
