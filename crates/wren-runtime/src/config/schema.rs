//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use wren_core::{ConfigSnapshot, DEFAULT_HELP_PREFIX};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WrenConfig {
    /// Bot identity and plugin selection.
    #[serde(default)]
    pub core: CoreConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// =============================================================================
// Core
// =============================================================================

/// Bot identity and plugin selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// The bot's nick.
    #[serde(default = "default_nick")]
    pub nick: String,

    /// Other names the bot answers to in rules.
    #[serde(default)]
    pub alias_nicks: Vec<String>,

    /// Prefix shown in help examples.
    #[serde(default = "default_help_prefix")]
    pub help_prefix: char,

    /// Plugins to load. `None` loads every plugin not excluded.
    #[serde(default)]
    pub enable: Option<Vec<String>>,

    /// Plugins never to load.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            nick: default_nick(),
            alias_nicks: Vec::new(),
            help_prefix: default_help_prefix(),
            enable: None,
            exclude: Vec::new(),
        }
    }
}

impl CoreConfig {
    /// The immutable view handler normalization reads.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(self.nick.clone())
            .with_alias_nicks(self.alias_nicks.iter().cloned())
            .with_help_prefix(self.help_prefix)
    }

    /// Returns `true` if the plugin `name` passes the enable and exclude lists.
    pub fn is_plugin_enabled(&self, name: &str) -> bool {
        let allowed = self
            .enable
            .as_ref()
            .is_none_or(|enabled| enabled.iter().any(|p| p == name));
        allowed && !self.exclude.iter().any(|p| p == name)
    }
}

fn default_nick() -> String {
    "Wren".to_string()
}

fn default_help_prefix() -> char {
    DEFAULT_HELP_PREFIX.chars().next().unwrap_or('.')
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Requires `file_path`.
    File,
}

/// How often the log file is rotated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Include thread IDs in log lines.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line in log lines.
    #[serde(default)]
    pub file_location: bool,

    /// Log file, for `output = "file"`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub rotation: LogRotation,

    /// Rotated files to keep.
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Per-target levels, e.g. `wren_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            span_events: SpanEventConfig::default(),
            thread_ids: false,
            file_location: false,
            file_path: None,
            rotation: LogRotation::default(),
            max_files: default_max_files(),
            filters: HashMap::new(),
        }
    }
}

fn default_max_files() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WrenConfig::default();
        assert_eq!(config.core.nick, "Wren");
        assert_eq!(config.core.help_prefix, '.');
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.max_files, 5);
    }

    #[test]
    fn test_snapshot() {
        let core = CoreConfig {
            nick: "Bot".into(),
            alias_nicks: vec!["B".into()],
            help_prefix: '!',
            ..Default::default()
        };
        let snapshot = core.snapshot();
        assert_eq!(snapshot.nick, "Bot");
        assert_eq!(snapshot.alias_nicks, vec!["B".to_string()]);
        assert_eq!(snapshot.help_prefix, '!');
    }

    #[test]
    fn test_plugin_selection() {
        let mut core = CoreConfig::default();
        assert!(core.is_plugin_enabled("anything"));

        core.exclude = vec!["tell".into()];
        assert!(!core.is_plugin_enabled("tell"));

        core.enable = Some(vec!["tell".into(), "ping".into()]);
        assert!(core.is_plugin_enabled("ping"));
        assert!(!core.is_plugin_enabled("tell"));
        assert!(!core.is_plugin_enabled("other"));
    }
}
