//! Read-only configuration consulted while normalizing handlers.

use serde::{Deserialize, Serialize};

/// The help prefix plugin examples are written with.
///
/// Examples are rewritten to the configured prefix when it differs.
pub const DEFAULT_HELP_PREFIX: &str = ".";

/// Immutable view of the bot settings that affect handler normalization.
///
/// Built once per load pass (see `CoreConfig::snapshot` in wren-runtime) and
/// shared by every handler of every plugin scanned in that pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// The bot's nick.
    pub nick: String,
    /// Other names the bot answers to.
    #[serde(default)]
    pub alias_nicks: Vec<String>,
    /// Character users type before command names.
    #[serde(default = "default_help_prefix")]
    pub help_prefix: char,
}

fn default_help_prefix() -> char {
    '.'
}

impl ConfigSnapshot {
    /// Creates a snapshot for `nick` with no aliases and the default prefix.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            alias_nicks: Vec::new(),
            help_prefix: default_help_prefix(),
        }
    }

    /// Sets the alias nicks.
    pub fn with_alias_nicks<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alias_nicks = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the help prefix.
    pub fn with_help_prefix(mut self, prefix: char) -> Self {
        self.help_prefix = prefix;
        self
    }
}
