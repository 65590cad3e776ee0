//! Handler attribute model.
//!
//! A handler is a unit of bot behaviour together with the trigger metadata
//! a plugin author attached to it. Every classifying attribute is an optional
//! field: what matters to classification is whether it is *present*, which the
//! [`HandlerAttributes`] trait exposes uniformly for raw and normalized
//! handlers.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pattern::Pattern;

/// Opaque handler body.
///
/// The loader never calls it; the dispatcher downcasts it to whatever
/// callable type it dispatches to.
pub type Callable = Arc<dyn Any + Send + Sync>;

// =============================================================================
// Attr
// =============================================================================

/// The attributes that decide how a handler is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Rule,
    FindRules,
    SearchRules,
    Event,
    Intents,
    Commands,
    NicknameCommands,
    ActionCommands,
    UrlRegex,
    Interval,
}

impl Attr {
    /// Attribute name as plugin authors write it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::FindRules => "find_rules",
            Self::SearchRules => "search_rules",
            Self::Event => "event",
            Self::Intents => "intents",
            Self::Commands => "commands",
            Self::NicknameCommands => "nickname_commands",
            Self::ActionCommands => "action_commands",
            Self::UrlRegex => "url_regex",
            Self::Interval => "interval",
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence test over a handler's attribute set.
pub trait HandlerAttributes {
    /// Returns `true` if `attr` is set on this handler.
    fn has(&self, attr: Attr) -> bool;

    /// Returns `true` if any of `attrs` is set.
    fn has_any(&self, attrs: &[Attr]) -> bool {
        attrs.iter().any(|&attr| self.has(attr))
    }
}

// =============================================================================
// Attribute value types
// =============================================================================

/// A value that plugin authors may give either singly or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Wraps a single value into a one-element list; lists are returned as-is.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<String> {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Dispatch priority of a triggerable handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A usage example attached to a command handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// What the user types, e.g. `".help tell"`.
    pub text: String,
    /// Whether the example is meant for the help output.
    #[serde(default)]
    pub shown_in_help: bool,
    /// Expected bot output, one entry per line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result: Vec<String>,
}

impl Example {
    /// An example that is not flagged for help output.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown_in_help: false,
            result: Vec::new(),
        }
    }

    /// Flags the example for help output.
    pub fn shown_in_help(mut self) -> Self {
        self.shown_in_help = true;
        self
    }

    /// Records the expected output lines.
    pub fn result<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.result = lines.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&str> for Example {
    fn from(text: &str) -> Self {
        Example::new(text)
    }
}

// =============================================================================
// RawHandler
// =============================================================================

/// A handler as declared by a plugin, before normalization.
///
/// `None` means "attribute absent". Normalization consumes the raw handler,
/// so a handler cannot be normalized twice.
#[derive(Clone, Default)]
pub struct RawHandler {
    /// Declared name of the handler.
    pub name: String,
    /// Raw doc comment.
    pub doc: Option<String>,
    /// Handler body.
    pub callable: Option<Callable>,

    pub rule: Option<OneOrMany<String>>,
    pub find_rules: Option<OneOrMany<String>>,
    pub search_rules: Option<OneOrMany<String>>,
    pub event: Option<OneOrMany<String>>,
    pub intents: Option<Vec<Pattern>>,
    pub commands: Option<Vec<String>>,
    pub nickname_commands: Option<Vec<String>>,
    pub action_commands: Option<Vec<String>>,
    pub interval: Option<Vec<Duration>>,
    pub url_regex: Option<Pattern>,

    pub rate: Option<u32>,
    pub channel_rate: Option<u32>,
    pub global_rate: Option<u32>,
    pub unblockable: Option<bool>,

    pub echo: Option<bool>,
    pub priority: Option<Priority>,
    pub output_prefix: Option<String>,
    pub thread: Option<bool>,

    pub example: Option<Vec<Example>>,
}

impl RawHandler {
    /// Creates a handler with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl HandlerAttributes for RawHandler {
    fn has(&self, attr: Attr) -> bool {
        match attr {
            Attr::Rule => self.rule.is_some(),
            Attr::FindRules => self.find_rules.is_some(),
            Attr::SearchRules => self.search_rules.is_some(),
            Attr::Event => self.event.is_some(),
            Attr::Intents => self.intents.is_some(),
            Attr::Commands => self.commands.is_some(),
            Attr::NicknameCommands => self.nickname_commands.is_some(),
            Attr::ActionCommands => self.action_commands.is_some(),
            Attr::UrlRegex => self.url_regex.is_some(),
            Attr::Interval => self.interval.is_some(),
        }
    }
}

impl fmt::Debug for RawHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawHandler")
            .field("name", &self.name)
            .field("rule", &self.rule)
            .field("event", &self.event)
            .field("commands", &self.commands)
            .field("nickname_commands", &self.nickname_commands)
            .field("action_commands", &self.action_commands)
            .field("interval", &self.interval)
            .field("url_regex", &self.url_regex)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_or_many_into_vec() {
        assert_eq!(OneOrMany::from("join").into_vec(), vec!["join"]);
        assert_eq!(
            OneOrMany::from(["join", "part"]).into_vec(),
            vec!["join", "part"]
        );
    }

    #[test]
    fn test_one_or_many_deserialize() {
        let one: OneOrMany<String> = serde_json::from_str(r#""join""#).unwrap();
        assert_eq!(one, OneOrMany::One("join".to_string()));
        let many: OneOrMany<String> = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(many.into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn test_priority_default_and_serde() {
        assert_eq!(Priority::default(), Priority::Medium);
        let p: Priority = serde_json::from_str(r#""high""#).unwrap();
        assert_eq!(p, Priority::High);
        assert_eq!(Priority::Low.to_string(), "low");
    }

    #[test]
    fn test_example_deserialize_defaults() {
        let ex: Example = serde_json::from_str(r#"{"text": ".tell x"}"#).unwrap();
        assert_eq!(ex, Example::new(".tell x"));
    }

    #[test]
    fn test_raw_handler_presence() {
        let mut handler = RawHandler::new("f");
        assert!(!handler.has_any(&[Attr::Rule, Attr::Commands]));
        handler.commands = Some(vec![]);
        assert!(handler.has(Attr::Commands));
        assert!(!handler.has(Attr::Interval));
    }
}
