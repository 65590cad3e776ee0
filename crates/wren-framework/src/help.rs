//! Help documentation extracted from command handlers.
//!
//! Every command name of a handler maps to the *same* [`HelpDoc`] handle, so
//! an edit made through one alias (for instance a help plugin appending an
//! example) is visible through all of them.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Serialize;
use wren_core::{ConfigSnapshot, DEFAULT_HELP_PREFIX, Example};

/// Doc lines and usage examples of one command handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    /// Trimmed doc comment lines.
    pub lines: Vec<String>,
    /// Examples rewritten for the running bot's nick and help prefix.
    pub examples: Vec<String>,
}

/// Shared handle to a [`HelpEntry`].
///
/// Cloning the handle does not clone the entry.
#[derive(Clone, Default)]
pub struct HelpDoc(Arc<RwLock<HelpEntry>>);

impl HelpDoc {
    /// Wraps `entry` in a new shared handle.
    pub fn new(entry: HelpEntry) -> Self {
        Self(Arc::new(RwLock::new(entry)))
    }

    /// Locks the entry for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, HelpEntry> {
        self.0.read()
    }

    /// Locks the entry for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, HelpEntry> {
        self.0.write()
    }

    /// Returns a copy of the current entry.
    pub fn snapshot(&self) -> HelpEntry {
        self.read().clone()
    }

    /// Returns `true` if both handles point to the same entry.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for HelpDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HelpDoc").field(&*self.read()).finish()
    }
}

impl Serialize for HelpDoc {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

/// Picks and rewrites the examples a help entry displays.
///
/// Examples flagged `shown_in_help` are used; when none is flagged, the first
/// example stands in for all of them.
pub fn help_examples(examples: &[Example], config: &ConfigSnapshot) -> Vec<String> {
    let flagged: Vec<&Example> = examples.iter().filter(|e| e.shown_in_help).collect();
    let chosen = if flagged.is_empty() {
        examples.first().into_iter().collect()
    } else {
        flagged
    };
    chosen
        .into_iter()
        .map(|example| render_example(&example.text, config))
        .collect()
}

/// Substitutes `$nickname` and swaps the default help prefix for the
/// configured one, unless the example already addresses the bot directly.
pub fn render_example(text: &str, config: &ConfigSnapshot) -> String {
    let text = text.replace("$nickname", &config.nick);
    if text.starts_with(config.help_prefix) || text.starts_with(config.nick.as_str()) {
        return text;
    }
    text.replacen(DEFAULT_HELP_PREFIX, &config.help_prefix.to_string(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prefix: char) -> ConfigSnapshot {
        ConfigSnapshot::new("Bot").with_help_prefix(prefix)
    }

    #[test]
    fn test_render_nickname_token() {
        assert_eq!(render_example("$nickname: help", &config('.')), "Bot: help");
    }

    #[test]
    fn test_render_swaps_prefix() {
        assert_eq!(render_example(".tell x hi", &config('!')), "!tell x hi");
    }

    #[test]
    fn test_render_only_first_prefix_replaced() {
        assert_eq!(render_example(".calc 1.5", &config('!')), "!calc 1.5");
    }

    #[test]
    fn test_render_keeps_configured_prefix() {
        assert_eq!(render_example(".help", &config('.')), ".help");
    }

    #[test]
    fn test_render_keeps_nick_addressed_example() {
        assert_eq!(render_example("$nickname, do .x", &config('!')), "Bot, do .x");
    }

    #[test]
    fn test_help_examples_flagged_only() {
        let examples = vec![
            Example::new(".a"),
            Example::new(".b").shown_in_help(),
            Example::new(".c").shown_in_help(),
        ];
        assert_eq!(help_examples(&examples, &config('.')), vec![".b", ".c"]);
    }

    #[test]
    fn test_help_examples_fall_back_to_first() {
        let examples = vec![Example::new(".a"), Example::new(".b")];
        assert_eq!(help_examples(&examples, &config('!')), vec!["!a"]);
    }

    #[test]
    fn test_help_examples_empty() {
        assert!(help_examples(&[], &config('.')).is_empty());
    }

    #[test]
    fn test_help_doc_shared_mutation() {
        let doc = HelpDoc::new(HelpEntry::default());
        let alias = doc.clone();
        alias.write().examples.push(".x".to_string());
        assert!(HelpDoc::ptr_eq(&doc, &alias));
        assert_eq!(doc.read().examples, vec![".x"]);
    }

    #[test]
    fn test_help_doc_serializes_entry() {
        let doc = HelpDoc::new(HelpEntry {
            lines: vec!["Says hi.".to_string()],
            examples: vec![".hi".to_string()],
        });
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["lines"][0], "Says hi.");
        assert_eq!(json["examples"][0], ".hi");
    }
}
