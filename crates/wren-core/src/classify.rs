//! Handler classification.
//!
//! Two predicates decide which bookkeeping a handler needs:
//!
//! - [`is_limitable`]: the handler passes through the rate-limiting machinery
//!   and must carry `rate`, `channel_rate`, `global_rate` and `unblockable`.
//! - [`is_triggerable`]: the handler reacts to incoming messages (rules,
//!   events, intents, commands) and must carry the full dispatch metadata.
//!
//! A triggerable handler is always limitable. Neither predicate holds for a
//! job (`interval`), and URL callbacks are limitable but never triggerable.

use std::fmt;

use crate::handler::{Attr, HandlerAttributes};

/// Name that marks a plugin's shutdown hook.
pub const SHUTDOWN_HANDLER_NAME: &str = "shutdown";

const TRIGGER_ATTRS: &[Attr] = &[
    Attr::Rule,
    Attr::FindRules,
    Attr::SearchRules,
    Attr::Event,
    Attr::Intents,
    Attr::Commands,
    Attr::NicknameCommands,
    Attr::ActionCommands,
];

const LIMITABLE_FORBIDDEN: &[Attr] = &[Attr::Interval];
const TRIGGERABLE_FORBIDDEN: &[Attr] = &[Attr::Interval, Attr::UrlRegex];

/// Returns `true` if `handler` must carry rate-limit attributes.
pub fn is_limitable<H: HandlerAttributes + ?Sized>(handler: &H) -> bool {
    let allowed = handler.has_any(TRIGGER_ATTRS) || handler.has(Attr::UrlRegex);
    allowed && !handler.has_any(LIMITABLE_FORBIDDEN)
}

/// Returns `true` if `handler` can handle the bot's triggers.
pub fn is_triggerable<H: HandlerAttributes + ?Sized>(handler: &H) -> bool {
    handler.has_any(TRIGGER_ATTRS) && !handler.has_any(TRIGGERABLE_FORBIDDEN)
}

// =============================================================================
// Category
// =============================================================================

/// The dispatch bucket a plugin function ends up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Called once when the plugin is unloaded.
    Shutdown,
    /// Reacts to messages.
    Triggerable,
    /// Runs on an interval.
    Job,
    /// Runs for messages containing a matching URL.
    UrlCallback,
    /// Not a handler; ignored by the loader.
    Unclassified,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::Triggerable => "triggerable",
            Self::Job => "job",
            Self::UrlCallback => "url_callback",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a function named `name` by precedence: shutdown hook first,
/// then triggerable, job and URL callback.
pub fn classify<H: HandlerAttributes + ?Sized>(name: &str, handler: &H) -> Category {
    if name == SHUTDOWN_HANDLER_NAME {
        Category::Shutdown
    } else if is_triggerable(handler) {
        Category::Triggerable
    } else if handler.has(Attr::Interval) {
        Category::Job
    } else if handler.has(Attr::UrlRegex) {
        Category::UrlCallback
    } else {
        Category::Unclassified
    }
}
