//! Handler builders.
//!
//! Plugins declare their exports with these builders instead of attaching
//! attributes to functions at runtime:
//!
//! ```rust,ignore
//! use wren_framework::plugin::builder::{handler, shutdown};
//!
//! let tell = handler("tell")
//!     .doc("Leave a message for someone.")
//!     .command("tell")
//!     .nickname_command("tell")
//!     .example(Example::new(".tell Alice hi").shown_in_help())
//!     .rate(30)
//!     .callable(tell_fn);
//! ```

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use wren_core::{
    Example, OneOrMany, Pattern, Priority, RawHandler, SHUTDOWN_HANDLER_NAME,
};

use super::PluginItem;

/// Starts a handler called `name`.
pub fn handler(name: impl Into<String>) -> HandlerBuilder {
    HandlerBuilder::new(name)
}

/// Starts the plugin's shutdown hook.
pub fn shutdown() -> HandlerBuilder {
    HandlerBuilder::new(SHUTDOWN_HANDLER_NAME)
}

/// Declares a non-callable binding.
pub fn value(name: impl Into<String>) -> PluginItem {
    PluginItem::Value { name: name.into() }
}

/// Chainable builder over [`RawHandler`].
///
/// Repeated calls to list-valued setters (`command`, `rule`, `event`, ...)
/// append. A rule or event set exactly once stays a single value, as if the
/// author had written one string.
#[derive(Debug, Clone)]
#[must_use]
pub struct HandlerBuilder {
    raw: RawHandler,
}

fn push_one(slot: &mut Option<OneOrMany<String>>, value: String) {
    *slot = Some(match slot.take() {
        None => OneOrMany::One(value),
        Some(existing) => {
            let mut values = existing.into_vec();
            values.push(value);
            OneOrMany::Many(values)
        }
    });
}

fn push_many<I, S>(slot: &mut Option<OneOrMany<String>>, values: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut existing = slot.take().map(OneOrMany::into_vec).unwrap_or_default();
    existing.extend(values.into_iter().map(Into::into));
    *slot = Some(OneOrMany::Many(existing));
}

impl HandlerBuilder {
    /// Creates a builder for a handler called `name`, with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            raw: RawHandler::new(name),
        }
    }

    /// Sets the doc comment shown by help.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.raw.doc = Some(doc.into());
        self
    }

    /// Attaches the handler body.
    pub fn callable<F: Any + Send + Sync>(mut self, body: F) -> Self {
        self.raw.callable = Some(Arc::new(body));
        self
    }

    // ── Triggers ────────────────────────────────────────────────────────────

    /// Adds a command (`.name`).
    pub fn command(mut self, name: impl Into<String>) -> Self {
        self.raw.commands.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    /// Adds a nickname command (`Bot: name`).
    pub fn nickname_command(mut self, name: impl Into<String>) -> Self {
        self.raw
            .nickname_commands
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }

    /// Adds an action command (`/me name`).
    pub fn action_command(mut self, name: impl Into<String>) -> Self {
        self.raw
            .action_commands
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }

    /// Adds a rule matched against the whole message.
    pub fn rule(mut self, template: impl Into<String>) -> Self {
        push_one(&mut self.raw.rule, template.into());
        self
    }

    /// Adds several rules.
    pub fn rules<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        push_many(&mut self.raw.rule, templates);
        self
    }

    /// Adds a rule matched for every occurrence in the message.
    pub fn find(mut self, template: impl Into<String>) -> Self {
        push_one(&mut self.raw.find_rules, template.into());
        self
    }

    /// Adds a rule matched anywhere in the message.
    pub fn search(mut self, template: impl Into<String>) -> Self {
        push_one(&mut self.raw.search_rules, template.into());
        self
    }

    /// Adds an IRC event the handler listens to.
    pub fn event(mut self, event: impl Into<String>) -> Self {
        push_one(&mut self.raw.event, event.into());
        self
    }

    /// Adds several IRC events.
    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        push_many(&mut self.raw.event, events);
        self
    }

    /// Adds an intent, raw or precompiled.
    pub fn intent(mut self, intent: impl Into<Pattern>) -> Self {
        self.raw.intents.get_or_insert_with(Vec::new).push(intent.into());
        self
    }

    /// Runs the handler every `period`, making it a job.
    pub fn interval(mut self, period: Duration) -> Self {
        self.raw.interval.get_or_insert_with(Vec::new).push(period);
        self
    }

    /// Shorthand for [`interval`](Self::interval) in whole seconds.
    pub fn interval_secs(self, secs: u64) -> Self {
        self.interval(Duration::from_secs(secs))
    }

    /// Makes the handler a URL callback.
    pub fn url(mut self, pattern: impl Into<Pattern>) -> Self {
        self.raw.url_regex = Some(pattern.into());
        self
    }

    // ── Settings ────────────────────────────────────────────────────────────

    pub fn rate(mut self, secs: u32) -> Self {
        self.raw.rate = Some(secs);
        self
    }

    pub fn channel_rate(mut self, secs: u32) -> Self {
        self.raw.channel_rate = Some(secs);
        self
    }

    pub fn global_rate(mut self, secs: u32) -> Self {
        self.raw.global_rate = Some(secs);
        self
    }

    pub fn unblockable(mut self) -> Self {
        self.raw.unblockable = Some(true);
        self
    }

    /// Lets the handler see the bot's own messages.
    pub fn echo(mut self) -> Self {
        self.raw.echo = Some(true);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.raw.priority = Some(priority);
        self
    }

    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.raw.output_prefix = Some(prefix.into());
        self
    }

    pub fn thread(mut self, threaded: bool) -> Self {
        self.raw.thread = Some(threaded);
        self
    }

    /// Adds a usage example.
    pub fn example(mut self, example: impl Into<Example>) -> Self {
        self.raw
            .example
            .get_or_insert_with(Vec::new)
            .push(example.into());
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> RawHandler {
        self.raw
    }
}

impl From<HandlerBuilder> for RawHandler {
    fn from(builder: HandlerBuilder) -> Self {
        builder.raw
    }
}

impl From<HandlerBuilder> for PluginItem {
    fn from(builder: HandlerBuilder) -> Self {
        PluginItem::Function(builder.raw)
    }
}

#[cfg(test)]
mod tests {
    use wren_core::{Attr, HandlerAttributes};

    use super::*;

    #[test]
    fn test_single_rule_stays_single() {
        let raw = handler("r").rule("a").build();
        assert_eq!(raw.rule, Some(OneOrMany::One("a".to_string())));
    }

    #[test]
    fn test_repeated_rule_appends() {
        let raw = handler("r").rule("a").rule("b").rules(["c"]).build();
        assert_eq!(raw.rule.unwrap().into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_events_list() {
        let raw = handler("e").events(["join", "part"]).build();
        assert_eq!(
            raw.event,
            Some(OneOrMany::Many(vec!["join".into(), "part".into()]))
        );
    }

    #[test]
    fn test_commands_and_examples() {
        let raw = handler("tell")
            .command("tell")
            .nickname_command("tell")
            .example(".tell a b")
            .example(Example::new(".tell c d").shown_in_help())
            .build();
        assert_eq!(raw.commands, Some(vec!["tell".to_string()]));
        assert_eq!(raw.nickname_commands, Some(vec!["tell".to_string()]));
        let examples = raw.example.unwrap();
        assert!(!examples[0].shown_in_help);
        assert!(examples[1].shown_in_help);
    }

    #[test]
    fn test_job_and_url() {
        let job = handler("tick").interval_secs(60).build();
        assert!(job.has(Attr::Interval));
        let url = handler("title").url("https?://").build();
        assert!(url.has(Attr::UrlRegex));
        assert!(!url.has(Attr::Interval));
    }

    #[test]
    fn test_shutdown_and_value() {
        assert_eq!(shutdown().build().name, SHUTDOWN_HANDLER_NAME);
        assert!(!value("LIMIT").is_callable());
    }

    #[test]
    fn test_callable_attached() {
        fn body() -> &'static str {
            "hi"
        }
        let raw = handler("hi").command("hi").callable(body as fn() -> &'static str).build();
        let callable = raw.callable.unwrap();
        let f = callable.downcast_ref::<fn() -> &'static str>().unwrap();
        assert_eq!(f(), "hi");
    }
}
