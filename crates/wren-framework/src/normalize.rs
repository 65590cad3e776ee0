//! Handler normalization.
//!
//! [`normalize`] turns a [`RawHandler`] into a [`NormalizedHandler`]: defaults
//! are filled in, rule and intent templates are compiled, and help entries are
//! built for command handlers. The raw handler is consumed, so normalizing the
//! same handler twice is a compile-time error rather than a double compilation.
//!
//! Which fields get populated depends on classification:
//!
//! | Handler | `limits` | `trigger` |
//! |---------|----------|-----------|
//! | triggerable | `Some` | `Some` |
//! | URL callback | `Some` | `None` |
//! | job | `None` | `None` |

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tracing::trace;
use wren_core::pattern::{compile_intent, compile_url};
use wren_core::{
    Attr, Callable, CompileResult, CompiledPattern, ConfigSnapshot, Example, HandlerAttributes,
    OneOrMany, Priority, RawHandler, RuleCompiler, is_limitable, is_triggerable, trim_docstring,
};

use crate::help::{HelpDoc, HelpEntry, help_examples};

/// Event a triggerable handler listens to when it declares none.
pub const DEFAULT_EVENT: &str = "PRIVMSG";

const ALL_ATTRS: [Attr; 10] = [
    Attr::Rule,
    Attr::FindRules,
    Attr::SearchRules,
    Attr::Event,
    Attr::Intents,
    Attr::Commands,
    Attr::NicknameCommands,
    Attr::ActionCommands,
    Attr::UrlRegex,
    Attr::Interval,
];

/// Rate-limit settings of a limitable handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimits {
    /// Per-user rate limit, in seconds.
    pub rate: u32,
    /// Per-channel rate limit, in seconds.
    pub channel_rate: u32,
    /// Bot-wide rate limit, in seconds.
    pub global_rate: u32,
    /// Whether the handler ignores ban lists.
    pub unblockable: bool,
}

/// Dispatch metadata of a triggerable handler.
#[derive(Debug, Clone)]
pub struct TriggerSettings {
    pub echo: bool,
    pub priority: Priority,
    pub output_prefix: String,
    /// Uppercased IRC event names.
    pub events: Vec<String>,
    pub rule: Option<Vec<CompiledPattern>>,
    pub find_rules: Option<Vec<CompiledPattern>>,
    pub search_rules: Option<Vec<CompiledPattern>>,
    pub intents: Option<Vec<CompiledPattern>>,
    pub commands: Option<Vec<String>>,
    pub nickname_commands: Option<Vec<String>>,
    pub action_commands: Option<Vec<String>>,
}

/// A handler ready to be registered with the dispatcher.
#[derive(Clone)]
pub struct NormalizedHandler {
    /// Declared name of the handler.
    pub name: String,
    /// Trimmed doc comment lines.
    pub doc: Vec<String>,
    /// Handler body, passed through untouched.
    pub callable: Option<Callable>,
    /// Whether the dispatcher runs the handler on its own thread.
    pub thread: bool,
    /// Present on limitable handlers.
    pub limits: Option<RateLimits>,
    /// Present on triggerable handlers.
    pub trigger: Option<TriggerSettings>,
    pub interval: Option<Vec<Duration>>,
    pub url_regex: Option<CompiledPattern>,
    /// Examples as declared.
    pub example: Option<Vec<Example>>,
    /// Help entries keyed by command name; aliases share one handle.
    pub docs: HashMap<String, HelpDoc>,
    declared: Vec<Attr>,
}

impl NormalizedHandler {
    /// Returns `true` if the handler reacts to messages.
    pub fn is_triggerable(&self) -> bool {
        self.trigger.is_some()
    }

    /// Command names of the handler that have help entries.
    pub fn documented_commands(&self) -> impl Iterator<Item = &str> {
        self.docs.keys().map(String::as_str)
    }
}

impl HandlerAttributes for NormalizedHandler {
    fn has(&self, attr: Attr) -> bool {
        // Triggerables always end up with an event list.
        self.declared.contains(&attr) || (attr == Attr::Event && self.trigger.is_some())
    }
}

impl fmt::Debug for NormalizedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedHandler")
            .field("name", &self.name)
            .field("thread", &self.thread)
            .field("limits", &self.limits)
            .field("trigger", &self.trigger)
            .field("interval", &self.interval)
            .field("url_regex", &self.url_regex)
            .field("docs", &self.docs)
            .finish_non_exhaustive()
    }
}

/// Normalizes `raw` for the bot described by `config`.
///
/// # Errors
///
/// Returns the first rule, intent or URL template that fails to compile.
pub fn normalize(
    raw: RawHandler,
    config: &ConfigSnapshot,
    compiler: &dyn RuleCompiler,
) -> CompileResult<NormalizedHandler> {
    let limitable = is_limitable(&raw);
    let triggerable = is_triggerable(&raw);
    let declared = ALL_ATTRS.into_iter().filter(|&a| raw.has(a)).collect();
    let doc = trim_docstring(raw.doc.as_deref());

    let RawHandler {
        name,
        doc: _,
        callable,
        rule,
        find_rules,
        search_rules,
        event,
        intents,
        commands,
        nickname_commands,
        action_commands,
        interval,
        url_regex,
        rate,
        channel_rate,
        global_rate,
        unblockable,
        echo,
        priority,
        output_prefix,
        thread,
        example,
    } = raw;

    let limits = limitable.then(|| RateLimits {
        rate: rate.unwrap_or(0),
        channel_rate: channel_rate.unwrap_or(0),
        global_rate: global_rate.unwrap_or(0),
        unblockable: unblockable.unwrap_or(false),
    });
    let url_regex = url_regex
        .map(|pattern| pattern.into_compiled(compile_url))
        .transpose()?;

    let mut handler = NormalizedHandler {
        name,
        doc,
        callable,
        thread: thread.unwrap_or(true),
        limits,
        trigger: None,
        interval,
        url_regex,
        example,
        docs: HashMap::new(),
        declared,
    };

    if !triggerable {
        trace!(handler = %handler.name, limitable, "Normalized non-triggerable handler");
        return Ok(handler);
    }

    let events = event
        .map_or_else(|| vec![DEFAULT_EVENT.to_string()], OneOrMany::into_vec)
        .into_iter()
        .map(|event| event.to_uppercase())
        .collect();

    let compile_rules = |templates: Option<OneOrMany<String>>| {
        templates
            .map(|templates| {
                templates
                    .into_vec()
                    .iter()
                    .map(|template| compiler.compile(&config.nick, template, &config.alias_nicks))
                    .collect::<CompileResult<Vec<_>>>()
            })
            .transpose()
    };
    let rule = compile_rules(rule)?;
    let find_rules = compile_rules(find_rules)?;
    let search_rules = compile_rules(search_rules)?;

    if commands.is_some() || nickname_commands.is_some() || action_commands.is_some() {
        let examples = help_examples(handler.example.as_deref().unwrap_or_default(), config);
        if !handler.doc.is_empty() || !examples.is_empty() {
            let entry = HelpDoc::new(HelpEntry {
                lines: handler.doc.clone(),
                examples,
            });
            for command in commands.iter().chain(nickname_commands.iter()).flatten() {
                handler.docs.insert(command.clone(), entry.clone());
            }
        }
    }

    let intents = intents
        .map(|intents| {
            intents
                .into_iter()
                .map(|intent| intent.into_compiled(compile_intent))
                .collect::<CompileResult<Vec<_>>>()
        })
        .transpose()?;

    handler.trigger = Some(TriggerSettings {
        echo: echo.unwrap_or(false),
        priority: priority.unwrap_or_default(),
        output_prefix: output_prefix.unwrap_or_default(),
        events,
        rule,
        find_rules,
        search_rules,
        intents,
        commands,
        nickname_commands,
        action_commands,
    });
    trace!(handler = %handler.name, docs = handler.docs.len(), "Normalized triggerable handler");
    Ok(handler)
}
