//! Pattern types and rule compilation.
//!
//! Handlers declare their triggers as raw templates (`"$nickname: hello"`).
//! Before a handler reaches the dispatcher every template is compiled into a
//! [`CompiledPattern`]. Rules go through a [`RuleCompiler`], which knows the
//! bot's nick and aliases; intents and URL patterns are compiled directly.
//!
//! ```rust,ignore
//! use wren_core::pattern::{NickRuleCompiler, RuleCompiler};
//!
//! let rule = NickRuleCompiler.compile("Wren", "$nick hello", &[])?;
//! assert!(rule.is_match("wren: hello"));
//! ```

use std::fmt;

use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::error::{CompileResult, RuleCompilationError};

// =============================================================================
// CompiledPattern
// =============================================================================

/// A matchable pattern produced by rule, intent or URL compilation.
///
/// Cloning is cheap: the compiled program is shared.
#[derive(Debug, Clone)]
pub struct CompiledPattern(Regex);

impl CompiledPattern {
    /// Returns the source of the compiled pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    /// Returns the underlying regex.
    pub fn regex(&self) -> &Regex {
        &self.0
    }
}

impl From<Regex> for CompiledPattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Pattern
// =============================================================================

/// A pattern that may or may not have been compiled yet.
///
/// Used for intents and URL callbacks, which plugin authors may declare either
/// as templates or as prebuilt regexes. Compiling a [`Pattern::Compiled`] entry
/// is the identity, so compilation over a mixed list never touches entries
/// that are already usable.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Raw template text.
    Raw(String),
    /// Already compiled.
    Compiled(CompiledPattern),
}

impl Pattern {
    /// Returns `true` for [`Pattern::Compiled`].
    pub fn is_compiled(&self) -> bool {
        matches!(self, Self::Compiled(_))
    }

    /// Returns the template or compiled source text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Raw(template) => template,
            Self::Compiled(pattern) => pattern.as_str(),
        }
    }

    /// Compiles a raw template with `compile`; compiled patterns pass through.
    pub fn into_compiled<F>(self, compile: F) -> CompileResult<CompiledPattern>
    where
        F: FnOnce(&str) -> CompileResult<CompiledPattern>,
    {
        match self {
            Self::Raw(template) => compile(&template),
            Self::Compiled(pattern) => Ok(pattern),
        }
    }
}

impl From<&str> for Pattern {
    fn from(template: &str) -> Self {
        Self::Raw(template.to_string())
    }
}

impl From<String> for Pattern {
    fn from(template: String) -> Self {
        Self::Raw(template)
    }
}

impl From<CompiledPattern> for Pattern {
    fn from(pattern: CompiledPattern) -> Self {
        Self::Compiled(pattern)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self::Compiled(CompiledPattern(regex))
    }
}

// =============================================================================
// RuleCompiler
// =============================================================================

/// Compiles a rule template into a [`CompiledPattern`].
///
/// Implementations receive the bot's nick and its aliases so that templates
/// can refer to the bot by name. Closures with the same signature implement
/// this trait, which keeps tests and alternative syntaxes lightweight.
pub trait RuleCompiler: Send + Sync {
    /// Compiles `pattern` for a bot called `nick` (also answering to `alias_nicks`).
    fn compile(
        &self,
        nick: &str,
        pattern: &str,
        alias_nicks: &[String],
    ) -> CompileResult<CompiledPattern>;
}

impl<F> RuleCompiler for F
where
    F: Fn(&str, &str, &[String]) -> CompileResult<CompiledPattern> + Send + Sync,
{
    fn compile(
        &self,
        nick: &str,
        pattern: &str,
        alias_nicks: &[String],
    ) -> CompileResult<CompiledPattern> {
        self(nick, pattern, alias_nicks)
    }
}

/// The stock rule compiler.
///
/// Template substitutions:
///
/// | Token | Replacement |
/// |-------|-------------|
/// | `$nickname` | the nick pattern |
/// | `$nick ` | the nick pattern followed by `[,:]\s*` |
/// | `$nick` | the nick pattern followed by `[,:]\s+` |
///
/// The nick pattern is the escaped nick, or the group `(alias|…|nick)` when aliases are
/// configured. Rules are case-insensitive; a template spanning several lines is
/// compiled in verbose mode so it can carry whitespace and comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NickRuleCompiler;

impl NickRuleCompiler {
    /// Builds the regex fragment matching the bot's name.
    pub fn nick_pattern(nick: &str, alias_nicks: &[String]) -> String {
        if alias_nicks.is_empty() {
            return regex::escape(nick);
        }
        let names: Vec<String> = alias_nicks
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(nick))
            .map(regex::escape)
            .collect();
        format!("({})", names.join("|"))
    }
}

impl RuleCompiler for NickRuleCompiler {
    fn compile(
        &self,
        nick: &str,
        pattern: &str,
        alias_nicks: &[String],
    ) -> CompileResult<CompiledPattern> {
        let nick = Self::nick_pattern(nick, alias_nicks);
        // `$nickname` first: `$nick` is its prefix.
        let pattern = pattern
            .replace("$nickname", &nick)
            .replace("$nick ", &format!(r"{nick}[,:]\s*"))
            .replace("$nick", &format!(r"{nick}[,:]\s+"));

        let verbose = pattern.contains('\n');
        trace!(pattern = %pattern, verbose, "Compiling rule");
        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .ignore_whitespace(verbose)
            .build()
            .map(CompiledPattern)
            .map_err(|e| RuleCompilationError::new(pattern, e))
    }
}

/// Compiles an intent template (case-insensitive).
pub fn compile_intent(template: &str) -> CompileResult<CompiledPattern> {
    RegexBuilder::new(template)
        .case_insensitive(true)
        .build()
        .map(CompiledPattern)
        .map_err(|e| RuleCompilationError::new(template, e))
}

/// Compiles a URL callback template (case-sensitive).
pub fn compile_url(template: &str) -> CompileResult<CompiledPattern> {
    Regex::new(template)
        .map(CompiledPattern)
        .map_err(|e| RuleCompilationError::new(template, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nick_pattern_without_aliases() {
        assert_eq!(NickRuleCompiler::nick_pattern("Wren", &[]), "Wren");
        assert_eq!(NickRuleCompiler::nick_pattern("W.ren", &[]), r"W\.ren");
    }

    #[test]
    fn test_nick_pattern_with_aliases() {
        let aliases = vec!["wr".to_string(), "birb".to_string()];
        assert_eq!(
            NickRuleCompiler::nick_pattern("Wren", &aliases),
            "(wr|birb|Wren)"
        );
    }

    #[test]
    fn test_compile_rule_nickname_token() {
        let rule = NickRuleCompiler
            .compile("Wren", "^$nickname!$", &[])
            .unwrap();
        assert_eq!(rule.as_str(), "^Wren!$");
        assert!(rule.is_match("wren!"));
    }

    #[test]
    fn test_compile_rule_nick_token() {
        let rule = NickRuleCompiler.compile("Wren", "^$nick hi", &[]).unwrap();
        assert!(rule.is_match("Wren: hi"));
        assert!(rule.is_match("WREN,hi"));
        assert!(!rule.is_match("Wren hi"));
    }

    #[test]
    fn test_compile_rule_glued_nick_token() {
        let rule = NickRuleCompiler.compile("Wren", "^$nickhi", &[]).unwrap();
        assert!(rule.is_match("Wren: hi"));
        assert!(!rule.is_match("Wren:hi"));
    }

    #[test]
    fn test_compile_rule_with_aliases() {
        let aliases = vec!["birb".to_string()];
        let rule = NickRuleCompiler
            .compile("Wren", "^$nick ping", &aliases)
            .unwrap();
        assert!(rule.is_match("birb: ping"));
        assert!(rule.is_match("wren, ping"));
    }

    #[test]
    fn test_compile_rule_verbose_when_multiline() {
        let rule = NickRuleCompiler
            .compile("Wren", "^hello \n world$", &[])
            .unwrap();
        assert!(rule.is_match("helloworld"));
    }

    #[test]
    fn test_compile_rule_syntax_error() {
        let err = NickRuleCompiler.compile("Wren", "(unclosed", &[]).unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
    }

    #[test]
    fn test_closure_rule_compiler() {
        let compiler = |nick: &str, pattern: &str, _: &[String]| {
            compile_url(&format!("{nick}{pattern}"))
        };
        let rule = compiler.compile("a", "b", &[]).unwrap();
        assert_eq!(rule.as_str(), "ab");
    }

    #[test]
    fn test_compile_intent_is_case_insensitive() {
        let intent = compile_intent("action").unwrap();
        assert!(intent.is_match("ACTION"));
    }

    #[test]
    fn test_compile_url_is_case_sensitive() {
        let url = compile_url("https?://example").unwrap();
        assert!(url.is_match("see http://example.org"));
        assert!(!url.is_match("HTTP://EXAMPLE"));
    }

    #[test]
    fn test_pattern_into_compiled() {
        let compiled = compile_intent("x").unwrap();
        let kept = Pattern::from(compiled)
            .into_compiled(|_| panic!("compiled pattern recompiled"))
            .unwrap();
        assert_eq!(kept.as_str(), "x");

        let raw = Pattern::from("y").into_compiled(compile_intent).unwrap();
        assert!(raw.is_match("Y"));
    }
}
