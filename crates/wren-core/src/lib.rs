//! # Wren Core
//!
//! Handler metadata model shared by every layer of the Wren IRC bot framework.
//!
//! This crate provides:
//! - **Handler model**: [`RawHandler`] with optional, presence-significant
//!   attributes ([`Attr`], [`HandlerAttributes`])
//! - **Classification**: [`is_limitable`], [`is_triggerable`], [`classify`]
//! - **Patterns**: [`Pattern`], [`CompiledPattern`] and the [`RuleCompiler`] seam
//! - **Help text**: [`trim_docstring`]
//! - **Configuration snapshot**: [`ConfigSnapshot`]
//!
//! Normalization and plugin scanning live in `wren-framework`.

pub mod classify;
pub mod config;
pub mod docstring;
pub mod error;
pub mod handler;
pub mod pattern;

pub use classify::{Category, SHUTDOWN_HANDLER_NAME, classify, is_limitable, is_triggerable};
pub use config::{ConfigSnapshot, DEFAULT_HELP_PREFIX};
pub use docstring::trim_docstring;
pub use error::{CompileResult, RuleCompilationError};
pub use handler::{Attr, Callable, Example, HandlerAttributes, OneOrMany, Priority, RawHandler};
pub use pattern::{
    CompiledPattern, NickRuleCompiler, Pattern, RuleCompiler, compile_intent, compile_url,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::classify::{Category, classify, is_limitable, is_triggerable};
    pub use super::config::ConfigSnapshot;
    pub use super::handler::{Attr, Example, HandlerAttributes, OneOrMany, Priority, RawHandler};
    pub use super::pattern::{CompiledPattern, NickRuleCompiler, Pattern, RuleCompiler};
}
