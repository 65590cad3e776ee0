//! # Wren
//!
//! A plugin-driven IRC bot framework for Rust.
//!
//! ## Overview
//!
//! Plugins declare their handlers as plain metadata: which commands or rules
//! trigger them, how often they run, which URLs they react to. Wren classifies
//! every handler of a plugin into one of four buckets and normalizes its
//! metadata into a form a dispatcher can use directly.
//!
//! ```text
//! ┌──────────────┐     ┌─────────┐     ┌───────────┐     ┌──────────────────┐
//! │ define_plugin│────▶│ scanner │────▶│ normalize │────▶│ PluginRegistry   │
//! │  (manifest)  │     │(classify│     │ (per      │     │ triggerables,    │
//! └──────────────┘     │ buckets)│     │  handler) │     │ jobs, shutdowns, │
//!                      └─────────┘     └───────────┘     │ URL callbacks,   │
//!                                                        │ help index       │
//!                                                        └──────────────────┘
//! ```
//!
//! - **Core** (`wren-core`): handler attributes, classification, patterns
//! - **Framework** (`wren-framework`): normalization, help, manifests, scanning
//! - **Runtime** (`wren-runtime`): configuration, logging, loading, registry
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wren::prelude::*;
//! use wren::runtime::{PLUGINS, linkme};
//!
//! fn tell() -> &'static str { "noted" }
//!
//! /// Leaves messages for people who are away.
//! #[linkme::distributed_slice(PLUGINS)]
//! #[linkme(crate = wren::runtime::linkme)]
//! static TELL: PluginDescriptor = define_plugin! {
//!     name: "tell",
//!     items: [
//!         handler("tell")
//!             .doc("Leave a message for someone.")
//!             .command("tell")
//!             .example(".tell Alice see you at 5")
//!             .callable(tell as fn() -> &'static str),
//!         shutdown(),
//!     ],
//! };
//!
//! fn main() {
//!     let mut runtime = WrenRuntime::new();
//!     runtime.load_plugins();
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: Load `wren.toml` configuration files (default)
//! - `yaml-config`: Load `wren.yaml` configuration files
//! - `json-log`: JSON log output

pub use wren_core as core;
pub use wren_framework as framework;
pub use wren_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use wren::prelude::*;
/// ```
pub mod prelude {
    // Runtime
    pub use wren_runtime::{
        CoreConfig, PluginRegistry, RuntimeError, RuntimeResult, WrenConfig, WrenRuntime,
    };

    // Plugin declaration
    pub use wren_framework::{
        PluginDescriptor, PluginItem, PluginManifest, PluginMetadata, define_plugin, handler,
        shutdown, value,
    };

    // Scanning and normalization
    pub use wren_framework::{
        HelpDoc, NormalizedHandler, RateLimits, ScanResult, TriggerSettings, normalize, scan,
    };

    // Handler model
    pub use wren_core::{
        Attr, Category, ConfigSnapshot, Example, HandlerAttributes, NickRuleCompiler, Pattern,
        Priority, RawHandler, RuleCompiler, classify,
    };

    // Logging macros
    pub use wren_runtime::tracing::{debug, error, info, trace, warn};
}
