//! # Wren Framework
//!
//! Turns plugin declarations into handlers the bot can dispatch.
//!
//! This layer provides:
//! - Plugin manifests and descriptors, with the [`define_plugin!`] macro
//! - Chainable handler builders (`handler`, `shutdown`, `value`)
//! - Handler normalization: defaults, rule and intent compilation, help entries
//! - Plugin scanning into triggerables, jobs, shutdown hooks and URL callbacks
//!
//! Loading plugins from configuration and keeping the dispatch tables is the
//! runtime's job.

pub mod error;
pub mod help;
pub mod normalize;
pub mod plugin;
pub mod scanner;

pub use error::ScanError;
pub use help::{HelpDoc, HelpEntry};
pub use normalize::{DEFAULT_EVENT, NormalizedHandler, RateLimits, TriggerSettings, normalize};
pub use plugin::{
    HandlerBuilder, PluginDescriptor, PluginItem, PluginManifest, PluginMetadata,
    WREN_PLUGIN_API_VERSION, handler, shutdown, value,
};
pub use scanner::{BucketCounts, ScanResult, scan, scan_with_default_compiler};
