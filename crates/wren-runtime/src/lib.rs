//! Wren Runtime - configuration, logging and plugin loading for the Wren
//! IRC bot framework.
//!
//! This crate provides:
//! - Layered configuration (`wren.toml` / `wren.yaml`, `WREN_*` environment)
//! - Logging setup on top of `tracing-subscriber`
//! - Plugin discovery through the [`PLUGINS`] slice and per-plugin loading
//! - The [`PluginRegistry`] of loaded handlers and the global help index
//! - Runtime orchestration (`WrenRuntime`)
//!
//! ```ignore
//! use wren_runtime::WrenRuntime;
//!
//! fn main() {
//!     let mut runtime = WrenRuntime::new();
//!     let summary = runtime.load_plugins();
//!     println!("{summary}; {}", runtime.registry().stats());
//!
//!     for (plugin, hook) in runtime.shutdown() {
//!         println!("running shutdown hook of {plugin}: {}", hook.name);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod registry;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, CoreConfig, WrenConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use loader::{LoadState, LoadSummary, PLUGINS, PluginLoader};
pub use logging::{LoggingBuilder, LoggingError, SpanEvents};
pub use registry::{PluginRegistry, RegisteredPlugin, RegistryStats};
pub use runtime::{RuntimeBuilder, WrenRuntime};

// Re-exported so plugin crates can link into `PLUGINS` without depending on
// these crates directly.
pub use linkme;
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides the commonly used logging macros and `Level`.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
