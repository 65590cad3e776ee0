//! Runtime orchestration: configuration, logging and plugin loading.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wren_runtime::WrenRuntime;
//!
//! // Loads wren.toml / wren.yaml from the current directory if present
//! let mut runtime = WrenRuntime::new();
//! let summary = runtime.load_plugins();
//!
//! // Custom configuration path
//! let mut runtime = WrenRuntime::builder()
//!     .config_file("config/wren.toml")
//!     .profile("production")
//!     .build()?;
//! ```

use std::path::Path;

use tracing::{debug, info, warn};
use wren_core::{NickRuleCompiler, RawHandler, RuleCompiler};
use wren_framework::{BucketCounts, PluginDescriptor};

use crate::config::{ConfigLoader, ConfigResult, WrenConfig};
use crate::error::RuntimeResult;
use crate::loader::{LoadSummary, PluginLoader};
use crate::logging;
use crate::registry::PluginRegistry;

/// The Wren runtime: owns the configuration, the known plugins and the
/// registry of loaded handlers.
///
/// ```rust,ignore
/// let mut runtime = WrenRuntime::builder()
///     .without_env()
///     .merge(config)
///     .build()?;
/// runtime.register_plugin(MY_PLUGIN)?;
/// runtime.load_plugins();
/// for (plugin, handler) in runtime.registry().triggerables() {
///     // hand to the dispatcher
/// }
/// ```
pub struct WrenRuntime {
    config: WrenConfig,
    loader: PluginLoader,
    registry: PluginRegistry,
    compiler: Box<dyn RuleCompiler>,
}

impl WrenRuntime {
    /// Creates a runtime with automatic configuration loading.
    ///
    /// Searches the current directory for a config file and falls back to
    /// defaults if loading fails. Every plugin in [`PLUGINS`](crate::PLUGINS)
    /// is known to the runtime.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                WrenConfig::default()
            });

        Self::from_config(&config)
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from configuration and initializes logging.
    pub fn from_config(config: &WrenConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            nick = %config.core.nick,
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            loader: PluginLoader::with_linked_plugins(),
            registry: PluginRegistry::new(),
            compiler: Box::new(NickRuleCompiler),
        }
    }

    /// Replaces the rule compiler used for the `rule`, `find_rules` and
    /// `search_rules` templates of plugins loaded from now on.
    pub fn set_rule_compiler(&mut self, compiler: impl RuleCompiler + 'static) {
        self.compiler = Box::new(compiler);
    }

    pub fn config(&self) -> &WrenConfig {
        &self.config
    }

    pub fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Makes a plugin that is not linked through [`PLUGINS`](crate::PLUGINS)
    /// available for loading.
    pub fn register_plugin(&mut self, descriptor: PluginDescriptor) -> RuntimeResult<()> {
        self.loader.add(descriptor)
    }

    /// Loads every plugin selected by `core.enable` and `core.exclude`.
    pub fn load_plugins(&mut self) -> LoadSummary {
        let summary =
            self.loader
                .load_all(&self.config.core, &mut self.registry, self.compiler.as_ref());
        debug!(stats = %self.registry.stats(), "Registry updated");
        summary
    }

    /// Loads a single plugin by name.
    pub fn load_plugin(&mut self, name: &str) -> RuntimeResult<BucketCounts> {
        self.loader
            .load(name, &self.config.core, &mut self.registry, self.compiler.as_ref())
    }

    /// Reloads a plugin, returning the shutdown hooks of the replaced
    /// instance so they can be run.
    ///
    /// If the plugin fails to scan, the loaded instance stays registered.
    pub fn reload_plugin(&mut self, name: &str) -> RuntimeResult<(Vec<RawHandler>, BucketCounts)> {
        self.loader
            .reload(name, &self.config.core, &mut self.registry, self.compiler.as_ref())
    }

    /// Unloads a plugin and returns its shutdown hooks.
    pub fn unload_plugin(&mut self, name: &str) -> RuntimeResult<Vec<RawHandler>> {
        Ok(self.registry.unregister(name)?.shutdowns)
    }

    /// Unloads every plugin and returns all shutdown hooks, grouped in
    /// plugin name order.
    pub fn shutdown(&mut self) -> Vec<(String, RawHandler)> {
        let names: Vec<String> = self.registry.plugin_names().map(str::to_string).collect();
        let mut hooks = Vec::new();
        for name in names {
            match self.registry.unregister(&name) {
                Ok(plugin) => {
                    hooks.extend(plugin.shutdowns.into_iter().map(|h| (name.clone(), h)));
                }
                Err(e) => warn!(plugin = %name, error = %e, "Failed to unload plugin"),
            }
        }
        info!(hooks = hooks.len(), "Runtime shut down");
        hooks
    }
}

impl Default for WrenRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`WrenRuntime`] with custom configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g. "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Enables `WREN_*` environment variables (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: WrenConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> ConfigResult<WrenRuntime> {
        let config = self.config_loader.load()?;
        Ok(WrenRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
