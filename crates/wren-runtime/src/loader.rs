//! Plugin loading.
//!
//! The [`PluginLoader`] knows every available plugin, either registered by
//! hand or linked into the binary through the [`PLUGINS`] slice, and loads
//! the ones the configuration selects. A plugin that fails to load is
//! recorded as [`LoadState::Failed`]; the others still load.
//!
//! # Linking a plugin
//!
//! ```rust,ignore
//! use wren::prelude::*;
//! use wren::runtime::{PLUGINS, linkme};
//!
//! #[linkme::distributed_slice(PLUGINS)]
//! #[linkme(crate = wren::runtime::linkme)]
//! static PING: PluginDescriptor = define_plugin! {
//!     name: "ping",
//!     items: [handler("ping").command("ping")],
//! };
//! ```

use std::collections::BTreeMap;
use std::fmt;

use linkme::distributed_slice;
use tracing::{debug, info, info_span, warn};
use wren_core::{RawHandler, RuleCompiler};
use wren_framework::{BucketCounts, PluginDescriptor, ScanResult, scan};

use crate::config::CoreConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::registry::PluginRegistry;

/// Plugins linked into the binary.
#[distributed_slice]
pub static PLUGINS: [PluginDescriptor];

/// Outcome of loading one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Known but not loaded yet.
    Pending,
    /// Scanned and registered.
    Loaded(BucketCounts),
    /// Left out by `core.enable` / `core.exclude`.
    Disabled,
    /// Scanning or registration failed.
    Failed(String),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Loaded(counts) => write!(f, "loaded ({counts})"),
            Self::Disabled => f.write_str("disabled"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Summary of a [`PluginLoader::load_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub disabled: usize,
    pub failed: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loaded, {} disabled, {} failed",
            self.loaded, self.disabled, self.failed
        )
    }
}

/// Loads plugins into a [`PluginRegistry`].
#[derive(Debug, Default)]
pub struct PluginLoader {
    descriptors: BTreeMap<&'static str, PluginDescriptor>,
    states: BTreeMap<&'static str, LoadState>,
}

impl PluginLoader {
    /// Creates a loader that knows no plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader that knows every plugin in [`PLUGINS`].
    ///
    /// A linked plugin whose name is already taken is skipped with a warning.
    pub fn with_linked_plugins() -> Self {
        let mut loader = Self::new();
        for descriptor in PLUGINS {
            if let Err(err) = loader.add(*descriptor) {
                warn!(error = %err, "Skipping linked plugin");
            }
        }
        loader
    }

    /// Makes a plugin available for loading.
    pub fn add(&mut self, descriptor: PluginDescriptor) -> RuntimeResult<()> {
        if self.descriptors.contains_key(descriptor.name) {
            return Err(RuntimeError::DuplicatePlugin(descriptor.name.to_string()));
        }
        debug!(plugin = descriptor.name, version = descriptor.metadata.version, "Added plugin");
        self.descriptors.insert(descriptor.name, descriptor);
        self.states.insert(descriptor.name, LoadState::Pending);
        Ok(())
    }

    /// Names of all known plugins, sorted.
    pub fn plugin_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.keys().copied()
    }

    pub fn descriptor(&self, name: &str) -> Option<&PluginDescriptor> {
        self.descriptors.get(name)
    }

    pub fn state(&self, name: &str) -> Option<&LoadState> {
        self.states.get(name)
    }

    /// Load state of every known plugin, sorted by name.
    pub fn states(&self) -> impl Iterator<Item = (&'static str, &LoadState)> {
        self.states.iter().map(|(name, state)| (*name, state))
    }

    /// Loads every plugin `core` selects into `registry`.
    ///
    /// Failures are recorded per plugin and never abort the pass.
    pub fn load_all(
        &mut self,
        core: &CoreConfig,
        registry: &mut PluginRegistry,
        compiler: &dyn RuleCompiler,
    ) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let names: Vec<&'static str> = self.descriptors.keys().copied().collect();

        for name in names {
            if !core.is_plugin_enabled(name) {
                debug!(plugin = name, "Plugin disabled by configuration");
                self.states.insert(name, LoadState::Disabled);
                summary.disabled += 1;
                continue;
            }
            if registry.contains(name) {
                continue;
            }
            match self.load(name, core, registry, compiler) {
                Ok(_) => summary.loaded += 1,
                Err(_) => summary.failed += 1,
            }
        }

        info!(summary = %summary, "Plugins loaded");
        summary
    }

    /// Loads a single plugin, ignoring the enable and exclude lists.
    ///
    /// # Errors
    ///
    /// Unknown or already registered plugins yield an error and leave the
    /// recorded state untouched. Incompatible plugins and plugins that fail
    /// to scan are also recorded as [`LoadState::Failed`].
    pub fn load(
        &mut self,
        name: &str,
        core: &CoreConfig,
        registry: &mut PluginRegistry,
        compiler: &dyn RuleCompiler,
    ) -> RuntimeResult<BucketCounts> {
        let (key, descriptor) = self.lookup(name)?;
        if registry.contains(key) {
            return Err(RuntimeError::DuplicatePlugin(key.to_string()));
        }

        let _span = info_span!("load", plugin = key).entered();
        let result = Self::scan_plugin(descriptor, core, compiler).and_then(|scanned| {
            let counts = scanned.counts();
            registry.register(scanned, Some(descriptor.metadata()))?;
            Ok(counts)
        });
        let state = match &result {
            Ok(counts) => LoadState::Loaded(*counts),
            Err(err) => {
                warn!(error = %err, "Failed to load plugin");
                LoadState::Failed(err.to_string())
            }
        };
        self.states.insert(key, state);
        result
    }

    /// Scans a plugin again and swaps it in for the registered instance.
    ///
    /// Returns the shutdown hooks of the replaced instance along with the new
    /// bucket counts. The new manifest is scanned before anything is removed,
    /// so a failing reload leaves the current instance registered.
    pub fn reload(
        &mut self,
        name: &str,
        core: &CoreConfig,
        registry: &mut PluginRegistry,
        compiler: &dyn RuleCompiler,
    ) -> RuntimeResult<(Vec<RawHandler>, BucketCounts)> {
        let (key, descriptor) = self.lookup(name)?;
        let _span = info_span!("reload", plugin = key).entered();

        let scanned = match Self::scan_plugin(descriptor, core, compiler) {
            Ok(scanned) => scanned,
            Err(err) => {
                if registry.contains(key) {
                    warn!(error = %err, "Reload failed, keeping loaded instance");
                } else {
                    warn!(error = %err, "Failed to load plugin");
                    self.states.insert(key, LoadState::Failed(err.to_string()));
                }
                return Err(err);
            }
        };

        let hooks = if registry.contains(key) {
            registry.unregister(key)?.shutdowns
        } else {
            Vec::new()
        };
        let counts = scanned.counts();
        registry.register(scanned, Some(descriptor.metadata()))?;
        self.states.insert(key, LoadState::Loaded(counts));
        Ok((hooks, counts))
    }

    fn lookup(&self, name: &str) -> RuntimeResult<(&'static str, PluginDescriptor)> {
        self.descriptors
            .get_key_value(name)
            .map(|(&key, &descriptor)| (key, descriptor))
            .ok_or_else(|| RuntimeError::UnknownPlugin(name.to_string()))
    }

    fn scan_plugin(
        descriptor: PluginDescriptor,
        core: &CoreConfig,
        compiler: &dyn RuleCompiler,
    ) -> RuntimeResult<ScanResult> {
        if !descriptor.is_compatible() {
            return Err(RuntimeError::IncompatiblePlugin {
                name: descriptor.name.to_string(),
                api_version: descriptor.api_version,
            });
        }

        Ok(scan(descriptor.manifest(), &core.snapshot(), compiler)?)
    }
}

#[cfg(test)]
mod tests {
    use wren_core::{NickRuleCompiler, compile_url};
    use wren_framework::{
        PluginManifest, PluginMetadata, WREN_PLUGIN_API_VERSION, handler, shutdown,
    };

    use super::*;

    const META: PluginMetadata = PluginMetadata {
        version: "1.0.0",
        desc: "",
        full_desc: None,
    };

    fn good_manifest() -> PluginManifest {
        PluginManifest::new("good").item(handler("hi").command("hi"))
    }

    fn bad_manifest() -> PluginManifest {
        PluginManifest::new("bad").item(handler("broken").rule("(["))
    }

    fn descriptor(name: &'static str, manifest: fn() -> PluginManifest) -> PluginDescriptor {
        PluginDescriptor {
            api_version: WREN_PLUGIN_API_VERSION,
            name,
            manifest,
            metadata: META,
        }
    }

    fn loader() -> PluginLoader {
        let mut loader = PluginLoader::new();
        loader.add(descriptor("good", good_manifest)).unwrap();
        loader.add(descriptor("bad", bad_manifest)).unwrap();
        loader
    }

    #[test]
    fn test_failure_is_isolated() {
        let mut loader = loader();
        let mut registry = PluginRegistry::new();
        let summary = loader.load_all(&CoreConfig::default(), &mut registry, &NickRuleCompiler);

        assert_eq!(summary, LoadSummary { loaded: 1, disabled: 0, failed: 1 });
        assert!(loader.state("good").unwrap().is_loaded());
        assert!(matches!(loader.state("bad"), Some(LoadState::Failed(reason)) if reason.contains("broken")));
        assert!(registry.contains("good"));
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn test_exclude() {
        let mut loader = loader();
        let mut registry = PluginRegistry::new();
        let core = CoreConfig {
            exclude: vec!["bad".into()],
            ..Default::default()
        };
        let summary = loader.load_all(&core, &mut registry, &NickRuleCompiler);
        assert_eq!(summary.failed, 0);
        assert_eq!(loader.state("bad"), Some(&LoadState::Disabled));
    }

    #[test]
    fn test_duplicate_add() {
        let mut loader = loader();
        assert!(matches!(
            loader.add(descriptor("good", good_manifest)),
            Err(RuntimeError::DuplicatePlugin(_))
        ));
    }

    #[test]
    fn test_incompatible_plugin() {
        let mut loader = PluginLoader::new();
        let mut old = descriptor("good", good_manifest);
        old.api_version = 0x0002_0000;
        loader.add(old).unwrap();
        let mut registry = PluginRegistry::new();
        let err = loader
            .load("good", &CoreConfig::default(), &mut registry, &NickRuleCompiler)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::IncompatiblePlugin { .. }));
    }

    #[test]
    fn test_reload() {
        let mut loader = loader();
        let mut registry = PluginRegistry::new();
        let core = CoreConfig::default();
        loader.load("good", &core, &mut registry, &NickRuleCompiler).unwrap();
        let (hooks, counts) = loader
            .reload("good", &core, &mut registry, &NickRuleCompiler)
            .unwrap();
        assert!(hooks.is_empty());
        assert_eq!(counts.triggerables, 1);
        assert_eq!(registry.stats().plugins, 1);
    }

    #[test]
    fn test_second_load_keeps_state() {
        let mut loader = loader();
        let mut registry = PluginRegistry::new();
        let core = CoreConfig::default();
        loader.load("good", &core, &mut registry, &NickRuleCompiler).unwrap();
        let err = loader
            .load("good", &core, &mut registry, &NickRuleCompiler)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicatePlugin(name) if name == "good"));
        assert!(loader.state("good").unwrap().is_loaded());
        assert!(registry.contains("good"));
    }

    fn ruled_manifest() -> PluginManifest {
        PluginManifest::new("ruled")
            .item(handler("r").rule("x"))
            .item(shutdown())
    }

    #[test]
    fn test_failed_reload_keeps_loaded_instance() {
        let mut loader = PluginLoader::new();
        loader.add(descriptor("ruled", ruled_manifest)).unwrap();
        let mut registry = PluginRegistry::new();
        let core = CoreConfig::default();
        loader.load("ruled", &core, &mut registry, &NickRuleCompiler).unwrap();

        let broken = |_: &str, _: &str, _: &[String]| compile_url("(x");
        let err = loader
            .reload("ruled", &core, &mut registry, &broken)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Scan(_)));
        assert!(loader.state("ruled").unwrap().is_loaded());
        assert_eq!(registry.get("ruled").unwrap().shutdowns.len(), 1);

        let (hooks, _) = loader
            .reload("ruled", &core, &mut registry, &NickRuleCompiler)
            .unwrap();
        assert_eq!(hooks.len(), 1);
    }

    #[test]
    fn test_unknown_plugin() {
        let mut loader = PluginLoader::new();
        let mut registry = PluginRegistry::new();
        let err = loader
            .load("nope", &CoreConfig::default(), &mut registry, &NickRuleCompiler)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownPlugin(_)));
        assert_eq!(loader.state("nope"), None);
    }
}
