//! Plugin registry: the dispatch tables built from scanned plugins.
//!
//! Every loaded plugin contributes its four handler buckets. Command help is
//! indexed globally by command name; when two plugins document the same
//! command, the last one registered wins until it is unregistered.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};
use wren_core::RawHandler;
use wren_framework::{BucketCounts, HelpDoc, NormalizedHandler, PluginMetadata, ScanResult};

use crate::error::{RuntimeError, RuntimeResult};

/// Handlers and metadata of one registered plugin.
#[derive(Debug, Clone)]
pub struct RegisteredPlugin {
    pub metadata: Option<PluginMetadata>,
    pub triggerables: Vec<NormalizedHandler>,
    pub jobs: Vec<NormalizedHandler>,
    pub shutdowns: Vec<RawHandler>,
    pub url_callbacks: Vec<NormalizedHandler>,
}

impl RegisteredPlugin {
    fn counts(&self) -> BucketCounts {
        BucketCounts {
            triggerables: self.triggerables.len(),
            jobs: self.jobs.len(),
            shutdowns: self.shutdowns.len(),
            url_callbacks: self.url_callbacks.len(),
        }
    }

    /// Help entries of the plugin's command handlers.
    fn help_entries(&self) -> impl Iterator<Item = (&str, &HelpDoc)> {
        self.triggerables
            .iter()
            .flat_map(|h| h.docs.iter().map(|(cmd, doc)| (cmd.as_str(), doc)))
    }
}

#[derive(Debug, Clone)]
struct HelpIndexEntry {
    plugin: String,
    doc: HelpDoc,
}

/// Registry of loaded plugins and their handlers.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, RegisteredPlugin>,
    /// Owners of each command's help in registration order; the last is active.
    help: BTreeMap<String, Vec<HelpIndexEntry>>,
}

impl PluginRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handlers of a scanned plugin.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::DuplicatePlugin`] if the plugin is already
    /// registered; unregister it first to reload.
    pub fn register(
        &mut self,
        scanned: ScanResult,
        metadata: Option<PluginMetadata>,
    ) -> RuntimeResult<()> {
        let ScanResult {
            plugin,
            triggerables,
            jobs,
            shutdowns,
            url_callbacks,
        } = scanned;

        if self.plugins.contains_key(&plugin) {
            return Err(RuntimeError::DuplicatePlugin(plugin));
        }

        let entry = RegisteredPlugin {
            metadata,
            triggerables,
            jobs,
            shutdowns,
            url_callbacks,
        };

        for (command, doc) in entry.help_entries() {
            let owners = self.help.entry(command.to_string()).or_default();
            if let Some(previous) = owners.last() {
                warn!(
                    command,
                    plugin = %plugin,
                    previous = %previous.plugin,
                    "Help for command overridden"
                );
            }
            owners.push(HelpIndexEntry {
                plugin: plugin.clone(),
                doc: doc.clone(),
            });
        }

        info!(plugin = %plugin, counts = %entry.counts(), "Registered plugin");
        self.plugins.insert(plugin, entry);
        Ok(())
    }

    /// Removes a plugin and all of its handlers and help entries.
    ///
    /// The removed plugin is returned so its shutdown hooks can be run.
    pub fn unregister(&mut self, plugin: &str) -> RuntimeResult<RegisteredPlugin> {
        let removed = self
            .plugins
            .remove(plugin)
            .ok_or_else(|| RuntimeError::UnknownPlugin(plugin.to_string()))?;

        self.help.retain(|command, owners| {
            let before = owners.len();
            owners.retain(|entry| entry.plugin != plugin);
            if owners.len() != before {
                debug!(command = %command, plugin, "Removed help entry");
            }
            !owners.is_empty()
        });

        info!(plugin, "Unregistered plugin");
        Ok(removed)
    }

    /// Returns `true` if `plugin` is registered.
    pub fn contains(&self, plugin: &str) -> bool {
        self.plugins.contains_key(plugin)
    }

    /// Gets a registered plugin by name.
    pub fn get(&self, plugin: &str) -> Option<&RegisteredPlugin> {
        self.plugins.get(plugin)
    }

    /// Names of all registered plugins, sorted.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Help entry for `command`.
    pub fn help(&self, command: &str) -> Option<&HelpDoc> {
        self.help.get(command)?.last().map(|entry| &entry.doc)
    }

    /// Plugin owning the help entry for `command`.
    pub fn help_owner(&self, command: &str) -> Option<&str> {
        self.help.get(command)?.last().map(|entry| entry.plugin.as_str())
    }

    /// Documented commands grouped by plugin, each group sorted.
    pub fn command_groups(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (command, entry) in self.help.iter().filter_map(|(c, o)| Some((c, o.last()?))) {
            groups
                .entry(entry.plugin.as_str())
                .or_default()
                .push(command.as_str());
        }
        groups
    }

    /// All triggerable handlers with their plugin name.
    pub fn triggerables(&self) -> impl Iterator<Item = (&str, &NormalizedHandler)> {
        self.plugins
            .iter()
            .flat_map(|(name, p)| p.triggerables.iter().map(move |h| (name.as_str(), h)))
    }

    /// All interval jobs with their plugin name.
    pub fn jobs(&self) -> impl Iterator<Item = (&str, &NormalizedHandler)> {
        self.plugins
            .iter()
            .flat_map(|(name, p)| p.jobs.iter().map(move |h| (name.as_str(), h)))
    }

    /// All URL callbacks with their plugin name.
    pub fn url_callbacks(&self) -> impl Iterator<Item = (&str, &NormalizedHandler)> {
        self.plugins
            .iter()
            .flat_map(|(name, p)| p.url_callbacks.iter().map(move |h| (name.as_str(), h)))
    }

    /// All shutdown hooks with their plugin name.
    pub fn shutdowns(&self) -> impl Iterator<Item = (&str, &RawHandler)> {
        self.plugins
            .iter()
            .flat_map(|(name, p)| p.shutdowns.iter().map(move |h| (name.as_str(), h)))
    }

    /// Returns statistics about the registry.
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            plugins: self.plugins.len(),
            commands: self.help.len(),
            ..Default::default()
        };
        for plugin in self.plugins.values() {
            let counts = plugin.counts();
            stats.triggerables += counts.triggerables;
            stats.jobs += counts.jobs;
            stats.shutdowns += counts.shutdowns;
            stats.url_callbacks += counts.url_callbacks;
        }
        stats
    }
}

/// Statistics about the plugin registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered plugins.
    pub plugins: usize,
    pub triggerables: usize,
    pub jobs: usize,
    pub shutdowns: usize,
    pub url_callbacks: usize,
    /// Number of documented commands.
    pub commands: usize,
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Plugins: {} ({} triggerables, {} jobs, {} shutdown hooks, {} URL callbacks), {} documented commands",
            self.plugins,
            self.triggerables,
            self.jobs,
            self.shutdowns,
            self.url_callbacks,
            self.commands
        )
    }
}

#[cfg(test)]
mod tests {
    use wren_core::ConfigSnapshot;
    use wren_framework::{PluginManifest, handler, scan_with_default_compiler, shutdown};

    use super::*;

    fn scanned(manifest: PluginManifest) -> ScanResult {
        scan_with_default_compiler(manifest, &ConfigSnapshot::new("Wren")).unwrap()
    }

    fn tell() -> ScanResult {
        scanned(
            PluginManifest::new("tell")
                .item(handler("tell").doc("Leave a message.").command("tell").command("t"))
                .item(handler("remind").doc("Remind later.").command("in"))
                .item(handler("cleanup").interval_secs(3600))
                .item(shutdown()),
        )
    }

    #[test]
    fn test_register_and_stats() {
        let mut registry = PluginRegistry::new();
        registry.register(tell(), None).unwrap();

        let stats = registry.stats();
        assert_eq!(stats.plugins, 1);
        assert_eq!(stats.triggerables, 2);
        assert_eq!(stats.jobs, 1);
        assert_eq!(stats.shutdowns, 1);
        assert_eq!(stats.commands, 3);
        assert_eq!(
            stats.to_string(),
            "Plugins: 1 (2 triggerables, 1 jobs, 1 shutdown hooks, 0 URL callbacks), 3 documented commands"
        );
    }

    #[test]
    fn test_duplicate_plugin_rejected() {
        let mut registry = PluginRegistry::new();
        registry.register(tell(), None).unwrap();
        let err = registry.register(tell(), None).unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicatePlugin(name) if name == "tell"));
    }

    #[test]
    fn test_help_index_shares_entries() {
        let mut registry = PluginRegistry::new();
        registry.register(tell(), None).unwrap();
        let a = registry.help("tell").unwrap();
        let b = registry.help("t").unwrap();
        assert!(HelpDoc::ptr_eq(a, b));
        assert_eq!(a.read().lines, vec!["Leave a message."]);
    }

    #[test]
    fn test_help_last_registration_wins() {
        let mut registry = PluginRegistry::new();
        registry.register(tell(), None).unwrap();
        let other = scanned(
            PluginManifest::new("other").item(handler("t2").doc("Other t.").command("t")),
        );
        registry.register(other, None).unwrap();
        assert_eq!(registry.help_owner("t"), Some("other"));
        assert_eq!(registry.help("t").unwrap().read().lines, vec!["Other t."]);
    }

    #[test]
    fn test_help_restored_after_override_unregistered() {
        let mut registry = PluginRegistry::new();
        registry.register(tell(), None).unwrap();
        let other = scanned(
            PluginManifest::new("other").item(handler("t2").doc("Other t.").command("t")),
        );
        registry.register(other, None).unwrap();
        registry.unregister("other").unwrap();

        assert_eq!(registry.help_owner("t"), Some("tell"));
        assert_eq!(registry.help("t").unwrap().read().lines, vec!["Leave a message."]);
        assert_eq!(registry.command_groups()["tell"], vec!["in", "t", "tell"]);
        assert_eq!(registry.stats().commands, 3);
    }

    #[test]
    fn test_command_groups_sorted() {
        let mut registry = PluginRegistry::new();
        registry.register(tell(), None).unwrap();
        let groups = registry.command_groups();
        assert_eq!(groups["tell"], vec!["in", "t", "tell"]);
    }

    #[test]
    fn test_unregister_removes_everything() {
        let mut registry = PluginRegistry::new();
        registry.register(tell(), None).unwrap();
        let removed = registry.unregister("tell").unwrap();
        assert_eq!(removed.shutdowns.len(), 1);
        assert!(registry.help("tell").is_none());
        assert_eq!(registry.stats(), RegistryStats::default());
        assert!(matches!(
            registry.unregister("tell"),
            Err(RuntimeError::UnknownPlugin(_))
        ));
    }

    #[test]
    fn test_handler_iterators() {
        let mut registry = PluginRegistry::new();
        registry.register(tell(), None).unwrap();
        let names: Vec<(&str, &str)> = registry
            .triggerables()
            .map(|(p, h)| (p, h.name.as_str()))
            .collect();
        assert_eq!(names, vec![("tell", "tell"), ("tell", "remind")]);
        assert_eq!(registry.jobs().count(), 1);
        assert_eq!(registry.shutdowns().next().map(|(p, _)| p), Some("tell"));
        assert_eq!(registry.url_callbacks().count(), 0);
    }
}
