//! Plugin scanning.
//!
//! [`scan`] walks a [`PluginManifest`] in declaration order, classifies every
//! callable and sorts it into one of four buckets:
//!
//! 1. a function named `shutdown` goes to `shutdowns`, untouched;
//! 2. a triggerable goes to `triggerables`;
//! 3. a function with an interval goes to `jobs`;
//! 4. a function with a URL pattern goes to `url_callbacks`.
//!
//! Everything else is left out. All but shutdown hooks are normalized on the
//! way in.

use std::fmt;

use tracing::{debug, debug_span, trace};
use wren_core::{Category, ConfigSnapshot, NickRuleCompiler, RawHandler, RuleCompiler, classify};

use crate::error::ScanError;
use crate::normalize::{NormalizedHandler, normalize};
use crate::plugin::{PluginItem, PluginManifest};

/// Handlers of one plugin, bucketed by category.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Plugin the handlers came from.
    pub plugin: String,
    pub triggerables: Vec<NormalizedHandler>,
    pub jobs: Vec<NormalizedHandler>,
    /// Shutdown hooks are never normalized.
    pub shutdowns: Vec<RawHandler>,
    pub url_callbacks: Vec<NormalizedHandler>,
}

/// Bucket sizes of a [`ScanResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    pub triggerables: usize,
    pub jobs: usize,
    pub shutdowns: usize,
    pub url_callbacks: usize,
}

impl BucketCounts {
    pub fn total(&self) -> usize {
        self.triggerables + self.jobs + self.shutdowns + self.url_callbacks
    }
}

impl fmt::Display for BucketCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} triggerables, {} jobs, {} shutdown hooks, {} URL callbacks",
            self.triggerables, self.jobs, self.shutdowns, self.url_callbacks
        )
    }
}

impl ScanResult {
    fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            ..Self::default()
        }
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            triggerables: self.triggerables.len(),
            jobs: self.jobs.len(),
            shutdowns: self.shutdowns.len(),
            url_callbacks: self.url_callbacks.len(),
        }
    }

    /// Returns `true` if no handler was found.
    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }
}

/// Scans `manifest` for handlers, normalizing them for `config`.
///
/// # Errors
///
/// Returns a [`ScanError`] naming the first handler whose rule, intent or URL
/// template does not compile. Handlers scanned before it are discarded.
pub fn scan(
    manifest: PluginManifest,
    config: &ConfigSnapshot,
    compiler: &dyn RuleCompiler,
) -> Result<ScanResult, ScanError> {
    let (plugin, items) = manifest.into_parts();
    let _span = debug_span!("scan", plugin = %plugin).entered();
    let mut result = ScanResult::new(plugin);

    for item in items {
        let raw = match item {
            PluginItem::Function(raw) => raw,
            PluginItem::Value { name } => {
                trace!(item = %name, "Skipping non-callable item");
                continue;
            }
        };

        let category = classify(&raw.name, &raw);
        debug!(handler = %raw.name, %category, "Classified handler");

        let bucket = match category {
            Category::Shutdown => {
                result.shutdowns.push(raw);
                continue;
            }
            Category::Unclassified => continue,
            Category::Triggerable => &mut result.triggerables,
            Category::Job => &mut result.jobs,
            Category::UrlCallback => &mut result.url_callbacks,
        };

        let name = raw.name.clone();
        let handler = normalize(raw, config, compiler)
            .map_err(|source| ScanError::new(result.plugin.as_str(), name, source))?;
        bucket.push(handler);
    }

    debug!(counts = %result.counts(), "Scan complete");
    Ok(result)
}

/// [`scan`] with the default [`NickRuleCompiler`].
pub fn scan_with_default_compiler(
    manifest: PluginManifest,
    config: &ConfigSnapshot,
) -> Result<ScanResult, ScanError> {
    scan(manifest, config, &NickRuleCompiler)
}

#[cfg(test)]
mod tests {
    use wren_core::CompiledPattern;
    use wren_core::pattern::compile_url;

    use super::*;
    use crate::plugin::builder::{handler, shutdown, value};

    fn config() -> ConfigSnapshot {
        ConfigSnapshot::new("Wren")
    }

    #[test]
    fn test_scan_buckets_by_precedence() {
        let manifest = PluginManifest::new("mixed")
            .item(handler("url_and_rule").rule("x").url("https?://"))
            .item(handler("job_and_rule").rule("y").interval_secs(5))
            .item(handler("job_and_url").interval_secs(5).url("https?://"));
        let result = scan_with_default_compiler(manifest, &config()).unwrap();
        // rule + url_regex and rule + interval are not triggerable
        assert!(result.triggerables.is_empty());
        let jobs: Vec<&str> = result.jobs.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(jobs, vec!["job_and_rule", "job_and_url"]);
        assert_eq!(result.url_callbacks[0].name, "url_and_rule");
    }

    #[test]
    fn test_scan_shutdown_not_normalized() {
        let manifest = PluginManifest::new("p").item(shutdown().command("bye"));
        let result = scan_with_default_compiler(manifest, &config()).unwrap();
        assert_eq!(result.shutdowns.len(), 1);
        assert!(result.triggerables.is_empty());
        assert_eq!(result.shutdowns[0].commands, Some(vec!["bye".to_string()]));
        assert_eq!(result.shutdowns[0].thread, None);
    }

    #[test]
    fn test_scan_preserves_declaration_order() {
        let manifest = PluginManifest::new("p")
            .item(handler("zz").command("zz"))
            .item(value("SKIPPED"))
            .item(handler("aa").command("aa"))
            .item(handler("mm").event("JOIN"));
        let result = scan_with_default_compiler(manifest, &config()).unwrap();
        let names: Vec<&str> = result.triggerables.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["zz", "aa", "mm"]);
    }

    #[test]
    fn test_scan_error_names_plugin_and_handler() {
        let manifest = PluginManifest::new("broken")
            .item(handler("ok").command("ok"))
            .item(handler("bad").rule("(unclosed"));
        let err = scan_with_default_compiler(manifest, &config()).unwrap_err();
        assert_eq!(err.plugin, "broken");
        assert_eq!(err.handler, "bad");
        assert!(err.to_string().starts_with("plugin 'broken', handler 'bad'"));
    }

    #[test]
    fn test_scan_with_custom_compiler() {
        // case-sensitive, no nick substitution
        let plain = |_: &str, pattern: &str, _: &[String]| compile_url(pattern);
        let manifest = PluginManifest::new("p").item(handler("r").rule("Hello"));
        let result = scan(manifest, &config(), &plain).unwrap();
        let trigger = result.triggerables[0].trigger.as_ref().unwrap();
        let rules: &[CompiledPattern] = trigger.rule.as_deref().unwrap();
        assert!(rules[0].is_match("Hello"));
        assert!(!rules[0].is_match("hello"));
    }

    #[test]
    fn test_counts_display() {
        let counts = BucketCounts {
            triggerables: 2,
            jobs: 1,
            shutdowns: 0,
            url_callbacks: 3,
        };
        assert_eq!(counts.total(), 6);
        assert_eq!(
            counts.to_string(),
            "2 triggerables, 1 jobs, 0 shutdown hooks, 3 URL callbacks"
        );
    }
}
