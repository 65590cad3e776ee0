//! Plugin descriptor: the static, `Copy` handle to a plugin.

use super::PluginManifest;

// ─── API versioning ──────────────────────────────────────────────────────────

/// Current Wren plugin API version (1.0).
pub const WREN_PLUGIN_API_VERSION: u32 = 0x0001_0000;

// ─── PluginMetadata ──────────────────────────────────────────────────────────

/// Descriptive metadata attached to every plugin.
///
/// | Field | Default |
/// |-------|---------|
/// | `version` | `CARGO_PKG_VERSION` of the crate that defined the plugin |
/// | `desc` | `CARGO_PKG_DESCRIPTION` of the defining crate, or `""` |
/// | `full_desc` | the `///` comment above `name:`, else `None` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginMetadata {
    /// Semver version string of the plugin.
    pub version: &'static str,
    /// One-line description shown in logs and help listings.
    pub desc: &'static str,
    /// Optional long-form description.
    pub full_desc: Option<&'static str>,
}

// ─── PluginDescriptor ────────────────────────────────────────────────────────

/// A static, `Copy` descriptor that identifies a plugin and builds its manifest.
///
/// Use the [`define_plugin!`](crate::define_plugin) macro to create one.
#[derive(Debug, Clone, Copy)]
pub struct PluginDescriptor {
    /// Plugin API version this descriptor was compiled against.
    pub api_version: u32,

    /// Plugin name (used in logs and as the enable/exclude key).
    pub name: &'static str,

    /// Builds a fresh manifest of the plugin's exports.
    pub manifest: fn() -> PluginManifest,

    /// Static metadata snapshot for this plugin.
    pub metadata: PluginMetadata,
}

impl PluginDescriptor {
    /// Returns `true` if this descriptor's API version is compatible with the
    /// running framework.
    ///
    /// The major part must match exactly; the descriptor's minor part must be
    /// ≤ the host's minor part.
    pub fn is_compatible(&self) -> bool {
        let host_major = WREN_PLUGIN_API_VERSION >> 16;
        let desc_major = self.api_version >> 16;
        let desc_minor = self.api_version & 0xFFFF;
        let host_minor = WREN_PLUGIN_API_VERSION & 0xFFFF;
        desc_major == host_major && desc_minor <= host_minor
    }

    /// Builds the plugin's manifest.
    ///
    /// Every call yields fresh, unnormalized handlers, so a plugin can be
    /// scanned again on reload.
    #[inline]
    pub fn manifest(&self) -> PluginManifest {
        (self.manifest)()
    }

    /// Returns this plugin's static [`PluginMetadata`].
    #[inline]
    pub fn metadata(&self) -> PluginMetadata {
        self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> PluginManifest {
        PluginManifest::new("empty")
    }

    fn descriptor(api_version: u32) -> PluginDescriptor {
        PluginDescriptor {
            api_version,
            name: "empty",
            manifest: empty,
            metadata: PluginMetadata {
                version: "0.1.0",
                desc: "",
                full_desc: None,
            },
        }
    }

    #[test]
    fn test_compatibility() {
        assert!(descriptor(WREN_PLUGIN_API_VERSION).is_compatible());
        assert!(descriptor(0x0001_0000).is_compatible());
        assert!(!descriptor(0x0001_0001).is_compatible());
        assert!(!descriptor(0x0002_0000).is_compatible());
    }

    #[test]
    fn test_manifest_is_fresh() {
        let d = descriptor(WREN_PLUGIN_API_VERSION);
        assert_eq!(d.manifest().name(), "empty");
        assert!(d.manifest().is_empty());
    }
}
