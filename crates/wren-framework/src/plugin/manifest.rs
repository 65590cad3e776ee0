//! Plugin manifest: the ordered list of everything a plugin exposes.

use wren_core::RawHandler;

/// One binding exported by a plugin.
#[derive(Debug, Clone)]
pub enum PluginItem {
    /// A callable handler with its raw metadata.
    Function(RawHandler),
    /// A non-callable binding (constant, shared state). Skipped by the scanner.
    Value {
        /// Binding name.
        name: String,
    },
}

impl PluginItem {
    /// Declared name of the binding.
    pub fn name(&self) -> &str {
        match self {
            Self::Function(handler) => &handler.name,
            Self::Value { name } => name,
        }
    }

    /// Returns `true` for [`PluginItem::Function`].
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl From<RawHandler> for PluginItem {
    fn from(handler: RawHandler) -> Self {
        Self::Function(handler)
    }
}

/// A plugin's exports in declaration order.
///
/// Built by the plugin's manifest function (usually generated by
/// [`define_plugin!`](crate::define_plugin)); consumed by
/// [`scan`](crate::scanner::scan).
#[derive(Debug, Clone)]
pub struct PluginManifest {
    name: String,
    items: Vec<PluginItem>,
}

impl PluginManifest {
    /// Creates an empty manifest for the plugin `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Appends an item, builder style.
    pub fn item(mut self, item: impl Into<PluginItem>) -> Self {
        self.push(item);
        self
    }

    /// Appends an item.
    pub fn push(&mut self, item: impl Into<PluginItem>) {
        self.items.push(item.into());
    }

    /// Plugin name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Items in declaration order.
    pub fn items(&self) -> &[PluginItem] {
        &self.items
    }

    /// Splits the manifest into its name and items.
    pub fn into_parts(self) -> (String, Vec<PluginItem>) {
        (self.name, self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
