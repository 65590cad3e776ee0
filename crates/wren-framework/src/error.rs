//! Error types for the Wren framework.

use thiserror::Error;
use wren_core::RuleCompilationError;

/// A handler of a plugin failed to normalize.
///
/// Aborts the scan of that plugin only; the loader decides whether to skip
/// or report it.
#[derive(Debug, Error)]
#[error("plugin '{plugin}', handler '{handler}': {source}")]
pub struct ScanError {
    /// Plugin being scanned.
    pub plugin: String,
    /// Handler whose rule, intent or URL template failed to compile.
    pub handler: String,
    #[source]
    pub source: RuleCompilationError,
}

impl ScanError {
    pub fn new(
        plugin: impl Into<String>,
        handler: impl Into<String>,
        source: RuleCompilationError,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            handler: handler.into(),
            source,
        }
    }
}
