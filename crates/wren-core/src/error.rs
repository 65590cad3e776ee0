//! Unified error types for the Wren core.
//!
//! Framework-level errors (like `ScanError`) are defined in wren-framework.

use thiserror::Error;

// =============================================================================
// Pattern Errors
// =============================================================================

/// A rule, intent or URL template failed to compile.
///
/// Raised by [`RuleCompiler`](crate::pattern::RuleCompiler) implementations and
/// by intent compilation. It aborts normalization of the plugin currently being
/// scanned; the plugin loader decides whether to skip or report that plugin.
#[derive(Debug, Clone, Error)]
#[error("failed to compile pattern '{pattern}': {source}")]
pub struct RuleCompilationError {
    /// The template as it was handed to the compiler (after nick substitution).
    pub pattern: String,
    /// Underlying regex syntax error.
    #[source]
    pub source: regex::Error,
}

impl RuleCompilationError {
    /// Creates a compilation error for `pattern`.
    pub fn new(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self {
            pattern: pattern.into(),
            source,
        }
    }
}

/// Result type for pattern compilation.
pub type CompileResult<T> = Result<T, RuleCompilationError>;
