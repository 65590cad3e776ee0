//! Runtime error types.

use thiserror::Error;
use wren_framework::ScanError;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A plugin with the same name is already known.
    #[error("Plugin already registered: {0}")]
    DuplicatePlugin(String),

    /// No plugin with this name is known.
    #[error("Plugin not found: {0}")]
    UnknownPlugin(String),

    /// The plugin was built against another plugin API.
    #[error("Plugin '{name}' targets API {api_version:#010x}, incompatible with this runtime")]
    IncompatiblePlugin { name: String, api_version: u32 },

    /// A handler of the plugin failed to normalize.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
