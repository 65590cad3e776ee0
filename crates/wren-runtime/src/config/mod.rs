//! Configuration module for the Wren runtime.
//!
//! Layered loading (defaults, files, `WREN_*` environment, overrides) and
//! validation of the bot's identity, plugin selection and logging settings.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    CoreConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig,
    WrenConfig,
};
pub use validation::validate_config;
