//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{CoreConfig, LogOutput, LoggingConfig, WrenConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &WrenConfig) -> ConfigResult<()> {
    validate_core_config(&config.core)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates bot identity and plugin lists.
fn validate_core_config(core: &CoreConfig) -> ConfigResult<()> {
    if core.nick.is_empty() {
        return Err(ConfigError::missing_field("core.nick"));
    }

    if core.nick.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation("Nick cannot contain whitespace"));
    }

    if core.help_prefix.is_whitespace() {
        return Err(ConfigError::validation("Help prefix cannot be whitespace"));
    }

    let mut seen = HashSet::new();
    for alias in &core.alias_nicks {
        if alias.is_empty() || alias.chars().any(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid alias nick: {alias:?}"
            )));
        }
        if alias == &core.nick {
            return Err(ConfigError::validation(format!(
                "Alias nick {alias:?} duplicates the nick"
            )));
        }
        if !seen.insert(alias) {
            return Err(ConfigError::validation(format!(
                "Duplicate alias nick: {alias:?}"
            )));
        }
    }

    if let Some(both) = core.enable.iter().flatten().find(|p| core.exclude.contains(*p)) {
        return Err(ConfigError::validation(format!(
            "Plugin {both:?} is both enabled and excluded"
        )));
    }

    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if logging.max_files == 0 {
        return Err(ConfigError::validation(
            "logging.max_files must be greater than 0",
        ));
    }

    for target in logging.filters.keys() {
        if target.is_empty() {
            return Err(ConfigError::validation("Empty logging filter target"));
        }
    }

    Ok(())
}
