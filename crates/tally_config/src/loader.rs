//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::TallyConfig;
use std::path::{Component, Path};

/// File name looked up in a project directory.
pub const CONFIG_FILE: &str = "tally.toml";

/// Loads and validates `tally.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<TallyConfig, ConfigError> {
    let path = project_dir.join(CONFIG_FILE);
    let content =
        std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<TallyConfig, ConfigError> {
    let config: TallyConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TallyConfig) -> Result<(), ConfigError> {
    if config.report.program_name.trim().is_empty() {
        return Err(ConfigError::MissingField("report.program_name"));
    }
    for (field, path) in [
        ("output.artifact", &config.output.artifact),
        ("output.manifest", &config.output.manifest),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField(field));
        }
        if path.is_absolute() {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("must be relative to output.dir, got {}", path.display()),
            });
        }
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("must stay inside output.dir, got {}", path.display()),
            });
        }
    }
    if config.output.artifact == config.output.manifest {
        return Err(ConfigError::Invalid {
            field: "output.artifact",
            reason: "must differ from output.manifest".to_string(),
        });
    }
    Ok(())
}
