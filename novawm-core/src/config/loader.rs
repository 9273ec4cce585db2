//! Configuration loading.
//!
//! [`ConfigLoader`] reads `config.toml` from the NovaWM configuration directory
//! (or the path in `NOVAWM_CONFIG`), parses it into [`CoreConfig`] and validates
//! it. Validation normalizes the log level and format, resolves a relative log
//! file path against the state directory and checks the window policy ranges.

use std::fs;
use std::path::Path;

use crate::config::{CoreConfig, WindowPolicyConfig};
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as nova_fs;
use crate::utils::paths::{get_app_state_dir, get_config_file_path};

/// Namespace for configuration loading and validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the configuration from the default location.
    ///
    /// A missing file yields the validated default configuration.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let path = get_config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!("Loading configuration from {:?}", path);
                Self::load_from_str(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No configuration file at {:?}, using defaults", path);
                let mut config = CoreConfig::default();
                Self::validate_config(&mut config)?;
                Ok(config)
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError { path, source: e })),
        }
    }

    /// Loads and validates the configuration from an explicit file.
    ///
    /// Unlike [`ConfigLoader::load`], a missing file is an error here.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound { locations: vec![path.to_path_buf()] }
            } else {
                ConfigError::ReadError { path: path.to_path_buf(), source: e }
            }
        })?;
        Self::load_from_str(&content)
    }

    /// Parses and validates TOML text. Empty input yields the defaults.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config: CoreConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Validates `config` in place.
    ///
    /// - the log level must be one of trace, debug, info, warn, error and is lowercased;
    /// - the log format must be text or json and is lowercased;
    /// - a relative log file path is made absolute under the state directory and
    ///   its parent directory is created;
    /// - the window policy must be in range (see [`Self::validate_window_policy`]).
    pub fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level_lower,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))
                .into());
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => config.logging.format = format_lower,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))
                .into());
            }
        }

        if let Some(file_path) = &config.logging.file_path {
            let absolute_path = if file_path.is_absolute() {
                file_path.clone()
            } else {
                get_app_state_dir()?.join(file_path)
            };
            nova_fs::ensure_parent_dir_exists(&absolute_path)?;
            config.logging.file_path = Some(absolute_path);
        }

        Self::validate_window_policy(&config.window_policy)?;
        Ok(())
    }

    /// Checks that the split ratio lies strictly between 0 and 1 and that the
    /// sync timeout is non-zero.
    pub fn validate_window_policy(policy: &WindowPolicyConfig) -> Result<(), CoreError> {
        let ratio = policy.tile_split_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid tile_split_ratio: {}. Must lie strictly between 0 and 1.",
                ratio
            ))
            .into());
        }
        if policy.sync_request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "sync_request_timeout_ms must be greater than zero.".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
