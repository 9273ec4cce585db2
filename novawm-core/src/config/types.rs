//! Configuration data structures.
//!
//! [`CoreConfig`] is the root, deserialized from TOML. Every field falls back to
//! a function in [`super::defaults`], and unknown keys are rejected.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use super::defaults;

/// Configuration settings for the logging subsystem.
///
/// ```
/// use novawm_core::config::LoggingConfig;
///
/// let log_config: LoggingConfig = toml::from_str(r#"
/// level = "debug"
/// format = "json"
/// "#).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: `trace`, `debug`, `info`, `warn` or `error` (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// `"text"` or `"json"`.
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_core_logging_config()
    }
}

/// Window-management policy: tiling, client synchronization and the default
/// constraint requirements given to newly managed windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowPolicyConfig {
    /// Fraction of the work area width a side tile takes. Must lie in (0, 1).
    #[serde(default = "defaults::default_tile_split_ratio")]
    pub tile_split_ratio: f64,
    /// Slack in pixels when pairing complementary side tiles.
    #[serde(default = "defaults::default_tile_match_tolerance")]
    pub tile_match_tolerance: u32,
    /// How long to wait for a client to acknowledge a synchronized resize.
    #[serde(default = "defaults::default_sync_request_timeout_ms")]
    pub sync_request_timeout_ms: u64,
    /// Horizontal pixels of titlebar that must stay on-screen.
    #[serde(default = "defaults::default_titlebar_visible_margin")]
    pub titlebar_visible_margin: u32,
    /// Titlebar height assumed for windows without a top frame border.
    #[serde(default = "defaults::default_min_titlebar_height")]
    pub min_titlebar_height: u32,
    #[serde(default = "defaults::default_true")]
    pub require_fully_onscreen: bool,
    #[serde(default = "defaults::default_true")]
    pub require_on_single_monitor: bool,
    #[serde(default = "defaults::default_true")]
    pub require_titlebar_visible: bool,
}

impl WindowPolicyConfig {
    pub fn sync_request_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_request_timeout_ms)
    }
}

impl Default for WindowPolicyConfig {
    fn default() -> Self {
        defaults::default_window_policy_config()
    }
}

/// Root configuration structure.
///
/// ```
/// use novawm_core::config::CoreConfig;
///
/// let config: CoreConfig = toml::from_str(r#"
/// [logging]
/// level = "warn"
///
/// [window_policy]
/// tile_split_ratio = 0.6
/// "#).unwrap();
/// assert_eq!(config.logging.level, "warn");
/// assert_eq!(config.window_policy.tile_split_ratio, 0.6);
/// assert_eq!(config.window_policy.tile_match_tolerance, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_core_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_window_policy_config")]
    pub window_policy: WindowPolicyConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_core_config_deserialize_empty() {
        let config: CoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_logging_config_deserialize_partial() {
        let config: LoggingConfig = serde_json::from_str(r#"{"file_path": "/var/log/novawm.log"}"#).unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.file_path, Some(PathBuf::from("/var/log/novawm.log")));
        assert_eq!(config.format, "text");
    }

    #[test]
    fn test_window_policy_deserialize_partial() {
        let config: CoreConfig = toml::from_str(
            r#"
            [window_policy]
            sync_request_timeout_ms = 250
            require_on_single_monitor = false
            "#,
        )
        .unwrap();
        assert_eq!(config.window_policy.sync_request_timeout(), Duration::from_millis(250));
        assert!(!config.window_policy.require_on_single_monitor);
        assert!(config.window_policy.require_fully_onscreen);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_core_config_rejects_unknown_field() {
        let result: Result<CoreConfig, _> = toml::from_str("[window_policy]\nsnap_to_grid = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_config_rejects_unknown_field() {
        let result: Result<LoggingConfig, _> = serde_json::from_str(r#"{"level": "info", "colour": true}"#);
        assert!(result.is_err());
    }
}
