//! Default configuration values, referenced from `#[serde(default = ...)]`.

use super::types::{LoggingConfig, WindowPolicyConfig};
use std::path::PathBuf;

pub(crate) fn default_core_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(crate) fn default_window_policy_config() -> WindowPolicyConfig {
    WindowPolicyConfig {
        tile_split_ratio: default_tile_split_ratio(),
        tile_match_tolerance: default_tile_match_tolerance(),
        sync_request_timeout_ms: default_sync_request_timeout_ms(),
        titlebar_visible_margin: default_titlebar_visible_margin(),
        min_titlebar_height: default_min_titlebar_height(),
        require_fully_onscreen: default_true(),
        require_on_single_monitor: default_true(),
        require_titlebar_visible: default_true(),
    }
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

pub(crate) fn default_tile_split_ratio() -> f64 {
    0.5
}

pub(crate) fn default_tile_match_tolerance() -> u32 {
    10
}

pub(crate) fn default_sync_request_timeout_ms() -> u64 {
    1000
}

pub(crate) fn default_titlebar_visible_margin() -> u32 {
    75
}

pub(crate) fn default_min_titlebar_height() -> u32 {
    10
}

pub(crate) fn default_true() -> bool {
    true
}
