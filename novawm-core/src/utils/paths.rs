//! XDG and application-specific path resolution via `directories-next`.
//!
//! Application directories are derived from the `QUALIFIER`, `ORGANIZATION`
//! and `APPLICATION` constants, e.g. `~/.config/novawm` on Linux.

use std::path::PathBuf;
use directories_next::{BaseDirs, ProjectDirs};
use crate::error::{ConfigError, CoreError};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "NovaWM";
const APPLICATION: &str = "novawm";

/// File name of the user configuration inside [`get_app_config_dir`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "NOVAWM_CONFIG";

fn unavailable(dir_type: &str) -> CoreError {
    CoreError::Config(ConfigError::DirectoryUnavailable {
        dir_type: dir_type.to_string(),
    })
}

/// Returns the primary base directory for user state files (`$XDG_STATE_HOME`).
///
/// Falls back to `$HOME/.local/state` on Linux and the local data directory elsewhere.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| unavailable("State Base"))
}

/// Returns the NovaWM configuration directory.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| unavailable("App Config"))
}

/// Returns the NovaWM state directory, where relative log paths are resolved.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base| base.join(APPLICATION))
}

/// Path of the configuration file, honouring [`CONFIG_PATH_ENV`].
pub fn get_config_file_path() -> Result<PathBuf, CoreError> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => get_app_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_is_valid_path(res: Result<PathBuf, CoreError>, dir_type: &str) {
        match res {
            Ok(path) => {
                assert!(path.is_absolute(), "Path for {} is not absolute: {:?}", dir_type, path);
            }
            // HOME may be unset on CI.
            Err(CoreError::Config(ConfigError::DirectoryUnavailable { .. })) => {}
            Err(e) => panic!("Expected Ok or DirectoryUnavailable for {}, got {:?}", dir_type, e),
        }
    }

    #[test]
    fn test_get_app_config_dir() {
        assert_is_valid_path(get_app_config_dir(), "App Config");
    }

    #[test]
    fn test_get_app_state_dir() {
        assert_is_valid_path(get_app_state_dir(), "App State");
    }

    #[test]
    fn test_config_file_name_is_toml() {
        if let Ok(path) = get_app_config_dir().map(|d| d.join(CONFIG_FILE_NAME)) {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        }
    }
}
