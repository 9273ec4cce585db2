//! Error handling for the NovaWM core layer.
//!
//! The main error type for this crate is [`CoreError`], which wraps the more
//! specific [`ConfigError`] and [`LoggingError`]. All of them are defined with
//! `thiserror`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use novawm_core::error::CoreError;
//!
//! fn check_ratio(ratio: f64) -> Result<(), CoreError> {
//!     if !(0.0..1.0).contains(&ratio) {
//!         return Err(CoreError::InvalidInput(format!("ratio {ratio} out of range")));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for NovaWM.
///
/// Used as the common error type of this crate, usually by wrapping one of the
/// more specific error enums.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while installing the global logging subscriber.
    #[error("Logging Initialization Failed: {0}")]
    LoggingInitialization(String),

    /// Filesystem failures not covered by the configuration or logging errors.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors not covered by other variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Error type for configuration-related operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Values parsed fine but are out of their allowed range.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A configuration file was required but not found at any location.
    #[error("Configuration file not found at expected locations: {locations:?}")]
    NotFound { locations: Vec<PathBuf> },

    /// A required base directory (e.g. XDG config home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging-related operations.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    /// Failed to parse a log filter directive.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),

    #[error("Logging I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl From<LoggingError> for CoreError {
    fn from(err: LoggingError) -> Self {
        CoreError::LoggingInitialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_core_error_config_variant() {
        let core_err = CoreError::Config(ConfigError::ValidationError("Test validation".to_string()));

        assert_eq!(
            format!("{}", core_err),
            "Configuration Error: Configuration validation failed: Test validation"
        );
        match core_err.source().and_then(|s| s.downcast_ref::<ConfigError>()) {
            Some(ConfigError::ValidationError(msg)) => assert_eq!(msg, "Test validation"),
            _ => panic!("Incorrect source for CoreError::Config"),
        }
    }

    #[test]
    fn test_core_error_filesystem_variant() {
        let path = PathBuf::from("/tmp/novawm.log");
        let core_err = CoreError::Filesystem {
            message: "File operation failed".to_string(),
            path: path.clone(),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(
            format!("{}", core_err),
            format!("Filesystem Error: File operation failed (Path: {:?})", path)
        );
        assert_eq!(
            core_err.source().unwrap().downcast_ref::<IoError>().unwrap().kind(),
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_core_error_io_from() {
        let core_err: CoreError = IoError::new(ErrorKind::NotFound, "gone").into();
        assert_eq!(format!("{}", core_err), "I/O Error: gone");
        assert!(core_err.source().is_some());
    }

    #[test]
    fn test_config_error_parse_error_variant() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("this is not valid toml").unwrap_err();
        let display = format!("{}", toml_err);
        let config_err = ConfigError::ParseError(toml_err);

        assert_eq!(format!("{}", config_err), format!("Failed to parse configuration file: {}", display));
        assert!(config_err.source().unwrap().is::<toml::de::Error>());
    }

    #[test]
    fn test_config_error_not_found_variant() {
        let locations = vec![PathBuf::from("/etc/novawm/config.toml")];
        let config_err = ConfigError::NotFound { locations: locations.clone() };
        assert_eq!(
            format!("{}", config_err),
            format!("Configuration file not found at expected locations: {:?}", locations)
        );
    }

    #[test]
    fn test_logging_error_converts_into_core_error() {
        let core_err: CoreError = LoggingError::FilterError("bad directive".to_string()).into();
        assert_eq!(
            format!("{}", core_err),
            "Logging Initialization Failed: Failed to set log filter: bad directive"
        );
    }
}
