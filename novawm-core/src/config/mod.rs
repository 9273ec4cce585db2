//! Configuration management.
//!
//! - [`types`]: the schema ([`CoreConfig`], [`LoggingConfig`], [`WindowPolicyConfig`]).
//! - [`defaults`]: default values used by `serde`.
//! - [`loader`]: [`ConfigLoader`], which locates, parses and validates the file.
//!
//! A missing configuration file is not an error; defaults are used instead.
//!
//! ```rust,ignore
//! use novawm_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("tile split: {}", config.window_policy.tile_split_ratio),
//!     Err(e) => {
//!         novawm_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CoreConfig, LoggingConfig, WindowPolicyConfig};
