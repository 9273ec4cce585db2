//! # NovaWM Core Library (`novawm-core`)
//!
//! `novawm-core` is the foundational library of the NovaWM window manager. It
//! holds everything the geometry engine in `novawm-mechanics` builds on but
//! that is not specific to windows:
//!
//! - **Error Handling**: [`CoreError`] and the more specific [`ConfigError`] and
//!   [`LoggingError`].
//! - **Geometry**: integer points, sizes and rectangles ([`PointInt`], [`SizeInt`],
//!   [`RectInt`]), [`Gravity`] with gravity-adjusted resizing, [`Side`] and
//!   [`FrameBorders`].
//! - **Configuration**: TOML-backed [`CoreConfig`] (logging plus window policy)
//!   loaded and validated by [`ConfigLoader`].
//! - **Logging**: `tracing`-based initialization for console and rolling files.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use novawm_core::config::ConfigLoader;
//! use novawm_core::logging::init_logging;
//! use novawm_core::error::CoreError;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("NovaWM core initialized.");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, LoggingConfig, WindowPolicyConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
pub use types::{FrameBorders, Gravity, PointInt, RectInt, Side, SizeInt};
