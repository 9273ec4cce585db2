//! General utilities for the NovaWM core library.
//!
//! - [`fs`]: directory creation helpers.
//! - [`paths`]: XDG and application-specific path resolution.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, ensure_parent_dir_exists};
