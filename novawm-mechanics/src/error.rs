// novawm-mechanics/src/error.rs

use novawm_core::error::CoreError;
use novawm_core::types::RectInt;
use thiserror::Error;

use crate::data_types::WindowId;

/// Errors reported by window-management operations.
///
/// Every variant means the requested transition was rejected and the window
/// kept its prior state. Malformed size hints and misbehaving clients never
/// end up here: the former are clamped, the latter are handled by timeouts.
#[derive(Error, Debug)]
pub enum WindowManagerError {
    /// The handle does not name a managed window.
    #[error("Unknown window: {0}")]
    UnknownWindow(WindowId),

    /// The operation needs a monitor but the topology is empty.
    #[error("No monitor available")]
    NoMonitor,

    /// A monitor index outside the current topology.
    #[error("Invalid monitor index: {0}")]
    InvalidMonitor(usize),

    /// The constraint pipeline produced an empty rectangle.
    #[error("Constrained geometry is degenerate: {0:?}")]
    DegenerateGeometry(RectInt),

    /// The window's minimum width does not fit into half of the work area.
    #[error("Window {window} cannot be tiled: minimum width {min_width} exceeds available {available}")]
    CannotTile {
        window: WindowId,
        min_width: u32,
        available: u32,
    },

    /// Setting the transient parent would create a cycle.
    #[error("Making {window} transient for {parent} would create a cycle")]
    TransientCycle { window: WindowId, parent: WindowId },

    /// An operation that makes no sense in the window's current state.
    #[error("Unsupported window operation: {0}")]
    UnsupportedOperation(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
