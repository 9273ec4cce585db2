//! # NovaWM Window Mechanics (`novawm-mechanics`)
//!
//! The window-state and geometry-constraint engine of NovaWM. For every managed
//! window it tracks the logical state (mapped, minimized, shaded, maximized,
//! tiled, fullscreen, sticky, urgent, focused) and turns every geometry request,
//! whether it comes from the client, the user or policy, into one authoritative
//! frame rectangle.
//!
//! - [`size_hints`]: min/max/base/increment/aspect resolution.
//! - [`monitor`]: monitor topology, struts and work areas.
//! - [`constraints`]: the ordered constraint pipeline.
//! - [`window`] and [`registry`]: per-window state, owned by the manager.
//! - [`coordinator`]: the move/resize choke point and synchronized resizing.
//! - [`scheduler`]: coalesced visibility, geometry and icon recomputation.
//! - [`events`]: the request and event vocabulary spoken with the outside.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use novawm_core::config::WindowPolicyConfig;
//! use novawm_core::types::RectInt;
//! use novawm_mechanics::{ManageRequest, MaximizeDirections, WindowManager};
//!
//! let mut wm = WindowManager::new(
//!     WindowPolicyConfig::default(),
//!     vec![RectInt::from_coords(0, 0, 1920, 1080)],
//! )?;
//! let id = wm.manage(ManageRequest::new("terminal", RectInt::from_coords(100, 100, 640, 480)), Instant::now())?;
//! wm.maximize(id, MaximizeDirections::BOTH, Instant::now())?;
//! wm.run_queued(Instant::now());
//! for event in wm.drain_events() {
//!     tracing::debug!("{:?}", event);
//! }
//! ```

pub mod constraints;
pub mod coordinator;
pub mod data_types;
pub mod error;
pub mod events;
pub mod manager;
pub mod monitor;
pub mod registry;
pub mod scheduler;
pub mod size_hints;
pub mod state;
pub mod tiling;
pub mod window;

pub use constraints::{ConstraintContext, ConstraintPass, ConstraintPipeline, ConstraintRequirements, PolicyGeometry};
pub use coordinator::{MoveResizeFlags, MoveResizeResult};
pub use data_types::{
    FullscreenState, GrabOp, MapState, MaximizeAxis, MaximizeDirections, Placement, Presence, ResizeEdge,
    SyncState, TileMode, TileSide, WindowId, WorkspaceIndex,
};
pub use error::WindowManagerError;
pub use events::{ClientGeometryRequest, ManageRequest, SessionGeometry, WindowEvent, WindowRequest};
pub use manager::WindowManager;
pub use monitor::{Monitor, MonitorTopology, Strut, WorkAreas};
pub use registry::WindowRegistry;
pub use scheduler::{QueueKinds, RecomputeQueues};
pub use size_hints::{AspectRatio, SizeHints};
pub use tiling::tile_rect;
pub use window::Window;
