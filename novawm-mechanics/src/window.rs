// novawm-mechanics/src/window.rs

//! The per-window record owned by the registry.

use std::time::Instant;

use novawm_core::types::{FrameBorders, Gravity, PointInt, RectInt};

use crate::constraints::ConstraintRequirements;
use crate::coordinator::{MoveResizeFlags, MoveResizeResult};
use crate::data_types::{
    FullscreenState, GrabOp, MapState, Placement, Presence, SyncState, WindowId, WorkspaceIndex,
};
use crate::monitor::Strut;
use crate::size_hints::SizeHints;

/// An unacknowledged "redraw at this size" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSync {
    pub serial: u64,
    pub deadline: Instant,
    /// Flags of the move/resize that is waiting for the client.
    pub flags: MoveResizeFlags,
    /// What that move/resize changed.
    pub result: MoveResizeResult,
}

/// An interactive move or resize in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabState {
    pub op: GrabOp,
    pub start_pointer: PointInt,
    pub start_rect: RectInt,
}

/// The parts of a window a failed transition must put back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateSnapshot {
    placement: Placement,
    fullscreen: FullscreenState,
    saved_rect: Option<RectInt>,
    monitor: Option<usize>,
}

/// A managed window.
///
/// Rectangles are frame rectangles in the shared monitor coordinate space.
#[derive(Debug, Clone)]
pub struct Window {
    pub id: WindowId,
    /// Creation order; breaks ties wherever windows are compared.
    pub stable_sequence: u64,
    pub title: String,

    pub map_state: MapState,
    pub presence: Presence,
    pub placement: Placement,
    pub fullscreen: FullscreenState,
    /// Visible on all workspaces.
    pub sticky: bool,
    pub urgent: bool,
    pub focused: bool,
    pub workspace: WorkspaceIndex,

    /// Authoritative geometry.
    pub current_rect: RectInt,
    /// Restore target while maximized, tiled or fullscreen.
    pub saved_rect: Option<RectInt>,
    /// Where the window wants to be, before constraints.
    pub unconstrained_rect: RectInt,
    /// Geometry last reported to the compositor.
    pub buffer_rect: RectInt,

    pub hints: SizeHints,
    pub gravity: Gravity,
    pub borders: FrameBorders,
    /// Requirements as configured for the window.
    pub base_requirements: ConstraintRequirements,
    /// Requirements in force; the onscreen ones relax after the user places
    /// the window partly off screen or across monitors.
    pub requirements: ConstraintRequirements,
    pub monitor: Option<usize>,

    pub tile_match: Option<WindowId>,
    pub transient_for: Option<WindowId>,
    pub struts: Vec<Strut>,
    /// Monitor span declared by the client for fullscreen.
    pub fullscreen_monitors: Option<Vec<usize>>,

    pub sync: SyncState,
    pub sync_serial: u64,
    pub pending_sync: Option<PendingSync>,

    pub frame_shape_dirty: bool,
    pub grab: Option<GrabState>,
    /// Visibility as last announced.
    pub showing: bool,
}

impl Window {
    pub(crate) fn new(id: WindowId, stable_sequence: u64, title: String, rect: RectInt) -> Self {
        Window {
            id,
            stable_sequence,
            title,
            map_state: MapState::Unmapped,
            presence: Presence::Normal,
            placement: Placement::Floating,
            fullscreen: FullscreenState::Windowed,
            sticky: false,
            urgent: false,
            focused: false,
            workspace: 0,
            current_rect: rect,
            saved_rect: None,
            unconstrained_rect: rect,
            buffer_rect: rect,
            hints: SizeHints::default(),
            gravity: Gravity::NorthWest,
            borders: FrameBorders::default(),
            base_requirements: ConstraintRequirements::default(),
            requirements: ConstraintRequirements::default(),
            monitor: None,
            tile_match: None,
            transient_for: None,
            struts: Vec::new(),
            fullscreen_monitors: None,
            sync: SyncState::Unsupported,
            sync_serial: 0,
            pending_sync: None,
            frame_shape_dirty: false,
            grab: None,
            showing: false,
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.map_state == MapState::Mapped
    }

    pub fn is_minimized(&self) -> bool {
        self.presence == Presence::Minimized
    }

    pub fn is_shaded(&self) -> bool {
        self.presence == Presence::Shaded
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    pub fn owns_struts(&self) -> bool {
        !self.struts.is_empty()
    }

    /// Mapped, not minimized, and on the active workspace unless sticky.
    pub fn should_be_showing(&self, active_workspace: WorkspaceIndex) -> bool {
        self.is_mapped() && !self.is_minimized() && (self.sticky || self.workspace == active_workspace)
    }

    pub(crate) fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            placement: self.placement,
            fullscreen: self.fullscreen.clone(),
            saved_rect: self.saved_rect,
            monitor: self.monitor,
        }
    }

    pub(crate) fn rollback(&mut self, snapshot: StateSnapshot) {
        self.placement = snapshot.placement;
        self.fullscreen = snapshot.fullscreen;
        self.saved_rect = snapshot.saved_rect;
        self.monitor = snapshot.monitor;
    }

    /// `saved_rect` exists exactly while a restore target is needed.
    pub fn state_is_consistent(&self) -> bool {
        let needs_saved = self.placement != Placement::Floating || self.is_fullscreen();
        self.saved_rect.is_some() == needs_saved && !self.current_rect.is_empty()
    }

    pub(crate) fn debug_check(&self) {
        debug_assert!(
            self.state_is_consistent(),
            "window {} is inconsistent: placement {:?}, fullscreen {:?}, saved {:?}, current {:?}",
            self.id,
            self.placement,
            self.fullscreen,
            self.saved_rect,
            self.current_rect
        );
    }
}
