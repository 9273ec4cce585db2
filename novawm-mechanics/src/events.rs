// novawm-mechanics/src/events.rs

//! Inbound requests and outbound events exchanged with the collaborator layers.

use novawm_core::types::{FrameBorders, Gravity, PointInt, RectInt};
use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintRequirements;
use crate::coordinator::MoveResizeResult;
use crate::data_types::{GrabOp, MaximizeDirections, TileMode, WindowId, WorkspaceIndex};
use crate::monitor::Strut;
use crate::size_hints::SizeHints;
use crate::window::Window;

/// Everything the engine tells the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// A new frame rectangle became visible to the compositor.
    GeometryCommitted {
        window: WindowId,
        old: RectInt,
        new: RectInt,
        result: MoveResizeResult,
    },
    VisibilityChanged {
        window: WindowId,
        visible: bool,
    },
    /// Ask the client to take the given client-area rectangle.
    ConfigureClient {
        window: WindowId,
        rect: RectInt,
        serial: u64,
    },
    IconInvalidated {
        window: WindowId,
    },
}

/// A client configure request.
///
/// Positions are gravity-relative: the anchor of the frame for the given
/// gravity, or the client-area origin for [`Gravity::Static`]. Missing fields
/// keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientGeometryRequest {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Overrides the window's declared gravity for this request.
    pub gravity: Option<Gravity>,
}

impl ClientGeometryRequest {
    pub fn resize(width: u32, height: u32) -> Self {
        ClientGeometryRequest { width: Some(width), height: Some(height), ..Default::default() }
    }

    pub fn move_to(x: i32, y: i32) -> Self {
        ClientGeometryRequest { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// The frame rectangle this request asks for, relative to `current`.
    pub fn frame_rect(&self, current: &RectInt, window_gravity: Gravity, borders: &FrameBorders) -> RectInt {
        let gravity = self.gravity.unwrap_or(window_gravity);
        let client = borders.frame_to_client(current);
        let width = self.width.unwrap_or(client.width());
        let height = self.height.unwrap_or(client.height());
        let frame_size = borders.client_to_frame(&client.with_size(width, height)).size;

        if self.x.is_none() && self.y.is_none() {
            return novawm_core::types::gravity_adjust(current, gravity, frame_size.width, frame_size.height);
        }

        let reference = gravity_position(current, gravity, borders);
        let position = PointInt::new(self.x.unwrap_or(reference.x), self.y.unwrap_or(reference.y));
        match gravity {
            Gravity::Static => borders.client_to_frame(&RectInt::from_coords(position.x, position.y, width, height)),
            other => other.rect_at(position, frame_size.width, frame_size.height),
        }
    }
}

/// The position a client would send to keep `frame` where it is.
pub fn gravity_position(frame: &RectInt, gravity: Gravity, borders: &FrameBorders) -> PointInt {
    match gravity {
        Gravity::Static => borders.frame_to_client(frame).origin,
        other => other.anchor(frame),
    }
}

/// Geometry in the form session storage keeps it.
///
/// `width` and `height` count resize increments above the base size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub gravity: Gravity,
}

impl SessionGeometry {
    pub fn from_window(window: &Window) -> Self {
        let rect = window.saved_rect.unwrap_or(window.current_rect);
        let position = gravity_position(&rect, window.gravity, &window.borders);
        let client = window.borders.frame_to_client(&rect);
        let hints = window.hints;
        SessionGeometry {
            x: position.x,
            y: position.y,
            width: client.width().saturating_sub(hints.base.width) / hints.increment.width.max(1),
            height: client.height().saturating_sub(hints.base.height) / hints.increment.height.max(1),
            gravity: window.gravity,
        }
    }
}

/// Initial description of a window about to be managed.
#[derive(Debug, Clone, PartialEq)]
pub struct ManageRequest {
    pub title: String,
    /// Requested frame rectangle.
    pub rect: RectInt,
    pub hints: SizeHints,
    pub gravity: Gravity,
    pub borders: FrameBorders,
    pub workspace: WorkspaceIndex,
    pub transient_for: Option<WindowId>,
    /// The position was chosen by the user rather than the program; transient
    /// windows then keep it instead of being centred on their parent.
    pub user_position: bool,
    pub sync_supported: bool,
    pub mapped: bool,
    pub struts: Vec<Strut>,
    /// `None` takes the configured defaults.
    pub requirements: Option<ConstraintRequirements>,
}

impl ManageRequest {
    pub fn new(title: impl Into<String>, rect: RectInt) -> Self {
        ManageRequest {
            title: title.into(),
            rect,
            hints: SizeHints::default(),
            gravity: Gravity::NorthWest,
            borders: FrameBorders::default(),
            workspace: 0,
            transient_for: None,
            user_position: false,
            sync_supported: false,
            mapped: true,
            struts: Vec::new(),
            requirements: None,
        }
    }
}

/// Everything the collaborator layers can ask of the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowRequest {
    ClientGeometry { window: WindowId, request: ClientGeometryRequest },
    AckSync { window: WindowId, serial: u64 },
    SetSizeHints { window: WindowId, hints: SizeHints },
    SetFullscreenMonitors { window: WindowId, monitors: Vec<usize> },

    BeginGrab { window: WindowId, op: GrabOp, pointer: PointInt },
    UpdateGrab { window: WindowId, pointer: PointInt },
    EndGrab { window: WindowId },

    Maximize { window: WindowId, directions: MaximizeDirections },
    Unmaximize { window: WindowId, directions: MaximizeDirections },
    ToggleMaximize { window: WindowId },
    Tile { window: WindowId, mode: TileMode },
    Fullscreen { window: WindowId, monitors: Option<Vec<usize>> },
    Unfullscreen { window: WindowId },
    ToggleFullscreen { window: WindowId },
    Minimize { window: WindowId },
    Unminimize { window: WindowId },
    Shade { window: WindowId },
    Unshade { window: WindowId },
    Map { window: WindowId },
    Unmap { window: WindowId },
    Stick { window: WindowId },
    Unstick { window: WindowId },
    SetUrgent { window: WindowId, urgent: bool },
    Focus { window: Option<WindowId> },
    SetWorkspace { window: WindowId, workspace: WorkspaceIndex },
    SetActiveWorkspace { workspace: WorkspaceIndex },
    SetTransientFor { window: WindowId, parent: Option<WindowId> },
    SetFrameBorders { window: WindowId, borders: FrameBorders },
    SetStruts { window: WindowId, struts: Vec<Strut> },
    SetConstraintRequirements { window: WindowId, requirements: ConstraintRequirements },
    IconChanged { window: WindowId },

    MonitorsChanged { monitors: Vec<RectInt> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const BORDERS: FrameBorders = FrameBorders::new(2, 2, 20, 2);

    #[rstest]
    #[case(Gravity::NorthWest)]
    #[case(Gravity::Center)]
    #[case(Gravity::SouthEast)]
    #[case(Gravity::Static)]
    fn echoing_gravity_position_keeps_frame(#[case] gravity: Gravity) {
        let frame = RectInt::from_coords(100, 80, 404, 322);
        let position = gravity_position(&frame, gravity, &BORDERS);
        let request = ClientGeometryRequest {
            x: Some(position.x),
            y: Some(position.y),
            gravity: Some(gravity),
            ..Default::default()
        };
        assert_eq!(request.frame_rect(&frame, Gravity::NorthWest, &BORDERS), frame);
    }

    #[test]
    fn resize_without_position_keeps_gravity_anchor() {
        let frame = RectInt::from_coords(100, 100, 404, 322);
        let request = ClientGeometryRequest::resize(200, 100);
        assert_eq!(
            request.frame_rect(&frame, Gravity::SouthEast, &BORDERS),
            RectInt::from_coords(300, 300, 204, 122)
        );
    }

    #[test]
    fn static_position_names_client_origin() {
        let frame = RectInt::from_coords(0, 0, 404, 322);
        let request = ClientGeometryRequest { gravity: Some(Gravity::Static), ..ClientGeometryRequest::move_to(50, 60) };
        assert_eq!(
            request.frame_rect(&frame, Gravity::NorthWest, &BORDERS),
            RectInt::from_coords(48, 40, 404, 322)
        );
    }

    #[test]
    fn session_geometry_counts_increments() {
        let mut window = Window::new(WindowId::new_v4(), 0, "xterm".to_string(), RectInt::from_coords(10, 20, 4 + 6 * 80 + 4, 22 + 13 * 24 + 2));
        window.borders = BORDERS;
        window.hints = SizeHints {
            base: novawm_core::types::SizeInt::new(4, 2),
            increment: novawm_core::types::SizeInt::new(6, 13),
            ..SizeHints::default()
        };
        let session = SessionGeometry::from_window(&window);
        assert_eq!(session, SessionGeometry { x: 10, y: 20, width: 80, height: 24, gravity: Gravity::NorthWest });

        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(serde_json::from_str::<SessionGeometry>(&json).unwrap(), session);
    }
}
