// novawm-mechanics/src/data_types.rs

//! Identifiers and the per-axis state enums of a managed window.
//!
//! The maximize axis and the tile mode are folded into a single [`Placement`]
//! so that combinations such as "maximized both ways and tiled left" cannot be
//! represented at all. [`Placement::maximize_axis`] and [`Placement::tile_mode`]
//! project it back onto the two separate axes.

use bitflags::bitflags;
use novawm_core::types::{Gravity, RectInt, Side};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a window.
///
/// Wraps a `uuid::Uuid` to provide strong typing. Collaborator layers only ever
/// hold these handles, never the window itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(Uuid);

impl WindowId {
    /// Creates a new, unique `WindowId`.
    pub fn new_v4() -> Self {
        WindowId(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new_v4()
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a virtual workspace.
pub type WorkspaceIndex = u32;

bitflags! {
    /// Directions for `maximize` / `unmaximize`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaximizeDirections: u8 {
        const HORIZONTAL = 0b01;
        const VERTICAL = 0b10;
        const BOTH = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

/// The maximize axis as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaximizeAxis {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl MaximizeAxis {
    pub fn horizontal(self) -> bool {
        matches!(self, MaximizeAxis::Horizontal | MaximizeAxis::Both)
    }

    pub fn vertical(self) -> bool {
        matches!(self, MaximizeAxis::Vertical | MaximizeAxis::Both)
    }
}

/// The tile mode as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileMode {
    #[default]
    None,
    Left,
    Right,
    Maximized,
}

/// Half of a side-by-side tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileSide {
    Left,
    Right,
}

impl TileSide {
    pub fn complement(self) -> TileSide {
        match self {
            TileSide::Left => TileSide::Right,
            TileSide::Right => TileSide::Left,
        }
    }
}

/// Combined maximize/tile state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    /// Neither maximized nor tiled.
    #[default]
    Floating,
    /// Maximized along the given (non-empty) directions, not tiled.
    Maximized(MaximizeDirections),
    /// Filling the work area through the tiling gesture; maximized both ways.
    TiledMaximized,
    /// Left or right half of the work area; always maximized vertically.
    TiledSide(TileSide),
}

impl Placement {
    /// Normalizes `Maximized` with no directions to `Floating`.
    fn maximized(directions: MaximizeDirections) -> Placement {
        if directions.is_empty() {
            Placement::Floating
        } else {
            Placement::Maximized(directions)
        }
    }

    pub fn maximize_axis(self) -> MaximizeAxis {
        match self {
            Placement::Floating => MaximizeAxis::None,
            Placement::Maximized(d) if d.contains(MaximizeDirections::BOTH) => MaximizeAxis::Both,
            Placement::Maximized(d) if d.contains(MaximizeDirections::HORIZONTAL) => MaximizeAxis::Horizontal,
            Placement::Maximized(_) => MaximizeAxis::Vertical,
            Placement::TiledMaximized => MaximizeAxis::Both,
            Placement::TiledSide(_) => MaximizeAxis::Vertical,
        }
    }

    pub fn tile_mode(self) -> TileMode {
        match self {
            Placement::TiledMaximized => TileMode::Maximized,
            Placement::TiledSide(TileSide::Left) => TileMode::Left,
            Placement::TiledSide(TileSide::Right) => TileMode::Right,
            Placement::Floating | Placement::Maximized(_) => TileMode::None,
        }
    }

    /// Tiled to one half of the work area.
    pub fn is_tiled_side_by_side(self) -> bool {
        matches!(self, Placement::TiledSide(_))
    }

    /// Directions whose geometry is derived from the work area rather than
    /// from the user. Side tiles own both axes: the half width and the full height.
    pub fn policy_directions(self) -> MaximizeDirections {
        match self {
            Placement::Floating => MaximizeDirections::empty(),
            Placement::Maximized(d) => d,
            Placement::TiledMaximized | Placement::TiledSide(_) => MaximizeDirections::BOTH,
        }
    }

    /// Placement after `maximize(directions)`.
    ///
    /// Maximizing horizontally clears a side tile; maximizing vertically is
    /// already implied by one.
    pub fn after_maximize(self, directions: MaximizeDirections) -> Placement {
        match self {
            Placement::Floating => Placement::maximized(directions),
            Placement::Maximized(d) => Placement::maximized(d | directions),
            Placement::TiledMaximized => Placement::TiledMaximized,
            Placement::TiledSide(side) => {
                if directions.contains(MaximizeDirections::HORIZONTAL) {
                    Placement::Maximized(MaximizeDirections::BOTH)
                } else {
                    Placement::TiledSide(side)
                }
            }
        }
    }

    /// Placement after `unmaximize(directions)`.
    pub fn after_unmaximize(self, directions: MaximizeDirections) -> Placement {
        match self {
            Placement::Floating => Placement::Floating,
            Placement::Maximized(d) => Placement::maximized(d - directions),
            Placement::TiledMaximized => Placement::maximized(MaximizeDirections::BOTH - directions),
            Placement::TiledSide(side) => {
                if directions.contains(MaximizeDirections::VERTICAL) {
                    Placement::Floating
                } else {
                    Placement::TiledSide(side)
                }
            }
        }
    }

    /// Placement after `tile(mode)`; `TileMode::None` untiles.
    pub fn after_tile(self, mode: TileMode) -> Placement {
        match mode {
            TileMode::Left => Placement::TiledSide(TileSide::Left),
            TileMode::Right => Placement::TiledSide(TileSide::Right),
            TileMode::Maximized => Placement::TiledMaximized,
            TileMode::None => match self {
                Placement::TiledSide(_) | Placement::TiledMaximized => Placement::Floating,
                other => other,
            },
        }
    }
}

/// Whether the client surface is mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MapState {
    #[default]
    Unmapped,
    Mapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Presence {
    #[default]
    Normal,
    Minimized,
    /// Rolled up to the titlebar.
    Shaded,
}

/// Fullscreen state. While fullscreen, the [`Placement`] is kept but suspended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FullscreenState {
    #[default]
    Windowed,
    Fullscreen {
        /// Explicit monitor span; `None` means the window's own monitor.
        monitors: Option<Vec<usize>>,
        /// The frame rectangle right before entering fullscreen.
        restore: RectInt,
    },
}

impl FullscreenState {
    pub fn is_fullscreen(&self) -> bool {
        matches!(self, FullscreenState::Fullscreen { .. })
    }
}

/// Whether a window takes part in synchronized resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncState {
    /// The client never advertised support.
    #[default]
    Unsupported,
    Enabled,
    /// Switched off after the client missed an acknowledgment deadline.
    Disabled,
}

/// The edge or corner dragged in an interactive resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    /// The gravity that keeps the opposite edge or corner fixed.
    pub fn gravity(self) -> Gravity {
        match self {
            ResizeEdge::Top => Gravity::opposite_of(Side::Top),
            ResizeEdge::Bottom => Gravity::opposite_of(Side::Bottom),
            ResizeEdge::Left => Gravity::opposite_of(Side::Left),
            ResizeEdge::Right => Gravity::opposite_of(Side::Right),
            ResizeEdge::TopLeft => Gravity::SouthEast,
            ResizeEdge::TopRight => Gravity::SouthWest,
            ResizeEdge::BottomLeft => Gravity::NorthEast,
            ResizeEdge::BottomRight => Gravity::NorthWest,
        }
    }

    pub fn moves_left(self) -> bool {
        matches!(self, ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight)
    }
}

/// An interactive operation driven by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrabOp {
    Move,
    Resize(ResizeEdge),
}
