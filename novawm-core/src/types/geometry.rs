//! Integer geometry primitives: points, sizes, rectangles and gravity.
//!
//! Window geometry is integral, so everything here works on `i32` positions and
//! `u32` extents. All functions are pure. Operations on non-overlapping inputs
//! return an empty rectangle or `None`; callers treat that as "fully off-screen",
//! never as an error.

use serde::{Deserialize, Serialize};

/// Converts an extent to a signed offset, saturating at `i32::MAX`.
fn extent(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Narrows a wide intermediate back to an `i32` coordinate.
fn coord(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// An integer point with `i32` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointInt {
    pub x: i32,
    pub y: i32,
}

impl PointInt {
    /// Creates a new `PointInt`.
    pub const fn new(x: i32, y: i32) -> Self {
        PointInt { x, y }
    }

    /// Squared Euclidean distance, widened so it cannot overflow.
    pub fn distance_squared(&self, other: &PointInt) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

/// An integer size with `u32` dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SizeInt {
    pub width: u32,
    pub height: u32,
}

impl SizeInt {
    /// Creates a new `SizeInt`.
    pub const fn new(width: u32, height: u32) -> Self {
        SizeInt { width, height }
    }

    /// Checks if the area is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An integer rectangle with `i32` origin and `u32` size.
///
/// The right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RectInt {
    /// The origin point (top-left corner) of the rectangle.
    pub origin: PointInt,
    /// The size (width and height) of the rectangle.
    pub size: SizeInt,
}

impl RectInt {
    /// Creates a new `RectInt` from an origin point and a size.
    pub const fn new(origin: PointInt, size: SizeInt) -> Self {
        RectInt { origin, size }
    }

    /// Creates a new `RectInt` from individual coordinate and dimension values.
    pub const fn from_coords(x: i32, y: i32, width: u32, height: u32) -> Self {
        RectInt {
            origin: PointInt::new(x, y),
            size: SizeInt::new(width, height),
        }
    }

    /// Builds a rectangle from edges; inverted edges produce an empty rectangle.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let width = (i64::from(right) - i64::from(left)).max(0);
        let height = (i64::from(bottom) - i64::from(top)).max(0);
        RectInt::from_coords(left, top, width.min(i64::from(u32::MAX)) as u32, height.min(i64::from(u32::MAX)) as u32)
    }

    pub fn x(&self) -> i32 { self.origin.x }
    pub fn y(&self) -> i32 { self.origin.y }
    pub fn width(&self) -> u32 { self.size.width }
    pub fn height(&self) -> u32 { self.size.height }
    pub fn top(&self) -> i32 { self.origin.y }
    pub fn left(&self) -> i32 { self.origin.x }

    /// Calculates the x-coordinate of the right edge.
    pub fn right(&self) -> i32 {
        self.origin.x.saturating_add(extent(self.size.width))
    }

    /// Calculates the y-coordinate of the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.origin.y.saturating_add(extent(self.size.height))
    }

    /// The centre point, rounded towards the origin.
    pub fn center(&self) -> PointInt {
        PointInt::new(
            coord(i64::from(self.origin.x) + i64::from(self.size.width) / 2),
            coord(i64::from(self.origin.y) + i64::from(self.size.height) / 2),
        )
    }

    /// Checks if a point is contained within the rectangle.
    /// Edges are inclusive for left/top, exclusive for right/bottom.
    pub fn contains_point(&self, point: PointInt) -> bool {
        point.x >= self.left() && point.x < self.right() &&
        point.y >= self.top() && point.y < self.bottom()
    }

    /// Whether `other` lies completely inside this rectangle.
    pub fn contains_rect(&self, other: &RectInt) -> bool {
        other.left() >= self.left() && other.right() <= self.right() &&
        other.top() >= self.top() && other.bottom() <= self.bottom()
    }

    /// Checks if this rectangle intersects with another `RectInt`.
    pub fn intersects(&self, other: &RectInt) -> bool {
        self.left() < other.right() && self.right() > other.left() &&
        self.top() < other.bottom() && self.bottom() > other.top()
    }

    /// Calculates the intersection of this rectangle with another `RectInt`.
    /// Returns `None` if they do not intersect.
    pub fn intersection(&self, other: &RectInt) -> Option<RectInt> {
        let x1 = self.left().max(other.left());
        let y1 = self.top().max(other.top());
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x1 < x2 && y1 < y2 {
            Some(RectInt::from_edges(x1, y1, x2, y2))
        } else {
            None
        }
    }

    /// Area shared with `other`, zero when disjoint.
    pub fn overlap_area(&self, other: &RectInt) -> u64 {
        self.intersection(other)
            .map(|r| u64::from(r.width()) * u64::from(r.height()))
            .unwrap_or(0)
    }

    /// Calculates the smallest rectangle that contains both this and another `RectInt`.
    pub fn union(&self, other: &RectInt) -> RectInt {
        RectInt::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Checks if the rectangle has zero width or height.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Creates a `RectInt` from two points, ensuring positive width and height.
    pub fn from_points(p1: PointInt, p2: PointInt) -> Self {
        RectInt::from_edges(p1.x.min(p2.x), p1.y.min(p2.y), p1.x.max(p2.x), p1.y.max(p2.y))
    }

    /// Translates the rectangle by (dx, dy) using saturating arithmetic.
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        RectInt::from_coords(
            self.origin.x.saturating_add(dx),
            self.origin.y.saturating_add(dy),
            self.size.width,
            self.size.height,
        )
    }

    /// Returns the same size placed at `origin`.
    pub fn with_origin(&self, origin: PointInt) -> Self {
        RectInt::new(origin, self.size)
    }

    /// Returns the same origin with a new size.
    pub fn with_size(&self, width: u32, height: u32) -> Self {
        RectInt::from_coords(self.origin.x, self.origin.y, width, height)
    }

    /// Grows (or, with negative deltas, shrinks) the rectangle around its centre.
    /// Width and height never go below zero.
    pub fn inflate(&self, dw: i32, dh: i32) -> Self {
        let new_width = (i64::from(self.size.width) + 2 * i64::from(dw)).max(0);
        let new_height = (i64::from(self.size.height) + 2 * i64::from(dh)).max(0);

        RectInt::from_coords(
            self.origin.x.saturating_sub(dw),
            self.origin.y.saturating_sub(dh),
            new_width.min(i64::from(u32::MAX)) as u32,
            new_height.min(i64::from(u32::MAX)) as u32,
        )
    }

    /// Moves this rectangle inside `bounds`, shrinking it first where it is larger.
    ///
    /// The result always satisfies `bounds.contains_rect(&result)`; an empty
    /// `bounds` yields an empty rectangle at the bounds origin.
    pub fn clamp_to(&self, bounds: &RectInt) -> RectInt {
        let width = self.width().min(bounds.width());
        let height = self.height().min(bounds.height());
        let max_x = i64::from(bounds.right()) - i64::from(width);
        let max_y = i64::from(bounds.bottom()) - i64::from(height);
        let x = i64::from(self.x()).clamp(i64::from(bounds.left()), max_x.max(i64::from(bounds.left())));
        let y = i64::from(self.y()).clamp(i64::from(bounds.top()), max_y.max(i64::from(bounds.top())));
        RectInt::from_coords(coord(x), coord(y), width, height)
    }

    /// Moves this rectangle inside `bounds` without changing its size.
    ///
    /// Where the rectangle is larger than `bounds` on an axis it is aligned to
    /// the leading (left/top) edge of the bounds on that axis.
    pub fn shift_into(&self, bounds: &RectInt) -> RectInt {
        let max_x = i64::from(bounds.right()) - i64::from(self.width());
        let max_y = i64::from(bounds.bottom()) - i64::from(self.height());
        let x = i64::from(self.x()).min(max_x).max(i64::from(bounds.left()));
        let y = i64::from(self.y()).min(max_y).max(i64::from(bounds.top()));
        RectInt::from_coords(coord(x), coord(y), self.width(), self.height())
    }
}

/// The anchor that stays fixed when a rectangle changes size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gravity {
    #[default]
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
    /// The client area stays put. On the frame rectangle this acts like
    /// `NorthWest`; the frame offset is applied by [`FrameBorders`].
    Static,
}

/// Where an anchor sits along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisAnchor {
    Start,
    Middle,
    End,
}

impl Gravity {
    /// All ten gravities.
    pub const ALL: [Gravity; 10] = [
        Gravity::NorthWest,
        Gravity::North,
        Gravity::NorthEast,
        Gravity::West,
        Gravity::Center,
        Gravity::East,
        Gravity::SouthWest,
        Gravity::South,
        Gravity::SouthEast,
        Gravity::Static,
    ];

    fn horizontal(self) -> AxisAnchor {
        match self {
            Gravity::NorthWest | Gravity::West | Gravity::SouthWest | Gravity::Static => AxisAnchor::Start,
            Gravity::North | Gravity::Center | Gravity::South => AxisAnchor::Middle,
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => AxisAnchor::End,
        }
    }

    fn vertical(self) -> AxisAnchor {
        match self {
            Gravity::NorthWest | Gravity::North | Gravity::NorthEast | Gravity::Static => AxisAnchor::Start,
            Gravity::West | Gravity::Center | Gravity::East => AxisAnchor::Middle,
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => AxisAnchor::End,
        }
    }

    /// The gravity anchored at the edge opposite to `side`; used when the user
    /// drags that edge.
    pub fn opposite_of(side: Side) -> Gravity {
        match side {
            Side::Left => Gravity::East,
            Side::Right => Gravity::West,
            Side::Top => Gravity::South,
            Side::Bottom => Gravity::North,
        }
    }

    /// The point of `rect` this gravity keeps fixed.
    pub fn anchor(self, rect: &RectInt) -> PointInt {
        let along = |anchor: AxisAnchor, start: i32, len: u32| -> i32 {
            match anchor {
                AxisAnchor::Start => start,
                AxisAnchor::Middle => coord(i64::from(start) + i64::from(len) / 2),
                AxisAnchor::End => coord(i64::from(start) + i64::from(len)),
            }
        };
        PointInt::new(
            along(self.horizontal(), rect.x(), rect.width()),
            along(self.vertical(), rect.y(), rect.height()),
        )
    }

    /// The `width` x `height` rectangle whose anchor lies at `anchor`.
    ///
    /// Inverse of [`Gravity::anchor`]: `g.anchor(&g.rect_at(p, w, h)) == p`.
    pub fn rect_at(self, anchor: PointInt, width: u32, height: u32) -> RectInt {
        let back = |a: AxisAnchor, pos: i32, len: u32| -> i32 {
            match a {
                AxisAnchor::Start => pos,
                AxisAnchor::Middle => coord(i64::from(pos) - i64::from(len) / 2),
                AxisAnchor::End => coord(i64::from(pos) - i64::from(len)),
            }
        };
        RectInt::from_coords(
            back(self.horizontal(), anchor.x, width),
            back(self.vertical(), anchor.y, height),
            width,
            height,
        )
    }
}

/// Resizes `rect` to `new_width` x `new_height`, repositioning it so the anchor
/// named by `gravity` stays where it was.
///
/// Middle anchors split the size difference with truncation towards zero, so
/// applying the inverse size change with the same gravity restores the
/// original rectangle exactly.
pub fn gravity_adjust(rect: &RectInt, gravity: Gravity, new_width: u32, new_height: u32) -> RectInt {
    let shift = |anchor: AxisAnchor, old: u32, new: u32| -> i64 {
        let delta = i64::from(old) - i64::from(new);
        match anchor {
            AxisAnchor::Start => 0,
            AxisAnchor::Middle => delta / 2,
            AxisAnchor::End => delta,
        }
    };
    let dx = shift(gravity.horizontal(), rect.width(), new_width);
    let dy = shift(gravity.vertical(), rect.height(), new_height);
    RectInt::from_coords(
        coord(i64::from(rect.x()) + dx),
        coord(i64::from(rect.y()) + dy),
        new_width,
        new_height,
    )
}

/// An edge of a rectangle or monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Decoration extents around the client area.
///
/// The frame rectangle is the client rectangle grown by these borders; the top
/// border doubles as the titlebar height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameBorders {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl FrameBorders {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        FrameBorders { left, right, top, bottom }
    }

    /// Grows a client rectangle into its frame rectangle.
    pub fn client_to_frame(&self, client: &RectInt) -> RectInt {
        RectInt::from_coords(
            client.x().saturating_sub(extent(self.left)),
            client.y().saturating_sub(extent(self.top)),
            client.width().saturating_add(self.left).saturating_add(self.right),
            client.height().saturating_add(self.top).saturating_add(self.bottom),
        )
    }

    /// Shrinks a frame rectangle to the client area inside it.
    pub fn frame_to_client(&self, frame: &RectInt) -> RectInt {
        RectInt::from_coords(
            frame.x().saturating_add(extent(self.left)),
            frame.y().saturating_add(extent(self.top)),
            frame.width().saturating_sub(self.left.saturating_add(self.right)),
            frame.height().saturating_sub(self.top.saturating_add(self.bottom)),
        )
    }
}
