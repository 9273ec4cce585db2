// novawm-mechanics/src/monitor.rs

//! Monitor topology, struts and work areas.
//!
//! A [`MonitorTopology`] is immutable once built; a hot-plug replaces the whole
//! value. [`WorkAreas`] are derived from a topology plus the struts of all
//! managed windows and are recomputed whenever either changes.

use novawm_core::types::{PointInt, RectInt, Side};
use serde::{Deserialize, Serialize};

/// A physical output in the shared coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Monitor {
    pub index: usize,
    pub rect: RectInt,
}

/// Ordered, non-overlapping monitor rectangles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorTopology {
    monitors: Vec<Monitor>,
}

impl MonitorTopology {
    /// Builds a topology from rectangles in order. Empty rectangles are dropped.
    pub fn new(rects: impl IntoIterator<Item = RectInt>) -> Self {
        let monitors = rects
            .into_iter()
            .filter(|rect| {
                if rect.is_empty() {
                    tracing::warn!("Ignoring empty monitor rectangle {:?}", rect);
                }
                !rect.is_empty()
            })
            .enumerate()
            .map(|(index, rect)| Monitor { index, rect })
            .collect();
        MonitorTopology { monitors }
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Monitor> {
        self.monitors.get(index)
    }

    /// The monitor containing `point`.
    pub fn monitor_at(&self, point: PointInt) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.rect.contains_point(point))
    }

    /// The monitor closest to `point`, measured to each monitor's centre.
    pub fn nearest_to(&self, point: PointInt) -> Option<&Monitor> {
        self.monitors
            .iter()
            .min_by_key(|m| (m.rect.center().distance_squared(&point), m.index))
    }

    /// The monitor sharing the largest area with `rect`; when `rect` touches
    /// no monitor, the one nearest to its centre.
    pub fn monitor_for_rect(&self, rect: &RectInt) -> Option<&Monitor> {
        let best = self
            .monitors
            .iter()
            .map(|m| (m.rect.overlap_area(rect), m))
            .filter(|(area, _)| *area > 0)
            .max_by(|(a, ma), (b, mb)| a.cmp(b).then(mb.index.cmp(&ma.index)))
            .map(|(_, m)| m);
        best.or_else(|| self.nearest_to(rect.center()))
    }

    /// Index of the monitor with exactly this rectangle.
    pub fn index_of_rect(&self, rect: &RectInt) -> Option<usize> {
        self.monitors.iter().find(|m| m.rect == *rect).map(|m| m.index)
    }

    /// Bounding box of all monitors.
    pub fn union_bounds(&self) -> Option<RectInt> {
        let mut iter = self.monitors.iter();
        let first = iter.next()?.rect;
        Some(iter.fold(first, |acc, m| acc.union(&m.rect)))
    }
}

/// An edge band reserved by a panel or dock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strut {
    pub side: Side,
    pub rect: RectInt,
}

impl Strut {
    pub const fn new(side: Side, rect: RectInt) -> Self {
        Strut { side, rect }
    }

    /// Whether this strut reserves space on `monitor`: it must overlap the
    /// monitor and reach the monitor's edge on its side.
    fn applies_to(&self, monitor: &RectInt) -> bool {
        if !self.rect.intersects(monitor) {
            return false;
        }
        match self.side {
            Side::Top => self.rect.top() <= monitor.top(),
            Side::Bottom => self.rect.bottom() >= monitor.bottom(),
            Side::Left => self.rect.left() <= monitor.left(),
            Side::Right => self.rect.right() >= monitor.right(),
        }
    }
}

/// Per-monitor usable rectangles after subtracting struts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkAreas {
    areas: Vec<RectInt>,
}

impl WorkAreas {
    /// Derives the work area of every monitor in `topology`.
    ///
    /// When struts would leave nothing of a monitor, the full monitor is used.
    pub fn compute<'a>(topology: &MonitorTopology, struts: impl IntoIterator<Item = &'a Strut> + Clone) -> Self {
        let areas = topology
            .monitors()
            .iter()
            .map(|monitor| {
                let m = monitor.rect;
                let (mut left, mut top, mut right, mut bottom) = (m.left(), m.top(), m.right(), m.bottom());
                for strut in struts.clone().into_iter().filter(|s| s.applies_to(&m)) {
                    match strut.side {
                        Side::Top => top = top.max(strut.rect.bottom()),
                        Side::Bottom => bottom = bottom.min(strut.rect.top()),
                        Side::Left => left = left.max(strut.rect.right()),
                        Side::Right => right = right.min(strut.rect.left()),
                    }
                }
                let area = RectInt::from_edges(left, top, right, bottom);
                if area.is_empty() {
                    tracing::warn!("Struts cover monitor {} entirely; using the full monitor", monitor.index);
                    m
                } else {
                    area
                }
            })
            .collect();
        WorkAreas { areas }
    }

    pub fn for_monitor(&self, index: usize) -> Option<RectInt> {
        self.areas.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RectInt> {
        self.areas.iter()
    }

    /// Bounding box of every work area.
    pub fn bounding_box(&self) -> Option<RectInt> {
        let mut iter = self.areas.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }
}
