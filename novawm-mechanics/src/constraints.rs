// novawm-mechanics/src/constraints.rs

//! The constraint pipeline.
//!
//! A requested frame rectangle flows through a fixed sequence of passes, each
//! of which sees the previous pass's output and a read-only
//! [`ConstraintContext`]. The order is part of the observable behavior:
//!
//! 1. size hints (limits and increments)
//! 2. aspect ratio
//! 3. keep on a single monitor
//! 4. keep fully on screen
//! 5. keep the titlebar visible
//! 6. avoid foreign struts
//!
//! Axes whose geometry comes from policy (maximize, tile, fullscreen) are
//! overlaid onto the request before the first pass and are never moved by the
//! spatial passes.

use novawm_core::config::WindowPolicyConfig;
use novawm_core::types::{gravity_adjust, FrameBorders, Gravity, RectInt, Side, SizeInt};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::monitor::{MonitorTopology, Strut, WorkAreas};
use crate::size_hints::SizeHints;

/// Which optional spatial constraints apply to a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintRequirements {
    pub fully_onscreen: bool,
    pub single_monitor: bool,
    pub titlebar_visible: bool,
}

impl ConstraintRequirements {
    /// No optional constraint; used for docks, panels and override windows.
    pub const NONE: ConstraintRequirements = ConstraintRequirements {
        fully_onscreen: false,
        single_monitor: false,
        titlebar_visible: false,
    };

    pub fn from_policy(policy: &WindowPolicyConfig) -> Self {
        ConstraintRequirements {
            fully_onscreen: policy.require_fully_onscreen,
            single_monitor: policy.require_on_single_monitor,
            titlebar_visible: policy.require_titlebar_visible,
        }
    }
}

impl Default for ConstraintRequirements {
    fn default() -> Self {
        ConstraintRequirements {
            fully_onscreen: true,
            single_monitor: true,
            titlebar_visible: true,
        }
    }
}

/// Policy-derived geometry, per axis: `(position, extent)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyGeometry {
    pub horizontal: Option<(i32, u32)>,
    pub vertical: Option<(i32, u32)>,
    pub fullscreen: bool,
}

impl PolicyGeometry {
    /// Geometry fully owned by the user or the client.
    pub const FREE: PolicyGeometry = PolicyGeometry {
        horizontal: None,
        vertical: None,
        fullscreen: false,
    };

    /// `rect` owned on both axes.
    pub fn covering(rect: RectInt) -> Self {
        PolicyGeometry {
            horizontal: Some((rect.x(), rect.width())),
            vertical: Some((rect.y(), rect.height())),
            fullscreen: false,
        }
    }

    /// `rect` owned on both axes as a fullscreen area.
    pub fn fullscreen(rect: RectInt) -> Self {
        PolicyGeometry { fullscreen: true, ..PolicyGeometry::covering(rect) }
    }

    pub fn is_free(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none() && !self.fullscreen
    }

    /// Replaces the policy axes of `rect` with the policy values.
    pub fn overlay(&self, rect: RectInt) -> RectInt {
        let (x, width) = self.horizontal.unwrap_or((rect.x(), rect.width()));
        let (y, height) = self.vertical.unwrap_or((rect.y(), rect.height()));
        RectInt::from_coords(x, y, width, height)
    }

    /// Takes the position of every policy axis from `before`, everything else
    /// from `after`.
    fn pin(&self, before: RectInt, after: RectInt) -> RectInt {
        let x = if self.horizontal.is_some() { before.x() } else { after.x() };
        let y = if self.vertical.is_some() { before.y() } else { after.y() };
        RectInt::from_coords(x, y, after.width(), after.height())
    }
}

/// Read-only inputs shared by every pass for one window.
#[derive(Debug, Clone)]
pub struct ConstraintContext<'a> {
    pub hints: SizeHints,
    pub topology: &'a MonitorTopology,
    pub work_areas: &'a WorkAreas,
    /// Struts declared by other windows.
    pub struts: Vec<Strut>,
    pub gravity: Gravity,
    pub borders: FrameBorders,
    pub requirements: ConstraintRequirements,
    pub policy: PolicyGeometry,
    /// The request comes from an interactive grab or a keyboard action.
    pub user_action: bool,
    /// The window itself reserves struts.
    pub owns_struts: bool,
    pub titlebar_visible_margin: u32,
    pub min_titlebar_height: u32,
}

impl ConstraintContext<'_> {
    /// Whether the position-only passes may move this window.
    fn spatial_passes_apply(&self) -> bool {
        !self.policy.fullscreen && !self.user_action && !self.owns_struts
    }

    /// Work area of the monitor `rect` mostly lies on.
    fn work_area_for(&self, rect: &RectInt) -> Option<RectInt> {
        let monitor = self.topology.monitor_for_rect(rect)?;
        self.work_areas.for_monitor(monitor.index)
    }

    fn titlebar_height(&self) -> u32 {
        if self.borders.top > 0 {
            self.borders.top
        } else {
            self.min_titlebar_height
        }
    }
}

/// One step of the pipeline.
pub trait ConstraintPass: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Returns the adjusted rectangle; returning `rect` unchanged means the
    /// pass does not apply.
    fn apply(&self, rect: RectInt, ctx: &ConstraintContext<'_>) -> RectInt;
}

/// Limits and increments from the size hints.
#[derive(Debug, Default)]
pub struct SizeHintsPass;

impl ConstraintPass for SizeHintsPass {
    fn name(&self) -> &'static str {
        "size-hints"
    }

    fn apply(&self, rect: RectInt, ctx: &ConstraintContext<'_>) -> RectInt {
        if ctx.policy.fullscreen {
            return rect;
        }
        let limited = ctx.hints.clamp_limits(rect.size);
        let constrained = ctx.hints.constrain_size(rect.size);
        let size = SizeInt::new(
            if ctx.policy.horizontal.is_some() { limited.width } else { constrained.width },
            if ctx.policy.vertical.is_some() { limited.height } else { constrained.height },
        );
        if size == rect.size {
            return rect;
        }
        let adjusted = gravity_adjust(&rect, ctx.gravity, size.width, size.height);
        ctx.policy.pin(rect, adjusted)
    }
}

/// Aspect-ratio bounds from the size hints.
#[derive(Debug, Default)]
pub struct AspectPass;

impl ConstraintPass for AspectPass {
    fn name(&self) -> &'static str {
        "aspect"
    }

    fn apply(&self, rect: RectInt, ctx: &ConstraintContext<'_>) -> RectInt {
        if !ctx.policy.is_free() {
            return rect;
        }
        let size = ctx.hints.constrain_aspect(rect.size);
        if size == rect.size {
            return rect;
        }
        gravity_adjust(&rect, ctx.gravity, size.width, size.height)
    }
}

/// Shifts `rect` into `bounds` on every axis where it fits, leaving the other
/// axes alone.
fn shift_fitting_axes(rect: RectInt, bounds: &RectInt) -> RectInt {
    let shifted = rect.shift_into(bounds);
    let x = if rect.width() <= bounds.width() { shifted.x() } else { rect.x() };
    let y = if rect.height() <= bounds.height() { shifted.y() } else { rect.y() };
    RectInt::from_coords(x, y, rect.width(), rect.height())
}

/// Keeps the window inside the work area of its main monitor.
///
/// A window larger than that work area is left alone; this pass yields to
/// [`FullyOnscreenPass`].
#[derive(Debug, Default)]
pub struct SingleMonitorPass;

impl ConstraintPass for SingleMonitorPass {
    fn name(&self) -> &'static str {
        "single-monitor"
    }

    fn apply(&self, rect: RectInt, ctx: &ConstraintContext<'_>) -> RectInt {
        if !ctx.requirements.single_monitor || !ctx.spatial_passes_apply() {
            return rect;
        }
        let Some(area) = ctx.work_area_for(&rect) else {
            return rect;
        };
        if rect.width() > area.width() || rect.height() > area.height() {
            trace!("Window {:?} exceeds work area {:?}; single-monitor relaxed", rect, area);
            return rect;
        }
        ctx.policy.pin(rect, rect.shift_into(&area))
    }
}

/// Keeps the window inside the union of all work areas.
#[derive(Debug, Default)]
pub struct FullyOnscreenPass;

impl ConstraintPass for FullyOnscreenPass {
    fn name(&self) -> &'static str {
        "fully-onscreen"
    }

    fn apply(&self, rect: RectInt, ctx: &ConstraintContext<'_>) -> RectInt {
        if !ctx.requirements.fully_onscreen || !ctx.spatial_passes_apply() {
            return rect;
        }
        let Some(bounds) = ctx.work_areas.bounding_box() else {
            return rect;
        };
        ctx.policy.pin(rect, shift_fitting_axes(rect, &bounds))
    }
}

/// Keeps enough of the titlebar on screen to grab it with the pointer.
///
/// Unlike the other spatial passes this one also binds interactive moves.
#[derive(Debug, Default)]
pub struct TitlebarVisiblePass;

impl ConstraintPass for TitlebarVisiblePass {
    fn name(&self) -> &'static str {
        "titlebar-visible"
    }

    fn apply(&self, rect: RectInt, ctx: &ConstraintContext<'_>) -> RectInt {
        if !ctx.requirements.titlebar_visible || ctx.policy.fullscreen || ctx.owns_struts {
            return rect;
        }
        let Some(bounds) = ctx.work_areas.bounding_box() else {
            return rect;
        };

        let margin = i64::from(ctx.titlebar_visible_margin.min(rect.width()));
        let min_x = i64::from(bounds.left()) - i64::from(rect.width()) + margin;
        let max_x = i64::from(bounds.right()) - margin;
        let x = i64::from(rect.x()).clamp(min_x, max_x.max(min_x));

        let titlebar = i64::from(ctx.titlebar_height().min(rect.height()));
        let min_y = i64::from(bounds.top());
        let max_y = (i64::from(bounds.bottom()) - titlebar).max(min_y);
        let y = i64::from(rect.y()).clamp(min_y, max_y);

        // Both values lie between two i32 coordinates.
        let adjusted = RectInt::from_coords(x as i32, y as i32, rect.width(), rect.height());
        ctx.policy.pin(rect, adjusted)
    }
}

/// Moves `start` so that `[start, start + extent)` lies within `low..high`.
/// When the band is too narrow the `low` edge wins.
fn fit_into_band(start: i32, extent: u32, low: Option<i32>, high: Option<i32>) -> i32 {
    let mut position = i64::from(start);
    if let Some(high) = high {
        position = position.min(i64::from(high) - i64::from(extent));
    }
    if let Some(low) = low {
        position = position.max(i64::from(low));
    }
    position.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Pushes the window off struts declared by other windows.
///
/// All struts facing the window are combined into one free band per axis, so
/// clearing a bottom panel never pushes the window back under a top one. A
/// window taller (or wider) than the band keeps its top (or left) edge clear.
#[derive(Debug, Default)]
pub struct AvoidStrutsPass;

impl ConstraintPass for AvoidStrutsPass {
    fn name(&self) -> &'static str {
        "avoid-struts"
    }

    fn apply(&self, rect: RectInt, ctx: &ConstraintContext<'_>) -> RectInt {
        if !ctx.spatial_passes_apply() || !ctx.struts.iter().any(|s| rect.intersects(&s.rect)) {
            return rect;
        }

        let facing = |side: Side, r: RectInt| {
            ctx.struts.iter().filter(move |s| {
                s.side == side
                    && match side {
                        Side::Top | Side::Bottom => s.rect.left() < r.right() && r.left() < s.rect.right(),
                        Side::Left | Side::Right => s.rect.top() < r.bottom() && r.top() < s.rect.bottom(),
                    }
            })
        };

        let top = facing(Side::Top, rect).map(|s| s.rect.bottom()).max();
        let bottom = facing(Side::Bottom, rect).map(|s| s.rect.top()).min();
        let y = fit_into_band(rect.y(), rect.height(), top, bottom);
        let moved = RectInt::from_coords(rect.x(), y, rect.width(), rect.height());

        let left = facing(Side::Left, moved).map(|s| s.rect.right()).max();
        let right = facing(Side::Right, moved).map(|s| s.rect.left()).min();
        let x = fit_into_band(moved.x(), moved.width(), left, right);

        ctx.policy.pin(rect, RectInt::from_coords(x, y, rect.width(), rect.height()))
    }
}

/// The ordered pass list.
#[derive(Debug)]
pub struct ConstraintPipeline {
    passes: Vec<Box<dyn ConstraintPass>>,
}

impl ConstraintPipeline {
    /// The standard six passes in their fixed order.
    pub fn standard() -> Self {
        ConstraintPipeline {
            passes: vec![
                Box::new(SizeHintsPass),
                Box::new(AspectPass),
                Box::new(SingleMonitorPass),
                Box::new(FullyOnscreenPass),
                Box::new(TitlebarVisiblePass),
                Box::new(AvoidStrutsPass),
            ],
        }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Resolves `requested` into the rectangle the window should take.
    pub fn run(&self, requested: RectInt, ctx: &ConstraintContext<'_>) -> RectInt {
        let mut rect = ctx.policy.overlay(requested);
        for pass in &self.passes {
            let next = pass.apply(rect, ctx);
            if next != rect {
                trace!("Constraint pass '{}': {:?} -> {:?}", pass.name(), rect, next);
            }
            rect = next;
        }
        rect
    }
}

impl Default for ConstraintPipeline {
    fn default() -> Self {
        Self::standard()
    }
}
