// novawm-mechanics/src/coordinator.rs

//! The move/resize coordinator.
//!
//! Every geometry change, whatever its origin, ends in
//! [`WindowManager::move_resize`]: the request is constrained, committed to the
//! window, announced to the client and, unless the client takes part in
//! synchronized resizing, announced to the compositor. A synchronized client
//! gets one outstanding request at a time; a newer request replaces it and a
//! missed deadline disables synchronization for that window.

use std::time::Instant;

use bitflags::bitflags;
use novawm_core::types::{Gravity, PointInt, RectInt};
use tracing::{debug, info, warn};

use crate::constraints::{ConstraintContext, PolicyGeometry};
use crate::data_types::{FullscreenState, GrabOp, MaximizeDirections, Placement, SyncState, WindowId};
use crate::error::WindowManagerError;
use crate::events::{gravity_position, SessionGeometry, WindowEvent};
use crate::manager::WindowManager;
use crate::tiling::tile_rect;
use crate::window::{GrabState, PendingSync, Window};

bitflags! {
    /// Where a move/resize request comes from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MoveResizeFlags: u8 {
        /// The client asked; it gets a configure even when nothing changes.
        const CONFIGURE_REQUEST = 1 << 0;
        const USER_ACTION = 1 << 1;
        const MOVE_ACTION = 1 << 2;
        const RESIZE_ACTION = 1 << 3;
        /// A maximize/tile/fullscreen transition.
        const STATE_CHANGED = 1 << 4;
        /// Do not report the result to the compositor.
        const DONT_SYNC_COMPOSITOR = 1 << 5;
    }
}

bitflags! {
    /// What a move/resize changed. Empty means nothing did.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MoveResizeResult: u8 {
        const MOVED = 1 << 0;
        const RESIZED = 1 << 1;
        const FRAME_SHAPE_CHANGED = 1 << 2;
    }
}

impl MoveResizeResult {
    fn between(old: &RectInt, new: &RectInt) -> Self {
        let mut result = MoveResizeResult::empty();
        result.set(MoveResizeResult::MOVED, old.origin != new.origin);
        result.set(MoveResizeResult::RESIZED, old.size != new.size);
        result
    }
}

/// Reports `window.current_rect` to the compositor if it differs from what the
/// compositor last saw.
fn commit_to_compositor(
    window: &mut Window,
    flags: MoveResizeFlags,
    shape: MoveResizeResult,
    events: &mut Vec<WindowEvent>,
) {
    if flags.contains(MoveResizeFlags::DONT_SYNC_COMPOSITOR) {
        return;
    }
    let result = MoveResizeResult::between(&window.buffer_rect, &window.current_rect)
        | (shape & MoveResizeResult::FRAME_SHAPE_CHANGED);
    if result.is_empty() {
        return;
    }
    events.push(WindowEvent::GeometryCommitted {
        window: window.id,
        old: window.buffer_rect,
        new: window.current_rect,
        result,
    });
    window.buffer_rect = window.current_rect;
}

/// Relaxes or restores the onscreen requirements after the user placed a
/// floating window, so later recomputes keep it where the user left it.
fn update_onscreen_requirements(window: &mut Window, fully_onscreen: bool, single_monitor: bool) {
    if window.placement != Placement::Floating || window.is_fullscreen() {
        return;
    }
    let mut requirements = window.requirements;
    requirements.fully_onscreen = window.base_requirements.fully_onscreen && fully_onscreen;
    requirements.single_monitor = window.base_requirements.single_monitor && single_monitor;
    if requirements != window.requirements {
        debug!(
            "Window {}: onscreen requirements now fully={} single={}",
            window.id, requirements.fully_onscreen, requirements.single_monitor
        );
        window.requirements = requirements;
    }
}

fn to_coord(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl WindowManager {
    /// The monitor a window belongs to: its assignment, else where it mostly lies.
    pub(crate) fn monitor_of(&self, window: &Window) -> Result<usize, WindowManagerError> {
        window
            .monitor
            .filter(|index| *index < self.topology.len())
            .or_else(|| self.topology.monitor_for_rect(&window.current_rect).map(|m| m.index))
            .ok_or(WindowManagerError::NoMonitor)
    }

    pub(crate) fn work_area_of(&self, window: &Window) -> Result<RectInt, WindowManagerError> {
        let index = self.monitor_of(window)?;
        self.work_areas.for_monitor(index).ok_or(WindowManagerError::NoMonitor)
    }

    /// Union of the listed monitors, or the window's own monitor.
    pub(crate) fn fullscreen_area(
        &self,
        window: &Window,
        monitors: Option<&[usize]>,
    ) -> Result<RectInt, WindowManagerError> {
        match monitors {
            Some(list) if !list.is_empty() => {
                let mut area: Option<RectInt> = None;
                for index in list {
                    let rect = self
                        .topology
                        .get(*index)
                        .ok_or(WindowManagerError::InvalidMonitor(*index))?
                        .rect;
                    area = Some(area.map_or(rect, |a| a.union(&rect)));
                }
                area.ok_or(WindowManagerError::NoMonitor)
            }
            _ => {
                let index = self.monitor_of(window)?;
                self.topology.get(index).map(|m| m.rect).ok_or(WindowManagerError::NoMonitor)
            }
        }
    }

    /// The axes of `window` whose geometry comes from its state.
    pub(crate) fn policy_geometry(&self, window: &Window) -> Result<PolicyGeometry, WindowManagerError> {
        if let FullscreenState::Fullscreen { monitors, .. } = &window.fullscreen {
            return self.fullscreen_area(window, monitors.as_deref()).map(PolicyGeometry::fullscreen);
        }
        if window.placement == Placement::Floating {
            return Ok(PolicyGeometry::FREE);
        }
        let area = self.work_area_of(window)?;
        Ok(match window.placement {
            Placement::Floating => PolicyGeometry::FREE,
            Placement::Maximized(directions) => PolicyGeometry {
                horizontal: directions
                    .contains(MaximizeDirections::HORIZONTAL)
                    .then(|| (area.x(), area.width())),
                vertical: directions
                    .contains(MaximizeDirections::VERTICAL)
                    .then(|| (area.y(), area.height())),
                fullscreen: false,
            },
            Placement::TiledMaximized => PolicyGeometry::covering(area),
            Placement::TiledSide(side) => {
                PolicyGeometry::covering(tile_rect(&area, side, self.policy.tile_split_ratio))
            }
        })
    }

    /// Whether `rect` lies inside the work areas, and inside a single one.
    fn onscreen_placement(&self, rect: &RectInt) -> (bool, bool) {
        let fully_onscreen = self.work_areas.bounding_box().map_or(true, |bounds| bounds.contains_rect(rect));
        let single_monitor = self.work_areas.iter().any(|area| area.contains_rect(rect));
        (fully_onscreen, single_monitor)
    }

    fn constraint_context(
        &self,
        window: &Window,
        policy: PolicyGeometry,
        user_action: bool,
        gravity: Gravity,
    ) -> ConstraintContext<'_> {
        ConstraintContext {
            hints: window.hints,
            topology: &self.topology,
            work_areas: &self.work_areas,
            struts: self
                .registry
                .iter()
                .filter(|other| other.id != window.id)
                .flat_map(|other| other.struts.iter().copied())
                .collect(),
            gravity,
            borders: window.borders,
            requirements: window.requirements,
            policy,
            user_action,
            owns_struts: window.owns_struts(),
            titlebar_visible_margin: self.policy.titlebar_visible_margin,
            min_titlebar_height: self.policy.min_titlebar_height,
        }
    }

    /// Constrains and commits a new frame rectangle for `id`.
    pub fn move_resize(
        &mut self,
        id: WindowId,
        requested: RectInt,
        flags: MoveResizeFlags,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        self.move_resize_internal(id, requested, flags, None, now)
    }

    pub(crate) fn move_resize_internal(
        &mut self,
        id: WindowId,
        requested: RectInt,
        flags: MoveResizeFlags,
        gravity: Option<Gravity>,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        let window = self.registry.require(id)?;
        let policy = self.policy_geometry(window)?;
        let ctx = self.constraint_context(
            window,
            policy,
            flags.contains(MoveResizeFlags::USER_ACTION),
            gravity.unwrap_or(window.gravity),
        );
        let constrained = self.pipeline.run(requested, &ctx);
        if constrained.is_empty() {
            warn!("Window {}: constraints produced degenerate rect {:?}", id, constrained);
            return Err(WindowManagerError::DegenerateGeometry(constrained));
        }
        let monitor = self.topology.monitor_for_rect(&constrained).map(|m| m.index);
        let placement = flags
            .contains(MoveResizeFlags::USER_ACTION)
            .then(|| self.onscreen_placement(&constrained));
        let timeout = self.policy.sync_request_timeout();

        let window = self.registry.require_mut(id)?;
        let mut result = MoveResizeResult::between(&window.current_rect, &constrained);
        if std::mem::take(&mut window.frame_shape_dirty) {
            result |= MoveResizeResult::FRAME_SHAPE_CHANGED;
        }
        window.unconstrained_rect = requested;
        window.current_rect = constrained;
        if let Some((fully_onscreen, single_monitor)) = placement {
            update_onscreen_requirements(window, fully_onscreen, single_monitor);
        }
        if monitor.is_some() {
            window.monitor = monitor;
        }
        debug!(
            "Window {}: move/resize {:?} -> {:?} ({:?}, {:?})",
            id, requested, constrained, flags, result
        );

        if !result.is_empty() || flags.contains(MoveResizeFlags::CONFIGURE_REQUEST) {
            window.sync_serial += 1;
            self.events.push(WindowEvent::ConfigureClient {
                window: id,
                rect: window.borders.frame_to_client(&constrained),
                serial: window.sync_serial,
            });
        }

        if window.sync == SyncState::Enabled && result.contains(MoveResizeResult::RESIZED) {
            if let Some(previous) = window.pending_sync {
                debug!("Window {}: sync request {} superseded by {}", id, previous.serial, window.sync_serial);
                result |= previous.result & MoveResizeResult::FRAME_SHAPE_CHANGED;
            }
            window.pending_sync = Some(PendingSync {
                serial: window.sync_serial,
                deadline: now + timeout,
                flags,
                result,
            });
        } else {
            let shape = window.pending_sync.take().map_or(result, |p| result | p.result);
            commit_to_compositor(window, flags, shape, &mut self.events);
        }

        self.recompute_tile_matches();
        Ok(result)
    }

    /// Handles a client's acknowledgment of sync request `serial`.
    ///
    /// Returns whether the acknowledgment completed the outstanding request.
    pub fn ack_sync(&mut self, id: WindowId, serial: u64) -> Result<bool, WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        match window.pending_sync {
            Some(pending) if pending.serial == serial => {
                window.pending_sync = None;
                commit_to_compositor(window, pending.flags, pending.result, &mut self.events);
                debug!("Window {}: sync request {} acknowledged", id, serial);
                Ok(true)
            }
            Some(pending) if serial < pending.serial => {
                debug!("Window {}: discarding stale sync ack {} (waiting for {})", id, serial, pending.serial);
                Ok(false)
            }
            Some(pending) => {
                warn!("Window {}: sync ack {} was never requested (waiting for {})", id, serial, pending.serial);
                Ok(false)
            }
            None if serial <= window.sync_serial => {
                debug!("Window {}: late sync ack {} ignored", id, serial);
                Ok(false)
            }
            None => {
                warn!("Window {}: unexpected sync ack {}", id, serial);
                Ok(false)
            }
        }
    }

    /// Fires every sync deadline at or before `now`. Returns how many fired.
    pub fn dispatch_timers(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        for id in self.registry.ids_in_order() {
            let Some(window) = self.registry.get_mut(id) else {
                continue;
            };
            let Some(pending) = window.pending_sync.filter(|p| p.deadline <= now) else {
                continue;
            };
            warn!(
                "Window {} did not acknowledge sync request {} in time; disabling synchronized resizing",
                id, pending.serial
            );
            window.pending_sync = None;
            window.sync = SyncState::Disabled;
            commit_to_compositor(window, pending.flags, pending.result, &mut self.events);
            fired += 1;
        }
        fired
    }

    /// The earliest outstanding sync deadline.
    pub fn next_sync_deadline(&self) -> Option<Instant> {
        self.registry
            .iter()
            .filter_map(|w| w.pending_sync.map(|p| p.deadline))
            .min()
    }

    /// Starts an interactive move or resize at `pointer`.
    ///
    /// A maximized or tiled window is floated first; a moved one keeps its
    /// saved size and stays under the pointer proportionally.
    pub fn begin_grab(
        &mut self,
        id: WindowId,
        op: GrabOp,
        pointer: PointInt,
        now: Instant,
    ) -> Result<(), WindowManagerError> {
        let window = self.registry.require(id)?;
        if window.is_fullscreen() {
            return Err(WindowManagerError::UnsupportedOperation(format!(
                "cannot grab fullscreen window {}",
                id
            )));
        }

        if window.placement != Placement::Floating {
            let current = window.current_rect;
            let (requested, action) = match op {
                GrabOp::Move => {
                    let saved = window.saved_rect.unwrap_or(current);
                    let grab_offset = (i64::from(pointer.x) - i64::from(current.x()))
                        .clamp(0, i64::from(current.width()));
                    let offset = grab_offset * i64::from(saved.width()) / i64::from(current.width().max(1));
                    let x = to_coord(i64::from(pointer.x) - offset);
                    (
                        RectInt::from_coords(x, current.y(), saved.width(), saved.height()),
                        MoveResizeFlags::MOVE_ACTION,
                    )
                }
                GrabOp::Resize(_) => (current, MoveResizeFlags::RESIZE_ACTION),
            };
            let previous = window.placement;
            let snapshot = window.snapshot();

            let window = self.registry.require_mut(id)?;
            window.placement = Placement::Floating;
            window.saved_rect = None;
            let flags = MoveResizeFlags::USER_ACTION | MoveResizeFlags::STATE_CHANGED | action;
            if let Err(err) = self.move_resize(id, requested, flags, now) {
                if let Some(window) = self.registry.get_mut(id) {
                    window.rollback(snapshot);
                }
                return Err(err);
            }
            info!("Window {} released from {:?} by a grab", id, previous);
        }

        let window = self.registry.require_mut(id)?;
        window.grab = Some(GrabState {
            op,
            start_pointer: pointer,
            start_rect: window.current_rect,
        });
        window.debug_check();
        debug!("Window {}: {:?} grab started at {:?}", id, op, pointer);
        Ok(())
    }

    /// Follows the pointer during a grab.
    pub fn update_grab(
        &mut self,
        id: WindowId,
        pointer: PointInt,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        let grab = self.registry.require(id)?.grab.ok_or_else(|| {
            WindowManagerError::UnsupportedOperation(format!("window {} has no grab in progress", id))
        })?;
        let dx = pointer.x.saturating_sub(grab.start_pointer.x);
        let dy = pointer.y.saturating_sub(grab.start_pointer.y);
        let start = grab.start_rect;

        match grab.op {
            GrabOp::Move => self.move_resize_internal(
                id,
                start.translate(dx, dy),
                MoveResizeFlags::USER_ACTION | MoveResizeFlags::MOVE_ACTION,
                None,
                now,
            ),
            GrabOp::Resize(edge) => {
                let (mut left, mut top, mut right, mut bottom) =
                    (start.left(), start.top(), start.right(), start.bottom());
                if edge.moves_left() {
                    left = left.saturating_add(dx).min(right.saturating_sub(1));
                }
                if edge.moves_right() {
                    right = right.saturating_add(dx).max(left.saturating_add(1));
                }
                if edge.moves_top() {
                    top = top.saturating_add(dy).min(bottom.saturating_sub(1));
                }
                if edge.moves_bottom() {
                    bottom = bottom.saturating_add(dy).max(top.saturating_add(1));
                }
                self.move_resize_internal(
                    id,
                    RectInt::from_edges(left, top, right, bottom),
                    MoveResizeFlags::USER_ACTION | MoveResizeFlags::RESIZE_ACTION,
                    Some(edge.gravity()),
                    now,
                )
            }
        }
    }

    pub fn end_grab(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        match window.grab.take() {
            Some(grab) => debug!("Window {}: {:?} grab ended at {:?}", id, grab.op, window.current_rect),
            None => debug!("Window {}: end of grab without a grab", id),
        }
        Ok(())
    }

    /// The position a client with `gravity` would report for `id`.
    pub fn gravity_position(&self, id: WindowId, gravity: Option<Gravity>) -> Result<PointInt, WindowManagerError> {
        let window = self.registry.require(id)?;
        Ok(gravity_position(
            &window.current_rect,
            gravity.unwrap_or(window.gravity),
            &window.borders,
        ))
    }

    pub fn session_geometry(&self, id: WindowId) -> Result<SessionGeometry, WindowManagerError> {
        self.registry.require(id).map(SessionGeometry::from_window)
    }
}
