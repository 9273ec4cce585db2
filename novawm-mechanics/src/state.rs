// novawm-mechanics/src/state.rs

//! Window state transitions.
//!
//! Every transition either commits completely or leaves the window as it was:
//! the state parts it touches are snapshotted and restored when the geometry
//! commit fails.

use std::time::Instant;

use novawm_core::types::{FrameBorders, RectInt};
use tracing::{debug, info};

use crate::constraints::ConstraintRequirements;
use crate::coordinator::{MoveResizeFlags, MoveResizeResult};
use crate::data_types::{
    FullscreenState, MapState, MaximizeAxis, MaximizeDirections, Placement, Presence, TileMode, WindowId,
    WorkspaceIndex,
};
use crate::error::WindowManagerError;
use crate::events::ClientGeometryRequest;
use crate::manager::WindowManager;
use crate::monitor::Strut;
use crate::scheduler::QueueKinds;
use crate::size_hints::SizeHints;
use crate::window::StateSnapshot;

impl WindowManager {
    /// Commits `requested` for a state change, undoing the state change if the
    /// commit fails.
    fn commit_transition(
        &mut self,
        id: WindowId,
        requested: RectInt,
        snapshot: StateSnapshot,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        match self.move_resize(id, requested, MoveResizeFlags::STATE_CHANGED, now) {
            Ok(result) => {
                if let Some(window) = self.registry.get(id) {
                    window.debug_check();
                }
                Ok(result)
            }
            Err(err) => {
                if let Some(window) = self.registry.get_mut(id) {
                    window.rollback(snapshot);
                }
                debug!("Window {}: transition rolled back: {}", id, err);
                Err(err)
            }
        }
    }

    /// Moves the window into `target` placement.
    ///
    /// Axes leaving policy control come back from `saved_rect`; axes entering
    /// it are filled in by the constraint pipeline.
    fn apply_placement(
        &mut self,
        id: WindowId,
        target: Placement,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        let window = self.registry.require(id)?;
        let previous = window.placement;
        if previous == target {
            return Ok(MoveResizeResult::empty());
        }
        if target != Placement::Floating && !window.is_fullscreen() {
            // Fail before touching anything when there is nowhere to go.
            self.work_area_of(window)?;
        }
        let snapshot = window.snapshot();
        let current = window.current_rect;
        let restore = window.saved_rect.unwrap_or(current);
        let suspended = window.is_fullscreen();

        let leaving = previous.policy_directions() - target.policy_directions();
        let (x, width) = if leaving.contains(MaximizeDirections::HORIZONTAL) {
            (restore.x(), restore.width())
        } else {
            (current.x(), current.width())
        };
        let (y, height) = if leaving.contains(MaximizeDirections::VERTICAL) {
            (restore.y(), restore.height())
        } else {
            (current.y(), current.height())
        };
        let requested = RectInt::from_coords(x, y, width, height);

        let window = self.registry.require_mut(id)?;
        if window.saved_rect.is_none() {
            window.saved_rect = Some(current);
        }
        window.placement = target;
        if target == Placement::Floating && !suspended {
            window.saved_rect = None;
        }
        info!("Window {}: {:?} -> {:?}", id, previous, target);

        if suspended {
            debug!("Window {} is fullscreen; placement applies on leaving fullscreen", id);
            window.debug_check();
            return Ok(MoveResizeResult::empty());
        }
        self.commit_transition(id, requested, snapshot, now)
    }

    pub fn maximize(
        &mut self,
        id: WindowId,
        directions: MaximizeDirections,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        let target = self.registry.require(id)?.placement.after_maximize(directions);
        self.apply_placement(id, target, now)
    }

    pub fn unmaximize(
        &mut self,
        id: WindowId,
        directions: MaximizeDirections,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        let target = self.registry.require(id)?.placement.after_unmaximize(directions);
        self.apply_placement(id, target, now)
    }

    pub fn toggle_maximize(&mut self, id: WindowId, now: Instant) -> Result<MoveResizeResult, WindowManagerError> {
        if self.registry.require(id)?.placement.maximize_axis() == MaximizeAxis::Both {
            self.unmaximize(id, MaximizeDirections::BOTH, now)
        } else {
            self.maximize(id, MaximizeDirections::BOTH, now)
        }
    }

    /// Tiles the window; `TileMode::None` untiles it.
    pub fn tile(&mut self, id: WindowId, mode: TileMode, now: Instant) -> Result<MoveResizeResult, WindowManagerError> {
        let window = self.registry.require(id)?;
        if matches!(mode, TileMode::Left | TileMode::Right) {
            let area = self.work_area_of(window)?;
            let ratio = self.policy.tile_split_ratio;
            if !window.hints.can_tile_side_by_side(&area, ratio) {
                let left = SizeHints::left_tile_width(&area, ratio);
                return Err(WindowManagerError::CannotTile {
                    window: id,
                    min_width: window.hints.min.width,
                    available: left.min(area.width() - left),
                });
            }
        }
        let target = window.placement.after_tile(mode);
        self.apply_placement(id, target, now)
    }

    pub fn untile(&mut self, id: WindowId, now: Instant) -> Result<MoveResizeResult, WindowManagerError> {
        self.tile(id, TileMode::None, now)
    }

    fn validate_monitors(&self, monitors: &[usize]) -> Result<(), WindowManagerError> {
        match monitors.iter().find(|index| **index >= self.topology.len()) {
            Some(index) => Err(WindowManagerError::InvalidMonitor(*index)),
            None => Ok(()),
        }
    }

    /// Makes the window fullscreen on `monitors`, on the monitors the client
    /// declared, or on the monitor containing its origin.
    pub fn fullscreen(
        &mut self,
        id: WindowId,
        monitors: Option<Vec<usize>>,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        let window = self.registry.require(id)?;
        let span = monitors
            .or_else(|| window.fullscreen_monitors.clone())
            .filter(|list| !list.is_empty());
        if let Some(list) = &span {
            self.validate_monitors(list)?;
        }
        if self.topology.is_empty() {
            return Err(WindowManagerError::NoMonitor);
        }

        let current = window.current_rect;
        if let FullscreenState::Fullscreen { monitors: active, .. } = &window.fullscreen {
            if *active == span {
                return Ok(MoveResizeResult::empty());
            }
        }
        let home = self
            .topology
            .monitor_at(current.origin)
            .map(|m| m.index)
            .or(window.monitor.filter(|index| *index < self.topology.len()))
            .or_else(|| self.topology.monitor_for_rect(&current).map(|m| m.index))
            .ok_or(WindowManagerError::NoMonitor)?;
        let snapshot = window.snapshot();
        let restore = match &window.fullscreen {
            FullscreenState::Fullscreen { restore, .. } => *restore,
            FullscreenState::Windowed => current,
        };

        let window = self.registry.require_mut(id)?;
        if window.saved_rect.is_none() {
            window.saved_rect = Some(current);
        }
        window.fullscreen = FullscreenState::Fullscreen { monitors: span, restore };
        window.monitor = Some(home);
        info!("Window {} entering fullscreen", id);
        self.commit_transition(id, current, snapshot, now)
    }

    /// Leaves fullscreen, resuming the placement that was active before.
    pub fn unfullscreen(&mut self, id: WindowId, now: Instant) -> Result<MoveResizeResult, WindowManagerError> {
        let window = self.registry.require(id)?;
        let FullscreenState::Fullscreen { restore, .. } = window.fullscreen else {
            return Ok(MoveResizeResult::empty());
        };
        let snapshot = window.snapshot();
        let floating = window.placement == Placement::Floating;
        let requested = if floating { window.saved_rect.unwrap_or(restore) } else { restore };
        let home = self.topology.monitor_for_rect(&restore).map(|m| m.index);

        let window = self.registry.require_mut(id)?;
        window.fullscreen = FullscreenState::Windowed;
        if floating {
            window.saved_rect = None;
        }
        if home.is_some() {
            window.monitor = home;
        }
        info!("Window {} leaving fullscreen to {:?}", id, window.placement);
        self.commit_transition(id, requested, snapshot, now)
    }

    pub fn toggle_fullscreen(&mut self, id: WindowId, now: Instant) -> Result<MoveResizeResult, WindowManagerError> {
        if self.registry.require(id)?.is_fullscreen() {
            self.unfullscreen(id, now)
        } else {
            self.fullscreen(id, None, now)
        }
    }

    /// Records the client's fullscreen monitor span, applying it at once if the
    /// window is already fullscreen.
    pub fn set_fullscreen_monitors(
        &mut self,
        id: WindowId,
        monitors: Vec<usize>,
        now: Instant,
    ) -> Result<(), WindowManagerError> {
        self.validate_monitors(&monitors)?;
        let span = if monitors.is_empty() { None } else { Some(monitors) };
        let window = self.registry.require_mut(id)?;
        window.fullscreen_monitors = span.clone();
        if window.is_fullscreen() {
            self.fullscreen(id, span, now)?;
        }
        Ok(())
    }

    /// A client configure request.
    pub fn client_geometry(
        &mut self,
        id: WindowId,
        request: ClientGeometryRequest,
        now: Instant,
    ) -> Result<MoveResizeResult, WindowManagerError> {
        let window = self.registry.require(id)?;
        let requested = request.frame_rect(&window.current_rect, window.gravity, &window.borders);
        let mut flags = MoveResizeFlags::CONFIGURE_REQUEST;
        if request.x.is_some() || request.y.is_some() {
            flags |= MoveResizeFlags::MOVE_ACTION;
        }
        if request.width.is_some() || request.height.is_some() {
            flags |= MoveResizeFlags::RESIZE_ACTION;
        }
        self.move_resize_internal(id, requested, flags, request.gravity, now)
    }

    pub fn minimize(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        if window.presence != Presence::Minimized {
            window.presence = Presence::Minimized;
            debug!("Window {} minimized", id);
            self.queues.queue(id, QueueKinds::CALC_SHOWING);
            self.recompute_tile_matches();
        }
        Ok(())
    }

    pub fn unminimize(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        if window.presence == Presence::Minimized {
            window.presence = Presence::Normal;
            debug!("Window {} restored", id);
            self.queues.queue(id, QueueKinds::CALC_SHOWING);
            self.recompute_tile_matches();
        }
        Ok(())
    }

    pub fn shade(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        match window.presence {
            Presence::Normal => {
                window.presence = Presence::Shaded;
                window.frame_shape_dirty = true;
                self.queues.queue(id, QueueKinds::MOVE_RESIZE);
                Ok(())
            }
            Presence::Shaded => Ok(()),
            Presence::Minimized => Err(WindowManagerError::UnsupportedOperation(format!(
                "cannot shade minimized window {}",
                id
            ))),
        }
    }

    pub fn unshade(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        if window.presence == Presence::Shaded {
            window.presence = Presence::Normal;
            window.frame_shape_dirty = true;
            self.queues.queue(id, QueueKinds::MOVE_RESIZE);
        }
        Ok(())
    }

    fn set_map_state(&mut self, id: WindowId, state: MapState) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        if window.map_state != state {
            window.map_state = state;
            debug!("Window {} {:?}", id, state);
            self.queues.queue(id, QueueKinds::CALC_SHOWING);
            self.recompute_tile_matches();
        }
        Ok(())
    }

    pub fn map(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        self.set_map_state(id, MapState::Mapped)
    }

    pub fn unmap(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        self.set_map_state(id, MapState::Unmapped)
    }

    pub fn stick(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        self.registry.require_mut(id)?.sticky = true;
        self.queues.queue(id, QueueKinds::CALC_SHOWING);
        Ok(())
    }

    pub fn unstick(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        self.registry.require_mut(id)?.sticky = false;
        self.queues.queue(id, QueueKinds::CALC_SHOWING);
        Ok(())
    }

    pub fn set_urgent(&mut self, id: WindowId, urgent: bool) -> Result<(), WindowManagerError> {
        self.registry.require_mut(id)?.urgent = urgent;
        Ok(())
    }

    /// Focuses `id`, or nothing.
    pub fn focus(&mut self, id: Option<WindowId>) -> Result<(), WindowManagerError> {
        if let Some(id) = id {
            self.registry.require(id)?;
        }
        for window in self.registry.iter_mut() {
            window.focused = Some(window.id) == id;
        }
        Ok(())
    }

    pub fn set_workspace(&mut self, id: WindowId, workspace: WorkspaceIndex) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        if window.workspace != workspace {
            window.workspace = workspace;
            self.queues.queue(id, QueueKinds::CALC_SHOWING);
            self.recompute_tile_matches();
        }
        Ok(())
    }

    pub fn set_active_workspace(&mut self, workspace: WorkspaceIndex) {
        if self.active_workspace == workspace {
            return;
        }
        info!("Active workspace {} -> {}", self.active_workspace, workspace);
        self.active_workspace = workspace;
        for id in self.registry.ids_in_order() {
            self.queues.queue(id, QueueKinds::CALC_SHOWING);
        }
    }

    /// Sets the transient parent, refusing to create a cycle.
    pub fn set_transient_for(&mut self, id: WindowId, parent: Option<WindowId>) -> Result<(), WindowManagerError> {
        self.registry.require(id)?;
        if let Some(parent) = parent {
            let mut cursor = Some(parent);
            while let Some(ancestor) = cursor {
                if ancestor == id {
                    return Err(WindowManagerError::TransientCycle { window: id, parent });
                }
                cursor = self.registry.require(ancestor)?.transient_for;
            }
        }
        self.registry.require_mut(id)?.transient_for = parent;
        Ok(())
    }

    pub fn set_frame_borders(&mut self, id: WindowId, borders: FrameBorders) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        if window.borders != borders {
            window.borders = borders;
            window.frame_shape_dirty = true;
            self.queues.queue(id, QueueKinds::MOVE_RESIZE);
        }
        Ok(())
    }

    /// Replaces the struts reserved by `id` and re-places every window.
    pub fn set_struts(&mut self, id: WindowId, struts: Vec<Strut>) -> Result<(), WindowManagerError> {
        self.registry.require_mut(id)?.struts = struts;
        self.recompute_work_areas();
        for other in self.registry.ids_in_order() {
            self.queues.queue(other, QueueKinds::MOVE_RESIZE);
        }
        Ok(())
    }

    pub fn set_constraint_requirements(
        &mut self,
        id: WindowId,
        requirements: ConstraintRequirements,
    ) -> Result<(), WindowManagerError> {
        let window = self.registry.require_mut(id)?;
        window.base_requirements = requirements;
        window.requirements = requirements;
        self.queues.queue(id, QueueKinds::MOVE_RESIZE);
        Ok(())
    }

    /// Stores repaired hints and queues a geometry recompute.
    pub fn set_size_hints(&mut self, id: WindowId, hints: SizeHints) -> Result<(), WindowManagerError> {
        self.registry.require_mut(id)?.hints = hints.normalized();
        self.queues.queue(id, QueueKinds::MOVE_RESIZE);
        Ok(())
    }

    pub fn icon_changed(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        self.registry.require(id)?;
        self.queues.queue(id, QueueKinds::UPDATE_ICON);
        Ok(())
    }
}
