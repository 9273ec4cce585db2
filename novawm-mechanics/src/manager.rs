// novawm-mechanics/src/manager.rs

use std::time::Instant;

use novawm_core::config::{ConfigLoader, CoreConfig, WindowPolicyConfig};
use novawm_core::types::{PointInt, RectInt};
use tracing::{debug, info, warn};

use crate::constraints::{ConstraintPipeline, ConstraintRequirements};
use crate::coordinator::MoveResizeFlags;
use crate::data_types::{FullscreenState, MapState, SyncState, WindowId, WorkspaceIndex};
use crate::error::WindowManagerError;
use crate::events::{ManageRequest, WindowEvent, WindowRequest};
use crate::monitor::{MonitorTopology, Strut, WorkAreas};
use crate::registry::WindowRegistry;
use crate::scheduler::{QueueKinds, RecomputeQueues};
use crate::window::Window;

/// Owns every managed window and resolves all state and geometry changes.
///
/// The manager is driven from a single event loop: requests go in through
/// [`WindowManager::handle_request`] (or the matching methods), deferred work
/// runs in [`WindowManager::run_queued`] and sync deadlines in
/// [`WindowManager::dispatch_timers`]. Results come out of
/// [`WindowManager::drain_events`].
#[derive(Debug)]
pub struct WindowManager {
    pub(crate) registry: WindowRegistry,
    pub(crate) topology: MonitorTopology,
    pub(crate) work_areas: WorkAreas,
    pub(crate) pipeline: ConstraintPipeline,
    pub(crate) policy: WindowPolicyConfig,
    pub(crate) queues: RecomputeQueues,
    pub(crate) events: Vec<WindowEvent>,
    pub(crate) active_workspace: WorkspaceIndex,
    next_sequence: u64,
}

impl WindowManager {
    /// Creates a manager for the given monitor rectangles.
    pub fn new(policy: WindowPolicyConfig, monitors: Vec<RectInt>) -> Result<Self, WindowManagerError> {
        ConfigLoader::validate_window_policy(&policy)?;
        let topology = MonitorTopology::new(monitors);
        let work_areas = WorkAreas::compute(&topology, std::iter::empty());
        info!("Initializing WindowManager with {} monitor(s).", topology.len());
        Ok(WindowManager {
            registry: WindowRegistry::new(),
            topology,
            work_areas,
            pipeline: ConstraintPipeline::standard(),
            policy,
            queues: RecomputeQueues::new(),
            events: Vec::new(),
            active_workspace: 0,
            next_sequence: 0,
        })
    }

    pub fn from_config(config: &CoreConfig, monitors: Vec<RectInt>) -> Result<Self, WindowManagerError> {
        Self::new(config.window_policy.clone(), monitors)
    }

    /// Starts managing a window.
    ///
    /// The window is registered only once its initial geometry passed the
    /// constraint pipeline; on failure nothing is left behind.
    pub fn manage(&mut self, request: ManageRequest, now: Instant) -> Result<WindowId, WindowManagerError> {
        if let Some(parent) = request.transient_for {
            self.registry.require(parent)?;
        }
        if self.topology.is_empty() {
            return Err(WindowManagerError::NoMonitor);
        }

        let id = WindowId::new_v4();
        let mut rect = request.rect;
        if let Some(parent) = request.transient_for.and_then(|p| self.registry.get(p)) {
            if !request.user_position {
                let center = parent.current_rect.center();
                rect = novawm_core::types::Gravity::Center.rect_at(center, rect.width(), rect.height());
                debug!("Centering transient {} on parent {}", id, parent.id);
            }
        }

        let mut window = Window::new(id, self.next_sequence, request.title.clone(), rect);
        self.next_sequence += 1;
        window.hints = request.hints.normalized();
        window.gravity = request.gravity;
        window.borders = request.borders;
        window.workspace = request.workspace;
        window.transient_for = request.transient_for;
        window.base_requirements = request
            .requirements
            .unwrap_or_else(|| ConstraintRequirements::from_policy(&self.policy));
        window.requirements = window.base_requirements;
        window.struts = request.struts.clone();
        window.map_state = if request.mapped { MapState::Mapped } else { MapState::Unmapped };
        // The compositor has seen nothing yet.
        window.buffer_rect = RectInt::default();
        self.registry.insert(window);
        if !request.struts.is_empty() {
            self.recompute_work_areas();
        }

        if let Err(err) = self.move_resize(id, rect, MoveResizeFlags::empty(), now) {
            warn!("Refusing to manage '{}': {}", request.title, err);
            self.registry.remove(id);
            if !request.struts.is_empty() {
                self.recompute_work_areas();
            }
            return Err(err);
        }
        if let Some(window) = self.registry.get_mut(id) {
            if request.sync_supported {
                window.sync = SyncState::Enabled;
            }
        }
        self.queues.queue(id, QueueKinds::CALC_SHOWING);
        if !request.struts.is_empty() {
            for other in self.registry.ids_in_order() {
                self.queues.queue(other, QueueKinds::MOVE_RESIZE);
            }
        }
        info!("Managing window {} ('{}')", id, request.title);
        Ok(id)
    }

    /// Stops managing a window and drops every reference to it.
    pub fn unmanage(&mut self, id: WindowId) -> Result<(), WindowManagerError> {
        let window = self.registry.remove(id).ok_or(WindowManagerError::UnknownWindow(id))?;
        self.queues.unqueue_all(id);
        for other in self.registry.iter_mut() {
            if other.transient_for == Some(id) {
                other.transient_for = None;
            }
        }
        if window.owns_struts() {
            self.recompute_work_areas();
            for other in self.registry.ids_in_order() {
                self.queues.queue(other, QueueKinds::MOVE_RESIZE);
            }
        }
        self.recompute_tile_matches();
        info!("Unmanaged window {} ('{}')", id, window.title);
        Ok(())
    }

    pub(crate) fn recompute_work_areas(&mut self) {
        let struts: Vec<Strut> = self.registry.iter().flat_map(|w| w.struts.iter().copied()).collect();
        self.work_areas = WorkAreas::compute(&self.topology, &struts);
    }

    /// Swaps in a new monitor layout and re-places every window.
    ///
    /// Windows keep a monitor with an identical rectangle; otherwise they move
    /// to the monitor nearest their centre. Saved rectangles are not touched.
    pub fn monitors_changed(&mut self, monitors: Vec<RectInt>) {
        let old = std::mem::replace(&mut self.topology, MonitorTopology::new(monitors));
        info!("Monitor layout changed: {} -> {} monitor(s)", old.len(), self.topology.len());
        self.recompute_work_areas();

        let remap = |index: usize| -> Option<usize> {
            let rect = old.get(index)?.rect;
            self.topology
                .index_of_rect(&rect)
                .or_else(|| self.topology.nearest_to(rect.center()).map(|m| m.index))
        };
        let mut updates = Vec::new();
        for window in self.registry.iter() {
            let monitor = window
                .monitor
                .and_then(|index| self.topology.index_of_rect(&old.get(index)?.rect))
                .or_else(|| self.topology.nearest_to(window.current_rect.center()).map(|m| m.index));
            let span = match &window.fullscreen {
                FullscreenState::Fullscreen { monitors: Some(list), .. } => {
                    let mut mapped: Vec<usize> = list.iter().filter_map(|i| remap(*i)).collect();
                    mapped.sort_unstable();
                    mapped.dedup();
                    Some(mapped)
                }
                _ => None,
            };
            updates.push((window.id, monitor, span));
        }
        for (id, monitor, span) in updates {
            let Some(window) = self.registry.get_mut(id) else {
                continue;
            };
            if window.monitor != monitor {
                debug!("Window {}: monitor {:?} -> {:?}", id, window.monitor, monitor);
            }
            window.monitor = monitor;
            if let (Some(mapped), FullscreenState::Fullscreen { monitors, .. }) = (span, &mut window.fullscreen) {
                *monitors = if mapped.is_empty() { None } else { Some(mapped) };
            }
            window.fullscreen_monitors = None;
            self.queues.queue(id, QueueKinds::MOVE_RESIZE);
        }
    }

    /// Dispatches one inbound request.
    pub fn handle_request(&mut self, request: WindowRequest, now: Instant) -> Result<(), WindowManagerError> {
        match request {
            WindowRequest::ClientGeometry { window, request } => self.client_geometry(window, request, now).map(drop),
            WindowRequest::AckSync { window, serial } => self.ack_sync(window, serial).map(drop),
            WindowRequest::SetSizeHints { window, hints } => self.set_size_hints(window, hints),
            WindowRequest::SetFullscreenMonitors { window, monitors } => {
                self.set_fullscreen_monitors(window, monitors, now)
            }
            WindowRequest::BeginGrab { window, op, pointer } => self.begin_grab(window, op, pointer, now),
            WindowRequest::UpdateGrab { window, pointer } => self.update_grab(window, pointer, now).map(drop),
            WindowRequest::EndGrab { window } => self.end_grab(window),
            WindowRequest::Maximize { window, directions } => self.maximize(window, directions, now).map(drop),
            WindowRequest::Unmaximize { window, directions } => self.unmaximize(window, directions, now).map(drop),
            WindowRequest::ToggleMaximize { window } => self.toggle_maximize(window, now).map(drop),
            WindowRequest::Tile { window, mode } => self.tile(window, mode, now).map(drop),
            WindowRequest::Fullscreen { window, monitors } => self.fullscreen(window, monitors, now).map(drop),
            WindowRequest::Unfullscreen { window } => self.unfullscreen(window, now).map(drop),
            WindowRequest::ToggleFullscreen { window } => self.toggle_fullscreen(window, now).map(drop),
            WindowRequest::Minimize { window } => self.minimize(window),
            WindowRequest::Unminimize { window } => self.unminimize(window),
            WindowRequest::Shade { window } => self.shade(window),
            WindowRequest::Unshade { window } => self.unshade(window),
            WindowRequest::Map { window } => self.map(window),
            WindowRequest::Unmap { window } => self.unmap(window),
            WindowRequest::Stick { window } => self.stick(window),
            WindowRequest::Unstick { window } => self.unstick(window),
            WindowRequest::SetUrgent { window, urgent } => self.set_urgent(window, urgent),
            WindowRequest::Focus { window } => self.focus(window),
            WindowRequest::SetWorkspace { window, workspace } => self.set_workspace(window, workspace),
            WindowRequest::SetActiveWorkspace { workspace } => {
                self.set_active_workspace(workspace);
                Ok(())
            }
            WindowRequest::SetTransientFor { window, parent } => self.set_transient_for(window, parent),
            WindowRequest::SetFrameBorders { window, borders } => self.set_frame_borders(window, borders),
            WindowRequest::SetStruts { window, struts } => self.set_struts(window, struts),
            WindowRequest::SetConstraintRequirements { window, requirements } => {
                self.set_constraint_requirements(window, requirements)
            }
            WindowRequest::IconChanged { window } => self.icon_changed(window),
            WindowRequest::MonitorsChanged { monitors } => {
                self.monitors_changed(monitors);
                Ok(())
            }
        }
    }

    /// Takes every event produced since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.registry.get(id)
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn topology(&self) -> &MonitorTopology {
        &self.topology
    }

    pub fn work_areas(&self) -> &WorkAreas {
        &self.work_areas
    }

    pub fn policy(&self) -> &WindowPolicyConfig {
        &self.policy
    }

    pub fn active_workspace(&self) -> WorkspaceIndex {
        self.active_workspace
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.registry.iter().find(|w| w.focused).map(|w| w.id)
    }

    /// The topmost-created showing window containing `point`.
    pub fn window_at(&self, point: PointInt) -> Option<WindowId> {
        self.registry
            .iter()
            .filter(|w| w.showing && w.current_rect.contains_point(point))
            .max_by_key(|w| w.stable_sequence)
            .map(|w| w.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novawm_core::types::Side;
    use pretty_assertions::assert_eq;

    fn manager() -> WindowManager {
        WindowManager::new(WindowPolicyConfig::default(), vec![RectInt::from_coords(0, 0, 1920, 1080)]).unwrap()
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let policy = WindowPolicyConfig { tile_split_ratio: 1.5, ..WindowPolicyConfig::default() };
        assert!(matches!(
            WindowManager::new(policy, vec![]),
            Err(WindowManagerError::Core(_))
        ));
    }

    #[test]
    fn manage_without_monitors_fails_cleanly() {
        let mut wm = WindowManager::new(WindowPolicyConfig::default(), vec![]).unwrap();
        let result = wm.manage(ManageRequest::new("lonely", RectInt::from_coords(0, 0, 10, 10)), Instant::now());
        assert!(matches!(result, Err(WindowManagerError::NoMonitor)));
        assert!(wm.windows().is_empty());
    }

    #[test]
    fn manage_announces_geometry_and_visibility() {
        let mut wm = manager();
        let now = Instant::now();
        let id = wm.manage(ManageRequest::new("term", RectInt::from_coords(1800, 1000, 400, 300)), now).unwrap();
        let expected = RectInt::from_coords(1520, 780, 400, 300);
        assert_eq!(wm.window(id).unwrap().current_rect, expected);
        assert_eq!(wm.window(id).unwrap().monitor, Some(0));

        wm.run_queued(now);
        let events = wm.drain_events();
        assert!(events.contains(&WindowEvent::GeometryCommitted {
            window: id,
            old: RectInt::default(),
            new: expected,
            result: crate::coordinator::MoveResizeResult::MOVED | crate::coordinator::MoveResizeResult::RESIZED,
        }));
        assert!(events.contains(&WindowEvent::VisibilityChanged { window: id, visible: true }));
        assert_eq!(wm.window_at(PointInt::new(1600, 800)), Some(id));
    }

    #[test]
    fn transient_is_centred_on_parent() {
        let mut wm = manager();
        let now = Instant::now();
        let parent = wm.manage(ManageRequest::new("app", RectInt::from_coords(100, 100, 800, 600)), now).unwrap();
        let mut dialog = ManageRequest::new("dialog", RectInt::from_coords(0, 0, 200, 100));
        dialog.transient_for = Some(parent);
        let child = wm.manage(dialog, now).unwrap();
        assert_eq!(wm.window(child).unwrap().current_rect, RectInt::from_coords(400, 350, 200, 100));

        wm.unmanage(parent).unwrap();
        assert_eq!(wm.window(child).unwrap().transient_for, None);
        assert!(matches!(wm.unmanage(parent), Err(WindowManagerError::UnknownWindow(_))));
    }

    #[test]
    fn workspace_switch_hides_and_shows() {
        let mut wm = manager();
        let now = Instant::now();
        let a = wm.manage(ManageRequest::new("a", RectInt::from_coords(0, 0, 100, 100)), now).unwrap();
        let mut on_one = ManageRequest::new("b", RectInt::from_coords(0, 0, 100, 100));
        on_one.workspace = 1;
        let b = wm.manage(on_one, now).unwrap();
        wm.run_queued(now);
        wm.drain_events();

        wm.handle_request(WindowRequest::SetActiveWorkspace { workspace: 1 }, now).unwrap();
        wm.handle_request(WindowRequest::SetActiveWorkspace { workspace: 1 }, now).unwrap();
        wm.run_queued(now);
        let events = wm.drain_events();
        assert_eq!(
            events,
            vec![
                WindowEvent::VisibilityChanged { window: a, visible: false },
                WindowEvent::VisibilityChanged { window: b, visible: true },
            ]
        );
    }

    #[test]
    fn dock_struts_shrink_work_area_and_release_on_unmanage() {
        let mut wm = manager();
        let now = Instant::now();
        let mut panel = ManageRequest::new("panel", RectInt::from_coords(0, 0, 1920, 32));
        panel.struts = vec![Strut::new(Side::Top, RectInt::from_coords(0, 0, 1920, 32))];
        panel.requirements = Some(ConstraintRequirements::NONE);
        let dock = wm.manage(panel, now).unwrap();
        assert_eq!(wm.work_areas().for_monitor(0), Some(RectInt::from_coords(0, 32, 1920, 1048)));
        assert_eq!(wm.window(dock).unwrap().current_rect, RectInt::from_coords(0, 0, 1920, 32));

        let app = wm.manage(ManageRequest::new("app", RectInt::from_coords(50, 10, 300, 200)), now).unwrap();
        assert_eq!(wm.window(app).unwrap().current_rect, RectInt::from_coords(50, 32, 300, 200));

        wm.unmanage(dock).unwrap();
        assert_eq!(wm.work_areas().for_monitor(0), Some(RectInt::from_coords(0, 0, 1920, 1080)));
    }
}
