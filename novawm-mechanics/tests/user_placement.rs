// novawm-mechanics/tests/user_placement.rs

mod common;

use std::time::Instant;

use novawm_core::config::WindowPolicyConfig;
use novawm_core::types::{PointInt, RectInt, Side};
use novawm_mechanics::{
    ConstraintRequirements, GrabOp, ManageRequest, MaximizeDirections, Strut, WindowId, WindowManager,
};
use pretty_assertions::assert_eq;

const DRAGGED: RectInt = RectInt::from_coords(1800, 100, 400, 300);

fn manager() -> WindowManager {
    common::init_test_logging();
    WindowManager::new(WindowPolicyConfig::default(), vec![RectInt::from_coords(0, 0, 1920, 1080)]).unwrap()
}

fn drag(wm: &mut WindowManager, id: WindowId, from: PointInt, to: PointInt, now: Instant) {
    wm.begin_grab(id, GrabOp::Move, from, now).unwrap();
    wm.update_grab(id, to, now).unwrap();
    wm.end_grab(id).unwrap();
}

/// A window the user dragged halfway past the right edge.
fn dragged_window(wm: &mut WindowManager, now: Instant) -> WindowId {
    let id = wm.manage(ManageRequest::new("browser", RectInt::from_coords(1000, 100, 400, 300)), now).unwrap();
    wm.run_queued(now);
    drag(wm, id, PointInt::new(1100, 110), PointInt::new(1900, 110), now);
    assert_eq!(wm.window(id).unwrap().current_rect, DRAGGED);
    id
}

#[test]
fn dragging_off_screen_relaxes_onscreen_requirements() {
    let mut wm = manager();
    let now = Instant::now();
    let id = dragged_window(&mut wm, now);
    let requirements = wm.window(id).unwrap().requirements;
    assert!(!requirements.fully_onscreen);
    assert!(!requirements.single_monitor);
    assert!(requirements.titlebar_visible);

    drag(&mut wm, id, PointInt::new(1900, 110), PointInt::new(1100, 110), now);
    assert_eq!(wm.window(id).unwrap().current_rect, RectInt::from_coords(1000, 100, 400, 300));
    let window = wm.window(id).unwrap();
    assert_eq!(window.requirements, window.base_requirements);
    assert!(window.requirements.fully_onscreen);
}

#[test]
fn maximize_round_trip_keeps_user_placement() {
    let mut wm = manager();
    let now = Instant::now();
    let id = dragged_window(&mut wm, now);

    wm.maximize(id, MaximizeDirections::BOTH, now).unwrap();
    assert_eq!(wm.window(id).unwrap().current_rect, RectInt::from_coords(0, 0, 1920, 1080));
    wm.unmaximize(id, MaximizeDirections::BOTH, now).unwrap();
    assert_eq!(wm.window(id).unwrap().current_rect, DRAGGED);
}

#[test]
fn fullscreen_round_trip_keeps_user_placement() {
    let mut wm = manager();
    let now = Instant::now();
    let id = dragged_window(&mut wm, now);

    wm.fullscreen(id, None, now).unwrap();
    assert_eq!(wm.window(id).unwrap().current_rect, RectInt::from_coords(0, 0, 1920, 1080));
    wm.unfullscreen(id, now).unwrap();
    assert_eq!(wm.window(id).unwrap().current_rect, DRAGGED);
}

#[test]
fn unrelated_strut_change_keeps_user_placement() {
    let mut wm = manager();
    let now = Instant::now();
    let mut panel = ManageRequest::new("panel", RectInt::from_coords(0, 0, 1920, 32));
    panel.requirements = Some(ConstraintRequirements::NONE);
    let panel = wm.manage(panel, now).unwrap();
    let id = dragged_window(&mut wm, now);

    wm.set_struts(panel, vec![Strut::new(Side::Top, RectInt::from_coords(0, 0, 1920, 32))]).unwrap();
    wm.run_queued(now);
    assert_eq!(wm.work_areas().for_monitor(0), Some(RectInt::from_coords(0, 32, 1920, 1048)));
    assert_eq!(wm.window(id).unwrap().current_rect, DRAGGED);
}

#[test]
fn docks_never_gain_requirements_from_a_drag() {
    let mut wm = manager();
    let now = Instant::now();
    let mut dock = ManageRequest::new("dock", RectInt::from_coords(100, 100, 64, 400));
    dock.requirements = Some(ConstraintRequirements::NONE);
    let id = wm.manage(dock, now).unwrap();

    drag(&mut wm, id, PointInt::new(120, 120), PointInt::new(220, 120), now);
    assert_eq!(wm.window(id).unwrap().requirements, ConstraintRequirements::NONE);
}
