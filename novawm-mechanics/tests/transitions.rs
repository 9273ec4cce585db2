// novawm-mechanics/tests/transitions.rs

mod common;

use std::time::Instant;

use novawm_core::config::WindowPolicyConfig;
use novawm_core::types::{PointInt, RectInt};
use novawm_mechanics::{
    GrabOp, MaximizeAxis, MaximizeDirections, ManageRequest, Placement, ResizeEdge, TileMode, WindowId,
    WindowManager,
};
use proptest::prelude::*;

const LEFT: RectInt = RectInt::from_coords(0, 0, 1920, 1080);
const RIGHT: RectInt = RectInt::from_coords(1920, 0, 1280, 1024);

#[derive(Debug, Clone)]
enum Op {
    Maximize(u8),
    Unmaximize(u8),
    ToggleMaximize,
    Tile(u8),
    Fullscreen(bool),
    Unfullscreen,
    Minimize,
    Unminimize,
    Shade,
    Unshade,
    GrabMove(i32, i32),
    GrabResize(i32, i32),
    Resize(u32, u32),
    Monitors(bool),
    Workspace(u32),
}

fn directions(bits: u8) -> MaximizeDirections {
    match bits % 3 {
        0 => MaximizeDirections::HORIZONTAL,
        1 => MaximizeDirections::VERTICAL,
        _ => MaximizeDirections::BOTH,
    }
}

fn tile_mode(bits: u8) -> TileMode {
    match bits % 4 {
        0 => TileMode::Left,
        1 => TileMode::Right,
        2 => TileMode::Maximized,
        _ => TileMode::None,
    }
}

fn op() -> impl Strategy<Value = (usize, Op)> {
    let op = prop_oneof![
        any::<u8>().prop_map(Op::Maximize),
        any::<u8>().prop_map(Op::Unmaximize),
        Just(Op::ToggleMaximize),
        any::<u8>().prop_map(Op::Tile),
        any::<bool>().prop_map(Op::Fullscreen),
        Just(Op::Unfullscreen),
        Just(Op::Minimize),
        Just(Op::Unminimize),
        Just(Op::Shade),
        Just(Op::Unshade),
        (-400i32..400, -400i32..400).prop_map(|(dx, dy)| Op::GrabMove(dx, dy)),
        (-400i32..400, -400i32..400).prop_map(|(dx, dy)| Op::GrabResize(dx, dy)),
        (1u32..2500, 1u32..1500).prop_map(|(w, h)| Op::Resize(w, h)),
        any::<bool>().prop_map(Op::Monitors),
        (0u32..2).prop_map(Op::Workspace),
    ];
    (0usize..3, op)
}

fn apply(wm: &mut WindowManager, id: WindowId, op: Op, now: Instant) {
    // Rejected transitions are fine; they must just leave the window consistent.
    let _ = match op {
        Op::Maximize(bits) => wm.maximize(id, directions(bits), now).map(drop),
        Op::Unmaximize(bits) => wm.unmaximize(id, directions(bits), now).map(drop),
        Op::ToggleMaximize => wm.toggle_maximize(id, now).map(drop),
        Op::Tile(bits) => wm.tile(id, tile_mode(bits), now).map(drop),
        Op::Fullscreen(span) => {
            let monitors = (span && wm.topology().len() > 1).then(|| vec![0, 1]);
            wm.fullscreen(id, monitors, now).map(drop)
        }
        Op::Unfullscreen => wm.unfullscreen(id, now).map(drop),
        Op::Minimize => wm.minimize(id),
        Op::Unminimize => wm.unminimize(id),
        Op::Shade => wm.shade(id),
        Op::Unshade => wm.unshade(id),
        Op::GrabMove(dx, dy) => {
            let start = wm.window(id).unwrap().current_rect.center();
            wm.begin_grab(id, GrabOp::Move, start, now)
                .and_then(|_| wm.update_grab(id, PointInt::new(start.x + dx, start.y + dy), now).map(drop))
                .and_then(|_| wm.end_grab(id))
        }
        Op::GrabResize(dx, dy) => {
            let rect = wm.window(id).unwrap().current_rect;
            let start = PointInt::new(rect.right(), rect.bottom());
            wm.begin_grab(id, GrabOp::Resize(ResizeEdge::BottomRight), start, now)
                .and_then(|_| wm.update_grab(id, PointInt::new(start.x + dx, start.y + dy), now).map(drop))
                .and_then(|_| wm.end_grab(id))
        }
        Op::Resize(width, height) => {
            wm.client_geometry(id, novawm_mechanics::ClientGeometryRequest::resize(width, height), now).map(drop)
        }
        Op::Monitors(two) => {
            wm.monitors_changed(if two { vec![LEFT, RIGHT] } else { vec![LEFT] });
            Ok(())
        }
        Op::Workspace(n) => {
            wm.set_active_workspace(n);
            Ok(())
        }
    };
    wm.run_queued(now);
}

fn assert_invariants(wm: &WindowManager) {
    for window in wm.windows().iter() {
        assert!(window.state_is_consistent(), "inconsistent window: {:?}", window);
        match window.placement {
            Placement::TiledSide(_) => assert_eq!(window.placement.maximize_axis(), MaximizeAxis::Vertical),
            Placement::TiledMaximized => assert_eq!(window.placement.maximize_axis(), MaximizeAxis::Both),
            Placement::Maximized(d) => assert!(!d.is_empty()),
            Placement::Floating => assert_eq!(window.placement.tile_mode(), TileMode::None),
        }
        if let Some(other) = window.tile_match {
            let other = wm.window(other).expect("tile match names a managed window");
            assert_eq!(other.tile_match, Some(window.id));
        }
        if let Some(monitor) = window.monitor {
            assert!(monitor < wm.topology().len());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_transitions_keep_windows_consistent(ops in prop::collection::vec(op(), 1..40)) {
        common::init_test_logging();
        let mut wm = WindowManager::new(WindowPolicyConfig::default(), vec![LEFT, RIGHT]).unwrap();
        let now = Instant::now();
        let ids: Vec<WindowId> = [
            RectInt::from_coords(100, 100, 640, 480),
            RectInt::from_coords(900, 200, 500, 400),
            RectInt::from_coords(2100, 150, 700, 500),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, rect)| wm.manage(ManageRequest::new(format!("w{}", i), rect), now).unwrap())
        .collect();
        wm.run_queued(now);

        for (target, op) in ops {
            apply(&mut wm, ids[target], op, now);
            assert_invariants(&wm);
        }
    }

    #[test]
    fn maximize_round_trip_restores_geometry(
        x in 0i32..1000,
        y in 0i32..500,
        width in 100u32..900,
        height in 100u32..500,
        bits in any::<u8>(),
    ) {
        let mut wm = WindowManager::new(WindowPolicyConfig::default(), vec![LEFT]).unwrap();
        let now = Instant::now();
        let rect = RectInt::from_coords(x, y, width, height);
        let id = wm.manage(ManageRequest::new("w", rect), now).unwrap();

        let d = directions(bits);
        wm.maximize(id, d, now).unwrap();
        prop_assert_eq!(wm.window(id).unwrap().saved_rect, Some(rect));
        wm.unmaximize(id, d, now).unwrap();
        let window = wm.window(id).unwrap();
        prop_assert_eq!(window.current_rect, rect);
        prop_assert_eq!(window.placement, Placement::Floating);
        prop_assert_eq!(window.saved_rect, None);
    }

    #[test]
    fn fullscreen_round_trip_resumes_placement(
        x in 0i32..1000,
        y in 0i32..500,
        width in 100u32..900,
        height in 100u32..500,
        maximized in any::<bool>(),
    ) {
        let mut wm = WindowManager::new(WindowPolicyConfig::default(), vec![LEFT]).unwrap();
        let now = Instant::now();
        let rect = RectInt::from_coords(x, y, width, height);
        let id = wm.manage(ManageRequest::new("w", rect), now).unwrap();
        if maximized {
            wm.maximize(id, MaximizeDirections::BOTH, now).unwrap();
        }
        let before = wm.window(id).unwrap().current_rect;

        wm.fullscreen(id, None, now).unwrap();
        prop_assert_eq!(wm.window(id).unwrap().current_rect, LEFT);
        wm.unfullscreen(id, now).unwrap();

        let window = wm.window(id).unwrap();
        prop_assert_eq!(window.current_rect, before);
        prop_assert_eq!(window.saved_rect, maximized.then_some(rect));
    }
}

#[test]
fn tile_then_maximize_then_unmaximize_returns_to_floating() {
    let mut wm = WindowManager::new(WindowPolicyConfig::default(), vec![LEFT]).unwrap();
    let now = Instant::now();
    let rect = RectInt::from_coords(300, 200, 640, 480);
    let id = wm.manage(ManageRequest::new("w", rect), now).unwrap();

    wm.tile(id, TileMode::Right, now).unwrap();
    wm.maximize(id, MaximizeDirections::BOTH, now).unwrap();
    assert_eq!(wm.window(id).unwrap().placement, Placement::Maximized(MaximizeDirections::BOTH));
    assert_eq!(wm.window(id).unwrap().current_rect, LEFT);

    wm.unmaximize(id, MaximizeDirections::BOTH, now).unwrap();
    let window = wm.window(id).unwrap();
    assert_eq!(window.current_rect, rect);
    assert_eq!(window.saved_rect, None);
}
