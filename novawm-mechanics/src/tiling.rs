// novawm-mechanics/src/tiling.rs

//! Side-by-side tiling: tile rectangles and tile matches.

use std::collections::HashMap;

use novawm_core::types::RectInt;
use tracing::trace;

use crate::data_types::{Placement, TileSide, WindowId};
use crate::manager::WindowManager;
use crate::size_hints::SizeHints;

/// The half of `work_area` a `side` tile occupies.
pub fn tile_rect(work_area: &RectInt, side: TileSide, split_ratio: f64) -> RectInt {
    let left_width = SizeHints::left_tile_width(work_area, split_ratio);
    match side {
        TileSide::Left => RectInt::from_coords(work_area.x(), work_area.y(), left_width, work_area.height()),
        TileSide::Right => RectInt::from_coords(
            work_area.x().saturating_add(i32::try_from(left_width).unwrap_or(i32::MAX)),
            work_area.y(),
            work_area.width() - left_width,
            work_area.height(),
        ),
    }
}

fn within(a: i64, b: i64, tolerance: i64) -> bool {
    (a - b).abs() <= tolerance
}

/// Whether `candidate` sits where the complement of `expected` should be.
fn matches_rect(candidate: &RectInt, expected: &RectInt, tolerance: u32) -> bool {
    let t = i64::from(tolerance);
    within(i64::from(candidate.x()), i64::from(expected.x()), t)
        && within(i64::from(candidate.y()), i64::from(expected.y()), t)
        && within(i64::from(candidate.width()), i64::from(expected.width()), t)
        && within(i64::from(candidate.height()), i64::from(expected.height()), t)
}

impl WindowManager {
    /// Re-derives every window's tile match from current geometry.
    ///
    /// A side-tiled window matches the earliest-created visible window tiled to
    /// the other side of the same monitor and workspace whose rectangle is
    /// within tolerance of the complementary half. Only mutual matches are kept.
    pub(crate) fn recompute_tile_matches(&mut self) {
        let tolerance = self.policy.tile_match_tolerance;
        let ratio = self.policy.tile_split_ratio;

        let mut candidates: Vec<(WindowId, u64, TileSide, usize, u32, RectInt)> = self
            .registry
            .iter()
            .filter(|w| w.is_mapped() && !w.is_minimized() && !w.is_fullscreen())
            .filter_map(|w| match (w.placement, w.monitor) {
                (Placement::TiledSide(side), Some(monitor)) => {
                    Some((w.id, w.stable_sequence, side, monitor, w.workspace, w.current_rect))
                }
                _ => None,
            })
            .collect();
        candidates.sort_by_key(|c| c.1);

        let mut preferred: HashMap<WindowId, WindowId> = HashMap::new();
        for (id, _, side, monitor, workspace, _) in &candidates {
            let Some(area) = self.work_areas.for_monitor(*monitor) else {
                continue;
            };
            let expected = tile_rect(&area, side.complement(), ratio);
            let found = candidates.iter().find(|(other, _, other_side, other_monitor, other_ws, rect)| {
                other != id
                    && *other_side == side.complement()
                    && other_monitor == monitor
                    && other_ws == workspace
                    && matches_rect(rect, &expected, tolerance)
            });
            if let Some((other, ..)) = found {
                preferred.insert(*id, *other);
            }
        }

        for window in self.registry.iter_mut() {
            let matched = preferred
                .get(&window.id)
                .copied()
                .filter(|other| preferred.get(other) == Some(&window.id));
            if window.tile_match != matched {
                trace!("Window {}: tile match {:?} -> {:?}", window.id, window.tile_match, matched);
                window.tile_match = matched;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.5, RectInt::from_coords(0, 0, 960, 1080), RectInt::from_coords(960, 0, 960, 1080))]
    #[case(0.25, RectInt::from_coords(0, 0, 480, 1080), RectInt::from_coords(480, 0, 1440, 1080))]
    fn tiles_split_work_area(#[case] ratio: f64, #[case] left: RectInt, #[case] right: RectInt) {
        let area = RectInt::from_coords(0, 0, 1920, 1080);
        assert_eq!(tile_rect(&area, TileSide::Left, ratio), left);
        assert_eq!(tile_rect(&area, TileSide::Right, ratio), right);
    }

    #[test]
    fn odd_widths_cover_the_whole_area() {
        let area = RectInt::from_coords(100, 40, 1367, 700);
        let left = tile_rect(&area, TileSide::Left, 0.5);
        let right = tile_rect(&area, TileSide::Right, 0.5);
        assert_eq!(left.right(), right.left());
        assert_eq!(left.width() + right.width(), area.width());
        assert_eq!(right.right(), area.right());
    }

    #[test]
    fn tolerance_applies_per_component() {
        let expected = RectInt::from_coords(960, 0, 960, 1080);
        assert!(matches_rect(&RectInt::from_coords(955, 3, 965, 1070), &expected, 10));
        assert!(!matches_rect(&RectInt::from_coords(940, 0, 960, 1080), &expected, 10));
    }
}
