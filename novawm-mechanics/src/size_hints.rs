// novawm-mechanics/src/size_hints.rs

//! Size hints and the size-hint resolver.
//!
//! [`SizeHints::resolve`] maps any candidate size to the nearest size that
//! respects the limits, the base + k·increment grid on each axis and, when
//! declared, the aspect-ratio bounds. It is total, pure and idempotent.
//!
//! Priorities when the hints contradict each other:
//! - `min` beats `max` (a malformed `max < min` is repaired to `max = min`);
//! - limits beat increments: when no grid size lies within the limits the
//!   minimum is used as is;
//! - limits and increments beat aspect: an aspect correction is only accepted
//!   if the corrected size is itself a resolved size.

use novawm_core::types::{RectInt, SizeInt};
use serde::{Deserialize, Serialize};

/// Largest extent a hint may declare; keeps every edge representable as `i32`.
pub const UNLIMITED: u32 = i32::MAX as u32;

/// Width-to-height ratio `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl AspectRatio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        AspectRatio { numerator, denominator }
    }

    /// `width / height >= self`.
    fn at_most(&self, size: SizeInt) -> bool {
        u64::from(size.width) * u64::from(self.denominator)
            >= u64::from(self.numerator) * u64::from(size.height)
    }

    /// `width / height <= self`.
    fn at_least(&self, size: SizeInt) -> bool {
        u64::from(size.width) * u64::from(self.denominator)
            <= u64::from(self.numerator) * u64::from(size.height)
    }

    /// Largest height keeping `width / height >= self`.
    fn height_for_min(&self, width: u32) -> u64 {
        u64::from(width) * u64::from(self.denominator) / u64::from(self.numerator)
    }

    /// Smallest width keeping `width / height >= self`.
    fn width_for_min(&self, height: u32) -> u64 {
        div_ceil(u64::from(self.numerator) * u64::from(height), u64::from(self.denominator))
    }

    /// Largest width keeping `width / height <= self`.
    fn width_for_max(&self, height: u32) -> u64 {
        u64::from(self.numerator) * u64::from(height) / u64::from(self.denominator)
    }

    /// Smallest height keeping `width / height <= self`.
    fn height_for_max(&self, width: u32) -> u64 {
        div_ceil(u64::from(width) * u64::from(self.denominator), u64::from(self.numerator))
    }

    fn cmp_value(&self, other: &AspectRatio) -> std::cmp::Ordering {
        (u64::from(self.numerator) * u64::from(other.denominator))
            .cmp(&(u64::from(other.numerator) * u64::from(self.denominator)))
    }
}

fn div_ceil(a: u64, b: u64) -> u64 {
    (a + b - 1) / b
}

fn to_extent(value: u64) -> u32 {
    value.min(u64::from(UNLIMITED)) as u32
}

/// Geometry constraints declared by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeHints {
    pub min: SizeInt,
    pub max: SizeInt,
    pub base: SizeInt,
    pub increment: SizeInt,
    pub min_aspect: Option<AspectRatio>,
    pub max_aspect: Option<AspectRatio>,
}

impl Default for SizeHints {
    /// Unconstrained hints.
    fn default() -> Self {
        SizeHints {
            min: SizeInt::new(1, 1),
            max: SizeInt::new(UNLIMITED, UNLIMITED),
            base: SizeInt::new(0, 0),
            increment: SizeInt::new(1, 1),
            min_aspect: None,
            max_aspect: None,
        }
    }
}

/// One axis of the hints.
#[derive(Debug, Clone, Copy)]
struct AxisHints {
    min: u32,
    max: u32,
    base: u32,
    increment: u32,
}

impl AxisHints {
    /// Upper bound honouring "min wins".
    fn upper(&self) -> u32 {
        self.max.max(self.min)
    }

    fn increment(&self) -> u64 {
        u64::from(self.increment.max(1))
    }

    /// Largest grid size `<= value`, if any.
    fn snap_down(&self, value: u32) -> Option<u32> {
        if value < self.base {
            return None;
        }
        let inc = self.increment();
        let steps = (u64::from(value) - u64::from(self.base)) / inc;
        Some(to_extent(u64::from(self.base) + steps * inc))
    }

    /// Smallest grid size `>= value`.
    fn snap_up(&self, value: u32) -> u64 {
        if value <= self.base {
            return u64::from(self.base);
        }
        let inc = self.increment();
        let steps = div_ceil(u64::from(value) - u64::from(self.base), inc);
        u64::from(self.base) + steps * inc
    }

    /// Limits first, then the grid, rounding down on ties.
    fn constrain(&self, value: u32) -> u32 {
        let lo = self.min;
        let hi = self.upper();
        let clamped = value.clamp(lo, hi);
        if let Some(down) = self.snap_down(clamped) {
            if down >= lo {
                return down;
            }
        }
        let up = self.snap_up(clamped);
        if up <= u64::from(hi) {
            return up as u32;
        }
        lo
    }

    fn clamp_limits(&self, value: u32) -> u32 {
        value.clamp(self.min, self.upper())
    }
}

impl SizeHints {
    /// Hints with only the size limits set.
    pub fn with_limits(min: SizeInt, max: SizeInt) -> Self {
        SizeHints { min, max, ..SizeHints::default() }
    }

    fn horizontal(&self) -> AxisHints {
        AxisHints {
            min: self.min.width,
            max: self.max.width,
            base: self.base.width,
            increment: self.increment.width,
        }
    }

    fn vertical(&self) -> AxisHints {
        AxisHints {
            min: self.min.height,
            max: self.max.height,
            base: self.base.height,
            increment: self.increment.height,
        }
    }

    /// Repairs malformed hints.
    ///
    /// Increments and minimums below one become one, `max < min` becomes
    /// `max = min`, aspect terms of zero drop the bound, and inverted aspect
    /// bounds drop both.
    pub fn normalized(&self) -> SizeHints {
        let mut hints = *self;
        hints.increment.width = hints.increment.width.max(1);
        hints.increment.height = hints.increment.height.max(1);
        hints.min.width = hints.min.width.clamp(1, UNLIMITED);
        hints.min.height = hints.min.height.clamp(1, UNLIMITED);
        hints.max.width = hints.max.width.min(UNLIMITED).max(hints.min.width);
        hints.max.height = hints.max.height.min(UNLIMITED).max(hints.min.height);
        hints.base.width = hints.base.width.min(UNLIMITED);
        hints.base.height = hints.base.height.min(UNLIMITED);

        let (min_aspect, max_aspect) = hints.usable_aspects();
        hints.min_aspect = min_aspect;
        hints.max_aspect = max_aspect;
        if let (Some(lo), Some(hi)) = (hints.min_aspect, hints.max_aspect) {
            if lo.cmp_value(&hi) == std::cmp::Ordering::Greater {
                hints.min_aspect = None;
                hints.max_aspect = None;
            }
        }

        if hints != *self {
            tracing::debug!("Repaired malformed size hints {:?} -> {:?}", self, hints);
        }
        hints
    }

    /// Applies limits and increments, each axis independently.
    pub fn constrain_size(&self, size: SizeInt) -> SizeInt {
        SizeInt::new(
            self.horizontal().constrain(size.width),
            self.vertical().constrain(size.height),
        )
    }

    /// Applies only the min/max limits, ignoring increments.
    pub fn clamp_limits(&self, size: SizeInt) -> SizeInt {
        SizeInt::new(
            self.horizontal().clamp_limits(size.width),
            self.vertical().clamp_limits(size.height),
        )
    }

    fn usable_aspects(&self) -> (Option<AspectRatio>, Option<AspectRatio>) {
        let usable = |a: Option<AspectRatio>| a.filter(|r| r.numerator > 0 && r.denominator > 0);
        (usable(self.min_aspect), usable(self.max_aspect))
    }

    fn aspect_ok(&self, size: SizeInt) -> bool {
        let (min_aspect, max_aspect) = self.usable_aspects();
        min_aspect.map_or(true, |a| a.at_most(size)) && max_aspect.map_or(true, |a| a.at_least(size))
    }

    /// A size is acceptable for an aspect correction only if it is already a
    /// fixed point of [`Self::constrain_size`] and satisfies both bounds.
    fn accept(&self, candidate: SizeInt) -> bool {
        self.constrain_size(candidate) == candidate && self.aspect_ok(candidate)
    }

    /// Applies the aspect-ratio bounds.
    ///
    /// Too tall: shrink the height, else grow the width. Too wide: shrink the
    /// width, else grow the height. Shrinking rounds down to the grid, growing
    /// rounds up. When neither correction is acceptable the size is returned
    /// unchanged.
    pub fn constrain_aspect(&self, size: SizeInt) -> SizeInt {
        if self.aspect_ok(size) || size.height == 0 {
            return size;
        }
        let h_axis = self.horizontal();
        let v_axis = self.vertical();
        let (min_aspect, max_aspect) = self.usable_aspects();

        let mut candidates: Vec<SizeInt> = Vec::with_capacity(2);
        if let Some(min_aspect) = min_aspect.filter(|a| !a.at_most(size)) {
            if let Some(h) = v_axis.snap_down(to_extent(min_aspect.height_for_min(size.width))) {
                candidates.push(SizeInt::new(size.width, h));
            }
            let w = h_axis.snap_up(to_extent(min_aspect.width_for_min(size.height)));
            candidates.push(SizeInt::new(to_extent(w), size.height));
        } else if let Some(max_aspect) = max_aspect.filter(|a| !a.at_least(size)) {
            if let Some(w) = h_axis.snap_down(to_extent(max_aspect.width_for_max(size.height))) {
                candidates.push(SizeInt::new(w, size.height));
            }
            let h = v_axis.snap_up(to_extent(max_aspect.height_for_max(size.width)));
            candidates.push(SizeInt::new(size.width, to_extent(h)));
        }

        candidates
            .into_iter()
            .find(|c| self.accept(*c))
            .unwrap_or(size)
    }

    /// Full resolution: limits and increments, then aspect.
    pub fn resolve(&self, size: SizeInt) -> SizeInt {
        self.constrain_aspect(self.constrain_size(size))
    }

    pub fn is_fixed_size(&self) -> bool {
        !self.allows_horizontal_resize() && !self.allows_vertical_resize()
    }

    pub fn allows_horizontal_resize(&self) -> bool {
        self.min.width < self.max.width
    }

    pub fn allows_vertical_resize(&self) -> bool {
        self.min.height < self.max.height
    }

    /// Width of the left half of `work_area` under `split_ratio`.
    pub fn left_tile_width(work_area: &RectInt, split_ratio: f64) -> u32 {
        let width = (f64::from(work_area.width()) * split_ratio).round();
        (width.max(0.0) as u32).min(work_area.width())
    }

    /// Whether the window's minimum size fits either half of a side-by-side
    /// tiling of `work_area`.
    pub fn can_tile_side_by_side(&self, work_area: &RectInt, split_ratio: f64) -> bool {
        let left = Self::left_tile_width(work_area, split_ratio);
        let narrowest = left.min(work_area.width() - left);
        self.min.width <= narrowest && self.min.height <= work_area.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn grid_hints() -> SizeHints {
        SizeHints {
            min: SizeInt::new(100, 100),
            max: SizeInt::new(800, 600),
            base: SizeInt::new(0, 0),
            increment: SizeInt::new(10, 10),
            ..SizeHints::default()
        }
    }

    #[rstest]
    #[case(SizeInt::new(253, 187), SizeInt::new(250, 180))]
    #[case(SizeInt::new(50, 2000), SizeInt::new(100, 600))]
    #[case(SizeInt::new(799, 599), SizeInt::new(790, 590))]
    #[case(SizeInt::new(0, 0), SizeInt::new(100, 100))]
    fn constrain_size_with_grid(#[case] input: SizeInt, #[case] expected: SizeInt) {
        assert_eq!(grid_hints().resolve(input), expected);
    }

    #[test]
    fn base_offsets_the_grid() {
        let hints = SizeHints {
            min: SizeInt::new(20, 20),
            base: SizeInt::new(4, 6),
            increment: SizeInt::new(8, 16),
            ..SizeHints::default()
        };
        // 4 + 8k <= 101 -> 100; 6 + 16k <= 101 -> 86
        assert_eq!(hints.resolve(SizeInt::new(101, 101)), SizeInt::new(100, 86));
        // Clamped to 20: 4 + 8*2 is on the grid, 6 + 16*0 is below min so it snaps up to 22
        assert_eq!(hints.resolve(SizeInt::new(1, 1)), SizeInt::new(20, 22));
    }

    #[test]
    fn min_wins_over_max() {
        let hints = SizeHints::with_limits(SizeInt::new(300, 300), SizeInt::new(200, 200));
        assert_eq!(hints.resolve(SizeInt::new(1000, 10)), SizeInt::new(300, 300));
        let normalized = hints.normalized();
        assert_eq!(normalized.max, SizeInt::new(300, 300));
        assert!(normalized.is_fixed_size());
    }

    #[test]
    fn grid_unsatisfiable_falls_back_to_min() {
        let hints = SizeHints {
            min: SizeInt::new(105, 105),
            max: SizeInt::new(109, 109),
            increment: SizeInt::new(10, 10),
            ..SizeHints::default()
        };
        assert_eq!(hints.resolve(SizeInt::new(107, 200)), SizeInt::new(105, 105));
    }

    #[test]
    fn normalized_repairs_bad_values() {
        let hints = SizeHints {
            min: SizeInt::new(0, 0),
            increment: SizeInt::new(0, 0),
            min_aspect: Some(AspectRatio::new(2, 1)),
            max_aspect: Some(AspectRatio::new(1, 1)),
            ..SizeHints::default()
        }
        .normalized();
        assert_eq!(hints.min, SizeInt::new(1, 1));
        assert_eq!(hints.increment, SizeInt::new(1, 1));
        assert_eq!(hints.min_aspect, None);
        assert_eq!(hints.max_aspect, None);

        let zero = SizeHints { max_aspect: Some(AspectRatio::new(0, 3)), ..SizeHints::default() }.normalized();
        assert_eq!(zero.max_aspect, None);
    }

    #[test]
    fn aspect_too_tall_shrinks_height() {
        let hints = SizeHints { min_aspect: Some(AspectRatio::new(1, 1)), ..SizeHints::default() };
        assert_eq!(hints.resolve(SizeInt::new(400, 600)), SizeInt::new(400, 400));
    }

    #[test]
    fn aspect_too_wide_shrinks_width() {
        let hints = SizeHints { max_aspect: Some(AspectRatio::new(16, 9)), ..SizeHints::default() };
        assert_eq!(hints.resolve(SizeInt::new(2000, 900)), SizeInt::new(1600, 900));
    }

    #[test]
    fn aspect_grows_when_shrinking_violates_min() {
        let hints = SizeHints {
            min: SizeInt::new(1, 500),
            min_aspect: Some(AspectRatio::new(1, 1)),
            ..SizeHints::default()
        };
        // Shrinking the height to 400 would break min height, so the width grows.
        assert_eq!(hints.resolve(SizeInt::new(400, 600)), SizeInt::new(600, 600));
    }

    #[test]
    fn aspect_yields_to_limits() {
        let hints = SizeHints {
            min: SizeInt::new(1, 500),
            max: SizeInt::new(450, UNLIMITED),
            min_aspect: Some(AspectRatio::new(1, 1)),
            ..SizeHints::default()
        };
        assert_eq!(hints.resolve(SizeInt::new(400, 600)), SizeInt::new(400, 600));
    }

    #[test]
    fn resize_capabilities() {
        let hints = SizeHints::with_limits(SizeInt::new(100, 50), SizeInt::new(100, 400));
        assert!(!hints.allows_horizontal_resize());
        assert!(hints.allows_vertical_resize());
        assert!(!hints.is_fixed_size());
    }

    #[test]
    fn tiling_requires_min_width_to_fit_half() {
        let area = RectInt::from_coords(0, 0, 1920, 1080);
        assert_eq!(SizeHints::left_tile_width(&area, 0.5), 960);
        assert!(SizeHints::with_limits(SizeInt::new(900, 100), SizeInt::new(UNLIMITED, UNLIMITED))
            .can_tile_side_by_side(&area, 0.5));
        assert!(!SizeHints::with_limits(SizeInt::new(961, 100), SizeInt::new(UNLIMITED, UNLIMITED))
            .can_tile_side_by_side(&area, 0.5));
        assert!(!SizeHints::with_limits(SizeInt::new(800, 100), SizeInt::new(UNLIMITED, UNLIMITED))
            .can_tile_side_by_side(&area, 0.6));
    }

    fn any_hints() -> impl Strategy<Value = SizeHints> {
        (
            (0u32..400, 0u32..400),
            (0u32..2000, 0u32..2000),
            (0u32..50, 0u32..50),
            (0u32..40, 0u32..40),
            prop::option::of((0u32..20, 0u32..20)),
            prop::option::of((0u32..20, 0u32..20)),
        )
            .prop_map(|(min, max, base, inc, lo, hi)| {
                SizeHints {
                    min: SizeInt::new(min.0, min.1),
                    max: SizeInt::new(max.0, max.1),
                    base: SizeInt::new(base.0, base.1),
                    increment: SizeInt::new(inc.0, inc.1),
                    min_aspect: lo.map(|(n, d)| AspectRatio::new(n, d)),
                    max_aspect: hi.map(|(n, d)| AspectRatio::new(n, d)),
                }
                .normalized()
            })
    }

    proptest! {
        #[test]
        fn resolve_is_idempotent(hints in any_hints(), w in 0u32..3000, h in 0u32..3000) {
            let once = hints.resolve(SizeInt::new(w, h));
            prop_assert_eq!(hints.resolve(once), once);
        }

        #[test]
        fn resolve_stays_within_limits(hints in any_hints(), w in 0u32..3000, h in 0u32..3000) {
            let size = hints.resolve(SizeInt::new(w, h));
            prop_assert!(size.width >= hints.min.width && size.width <= hints.max.width);
            prop_assert!(size.height >= hints.min.height && size.height <= hints.max.height);
        }
    }
}
