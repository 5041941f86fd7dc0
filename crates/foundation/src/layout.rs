//! Deterministic placement of N markers along a curve or axis.
//!
//! All functions here are pure: same inputs, same outputs, no randomness.
//! Angles are in degrees, measured clockwise on screen from +x (SVG space,
//! y down). Out-of-range indices are clamped to the last slot and `total = 0`
//! behaves like `total = 1`, so callers never divide by zero.

use crate::math::Vec2;

/// Circles start at 12 o'clock.
pub const CIRCLE_START_DEG: f64 = -90.0;

fn clamp_slot(index: usize, total: usize) -> (usize, usize) {
    let total = total.max(1);
    (index.min(total - 1), total)
}

/// Angular distance between consecutive arc slots. Both ends of the arc are
/// occupied, so `total` slots span `total - 1` steps.
pub fn arc_step_deg(total: usize, start_deg: f64, end_deg: f64) -> f64 {
    if total <= 1 {
        0.0
    } else {
        (end_deg - start_deg) / (total - 1) as f64
    }
}

pub fn arc_angle_deg(index: usize, total: usize, start_deg: f64, end_deg: f64) -> f64 {
    let (index, total) = clamp_slot(index, total);
    start_deg + arc_step_deg(total, start_deg, end_deg) * index as f64
}

/// Position of slot `index` of `total` spread evenly from `start_deg` to `end_deg`.
///
/// A zero-span arc (`start_deg == end_deg`) stacks every slot on one point.
pub fn place_on_arc(
    index: usize,
    total: usize,
    start_deg: f64,
    end_deg: f64,
    radius: f64,
    center: Vec2,
) -> Vec2 {
    let angle = arc_angle_deg(index, total, start_deg, end_deg);
    center + Vec2::from_polar(radius, angle.to_radians())
}

/// Angle of slot `index` when `total` slots share a full turn.
pub fn circle_angle_deg(index: usize, total: usize) -> f64 {
    let (index, total) = clamp_slot(index, total);
    CIRCLE_START_DEG + 360.0 * index as f64 / total as f64
}

pub fn place_on_circle(index: usize, total: usize, radius: f64, center: Vec2) -> Vec2 {
    center + Vec2::from_polar(radius, circle_angle_deg(index, total).to_radians())
}

/// Slot `index` of `total` on the segment `from..=to`; a single slot sits at `from`.
pub fn place_on_line(index: usize, total: usize, from: Vec2, to: Vec2) -> Vec2 {
    let (index, total) = clamp_slot(index, total);
    if total == 1 {
        return from;
    }
    from.lerp(to, index as f64 / (total - 1) as f64)
}

/// Maps `value` from `domain` onto `range` linearly (no clamping).
///
/// A degenerate domain maps everything to `range.0`.
pub fn linear_scale(value: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    let span = domain.1 - domain.0;
    if span == 0.0 || !span.is_finite() {
        return range.0;
    }
    range.0 + (value - domain.0) / span * (range.1 - range.0)
}

/// Bar length for `value` relative to `max_value`, clamped to `[0, max_px]`.
pub fn scale_to_px(value: f64, max_value: f64, max_px: f64) -> f64 {
    if !(max_value > 0.0) || !value.is_finite() {
        return 0.0;
    }
    (value / max_value).clamp(0.0, 1.0) * max_px
}

pub fn percent_to_px(percent: f64, max_px: f64) -> f64 {
    scale_to_px(percent, 100.0, max_px)
}

#[cfg(test)]
mod tests {
    use super::{
        arc_step_deg, circle_angle_deg, linear_scale, percent_to_px, place_on_arc,
        place_on_circle, place_on_line, scale_to_px,
    };
    use crate::math::Vec2;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn angle_deg(p: Vec2, center: Vec2) -> f64 {
        (p - center).angle_rad().to_degrees()
    }

    fn min_pairwise_distance(points: &[Vec2]) -> f64 {
        let mut best = f64::INFINITY;
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                best = best.min(a.distance(*b));
            }
        }
        best
    }

    #[test]
    fn seven_points_on_a_circle_are_evenly_spaced() {
        let center = Vec2::new(0.0, 0.0);
        let angles: Vec<f64> = (0..7)
            .map(|i| angle_deg(place_on_circle(i, 7, 100.0, center), center))
            .collect();

        let mut total_gap = 0.0;
        for i in 0..7 {
            let next = angles[(i + 1) % 7];
            let gap = (next - angles[i]).rem_euclid(360.0);
            assert_close(gap, 360.0 / 7.0, 1e-9);
            total_gap += gap;
        }
        assert_close(total_gap, 360.0, 1e-9);
    }

    #[test]
    fn circle_starts_at_twelve_o_clock() {
        let p = place_on_circle(0, 7, 100.0, Vec2::new(50.0, 50.0));
        assert_close(p.x, 50.0, 1e-9);
        assert_close(p.y, -50.0, 1e-9);
        assert_eq!(circle_angle_deg(0, 1), -90.0);
    }

    #[test]
    fn index_zero_lands_on_start_angle() {
        let center = Vec2::new(200.0, 220.0);
        for total in 1..=40 {
            let p = place_on_arc(0, total, 200.0, 340.0, 150.0, center);
            let expected = center + Vec2::from_polar(150.0, 200f64.to_radians());
            assert_close(p.x, expected.x, 1e-9);
            assert_close(p.y, expected.y, 1e-9);
        }
    }

    #[test]
    fn single_slot_has_zero_step() {
        assert_eq!(arc_step_deg(1, 180.0, 360.0), 0.0);
        assert_eq!(arc_step_deg(0, 180.0, 360.0), 0.0);
        let p = place_on_arc(0, 1, 180.0, 360.0, 10.0, Vec2::ZERO);
        assert_close(p.x, -10.0, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
    }

    #[test]
    fn placements_are_finite_and_distinct() {
        let center = Vec2::new(0.0, 0.0);
        for total in 1..=60 {
            let arc: Vec<Vec2> = (0..total)
                .map(|i| place_on_arc(i, total, 180.0, 360.0, 120.0, center))
                .collect();
            let circle: Vec<Vec2> = (0..total)
                .map(|i| place_on_circle(i, total, 120.0, center))
                .collect();
            assert!(arc.iter().chain(circle.iter()).all(|p| p.is_finite()));
            if total > 1 {
                assert!(min_pairwise_distance(&arc) > 1e-6, "arc total={total}");
                assert!(min_pairwise_distance(&circle) > 1e-6, "circle total={total}");
            }
        }
    }

    #[test]
    fn placement_is_deterministic() {
        let a = place_on_arc(13, 30, 190.0, 350.0, 180.0, Vec2::new(1.0, 2.0));
        let b = place_on_arc(13, 30, 190.0, 350.0, 180.0, Vec2::new(1.0, 2.0));
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_index_clamps_to_last_slot() {
        let last = place_on_circle(6, 7, 100.0, Vec2::ZERO);
        assert_eq!(place_on_circle(99, 7, 100.0, Vec2::ZERO), last);
        assert_eq!(
            place_on_line(5, 3, Vec2::ZERO, Vec2::new(10.0, 0.0)),
            Vec2::new(10.0, 0.0)
        );
    }

    #[test]
    fn line_places_ends_inclusive() {
        let from = Vec2::new(0.0, 10.0);
        let to = Vec2::new(100.0, 10.0);
        assert_eq!(place_on_line(0, 5, from, to), from);
        assert_eq!(place_on_line(4, 5, from, to), to);
        assert_eq!(place_on_line(2, 5, from, to), Vec2::new(50.0, 10.0));
        assert_eq!(place_on_line(0, 1, from, to), from);
    }

    #[test]
    fn linear_scale_maps_years_to_pixels() {
        assert_eq!(linear_scale(1000.0, (800.0, 1800.0), (0.0, 500.0)), 100.0);
        assert_eq!(linear_scale(5.0, (3.0, 3.0), (40.0, 500.0)), 40.0);
    }

    #[test]
    fn bars_clamp_to_available_width() {
        assert_eq!(scale_to_px(50.0, 200.0, 400.0), 100.0);
        assert_eq!(scale_to_px(300.0, 200.0, 400.0), 400.0);
        assert_eq!(scale_to_px(-1.0, 200.0, 400.0), 0.0);
        assert_eq!(scale_to_px(10.0, 0.0, 400.0), 0.0);
        assert_eq!(percent_to_px(25.0, 320.0), 80.0);
    }
}
