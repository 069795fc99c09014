//! Property-based testing generators.
//!
//! Points are plain `(x, y)` tuples so that this crate does not depend on
//! the engine it is used to test.

use proptest::prelude::*;
use std::ops::Range;

/// Coordinate range covering the canonical box with generous margins.
pub const COORDINATE_RANGE: Range<f64> = -1000.0..3000.0;

/// Generate a finite point.
pub fn point() -> impl Strategy<Value = (f64, f64)> {
    (COORDINATE_RANGE, COORDINATE_RANGE)
}

/// Generate a polyline whose point count falls in `len`.
pub fn polyline(len: Range<usize>) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec(point(), len)
}

/// Generate a freehand-looking gesture: a start point followed by small
/// steps, so consecutive points stay close together.
pub fn gesture(steps: Range<usize>) -> impl Strategy<Value = Vec<(f64, f64)>> {
    let step = (-30.0..30.0f64, -30.0..30.0f64);
    (point(), prop::collection::vec(step, steps)).prop_map(|(start, steps)| {
        let mut current = start;
        let mut points = Vec::with_capacity(steps.len() + 1);
        points.push(current);
        for (dx, dy) in steps {
            current = (current.0 + dx, current.1 + dy);
            points.push(current);
        }
        points
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_points_are_finite((x, y) in point()) {
            prop_assert!(x.is_finite() && y.is_finite());
            prop_assert!(COORDINATE_RANGE.contains(&x));
        }

        #[test]
        fn prop_polyline_respects_length(line in polyline(2..10)) {
            prop_assert!((2..10).contains(&line.len()));
        }

        #[test]
        fn prop_gesture_steps_are_small(line in gesture(1..20)) {
            for pair in line.windows(2) {
                prop_assert!((pair[1].0 - pair[0].0).abs() < 30.0 + 1e-9);
                prop_assert!((pair[1].1 - pair[0].1).abs() < 30.0 + 1e-9);
            }
        }
    }
}
