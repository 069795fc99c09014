//! Mapping between a drawing surface and canonical character space.
//!
//! Canonical space is the makemeahanzi frame: every character fits the box
//! `(0, -124)..(1024, 900)` with y pointing up. Drawing surfaces are y-down
//! with their origin in the top-left corner.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Lower-left and upper-right corners of the canonical bounding box.
pub const CHARACTER_BOUNDS: [Point; 2] = [Point::new(0.0, -124.0), Point::new(1024.0, 900.0)];

/// Drawing surface dimensions, in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionerOptions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for PositionerOptions {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
            padding: 20.0,
        }
    }
}

/// Uniform-scale, aspect-preserving affine map from a padded drawing surface
/// onto the canonical box, centered along the slack axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Positioner {
    pub padding: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl Positioner {
    pub fn new(options: PositionerOptions) -> Self {
        let PositionerOptions {
            width,
            height,
            padding,
        } = options;
        let [from, to] = CHARACTER_BOUNDS;
        let pre_scaled_width = to.x - from.x;
        let pre_scaled_height = to.y - from.y;

        // A surface smaller than its own padding would give a zero or
        // negative scale.
        let effective_width = (width - 2.0 * padding).max(1.0);
        let effective_height = (height - 2.0 * padding).max(1.0);
        let scale = (effective_width / pre_scaled_width).min(effective_height / pre_scaled_height);

        let x_centering = padding + (effective_width - scale * pre_scaled_width) / 2.0;
        let y_centering = padding + (effective_height - scale * pre_scaled_height) / 2.0;

        Self {
            padding,
            width,
            height,
            scale,
            x_offset: -from.x * scale + x_centering,
            y_offset: -from.y * scale + y_centering,
        }
    }

    /// Surface point to canonical point.
    pub fn convert_external_point(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.x_offset) / self.scale,
            (self.height - self.y_offset - point.y) / self.scale,
        )
    }

    /// Canonical point to surface point; inverse of
    /// [`Positioner::convert_external_point`].
    pub fn convert_internal_point(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.x_offset,
            self.height - self.y_offset - point.y * self.scale,
        )
    }
}

impl Default for Positioner {
    fn default() -> Self {
        Self::new(PositionerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanzi_testing::generators::point;
    use proptest::prelude::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn test_square_surface_corners() {
        // 1024x1024 area plus padding: scale is exactly 1.
        let positioner = Positioner::new(PositionerOptions {
            width: 1044.0,
            height: 1044.0,
            padding: 10.0,
        });
        assert_eq!(positioner.scale, 1.0);
        assert_eq!(positioner.x_offset, 10.0);
        assert_eq!(positioner.y_offset, 134.0);

        // Top-left of the padded area is the top-left of the canonical box.
        let top_left = positioner.convert_external_point(Point::new(10.0, 10.0));
        assert!(close(top_left, Point::new(0.0, 900.0)));
        let bottom_right = positioner.convert_external_point(Point::new(1034.0, 1034.0));
        assert!(close(bottom_right, Point::new(1024.0, -124.0)));
    }

    #[test]
    fn test_wide_surface_centers_horizontally() {
        let positioner = Positioner::new(PositionerOptions {
            width: 400.0,
            height: 200.0,
            padding: 0.0,
        });
        let scale = 200.0 / 1024.0;
        assert!((positioner.scale - scale).abs() < 1e-12);
        let left_edge = positioner.convert_internal_point(Point::new(0.0, 0.0)).x;
        let right_edge = positioner.convert_internal_point(Point::new(1024.0, 0.0)).x;
        assert!((left_edge - 100.0).abs() < 1e-9);
        assert!((right_edge - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_y_axis_flips() {
        let positioner = Positioner::default();
        let upper = positioner.convert_external_point(Point::new(150.0, 50.0));
        let lower = positioner.convert_external_point(Point::new(150.0, 250.0));
        assert!(upper.y > lower.y);
    }

    #[test]
    fn test_degenerate_surface_stays_finite() {
        let positioner = Positioner::new(PositionerOptions {
            width: 10.0,
            height: 10.0,
            padding: 20.0,
        });
        assert!(positioner.scale > 0.0);
        let p = positioner.convert_external_point(Point::new(5.0, 5.0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            (x, y) in point(),
            width in 50.0..2000.0f64,
            height in 50.0..2000.0f64,
            padding in 0.0..20.0f64,
        ) {
            let positioner = Positioner::new(PositionerOptions { width, height, padding });
            let external = Point::new(x, y);
            let back = positioner.convert_internal_point(positioner.convert_external_point(external));
            prop_assert!(close(back, external), "{:?} != {:?}", back, external);
        }
    }
}
