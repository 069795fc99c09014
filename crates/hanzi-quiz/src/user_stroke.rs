//! The stroke a user is drawing.

use crate::geometry::Point;

/// A user's stroke in both coordinate spaces.
///
/// `points[i]` is the canonical image of `external_points[i]`. Points are
/// only ever appended while the gesture is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStroke {
    pub id: u32,
    pub points: Vec<Point>,
    pub external_points: Vec<Point>,
}

impl UserStroke {
    /// Start a stroke at its first point.
    pub fn new(id: u32, start: Point, external_start: Point) -> Self {
        Self {
            id,
            points: vec![start],
            external_points: vec![external_start],
        }
    }

    /// Build a finished stroke from matching point lists.
    pub fn from_points(id: u32, points: Vec<Point>, external_points: Vec<Point>) -> Self {
        debug_assert_eq!(points.len(), external_points.len());
        Self {
            id,
            points,
            external_points,
        }
    }

    pub fn append_point(&mut self, point: Point, external_point: Point) {
        self.points.push(point);
        self.external_points.push(external_point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_spaces_aligned() {
        let mut stroke = UserStroke::new(7, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        stroke.append_point(Point::new(1.0, 1.0), Point::new(11.0, 9.0));
        assert_eq!(stroke.id, 7);
        assert_eq!(stroke.len(), 2);
        assert_eq!(stroke.external_points[1], Point::new(11.0, 9.0));
        assert!(!stroke.is_empty());
    }
}
