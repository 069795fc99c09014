//! Point and polyline math used by the stroke matcher.

use serde::{Deserialize, Serialize};

/// Number of samples a curve is resampled to before shape comparison.
pub const NORMALIZED_CURVE_POINTS: usize = 30;

/// A 2D coordinate, either in canonical character space or in
/// drawing-surface space depending on who produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when the point is read as a vector.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

pub fn subtract(a: Point, b: Point) -> Point {
    Point::new(a.x - b.x, a.y - b.y)
}

pub fn distance(a: Point, b: Point) -> f64 {
    subtract(a, b).magnitude()
}

/// Exact coordinate equality.
pub fn equals(a: Point, b: Point) -> bool {
    a.x == b.x && a.y == b.y
}

/// Sum of the segment lengths of a polyline.
pub fn length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Cosine of the angle between two vectors, or 0 if either is zero-length.
pub fn cosine_similarity(v1: Point, v2: Point) -> f64 {
    let magnitudes = v1.magnitude() * v2.magnitude();
    if magnitudes == 0.0 {
        return 0.0;
    }
    (v1.x * v2.x + v1.y * v2.y) / magnitudes
}

pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rotate every point about the origin by `theta` radians.
pub fn rotate(points: &[Point], theta: f64) -> Vec<Point> {
    let (sin, cos) = theta.sin_cos();
    points
        .iter()
        .map(|p| Point::new(cos * p.x - sin * p.y, sin * p.x + cos * p.y))
        .collect()
}

/// Drop points identical to their predecessor.
pub fn strip_duplicates(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        if out.last().map_or(true, |&last| !equals(last, point)) {
            out.push(point);
        }
    }
    out
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Resample a polyline to `count` points spaced evenly along its length.
pub fn outline_curve(points: &[Point], count: usize) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let total = length(points);
    if points.len() < 2 || count < 2 || total == 0.0 {
        return vec![first; count.max(1)];
    }

    let mut cumulative: Vec<f64> = Vec::with_capacity(points.len());
    cumulative.push(0.0);
    for w in points.windows(2) {
        let last = cumulative[cumulative.len() - 1];
        cumulative.push(last + distance(w[0], w[1]));
    }

    let last_index = points.len() - 1;
    let mut out: Vec<Point> = Vec::with_capacity(count);
    let mut j = 1;
    for i in 0..count {
        if i == count - 1 {
            out.push(points[last_index]);
            break;
        }
        let target = total * i as f64 / (count - 1) as f64;
        while j < last_index && cumulative[j] < target {
            j += 1;
        }
        let segment = cumulative[j] - cumulative[j - 1];
        let t = if segment > 0.0 {
            ((target - cumulative[j - 1]) / segment).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(lerp(points[j - 1], points[j], t));
    }
    out
}

/// Put a curve into a position- and size-independent frame for shape
/// comparison: evenly resampled, first point at the origin, path length 1.
pub fn normalize_curve(points: &[Point]) -> Vec<Point> {
    let outlined = outline_curve(points, NORMALIZED_CURVE_POINTS);
    let Some(&origin) = outlined.first() else {
        return Vec::new();
    };
    let translated: Vec<Point> = outlined.iter().map(|&p| subtract(p, origin)).collect();
    let scale = length(&translated);
    if scale == 0.0 {
        return translated;
    }
    translated
        .iter()
        .map(|p| Point::new(p.x / scale, p.y / scale))
        .collect()
}

/// Discrete Fréchet distance between two point sequences.
///
/// Returns `f64::INFINITY` when either sequence is empty.
pub fn frechet_dist(curve1: &[Point], curve2: &[Point]) -> f64 {
    let (len1, len2) = (curve1.len(), curve2.len());
    if len1 == 0 || len2 == 0 {
        return f64::INFINITY;
    }

    // Row-major coupling table; cell (i, j) holds the best bottleneck
    // distance of any monotone pairing ending at (i, j).
    let mut table = vec![0.0_f64; len1 * len2];
    for i in 0..len1 {
        for j in 0..len2 {
            let d = distance(curve1[i], curve2[j]);
            let best_prev = match (i, j) {
                (0, 0) => d,
                (0, _) => table[j - 1],
                (_, 0) => table[(i - 1) * len2],
                _ => table[(i - 1) * len2 + j]
                    .min(table[(i - 1) * len2 + j - 1])
                    .min(table[i * len2 + j - 1]),
            };
            table[i * len2 + j] = best_prev.max(d);
        }
    }
    table[len1 * len2 - 1]
}

fn sq_dist(a: Point, b: Point) -> f64 {
    let d = subtract(a, b);
    d.x * d.x + d.y * d.y
}

/// Squared distance from `p` to the segment `a`-`b`.
fn sq_segment_dist(p: Point, a: Point, b: Point) -> f64 {
    let mut closest = a;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if dx != 0.0 || dy != 0.0 {
        let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            closest = b;
        } else if t > 0.0 {
            closest = Point::new(a.x + dx * t, a.y + dy * t);
        }
    }
    sq_dist(p, closest)
}

fn simplify_radial_dist(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    let mut prev = points[0];
    let mut out = vec![prev];
    let mut point = prev;
    for &p in &points[1..] {
        point = p;
        if sq_dist(p, prev) > sq_tolerance {
            out.push(p);
            prev = p;
        }
    }
    if !equals(prev, point) {
        out.push(point);
    }
    out
}

fn douglas_peucker_step(
    points: &[Point],
    first: usize,
    last: usize,
    sq_tolerance: f64,
    out: &mut Vec<Point>,
) {
    let mut max_sq_dist = sq_tolerance;
    let mut split = None;
    for i in first + 1..last {
        let d = sq_segment_dist(points[i], points[first], points[last]);
        if d > max_sq_dist {
            split = Some(i);
            max_sq_dist = d;
        }
    }

    if let Some(index) = split {
        if index - first > 1 {
            douglas_peucker_step(points, first, index, sq_tolerance, out);
        }
        out.push(points[index]);
        if last - index > 1 {
            douglas_peucker_step(points, index, last, sq_tolerance, out);
        }
    }
}

fn simplify_douglas_peucker(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    let last = points.len() - 1;
    let mut out = vec![points[0]];
    douglas_peucker_step(points, 0, last, sq_tolerance, &mut out);
    out.push(points[last]);
    out
}

/// Simplify a polyline with a radial-distance pre-pass (skipped when
/// `highest_quality`) followed by Ramer-Douglas-Peucker.
pub fn simplify(points: &[Point], tolerance: f64, highest_quality: bool) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let sq_tolerance = tolerance * tolerance;
    let reduced = if highest_quality {
        points.to_vec()
    } else {
        simplify_radial_dist(points, sq_tolerance)
    };
    if reduced.len() <= 2 {
        return reduced;
    }
    simplify_douglas_peucker(&reduced, sq_tolerance)
}
