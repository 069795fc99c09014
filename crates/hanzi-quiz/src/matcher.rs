//! Multi-criteria stroke classifier.
//!
//! A user stroke matches a reference stroke when all of these hold:
//! average distance, start/end proximity, direction, shape (Fréchet
//! distance under small rotations) and relative length. Every spatial
//! threshold scales linearly with `leniency`; the direction check does not.

use crate::character::{Character, Stroke};
use crate::geometry::{self, Point};
use crate::user_stroke::UserStroke;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, trace};

pub const AVERAGE_DISTANCE_THRESHOLD: f64 = 350.0;
pub const START_AND_END_DIST_THRESHOLD: f64 = 250.0;
pub const FRECHET_THRESHOLD: f64 = 0.4;
pub const MIN_LEN_THRESHOLD: f64 = 0.35;
pub const COSINE_SIMILARITY_THRESHOLD: f64 = 0.0;
/// Added to both lengths so very short strokes don't blow up the ratio.
pub const LENGTH_PADDING: f64 = 25.0;
pub const SHAPE_FIT_ROTATIONS: [f64; 5] = [PI / 16.0, PI / 32.0, 0.0, -PI / 32.0, -PI / 16.0];

/// Per-call matching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub leniency: f64,
    pub is_outline_visible: bool,
    pub average_distance_threshold: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            leniency: 1.0,
            is_outline_visible: false,
            average_distance_threshold: AVERAGE_DISTANCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrokeMatchMeta {
    pub is_stroke_backwards: bool,
}

/// Outcome of matching one user stroke.
///
/// A stroke that only fits when reversed is reported with `is_match: false`
/// and `meta.is_stroke_backwards: true`; accepting it is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrokeMatchResult {
    pub is_match: bool,
    pub meta: StrokeMatchMeta,
}

impl StrokeMatchResult {
    pub const NO_MATCH: Self = Self {
        is_match: false,
        meta: StrokeMatchMeta {
            is_stroke_backwards: false,
        },
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backwards {
    Check,
    Skip,
}

#[derive(Debug, Clone, Copy)]
struct MatchData {
    is_match: bool,
    avg_dist: f64,
    is_stroke_backwards: bool,
}

impl MatchData {
    fn result(&self) -> StrokeMatchResult {
        StrokeMatchResult {
            is_match: self.is_match,
            meta: StrokeMatchMeta {
                is_stroke_backwards: self.is_stroke_backwards,
            },
        }
    }
}

/// Decide whether `user_stroke` is an acceptable rendition of stroke
/// `stroke_index` of `character`.
///
/// Total: degenerate strokes and out-of-range indexes are plain no-matches.
pub fn stroke_matches(
    user_stroke: &UserStroke,
    character: &Character,
    stroke_index: usize,
    options: &MatchOptions,
) -> StrokeMatchResult {
    let points = geometry::strip_duplicates(&user_stroke.points);
    if points.len() < 2 {
        debug!(stroke = user_stroke.id, "user stroke too short to match");
        return StrokeMatchResult::NO_MATCH;
    }
    let Some(stroke) = character.strokes.get(stroke_index) else {
        debug!(stroke_index, "stroke index out of range");
        return StrokeMatchResult::NO_MATCH;
    };

    let data = match_data(&points, stroke, options, options.leniency, Backwards::Check);
    if !data.is_match {
        return data.result();
    }

    // A strictly closer match among strokes not yet drawn suggests the user
    // drew the wrong stroke.
    let closest_later = character.strokes[stroke_index + 1..]
        .iter()
        .map(|later| match_data(&points, later, options, options.leniency, Backwards::Skip))
        .filter(|later| later.is_match)
        .map(|later| later.avg_dist)
        .fold(data.avg_dist, f64::min);

    if closest_later < data.avg_dist {
        // Scales leniency into roughly 0.3..0.6 depending on how much better
        // the rival is.
        let adjustment = 0.6 * (closest_later + data.avg_dist) / (2.0 * data.avg_dist);
        debug!(
            stroke_index,
            avg_dist = data.avg_dist,
            closest_later,
            adjustment,
            "later stroke matches better; retrying with reduced leniency"
        );
        return match_data(
            &points,
            stroke,
            options,
            options.leniency * adjustment,
            Backwards::Check,
        )
        .result();
    }

    data.result()
}

/// Forward evaluation, then one reversed evaluation when the forward pass
/// fails and `backwards` is [`Backwards::Check`].
fn match_data(
    points: &[Point],
    stroke: &Stroke,
    options: &MatchOptions,
    leniency: f64,
    backwards: Backwards,
) -> MatchData {
    let forward = evaluate(points, stroke, options, leniency);
    if forward.is_match || backwards == Backwards::Skip {
        return forward;
    }

    let reversed: Vec<Point> = points.iter().rev().copied().collect();
    let reverse = evaluate(&reversed, stroke, options, leniency);
    if reverse.is_match {
        debug!(stroke_index = stroke.index, "stroke drawn backwards");
        return MatchData {
            is_stroke_backwards: true,
            ..forward
        };
    }
    forward
}

fn evaluate(points: &[Point], stroke: &Stroke, options: &MatchOptions, leniency: f64) -> MatchData {
    let avg_dist = stroke.average_distance(points);
    let dist_mod = if options.is_outline_visible || stroke.index > 0 {
        0.5
    } else {
        1.0
    };
    let within_dist = avg_dist <= options.average_distance_threshold * dist_mod * leniency;
    if !within_dist {
        trace!(stroke_index = stroke.index, avg_dist, "too far from stroke");
        return MatchData {
            is_match: false,
            avg_dist,
            is_stroke_backwards: false,
        };
    }

    let ends = start_and_end_matches(points, stroke, leniency);
    let direction = direction_matches(points, stroke);
    let shape = shape_fit(points, &stroke.points, leniency);
    let length = length_matches(points, stroke, leniency);
    trace!(
        stroke_index = stroke.index,
        avg_dist,
        ends,
        direction,
        shape,
        length,
        "stroke criteria"
    );

    MatchData {
        is_match: ends && direction && shape && length,
        avg_dist,
        is_stroke_backwards: false,
    }
}

fn start_and_end_matches(points: &[Point], stroke: &Stroke, leniency: f64) -> bool {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return false;
    };
    let threshold = START_AND_END_DIST_THRESHOLD * leniency;
    geometry::distance(stroke.start_point(), first) <= threshold
        && geometry::distance(stroke.end_point(), last) <= threshold
}

fn direction_matches(points: &[Point], stroke: &Stroke) -> bool {
    let stroke_vectors = stroke.vectors();
    let similarities: Vec<f64> = points
        .windows(2)
        .map(|w| {
            let edge = geometry::subtract(w[1], w[0]);
            stroke_vectors
                .iter()
                .map(|&v| geometry::cosine_similarity(v, edge))
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect();
    geometry::average(&similarities) > COSINE_SIMILARITY_THRESHOLD
}

fn shape_fit(curve: &[Point], reference: &[Point], leniency: f64) -> bool {
    let normalized = geometry::normalize_curve(curve);
    let normalized_ref = geometry::normalize_curve(reference);
    let min_dist = SHAPE_FIT_ROTATIONS
        .iter()
        .map(|&theta| geometry::frechet_dist(&normalized, &geometry::rotate(&normalized_ref, theta)))
        .fold(f64::INFINITY, f64::min);
    min_dist <= FRECHET_THRESHOLD * leniency
}

fn length_matches(points: &[Point], stroke: &Stroke, leniency: f64) -> bool {
    leniency * (geometry::length(points) + LENGTH_PADDING) / (stroke.length() + LENGTH_PADDING)
        >= MIN_LEN_THRESHOLD
}
