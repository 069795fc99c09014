//! Character and stroke data model.

use crate::error::{QuizError, QuizResult};
use crate::geometry::{self, Point};
use serde::{Deserialize, Serialize};

/// Stroke data in the interchange shape used by makemeahanzi-style
/// character databases.
///
/// Both lists are optional at the serde level so that a missing field is
/// reported as malformed data instead of a generic decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterJson {
    #[serde(default)]
    pub strokes: Option<Vec<String>>,
    #[serde(default)]
    pub medians: Option<Vec<Vec<[f64; 2]>>>,
    #[serde(default, rename = "radStrokes", skip_serializing_if = "Option::is_none")]
    pub rad_strokes: Option<Vec<usize>>,
}

impl CharacterJson {
    pub fn from_json(json: &str) -> QuizResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One reference stroke of a character.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Outline path descriptor, opaque to the matcher.
    pub path: String,
    /// Median sample points in canonical space.
    pub points: Vec<Point>,
    /// Position of the stroke in canonical stroke order.
    pub index: usize,
    pub is_in_radical: bool,
    length: f64,
    vectors: Vec<Point>,
}

impl Stroke {
    /// Build a stroke; `points` must not be empty.
    pub(crate) fn new(path: impl Into<String>, points: Vec<Point>, index: usize, is_in_radical: bool) -> Self {
        let length = geometry::length(&points);
        let vectors = points
            .windows(2)
            .map(|w| geometry::subtract(w[1], w[0]))
            .collect();
        Self {
            path: path.into(),
            points,
            index,
            is_in_radical,
            length,
            vectors,
        }
    }

    pub fn start_point(&self) -> Point {
        self.points[0]
    }

    pub fn end_point(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Polyline length of the medians.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Displacement vector of every median segment.
    pub fn vectors(&self) -> &[Point] {
        &self.vectors
    }

    /// Distance from `point` to the nearest median sample.
    ///
    /// Deliberately sample-based rather than segment-based; the matching
    /// thresholds are calibrated against it.
    pub fn distance(&self, point: Point) -> f64 {
        self.points
            .iter()
            .map(|&p| geometry::distance(p, point))
            .fold(f64::INFINITY, f64::min)
    }

    /// Mean of [`Stroke::distance`] over `points`.
    pub fn average_distance(&self, points: &[Point]) -> f64 {
        if points.is_empty() {
            return 0.0;
        }
        let total: f64 = points.iter().map(|&p| self.distance(p)).sum();
        total / points.len() as f64
    }
}

/// A parsed character: its symbol and strokes in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub symbol: String,
    pub strokes: Vec<Stroke>,
}

impl Character {
    /// Parse raw stroke data. Either the whole character is built or a
    /// [`QuizError::MalformedCharacterData`] is returned.
    pub fn parse(symbol: impl Into<String>, raw: &CharacterJson) -> QuizResult<Self> {
        let symbol = symbol.into();
        let malformed = |reason: String| QuizError::MalformedCharacterData(format!("{symbol}: {reason}"));

        let paths = raw
            .strokes
            .as_ref()
            .ok_or_else(|| malformed("missing strokes".to_string()))?;
        let medians = raw
            .medians
            .as_ref()
            .ok_or_else(|| malformed("missing medians".to_string()))?;
        if paths.len() != medians.len() {
            return Err(malformed(format!(
                "{} strokes but {} medians",
                paths.len(),
                medians.len()
            )));
        }
        if paths.is_empty() {
            return Err(malformed("no strokes".to_string()));
        }

        let radicals = raw.rad_strokes.as_deref().unwrap_or(&[]);
        if let Some(&bad) = radicals.iter().find(|&&i| i >= paths.len()) {
            return Err(malformed(format!("radical stroke {bad} out of range")));
        }

        let mut strokes = Vec::with_capacity(paths.len());
        for (index, (path, median)) in paths.iter().zip(medians).enumerate() {
            if median.is_empty() {
                return Err(malformed(format!("stroke {index} has no median points")));
            }
            let points = median.iter().map(|&p| Point::from(p)).collect();
            strokes.push(Stroke::new(path.clone(), points, index, radicals.contains(&index)));
        }

        Ok(Self { symbol, strokes })
    }

    /// Parse the interchange JSON for `symbol`.
    pub fn from_json(symbol: impl Into<String>, json: &str) -> QuizResult<Self> {
        let raw = CharacterJson::from_json(json)?;
        Self::parse(symbol, &raw)
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }
}
