//! Quiz configuration.

use crate::matcher::{MatchOptions, AVERAGE_DISTANCE_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Options for one quiz round. Deserializable so front-ends can keep them in
/// their own config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOptions {
    /// Multiplier applied to every spatial matching threshold.
    #[serde(default = "default_leniency")]
    pub leniency: f64,
    /// Whether the character outline is shown while quizzing; strokes are
    /// graded more strictly when it is.
    #[serde(default = "default_true")]
    pub show_outline: bool,
    #[serde(default)]
    pub accept_backwards_strokes: bool,
    /// Stroke to begin at; clamped to the character's strokes.
    #[serde(default)]
    pub quiz_start_stroke_num: usize,
    /// Emit a hint once a stroke has this many mistakes.
    #[serde(default = "default_hint_after")]
    pub show_hint_after_misses: Option<u32>,
    /// The attempt that would bring a stroke to this many mistakes is
    /// accepted instead of recorded.
    #[serde(default)]
    pub mark_stroke_correct_after_misses: Option<u32>,
    #[serde(default = "default_average_distance_threshold")]
    pub average_distance_threshold: f64,
}

fn default_leniency() -> f64 { 1.0 }
fn default_true() -> bool { true }
fn default_hint_after() -> Option<u32> { Some(3) }
fn default_average_distance_threshold() -> f64 { AVERAGE_DISTANCE_THRESHOLD }

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            leniency: 1.0,
            show_outline: true,
            accept_backwards_strokes: false,
            quiz_start_stroke_num: 0,
            show_hint_after_misses: Some(3),
            mark_stroke_correct_after_misses: None,
            average_distance_threshold: AVERAGE_DISTANCE_THRESHOLD,
        }
    }
}

impl QuizOptions {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            leniency: self.leniency,
            is_outline_visible: self.show_outline,
            average_distance_threshold: self.average_distance_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let options: QuizOptions = serde_json::from_str("{\"leniency\": 1.5}").unwrap();
        assert_eq!(options.leniency, 1.5);
        assert!(options.show_outline);
        assert_eq!(options.show_hint_after_misses, Some(3));
        assert_eq!(options.mark_stroke_correct_after_misses, None);
        assert_eq!(options.average_distance_threshold, 350.0);
    }

    #[test]
    fn test_match_options() {
        let options = QuizOptions {
            show_outline: false,
            leniency: 0.8,
            ..QuizOptions::default()
        };
        let match_options = options.match_options();
        assert!(!match_options.is_outline_visible);
        assert_eq!(match_options.leniency, 0.8);
    }
}
