//! Quiz progression state machine.
//!
//! Transitions are pure: each one takes the current [`QuizState`] and
//! returns the next state together with the events it produced. The
//! session installs the new state before anything is published.

use crate::character::Character;
use crate::error::{QuizError, QuizResult};
use crate::event::{CompletionData, QuizEvent, StrokeData};
use crate::geometry::Point;
use crate::matcher::StrokeMatchResult;
use crate::options::QuizOptions;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Snapshot of a session's quiz.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizState {
    Inactive { character: Option<Arc<Character>> },
    Active(ActiveQuiz),
}

/// A quiz round in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuiz {
    pub character: Arc<Character>,
    /// Stroke the user is expected to draw next.
    pub index: usize,
    /// Mistakes per stroke index; strokes without mistakes are absent.
    pub mistakes: BTreeMap<usize, u32>,
    pub options: QuizOptions,
}

impl ActiveQuiz {
    pub fn mistakes_on(&self, index: usize) -> u32 {
        self.mistakes.get(&index).copied().unwrap_or(0)
    }

    /// Every recorded mistake, across all strokes.
    pub fn total_mistakes(&self) -> u32 {
        self.mistakes.values().sum()
    }

    /// Number of distinct strokes that recorded at least one mistake.
    pub fn strokes_with_mistakes(&self) -> u32 {
        self.mistakes.len() as u32
    }

    pub fn is_last_stroke(&self) -> bool {
        self.index + 1 >= self.character.stroke_count()
    }

    fn stroke_data(&self, is_backwards: bool, accepted: bool, drawn_points: &[Point]) -> StrokeData {
        let remaining = self.character.stroke_count() - self.index;
        StrokeData {
            character: self.character.symbol.clone(),
            stroke_index: self.index,
            mistakes_on_stroke: self.mistakes_on(self.index),
            total_mistakes: self.total_mistakes(),
            strokes_remaining: if accepted { remaining - 1 } else { remaining },
            is_backwards,
            drawn_points: drawn_points.to_vec(),
        }
    }
}

/// Result of a transition: the state to install and what to announce.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: QuizState,
    pub events: Vec<QuizEvent>,
}

impl Default for QuizState {
    fn default() -> Self {
        Self::Inactive { character: None }
    }
}

impl QuizState {
    pub fn character(&self) -> Option<&Arc<Character>> {
        match self {
            Self::Inactive { character } => character.as_ref(),
            Self::Active(quiz) => Some(&quiz.character),
        }
    }

    pub fn active(&self) -> Option<&ActiveQuiz> {
        match self {
            Self::Active(quiz) => Some(quiz),
            Self::Inactive { .. } => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Current target stroke; 0 while inactive.
    pub fn index(&self) -> usize {
        self.active().map_or(0, |quiz| quiz.index)
    }

    /// Begin a round at the clamped start stroke.
    pub fn start(&self, options: QuizOptions) -> QuizResult<QuizState> {
        let character = self.character().cloned().ok_or(QuizError::NotReady)?;
        let last = character.stroke_count().saturating_sub(1);
        let index = options.quiz_start_stroke_num.min(last);
        Ok(QuizState::Active(ActiveQuiz {
            character,
            index,
            mistakes: BTreeMap::new(),
            options,
        }))
    }

    pub fn stop(&self) -> QuizState {
        QuizState::Inactive {
            character: self.character().cloned(),
        }
    }

    /// Apply one graded attempt at the current stroke.
    pub fn attempt(&self, result: StrokeMatchResult, drawn_points: &[Point]) -> QuizResult<Transition> {
        let quiz = self.active().ok_or(QuizError::NoActiveQuiz)?;
        let is_backwards = result.meta.is_stroke_backwards;
        // The attempt that would reach the threshold is accepted instead of
        // being recorded as a mistake.
        let forced = quiz
            .options
            .mark_stroke_correct_after_misses
            .is_some_and(|n| quiz.mistakes_on(quiz.index) + 1 >= n);
        let accepted = result.is_match
            || forced
            || (is_backwards && quiz.options.accept_backwards_strokes);

        let mut next = quiz.clone();
        let mut events = Vec::new();

        if !accepted {
            *next.mistakes.entry(next.index).or_insert(0) += 1;
            let on_stroke = next.mistakes_on(next.index);
            events.push(QuizEvent::Mistake(next.stroke_data(is_backwards, false, drawn_points)));

            if next.options.show_hint_after_misses.is_some_and(|n| on_stroke >= n) {
                events.push(QuizEvent::Hint {
                    stroke_index: next.index,
                });
            }
            return Ok(Transition {
                state: QuizState::Active(next),
                events,
            });
        }

        events.push(QuizEvent::CorrectStroke(next.stroke_data(is_backwards, true, drawn_points)));

        if next.is_last_stroke() {
            events.push(QuizEvent::Complete(CompletionData {
                character: next.character.symbol.clone(),
                total_mistakes: next.strokes_with_mistakes(),
            }));
            return Ok(Transition {
                state: QuizState::Inactive {
                    character: Some(next.character),
                },
                events,
            });
        }

        next.index += 1;
        Ok(Transition {
            state: QuizState::Active(next),
            events,
        })
    }
}
