//! Stroke recognition and stroke-order quizzing for Hanzi/Kanji.
//!
//! Characters live in a 1024-unit canonical space (x in 0..1024, y in
//! -124..900, y pointing up). A [`Positioner`] maps between that space and a
//! drawing surface. A [`QuizSession`] grades gestures against the expected
//! stroke with [`stroke_matches`] and advances a pure [`QuizState`] machine,
//! publishing [`QuizEvent`]s to handlers and state snapshots to subscribers.

pub mod character;
pub mod error;
pub mod event;
pub mod geometry;
pub mod matcher;
pub mod options;
pub mod positioner;
pub mod quiz;
pub mod session;
pub mod user_stroke;

pub use character::{Character, CharacterJson, Stroke};
pub use error::{QuizError, QuizResult};
pub use event::{CompletionData, Handler, QuizEvent, QuizHandlers, StrokeData};
pub use geometry::Point;
pub use matcher::{stroke_matches, MatchOptions, StrokeMatchMeta, StrokeMatchResult};
pub use options::QuizOptions;
pub use positioner::{Positioner, PositionerOptions, CHARACTER_BOUNDS};
pub use quiz::{ActiveQuiz, QuizState, Transition};
pub use session::{CharacterDataSource, CheckOutcome, QuizSession, StrokeAnimator};
pub use user_stroke::UserStroke;
