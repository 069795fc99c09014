//! Testing utilities for stroke quizzes.
//!
//! - Character fixtures in the interchange JSON format
//! - Mouse gesture sequences for driving terminal front-ends
//! - Property-based generators for points and polylines

pub mod fixtures;
pub mod input;

#[cfg(feature = "proptest-support")]
pub mod generators;

pub use fixtures::Fixtures;
pub use input::GestureSequence;
