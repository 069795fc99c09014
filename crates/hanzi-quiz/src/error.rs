//! Quiz error types.

use thiserror::Error;

/// Errors surfaced by character loading and quiz transitions.
///
/// Stroke matching itself never fails; only loading and session calls
/// made in the wrong state produce one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// Raw stroke data is missing fields or inconsistent.
    #[error("Malformed character data: {0}")]
    MalformedCharacterData(String),

    /// `start` was called before a character was loaded.
    #[error("No character loaded")]
    NotReady,

    /// A gesture arrived while no quiz is running.
    #[error("No active quiz")]
    NoActiveQuiz,

    /// The character data source reported a failure.
    #[error("Character load failed: {0}")]
    LoadFailed(String),
}

impl From<serde_json::Error> for QuizError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedCharacterData(e.to_string())
    }
}

/// Result type for quiz operations.
pub type QuizResult<T> = Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(QuizError::NotReady.to_string(), "No character loaded");
        assert_eq!(
            QuizError::MalformedCharacterData("no medians".into()).to_string(),
            "Malformed character data: no medians"
        );
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: QuizError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, QuizError::MalformedCharacterData(_)));
    }
}
