//! Events emitted by quiz transitions.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Progress report attached to a mistake or a correct stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeData {
    pub character: String,
    pub stroke_index: usize,
    pub mistakes_on_stroke: u32,
    pub total_mistakes: u32,
    /// Strokes still to draw; excludes a stroke that was just accepted.
    pub strokes_remaining: usize,
    pub is_backwards: bool,
    /// The simplified gesture in drawing-surface coordinates.
    pub drawn_points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionData {
    pub character: String,
    pub total_mistakes: u32,
}

/// A one-shot notification produced by a quiz transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    Mistake(StrokeData),
    CorrectStroke(StrokeData),
    /// The expected stroke should be highlighted.
    Hint { stroke_index: usize },
    Complete(CompletionData),
}

/// Boxed event callback.
pub type Handler<T> = Box<dyn FnMut(&T) + Send>;

/// Optional callbacks invoked synchronously after each transition.
#[derive(Default)]
pub struct QuizHandlers {
    pub on_mistake: Option<Handler<StrokeData>>,
    pub on_correct_stroke: Option<Handler<StrokeData>>,
    pub on_complete: Option<Handler<CompletionData>>,
    pub on_hint: Option<Handler<usize>>,
}

impl QuizHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mistake(mut self, f: impl FnMut(&StrokeData) + Send + 'static) -> Self {
        self.on_mistake = Some(Box::new(f));
        self
    }

    pub fn on_correct_stroke(mut self, f: impl FnMut(&StrokeData) + Send + 'static) -> Self {
        self.on_correct_stroke = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnMut(&CompletionData) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn on_hint(mut self, f: impl FnMut(&usize) + Send + 'static) -> Self {
        self.on_hint = Some(Box::new(f));
        self
    }

    /// Forward every event to a channel, for consumers that prefer message
    /// passing over callbacks.
    pub fn forward_to(sender: std::sync::mpsc::Sender<QuizEvent>) -> Self {
        let mistake = sender.clone();
        let correct = sender.clone();
        let hint = sender.clone();
        let complete = sender;
        Self::new()
            .on_mistake(move |data| {
                let _ = mistake.send(QuizEvent::Mistake(data.clone()));
            })
            .on_correct_stroke(move |data| {
                let _ = correct.send(QuizEvent::CorrectStroke(data.clone()));
            })
            .on_hint(move |&stroke_index| {
                let _ = hint.send(QuizEvent::Hint { stroke_index });
            })
            .on_complete(move |data| {
                let _ = complete.send(QuizEvent::Complete(data.clone()));
            })
    }

    pub(crate) fn dispatch(&mut self, event: &QuizEvent) {
        match event {
            QuizEvent::Mistake(data) => {
                if let Some(f) = &mut self.on_mistake {
                    f(data);
                }
            }
            QuizEvent::CorrectStroke(data) => {
                if let Some(f) = &mut self.on_correct_stroke {
                    f(data);
                }
            }
            QuizEvent::Hint { stroke_index } => {
                if let Some(f) = &mut self.on_hint {
                    f(stroke_index);
                }
            }
            QuizEvent::Complete(data) => {
                if let Some(f) = &mut self.on_complete {
                    f(data);
                }
            }
        }
    }
}

impl std::fmt::Debug for QuizHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizHandlers")
            .field("on_mistake", &self.on_mistake.is_some())
            .field("on_correct_stroke", &self.on_correct_stroke.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_hint", &self.on_hint.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_event_serialization_tag() {
        let event = QuizEvent::Hint { stroke_index: 2 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "hint");
        assert_eq!(json["stroke_index"], 2);
    }

    #[test]
    fn test_forward_to_channel() {
        let (tx, rx) = mpsc::channel();
        let mut handlers = QuizHandlers::forward_to(tx);
        let done = QuizEvent::Complete(CompletionData {
            character: "十".into(),
            total_mistakes: 1,
        });
        handlers.dispatch(&QuizEvent::Hint { stroke_index: 0 });
        handlers.dispatch(&done);
        let received: Vec<QuizEvent> = rx.try_iter().collect();
        assert_eq!(received, vec![QuizEvent::Hint { stroke_index: 0 }, done]);
    }
}
