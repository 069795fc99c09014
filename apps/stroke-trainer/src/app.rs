//! Application state and logic.

use crate::config::Config;
use hanzi_quiz::{
    CharacterDataSource, CheckOutcome, Point, Positioner, PositionerOptions, QuizError,
    QuizEvent, QuizHandlers, QuizResult, QuizSession, StrokeAnimator,
};
use crossterm::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Terminal rows are roughly twice as tall as columns are wide; one row
/// spans this many surface units.
pub const ROW_ASPECT: f64 = 2.0;

/// Message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

/// Stroke-by-stroke reveal of the current character.
#[derive(Debug, Clone)]
pub struct StrokeReveal {
    started: Instant,
    per_stroke: Duration,
}

impl StrokeReveal {
    /// Strokes revealed at `now`, as a fraction: 1.5 means the first stroke
    /// is complete and the second half drawn.
    pub fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let per_stroke = self.per_stroke.as_secs_f64().max(f64::EPSILON);
        elapsed / per_stroke
    }
}

/// Cancellation handle given to the quiz session.
#[derive(Debug, Clone, Default)]
pub struct RevealCancel(Arc<AtomicBool>);

impl RevealCancel {
    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl StrokeAnimator for RevealCancel {
    fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Application state.
pub struct App {
    pub config: Config,
    pub session: QuizSession,
    source: Box<dyn CharacterDataSource>,
    events: Receiver<QuizEvent>,
    sender: Sender<QuizEvent>,
    /// Index into the practice list.
    pub current: usize,
    /// Inner area of the drawing canvas, set by the renderer.
    pub canvas_area: Rect,
    /// Stroke to highlight after repeated misses.
    pub hint: Option<usize>,
    /// Accepted gestures in canonical space.
    pub drawn: Vec<Vec<Point>>,
    pub reveal: Option<StrokeReveal>,
    reveal_cancel: RevealCancel,
    pub message: Option<(String, MessageType)>,
    pub show_help: bool,
}

impl App {
    /// Create the app and start quizzing the first character.
    pub fn new(config: Config, source: Box<dyn CharacterDataSource>) -> Self {
        let reveal_cancel = RevealCancel::default();
        let session = QuizSession::new(Positioner::default()).with_animator(reveal_cancel.clone());
        let (sender, events) = mpsc::channel();
        let mut app = Self {
            config,
            session,
            source,
            events,
            sender,
            current: 0,
            canvas_area: Rect::default(),
            hint: None,
            drawn: Vec::new(),
            reveal: None,
            reveal_cancel,
            message: None,
            show_help: false,
        };
        app.load_current();
        app
    }

    pub fn symbol(&self) -> Option<&str> {
        self.config.data.characters.get(self.current).map(String::as_str)
    }

    /// Load the selected character and start a quiz on it.
    pub fn load_current(&mut self) {
        self.reset_progress();
        self.reveal = None;
        let Some(symbol) = self.symbol().map(str::to_string) else {
            self.set_message("No characters configured", MessageType::Error);
            return;
        };
        match self.session.load_from(self.source.as_ref(), &symbol) {
            Ok(_) => self.start_quiz(),
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "could not load character");
                self.set_message(format!("Cannot load {symbol}: {e}"), MessageType::Error);
            }
        }
    }

    pub fn start_quiz(&mut self) {
        self.reset_progress();
        let handlers = QuizHandlers::forward_to(self.sender.clone());
        match self.session.start(self.config.quiz.clone(), handlers) {
            Ok(()) => self.set_message("Draw the first stroke", MessageType::Info),
            Err(e) => self.set_message(e.to_string(), MessageType::Error),
        }
    }

    pub fn next_character(&mut self) {
        let len = self.config.data.characters.len();
        if len > 0 {
            self.current = (self.current + 1) % len;
            self.load_current();
        }
    }

    pub fn prev_character(&mut self) {
        let len = self.config.data.characters.len();
        if len > 0 {
            self.current = (self.current + len - 1) % len;
            self.load_current();
        }
    }

    /// Play the stroke reveal. Only available between quizzes.
    pub fn animate(&mut self) {
        if self.session.state().is_active() {
            self.set_message("Stop the quiz (x) to watch the strokes", MessageType::Warning);
            return;
        }
        self.reveal_cancel.reset();
        self.reveal = Some(StrokeReveal {
            started: Instant::now(),
            per_stroke: Duration::from_millis(self.config.display.stroke_reveal_ms),
        });
    }

    /// Advance time-based state.
    pub fn tick(&mut self, now: Instant) {
        let stroke_count = self.session.character().map_or(0, |c| c.stroke_count());
        let finished = self
            .reveal
            .as_ref()
            .is_some_and(|r| r.progress(now) >= stroke_count as f64);
        if self.reveal_cancel.is_cancelled() || finished {
            self.reveal = None;
        }
    }

    /// Update the canvas area, rebuilding the surface mapping on change.
    pub fn set_canvas_area(&mut self, area: Rect) {
        if area == self.canvas_area {
            return;
        }
        self.canvas_area = area;
        self.session.set_positioner(Positioner::new(PositionerOptions {
            width: f64::from(area.width),
            height: f64::from(area.height) * ROW_ASPECT,
            padding: self.config.display.padding,
        }));
    }

    /// Surface coordinates of a terminal cell's center. Cells outside the
    /// canvas give `None` unless `clamp` is set.
    pub fn surface_point(&self, column: u16, row: u16, clamp: bool) -> Option<Point> {
        let area = self.canvas_area;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside && !clamp {
            return None;
        }
        let column = column.clamp(area.x, area.x + area.width - 1) - area.x;
        let row = row.clamp(area.y, area.y + area.height - 1) - area.y;
        Some(Point::new(
            f64::from(column) + 0.5,
            (f64::from(row) + 0.5) * ROW_ASPECT,
        ))
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        match key.code {
            KeyCode::Char('s') => self.start_quiz(),
            KeyCode::Char('x') => {
                self.session.stop();
                self.set_message("Quiz stopped", MessageType::Info);
            }
            KeyCode::Char('n') | KeyCode::Right => self.next_character(),
            KeyCode::Char('p') | KeyCode::Left => self.prev_character(),
            KeyCode::Char('a') => self.animate(),
            KeyCode::Char('o') => {
                self.config.quiz.show_outline = !self.config.quiz.show_outline;
                let state = if self.config.quiz.show_outline { "on" } else { "off" };
                self.set_message(format!("Outline {state} (next quiz)"), MessageType::Info);
            }
            KeyCode::Char('b') => {
                self.config.quiz.accept_backwards_strokes = !self.config.quiz.accept_backwards_strokes;
                let state = if self.config.quiz.accept_backwards_strokes { "accepted" } else { "rejected" };
                self.set_message(format!("Backwards strokes {state} (next quiz)"), MessageType::Info);
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let result = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.surface_point(mouse.column, mouse.row, false) {
                    Some(point) => self.session.begin_stroke(point),
                    None => Ok(()),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => self.extend_stroke(mouse),
            MouseEventKind::Up(MouseButton::Left) => self.finish_stroke(mouse),
            _ => Ok(()),
        };
        if let Err(QuizError::NoActiveQuiz) = result {
            self.set_message("Press s to start a quiz", MessageType::Info);
        }
    }

    fn extend_stroke(&mut self, mouse: MouseEvent) -> QuizResult<()> {
        let Some(point) = self.surface_point(mouse.column, mouse.row, true) else {
            return Ok(());
        };
        // Repeated cells add nothing to the gesture.
        let last = self
            .session
            .user_stroke()
            .and_then(|s| s.external_points.last().copied());
        if last == Some(point) {
            return Ok(());
        }
        self.session.continue_stroke(point)
    }

    fn finish_stroke(&mut self, mouse: MouseEvent) -> QuizResult<()> {
        if self.session.user_stroke().is_none() {
            return Ok(());
        }
        self.extend_stroke(mouse)?;
        if let Some(outcome) = self.session.end_stroke()? {
            self.record(&outcome);
        }
        Ok(())
    }

    fn record(&mut self, outcome: &CheckOutcome) {
        tracing::debug!(
            accepted = outcome.accepted,
            backwards = outcome.result.meta.is_stroke_backwards,
            "stroke graded"
        );
        self.drain_events();
    }

    /// Apply quiz events forwarded by the session's handlers.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match serde_json::to_string(&event) {
                Ok(json) => tracing::info!(target: "quiz_events", event = %json),
                Err(e) => tracing::warn!(error = %e, "could not encode quiz event"),
            }
            match event {
                QuizEvent::Mistake(data) => {
                    let note = if data.is_backwards { " (drawn backwards)" } else { "" };
                    self.set_message(
                        format!(
                            "Not quite{note}: {} miss(es) on stroke {}",
                            data.mistakes_on_stroke,
                            data.stroke_index + 1
                        ),
                        MessageType::Warning,
                    );
                }
                QuizEvent::Hint { stroke_index } => {
                    self.hint = Some(stroke_index);
                    self.set_message(
                        format!("Hint: follow the highlighted stroke {}", stroke_index + 1),
                        MessageType::Info,
                    );
                }
                QuizEvent::CorrectStroke(data) => {
                    let positioner = self.session.positioner();
                    let canonical = data
                        .drawn_points
                        .iter()
                        .map(|&p| positioner.convert_external_point(p))
                        .collect();
                    self.drawn.push(canonical);
                    self.hint = None;
                    self.set_message(
                        format!(
                            "Stroke {} correct, {} to go",
                            data.stroke_index + 1,
                            data.strokes_remaining
                        ),
                        MessageType::Success,
                    );
                }
                QuizEvent::Complete(done) => {
                    self.set_message(
                        format!(
                            "{} complete with {} mistake(s). n: next, s: again",
                            done.character, done.total_mistakes
                        ),
                        MessageType::Success,
                    );
                }
            }
        }
    }

    fn reset_progress(&mut self) {
        self.drawn.clear();
        self.hint = None;
        // Stale events from a previous round.
        while self.events.try_recv().is_ok() {}
    }

    fn set_message(&mut self, text: impl Into<String>, kind: MessageType) {
        self.message = Some((text.into(), kind));
    }
}
