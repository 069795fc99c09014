//! A quiz session: the loaded character, the current quiz state and the
//! collaborators that observe it.

use crate::character::{Character, CharacterJson};
use crate::error::{QuizError, QuizResult};
use crate::event::{QuizEvent, QuizHandlers};
use crate::geometry::{self, Point};
use crate::matcher::{stroke_matches, StrokeMatchResult};
use crate::options::QuizOptions;
use crate::positioner::Positioner;
use crate::quiz::QuizState;
use crate::user_stroke::UserStroke;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tolerance, in surface units, used to simplify raw gestures.
pub const GESTURE_SIMPLIFY_TOLERANCE: f64 = 1.0;

/// Supplies raw stroke data for a character symbol.
pub trait CharacterDataSource {
    fn load(&self, symbol: &str) -> QuizResult<CharacterJson>;
}

/// Drives the timed stroke-reveal animation; the session only ever cancels it.
pub trait StrokeAnimator: Send {
    fn cancel(&self);
}

/// What a graded gesture did.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub result: StrokeMatchResult,
    pub accepted: bool,
    pub events: Vec<QuizEvent>,
}

type Subscriber = Box<dyn FnMut(&QuizState) + Send>;

/// Owns one learner's quiz. Every mutation goes through `&mut self`, so
/// gestures for a session are serialized by construction.
pub struct QuizSession {
    positioner: Positioner,
    state: QuizState,
    handlers: QuizHandlers,
    subscribers: Vec<Subscriber>,
    animator: Option<Box<dyn StrokeAnimator>>,
    user_stroke: Option<UserStroke>,
    next_stroke_id: u32,
}

impl QuizSession {
    pub fn new(positioner: Positioner) -> Self {
        Self {
            positioner,
            state: QuizState::default(),
            handlers: QuizHandlers::default(),
            subscribers: Vec::new(),
            animator: None,
            user_stroke: None,
            next_stroke_id: 0,
        }
    }

    pub fn with_animator(mut self, animator: impl StrokeAnimator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    /// Register an observer called with every new state snapshot.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&QuizState) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn character(&self) -> Option<&Arc<Character>> {
        self.state.character()
    }

    pub fn positioner(&self) -> &Positioner {
        &self.positioner
    }

    /// Replace the surface mapping, e.g. after the drawing area is resized.
    /// Any stroke in progress is dropped since its canonical points are stale.
    pub fn set_positioner(&mut self, positioner: Positioner) {
        self.positioner = positioner;
        self.user_stroke = None;
    }

    /// The gesture currently being drawn, if any.
    pub fn user_stroke(&self) -> Option<&UserStroke> {
        self.user_stroke.as_ref()
    }

    /// Install a character, ending any quiz on the previous one.
    pub fn load_character(&mut self, character: impl Into<Arc<Character>>) {
        let character = character.into();
        info!(symbol = %character.symbol, strokes = character.stroke_count(), "character loaded");
        self.user_stroke = None;
        self.publish(
            QuizState::Inactive {
                character: Some(character),
            },
            &[],
        );
    }

    /// Fetch, parse and install `symbol`. On failure the session is left as
    /// it was and the error is returned to the caller.
    pub fn load_from(
        &mut self,
        source: &dyn CharacterDataSource,
        symbol: &str,
    ) -> QuizResult<Arc<Character>> {
        let raw = source.load(symbol).map_err(|e| {
            warn!(symbol, error = %e, "character data unavailable");
            e
        })?;
        let character = Arc::new(Character::parse(symbol, &raw)?);
        self.load_character(Arc::clone(&character));
        Ok(character)
    }

    /// Start a round. Without a loaded character this is a reported no-op.
    pub fn start(&mut self, options: QuizOptions, handlers: QuizHandlers) -> QuizResult<()> {
        let next = match self.state.start(options) {
            Ok(next) => next,
            Err(e) => {
                warn!("quiz start requested before a character was loaded");
                return Err(e);
            }
        };
        if let Some(animator) = &self.animator {
            animator.cancel();
        }
        self.handlers = handlers;
        self.user_stroke = None;
        debug!(index = next.index(), "quiz started");
        self.publish(next, &[]);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.user_stroke = None;
        let next = self.state.stop();
        self.publish(next, &[]);
    }

    /// Grade a complete gesture given in drawing-surface coordinates.
    pub fn check(&mut self, points: &[Point]) -> QuizResult<CheckOutcome> {
        let id = self.take_stroke_id();
        self.grade(id, points)
    }

    /// Begin a gesture at `external`.
    pub fn begin_stroke(&mut self, external: Point) -> QuizResult<()> {
        self.require_active()?;
        let id = self.take_stroke_id();
        let point = self.positioner.convert_external_point(external);
        self.user_stroke = Some(UserStroke::new(id, point, external));
        Ok(())
    }

    /// Extend the gesture in progress. Ignored when no gesture was begun.
    pub fn continue_stroke(&mut self, external: Point) -> QuizResult<()> {
        self.require_active()?;
        let point = self.positioner.convert_external_point(external);
        if let Some(stroke) = &mut self.user_stroke {
            stroke.append_point(point, external);
        }
        Ok(())
    }

    /// Finish the gesture in progress and grade it. A gesture with a single
    /// point is treated as a tap and discarded without grading.
    pub fn end_stroke(&mut self) -> QuizResult<Option<CheckOutcome>> {
        self.require_active()?;
        let Some(stroke) = self.user_stroke.take() else {
            return Ok(None);
        };
        if stroke.len() < 2 {
            debug!(stroke = stroke.id, "ignoring single-point gesture");
            return Ok(None);
        }
        self.grade(stroke.id, &stroke.external_points).map(Some)
    }

    fn require_active(&self) -> QuizResult<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            debug!("gesture ignored: no active quiz");
            Err(QuizError::NoActiveQuiz)
        }
    }

    fn take_stroke_id(&mut self) -> u32 {
        let id = self.next_stroke_id;
        self.next_stroke_id = self.next_stroke_id.wrapping_add(1);
        id
    }

    fn grade(&mut self, id: u32, points: &[Point]) -> QuizResult<CheckOutcome> {
        let Some(quiz) = self.state.active() else {
            debug!("check ignored: no active quiz");
            return Err(QuizError::NoActiveQuiz);
        };

        let external = geometry::simplify(points, GESTURE_SIMPLIFY_TOLERANCE, false);
        let canonical = external
            .iter()
            .map(|&p| self.positioner.convert_external_point(p))
            .collect();
        let user_stroke = UserStroke::from_points(id, canonical, external);
        let result = stroke_matches(
            &user_stroke,
            &quiz.character,
            quiz.index,
            &quiz.options.match_options(),
        );

        let transition = self.state.attempt(result, &user_stroke.external_points)?;
        let accepted = transition
            .events
            .iter()
            .any(|e| matches!(e, QuizEvent::CorrectStroke(_)));
        if let Some(QuizEvent::Complete(done)) = transition.events.last() {
            info!(symbol = %done.character, total_mistakes = done.total_mistakes, "quiz complete");
        }

        self.publish(transition.state, &transition.events);
        Ok(CheckOutcome {
            result,
            accepted,
            events: transition.events,
        })
    }

    /// Install `state`, then notify handlers and subscribers.
    fn publish(&mut self, state: QuizState, events: &[QuizEvent]) {
        self.state = state;
        for event in events {
            self.handlers.dispatch(event);
        }
        for subscriber in &mut self.subscribers {
            subscriber(&self.state);
        }
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("positioner", &self.positioner)
            .field("state", &self.state)
            .field("handlers", &self.handlers)
            .field("subscribers", &self.subscribers.len())
            .field("user_stroke", &self.user_stroke)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positioner::PositionerOptions;
    use hanzi_testing::generators::gesture;
    use hanzi_testing::Fixtures;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Mutex};

    /// 1024x1024 surface with no padding: canonical = (x, 900 - y).
    fn session() -> QuizSession {
        QuizSession::new(Positioner::new(PositionerOptions {
            width: 1024.0,
            height: 1024.0,
            padding: 0.0,
        }))
    }

    fn loaded(json: &str) -> QuizSession {
        let mut session = session();
        session.load_character(Character::from_json("x", json).unwrap());
        session
    }

    /// A stroke's medians in surface coordinates.
    fn surface_medians(session: &QuizSession, index: usize) -> Vec<Point> {
        let character = session.character().unwrap();
        character.strokes[index]
            .points
            .iter()
            .map(|&p| session.positioner().convert_internal_point(p))
            .collect()
    }

    struct CountingAnimator(Arc<AtomicUsize>);

    impl StrokeAnimator for CountingAnimator {
        fn cancel(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct MapSource;

    impl CharacterDataSource for MapSource {
        fn load(&self, symbol: &str) -> QuizResult<CharacterJson> {
            match symbol {
                "二" => CharacterJson::from_json(Fixtures::TWO),
                "bad" => CharacterJson::from_json("{\"strokes\": []}"),
                _ => Err(QuizError::LoadFailed(format!("{symbol} not found"))),
            }
        }
    }

    #[test]
    fn test_start_without_character() {
        let mut session = session();
        assert_eq!(
            session.start(QuizOptions::default(), QuizHandlers::new()),
            Err(QuizError::NotReady)
        );
        assert!(!session.state().is_active());
    }

    #[test]
    fn test_check_while_inactive() {
        let mut session = loaded(Fixtures::TWO);
        let points = surface_medians(&session, 0);
        assert_eq!(session.check(&points), Err(QuizError::NoActiveQuiz));
        assert_eq!(session.begin_stroke(points[0]), Err(QuizError::NoActiveQuiz));
    }

    #[test]
    fn test_start_cancels_animation() {
        let cancels = Arc::new(AtomicUsize::new(0));
        let mut session = session().with_animator(CountingAnimator(Arc::clone(&cancels)));
        session.load_character(Character::from_json("x", Fixtures::TWO).unwrap());
        session.start(QuizOptions::default(), QuizHandlers::new()).unwrap();
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_two_stroke_scenario() {
        let mut session = loaded(Fixtures::TWO);
        let mistakes = Arc::new(Mutex::new(Vec::new()));
        let completions = Arc::new(Mutex::new(Vec::new()));
        let handlers = {
            let mistakes = Arc::clone(&mistakes);
            let completions = Arc::clone(&completions);
            QuizHandlers::new()
                .on_mistake(move |data| mistakes.lock().unwrap().push(data.clone()))
                .on_complete(move |data| completions.lock().unwrap().push(data.clone()))
        };
        session.start(QuizOptions::default(), handlers).unwrap();

        let far = [Point::new(5000.0, 5000.0), Point::new(5200.0, 5000.0)];
        let outcome = session.check(&far).unwrap();
        assert!(!outcome.result.is_match);
        assert!(!outcome.accepted);
        assert_eq!(session.state().active().unwrap().mistakes_on(0), 1);

        for index in 0..2 {
            let points = surface_medians(&session, index);
            let outcome = session.check(&points).unwrap();
            assert!(outcome.result.is_match, "stroke {index} rejected");
            assert!(outcome.accepted);
        }

        assert!(!session.state().is_active());
        let mistakes = mistakes.lock().unwrap();
        assert_eq!(mistakes.len(), 1);
        assert_eq!(mistakes[0].stroke_index, 0);
        assert_eq!(mistakes[0].strokes_remaining, 2);
        let completions = completions.lock().unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].total_mistakes, 1);
    }

    #[test]
    fn test_every_stroke_correct_completes() {
        let mut session = loaded(Fixtures::THREE);
        let (tx, rx) = mpsc::channel();
        session.start(QuizOptions::default(), QuizHandlers::forward_to(tx)).unwrap();
        for index in 0..3 {
            let points = surface_medians(&session, index);
            session.check(&points).unwrap();
        }
        let events: Vec<QuizEvent> = rx.try_iter().collect();
        let completions: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                QuizEvent::Complete(data) => Some(data),
                _ => None,
            })
            .collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].total_mistakes, 0);
        assert_eq!(events.len(), 4);
        assert!(!session.state().is_active());
    }

    #[test]
    fn test_incremental_gesture() {
        let mut session = loaded(Fixtures::TWO);
        session.start(QuizOptions::default(), QuizHandlers::new()).unwrap();

        let points = surface_medians(&session, 0);
        session.begin_stroke(points[0]).unwrap();
        for &p in &points[1..] {
            session.continue_stroke(p).unwrap();
        }
        let in_progress = session.user_stroke().unwrap();
        assert_eq!(in_progress.len(), points.len());
        assert_eq!(in_progress.points.len(), in_progress.external_points.len());

        let outcome = session.end_stroke().unwrap().unwrap();
        assert!(outcome.accepted);
        assert!(session.user_stroke().is_none());
        assert_eq!(session.state().index(), 1);
    }

    #[test]
    fn test_tap_is_not_graded() {
        let mut session = loaded(Fixtures::TWO);
        session.start(QuizOptions::default(), QuizHandlers::new()).unwrap();
        session.begin_stroke(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(session.end_stroke(), Ok(None));
        assert!(session.state().active().unwrap().mistakes.is_empty());
        assert_eq!(session.end_stroke(), Ok(None));
    }

    #[test]
    fn test_subscribers_see_whole_snapshots() {
        let mut session = loaded(Fixtures::TWO);
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            session.subscribe(move |state| seen.lock().unwrap().push(state.clone()));
        }
        session.start(QuizOptions::default(), QuizHandlers::new()).unwrap();
        session.check(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).unwrap();
        session.stop();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].index(), 0);
        assert_eq!(seen[1].active().unwrap().mistakes_on(0), 1);
        assert!(!seen[2].is_active());
    }

    #[test]
    fn test_load_from_source() {
        let mut session = session();
        let character = session.load_from(&MapSource, "二").unwrap();
        assert_eq!(character.stroke_count(), 2);

        assert!(matches!(
            session.load_from(&MapSource, "missing"),
            Err(QuizError::LoadFailed(_))
        ));
        assert!(matches!(
            session.load_from(&MapSource, "bad"),
            Err(QuizError::MalformedCharacterData(_))
        ));
        // Failed loads keep the previous character.
        assert_eq!(session.character().unwrap().symbol, "二");
    }

    #[test]
    fn test_reload_resets_quiz() {
        let mut session = loaded(Fixtures::TWO);
        session.start(QuizOptions::default(), QuizHandlers::new()).unwrap();
        session.load_character(Character::from_json("y", Fixtures::THREE).unwrap());
        assert!(!session.state().is_active());
        assert_eq!(session.character().unwrap().symbol, "y");
    }

    proptest! {
        #[test]
        fn prop_any_gesture_is_graded(line in gesture(1..20)) {
            let mut session = loaded(Fixtures::TWO);
            session.start(QuizOptions::default(), QuizHandlers::new()).unwrap();
            let points: Vec<Point> = line.into_iter().map(Point::from).collect();

            let outcome = session.check(&points);
            prop_assert!(outcome.is_ok());
            let outcome = outcome.unwrap();

            let quiz = session.state().active().cloned();
            prop_assert!(quiz.is_some());
            let quiz = quiz.unwrap();
            if outcome.accepted {
                prop_assert_eq!(quiz.index, 1);
                prop_assert_eq!(quiz.total_mistakes(), 0);
            } else {
                prop_assert_eq!(quiz.index, 0);
                prop_assert_eq!(quiz.mistakes_on(0), 1);
            }
        }
    }
}
