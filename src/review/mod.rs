//! Review session logic: a deck cursor with a two-sided flip, plus the
//! presentational motion and gesture layers that drive it. Logical state
//! (`index`, `flipped`) lives in [`ReviewDeck`] and nowhere else; the motion
//! phases in [`motion`] are a projection of it.

mod gesture;
mod loader;
pub mod motion;

pub use gesture::{DOUBLE_TAP_WINDOW_MS, GestureAction, GestureRecognizer, Touch};
pub use loader::LoadGuard;

use motion::{CardMotion, SlideFrom};

use crate::types::Flashcard;

/// Cursor over a fixed, non-empty card sequence. All transitions are total:
/// out-of-range navigation is a guarded no-op, never an error.
#[derive(Debug)]
pub struct ReviewDeck {
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
}

impl ReviewDeck {
    /// Returns None for an empty sequence; that case is [`SessionState::Empty`],
    /// not a deck.
    pub fn new(cards: Vec<Flashcard>) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        Some(Self {
            cards,
            index: 0,
            flipped: false,
        })
    }

    pub fn current(&self) -> &Flashcard {
        &self.cards[self.index]
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// 1-based position and total, for a "3 / 12" progress display.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.index + 1, self.cards.len())
    }

    #[must_use]
    pub fn at_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn at_last(&self) -> bool {
        self.index == self.cards.len() - 1
    }

    /// Advances to the next card, resetting to the question face.
    /// Returns false (and changes nothing) when already at the last card.
    pub fn next(&mut self) -> bool {
        if self.at_last() {
            return false;
        }
        self.index += 1;
        self.flipped = false;
        true
    }

    /// Steps back to the previous card, resetting to the question face.
    /// Returns false (and changes nothing) when already at the first card.
    pub fn previous(&mut self) -> bool {
        if self.at_first() {
            return false;
        }
        self.index -= 1;
        self.flipped = false;
        true
    }

    /// Toggles between question and answer face; returns the new state.
    pub fn flip(&mut self) -> bool {
        self.flipped = !self.flipped;
        self.flipped
    }
}

/// Lifecycle of a review screen. `Loading` precedes deck initialization;
/// `Empty` is the explicit "no cards" terminal display state; a data-fetch
/// failure surfaces as `Failed`. The deck itself cannot fail.
#[derive(Debug)]
pub enum SessionState {
    Loading,
    Empty,
    Failed(String),
    Active(ReviewSession),
}

impl SessionState {
    pub fn from_fetch(result: Result<Vec<Flashcard>, String>, view_width: f32) -> Self {
        match result {
            Ok(cards) => match ReviewDeck::new(cards) {
                Some(deck) => Self::Active(ReviewSession::new(deck, view_width)),
                None => Self::Empty,
            },
            Err(message) => Self::Failed(message),
        }
    }
}

/// A deck wired to its motion and gesture layers. Gestures mutate the deck;
/// the deck's transitions drive the motion; motion never feeds back.
#[derive(Debug)]
pub struct ReviewSession {
    deck: ReviewDeck,
    motion: CardMotion,
    gestures: GestureRecognizer,
    view_width: f32,
}

impl ReviewSession {
    pub fn new(deck: ReviewDeck, view_width: f32) -> Self {
        Self {
            deck,
            motion: CardMotion::new(view_width),
            gestures: GestureRecognizer::new(),
            view_width,
        }
    }

    pub fn deck(&self) -> &ReviewDeck {
        &self.deck
    }

    pub fn motion(&self) -> &CardMotion {
        &self.motion
    }

    pub fn next(&mut self) {
        if self.deck.next() {
            self.motion.reset_flip();
            self.motion.begin_slide(SlideFrom::Right);
        }
    }

    pub fn previous(&mut self) {
        if self.deck.previous() {
            self.motion.reset_flip();
            self.motion.begin_slide(SlideFrom::Left);
        }
    }

    pub fn flip(&mut self) {
        let to_answer = self.deck.flip();
        self.motion.begin_flip(to_answer);
    }

    /// Routes a touch through gesture disambiguation into a transition.
    pub fn handle_touch(&mut self, touch: Touch) {
        match self.gestures.recognize(touch, self.view_width) {
            Some(GestureAction::Flip) => self.flip(),
            Some(GestureAction::Next) => self.next(),
            Some(GestureAction::Previous) => self.previous(),
            None => {}
        }
    }

    /// Advances animations; call once per frame.
    pub fn tick(&mut self, dt: f32) {
        self.motion.tick(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Flashcard {
        Flashcard {
            id: id.to_string(),
            set_id: "set".to_string(),
            author_id: "author".to_string(),
            front: format!("{id}-front"),
            back: format!("{id}-back"),
        }
    }

    fn deck(n: usize) -> ReviewDeck {
        ReviewDeck::new((0..n).map(|i| card(&format!("c{i}"))).collect()).unwrap()
    }

    #[test]
    fn empty_sequence_is_not_a_deck() {
        assert!(ReviewDeck::new(Vec::new()).is_none());
        assert!(matches!(
            SessionState::from_fetch(Ok(Vec::new()), 400.0),
            SessionState::Empty
        ));
    }

    #[test]
    fn fetch_failure_surfaces_as_failed() {
        let state = SessionState::from_fetch(Err("network down".to_string()), 400.0);
        match state {
            SessionState::Failed(message) => assert_eq!(message, "network down"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn next_is_noop_at_last_index() {
        let mut d = deck(3);
        assert!(d.next());
        assert!(d.next());
        assert_eq!(d.index(), 2);

        assert!(!d.next());
        assert_eq!(d.index(), 2);
    }

    #[test]
    fn previous_is_noop_at_first_index() {
        let mut d = deck(3);
        assert!(!d.previous());
        assert_eq!(d.index(), 0);
    }

    #[test]
    fn single_card_deck_never_moves() {
        let mut d = deck(1);
        assert!(!d.next());
        assert!(!d.previous());
        assert_eq!(d.index(), 0);
    }

    #[test]
    fn flip_toggles_exactly_once_per_call() {
        let mut d = deck(2);
        assert!(!d.flipped());

        for i in 1..=10 {
            d.flip();
            assert_eq!(d.flipped(), i % 2 == 1);
        }
        // Even number of calls from the initial state lands on false.
        assert!(!d.flipped());
    }

    #[test]
    fn navigation_always_resets_flip() {
        let mut d = deck(3);

        d.flip();
        assert!(d.flipped());
        d.next();
        assert!(!d.flipped());

        d.flip();
        d.previous();
        assert!(!d.flipped());

        // Reset applies even when already unflipped.
        d.next();
        assert!(!d.flipped());
    }

    #[test]
    fn progress_is_one_based() {
        let mut d = deck(3);
        assert_eq!(d.progress(), (1, 3));
        d.next();
        assert_eq!(d.progress(), (2, 3));
    }

    #[test]
    fn session_routes_gestures() {
        let mut session = ReviewSession::new(deck(3), 400.0);

        // Long press on the right half advances.
        session.handle_touch(Touch::LongPress { x: 300.0 });
        assert_eq!(session.deck().index(), 1);

        // Long press on the left half goes back.
        session.handle_touch(Touch::LongPress { x: 10.0 });
        assert_eq!(session.deck().index(), 0);

        // Double tap flips.
        session.handle_touch(Touch::Tap { at_ms: 1_000 });
        assert!(!session.deck().flipped());
        session.handle_touch(Touch::Tap { at_ms: 1_100 });
        assert!(session.deck().flipped());
    }

    #[test]
    fn session_navigation_starts_slide_and_resets_flip_phase() {
        let mut session = ReviewSession::new(deck(2), 400.0);

        session.flip();
        session.next();
        assert!(!session.deck().flipped());
        assert_eq!(session.motion().flip_phase(), 0.0);
        // Next slides in from the right edge.
        assert_eq!(session.motion().slide_offset(), 400.0);

        session.previous();
        assert_eq!(session.motion().slide_offset(), -400.0);
    }
}
