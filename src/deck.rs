use tracing::debug;

use crate::state::{Backdrop, DeckPhase};

/// The deck state machine. Owns the current index exclusively; gestures and
/// the fall animator only read or propose, never mutate it.
#[derive(Debug)]
pub struct DeckController {
    current: usize,
    total: usize, // deck length including the terminal blank
    phase: DeckPhase,
    backdrop: Backdrop,
}

impl DeckController {
    /// `total` is the deck length including the terminal blank slide, so it
    /// is always at least 1 for a well-formed deck.
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total: total.max(1),
            phase: DeckPhase::Active,
            backdrop: Backdrop::Intro,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn phase(&self) -> DeckPhase {
        self.phase
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == DeckPhase::Exhausted
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    /// The slide currently offered to the user, while one remains. The
    /// terminal blank is never offered.
    pub fn visible_slide(&self) -> Option<usize> {
        if self.phase == DeckPhase::Active && self.current + 1 < self.total {
            Some(self.current)
        } else {
            None
        }
    }

    /// Lookahead: the slide that will show once the current one falls.
    pub fn next_up(&self) -> Option<usize> {
        if self.phase == DeckPhase::Active && self.current + 2 < self.total {
            Some(self.current + 1)
        } else {
            None
        }
    }

    /// Apply a release. Returns the index of the card that falls, or `None`
    /// when the deck is exhausted and gestures are refused.
    ///
    /// Advances while a real slide exists after the immediate next one;
    /// once no real slide remains beyond the (possibly advanced) current
    /// index the deck transitions to `Exhausted` and the backdrop switches
    /// to the finished asset. The final card still falls.
    pub fn on_release(&mut self) -> Option<usize> {
        if self.is_exhausted() {
            return None;
        }

        let fell = self.current;
        if self.current + 1 < self.total - 1 {
            self.current += 1;
            debug!("advanced to slide index {}", self.current);
        }

        if self.current + 1 >= self.total - 1 {
            self.phase = DeckPhase::Exhausted;
            self.backdrop = Backdrop::Finished;
            debug!("deck exhausted at slide index {}", self.current);
        }

        Some(fell)
    }

    /// Generic advance, independent of gestures. Stepping past the end of
    /// the deck is clamped to `Exhausted`, never an error.
    pub fn advance(&mut self) {
        if self.current + 1 < self.total {
            self.current += 1;
        } else {
            self.phase = DeckPhase::Exhausted;
        }
    }

    /// Back to the first slide with the intro backdrop. Valid from any
    /// state, including `Exhausted`.
    pub fn reset(&mut self) {
        self.current = 0;
        self.phase = DeckPhase::Active;
        self.backdrop = Backdrop::Intro;
    }
}
