#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DeckPhase {
    Active,    // Accepting gestures, real slides remain
    Exhausted, // No real slides left, gestures are refused
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Backdrop {
    Intro,    // Shown while the deck still has slides
    Finished, // Shown once the deck is exhausted
}
