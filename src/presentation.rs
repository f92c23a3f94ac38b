use crate::audio::{AudioPlayer, AudioSink};
use crate::deck::DeckController;
use crate::fall::{FallAnimator, FallingSlide};
use crate::gesture::{GestureTracker, Point};
use crate::state::Backdrop;

/// Composition root for the deck. The shell feeds it input events and a
/// frame delta, and reads back everything it needs to draw. All deck
/// semantics live here and below; nothing in this module touches the
/// renderer.
pub struct Presentation<S> {
    deck: DeckController,
    gesture: GestureTracker,
    fall: FallAnimator,
    audio: AudioPlayer<S>,
}

impl<S: AudioSink> Presentation<S> {
    /// `deck_len` includes the terminal blank slide.
    pub fn new(deck_len: usize, sink: S, muted: bool) -> Self {
        Self {
            deck: DeckController::new(deck_len),
            gesture: GestureTracker::new(),
            fall: FallAnimator::new(),
            audio: AudioPlayer::new(sink, muted),
        }
    }

    pub fn on_drag_start(&mut self) {
        if self.deck.is_exhausted() {
            return;
        }
        self.gesture.on_drag_start();
    }

    pub fn on_drag_move(&mut self, dx: f32, dy: f32) {
        if self.deck.is_exhausted() {
            return;
        }
        self.gesture.on_drag_move(dx, dy);
    }

    /// A release is applied synchronously: the deck transition, the fall
    /// spawn, the gesture reset and the audio notification all happen
    /// before the next input event can be observed.
    pub fn on_drag_end(&mut self, dx: f32, dy: f32) {
        if self.deck.is_exhausted() {
            return;
        }
        let Some(release) = self.gesture.on_drag_end(dx, dy) else {
            return; // snap-back, no transition
        };

        if let Some(fell) = self.deck.on_release() {
            self.fall
                .spawn(fell, release.direction, release.position, release.rotation);
            self.gesture.reset();
            self.audio.on_progress(self.deck.current_index());
        } else {
            self.gesture.reset();
        }
    }

    /// Generic advance, also reachable without a gesture (keyboard).
    pub fn advance(&mut self) {
        self.deck.advance();
        self.gesture.reset();
        self.audio.on_progress(self.deck.current_index());
    }

    /// Drives the fall timer. Called once per frame.
    pub fn update(&mut self, dt: f32) {
        self.fall.update(dt);
    }

    /// Back to the first slide. Audio state deliberately survives; a card
    /// already falling keeps falling until its own timer clears it.
    pub fn reset(&mut self) {
        self.deck.reset();
        self.gesture.reset();
    }

    pub fn toggle_mute(&mut self) {
        self.audio.toggle_mute();
    }

    pub fn visible_slide(&self) -> Option<usize> {
        self.deck.visible_slide()
    }

    pub fn next_up(&self) -> Option<usize> {
        self.deck.next_up()
    }

    pub fn falling(&self) -> Option<&FallingSlide> {
        self.fall.active()
    }

    pub fn backdrop(&self) -> Backdrop {
        self.deck.backdrop()
    }

    pub fn current_index(&self) -> usize {
        self.deck.current_index()
    }

    pub fn is_exhausted(&self) -> bool {
        self.deck.is_exhausted()
    }

    pub fn gesture_position(&self) -> Point {
        self.gesture.position()
    }

    pub fn gesture_rotation(&self) -> f32 {
        self.gesture.rotation()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }

    pub fn is_playing(&self) -> bool {
        self.audio.is_playing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioError, AudioSink};
    use crate::gesture::FallDirection;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct CountingSink {
        play_calls: Rc<RefCell<usize>>,
    }

    impl AudioSink for CountingSink {
        fn play_looped(&mut self) -> Result<(), AudioError> {
            *self.play_calls.borrow_mut() += 1;
            Ok(())
        }

        fn set_muted(&mut self, _muted: bool) {}
    }

    fn drag_and_release(p: &mut Presentation<CountingSink>, dx: f32, dy: f32) {
        p.on_drag_start();
        p.on_drag_move(dx, dy);
        p.on_drag_end(dx, dy);
    }

    fn deck_of_three_real_slides() -> Presentation<CountingSink> {
        Presentation::new(4, CountingSink::default(), false)
    }

    #[test]
    fn full_run_through_a_three_slide_deck() {
        let mut p = deck_of_three_real_slides();
        assert_eq!(p.visible_slide(), Some(0));
        assert_eq!(p.next_up(), Some(1));

        // First release: well past the threshold, falls right.
        drag_and_release(&mut p, 200.0, 40.0);
        let falling = p.falling().unwrap();
        assert_eq!(falling.slide_index, 0);
        assert_eq!(falling.direction, FallDirection::Right);
        assert_eq!(falling.release_rotation, 20.0);
        assert_eq!(p.current_index(), 1);
        assert!(!p.is_exhausted());
        assert!(p.is_playing());

        // Second release: negative offset falls left and exhausts the deck.
        drag_and_release(&mut p, -50.0, 10.0);
        let falling = p.falling().unwrap();
        assert_eq!(falling.slide_index, 1);
        assert_eq!(falling.direction, FallDirection::Left);
        assert_eq!(p.current_index(), 2);
        assert!(p.is_exhausted());
        assert_eq!(p.backdrop(), Backdrop::Finished);
        assert_eq!(p.visible_slide(), None);
    }

    #[test]
    fn snap_back_leaves_the_deck_alone() {
        let mut p = deck_of_three_real_slides();
        p.on_drag_start();
        p.on_drag_move(120.0, -5.0);
        p.on_drag_end(0.0, -5.0);

        assert_eq!(p.current_index(), 0);
        assert!(p.falling().is_none());
        assert_eq!(p.gesture_position(), Point::default());
        assert_eq!(p.gesture_rotation(), 0.0);
        assert!(!p.is_playing());
    }

    #[test]
    fn gestures_are_refused_while_exhausted() {
        let mut p = deck_of_three_real_slides();
        drag_and_release(&mut p, 200.0, 0.0);
        drag_and_release(&mut p, 200.0, 0.0);
        assert!(p.is_exhausted());

        p.on_drag_start();
        assert!(!p.is_dragging());
        p.on_drag_move(300.0, 0.0);
        assert_eq!(p.gesture_position(), Point::default());

        let index_before = p.current_index();
        p.on_drag_end(300.0, 0.0);
        assert_eq!(p.current_index(), index_before);
    }

    #[test]
    fn reset_recovers_from_exhaustion_but_keeps_audio() {
        let play_calls = Rc::new(RefCell::new(0usize));
        let mut p = Presentation::new(
            4,
            CountingSink {
                play_calls: play_calls.clone(),
            },
            false,
        );

        drag_and_release(&mut p, 200.0, 0.0);
        drag_and_release(&mut p, 200.0, 0.0);
        assert!(p.is_exhausted());
        assert!(p.is_playing());

        p.reset();
        assert_eq!(p.current_index(), 0);
        assert!(!p.is_exhausted());
        assert_eq!(p.backdrop(), Backdrop::Intro);
        assert!(p.is_playing());

        // Progress after a reset does not restart the stream.
        drag_and_release(&mut p, 200.0, 0.0);
        assert_eq!(*play_calls.borrow(), 1);
    }

    #[test]
    fn gesture_resets_on_every_transition() {
        let mut p = deck_of_three_real_slides();
        drag_and_release(&mut p, 180.0, 25.0);
        assert_eq!(p.gesture_position(), Point::default());
        assert_eq!(p.gesture_rotation(), 0.0);

        p.on_drag_start();
        p.on_drag_move(-90.0, 0.0);
        p.advance();
        assert_eq!(p.gesture_position(), Point::default());
    }

    #[test]
    fn fast_double_release_tracks_a_single_falling_card() {
        let mut p = deck_of_three_real_slides();
        drag_and_release(&mut p, 200.0, 0.0);
        p.update(0.5);
        drag_and_release(&mut p, -40.0, 0.0);

        assert_eq!(p.falling().unwrap().slide_index, 1);
        p.update(1.9);
        assert!(p.falling().is_some());
        p.update(0.2);
        assert!(p.falling().is_none());
    }

    #[test]
    fn falling_card_outlives_a_reset() {
        let mut p = deck_of_three_real_slides();
        drag_and_release(&mut p, 200.0, 0.0);
        p.reset();
        assert!(p.falling().is_some());
        p.update(2.1);
        assert!(p.falling().is_none());
    }
}
