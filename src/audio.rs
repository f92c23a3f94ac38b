use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio playback denied: {reason}")]
    PlaybackDenied { reason: String },
}

/// What the soundtrack needs from the environment. The shell backs this
/// with a raylib music stream; tests use recording stubs.
pub trait AudioSink {
    fn play_looped(&mut self) -> Result<(), AudioError>;
    fn set_muted(&mut self, muted: bool);
}

/// Owns the soundtrack state for the lifetime of the run. Playback starts
/// once deck progress begins and loops indefinitely; mute is independent of
/// playback and survives deck resets.
pub struct AudioPlayer<S> {
    sink: S,
    playing: bool,
    muted: bool,
}

impl<S: AudioSink> AudioPlayer<S> {
    pub fn new(mut sink: S, muted: bool) -> Self {
        if muted {
            sink.set_muted(true);
        }
        Self {
            sink,
            playing: false,
            muted,
        }
    }

    /// Start looped playback the first time the deck moves past the first
    /// slide. Playback refusals are logged and swallowed; the presentation
    /// carries on without sound.
    pub fn on_progress(&mut self, current_index: usize) {
        if current_index == 0 || self.playing {
            return;
        }
        match self.sink.play_looped() {
            Ok(()) => {
                self.playing = true;
                info!("soundtrack started");
            }
            Err(e) => warn!("soundtrack could not start: {e}"),
        }
    }

    /// Flips the muted flag and applies it to the sink. Never touches
    /// play/pause state.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.sink.set_muted(self.muted);
        info!("soundtrack {}", if self.muted { "muted" } else { "unmuted" });
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct SinkLog {
        play_calls: usize,
        mute_calls: Vec<bool>,
        deny: bool,
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Rc<RefCell<SinkLog>>);

    impl AudioSink for RecordingSink {
        fn play_looped(&mut self) -> Result<(), AudioError> {
            let mut log = self.0.borrow_mut();
            log.play_calls += 1;
            if log.deny {
                Err(AudioError::PlaybackDenied {
                    reason: String::from("denied by policy"),
                })
            } else {
                Ok(())
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.0.borrow_mut().mute_calls.push(muted);
        }
    }

    #[test]
    fn playback_starts_once_progress_begins() {
        let sink = RecordingSink::default();
        let log = sink.0.clone();
        let mut player = AudioPlayer::new(sink, false);

        player.on_progress(0);
        assert!(!player.is_playing());
        assert_eq!(log.borrow().play_calls, 0);

        player.on_progress(1);
        assert!(player.is_playing());

        // Already playing: no second start.
        player.on_progress(2);
        assert_eq!(log.borrow().play_calls, 1);
    }

    #[test]
    fn denied_playback_is_swallowed_and_retried_on_next_progress() {
        let sink = RecordingSink::default();
        let log = sink.0.clone();
        log.borrow_mut().deny = true;
        let mut player = AudioPlayer::new(sink, false);

        player.on_progress(1);
        assert!(!player.is_playing());

        log.borrow_mut().deny = false;
        player.on_progress(2);
        assert!(player.is_playing());
        assert_eq!(log.borrow().play_calls, 2);
    }

    #[test]
    fn mute_toggle_never_touches_playback() {
        let sink = RecordingSink::default();
        let log = sink.0.clone();
        let mut player = AudioPlayer::new(sink, false);
        player.on_progress(1);

        player.toggle_mute();
        assert!(player.is_muted());
        assert!(player.is_playing());

        player.toggle_mute();
        assert!(!player.is_muted());
        assert_eq!(log.borrow().mute_calls, vec![true, false]);
        assert_eq!(log.borrow().play_calls, 1);
    }

    #[test]
    fn initial_mute_is_applied_to_the_sink() {
        let sink = RecordingSink::default();
        let log = sink.0.clone();
        let player = AudioPlayer::new(sink, true);

        assert!(player.is_muted());
        assert_eq!(log.borrow().mute_calls, vec![true]);
    }
}
