//! Playback session
//!
//! One owned object per narration run: the timestamps and header markers it
//! plays against, the highlight cursor, the header-scroll guard and the
//! phase. Dropping or resetting the session is the whole teardown.
//!
//! The session never touches the host. `tick` takes the audio position and
//! reports what changed; the controller applies it.

use narration_core::{HeaderMarker, WordTimestamp};

use crate::resolver::{IntervalResolver, Resolution};
use crate::state::{PlaybackState, SessionPhase};

/// Highlight cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Heading reached for the first time this session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderReached {
    pub ordinal: usize,
    pub marker: HeaderMarker,
}

/// What one tick changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickUpdate {
    pub highlight: Option<HighlightChange>,
    pub header: Option<HeaderReached>,
    /// Playback passed the last word; ticking should stop
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct PlaybackSession {
    timestamps: Vec<WordTimestamp>,
    headers: Vec<HeaderMarker>,
    state: PlaybackState,
    resolver: IntervalResolver,
    phase: SessionPhase,
}

impl PlaybackSession {
    pub fn new(timestamps: Vec<WordTimestamp>, headers: Vec<HeaderMarker>) -> Self {
        Self {
            timestamps,
            headers,
            state: PlaybackState::default(),
            resolver: IntervalResolver::new(),
            phase: SessionPhase::Idle,
        }
    }

    /// Session that plays audio with no highlighting or auto-scroll
    pub fn audio_only() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_word(&self) -> Option<usize> {
        self.state.current_word
    }

    pub fn timestamps(&self) -> &[WordTimestamp] {
        &self.timestamps
    }

    pub fn has_highlighting(&self) -> bool {
        !self.timestamps.is_empty()
    }

    pub fn start(&mut self) {
        self.clear();
        self.phase = SessionPhase::Playing;
    }

    pub fn pause(&mut self) -> bool {
        self.transition(SessionPhase::Playing, SessionPhase::Paused)
    }

    pub fn resume(&mut self) -> bool {
        self.transition(SessionPhase::Paused, SessionPhase::Playing)
    }

    /// Back to idle; returns the highlight that was cleared
    pub fn stop(&mut self) -> Option<usize> {
        let cleared = self.clear();
        self.phase = SessionPhase::Idle;
        cleared
    }

    /// Audio failure; returns the highlight that was cleared
    pub fn fail(&mut self) -> Option<usize> {
        let cleared = self.clear();
        self.phase = SessionPhase::Errored;
        cleared
    }

    /// Audio reached its end before the last word was passed
    pub fn complete(&mut self) -> Option<usize> {
        let cleared = self.clear();
        self.phase = SessionPhase::Completed;
        cleared
    }

    /// Advance to audio position `t`, in seconds
    pub fn tick(&mut self, t: f64) -> TickUpdate {
        let mut update = TickUpdate::default();
        if self.phase != SessionPhase::Playing {
            return update;
        }

        match self.resolver.resolve(&self.timestamps, t) {
            Resolution::BeforeStart => self.set_word(None, &mut update),
            Resolution::Word(index) => self.set_word(Some(index), &mut update),
            Resolution::Ended => {
                self.set_word(None, &mut update);
                self.phase = SessionPhase::Completed;
                self.state.reset();
                update.finished = true;
            }
        }
        update
    }

    fn set_word(&mut self, word: Option<usize>, update: &mut TickUpdate) {
        if word == self.state.current_word {
            return;
        }
        update.highlight = Some(HighlightChange {
            previous: self.state.current_word,
            current: word,
        });
        self.state.current_word = word;

        let Some(index) = word else {
            return;
        };
        let ordinal = self.headers.partition_point(|m| m.word_index < index);
        match self.headers.get(ordinal) {
            Some(marker) if marker.word_index == index && self.state.should_scroll_to(ordinal) => {
                self.state.last_scrolled_header = Some(ordinal);
                update.header = Some(HeaderReached {
                    ordinal,
                    marker: *marker,
                });
            }
            _ => {}
        }
    }

    fn transition(&mut self, from: SessionPhase, to: SessionPhase) -> bool {
        if self.phase != from {
            return false;
        }
        tracing::debug!(?from, ?to, "Playback session transition");
        self.phase = to;
        true
    }

    fn clear(&mut self) -> Option<usize> {
        let cleared = self.state.current_word;
        self.state.reset();
        self.resolver.reset();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestamps(n: usize) -> Vec<WordTimestamp> {
        (0..n)
            .map(|i| WordTimestamp {
                word: format!("w{i}"),
                start: i as f64,
                end: i as f64 + 0.9,
                index: i,
            })
            .collect()
    }

    fn marker(word_index: usize) -> HeaderMarker {
        HeaderMarker {
            word_index,
            level: 2,
            element_ordinal: word_index,
        }
    }

    #[test]
    fn test_start_resets_state() {
        let mut session = PlaybackSession::new(timestamps(3), vec![marker(0)]);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.tick(0.5), TickUpdate::default());

        session.start();
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.current_word(), None);
        assert_eq!(session.state().last_scrolled_header, None);
    }

    #[test]
    fn test_tick_reports_highlight_changes_once() {
        let mut session = PlaybackSession::new(timestamps(3), Vec::new());
        session.start();

        let update = session.tick(0.1);
        assert_eq!(
            update.highlight,
            Some(HighlightChange {
                previous: None,
                current: Some(0)
            })
        );
        assert_eq!(session.tick(0.2).highlight, None);
        assert_eq!(session.tick(0.95).highlight, None);
        assert_eq!(session.tick(1.0).highlight.unwrap().current, Some(1));
    }

    #[test]
    fn test_header_scrolls_once_in_order() {
        let mut session = PlaybackSession::new(timestamps(10), vec![marker(0), marker(4), marker(7)]);
        session.start();

        assert_eq!(session.tick(0.0).header.unwrap().ordinal, 0);
        assert_eq!(session.tick(4.2).header.unwrap().ordinal, 1);

        // backward seek onto an already passed heading
        assert!(session.tick(0.1).header.is_none());
        assert!(session.tick(4.1).header.is_none());

        // a skipped heading only fires if playback lands on it
        assert!(session.tick(8.0).header.is_none());
        assert_eq!(session.tick(7.5).header.unwrap().ordinal, 2);
        assert!(session.tick(7.1).header.is_none());
    }

    #[test]
    fn test_past_last_word_finishes() {
        let mut session = PlaybackSession::new(timestamps(2), Vec::new());
        session.start();
        session.tick(1.5);

        let update = session.tick(2.0);
        assert!(update.finished);
        assert_eq!(update.highlight.unwrap().current, None);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.tick(0.5), TickUpdate::default());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut session = PlaybackSession::new(timestamps(3), Vec::new());
        assert!(!session.pause());
        session.start();
        session.tick(1.2);

        assert!(session.pause());
        assert_eq!(session.tick(2.5), TickUpdate::default());
        assert_eq!(session.current_word(), Some(1));

        assert!(session.resume());
        assert!(!session.resume());
        assert_eq!(session.tick(2.5).highlight.unwrap().current, Some(2));
    }

    #[test]
    fn test_fail_and_stop_clear_state() {
        let mut session = PlaybackSession::new(timestamps(3), vec![marker(1)]);
        session.start();
        session.tick(1.0);

        assert_eq!(session.fail(), Some(1));
        assert_eq!(session.phase(), SessionPhase::Errored);
        assert_eq!(*session.state(), PlaybackState::default());

        session.start();
        session.tick(0.0);
        assert_eq!(session.stop(), Some(0));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_audio_only_session_never_highlights() {
        let mut session = PlaybackSession::audio_only();
        session.start();
        assert!(!session.has_highlighting());
        assert_eq!(session.tick(10.0), TickUpdate::default());
        assert_eq!(session.phase(), SessionPhase::Playing);
    }
}
