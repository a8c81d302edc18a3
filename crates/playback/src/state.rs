//! Session phase and per-session playback state

use serde::Serialize;

/// Playback session phase
///
/// `Idle → Playing → {Paused, Completed, Errored} → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Playing,
    Paused,
    /// Audio position passed the last word
    Completed,
    /// The audio primitive failed
    Errored,
}

impl SessionPhase {
    /// True once the session can no longer tick
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Idle | Self::Completed | Self::Errored)
    }
}

/// Highlight cursor and header-scroll guard for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    /// Highlighted word, `None` when nothing is highlighted
    pub current_word: Option<usize>,
    /// Ordinal of the last heading auto-scrolled to this session
    pub last_scrolled_header: Option<usize>,
}

impl PlaybackState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True if a heading with this ordinal has not been scrolled to yet
    /// and lies past every heading that has
    pub fn should_scroll_to(&self, ordinal: usize) -> bool {
        self.last_scrolled_header.map_or(true, |last| ordinal > last)
    }
}
