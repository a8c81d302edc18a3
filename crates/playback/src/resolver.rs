//! Active word resolution from the audio clock
//!
//! The active word is the last one whose start is at or before `t`. Inside a
//! word's `[start, end)` that word is active; in the gap before the next
//! word's start the previous word stays active. Past the last word's end
//! nothing is active and playback is over.
//!
//! The resolver remembers the last index and scans from there, so steady
//! playback costs O(1) per frame while seeks still resolve correctly.

use narration_core::WordTimestamp;

/// Outcome of resolving one audio position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Before the first word (or no words at all)
    BeforeStart,
    Word(usize),
    /// Past the last word's end
    Ended,
}

impl Resolution {
    pub fn word(self) -> Option<usize> {
        match self {
            Self::Word(index) => Some(index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntervalResolver {
    cursor: usize,
}

impl IntervalResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Resolve the active word at time `t`
    ///
    /// `timestamps` must be ordered with non-decreasing starts.
    pub fn resolve(&mut self, timestamps: &[WordTimestamp], t: f64) -> Resolution {
        let Some(last) = timestamps.len().checked_sub(1) else {
            return Resolution::BeforeStart;
        };
        if t >= timestamps[last].end {
            return Resolution::Ended;
        }
        if t < timestamps[0].start {
            self.cursor = 0;
            return Resolution::BeforeStart;
        }

        let mut i = self.cursor.min(last);
        while i > 0 && timestamps[i].start > t {
            i -= 1;
        }
        while i < last && timestamps[i + 1].start <= t {
            i += 1;
        }
        self.cursor = i;
        Resolution::Word(i)
    }
}
