//! Character alignment to word timestamps
//!
//! Non-space characters accumulate into a word; whitespace closes it.
//! A word starts at its first character's start time and ends at its last
//! character's end time. Intervals are clamped so they never overlap or
//! run backwards, even when the provider's timings jitter.

use narration_core::{CharacterAlignment, NarrationError, WordTimestamp};

/// Word timestamps plus any underrun detected while building them
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub words: Vec<WordTimestamp>,
    /// Set when fewer words were aligned than expected
    pub underrun: Option<NarrationError>,
}

impl Aggregation {
    pub fn is_complete(&self) -> bool {
        self.underrun.is_none()
    }
}

/// Aggregate every described character into word timestamps
pub fn aggregate(alignment: &CharacterAlignment) -> Vec<WordTimestamp> {
    let mut words = Vec::new();
    let mut buffer = String::new();
    let mut start = 0.0;
    let mut end = 0.0;
    let mut prev_end = 0.0_f64;

    for i in 0..alignment.len() {
        let c = alignment.characters[i];
        if c.is_whitespace() {
            if !buffer.is_empty() {
                prev_end = emit(&mut words, &mut buffer, start, end, prev_end);
            }
            continue;
        }
        if buffer.is_empty() {
            start = alignment.start_times[i];
        }
        buffer.push(c);
        end = alignment.end_times[i];
    }
    if !buffer.is_empty() {
        emit(&mut words, &mut buffer, start, end, prev_end);
    }

    words
}

fn emit(
    words: &mut Vec<WordTimestamp>,
    buffer: &mut String,
    start: f64,
    end: f64,
    prev_end: f64,
) -> f64 {
    let start = start.max(prev_end);
    let end = end.max(start);
    words.push(WordTimestamp {
        word: std::mem::take(buffer),
        start,
        end,
        index: words.len(),
    });
    end
}

/// Aggregate and flag alignments that cover fewer words than expected
///
/// Unequal array lengths are aggregated over their common prefix and
/// reported as an underrun. Audio can still play; the partial result is
/// returned rather than discarded.
pub fn aggregate_alignment(alignment: &CharacterAlignment, expected_words: usize) -> Aggregation {
    if !alignment.is_consistent() {
        tracing::warn!(
            characters = alignment.characters.len(),
            start_times = alignment.start_times.len(),
            end_times = alignment.end_times.len(),
            "Character alignment arrays differ in length, using common prefix"
        );
    }

    let words = aggregate(alignment);
    let underrun = if words.len() < expected_words || !alignment.is_consistent() {
        tracing::warn!(
            expected = expected_words,
            aligned = words.len(),
            "Alignment underrun"
        );
        metrics::counter!("narration_alignment_underrun_total").increment(1);
        Some(NarrationError::AlignmentUnderrun {
            expected: expected_words,
            aligned: words.len(),
        })
    } else {
        None
    };

    Aggregation { words, underrun }
}
