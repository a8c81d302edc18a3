//! Word tokenizer
//!
//! Splits normalized text on the single-space delimiter. `WordCounter` is the
//! incremental form of the same rule, used where the text is seen in pieces.

use narration_core::{NormalizedText, Word};

/// Split normalized text into the ordered word sequence
pub fn tokenize(text: &NormalizedText) -> Vec<Word> {
    words(text.as_str())
        .enumerate()
        .map(|(index, word)| Word {
            text: word.to_string(),
            index,
        })
        .collect()
}

/// Borrowing variant of [`tokenize`]
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|token| !token.is_empty())
}

/// Running word count over text fed in pieces
///
/// Counts exactly what `tokenize(NormalizedText::collapse(..))` would count
/// for the concatenated input: a word starts at every non-whitespace
/// character that follows whitespace or a boundary.
#[derive(Debug, Clone, Default)]
pub struct WordCounter {
    count: usize,
    in_word: bool,
}

impl WordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                self.in_word = false;
            } else if !self.in_word {
                self.count += 1;
                self.in_word = true;
            }
        }
    }

    /// A boundary always ends the current word
    pub fn boundary(&mut self) {
        self.in_word = false;
    }

    /// Words started so far; also the index the next word will get
    pub fn count(&self) -> usize {
        self.count
    }
}
