//! Word-level data model shared by both text passes and the playback loop

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical single-spaced plain text derived from one content version
///
/// Invariant: no consecutive spaces, no leading/trailing whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Collapse every whitespace run to a single space and trim
    pub fn collapse(text: &str) -> Self {
        let mut out = String::with_capacity(text.len());
        for token in text.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(token);
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One word of the canonical sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Zero-based position in the sequence
    pub index: usize,
}

/// Aggregated `[start, end)` interval for one word, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub index: usize,
}

impl WordTimestamp {
    /// Half-open containment check
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Position where a heading begins in the word sequence
///
/// A marker's ordinal is its position in the header list, which only holds
/// narrated headings. `element_ordinal` locates the heading among all heading
/// elements of the raw content, including skipped and empty ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderMarker {
    pub word_index: usize,
    /// Heading level, 1 through 6
    pub level: u8,
    /// Zero-based position among every `h1`..`h6` element of the content
    pub element_ordinal: usize,
}

/// Per-character timing map returned by a speech/alignment provider
///
/// Parallel arrays, one entry per character of the synthesized text.
/// Accepts both the camelCase field names and the provider's
/// `character_*_times_seconds` names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAlignment {
    pub characters: Vec<char>,
    #[serde(alias = "character_start_times_seconds")]
    pub start_times: Vec<f64>,
    #[serde(alias = "character_end_times_seconds")]
    pub end_times: Vec<f64>,
}

impl CharacterAlignment {
    pub fn new(characters: Vec<char>, start_times: Vec<f64>, end_times: Vec<f64>) -> Self {
        Self {
            characters,
            start_times,
            end_times,
        }
    }

    /// Number of fully described characters (common prefix of the three arrays)
    pub fn len(&self) -> usize {
        self.characters
            .len()
            .min(self.start_times.len())
            .min(self.end_times.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when all three arrays have the same length
    pub fn is_consistent(&self) -> bool {
        self.characters.len() == self.start_times.len()
            && self.characters.len() == self.end_times.len()
    }

    /// The synthesized text this alignment describes
    pub fn text(&self) -> String {
        self.characters.iter().collect()
    }

    /// End time of the last described character
    pub fn duration(&self) -> f64 {
        self.end_times[..self.len()]
            .iter()
            .copied()
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        let text = NormalizedText::collapse("  Hello \n\t world  ");
        assert_eq!(text.as_str(), "Hello world");
        assert!(NormalizedText::collapse(" \n ").is_empty());
    }

    #[test]
    fn test_word_timestamp_half_open() {
        let ts = WordTimestamp {
            word: "Hi".to_string(),
            start: 0.0,
            end: 0.5,
            index: 0,
        };
        assert!(ts.contains(0.0));
        assert!(ts.contains(0.49));
        assert!(!ts.contains(0.5));
    }

    #[test]
    fn test_alignment_accepts_provider_field_names() {
        let json = r#"{
            "characters": ["H", "i"],
            "character_start_times_seconds": [0.0, 0.1],
            "character_end_times_seconds": [0.1, 0.2]
        }"#;
        let alignment: CharacterAlignment = serde_json::from_str(json).unwrap();
        assert_eq!(alignment.text(), "Hi");
        assert!(alignment.is_consistent());
        assert!((alignment.duration() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_alignment_len_uses_common_prefix() {
        let alignment = CharacterAlignment::new(vec!['a', 'b', 'c'], vec![0.0, 0.1], vec![0.1]);
        assert_eq!(alignment.len(), 1);
        assert!(!alignment.is_consistent());
    }

    #[test]
    fn test_header_marker_serializes_camel_case() {
        let marker = HeaderMarker {
            word_index: 4,
            level: 2,
            element_ordinal: 3,
        };
        let json = serde_json::to_string(&marker).unwrap();
        assert_eq!(json, r#"{"wordIndex":4,"level":2,"elementOrdinal":3}"#);
    }
}
