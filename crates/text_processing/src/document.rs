//! Narration document
//!
//! `NarrationDocument::from_content` is the single entry point for turning
//! content into narration text, words and header markers. The preparation
//! pipeline calls it to build speech input; the playback side calls it to
//! build the highlight index. Both get identical word sequences for the
//! same content version.

use narration_core::{HeaderMarker, NarrationError, NormalizedText, Word, WordTimestamp};
use serde::Serialize;

use crate::content::{fragments, ContentRules};
use crate::fingerprint::fingerprint;
use crate::headers::index_fragments;
use crate::normalizer::render_fragments;
use crate::tokenizer::tokenize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrationDocument {
    pub text: NormalizedText,
    pub words: Vec<Word>,
    pub headers: Vec<HeaderMarker>,
    /// Content hash of `text`
    pub fingerprint: String,
}

impl NarrationDocument {
    pub fn from_content(raw: &str, rules: &ContentRules) -> Self {
        let fragments = fragments(raw, rules);
        let text = render_fragments(&fragments);
        let words = tokenize(&text);
        let (headers, counted) = index_fragments(&fragments);
        debug_assert_eq!(counted, words.len(), "header counter diverged from tokenizer");

        let fingerprint = fingerprint(&text);
        tracing::debug!(
            words = words.len(),
            headers = headers.len(),
            fingerprint = %fingerprint,
            "Built narration document"
        );

        Self {
            text,
            words,
            headers,
            fingerprint,
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True when stored timestamps were generated for this content version
    pub fn matches_fingerprint(&self, content_hash: &str) -> bool {
        self.fingerprint == content_hash
    }

    /// Compare this document's words with generated timestamps
    pub fn check_sync(&self, timestamps: &[WordTimestamp]) -> SyncReport {
        let report = SyncReport::compare(&self.words, timestamps);
        if !report.is_synchronized() {
            tracing::warn!(
                expected = report.expected,
                actual = report.actual,
                first_divergence = ?report.first_divergence,
                "Narration word sequence does not match timestamps"
            );
        }
        report
    }

    /// Desync carried by stored timestamps
    ///
    /// Timestamps flagged incomplete that match a prefix of the words are an
    /// alignment underrun; any other disagreement is a normalization mismatch.
    pub fn stored_issue(
        &self,
        timestamps: &[WordTimestamp],
        highlighting_complete: bool,
    ) -> Option<NarrationError> {
        let report = self.check_sync(timestamps);
        let underrun = NarrationError::AlignmentUnderrun {
            expected: report.expected,
            aligned: report.actual,
        };
        if !highlighting_complete
            && report.actual < report.expected
            && report.first_divergence == Some(report.actual)
        {
            return Some(underrun);
        }
        match report.into_result() {
            Err(mismatch) => Some(mismatch),
            Ok(()) => (!highlighting_complete).then_some(underrun),
        }
    }
}

/// Outcome of comparing two word sequences for one content version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub expected: usize,
    pub actual: usize,
    /// First index where the sequences disagree
    pub first_divergence: Option<usize>,
}

impl SyncReport {
    pub fn compare(expected: &[Word], actual: &[WordTimestamp]) -> Self {
        let first_divergence = expected
            .iter()
            .zip(actual)
            .position(|(w, ts)| word_key(&w.text) != word_key(&ts.word))
            .or_else(|| {
                (expected.len() != actual.len()).then(|| expected.len().min(actual.len()))
            });

        Self {
            expected: expected.len(),
            actual: actual.len(),
            first_divergence,
        }
    }

    pub fn is_synchronized(&self) -> bool {
        self.first_divergence.is_none()
    }

    pub fn into_result(self) -> Result<(), NarrationError> {
        match self.first_divergence {
            None => Ok(()),
            Some(index) => Err(NarrationError::NormalizationMismatch {
                expected: self.expected,
                actual: self.actual,
                first_divergence: Some(index),
            }),
        }
    }
}

/// Comparison key tolerant of provider-side punctuation and case changes
fn word_key(word: &str) -> String {
    let key: String = word
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if key.is_empty() {
        word.to_string()
    } else {
        key
    }
}
