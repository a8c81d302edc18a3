//! Text normalizer
//!
//! Raw rich content in, canonical single-spaced narration text out.
//! Pure and deterministic: the ahead-of-time speech input and the
//! render-time highlight index are both produced by this one function.

use narration_core::NormalizedText;

use crate::content::{fragments, ContentRules, Fragment};

#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    rules: ContentRules,
}

impl TextNormalizer {
    pub fn new(rules: ContentRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ContentRules {
        &self.rules
    }

    /// Normalize raw content; empty input yields empty text
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        if raw.trim().is_empty() {
            return NormalizedText::default();
        }
        render_fragments(&fragments(raw, &self.rules))
    }

    /// `None` content (no body stored yet) normalizes to empty text
    pub fn normalize_opt(&self, raw: Option<&str>) -> NormalizedText {
        raw.map(|r| self.normalize(r)).unwrap_or_default()
    }
}

/// Normalize with the default rules
pub fn normalize(raw: &str) -> NormalizedText {
    TextNormalizer::default().normalize(raw)
}

pub(crate) fn render_fragments(fragments: &[Fragment]) -> NormalizedText {
    let mut raw = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => raw.push_str(text),
            Fragment::Boundary | Fragment::Heading { .. } => raw.push(' '),
        }
    }
    NormalizedText::collapse(&raw)
}
