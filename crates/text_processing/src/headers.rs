//! Header index builder
//!
//! Records the word index at which each narrated heading begins. Counts words
//! over the same fragment stream the normalizer renders, with the same
//! whitespace rule as the tokenizer, so a marker's index always names the
//! heading's first word in the tokenized sequence.

use narration_core::HeaderMarker;

use crate::content::{fragments, ContentRules, Fragment};
use crate::tokenizer::WordCounter;

#[derive(Debug, Clone, Default)]
pub struct HeaderIndexBuilder {
    rules: ContentRules,
}

impl HeaderIndexBuilder {
    pub fn new(rules: ContentRules) -> Self {
        Self { rules }
    }

    pub fn build(&self, raw: &str) -> Vec<HeaderMarker> {
        index_fragments(&fragments(raw, &self.rules)).0
    }
}

/// Markers plus the total word count seen while walking
pub(crate) fn index_fragments(fragments: &[Fragment]) -> (Vec<HeaderMarker>, usize) {
    let mut counter = WordCounter::new();
    let mut markers = Vec::new();

    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => counter.feed(text),
            Fragment::Boundary => counter.boundary(),
            Fragment::Heading {
                level,
                element_ordinal,
            } => {
                counter.boundary();
                markers.push(HeaderMarker {
                    word_index: counter.count(),
                    level: *level,
                    element_ordinal: *element_ordinal,
                });
            }
        }
    }

    (markers, counter.count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(raw: &str) -> Vec<HeaderMarker> {
        HeaderIndexBuilder::new(ContentRules::narrate_all()).build(raw)
    }

    #[test]
    fn test_heading_at_start() {
        let markers = build("<h1>Intro</h1><p>Hello there</p>");
        assert_eq!(
            markers,
            vec![HeaderMarker {
                word_index: 0,
                level: 1,
                element_ordinal: 0,
            }]
        );
    }

    #[test]
    fn test_heading_after_body() {
        let markers = build("<p>One two three</p><h2>Next part</h2><p>four</p><h3>Last</h3>");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].word_index, 3);
        assert_eq!(markers[0].level, 2);
        // "Next part four" precede the second heading
        assert_eq!(markers[1].word_index, 6);
        assert_eq!(markers[1].level, 3);
    }

    #[test]
    fn test_heading_directly_after_inline_text() {
        // no block boundary before the heading tag
        let markers = build("lead<h2>Title</h2>");
        assert_eq!(markers[0].word_index, 1);
    }

    #[test]
    fn test_skipped_heading_has_no_marker() {
        let builder = HeaderIndexBuilder::new(ContentRules::new(["Contents"]));
        let markers = builder.build("<h2>Contents</h2><p>a b</p><h2>Body</h2>");
        assert_eq!(
            markers,
            vec![HeaderMarker {
                word_index: 2,
                level: 2,
                element_ordinal: 1,
            }]
        );
    }

    #[test]
    fn test_no_headings() {
        assert!(build("plain text only").is_empty());
        assert!(build("").is_empty());
    }
}
