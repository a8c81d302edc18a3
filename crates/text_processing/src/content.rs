//! Shared content walk
//!
//! Both the normalizer and the header index builder consume the fragment
//! stream produced here, so they cannot disagree about where words begin.
//! Inline text is accumulated across inline tags and cleaned once per block,
//! which keeps cleanup independent of how the editor nested its inline tags.

use narration_config::NormalizerSettings;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::decode_entities;
use crate::markup::{lex, MarkupToken, TagClass};

static BULLET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{2022}\x{25E6}\x{25AA}\x{25AB}\x{2023}\x{2043}\x{25CF}\x{25CB}\x{25A0}\x{25A1}]\s*")
        .unwrap()
});

/// Emphasis delimiters stripped from the edges of a token
const EMPHASIS_MARKERS: &[char] = &['*', '_', '~'];

/// Rules shared by every pass over the same content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRules {
    /// Lowercased heading texts that are never narrated
    skipped_headings: Vec<String>,
}

impl ContentRules {
    pub fn new<I, S>(skipped_headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            skipped_headings: skipped_headings
                .into_iter()
                .map(|h| heading_key(h.as_ref()))
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Rules that narrate every heading
    pub fn narrate_all() -> Self {
        Self {
            skipped_headings: Vec::new(),
        }
    }

    pub fn is_skipped_heading(&self, cleaned_text: &str) -> bool {
        let key = heading_key(cleaned_text);
        !key.is_empty() && self.skipped_headings.iter().any(|h| *h == key)
    }
}

impl Default for ContentRules {
    fn default() -> Self {
        Self::from(&NormalizerSettings::default())
    }
}

impl From<&NormalizerSettings> for ContentRules {
    fn from(settings: &NormalizerSettings) -> Self {
        Self::new(&settings.skipped_headings)
    }
}

fn heading_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(':')
        .trim_end()
        .to_lowercase()
}

/// One piece of the narration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Cleaned narration text; may contain internal whitespace
    Text(String),
    /// Block-level boundary, narrated as a word gap
    Boundary,
    /// A narrated heading begins here; also a word gap
    Heading { level: u8, element_ordinal: usize },
}

/// Decode entities, strip bullet glyphs and emphasis delimiters
pub fn clean_inline(text: &str) -> String {
    let decoded = decode_entities(text);
    let unbulleted = BULLET_PATTERN.replace_all(&decoded, "");

    let mut out = String::with_capacity(unbulleted.len());
    for (i, token) in unbulleted.split(char::is_whitespace).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        strip_emphasis(token, &mut out);
    }
    out
}

/// Drop emphasis delimiters from the non-alphanumeric edges of one token
///
/// `*word*,` loses both asterisks; `snake_case` keeps its underscore.
fn strip_emphasis(token: &str, out: &mut String) {
    let start = token
        .find(|c: char| c.is_alphanumeric())
        .unwrap_or(token.len());
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(start);

    out.extend(token[..start].chars().filter(|c| !EMPHASIS_MARKERS.contains(c)));
    out.push_str(&token[start..end]);
    out.extend(token[end..].chars().filter(|c| !EMPHASIS_MARKERS.contains(c)));
}

/// Walk raw content into the shared fragment stream
pub fn fragments(raw: &str, rules: &ContentRules) -> Vec<Fragment> {
    let mut walker = FragmentWalker {
        rules,
        out: Vec::new(),
        inline: String::new(),
        heading: None,
        headings_seen: 0,
    };

    for token in lex(raw) {
        match token {
            MarkupToken::Text(text) => walker.inline.push_str(text),
            MarkupToken::Open { class, .. } => match class {
                TagClass::Heading(level) => walker.open_heading(level),
                TagClass::Block => walker.block_boundary(),
                TagClass::Inline | TagClass::Opaque => {}
            },
            MarkupToken::Close { class, .. } => match class {
                TagClass::Heading(_) => walker.close_heading(),
                TagClass::Block => walker.block_boundary(),
                TagClass::Inline | TagClass::Opaque => {}
            },
        }
    }

    walker.finish()
}

struct FragmentWalker<'r> {
    rules: &'r ContentRules,
    out: Vec<Fragment>,
    /// Raw inline text of the current block or heading
    inline: String,
    /// Level and element ordinal of the heading currently open
    heading: Option<(u8, usize)>,
    /// Heading elements opened so far, narrated or not
    headings_seen: usize,
}

impl FragmentWalker<'_> {
    fn flush_inline(&mut self) {
        if self.inline.trim().is_empty() {
            self.inline.clear();
            return;
        }
        let cleaned = clean_inline(&self.inline);
        self.inline.clear();
        if !cleaned.trim().is_empty() {
            self.out.push(Fragment::Text(cleaned));
        }
    }

    fn block_boundary(&mut self) {
        if self.heading.is_some() {
            // blocks nested inside a heading only separate its words
            self.inline.push(' ');
            return;
        }
        self.flush_inline();
        self.out.push(Fragment::Boundary);
    }

    fn open_heading(&mut self, level: u8) {
        if self.heading.is_some() {
            self.close_heading();
        }
        self.flush_inline();
        self.heading = Some((level, self.headings_seen));
        self.headings_seen += 1;
    }

    fn close_heading(&mut self) {
        let Some((level, element_ordinal)) = self.heading.take() else {
            // stray closing tag
            self.block_boundary();
            return;
        };

        let cleaned = clean_inline(&self.inline);
        self.inline.clear();

        if cleaned.trim().is_empty() {
            tracing::trace!(level, "Empty heading produces no marker");
        } else if self.rules.is_skipped_heading(&cleaned) {
            tracing::debug!(level, heading = %cleaned.trim(), "Dropping structural heading from narration");
        } else {
            self.out.push(Fragment::Heading {
                level,
                element_ordinal,
            });
            self.out.push(Fragment::Text(cleaned));
        }
        self.out.push(Fragment::Boundary);
    }

    fn finish(mut self) -> Vec<Fragment> {
        if self.heading.is_some() {
            self.close_heading();
        }
        self.flush_inline();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(fragments: &[Fragment]) -> Vec<&str> {
        fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_clean_inline_strips_bullets() {
        assert_eq!(clean_inline("\u{2022} Item one"), "Item one");
        assert_eq!(clean_inline("\u{25E6}nested"), "nested");
    }

    #[test]
    fn test_clean_inline_strips_emphasis() {
        assert_eq!(clean_inline("**bold** and _italic_"), "bold and italic");
        assert_eq!(clean_inline("~~gone~~ **"), "gone ");
        // interior delimiters survive
        assert_eq!(clean_inline("snake_case"), "snake_case");
        assert_eq!(clean_inline("a *very*, (_quiet_) word."), "a very, (quiet) word.");
    }

    #[test]
    fn test_inline_tags_leave_no_residue() {
        let rules = ContentRules::narrate_all();
        let out = fragments("<p>un<strong>believ</strong>able</p>", &rules);
        assert_eq!(texts(&out), vec!["unbelievable"]);
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let rules = ContentRules::narrate_all();
        let out = fragments("<p>Hello</p><p>World</p>", &rules);
        assert_eq!(
            out,
            vec![
                Fragment::Boundary,
                Fragment::Text("Hello".to_string()),
                Fragment::Boundary,
                Fragment::Boundary,
                Fragment::Text("World".to_string()),
                Fragment::Boundary,
            ]
        );
    }

    #[test]
    fn test_heading_fragment() {
        let rules = ContentRules::narrate_all();
        let out = fragments("<h2>Getting <em>started</em></h2><p>Body</p>", &rules);
        assert_eq!(
            out[0],
            Fragment::Heading {
                level: 2,
                element_ordinal: 0
            }
        );
        assert_eq!(out[1], Fragment::Text("Getting started".to_string()));
    }

    #[test]
    fn test_skipped_heading_dropped() {
        let rules = ContentRules::new(["Table of Contents"]);
        let out = fragments("<h2>Table of contents:</h2><p>Body</p>", &rules);
        assert!(!out.iter().any(|f| matches!(f, Fragment::Heading { .. })));
        assert_eq!(texts(&out), vec!["Body"]);
    }

    #[test]
    fn test_element_ordinal_counts_unnarrated_headings() {
        let rules = ContentRules::new(["Contents"]);
        let out = fragments(
            "<h2>Contents</h2><ul><li>Intro</li></ul><h3></h3><h2>Intro</h2><p>Body</p>",
            &rules,
        );
        let headings: Vec<_> = out
            .iter()
            .filter(|f| matches!(f, Fragment::Heading { .. }))
            .collect();
        assert_eq!(
            headings,
            vec![&Fragment::Heading {
                level: 2,
                element_ordinal: 2
            }]
        );
    }

    #[test]
    fn test_empty_heading_has_no_marker() {
        let rules = ContentRules::narrate_all();
        let out = fragments("<h1> </h1>text", &rules);
        assert!(!out.iter().any(|f| matches!(f, Fragment::Heading { .. })));
    }

    #[test]
    fn test_unclosed_heading_is_closed_at_end() {
        let rules = ContentRules::narrate_all();
        let out = fragments("<h3>Dangling", &rules);
        assert_eq!(
            out[0],
            Fragment::Heading {
                level: 3,
                element_ordinal: 0
            }
        );
        assert_eq!(texts(&out), vec!["Dangling"]);
    }

    #[test]
    fn test_default_rules_skip_designated_headings() {
        let rules = ContentRules::default();
        assert!(rules.is_skipped_heading("Table of Contents"));
        assert!(rules.is_skipped_heading("  IN THIS LESSON: "));
        assert!(!rules.is_skipped_heading("Introduction"));
    }
}
