//! Markup lexer
//!
//! Splits rich-editor HTML into text runs and tags. Deliberately forgiving:
//! unclosed tags, void elements written without `/`, and stray `<` in prose
//! are all accepted. Anything that does not look like a tag is text.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<![^>]*>|<(/?)([A-Za-z][A-Za-z0-9]*)[^>]*>").unwrap()
});

/// How a tag affects narration text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// Boundary between blocks; replaced by a space
    Block,
    /// `h1`..`h6`
    Heading(u8),
    /// Removed without residue
    Inline,
    /// Element whose content is never narrated (`script`, `style`)
    Opaque,
}

pub fn classify(name: &str) -> TagClass {
    let name = name.to_ascii_lowercase();
    match name.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            TagClass::Heading(name.as_bytes()[1] - b'0')
        }
        "p" | "div" | "br" | "hr" | "li" | "ul" | "ol" | "blockquote" | "pre" | "table"
        | "thead" | "tbody" | "tfoot" | "tr" | "td" | "th" | "caption" | "section"
        | "article" | "header" | "footer" | "aside" | "nav" | "figure" | "figcaption" | "dl"
        | "dt" | "dd" | "main" | "details" | "summary" => TagClass::Block,
        "script" | "style" | "template" | "noscript" => TagClass::Opaque,
        _ => TagClass::Inline,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken<'a> {
    Text(&'a str),
    Open { name: String, class: TagClass },
    Close { name: String, class: TagClass },
}

/// Lex markup into tokens; comments, doctypes and opaque elements are dropped
pub fn lex(raw: &str) -> Vec<MarkupToken<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;
    let mut opaque: Option<String> = None;

    for caps in TAG_PATTERN.captures_iter(raw) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };

        if opaque.is_none() && whole.start() > cursor {
            tokens.push(MarkupToken::Text(&raw[cursor..whole.start()]));
        }
        cursor = whole.end();

        // comment or doctype
        let Some(name) = caps.get(2) else {
            continue;
        };
        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let class = classify(&name);

        if let Some(skipping) = &opaque {
            if closing && *skipping == name {
                opaque = None;
            }
            continue;
        }

        if class == TagClass::Opaque {
            if !closing {
                opaque = Some(name);
            }
            continue;
        }

        tokens.push(if closing {
            MarkupToken::Close { name, class }
        } else {
            MarkupToken::Open { name, class }
        });
    }

    if opaque.is_none() && cursor < raw.len() {
        tokens.push(MarkupToken::Text(&raw[cursor..]));
    }
    tokens
}
