//! Fixed entity-reference table
//!
//! Only the references a rich-text editor actually emits are decoded.
//! Unknown references are left verbatim. Decoding is a single pass, so
//! `&amp;lt;` becomes `&lt;`, not `<`.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENTITY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"&(#?[A-Za-z0-9]+);").unwrap());

static ENTITY_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("#39", "'"),
        ("#x27", "'"),
        // non-breaking space narrates as an ordinary word gap
        ("nbsp", " "),
        ("#160", " "),
        ("ndash", "\u{2013}"),
        ("mdash", "\u{2014}"),
        ("hellip", "\u{2026}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("bull", "\u{2022}"),
    ])
});

pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY_PATTERN.replace_all(text, |caps: &Captures<'_>| {
        let name = &caps[1];
        match ENTITY_TABLE.get(name) {
            Some(decoded) => (*decoded).to_string(),
            None => caps[0].to_string(),
        }
    })
}
