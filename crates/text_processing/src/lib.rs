//! Text processing for narration sync
//!
//! - Markup lexing and the shared content walk
//! - Text normalization (entities, bullets, emphasis, whitespace)
//! - Word tokenization
//! - Header index building
//! - Narration documents and sync checks
//!
//! # Example
//!
//! ```
//! use narration_text_processing::{ContentRules, NarrationDocument};
//!
//! let doc = NarrationDocument::from_content("<p>Hello</p><p>World</p>", &ContentRules::default());
//! assert_eq!(doc.text.as_str(), "Hello World");
//! assert_eq!(doc.word_count(), 2);
//! ```

pub mod content;
pub mod document;
pub mod entities;
pub mod fingerprint;
pub mod headers;
pub mod markup;
pub mod normalizer;
pub mod tokenizer;

pub use content::{ContentRules, Fragment};
pub use document::{NarrationDocument, SyncReport};
pub use fingerprint::fingerprint;
pub use headers::HeaderIndexBuilder;
pub use normalizer::{normalize, TextNormalizer};
pub use tokenizer::{tokenize, words, WordCounter};
