//! Word-level timing from provider alignments

mod aggregator;

pub use aggregator::{aggregate, aggregate_alignment, Aggregation};

use narration_core::CharacterAlignment;
use narration_text_processing::NarrationDocument;

/// Aggregate an alignment generated for `document`'s text
pub fn align_document(document: &NarrationDocument, alignment: &CharacterAlignment) -> Aggregation {
    aggregate_alignment(alignment, document.word_count())
}
