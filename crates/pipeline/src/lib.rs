//! Narration preparation pipeline
//!
//! The ahead-of-time half of narration sync:
//! - Speech provider seam (plus a stub provider)
//! - Character alignment to word timestamp aggregation
//! - Preparation of stored narration assets per content version

pub mod alignment;
pub mod error;
pub mod preparation;
pub mod speech;

pub use alignment::{aggregate, aggregate_alignment, align_document, Aggregation};
pub use error::PipelineError;
pub use preparation::{NarrationPreparer, PreparedNarration};
pub use speech::{SpeechProvider, SpeechSynthesis, StubSpeechProvider};
