//! Core types and traits for narration sync
//!
//! Shared by the text-processing, pipeline, persistence and playback crates:
//! - Word-level data model (words, timestamps, header markers)
//! - Character alignment as returned by a speech/alignment provider
//! - The desynchronization error taxonomy
//! - Host capability traits (audio clock, scrollable viewport, frame scheduler)

pub mod error;
pub mod traits;
pub mod types;

pub use error::{NarrationError, Result};
pub use traits::{AudioPlayback, FrameHandle, FrameScheduler, ScrollViewport};
pub use types::{CharacterAlignment, HeaderMarker, NormalizedText, Word, WordTimestamp};
