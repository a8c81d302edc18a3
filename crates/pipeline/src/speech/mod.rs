//! Speech synthesis seam
//!
//! A provider turns normalized narration text into an audio asset plus a
//! per-character alignment of that text.

use std::time::Duration;

use async_trait::async_trait;
use narration_core::{CharacterAlignment, NormalizedText};
use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Audio asset and its timing, as returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSynthesis {
    pub audio_url: String,
    pub alignment: CharacterAlignment,
}

/// Speech/alignment provider
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize the given text and align it per character
    async fn synthesize(&self, text: &NormalizedText) -> Result<SpeechSynthesis, PipelineError>;

    /// Provider name for logs and metrics
    fn name(&self) -> &str;
}

/// Stub provider when no synthesis backend is configured
///
/// Produces no audio, only a `stub://` URL and an evenly spaced alignment.
#[derive(Debug, Clone)]
pub struct StubSpeechProvider {
    seconds_per_char: f64,
    latency: Option<Duration>,
}

impl StubSpeechProvider {
    /// ~50ms per character
    pub const DEFAULT_SECONDS_PER_CHAR: f64 = 0.05;

    pub fn new(seconds_per_char: f64) -> Self {
        tracing::warn!("Using stub speech provider - narration audio is synthetic");
        Self {
            seconds_per_char,
            latency: None,
        }
    }

    /// Simulated synthesis delay
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn align(&self, text: &str) -> CharacterAlignment {
        let characters: Vec<char> = text.chars().collect();
        let step = self.seconds_per_char;
        let start_times = (0..characters.len()).map(|i| i as f64 * step).collect();
        let end_times = (1..=characters.len()).map(|i| i as f64 * step).collect();
        CharacterAlignment::new(characters, start_times, end_times)
    }
}

impl Default for StubSpeechProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SECONDS_PER_CHAR)
    }
}

#[async_trait]
impl SpeechProvider for StubSpeechProvider {
    async fn synthesize(&self, text: &NormalizedText) -> Result<SpeechSynthesis, PipelineError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(SpeechSynthesis {
            audio_url: format!("stub://narration/{}", uuid::Uuid::new_v4()),
            alignment: self.align(text.as_str()),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}
