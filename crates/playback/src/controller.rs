//! Narration controller
//!
//! Binds one content view to its narration asset and the host primitives
//! (audio, viewport, frame scheduler). Owns at most one playback session:
//! starting again tears the previous one down first, and every teardown
//! cancels the pending frame and releases the audio before returning.
//!
//! Desynchronization never produces contradicting highlights. Depending on
//! the mismatch policy the controller either plays audio without
//! highlighting or refuses to start.

use narration_config::{MismatchPolicy, PlaybackSettings};
use narration_core::{
    AudioPlayback, FrameHandle, FrameScheduler, HeaderMarker, NarrationError, ScrollViewport,
};
use narration_persistence::{AssetLookup, NarrationAsset};
use narration_text_processing::NarrationDocument;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::scroll::ScrollAnimator;
use crate::session::{HeaderReached, PlaybackSession, TickUpdate};
use crate::state::SessionPhase;

const EVENT_CAPACITY: usize = 100;

/// Whether narration can be offered for the loaded content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Audio and highlighting
    Ready,
    /// Audio only; timestamps do not match the rendered words
    HighlightDisabled,
    /// Asset was generated for another content version
    Stale,
    /// Narration control should be hidden
    Unavailable,
}

/// Controller events
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationEvent {
    StateChanged {
        old: SessionPhase,
        new: SessionPhase,
    },
    HighlightChanged {
        previous: Option<usize>,
        current: Option<usize>,
    },
    ScrollTriggered {
        ordinal: usize,
        word_index: usize,
        target: f64,
    },
    /// Non-blocking message for the reader
    Notice {
        message: String,
    },
}

pub struct NarrationController<A, V, F> {
    settings: PlaybackSettings,
    viewport: V,
    scheduler: F,
    animator: ScrollAnimator,
    events: broadcast::Sender<NarrationEvent>,
    availability: Availability,
    asset: Option<NarrationAsset>,
    headers: Vec<HeaderMarker>,
    issue: Option<NarrationError>,
    audio: Option<A>,
    session: Option<PlaybackSession>,
    frame: Option<FrameHandle>,
}

impl<A, V, F> NarrationController<A, V, F>
where
    A: AudioPlayback,
    V: ScrollViewport,
    F: FrameScheduler,
{
    pub fn new(settings: PlaybackSettings, viewport: V, scheduler: F) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            animator: ScrollAnimator::from_settings(&settings),
            settings,
            viewport,
            scheduler,
            events,
            availability: Availability::Unavailable,
            asset: None,
            headers: Vec::new(),
            issue: None,
            audio: None,
            session: None,
            frame: None,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NarrationEvent> {
        self.events.subscribe()
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    /// Desync found when the asset was loaded
    pub fn issue(&self) -> Option<&NarrationError> {
        self.issue.as_ref()
    }

    pub fn asset(&self) -> Option<&NarrationAsset> {
        self.asset.as_ref()
    }

    /// URL the host should open audio from
    pub fn audio_url(&self) -> Option<&str> {
        self.asset.as_ref().map(|a| a.audio_url.as_str())
    }

    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::Idle, PlaybackSession::phase)
    }

    pub fn current_word(&self) -> Option<usize> {
        self.session.as_ref().and_then(PlaybackSession::current_word)
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn audio(&self) -> Option<&A> {
        self.audio.as_ref()
    }

    pub fn audio_mut(&mut self) -> Option<&mut A> {
        self.audio.as_mut()
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// Frame callback the controller is waiting for, if any
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Attach the rendered document and its stored asset
    ///
    /// Any running session is stopped first.
    pub fn load(&mut self, document: &NarrationDocument, lookup: AssetLookup) -> Availability {
        self.stop();
        self.issue = None;
        self.headers = if self.settings.auto_scroll {
            document.headers.clone()
        } else {
            Vec::new()
        };

        let (availability, asset) = match lookup {
            AssetLookup::Missing => (Availability::Unavailable, None),
            AssetLookup::Stale(asset) => {
                self.issue = Some(NarrationError::StaleAsset {
                    unit_id: asset.unit_id.clone(),
                });
                (Availability::Stale, Some(asset))
            }
            AssetLookup::Fresh(asset) => {
                self.issue =
                    document.stored_issue(&asset.timestamps, asset.highlighting_complete);
                if let Some(NarrationError::NormalizationMismatch { .. }) = self.issue {
                    metrics::counter!("narration_normalization_mismatch_total").increment(1);
                }
                let availability = match (&self.issue, self.settings.mismatch_policy) {
                    (None, _) => Availability::Ready,
                    (Some(_), MismatchPolicy::DisableHighlighting) => {
                        Availability::HighlightDisabled
                    }
                    (Some(_), MismatchPolicy::HardFail) => Availability::Unavailable,
                };
                (availability, Some(asset))
            }
        };

        self.availability = availability;
        self.asset = asset;
        tracing::debug!(?availability, issue = ?self.issue, "Loaded narration asset");
        if availability == Availability::HighlightDisabled {
            self.notify("Word highlighting is unavailable for this content");
        }
        availability
    }

    /// Start narration with a fresh audio handle for the loaded asset
    pub fn start(&mut self, audio: A) -> Result<(), NarrationError> {
        let highlight = self.start_mode()?;
        self.teardown();

        let session = match (&self.asset, highlight) {
            (Some(asset), true) => {
                PlaybackSession::new(asset.timestamps.clone(), self.headers.clone())
            }
            _ => PlaybackSession::audio_only(),
        };
        self.session = Some(session);
        self.audio = Some(audio);

        if let Err(err) = self.with_audio(|audio| audio.play()) {
            self.fail(&err.to_string());
            return Err(err);
        }
        if let Some(session) = self.session.as_mut() {
            session.start();
        }
        self.emit(NarrationEvent::StateChanged {
            old: SessionPhase::Idle,
            new: SessionPhase::Playing,
        });
        tracing::debug!(highlight, "Narration started");
        self.request_frame();
        Ok(())
    }

    /// Pause playback and the frame loop; false if not playing
    pub fn pause(&mut self) -> bool {
        let paused = self.session.as_mut().map_or(false, PlaybackSession::pause);
        if paused {
            if let Some(audio) = self.audio.as_mut() {
                audio.pause();
            }
            self.cancel_frame();
            self.animator.cancel();
            self.emit(NarrationEvent::StateChanged {
                old: SessionPhase::Playing,
                new: SessionPhase::Paused,
            });
        }
        paused
    }

    /// Resume a paused session; false if not paused
    pub fn resume(&mut self) -> Result<bool, NarrationError> {
        if self.phase() != SessionPhase::Paused {
            return Ok(false);
        }
        if let Err(err) = self.with_audio(|audio| audio.play()) {
            self.fail(&err.to_string());
            return Err(err);
        }
        if let Some(session) = self.session.as_mut() {
            session.resume();
        }
        self.emit(NarrationEvent::StateChanged {
            old: SessionPhase::Paused,
            new: SessionPhase::Playing,
        });
        self.request_frame();
        Ok(true)
    }

    /// Move the audio clock; the next frame resolves the new word
    pub fn seek(&mut self, position: f64) -> Result<(), NarrationError> {
        if self.audio.is_none() {
            return Ok(());
        }
        if let Err(err) = self.with_audio(|audio| audio.seek(position.max(0.0))) {
            self.fail(&err.to_string());
            return Err(err);
        }
        Ok(())
    }

    /// Stop narration; no frame callback fires for this session afterwards
    pub fn stop(&mut self) {
        let old = self.phase();
        self.teardown();
        if old != SessionPhase::Idle {
            self.emit(NarrationEvent::StateChanged {
                old,
                new: SessionPhase::Idle,
            });
            tracing::debug!(?old, "Narration stopped");
        }
    }

    /// Frame callback from the host scheduler
    ///
    /// Only the pending handle is served; cancelled or superseded callbacks
    /// are dropped so a single tick chain runs.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: u64) {
        if self.frame != Some(handle) {
            tracing::trace!(frame = handle.0, "Ignoring stale frame callback");
            return;
        }
        self.frame = None;
        let animating = self.animator.step(&mut self.viewport, now_ms);

        if self.phase() != SessionPhase::Playing {
            if animating {
                self.request_frame();
            }
            return;
        }

        let (error, ended, position) = match self.audio.as_mut() {
            Some(audio) => (audio.take_error(), audio.has_ended(), audio.position()),
            None => (Some("audio handle missing".to_string()), false, 0.0),
        };
        if let Some(message) = error {
            self.fail(&message);
            return;
        }
        if ended {
            self.complete();
            if animating {
                self.request_frame();
            }
            return;
        }

        let update = match self.session.as_mut() {
            Some(session) => session.tick(position),
            None => TickUpdate::default(),
        };
        self.apply(update, now_ms);

        if self.phase() == SessionPhase::Playing || self.animator.is_animating() {
            self.request_frame();
        }
    }

    fn apply(&mut self, update: TickUpdate, now_ms: u64) {
        if let Some(change) = update.highlight {
            self.emit(NarrationEvent::HighlightChanged {
                previous: change.previous,
                current: change.current,
            });
        }
        if let Some(reached) = update.header {
            self.scroll_to_header(reached, now_ms);
        }
        if update.finished {
            self.emit(NarrationEvent::StateChanged {
                old: SessionPhase::Playing,
                new: SessionPhase::Completed,
            });
            tracing::debug!("Narration passed the last word");
        }
    }

    fn scroll_to_header(&mut self, reached: HeaderReached, now_ms: u64) {
        let Some(target) = self.viewport.heading_offset(&reached.marker) else {
            tracing::debug!(
                ordinal = reached.ordinal,
                element_ordinal = reached.marker.element_ordinal,
                "Heading not found in viewport"
            );
            return;
        };
        let animation = self.animator.scroll_to(&self.viewport, target, now_ms);
        self.emit(NarrationEvent::ScrollTriggered {
            ordinal: reached.ordinal,
            word_index: reached.marker.word_index,
            target: animation.to,
        });
    }

    fn start_mode(&self) -> Result<bool, NarrationError> {
        let unit_id = || {
            self.asset
                .as_ref()
                .map(|a| a.unit_id.clone())
                .unwrap_or_default()
        };
        match (self.availability, self.settings.mismatch_policy) {
            (Availability::Ready, _) => Ok(true),
            (Availability::HighlightDisabled, _) => Ok(false),
            (Availability::Stale, MismatchPolicy::DisableHighlighting) => Ok(false),
            (Availability::Stale, MismatchPolicy::HardFail) => {
                Err(NarrationError::StaleAsset { unit_id: unit_id() })
            }
            (Availability::Unavailable, _) => Err(self
                .issue
                .clone()
                .unwrap_or_else(|| NarrationError::asset_unavailable(unit_id()))),
        }
    }

    fn with_audio<T>(
        &mut self,
        f: impl FnOnce(&mut A) -> Result<T, NarrationError>,
    ) -> Result<T, NarrationError> {
        match self.audio.as_mut() {
            Some(audio) => f(audio),
            None => Err(NarrationError::playback("no audio handle")),
        }
    }

    /// Audio finished before the last word was passed
    fn complete(&mut self) {
        let cleared = self.session.as_mut().and_then(PlaybackSession::complete);
        self.emit_cleared(cleared);
        self.emit(NarrationEvent::StateChanged {
            old: SessionPhase::Playing,
            new: SessionPhase::Completed,
        });
        tracing::debug!("Narration audio ended");
    }

    /// Playback error: clear the highlight, tell the reader, go idle
    fn fail(&mut self, message: &str) {
        tracing::error!(error = %message, "Narration playback failed");
        metrics::counter!("narration_playback_errors_total").increment(1);

        let old = self.phase();
        self.cancel_frame();
        self.animator.cancel();
        if let Some(mut audio) = self.audio.take() {
            audio.stop();
        }
        let cleared = self.session.as_mut().and_then(PlaybackSession::fail);
        self.emit_cleared(cleared);
        self.notify("Narration stopped because the audio could not be played");
        self.emit(NarrationEvent::StateChanged {
            old,
            new: SessionPhase::Errored,
        });

        self.session = None;
        self.emit(NarrationEvent::StateChanged {
            old: SessionPhase::Errored,
            new: SessionPhase::Idle,
        });
    }

    fn teardown(&mut self) {
        self.cancel_frame();
        self.animator.cancel();
        if let Some(mut audio) = self.audio.take() {
            audio.stop();
        }
        if let Some(mut session) = self.session.take() {
            let cleared = session.stop();
            self.emit_cleared(cleared);
        }
    }

    fn request_frame(&mut self) {
        if self.frame.is_none() {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn emit_cleared(&self, cleared: Option<usize>) {
        if cleared.is_some() {
            self.emit(NarrationEvent::HighlightChanged {
                previous: cleared,
                current: None,
            });
        }
    }

    fn notify(&self, message: &str) {
        self.emit(NarrationEvent::Notice {
            message: message.to_string(),
        });
    }

    fn emit(&self, event: NarrationEvent) {
        let _ = self.events.send(event);
    }
}
