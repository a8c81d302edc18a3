use crate::error::Result;
use crate::types::HeaderMarker;

/// Generic audio playback capability
///
/// Positions are in seconds of the narration audio.
pub trait AudioPlayback {
    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn seek(&mut self, position: f64) -> Result<()>;

    /// Current playback position (the audio clock)
    fn position(&self) -> f64;

    /// True once the audio has played through to its end
    fn has_ended(&self) -> bool;

    /// Release the underlying audio handle
    fn stop(&mut self);

    /// Failure reported asynchronously by the audio primitive, if any
    fn take_error(&mut self) -> Option<String> {
        None
    }
}

/// Generic scrollable viewport capability
pub trait ScrollViewport {
    fn scroll_offset(&self) -> f64;

    /// Write an absolute scroll position
    fn set_scroll_offset(&mut self, offset: f64);

    /// Absolute document position of the heading a marker was built from
    ///
    /// Hosts locate the element by `marker.element_ordinal`, which counts
    /// every rendered heading, narrated or not.
    fn heading_offset(&self, marker: &HeaderMarker) -> Option<f64>;
}

/// Token for a pending frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Per-frame callback scheduling, e.g. `requestAnimationFrame`
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}
