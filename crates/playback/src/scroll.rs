//! Smooth scroll animation
//!
//! Eases the viewport toward a heading over a fixed duration, one absolute
//! position write per frame. Triggering again while animating starts a new
//! animation from wherever the viewport is.

use narration_config::PlaybackSettings;
use narration_core::ScrollViewport;

/// Ease-in-out cubic over `progress` in `[0, 1]`
pub fn ease_in_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// One scroll from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f64,
    pub to: f64,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl ScrollAnimation {
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        (elapsed / self.duration_ms as f64).min(1.0)
    }

    pub fn position_at(&self, now_ms: u64) -> f64 {
        self.from + (self.to - self.from) * ease_in_out_cubic(self.progress(now_ms))
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    duration_ms: u64,
    /// Space left above the heading for a persistent header
    header_offset: f64,
    active: Option<ScrollAnimation>,
}

impl ScrollAnimator {
    pub fn new(duration_ms: u64, header_offset: f64) -> Self {
        Self {
            duration_ms,
            header_offset,
            active: None,
        }
    }

    pub fn from_settings(settings: &PlaybackSettings) -> Self {
        Self::new(settings.scroll_duration_ms, settings.header_offset_px)
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ScrollAnimation> {
        self.active.as_ref()
    }

    /// Begin scrolling so the element at `target` lands just below the header
    pub fn scroll_to(
        &mut self,
        viewport: &dyn ScrollViewport,
        target: f64,
        now_ms: u64,
    ) -> ScrollAnimation {
        let animation = ScrollAnimation {
            from: viewport.scroll_offset(),
            to: (target - self.header_offset).max(0.0),
            start_ms: now_ms,
            duration_ms: self.duration_ms,
        };
        tracing::debug!(
            from = animation.from,
            to = animation.to,
            duration_ms = animation.duration_ms,
            "Starting scroll animation"
        );
        self.active = Some(animation);
        animation
    }

    /// Write this frame's position; returns true while still animating
    pub fn step(&mut self, viewport: &mut dyn ScrollViewport, now_ms: u64) -> bool {
        let Some(animation) = self.active else {
            return false;
        };
        viewport.set_scroll_offset(animation.position_at(now_ms));
        if animation.is_finished(now_ms) {
            self.active = None;
            return false;
        }
        true
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}
