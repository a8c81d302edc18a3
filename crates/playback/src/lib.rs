//! Playback synchronizer
//!
//! The render-time half of narration sync. A host drives it once per frame;
//! each frame reads the audio clock, resolves the active word, moves the
//! highlight and auto-scrolls to headings as playback reaches them.
//!
//! Everything is computed from the audio position at each frame, never from
//! frame counts, so a throttled or backgrounded host stays in sync.

pub mod controller;
pub mod resolver;
pub mod scroll;
pub mod session;
pub mod state;

pub use controller::{Availability, NarrationController, NarrationEvent};
pub use resolver::{IntervalResolver, Resolution};
pub use scroll::{ease_in_out_cubic, ScrollAnimation, ScrollAnimator};
pub use session::{HeaderReached, HighlightChange, PlaybackSession, TickUpdate};
pub use state::{PlaybackState, SessionPhase};
