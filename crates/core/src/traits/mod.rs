//! Host capability traits
//!
//! The engine never talks to a concrete audio element or scroll container.
//! Hosts (browser bindings, native shells, tests) implement these.

mod host;

pub use host::{AudioPlayback, FrameHandle, FrameScheduler, ScrollViewport};
