//! Configuration management for narration sync
//!
//! Settings are layered with the `config` crate; constants hold the
//! built-in defaults.

pub mod constants;
pub mod settings;

pub use settings::{
    ConfigError, LoggingSettings, MismatchPolicy, NarrationSettings, NormalizerSettings,
    PersistenceSettings, PlaybackSettings, ServerSettings, StorageBackend,
};
