//! Centralized defaults for narration sync
//!
//! Single source of truth for values that would otherwise be repeated
//! across the playback, persistence and server crates.

/// Auto-scroll animation
pub mod scroll {
    /// Duration of one smooth-scroll animation
    pub const DURATION_MS: u64 = 800;

    /// Space kept above a heading so a persistent page header does not cover it
    pub const HEADER_OFFSET_PX: f64 = 96.0;
}

/// Text normalization
pub mod normalizer {
    /// Structural headings whose text is never narrated
    pub const SKIPPED_HEADINGS: &[&str] = &["Table of Contents", "Contents", "In this lesson"];
}

/// Asset storage
pub mod persistence {
    pub const DATA_DIR: &str = "data/narration";
}

/// HTTP surface
pub mod server {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
}

/// Environment variable prefix, e.g. `NARRATION__SERVER__PORT`
pub const ENV_PREFIX: &str = "NARRATION";
