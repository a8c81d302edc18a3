//! Layered settings
//!
//! Resolution order, later layers win:
//! 1. Built-in defaults (`constants`)
//! 2. Optional config file (TOML, YAML or JSON, detected by extension)
//! 3. Environment variables, `NARRATION__SECTION__KEY`

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// What to do when the render-time word sequence disagrees with the timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Play the audio but never highlight
    #[default]
    DisableHighlighting,
    /// Refuse to start narration
    HardFail,
}

/// Where narration assets are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerSettings {
    /// Headings dropped from narration (case-insensitive, trailing ':' ignored)
    pub skipped_headings: Vec<String>,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            skipped_headings: constants::normalizer::SKIPPED_HEADINGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub scroll_duration_ms: u64,
    pub header_offset_px: f64,
    pub auto_scroll: bool,
    pub mismatch_policy: MismatchPolicy,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            scroll_duration_ms: constants::scroll::DURATION_MS,
            header_offset_px: constants::scroll::HEADER_OFFSET_PX,
            auto_scroll: true,
            mismatch_policy: MismatchPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    pub backend: StorageBackend,
    pub data_dir: String,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: constants::persistence::DATA_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: constants::server::HOST.to_string(),
            port: constants::server::PORT,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationSettings {
    pub normalizer: NormalizerSettings,
    pub playback: PlaybackSettings,
    pub persistence: PersistenceSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

impl NarrationSettings {
    /// Load defaults, an optional file, then `NARRATION__*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_prefix(path, constants::ENV_PREFIX)
    }

    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "Loading narration config file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("normalizer.skipped_headings"),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;

        tracing::info!(
            backend = ?settings.persistence.backend,
            mismatch_policy = ?settings.playback.mismatch_policy,
            "Narration configuration loaded"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.playback.scroll_duration_ms == 0 {
            return Err(ConfigError::invalid(
                "playback.scroll_duration_ms",
                "must be greater than zero",
            ));
        }
        if !self.playback.header_offset_px.is_finite() || self.playback.header_offset_px < 0.0 {
            return Err(ConfigError::invalid(
                "playback.header_offset_px",
                format!("must be a non-negative number, got {}", self.playback.header_offset_px),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "must not be empty"));
        }
        if self.persistence.backend == StorageBackend::File
            && self.persistence.data_dir.trim().is_empty()
        {
            return Err(ConfigError::invalid(
                "persistence.data_dir",
                "required for the file backend",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = NarrationSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.playback.scroll_duration_ms, 800);
        assert_eq!(settings.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(
            settings.playback.mismatch_policy,
            MismatchPolicy::DisableHighlighting
        );
        assert!(settings
            .normalizer
            .skipped_headings
            .contains(&"Table of Contents".to_string()));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let settings = NarrationSettings::load_with_prefix(None, "NARRATION_TEST_NOFILE").unwrap();
        assert_eq!(settings, NarrationSettings::default());
    }

    #[test]
    fn test_load_toml_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[playback]
scroll_duration_ms = 500
mismatch_policy = "hard_fail"

[persistence]
backend = "memory"

[normalizer]
skipped_headings = ["Outline"]
"#
        )
        .unwrap();

        let settings =
            NarrationSettings::load_with_prefix(Some(file.path()), "NARRATION_TEST_TOML").unwrap();
        assert_eq!(settings.playback.scroll_duration_ms, 500);
        assert_eq!(settings.playback.mismatch_policy, MismatchPolicy::HardFail);
        assert_eq!(settings.persistence.backend, StorageBackend::Memory);
        assert_eq!(settings.normalizer.skipped_headings[0], "Outline");
        // untouched sections keep defaults
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  port: 9100\nlogging:\n  json: true").unwrap();

        let settings =
            NarrationSettings::load_with_prefix(Some(file.path()), "NARRATION_TEST_YAML").unwrap();
        assert_eq!(settings.server.port, 9100);
        assert!(settings.logging.json);
    }

    #[test]
    fn test_env_overrides_file() {
        std::env::set_var("NARRATION_TEST_ENV__SERVER__PORT", "9200");
        let settings = NarrationSettings::load_with_prefix(None, "NARRATION_TEST_ENV").unwrap();
        std::env::remove_var("NARRATION_TEST_ENV__SERVER__PORT");
        assert_eq!(settings.server.port, 9200);
    }

    #[test]
    fn test_invalid_scroll_duration_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[playback]\nscroll_duration_ms = 0").unwrap();

        let err = NarrationSettings::load_with_prefix(Some(file.path()), "NARRATION_TEST_INVALID")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "playback.scroll_duration_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_settings_round_trip_through_toml() {
        let settings = NarrationSettings::default();
        let text = toml::to_string(&settings).unwrap();
        let parsed: NarrationSettings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);

        let yaml = serde_yaml::to_string(&settings).unwrap();
        let parsed: NarrationSettings = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, settings);
    }
}
