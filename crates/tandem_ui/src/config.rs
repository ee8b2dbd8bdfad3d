//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! virtual_resolution = 720.0
//! drag_start_threshold = 12
//! strict_identities = false
//! prune_after_frames = 600
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tandem_shared::constants::{
    DEFAULT_DRAG_START_THRESHOLD, DEFAULT_SCROLL_SPEED_DRAG, DEFAULT_SCROLL_SPEED_GAMEPAD,
    DEFAULT_SCROLL_SPEED_WHEEL, DEFAULT_VIRTUAL_RESOLUTION,
};

use crate::error::ConfigError;

/// Session-wide defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Virtual size of the smallest canvas dimension.
    pub virtual_resolution: f32,
    /// Pointer displacement (physical pixels) before a press becomes a drag.
    pub drag_start_threshold: i32,
    /// Scroll offset per pointer pixel while dragging a scroll view.
    pub scroll_speed_drag: f32,
    /// Virtual units scrolled per wheel notch.
    pub scroll_speed_wheel: f32,
    /// Fraction of the viewport scrolled per frame at full gamepad deflection.
    pub scroll_speed_gamepad: f32,
    /// Report duplicate interactive identities as an error instead of a warning.
    pub strict_identities: bool,
    /// Forget element state not seen for this many frames. `None` keeps it forever.
    pub prune_after_frames: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            virtual_resolution: DEFAULT_VIRTUAL_RESOLUTION,
            drag_start_threshold: DEFAULT_DRAG_START_THRESHOLD,
            scroll_speed_drag: DEFAULT_SCROLL_SPEED_DRAG,
            scroll_speed_wheel: DEFAULT_SCROLL_SPEED_WHEEL,
            scroll_speed_gamepad: DEFAULT_SCROLL_SPEED_GAMEPAD,
            strict_identities: true,
            prune_after_frames: None,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.virtual_resolution.is_finite() || self.virtual_resolution <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "virtual_resolution must be positive, got {}",
                self.virtual_resolution
            )));
        }
        if self.drag_start_threshold < 0 {
            return Err(ConfigError::Invalid(format!(
                "drag_start_threshold must not be negative, got {}",
                self.drag_start_threshold
            )));
        }
        for (name, speed) in [
            ("scroll_speed_drag", self.scroll_speed_drag),
            ("scroll_speed_wheel", self.scroll_speed_wheel),
            ("scroll_speed_gamepad", self.scroll_speed_gamepad),
        ] {
            if !speed.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        if self.prune_after_frames == Some(0) {
            return Err(ConfigError::Invalid(
                "prune_after_frames must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.drag_start_threshold, 8);
        assert!(config.prune_after_frames.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str(
            "virtual_resolution = 720.0\nstrict_identities = false\nprune_after_frames = 60\n",
        )
        .unwrap();
        assert_eq!(config.virtual_resolution, 720.0);
        assert!(!config.strict_identities);
        assert_eq!(config.prune_after_frames, Some(60));
        assert_eq!(config.scroll_speed_wheel, DEFAULT_SCROLL_SPEED_WHEEL);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("virtual_resolution = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("drag_start_threshold = -3"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("prune_after_frames = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("virtual_resolution = \"big\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EngineConfig::from_toml_file("/nonexistent/tandem.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
