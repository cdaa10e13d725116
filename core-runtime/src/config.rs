//! # Player Configuration
//!
//! Policy constants for the player UI. None of these values are inherent to
//! the media element or the rendering library; they are choices the player
//! makes and hosts may override them.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::default()
//!     .with_restart_threshold(2.0)
//!     .with_highlight_color("#ff5500");
//! assert!(config.validate().is_ok());
//! ```
//!
//! Configurations can also be loaded from JSON; missing fields take their
//! defaults:
//!
//! ```
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::from_json(r#"{ "zoom": { "min": 0, "max": 5 } }"#).unwrap();
//! assert_eq!(config.zoom.max, 5);
//! assert_eq!(config.restart_threshold_secs, 1.0);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Inclusive range of zoom levels the UI lets the user move between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomBounds {
    /// Lowest level; zoom-in is disabled here.
    pub min: u32,
    /// Highest level; zoom-out is disabled here.
    pub max: u32,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 0, max: 3 }
    }
}

impl ZoomBounds {
    /// Zoom-in moves toward `min`.
    pub fn can_zoom_in(&self, level: u32) -> bool {
        level > self.min
    }

    /// Zoom-out moves toward `max`.
    pub fn can_zoom_out(&self, level: u32) -> bool {
        level < self.max
    }
}

/// Player configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Position (seconds) above which "previous" restarts the current track
    /// instead of navigating to the previous one.
    ///
    /// Default: 1.0 second.
    #[serde(default = "default_restart_threshold_secs")]
    pub restart_threshold_secs: f64,

    /// Zoom levels the zoom buttons may move between.
    ///
    /// Default: 0..=3.
    #[serde(default)]
    pub zoom: ZoomBounds,

    /// Distance (seconds) jumped by the skip-back/skip-forward controls.
    ///
    /// Default: 10 seconds.
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: f64,

    /// Rates offered by the playback-rate selector.
    #[serde(default = "default_playback_rates")]
    pub playback_rates: Vec<f64>,

    /// Rate applied at mount.
    ///
    /// Default: 1.0.
    #[serde(default = "default_playback_rate")]
    pub default_playback_rate: f64,

    /// CSS color applied to the zoomed waveform view after initialization.
    #[serde(default)]
    pub highlight_color: Option<String>,

    /// Height (CSS pixels) of the box shown when the waveform is unavailable.
    ///
    /// Default: 150.
    #[serde(default = "default_placeholder_height_px")]
    pub placeholder_height_px: u32,

    /// Capacity of the player event bus.
    ///
    /// Default: 100 events.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            restart_threshold_secs: default_restart_threshold_secs(),
            zoom: ZoomBounds::default(),
            seek_step_secs: default_seek_step_secs(),
            playback_rates: default_playback_rates(),
            default_playback_rate: default_playback_rate(),
            highlight_color: None,
            placeholder_height_px: default_placeholder_height_px(),
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

impl PlayerConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid player config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_restart_threshold(mut self, seconds: f64) -> Self {
        self.restart_threshold_secs = seconds;
        self
    }

    pub fn with_zoom_bounds(mut self, min: u32, max: u32) -> Self {
        self.zoom = ZoomBounds { min, max };
        self
    }

    pub fn with_seek_step(mut self, seconds: f64) -> Self {
        self.seek_step_secs = seconds;
        self
    }

    pub fn with_highlight_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = Some(color.into());
        self
    }

    pub fn with_placeholder_height(mut self, px: u32) -> Self {
        self.placeholder_height_px = px;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.restart_threshold_secs.is_finite() || self.restart_threshold_secs < 0.0 {
            return Err(Error::Config(
                "restart_threshold_secs must be a non-negative number".to_string(),
            ));
        }

        if self.zoom.min > self.zoom.max {
            return Err(Error::Config(format!(
                "zoom.min ({}) cannot exceed zoom.max ({})",
                self.zoom.min, self.zoom.max
            )));
        }

        if !self.seek_step_secs.is_finite() || self.seek_step_secs <= 0.0 {
            return Err(Error::Config("seek_step_secs must be > 0".to_string()));
        }

        if let Some(rate) = self
            .playback_rates
            .iter()
            .find(|rate| !rate.is_finite() || **rate <= 0.0)
        {
            return Err(Error::Config(format!("Invalid playback rate: {}", rate)));
        }

        if !self.default_playback_rate.is_finite() || self.default_playback_rate <= 0.0 {
            return Err(Error::Config(
                "default_playback_rate must be > 0".to_string(),
            ));
        }

        if matches!(&self.highlight_color, Some(color) if color.trim().is_empty()) {
            return Err(Error::Config(
                "highlight_color cannot be empty".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config("event_buffer_size must be > 0".to_string()));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_restart_threshold_secs() -> f64 {
    1.0
}

fn default_seek_step_secs() -> f64 {
    10.0
}

fn default_playback_rates() -> Vec<f64> {
    vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0]
}

fn default_playback_rate() -> f64 {
    1.0
}

fn default_placeholder_height_px() -> u32 {
    150
}

fn default_event_buffer_size() -> usize {
    crate::events::DEFAULT_EVENT_BUFFER_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.restart_threshold_secs, 1.0);
        assert_eq!(config.zoom, ZoomBounds { min: 0, max: 3 });
        assert_eq!(config.default_playback_rate, 1.0);
        assert!(config.highlight_color.is_none());
    }

    #[test]
    fn test_zoom_bounds_enablement() {
        let bounds = ZoomBounds::default();

        assert!(!bounds.can_zoom_in(0));
        assert!(bounds.can_zoom_in(1));
        assert!(bounds.can_zoom_out(2));
        assert!(!bounds.can_zoom_out(3));
    }

    #[test]
    fn test_config_validation() {
        let mut config = PlayerConfig::default();

        config.restart_threshold_secs = -1.0;
        assert!(config.validate().is_err());
        config.restart_threshold_secs = 1.0;

        config.zoom = ZoomBounds { min: 4, max: 3 };
        assert!(config.validate().is_err());
        config.zoom = ZoomBounds::default();

        config.playback_rates.push(0.0);
        assert!(config.validate().is_err());
        config.playback_rates.pop();

        config.highlight_color = Some("  ".to_string());
        assert!(config.validate().is_err());
        config.highlight_color = Some("#1e90ff".to_string());

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let config = PlayerConfig::from_json(r#"{ "highlight_color": "red" }"#).unwrap();
        assert_eq!(config.highlight_color.as_deref(), Some("red"));
        assert_eq!(config.seek_step_secs, 10.0);
        assert_eq!(config.placeholder_height_px, 150);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(PlayerConfig::from_json(r#"{ "seek_step_secs": 0 }"#).is_err());
        assert!(PlayerConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = PlayerConfig::default()
            .with_restart_threshold(2.5)
            .with_zoom_bounds(1, 6)
            .with_seek_step(5.0)
            .with_placeholder_height(80);

        assert_eq!(config.restart_threshold_secs, 2.5);
        assert_eq!(config.zoom.max, 6);
        assert_eq!(config.seek_step_secs, 5.0);
        assert_eq!(config.placeholder_height_px, 80);
    }
}
