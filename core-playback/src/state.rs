//! Playback state owned by the controller.

use serde::{Deserialize, Serialize};

/// Two-state transport machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    #[default]
    Paused,
    Playing,
}

impl TransportState {
    pub fn toggled(self) -> Self {
        match self {
            TransportState::Paused => TransportState::Playing,
            TransportState::Playing => TransportState::Paused,
        }
    }
}

/// Local playback state, created at mount and discarded at unmount.
///
/// The rendering surface never writes to it; only the controller's
/// operations and the media event handler do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub transport: TransportState,
    pub playback_rate: f64,
    /// Last external seek target supplied by the caller.
    pub pending_seek: Option<f64>,
}

impl PlaybackState {
    pub fn new(playback_rate: f64) -> Self {
        Self {
            transport: TransportState::Paused,
            playback_rate,
            pending_seek: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(1.0)
    }
}
