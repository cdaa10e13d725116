//! Presentation state derived for the host to render.

use serde::{Deserialize, Serialize};

/// Enablement and values for the transport bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsState {
    pub is_playing: bool,
    pub playback_rate: f64,
    pub playback_rates: Vec<f64>,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub can_skip_next: bool,
    pub can_skip_previous: bool,
}

/// What the waveform area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum WaveformDisplay {
    /// Fixed-height empty box; no surface is available.
    Placeholder { height: u32 },
    /// A surface is being created.
    Loading,
    Ready {
        #[serde(rename = "zoomLevel")]
        zoom_level: u32,
    },
}

impl WaveformDisplay {
    pub fn is_ready(&self) -> bool {
        matches!(self, WaveformDisplay::Ready { .. })
    }
}
