//! Media primitive bridge trait and supporting types.
//!
//! The media primitive is the host's native playback element (an
//! `HTMLAudioElement` in browsers). The playback controller is its only
//! writer; the waveform surface reads position from it for cursor sync.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Source descriptor for the currently loaded track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackSource {
    /// Location of the audio resource.
    pub url: String,
    /// MIME type of the resource (e.g. `audio/mpeg`).
    pub content_type: String,
}

impl TrackSource {
    pub fn new(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.into(),
        }
    }
}

/// Notifications raised by the media primitive that the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Metadata for the current source is available.
    LoadedMetadata {
        /// Track length in seconds, `None` for unbounded streams.
        duration: Option<f64>,
    },
    /// Periodic position report while playing.
    TimeUpdate { position: f64 },
    /// Playback reached the end of the track.
    Ended,
    /// The element failed to load or decode the source.
    Error { code: Option<u32>, message: String },
}

/// Transport controls of a native media element.
///
/// Methods take `&self`: browser elements are shared handles, and the same
/// element is bound to both the controller and the waveform surface.
pub trait MediaElement: PlatformSendSync {
    /// Replace the element's source and start loading it.
    fn set_source(&self, source: &TrackSource) -> Result<()>;

    /// Begin or resume playback.
    fn play(&self) -> Result<()>;

    /// Pause playback, keeping the position.
    fn pause(&self) -> Result<()>;

    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Move the position to `seconds`.
    fn set_current_time(&self, seconds: f64) -> Result<()>;

    /// Track length in seconds. `None` until metadata is loaded or for
    /// unbounded streams.
    fn duration(&self) -> Option<f64>;

    /// Apply a playback rate multiplier (1.0 = normal speed).
    fn set_playback_rate(&self, rate: f64) -> Result<()>;

    /// Playback rate currently applied by the element.
    fn playback_rate(&self) -> f64;
}

/// Shared handle to the media primitive.
pub type MediaHandle = Arc<dyn MediaElement>;

/// Returns `true` when both handles point at the same media element.
pub fn same_media(a: &MediaHandle, b: &MediaHandle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
