//! Rendering surface bridge traits.
//!
//! A rendering surface is the external waveform library's live instance
//! (zoomable view, overview, point markers) bound to a media element. The
//! core never draws anything itself; it configures surfaces through
//! [`SurfaceFactory`] and drives them through [`WaveformSurface`].

use crate::{
    error::Result,
    media::MediaHandle,
    platform::{PlatformSend, PlatformSendSync},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A labelled timestamp annotation drawn on the waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMarker {
    pub label: String,
    /// Position in seconds from the start of the track.
    pub time: f64,
}

impl PointMarker {
    pub fn new(label: impl Into<String>, time: f64) -> Self {
        Self {
            label: label.into(),
            time,
        }
    }
}

/// The views a surface renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceView {
    /// The zoomable detail view.
    Zoom,
    /// The whole-track overview strip.
    Overview,
}

impl SurfaceView {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceView::Zoom => "zoomview",
            SurfaceView::Overview => "overview",
        }
    }
}

/// Decoded PCM audio owned by the host (e.g. a Web Audio `AudioBuffer`).
pub trait DecodedAudio: PlatformSendSync + Any {
    fn sample_rate(&self) -> f32;
    fn channels(&self) -> u32;
    /// Length in seconds.
    fn duration(&self) -> f64;
    fn as_any(&self) -> &dyn Any;
}

/// A host decoding context (e.g. a Web Audio `AudioContext`) that the
/// rendering library uses to fetch and decode the track itself.
pub trait DecodingContext: PlatformSendSync + Any {
    fn sample_rate(&self) -> f32;
    fn as_any(&self) -> &dyn Any;
}

/// Audio data a surface is initialized from. Exactly one variant is supplied
/// per initialization.
#[derive(Clone)]
pub enum WaveformSource {
    /// Precomputed peak data (e.g. `audiowaveform` `.dat` output).
    Precomputed(Bytes),
    /// Already decoded audio samples.
    Decoded(Arc<dyn DecodedAudio>),
    /// Decode from `url` using the given context.
    Decoding {
        context: Arc<dyn DecodingContext>,
        url: String,
    },
}

impl WaveformSource {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WaveformSource::Precomputed(_) => "precomputed",
            WaveformSource::Decoded(_) => "decoded",
            WaveformSource::Decoding { .. } => "decoding",
        }
    }
}

impl fmt::Debug for WaveformSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveformSource::Precomputed(bytes) => f
                .debug_tuple("Precomputed")
                .field(&format_args!("{} bytes", bytes.len()))
                .finish(),
            WaveformSource::Decoded(audio) => f
                .debug_struct("Decoded")
                .field("sample_rate", &audio.sample_rate())
                .field("channels", &audio.channels())
                .field("duration", &audio.duration())
                .finish(),
            WaveformSource::Decoding { context, url } => f
                .debug_struct("Decoding")
                .field("sample_rate", &context.sample_rate())
                .field("url", url)
                .finish(),
        }
    }
}

/// Configuration handed to [`SurfaceFactory::create`].
#[derive(Clone)]
pub struct SurfaceOptions {
    /// Media element the surface syncs its playhead with.
    pub media: MediaHandle,
    pub source: WaveformSource,
}

impl fmt::Debug for SurfaceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceOptions")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A live rendering surface.
pub trait WaveformSurface: PlatformSend {
    fn zoom_in(&mut self) -> Result<()>;

    fn zoom_out(&mut self) -> Result<()>;

    /// Index into the surface's discrete zoom levels.
    fn zoom_level(&self) -> u32;

    fn add_points(&mut self, points: &[PointMarker]) -> Result<()>;

    fn remove_all_points(&mut self) -> Result<()>;

    /// Set the waveform color of one view. Only valid after initialization.
    fn set_waveform_color(&mut self, view: SurfaceView, color: &str) -> Result<()>;

    /// Release canvas contexts, decoder handles and media listeners.
    fn destroy(&mut self);
}

/// Creates rendering surfaces. Creation is asynchronous: the returned future
/// resolves once the surface reports readiness or failure.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait SurfaceFactory: PlatformSendSync {
    async fn create(&self, options: SurfaceOptions) -> Result<Box<dyn WaveformSurface>>;
}
