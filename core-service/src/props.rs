//! Caller inputs for the player view.

use bridge_traits::media::{MediaHandle, TrackSource};
use bridge_traits::waveform::{DecodedAudio, DecodingContext, PointMarker};
use bytes::Bytes;
use crate::error::Result;
use core_playback::{Navigation, PlaybackError};
use core_waveform::{WaveformDeps, WaveformInputs};
use std::fmt;
use std::sync::Arc;

/// Everything the parent context hands the player on each render.
///
/// The track and the waveform data change together; the view compares
/// consecutive props to decide what to reload.
#[derive(Clone)]
pub struct PlayerProps {
    pub track: TrackSource,
    pub precomputed: Option<Bytes>,
    pub decoded: Option<Arc<dyn DecodedAudio>>,
    pub decoding_context: Option<Arc<dyn DecodingContext>>,
    /// External seek request, applied on change only.
    pub seek_time: Option<f64>,
    pub navigation: Navigation,
    pub points: Vec<PointMarker>,
}

impl PlayerProps {
    pub fn new(track: TrackSource) -> Self {
        Self {
            track,
            precomputed: None,
            decoded: None,
            decoding_context: None,
            seek_time: None,
            navigation: Navigation::default(),
            points: Vec::new(),
        }
    }

    pub fn with_precomputed(mut self, peaks: Bytes) -> Self {
        self.precomputed = Some(peaks);
        self
    }

    pub fn with_decoded(mut self, audio: Arc<dyn DecodedAudio>) -> Self {
        self.decoded = Some(audio);
        self
    }

    pub fn with_decoding_context(mut self, context: Arc<dyn DecodingContext>) -> Self {
        self.decoding_context = Some(context);
        self
    }

    pub fn with_seek_time(mut self, seek_time: Option<f64>) -> Self {
        self.seek_time = seek_time;
        self
    }

    pub fn with_navigation(mut self, navigation: Navigation) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn with_points(mut self, points: Vec<PointMarker>) -> Self {
        self.points = points;
        self
    }

    /// Reject props the controller would refuse, before anything is applied.
    pub fn validate(&self) -> Result<()> {
        match self.seek_time {
            Some(time) if !time.is_finite() => {
                Err(PlaybackError::InvalidSeekPosition(time).into())
            }
            _ => Ok(()),
        }
    }

    pub fn waveform_inputs(&self) -> WaveformInputs {
        WaveformInputs {
            url: self.track.url.clone(),
            precomputed: self.precomputed.clone(),
            decoded: self.decoded.clone(),
            decoding_context: self.decoding_context.clone(),
        }
    }

    pub(crate) fn waveform_deps(&self, media: &MediaHandle) -> WaveformDeps {
        WaveformDeps::new(Arc::clone(media), self.waveform_inputs())
    }
}

impl fmt::Debug for PlayerProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerProps")
            .field("track", &self.track)
            .field("waveform", &self.waveform_inputs())
            .field("seek_time", &self.seek_time)
            .field("navigation", &self.navigation)
            .field("points", &self.points.len())
            .finish()
    }
}
