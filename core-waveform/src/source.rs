//! Waveform source resolution.
//!
//! The caller may hand over any combination of precomputed peaks, decoded
//! audio and a decoding context. Exactly one is used, in the order the
//! rendering library prefers them: precomputed peaks skip decoding entirely,
//! decoded audio skips the fetch, and a decoding context fetches and decodes
//! the track URL itself.

use crate::error::{Result, WaveformError};
use bridge_traits::waveform::{DecodedAudio, DecodingContext, WaveformSource};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Optional waveform inputs supplied alongside a track.
#[derive(Clone, Default)]
pub struct WaveformInputs {
    /// Track URL, used by the decoding-context variant.
    pub url: String,
    pub precomputed: Option<Bytes>,
    pub decoded: Option<Arc<dyn DecodedAudio>>,
    pub decoding_context: Option<Arc<dyn DecodingContext>>,
}

impl WaveformInputs {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
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

    /// `true` when at least one source is present.
    pub fn has_source(&self) -> bool {
        self.precomputed.is_some() || self.decoded.is_some() || self.decoding_context.is_some()
    }

    /// Pick the source to initialize from.
    pub fn resolve(&self) -> Result<WaveformSource> {
        if let Some(peaks) = &self.precomputed {
            return Ok(WaveformSource::Precomputed(peaks.clone()));
        }
        if let Some(audio) = &self.decoded {
            return Ok(WaveformSource::Decoded(Arc::clone(audio)));
        }
        if let Some(context) = &self.decoding_context {
            return Ok(WaveformSource::Decoding {
                context: Arc::clone(context),
                url: self.url.clone(),
            });
        }
        Err(WaveformError::MissingSourceData)
    }
}

impl fmt::Debug for WaveformInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaveformInputs")
            .field("url", &self.url)
            .field("precomputed", &self.precomputed.as_ref().map(Bytes::len))
            .field("decoded", &self.decoded.is_some())
            .field("decoding_context", &self.decoding_context.is_some())
            .finish()
    }
}
