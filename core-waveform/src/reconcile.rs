//! Rebuild decision for the rendering surface.
//!
//! A surface is bound to one media element and one audio source. When either
//! changes identity the surface has to be destroyed and recreated; anything
//! else (points, colors, zoom) is applied to the live surface.

use crate::source::WaveformInputs;
use bridge_traits::media::{same_media, MediaHandle};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Everything a surface is built from.
#[derive(Clone)]
pub struct WaveformDeps {
    pub media: MediaHandle,
    pub inputs: WaveformInputs,
}

impl WaveformDeps {
    pub fn new(media: MediaHandle, inputs: WaveformInputs) -> Self {
        Self { media, inputs }
    }
}

impl fmt::Debug for WaveformDeps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaveformDeps")
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Returns `true` when moving from `old` to `new` requires a new surface.
///
/// Handles are compared by identity, not content: the caller hands over the
/// same `Arc`/`Bytes` for as long as the track does not change.
pub fn needs_rebuild(old: &WaveformDeps, new: &WaveformDeps) -> bool {
    !same_media(&old.media, &new.media)
        || old.inputs.url != new.inputs.url
        || !same_option(&old.inputs.decoding_context, &new.inputs.decoding_context, |a, b| {
            std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
        })
        || !same_option(&old.inputs.decoded, &new.inputs.decoded, |a, b| {
            std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
        })
        || !same_option(&old.inputs.precomputed, &new.inputs.precomputed, same_bytes)
}

fn same_option<T>(a: &Option<T>, b: &Option<T>, same: impl Fn(&T, &T) -> bool) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => same(a, b),
        _ => false,
    }
}

fn same_bytes(a: &Bytes, b: &Bytes) -> bool {
    a.as_ptr() == b.as_ptr() && a.len() == b.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::media::{MediaElement, TrackSource};
    use bridge_traits::waveform::DecodingContext;
    use std::any::Any;

    struct Media;

    impl MediaElement for Media {
        fn set_source(&self, _source: &TrackSource) -> BridgeResult<()> {
            Ok(())
        }
        fn play(&self) -> BridgeResult<()> {
            Ok(())
        }
        fn pause(&self) -> BridgeResult<()> {
            Ok(())
        }
        fn current_time(&self) -> f64 {
            0.0
        }
        fn set_current_time(&self, _seconds: f64) -> BridgeResult<()> {
            Ok(())
        }
        fn duration(&self) -> Option<f64> {
            None
        }
        fn set_playback_rate(&self, _rate: f64) -> BridgeResult<()> {
            Ok(())
        }
        fn playback_rate(&self) -> f64 {
            1.0
        }
    }

    struct Context;

    impl DecodingContext for Context {
        fn sample_rate(&self) -> f32 {
            44100.0
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn deps(media: &MediaHandle, inputs: WaveformInputs) -> WaveformDeps {
        WaveformDeps::new(Arc::clone(media), inputs)
    }

    #[test]
    fn test_identical_deps_do_not_rebuild() {
        let media: MediaHandle = Arc::new(Media);
        let peaks = Bytes::from(vec![1u8, 2, 3]);
        let old = deps(&media, WaveformInputs::new("a.mp3").with_precomputed(peaks.clone()));
        let new = deps(&media, WaveformInputs::new("a.mp3").with_precomputed(peaks));

        assert!(!needs_rebuild(&old, &new));
    }

    #[test]
    fn test_track_change_rebuilds() {
        let media: MediaHandle = Arc::new(Media);
        let context: Arc<dyn DecodingContext> = Arc::new(Context);
        let old = deps(&media, WaveformInputs::new("a.mp3").with_decoding_context(context.clone()));
        let new = deps(&media, WaveformInputs::new("b.mp3").with_decoding_context(context));

        assert!(needs_rebuild(&old, &new));
    }

    #[test]
    fn test_media_identity_rebuilds() {
        let a: MediaHandle = Arc::new(Media);
        let b: MediaHandle = Arc::new(Media);
        let inputs = WaveformInputs::new("a.mp3");

        assert!(needs_rebuild(&deps(&a, inputs.clone()), &deps(&b, inputs)));
    }

    #[test]
    fn test_equal_content_different_buffer_rebuilds() {
        let media: MediaHandle = Arc::new(Media);
        let old = deps(
            &media,
            WaveformInputs::new("a.mp3").with_precomputed(Bytes::from(vec![7u8; 4])),
        );
        let new = deps(
            &media,
            WaveformInputs::new("a.mp3").with_precomputed(Bytes::from(vec![7u8; 4])),
        );

        assert!(needs_rebuild(&old, &new));
    }

    #[test]
    fn test_context_added_rebuilds() {
        let media: MediaHandle = Arc::new(Media);
        let old = deps(&media, WaveformInputs::new("a.mp3"));
        let new = deps(
            &media,
            WaveformInputs::new("a.mp3").with_decoding_context(Arc::new(Context)),
        );

        assert!(needs_rebuild(&old, &new));
    }
}
