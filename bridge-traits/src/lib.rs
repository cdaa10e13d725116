//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host must implement for the player
//! core.
//!
//! ## Overview
//!
//! This crate defines the contract between the core crates and the host
//! environment. The core never touches a DOM node, an audio element or the
//! waveform rendering library directly; it reaches them through these traits.
//!
//! ## Traits
//!
//! ### Playback
//! - [`MediaElement`](media::MediaElement) - Transport controls of the native media element
//!
//! ### Waveform rendering
//! - [`SurfaceFactory`](waveform::SurfaceFactory) - Asynchronously creates rendering surfaces
//! - [`WaveformSurface`](waveform::WaveformSurface) - Zoom, point markers, colors, teardown
//! - [`DecodedAudio`](waveform::DecodedAudio) / [`DecodingContext`](waveform::DecodingContext) -
//!   Opaque host audio handles
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Web      | `bridge-wasm`       | ✅ Implemented |
//! | Native   | test doubles only   | 🧪 Tests |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert host errors (JS exceptions, `MediaError` codes) into it and
//! keep the host error code when there is one.
//!
//! ## Thread Safety
//!
//! Bridge traits are bounded by [`PlatformSendSync`](platform::PlatformSendSync)
//! or [`PlatformSend`](platform::PlatformSend): `Send`/`Sync` on native targets,
//! unbounded on `wasm32`.

pub mod error;
pub mod logging;
pub mod media;
pub mod platform;
pub mod waveform;

pub use error::BridgeError;

// Re-export commonly used types
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{same_media, MediaElement, MediaEvent, MediaHandle, TrackSource};
pub use platform::{PlatformBoxFuture, PlatformSend, PlatformSendSync};
pub use waveform::{
    DecodedAudio, DecodingContext, PointMarker, SurfaceFactory, SurfaceOptions, SurfaceView,
    WaveformSource, WaveformSurface,
};
