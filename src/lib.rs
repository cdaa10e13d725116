//! Workspace umbrella crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates (`core-service`, `core-playback`, `core-waveform`). Host applications
//! can depend on `waveform-player` and enable the documented features without
//! wiring each crate individually.

#[cfg(feature = "player")]
pub use core_playback as playback;
#[cfg(feature = "player")]
pub use core_service as service;
#[cfg(feature = "player")]
pub use core_waveform as waveform;

#[cfg(feature = "player")]
pub use core_service::{PlayerProps, PlayerView};
