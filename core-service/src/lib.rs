//! Player view façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (media element,
//! rendering surface factory) into the playback and waveform cores and
//! exposes a single [`PlayerView`] to host applications. WebAssembly builds
//! enable the `wasm` feature, which assembles the browser bridges from
//! `bridge-wasm` and exports a JavaScript-facing player.

pub mod error;
pub mod presentation;
pub mod props;
pub mod view;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

pub use error::{CoreError, Result};
pub use presentation::{ControlsState, WaveformDisplay};
pub use props::PlayerProps;
pub use view::PlayerView;

pub use core_playback::{Key, KeyPress, Navigation, NavigationCallback, SkipOutcome};
pub use core_waveform::{AttachOutcome, PendingSurface, ZoomDirection};

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use bridge_wasm::WasmBridgeConfig;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use wasm::{bootstrap_wasm, WasmPlayer};
