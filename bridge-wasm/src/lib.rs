//! WebAssembly Bridge Implementations
//!
//! Browser implementations of the traits defined in `bridge-traits`:
//!
//! - [`HtmlMediaElement`]: `MediaElement` over a DOM `<audio>`/`<video>`
//! - [`MediaEventListener`]: forwards `loadedmetadata`, `timeupdate`,
//!   `ended` and `error` as `MediaEvent`s
//! - [`PeaksSurfaceFactory`]: `SurfaceFactory` backed by Peaks.js
//! - [`KeyboardListener`]: document-level `keydown` forwarding
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It will not compile for native targets.

#![cfg(target_arch = "wasm32")]

pub mod bootstrap;
pub mod error;
pub mod keyboard;
pub mod media;
pub mod peaks;

// Re-export commonly used types
pub use bootstrap::{build_wasm_bridges, WasmBridgeConfig, WasmBridgeSet};
pub use error::{WasmError, WasmResult};
pub use keyboard::{KeyInput, KeyboardListener};
pub use media::{HtmlMediaElement, MediaEventListener};
pub use peaks::{PeaksSurface, PeaksSurfaceFactory, WebAudioBuffer, WebAudioContext};
