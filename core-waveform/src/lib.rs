//! # Waveform Module
//!
//! Lifecycle management for the external waveform rendering surface.
//!
//! ## Overview
//!
//! This module handles:
//! - Resolving the audio source a surface is built from ([`WaveformInputs`])
//! - Deciding when a surface must be rebuilt ([`needs_rebuild`])
//! - Asynchronous initialization with stale-result protection
//!   ([`PendingSurface`], [`WaveformAdapter::attach`])
//! - Zoom, point markers and highlight color on the live surface
//!
//! The surface itself comes from a host [`SurfaceFactory`](bridge_traits::SurfaceFactory);
//! nothing here draws.

pub mod adapter;
pub mod error;
pub mod pending;
pub mod points;
pub mod reconcile;
pub mod source;
pub mod zoom;

pub use adapter::{AdapterState, AttachOutcome, ReadyHandler, WaveformAdapter};
pub use error::{Result, WaveformError};
pub use pending::{InitOutcome, PendingSurface};
pub use reconcile::{needs_rebuild, WaveformDeps};
pub use source::WaveformInputs;
pub use zoom::{ZoomControls, ZoomDirection};
