//! # Playback Control Module
//!
//! Transport logic for the player: play/pause, seeking, playback rate, track
//! navigation and keyboard shortcuts.
//!
//! ## Overview
//!
//! This module handles:
//! - [`PlaybackController`]: owns [`PlaybackState`] and mirrors it onto the
//!   host media element through [`bridge_traits::MediaElement`]
//! - [`SeekSignal`]: edge-triggered external seek requests
//! - [`Navigation`]: next/previous availability and caller callbacks
//! - [`ShortcutRegistry`]: view-scoped key bindings

pub mod controller;
pub mod error;
pub mod navigation;
pub mod seek;
pub mod shortcuts;
pub mod state;

pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use navigation::{Direction, Navigation, NavigationCallback, NavigationHandler, SkipOutcome};
pub use seek::SeekSignal;
pub use shortcuts::{Key, KeyPress, ShortcutAction, ShortcutRegistry};
pub use state::{PlaybackState, TransportState};
