//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the player crates:
//! - Logging and tracing infrastructure
//! - Player configuration
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions, the configuration defaults and the
//! event broadcasting mechanism used throughout the player.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{PlayerConfig, ZoomBounds};
pub use error::{Error, Result};
pub use events::{
    EventBus, EventSeverity, EventStream, NavigationEvent, PlaybackEvent, PlayerEvent,
    WaveformEvent,
};
