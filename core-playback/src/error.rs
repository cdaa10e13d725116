//! # Playback Error Types
//!
//! Error types for transport operations on the media element.

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    // ========================================================================
    // Media Element Errors
    // ========================================================================
    /// The media element rejected or failed an operation.
    #[error("Media element error: {0}")]
    Media(#[from] BridgeError),

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// Playback rate must be a finite number greater than zero.
    #[error("Invalid playback rate: {0} (must be a finite number > 0)")]
    InvalidPlaybackRate(f64),

    /// Seek target is not a finite number.
    #[error("Invalid seek position: {0}")]
    InvalidSeekPosition(f64),
}

impl PlaybackError {
    /// Returns `true` if the host refused the operation (e.g. an autoplay
    /// policy rejecting `play()`), as opposed to the player misusing the API.
    pub fn is_rejected(&self) -> bool {
        matches!(self, PlaybackError::Media(BridgeError::Rejected { .. }))
    }

    /// Returns `true` if the error was caused by an invalid argument.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidPlaybackRate(_) | PlaybackError::InvalidSeekPosition(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
