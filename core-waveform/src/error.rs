//! # Waveform Error Types

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors raised while creating or driving a rendering surface.
///
/// None of these reach the caller of the player view: initialization
/// failures degrade to a placeholder and zoom requests without a surface are
/// no-ops.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaveformError {
    /// No precomputed peaks, decoded audio or decoding context was supplied.
    #[error(
        "No waveform source data: provide precomputed peaks, decoded audio or a decoding context"
    )]
    MissingSourceData,

    /// The rendering library failed to create the surface.
    #[error("Waveform initialization failed (code {code:?}): {message}")]
    SurfaceInitializationFailure { code: Option<u32>, message: String },

    /// A surface operation was requested before the surface became ready.
    #[error("Waveform surface not ready")]
    NotReady,

    /// A live surface rejected an operation.
    #[error("Waveform surface error: {0}")]
    Surface(#[from] BridgeError),
}

impl WaveformError {
    /// Map a factory error, keeping the host error code.
    pub fn initialization(err: BridgeError) -> Self {
        match err {
            BridgeError::Rejected { code, message } => {
                WaveformError::SurfaceInitializationFailure { code, message }
            }
            other => WaveformError::SurfaceInitializationFailure {
                code: other.code(),
                message: other.to_string(),
            },
        }
    }

    /// Host error code, if any.
    pub fn code(&self) -> Option<u32> {
        match self {
            WaveformError::SurfaceInitializationFailure { code, .. } => *code,
            WaveformError::Surface(err) => err.code(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WaveformError>;
