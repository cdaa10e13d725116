use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Player initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Player is not mounted")]
    NotMounted,

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),

    #[error("Waveform error: {0}")]
    Waveform(#[from] core_waveform::WaveformError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
