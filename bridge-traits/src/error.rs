use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The host rejected the request, optionally with a platform error code
    /// (e.g. `MediaError.code` in browsers).
    #[error("Host rejected operation (code {code:?}): {message}")]
    Rejected { code: Option<u32>, message: String },

    #[error("Unsupported input: {0}")]
    Unsupported(String),
}

impl BridgeError {
    /// Platform error code, when the host supplied one.
    pub fn code(&self) -> Option<u32> {
        match self {
            BridgeError::Rejected { code, .. } => *code,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
