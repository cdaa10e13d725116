//! Error types for WebAssembly bridge implementations

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for WebAssembly bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WasmError {
    /// JavaScript error from web-sys or a host library
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// `window` or `document` is missing (worker or non-browser host)
    #[error("Browser global not available: {0}")]
    NoGlobal(&'static str),

    /// No element with the configured id
    #[error("Element not found: #{0}")]
    ElementNotFound(String),

    /// The element exists but has the wrong type
    #[error("Element #{id} is not a {expected}")]
    WrongElementType { id: String, expected: &'static str },

    /// The rendering library is not loaded on the page
    #[error("Peaks.js is not loaded")]
    PeaksUnavailable,

    /// The rendering library reported an initialization error
    #[error("Peaks.js rejected initialization: {message}")]
    Peaks { code: Option<u32>, message: String },

    /// The callback was dropped before it fired
    #[error("Operation cancelled")]
    Cancelled,

    /// A source the browser bridge cannot render
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl WasmError {
    /// Build a [`WasmError::Peaks`] from the error value handed to the
    /// `Peaks.init` callback.
    pub fn from_peaks(value: JsValue) -> Self {
        let code = js_sys::Reflect::get(&value, &JsValue::from_str("code"))
            .ok()
            .and_then(|code| code.as_f64())
            .filter(|code| code.is_finite() && *code >= 0.0)
            .map(|code| code as u32);

        WasmError::Peaks {
            code,
            message: js_message(&value),
        }
    }
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::NoGlobal(_) | WasmError::PeaksUnavailable => {
                BridgeError::NotAvailable(err.to_string())
            }
            WasmError::Peaks { code, message } => BridgeError::Rejected { code, message },
            WasmError::Unsupported(message) => BridgeError::Unsupported(message),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

impl From<JsValue> for WasmError {
    fn from(js_value: JsValue) -> Self {
        WasmError::JavaScript(js_message(&js_value))
    }
}

/// Best-effort message extraction from a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        text
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        error.message().into()
    } else {
        format!("{:?}", value)
    }
}

/// Shorthand for `map_err` on web-sys calls that return `Result<_, JsValue>`.
pub(crate) fn js_error(err: JsValue) -> BridgeError {
    BridgeError::from(WasmError::from(err))
}
