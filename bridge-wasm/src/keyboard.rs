//! Document-level `keydown` forwarding.

use crate::error::{js_error, WasmError};
use bridge_traits::error::Result as BridgeResult;
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Plain-data view of a `KeyboardEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// `KeyboardEvent.key`, e.g. `" "` for the space bar.
    pub key: String,
    pub repeat: bool,
    /// Ctrl, Alt or Meta held. Shift alone does not count.
    pub modified: bool,
    /// The event originated in a text field or contenteditable element.
    pub editable_target: bool,
}

impl KeyInput {
    fn from_event(event: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: event.key(),
            repeat: event.repeat(),
            modified: event.ctrl_key() || event.alt_key() || event.meta_key(),
            editable_target: event.target().as_ref().map_or(false, is_editable_target),
        }
    }
}

fn is_editable_target(target: &web_sys::EventTarget) -> bool {
    let Some(element) = target.dyn_ref::<web_sys::HtmlElement>() else {
        return false;
    };
    if element.is_content_editable() {
        return true;
    }
    matches!(
        element.tag_name().to_ascii_lowercase().as_str(),
        "input" | "textarea" | "select"
    )
}

/// Listener guard. Dropping it removes the `keydown` listener.
pub struct KeyboardListener {
    target: web_sys::EventTarget,
    closure: Closure<dyn FnMut(web_sys::KeyboardEvent)>,
}

impl KeyboardListener {
    /// Listen on the document. `handler` returns `true` when it consumed the
    /// key, in which case the browser default (page scroll for space) is
    /// suppressed.
    pub fn attach(handler: Rc<dyn Fn(KeyInput) -> bool>) -> BridgeResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(WasmError::NoGlobal("document"))?;
        let target: web_sys::EventTarget = document.into();

        let closure =
            Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |event: web_sys::KeyboardEvent| {
                if handler(KeyInput::from_event(&event)) {
                    event.prevent_default();
                }
            });

        target
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        debug!("Keyboard listener attached");

        Ok(Self { target, closure })
    }
}

impl Drop for KeyboardListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("keydown", self.closure.as_ref().unchecked_ref());
    }
}
