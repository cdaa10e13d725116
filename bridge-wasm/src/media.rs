//! `<audio>`/`<video>` element bridge.
//!
//! [`HtmlMediaElement`] implements [`MediaElement`] on top of
//! `web_sys::HtmlMediaElement`. [`MediaEventListener`] forwards the DOM
//! media events the playback controller cares about and removes its
//! listeners when dropped.

use crate::error::{js_error, js_message};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::media::{MediaElement, MediaEvent, TrackSource};
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

const FORWARDED_EVENTS: [&str; 4] = ["loadedmetadata", "timeupdate", "ended", "error"];

/// Media bridge backed by a DOM media element.
#[derive(Clone)]
pub struct HtmlMediaElement {
    element: web_sys::HtmlMediaElement,
}

impl HtmlMediaElement {
    pub fn new(element: web_sys::HtmlMediaElement) -> Self {
        Self { element }
    }

    /// The wrapped DOM element, as handed to the rendering library.
    pub fn element(&self) -> &web_sys::HtmlMediaElement {
        &self.element
    }
}

impl MediaElement for HtmlMediaElement {
    fn set_source(&self, source: &TrackSource) -> BridgeResult<()> {
        if !source.content_type.is_empty()
            && self.element.can_play_type(&source.content_type).is_empty()
        {
            warn!(
                content_type = %source.content_type,
                "Browser reports it cannot play this content type"
            );
        }
        self.element.set_src(&source.url);
        self.element.load();
        Ok(())
    }

    fn play(&self) -> BridgeResult<()> {
        let promise = self.element.play().map_err(js_error)?;

        // Autoplay policy and interrupted loads reject the promise; the
        // element stays paused and the next `pause` event settles the UI.
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                warn!(error = %js_message(&err), "Media element refused to play");
            }
        });
        Ok(())
    }

    fn pause(&self) -> BridgeResult<()> {
        self.element.pause().map_err(js_error)
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&self, seconds: f64) -> BridgeResult<()> {
        self.element.set_current_time(seconds);
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        // NaN before metadata, +Infinity for live streams.
        let duration = self.element.duration();
        duration.is_finite().then_some(duration)
    }

    fn set_playback_rate(&self, rate: f64) -> BridgeResult<()> {
        self.element.set_playback_rate(rate);
        Ok(())
    }

    fn playback_rate(&self) -> f64 {
        self.element.playback_rate()
    }
}

/// Translate a DOM event on `element` into a [`MediaEvent`].
fn translate(event_type: &str, element: &web_sys::HtmlMediaElement) -> Option<MediaEvent> {
    match event_type {
        "loadedmetadata" => {
            let duration = element.duration();
            Some(MediaEvent::LoadedMetadata {
                duration: duration.is_finite().then_some(duration),
            })
        }
        "timeupdate" => Some(MediaEvent::TimeUpdate {
            position: element.current_time(),
        }),
        "ended" => Some(MediaEvent::Ended),
        "error" => {
            let (code, message) = match element.error() {
                Some(error) => (Some(u32::from(error.code())), error.message()),
                None => (None, "unknown media error".to_string()),
            };
            Some(MediaEvent::Error { code, message })
        }
        _ => None,
    }
}

/// Listener guard. Dropping it detaches every listener it installed.
pub struct MediaEventListener {
    element: web_sys::HtmlMediaElement,
    closures: Vec<(&'static str, Closure<dyn FnMut(web_sys::Event)>)>,
}

impl MediaEventListener {
    /// Forward media events from `element` to `handler`.
    pub fn attach(
        element: &web_sys::HtmlMediaElement,
        handler: Rc<dyn Fn(MediaEvent)>,
    ) -> BridgeResult<Self> {
        let mut listener = Self {
            element: element.clone(),
            closures: Vec::with_capacity(FORWARDED_EVENTS.len()),
        };

        for event_type in FORWARDED_EVENTS {
            let handler = Rc::clone(&handler);
            let source = element.clone();
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
                if let Some(event) = translate(event_type, &source) {
                    handler(event);
                }
            });

            element
                .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
                .map_err(js_error)?;
            // Pushed only after registration so Drop never removes a
            // listener that was not added.
            listener.closures.push((event_type, closure));
        }

        debug!(events = ?FORWARDED_EVENTS, "Media event listeners attached");
        Ok(listener)
    }
}

impl Drop for MediaEventListener {
    fn drop(&mut self) {
        for (event_type, closure) in self.closures.drain(..) {
            let _ = self
                .element
                .remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref());
        }
    }
}
