//! JavaScript bindings for the player view.
//!
//! [`WasmPlayer`] owns a [`PlayerView`] built from the browser bridges and
//! drives it from DOM events. Every entry point borrows the view for the
//! duration of one synchronous call. Pending waveform builds and caller
//! callbacks run on the microtask queue, never inside a borrow.
//!
//! ```javascript
//! const player = new WasmPlayer({ audioElementId: "audio", zoomviewContainerId: "zoomview" });
//! player.mount({
//!   url: "/tracks/a.mp3",
//!   contentType: "audio/mpeg",
//!   peaks: new Uint8Array(peaksBuffer),
//!   nextAvailable: true,
//!   onNext: () => loadNextTrack(),
//! });
//! ```

use crate::error::{CoreError, Result};
use crate::props::PlayerProps;
use crate::view::PlayerView;
use bridge_traits::logging::LogLevel;
use bridge_traits::media::{MediaEvent, TrackSource};
use bridge_traits::waveform::{DecodedAudio, DecodingContext, PointMarker};
use bridge_wasm::{
    build_wasm_bridges, KeyInput, KeyboardListener, MediaEventListener, WasmBridgeConfig,
    WebAudioBuffer, WebAudioContext,
};
use bytes::Bytes;
use core_playback::{
    Direction, Key, KeyPress, Navigation, NavigationCallback, SkipOutcome, TransportState,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::EventBus;
use core_runtime::logging::{init_logging, LoggingConfig};
use core_waveform::{InitOutcome, PendingSurface, ZoomDirection};
use js_sys::{Function as JsFunction, Reflect};
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

// =============================================================================
// Error Handling
// =============================================================================

fn to_js_error<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue, what: &str) -> Result<T> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| CoreError::InitializationFailed(format!("invalid {}: {}", what, err)))
}

/// Build a player view from page elements.
///
/// Returns the view and the raw media element so the caller can forward
/// media events to it.
pub fn bootstrap_wasm(
    config: &WasmBridgeConfig,
    player: PlayerConfig,
) -> Result<(PlayerView, web_sys::HtmlMediaElement)> {
    let bridges = build_wasm_bridges(config)
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;
    let bus = EventBus::new(player.event_buffer_size);
    let view = PlayerView::new(player, bridges.media, bridges.surface_factory, bus)?;
    Ok((view, bridges.element))
}

/// Install the browser console subscriber. Later calls are ignored.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging_js(level: JsValue) -> std::result::Result<(), JsValue> {
    let level: Option<LogLevel> = if level.is_undefined() || level.is_null() {
        None
    } else {
        Some(from_js(level, "log level").map_err(to_js_error)?)
    };

    let mut config = LoggingConfig::default();
    if let Some(level) = level {
        config = config.with_level(level);
    }
    if let Err(err) = init_logging(config) {
        debug!(error = %err, "Logging already initialized");
    }
    Ok(())
}

// =============================================================================
// Props
// =============================================================================

/// Serde-readable part of the props object. Buffers, audio handles and
/// callbacks are read separately.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsProps {
    url: String,
    #[serde(default)]
    content_type: String,
    #[serde(default)]
    seek_time: Option<f64>,
    #[serde(default)]
    next_available: bool,
    #[serde(default)]
    previous_available: bool,
    #[serde(default)]
    points: Vec<PointMarker>,
}

/// A Rust value derived from a JS object, reused while the caller keeps
/// passing the same object.
///
/// Rebuild decisions compare handles by identity, so converting the same
/// `Uint8Array` twice must yield the same `Bytes`.
struct Cached<T> {
    js: JsValue,
    value: T,
}

fn reuse<T: Clone>(
    slot: &mut Option<Cached<T>>,
    js: JsValue,
    convert: impl FnOnce(&JsValue) -> Result<T>,
) -> Result<Option<T>> {
    if js.is_undefined() || js.is_null() {
        *slot = None;
        return Ok(None);
    }

    if let Some(cached) = slot.as_ref() {
        if js_sys::Object::is(&cached.js, &js) {
            return Ok(Some(cached.value.clone()));
        }
    }

    let value = convert(&js)?;
    *slot = Some(Cached {
        js,
        value: value.clone(),
    });
    Ok(Some(value))
}

#[derive(Default)]
struct PropsCache {
    peaks: Option<Cached<Bytes>>,
    decoded: Option<Cached<Arc<dyn DecodedAudio>>>,
    context: Option<Cached<Arc<dyn DecodingContext>>>,
}

fn field(object: &JsValue, name: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

fn cast<T: JsCast>(value: &JsValue, what: &str) -> Result<T> {
    value
        .clone()
        .dyn_into::<T>()
        .map_err(|_| CoreError::InitializationFailed(format!("{} has the wrong type", what)))
}

/// Wrap a JS callback so it runs after the current call returns. The
/// callback usually re-renders the player, which would otherwise re-enter
/// the view while it is borrowed.
fn deferred(callback: JsFunction) -> NavigationCallback {
    Arc::new(move || {
        let callback = callback.clone();
        spawn_local(async move {
            if let Err(err) = callback.call0(&JsValue::NULL) {
                warn!(error = ?err, "Navigation callback threw");
            }
        });
    })
}

fn navigation(object: &JsValue, props: &JsProps) -> Navigation {
    let mut navigation = Navigation::new();
    if let Some(on_next) = field(object, "onNext").dyn_ref::<JsFunction>() {
        navigation = navigation.with_next(props.next_available, deferred(on_next.clone()));
    }
    if let Some(on_previous) = field(object, "onPrevious").dyn_ref::<JsFunction>() {
        navigation =
            navigation.with_previous(props.previous_available, deferred(on_previous.clone()));
    }
    navigation.next_available = props.next_available;
    navigation.previous_available = props.previous_available;
    navigation
}

impl PropsCache {
    fn read(&mut self, object: JsValue) -> Result<PlayerProps> {
        let js_props: JsProps = from_js(object.clone(), "props")?;
        let navigation = navigation(&object, &js_props);

        let peaks = reuse(&mut self.peaks, field(&object, "peaks"), |value| {
            Ok(Bytes::from(cast::<js_sys::Uint8Array>(value, "peaks")?.to_vec()))
        })?;
        let decoded = reuse(&mut self.decoded, field(&object, "audioBuffer"), |value| {
            let buffer = cast::<web_sys::AudioBuffer>(value, "audioBuffer")?;
            Ok(Arc::new(WebAudioBuffer(buffer)) as Arc<dyn DecodedAudio>)
        })?;
        let context = reuse(&mut self.context, field(&object, "audioContext"), |value| {
            let context = cast::<web_sys::AudioContext>(value, "audioContext")?;
            Ok(Arc::new(WebAudioContext(context)) as Arc<dyn DecodingContext>)
        })?;

        let mut props = PlayerProps::new(TrackSource::new(js_props.url, js_props.content_type))
            .with_seek_time(js_props.seek_time)
            .with_navigation(navigation)
            .with_points(js_props.points);
        props.precomputed = peaks;
        props.decoded = decoded;
        props.decoding_context = context;
        Ok(props)
    }
}

// =============================================================================
// Player
// =============================================================================

/// Browser player bound to one media element and one waveform container.
#[wasm_bindgen]
pub struct WasmPlayer {
    view: Rc<RefCell<PlayerView>>,
    element: web_sys::HtmlMediaElement,
    cache: PropsCache,
    keyboard: Option<KeyboardListener>,
    media_events: Option<MediaEventListener>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Look up the page elements and build an unmounted player.
    ///
    /// `playerConfig` is optional; omitted fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        bridge_config: JsValue,
        player_config: JsValue,
    ) -> std::result::Result<WasmPlayer, JsValue> {
        let bridge_config: WasmBridgeConfig =
            from_js(bridge_config, "bridge config").map_err(to_js_error)?;
        let player_config = if player_config.is_undefined() || player_config.is_null() {
            PlayerConfig::default()
        } else {
            from_js(player_config, "player config").map_err(to_js_error)?
        };

        let (view, element) = bootstrap_wasm(&bridge_config, player_config).map_err(to_js_error)?;
        Ok(Self {
            view: Rc::new(RefCell::new(view)),
            element,
            cache: PropsCache::default(),
            keyboard: None,
            media_events: None,
        })
    }

    /// Mount with the first props and start listening for keys and media
    /// events.
    pub fn mount(&mut self, props: JsValue) -> std::result::Result<(), JsValue> {
        let props = self.cache.read(props).map_err(to_js_error)?;
        let pending = self.view.borrow_mut().mount(props).map_err(to_js_error)?;
        self.spawn_attach(pending);

        if self.media_events.is_none() {
            let view = Rc::clone(&self.view);
            let listener = MediaEventListener::attach(
                &self.element,
                Rc::new(move |event: MediaEvent| forward_media_event(&view, event)),
            )
            .map_err(to_js_error)?;
            self.media_events = Some(listener);
        }

        if self.keyboard.is_none() {
            let view = Rc::clone(&self.view);
            let listener = KeyboardListener::attach(Rc::new(move |input: KeyInput| {
                forward_key(&view, input)
            }))
            .map_err(to_js_error)?;
            self.keyboard = Some(listener);
        }
        Ok(())
    }

    /// Apply new props.
    pub fn update(&mut self, props: JsValue) -> std::result::Result<(), JsValue> {
        let props = self.cache.read(props).map_err(to_js_error)?;
        let pending = self.view.borrow_mut().update(props).map_err(to_js_error)?;
        self.spawn_attach(pending);
        Ok(())
    }

    /// Remove listeners and destroy the waveform.
    pub fn unmount(&mut self) {
        self.keyboard = None;
        self.media_events = None;
        self.cache = PropsCache::default();
        self.view.borrow_mut().unmount();
    }

    /// Returns whether the player is now playing.
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) -> std::result::Result<bool, JsValue> {
        let state = self
            .view
            .borrow_mut()
            .toggle_play_pause()
            .map_err(to_js_error)?;
        Ok(state == TransportState::Playing)
    }

    #[wasm_bindgen(js_name = seekRelative)]
    pub fn seek_relative(&self, delta_seconds: f64) -> std::result::Result<f64, JsValue> {
        self.view
            .borrow_mut()
            .seek_relative(delta_seconds)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = skipForward)]
    pub fn skip_forward(&self) -> std::result::Result<f64, JsValue> {
        self.view.borrow_mut().skip_forward().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = skipBackward)]
    pub fn skip_backward(&self) -> std::result::Result<f64, JsValue> {
        self.view.borrow_mut().skip_backward().map_err(to_js_error)
    }

    /// Returns `"restarted"`, `"previous"` or `"stopped"`.
    pub fn previous(&self) -> std::result::Result<String, JsValue> {
        let outcome = self.view.borrow_mut().previous().map_err(to_js_error)?;
        Ok(outcome_name(outcome).to_string())
    }

    /// Returns `"next"` or `"stopped"`.
    pub fn next(&self) -> std::result::Result<String, JsValue> {
        let outcome = self.view.borrow_mut().next().map_err(to_js_error)?;
        Ok(outcome_name(outcome).to_string())
    }

    #[wasm_bindgen(js_name = setPlaybackRate)]
    pub fn set_playback_rate(&self, rate: f64) -> std::result::Result<(), JsValue> {
        self.view
            .borrow_mut()
            .set_playback_rate(rate)
            .map_err(to_js_error)
    }

    /// New zoom level, or `undefined` when the button is disabled.
    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) -> std::result::Result<Option<u32>, JsValue> {
        self.view
            .borrow_mut()
            .zoom(ZoomDirection::In)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) -> std::result::Result<Option<u32>, JsValue> {
        self.view
            .borrow_mut()
            .zoom(ZoomDirection::Out)
            .map_err(to_js_error)
    }

    /// Button state, as a plain object.
    pub fn controls(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.view.borrow().controls()).map_err(to_js_error)
    }

    /// `{ mode: "placeholder", height }`, `{ mode: "loading" }` or
    /// `{ mode: "ready", zoomLevel }`.
    #[wasm_bindgen(js_name = waveformDisplay)]
    pub fn waveform_display(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.view.borrow().waveform_display()).map_err(to_js_error)
    }
}

impl WasmPlayer {
    fn spawn_attach(&self, pending: Option<PendingSurface>) {
        let Some(pending) = pending else {
            return;
        };

        let view = Rc::clone(&self.view);
        spawn_local(async move {
            deliver_outcome(view, pending.await);
        });
    }
}

/// Hand a finished build to the view. If the view is borrowed right now,
/// retry on the next task so the adapter always learns the outcome.
fn deliver_outcome(view: Rc<RefCell<PlayerView>>, outcome: InitOutcome) {
    let busy = match view.try_borrow_mut() {
        Ok(mut player) => {
            player.attach_waveform(outcome);
            None
        }
        Err(_) => Some(outcome),
    };

    if let Some(outcome) = busy {
        debug!(
            generation = outcome.generation,
            "Player busy; deferring waveform attach"
        );
        spawn_local(async move {
            deliver_outcome(view, outcome);
        });
    }
}

fn outcome_name(outcome: SkipOutcome) -> &'static str {
    match outcome {
        SkipOutcome::Restarted => "restarted",
        SkipOutcome::Navigated(Direction::Next) => "next",
        SkipOutcome::Navigated(Direction::Previous) => "previous",
        SkipOutcome::Stopped => "stopped",
    }
}

fn forward_media_event(view: &Rc<RefCell<PlayerView>>, event: MediaEvent) {
    let Ok(mut view) = view.try_borrow_mut() else {
        debug!(?event, "Media event during player call; skipped");
        return;
    };
    if let Err(err) = view.handle_media_event(event) {
        debug!(error = %err, "Media event not applied");
    }
}

fn forward_key(view: &Rc<RefCell<PlayerView>>, input: KeyInput) -> bool {
    let mut press = KeyPress::new(Key::from_dom_key(&input.key));
    press.repeat = input.repeat;
    press.modified = input.modified;
    press.editable_target = input.editable_target;

    let Ok(mut view) = view.try_borrow_mut() else {
        return false;
    };
    match view.handle_key(&press) {
        Ok(handled) => handled,
        Err(err) => {
            warn!(error = %err, "Keyboard shortcut failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::WaveformDisplay;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::media::MediaElement;
    use bridge_traits::waveform::{SurfaceFactory, SurfaceOptions, SurfaceView, WaveformSurface};
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    struct SilentMedia;

    impl MediaElement for SilentMedia {
        fn set_source(&self, _source: &TrackSource) -> BridgeResult<()> {
            Ok(())
        }
        fn play(&self) -> BridgeResult<()> {
            Ok(())
        }
        fn pause(&self) -> BridgeResult<()> {
            Ok(())
        }
        fn current_time(&self) -> f64 {
            0.0
        }
        fn set_current_time(&self, _seconds: f64) -> BridgeResult<()> {
            Ok(())
        }
        fn duration(&self) -> Option<f64> {
            None
        }
        fn set_playback_rate(&self, _rate: f64) -> BridgeResult<()> {
            Ok(())
        }
        fn playback_rate(&self) -> f64 {
            1.0
        }
    }

    struct StillSurface;

    impl WaveformSurface for StillSurface {
        fn zoom_in(&mut self) -> BridgeResult<()> {
            Ok(())
        }
        fn zoom_out(&mut self) -> BridgeResult<()> {
            Ok(())
        }
        fn zoom_level(&self) -> u32 {
            0
        }
        fn add_points(&mut self, _points: &[PointMarker]) -> BridgeResult<()> {
            Ok(())
        }
        fn remove_all_points(&mut self) -> BridgeResult<()> {
            Ok(())
        }
        fn set_waveform_color(&mut self, _view: SurfaceView, _color: &str) -> BridgeResult<()> {
            Ok(())
        }
        fn destroy(&mut self) {}
    }

    struct StillFactory;

    #[async_trait::async_trait(?Send)]
    impl SurfaceFactory for StillFactory {
        async fn create(&self, _options: SurfaceOptions) -> BridgeResult<Box<dyn WaveformSurface>> {
            Ok(Box::new(StillSurface))
        }
    }

    async fn next_tick() {
        let _ = JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL)).await;
    }

    #[wasm_bindgen_test]
    async fn outcome_delivered_while_borrowed_attaches_later() {
        let view = PlayerView::new(
            PlayerConfig::default(),
            Arc::new(SilentMedia),
            Arc::new(StillFactory),
            EventBus::default(),
        )
        .unwrap();
        let view = Rc::new(RefCell::new(view));
        let props = PlayerProps::new(TrackSource::new("a.mp3", "audio/mpeg"))
            .with_precomputed(Bytes::from_static(b"peaks"));

        let pending = view.borrow_mut().mount(props).unwrap().unwrap();
        let outcome = pending.await;

        {
            let player = view.borrow_mut();
            deliver_outcome(Rc::clone(&view), outcome);
            assert_eq!(player.waveform_display(), WaveformDisplay::Loading);
        }

        for _ in 0..10 {
            if view.borrow().waveform_display().is_ready() {
                break;
            }
            next_tick().await;
        }
        assert_eq!(
            view.borrow().waveform_display(),
            WaveformDisplay::Ready { zoom_level: 0 }
        );
    }
}
