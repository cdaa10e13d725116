//! Peaks.js rendering surface.
//!
//! The page must load the Peaks.js UMD bundle, which exposes the `peaks`
//! global. [`PeaksSurfaceFactory`] translates [`SurfaceOptions`] into a
//! `peaks.init` options object and resolves once the library calls back.

use crate::error::{js_error, WasmError, WasmResult};
use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::waveform::{
    DecodedAudio, DecodingContext, PointMarker, SurfaceFactory, SurfaceOptions, SurfaceView,
    WaveformSource, WaveformSurface,
};
use futures::channel::oneshot;
use js_sys::{Object, Reflect, Uint8Array};
use serde::Serialize;
use std::any::Any;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const PEAKS_GLOBAL: &str = "peaks";

#[wasm_bindgen]
extern "C" {
    type PeaksStatic;

    #[wasm_bindgen(method, catch)]
    fn init(this: &PeaksStatic, options: &JsValue, callback: &JsValue) -> Result<JsValue, JsValue>;

    /// A live `Peaks` instance.
    pub type PeaksInstance;

    #[wasm_bindgen(method)]
    fn destroy(this: &PeaksInstance);

    #[wasm_bindgen(method, getter)]
    fn zoom(this: &PeaksInstance) -> ZoomApi;

    #[wasm_bindgen(method, getter)]
    fn points(this: &PeaksInstance) -> PointsApi;

    #[wasm_bindgen(method, getter)]
    fn views(this: &PeaksInstance) -> ViewsApi;

    type ZoomApi;

    #[wasm_bindgen(method, catch, js_name = zoomIn)]
    fn zoom_in(this: &ZoomApi) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = zoomOut)]
    fn zoom_out(this: &ZoomApi) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &ZoomApi) -> f64;

    type PointsApi;

    #[wasm_bindgen(method, catch)]
    fn add(this: &PointsApi, points: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeAll)]
    fn remove_all(this: &PointsApi) -> Result<(), JsValue>;

    type ViewsApi;

    #[wasm_bindgen(method, js_name = getView)]
    fn get_view(this: &ViewsApi, name: &str) -> Option<WaveformView>;

    type WaveformView;

    #[wasm_bindgen(method, catch, js_name = setWaveformColor)]
    fn set_waveform_color(this: &WaveformView, color: &str) -> Result<(), JsValue>;
}

fn peaks_global() -> WasmResult<PeaksStatic> {
    let value = Reflect::get(&js_sys::global(), &JsValue::from_str(PEAKS_GLOBAL))?;
    if value.is_undefined() || value.is_null() {
        return Err(WasmError::PeaksUnavailable);
    }
    Ok(value.unchecked_into())
}

// ============================================================================
// Web Audio handles
// ============================================================================

/// Decoded audio held by the browser.
pub struct WebAudioBuffer(pub web_sys::AudioBuffer);

impl DecodedAudio for WebAudioBuffer {
    fn sample_rate(&self) -> f32 {
        self.0.sample_rate()
    }

    fn channels(&self) -> u32 {
        self.0.number_of_channels()
    }

    fn duration(&self) -> f64 {
        self.0.duration()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Web Audio context the library decodes the media URL with.
pub struct WebAudioContext(pub web_sys::AudioContext);

impl DecodingContext for WebAudioContext {
    fn sample_rate(&self) -> f32 {
        self.0.sample_rate()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Surface
// ============================================================================

#[derive(Serialize)]
struct PeaksPoint<'a> {
    time: f64,
    #[serde(rename = "labelText")]
    label_text: &'a str,
}

/// [`WaveformSurface`] over a Peaks.js instance.
pub struct PeaksSurface {
    instance: PeaksInstance,
    destroyed: bool,
}

impl PeaksSurface {
    pub fn new(instance: PeaksInstance) -> Self {
        Self {
            instance,
            destroyed: false,
        }
    }

    fn live(&self) -> BridgeResult<&PeaksInstance> {
        if self.destroyed {
            return Err(BridgeError::OperationFailed(
                "Peaks instance already destroyed".to_string(),
            ));
        }
        Ok(&self.instance)
    }
}

impl WaveformSurface for PeaksSurface {
    fn zoom_in(&mut self) -> BridgeResult<()> {
        self.live()?.zoom().zoom_in().map_err(js_error)
    }

    fn zoom_out(&mut self) -> BridgeResult<()> {
        self.live()?.zoom().zoom_out().map_err(js_error)
    }

    fn zoom_level(&self) -> u32 {
        if self.destroyed {
            return 0;
        }
        let level = self.instance.zoom().get_zoom();
        if level.is_finite() && level >= 0.0 {
            level as u32
        } else {
            0
        }
    }

    fn add_points(&mut self, points: &[PointMarker]) -> BridgeResult<()> {
        let payload: Vec<PeaksPoint<'_>> = points
            .iter()
            .map(|point| PeaksPoint {
                time: point.time,
                label_text: &point.label,
            })
            .collect();
        let value = serde_wasm_bindgen::to_value(&payload)
            .map_err(|err| BridgeError::OperationFailed(err.to_string()))?;
        self.live()?.points().add(&value).map_err(js_error)
    }

    fn remove_all_points(&mut self) -> BridgeResult<()> {
        self.live()?.points().remove_all().map_err(js_error)
    }

    fn set_waveform_color(&mut self, view: SurfaceView, color: &str) -> BridgeResult<()> {
        let view_handle = self
            .live()?
            .views()
            .get_view(view.as_str())
            .ok_or_else(|| BridgeError::NotAvailable(format!("{} view", view.as_str())))?;
        view_handle.set_waveform_color(color).map_err(js_error)
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.instance.destroy();
            self.destroyed = true;
        }
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Containers and zoom levels shared by every surface the factory builds.
///
/// The factory is bound to one media element at construction and ignores
/// [`SurfaceOptions::media`]. That element must be the one the player's
/// [`MediaHandle`](bridge_traits::media::MediaHandle) wraps, otherwise the
/// waveform follows a different playhead than the transport controls.
/// [`build_wasm_bridges`](crate::build_wasm_bridges) builds both from the
/// same element.
pub struct PeaksSurfaceFactory {
    media_element: web_sys::HtmlMediaElement,
    zoomview: web_sys::HtmlElement,
    overview: Option<web_sys::HtmlElement>,
    zoom_levels: Vec<u32>,
}

impl PeaksSurfaceFactory {
    pub fn new(
        media_element: web_sys::HtmlMediaElement,
        zoomview: web_sys::HtmlElement,
        overview: Option<web_sys::HtmlElement>,
        zoom_levels: Vec<u32>,
    ) -> Self {
        Self {
            media_element,
            zoomview,
            overview,
            zoom_levels,
        }
    }

    fn build_options(&self, source: &WaveformSource) -> WasmResult<Object> {
        let options = Object::new();
        set(&options, "mediaElement", &self.media_element)?;
        set(&options, "zoomview", &container(&self.zoomview)?)?;
        if let Some(overview) = &self.overview {
            set(&options, "overview", &container(overview)?)?;
        }

        let levels = serde_wasm_bindgen::to_value(&self.zoom_levels)
            .map_err(|err| WasmError::JavaScript(err.to_string()))?;
        set(&options, "zoomLevels", &levels)?;

        match source {
            WaveformSource::Precomputed(bytes) => {
                let data = Object::new();
                set(&data, "arraybuffer", &Uint8Array::from(bytes.as_ref()).buffer())?;
                set(&options, "waveformData", &data)?;
            }
            WaveformSource::Decoded(audio) => {
                let buffer = audio
                    .as_any()
                    .downcast_ref::<WebAudioBuffer>()
                    .ok_or_else(|| {
                        WasmError::Unsupported(
                            "decoded audio must be a Web Audio AudioBuffer".to_string(),
                        )
                    })?;
                let web_audio = Object::new();
                set(&web_audio, "audioBuffer", &buffer.0)?;
                set(&options, "webAudio", &web_audio)?;
            }
            WaveformSource::Decoding { context, url } => {
                let context = context
                    .as_any()
                    .downcast_ref::<WebAudioContext>()
                    .ok_or_else(|| {
                        WasmError::Unsupported(
                            "decoding context must be a Web Audio AudioContext".to_string(),
                        )
                    })?;
                // The library decodes whatever the media element points at.
                debug!(url = %url, "Decoding waveform from media source");
                let web_audio = Object::new();
                set(&web_audio, "audioContext", &context.0)?;
                set(&options, "webAudio", &web_audio)?;
            }
        }

        Ok(options)
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> WasmResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value)?;
    Ok(())
}

fn container(element: &web_sys::HtmlElement) -> WasmResult<Object> {
    let view = Object::new();
    set(&view, "container", element)?;
    Ok(view)
}

#[async_trait(?Send)]
impl SurfaceFactory for PeaksSurfaceFactory {
    /// `options.media` is not consulted; Peaks.js is handed the element
    /// this factory was built with.
    async fn create(&self, options: SurfaceOptions) -> BridgeResult<Box<dyn WaveformSurface>> {
        let peaks = peaks_global()?;
        let init_options = self.build_options(&options.source)?;

        let (sender, receiver) = oneshot::channel::<WasmResult<PeaksInstance>>();
        let callback = Closure::once_into_js(move |err: JsValue, instance: JsValue| {
            let result = if !err.is_null() && !err.is_undefined() {
                Err(WasmError::from_peaks(err))
            } else {
                Ok(instance.unchecked_into::<PeaksInstance>())
            };
            let _ = sender.send(result);
        });

        peaks.init(&init_options, &callback).map_err(js_error)?;

        let instance = receiver.await.map_err(|_| WasmError::Cancelled)??;
        info!(source = options.source.kind(), "Peaks instance ready");
        Ok(Box::new(PeaksSurface::new(instance)))
    }
}
