//! Convenience helpers for wiring the browser bridges together.
//!
//! Host pages call [`build_wasm_bridges`] with the ids of the media element
//! and the waveform containers. The result carries the trait objects the
//! player view is built from, plus the raw media element for event
//! forwarding.

use crate::error::WasmError;
use crate::media::HtmlMediaElement;
use crate::peaks::PeaksSurfaceFactory;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::media::MediaHandle;
use bridge_traits::waveform::SurfaceFactory;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use wasm_bindgen::JsCast;

/// Configuration for [`build_wasm_bridges`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasmBridgeConfig {
    /// Id of the `<audio>` or `<video>` element.
    pub audio_element_id: String,
    /// Id of the container the zoomable waveform renders into.
    pub zoomview_container_id: String,
    /// Id of the overview container, if the page has one.
    #[serde(default)]
    pub overview_container_id: Option<String>,
    /// Samples per pixel for each zoom level, most detailed first.
    #[serde(default = "default_zoom_levels")]
    pub zoom_levels: Vec<u32>,
}

fn default_zoom_levels() -> Vec<u32> {
    vec![256, 512, 1024, 2048]
}

impl WasmBridgeConfig {
    pub fn new(
        audio_element_id: impl Into<String>,
        zoomview_container_id: impl Into<String>,
    ) -> Self {
        Self {
            audio_element_id: audio_element_id.into(),
            zoomview_container_id: zoomview_container_id.into(),
            overview_container_id: None,
            zoom_levels: default_zoom_levels(),
        }
    }

    pub fn with_overview(mut self, container_id: impl Into<String>) -> Self {
        self.overview_container_id = Some(container_id.into());
        self
    }

    pub fn with_zoom_levels(mut self, levels: Vec<u32>) -> Self {
        self.zoom_levels = levels;
        self
    }
}

/// Fully constructed browser bridges ready for injection into the core.
pub struct WasmBridgeSet {
    /// Media bridge over the page's media element.
    pub media: MediaHandle,
    /// Peaks.js surface factory bound to the same element. It ignores
    /// `SurfaceOptions::media`, so `media` and this factory must not be
    /// mixed with bridges from another set.
    pub surface_factory: Arc<dyn SurfaceFactory>,
    /// The raw element, for attaching a [`MediaEventListener`](crate::MediaEventListener).
    pub element: web_sys::HtmlMediaElement,
}

/// Look up the configured elements and build the bridges.
pub fn build_wasm_bridges(config: &WasmBridgeConfig) -> BridgeResult<WasmBridgeSet> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(WasmError::NoGlobal("document"))?;

    let element: web_sys::HtmlMediaElement =
        element_by_id(&document, &config.audio_element_id, "media element")?;
    let zoomview: web_sys::HtmlElement =
        element_by_id(&document, &config.zoomview_container_id, "HTML element")?;
    let overview = config
        .overview_container_id
        .as_deref()
        .map(|id| element_by_id::<web_sys::HtmlElement>(&document, id, "HTML element"))
        .transpose()?;

    let media: MediaHandle = Arc::new(HtmlMediaElement::new(element.clone()));
    let surface_factory: Arc<dyn SurfaceFactory> = Arc::new(PeaksSurfaceFactory::new(
        element.clone(),
        zoomview,
        overview,
        config.zoom_levels.clone(),
    ));

    info!(
        media = %config.audio_element_id,
        zoomview = %config.zoomview_container_id,
        "Browser bridges ready"
    );
    Ok(WasmBridgeSet {
        media,
        surface_factory,
        element,
    })
}

fn element_by_id<T: JsCast>(
    document: &web_sys::Document,
    id: &str,
    expected: &'static str,
) -> Result<T, WasmError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| WasmError::ElementNotFound(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| WasmError::WrongElementType {
            id: id.to_string(),
            expected,
        })
}
