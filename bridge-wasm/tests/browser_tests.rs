//! Browser tests. Run with `wasm-pack test --headless --firefox bridge-wasm`.

#![cfg(target_arch = "wasm32")]

use bridge_traits::error::BridgeError;
use bridge_traits::media::{MediaElement, TrackSource};
use bridge_wasm::{build_wasm_bridges, HtmlMediaElement, WasmBridgeConfig, WasmError};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn append(tag: &str, id: &str) -> web_sys::Element {
    let document = document();
    let element = document.create_element(tag).unwrap();
    element.set_id(id);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn missing_media_element_is_reported() {
    let config = WasmBridgeConfig::new("no-such-audio", "no-such-zoomview");

    let err = build_wasm_bridges(&config).err().unwrap();

    assert!(matches!(
        err,
        BridgeError::OperationFailed(message) if message.contains("no-such-audio")
    ));
}

#[wasm_bindgen_test]
fn wrong_element_type_is_reported() {
    append("div", "not-audio");
    append("div", "zoomview-a");
    let config = WasmBridgeConfig::new("not-audio", "zoomview-a");

    let err = build_wasm_bridges(&config).err().unwrap();

    assert_eq!(
        err,
        BridgeError::from(WasmError::WrongElementType {
            id: "not-audio".to_string(),
            expected: "media element",
        })
    );
}

#[wasm_bindgen_test]
fn bridges_build_from_page_elements() {
    append("audio", "player-audio");
    append("div", "zoomview-b");
    append("div", "overview-b");
    let config = WasmBridgeConfig::new("player-audio", "zoomview-b").with_overview("overview-b");

    let set = build_wasm_bridges(&config).unwrap();

    assert_eq!(set.element.id(), "player-audio");
    assert_eq!(set.media.duration(), None);
}

#[wasm_bindgen_test]
fn media_bridge_mirrors_rate_and_source() {
    let element: web_sys::HtmlMediaElement = append("audio", "rate-audio").dyn_into().unwrap();
    let media = HtmlMediaElement::new(element.clone());

    media
        .set_source(&TrackSource::new("https://cdn.example/a.mp3", "audio/mpeg"))
        .unwrap();
    media.set_playback_rate(1.5).unwrap();

    assert_eq!(element.src(), "https://cdn.example/a.mp3");
    assert_eq!(media.playback_rate(), 1.5);
}

#[wasm_bindgen_test]
async fn surface_creation_fails_without_peaks_global() {
    use bridge_traits::waveform::{SurfaceFactory, SurfaceOptions, WaveformSource};
    use bytes::Bytes;

    append("audio", "peaks-audio");
    append("div", "zoomview-c");
    let set = build_wasm_bridges(&WasmBridgeConfig::new("peaks-audio", "zoomview-c")).unwrap();

    let result = set
        .surface_factory
        .create(SurfaceOptions {
            media: set.media.clone(),
            source: WaveformSource::Precomputed(Bytes::from_static(b"peaks")),
        })
        .await;

    assert!(matches!(result, Err(BridgeError::NotAvailable(_))));
}
