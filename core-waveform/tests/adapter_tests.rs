//! Lifecycle tests for the waveform adapter.
//!
//! The rendering library is replaced by a fake factory whose surfaces record
//! every call into a shared log, so ordering between teardown and creation
//! can be asserted directly.

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::media::{MediaElement, MediaHandle, TrackSource};
use bridge_traits::waveform::{
    PointMarker, SurfaceFactory, SurfaceOptions, SurfaceView, WaveformSurface,
};
use bytes::Bytes;
use core_runtime::events::{EventBus, PlayerEvent, WaveformEvent};
use core_waveform::{
    AdapterState, AttachOutcome, WaveformAdapter, WaveformDeps, WaveformError, WaveformInputs,
    ZoomDirection,
};
use futures::executor::block_on;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Fakes
// ============================================================================

type Log = Arc<Mutex<Vec<String>>>;

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn position(log: &Log, entry: &str) -> usize {
    entries(log)
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("missing log entry {entry}: {:?}", entries(log)))
}

struct FakeMedia;

impl MediaElement for FakeMedia {
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
        Some(180.0)
    }
    fn set_playback_rate(&self, _rate: f64) -> BridgeResult<()> {
        Ok(())
    }
    fn playback_rate(&self) -> f64 {
        1.0
    }
}

struct FakeSurface {
    id: usize,
    zoom: u32,
    log: Log,
}

impl FakeSurface {
    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl WaveformSurface for FakeSurface {
    fn zoom_in(&mut self) -> BridgeResult<()> {
        self.zoom = self.zoom.saturating_sub(1);
        self.record(format!("zoom_in:{}", self.id));
        Ok(())
    }

    fn zoom_out(&mut self) -> BridgeResult<()> {
        self.zoom = (self.zoom + 1).min(3);
        self.record(format!("zoom_out:{}", self.id));
        Ok(())
    }

    fn zoom_level(&self) -> u32 {
        self.zoom
    }

    fn add_points(&mut self, points: &[PointMarker]) -> BridgeResult<()> {
        let labels: Vec<_> = points.iter().map(|p| p.label.as_str()).collect();
        self.record(format!("add_points:{}:{}", self.id, labels.join(",")));
        Ok(())
    }

    fn remove_all_points(&mut self) -> BridgeResult<()> {
        self.record(format!("remove_points:{}", self.id));
        Ok(())
    }

    fn set_waveform_color(&mut self, view: SurfaceView, color: &str) -> BridgeResult<()> {
        self.record(format!("color:{}:{}:{}", self.id, view.as_str(), color));
        Ok(())
    }

    fn destroy(&mut self) {
        self.record(format!("destroy:{}", self.id));
    }
}

enum Plan {
    Ready { zoom: u32 },
    Fail { code: Option<u32>, message: &'static str },
}

struct FakeFactory {
    log: Log,
    created: AtomicUsize,
    plans: Mutex<VecDeque<Plan>>,
}

impl FakeFactory {
    fn new(log: Log) -> Self {
        Self {
            log,
            created: AtomicUsize::new(0),
            plans: Mutex::new(VecDeque::new()),
        }
    }

    fn then(self, plan: Plan) -> Self {
        self.plans.lock().unwrap().push_back(plan);
        self
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl SurfaceFactory for FakeFactory {
    async fn create(&self, options: SurfaceOptions) -> BridgeResult<Box<dyn WaveformSurface>> {
        let id = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        self.log
            .lock()
            .unwrap()
            .push(format!("create:{}:{}", id, options.source.kind()));

        let plan = self
            .plans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Plan::Ready { zoom: 0 });

        match plan {
            Plan::Ready { zoom } => Ok(Box::new(FakeSurface {
                id,
                zoom,
                log: self.log.clone(),
            })),
            Plan::Fail { code, message } => Err(BridgeError::Rejected {
                code,
                message: message.to_string(),
            }),
        }
    }
}

fn peaks_deps(media: &MediaHandle, url: &str, peaks: &Bytes) -> WaveformDeps {
    WaveformDeps::new(
        Arc::clone(media),
        WaveformInputs::new(url).with_precomputed(peaks.clone()),
    )
}

fn setup(factory: FakeFactory) -> (WaveformAdapter, MediaHandle) {
    let media: MediaHandle = Arc::new(FakeMedia);
    (WaveformAdapter::new(Arc::new(factory)), media)
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_missing_source_data_fails_without_surface() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log.clone()));

    let err = adapter
        .initialize(WaveformDeps::new(media, WaveformInputs::new("a.mp3")))
        .unwrap_err();

    assert_eq!(err, WaveformError::MissingSourceData);
    assert_eq!(
        adapter.state(),
        &AdapterState::Failed(WaveformError::MissingSourceData)
    );
    assert!(!adapter.is_ready());
    assert!(entries(&log).is_empty());
}

#[test]
fn test_successful_initialization_reports_ready() {
    let log = Log::default();
    let (mut adapter, media) =
        setup(FakeFactory::new(log.clone()).then(Plan::Ready { zoom: 1 }));
    let peaks = Bytes::from_static(b"peaks");

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    assert_eq!(
        adapter.state(),
        &AdapterState::Initializing {
            generation: pending.generation()
        }
    );
    assert_eq!(adapter.zoom_level(), None);

    let outcome = adapter.attach(block_on(pending));

    assert_eq!(
        outcome,
        AttachOutcome::Ready {
            generation: 1,
            zoom_level: 1
        }
    );
    assert_eq!(adapter.state(), &AdapterState::Ready);
    assert_eq!(adapter.zoom_level(), Some(1));
    assert_eq!(entries(&log), vec!["create:1:precomputed"]);
}

#[test]
fn test_factory_failure_keeps_code_and_message() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log).then(Plan::Fail {
        code: Some(3),
        message: "decode failed",
    }));
    let peaks = Bytes::from_static(b"peaks");

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    let outcome = adapter.attach(block_on(pending));

    let expected = WaveformError::SurfaceInitializationFailure {
        code: Some(3),
        message: "decode failed".to_string(),
    };
    assert_eq!(
        outcome,
        AttachOutcome::Failed {
            generation: 1,
            error: expected.clone()
        }
    );
    assert_eq!(adapter.state(), &AdapterState::Failed(expected));
    assert!(adapter.zoom(ZoomDirection::In).is_err());
}

#[test]
fn test_on_ready_called_once_per_success() {
    let log = Log::default();
    let (mut adapter, media) = setup(
        FakeFactory::new(log)
            .then(Plan::Ready { zoom: 2 })
            .then(Plan::Fail {
                code: None,
                message: "boom",
            })
            .then(Plan::Ready { zoom: 0 }),
    );
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    adapter.on_ready(move |surface: &mut dyn WaveformSurface| {
        sink.lock().unwrap().push(surface.zoom_level());
    });

    for url in ["a.mp3", "b.mp3", "c.mp3"] {
        let peaks = Bytes::from(url.as_bytes().to_vec());
        let pending = adapter.initialize(peaks_deps(&media, url, &peaks)).unwrap();
        adapter.attach(block_on(pending));
    }

    assert_eq!(*seen.lock().unwrap(), vec![2, 0]);
}

// ============================================================================
// Rebuilds
// ============================================================================

#[test]
fn test_track_change_destroys_before_creating() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log.clone()));
    let peaks_a = Bytes::from_static(b"track-a");
    let peaks_b = Bytes::from_static(b"track-b");

    let pending = adapter
        .sync(peaks_deps(&media, "a.mp3", &peaks_a))
        .unwrap()
        .expect("first sync initializes");
    adapter.attach(block_on(pending));

    let pending = adapter
        .sync(peaks_deps(&media, "b.mp3", &peaks_b))
        .unwrap()
        .expect("track change rebuilds");
    assert!(!adapter.is_ready());
    adapter.attach(block_on(pending));

    assert!(position(&log, "destroy:1") < position(&log, "create:2:precomputed"));
    assert!(adapter.is_ready());
}

#[test]
fn test_sync_with_same_deps_keeps_surface() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log.clone()));
    let peaks = Bytes::from_static(b"track-a");

    let pending = adapter
        .sync(peaks_deps(&media, "a.mp3", &peaks))
        .unwrap()
        .unwrap();
    adapter.attach(block_on(pending));

    assert!(adapter
        .sync(peaks_deps(&media, "a.mp3", &peaks))
        .unwrap()
        .is_none());
    assert_eq!(entries(&log), vec!["create:1:precomputed"]);
}

#[test]
fn test_stale_surface_is_destroyed_on_attach() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log.clone()));
    let peaks_a = Bytes::from_static(b"track-a");
    let peaks_b = Bytes::from_static(b"track-b");

    // Track B arrives before A's surface reported readiness.
    let pending_a = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks_a)).unwrap();
    let pending_b = adapter.initialize(peaks_deps(&media, "b.mp3", &peaks_b)).unwrap();

    let stale = adapter.attach(block_on(pending_a));
    assert_eq!(stale, AttachOutcome::Stale { generation: 1 });
    assert!(entries(&log).contains(&"destroy:1".to_string()));
    assert!(!adapter.is_ready());

    let ready = adapter.attach(block_on(pending_b));
    assert!(matches!(ready, AttachOutcome::Ready { generation: 2, .. }));
    assert!(adapter.is_ready());
}

#[test]
fn test_outcome_after_teardown_is_stale() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log.clone()));
    let peaks = Bytes::from_static(b"track-a");

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    adapter.teardown();

    assert!(matches!(
        adapter.attach(block_on(pending)),
        AttachOutcome::Stale { .. }
    ));
    assert_eq!(entries(&log), vec!["create:1:precomputed", "destroy:1"]);
    assert_eq!(adapter.state(), &AdapterState::Idle);
}

#[test]
fn test_drop_destroys_live_surface() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log.clone()));
    let peaks = Bytes::from_static(b"track-a");

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    adapter.attach(block_on(pending));
    drop(adapter);

    assert_eq!(entries(&log).last().map(String::as_str), Some("destroy:1"));
}

// ============================================================================
// Live surface operations
// ============================================================================

#[test]
fn test_zoom_before_ready_is_not_ready() {
    let (mut adapter, _media) = setup(FakeFactory::new(Log::default()));
    assert_eq!(
        adapter.zoom(ZoomDirection::Out),
        Err(WaveformError::NotReady)
    );
    assert!(!adapter.zoom_controls().can_zoom_in);
    assert!(!adapter.zoom_controls().can_zoom_out);
}

#[test]
fn test_zoom_rereads_level() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log).then(Plan::Ready { zoom: 0 }));
    let peaks = Bytes::from_static(b"track-a");

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    adapter.attach(block_on(pending));

    let controls = adapter.zoom_controls();
    assert!(!controls.can_zoom_in);
    assert!(controls.can_zoom_out);

    for expected in 1..=3 {
        assert_eq!(adapter.zoom(ZoomDirection::Out).unwrap(), expected);
    }
    assert_eq!(adapter.zoom_level(), Some(3));
    assert!(!adapter.zoom_controls().can_zoom_out);
    assert!(adapter.zoom_controls().can_zoom_in);

    assert_eq!(adapter.zoom(ZoomDirection::In).unwrap(), 2);
}

#[test]
fn test_highlight_color_applies_to_zoom_view_only() {
    let log = Log::default();
    let media: MediaHandle = Arc::new(FakeMedia);
    let mut adapter = WaveformAdapter::new(Arc::new(FakeFactory::new(log.clone())))
        .with_highlight_color(Some("#ff5500".to_string()));
    let peaks = Bytes::from_static(b"track-a");

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    adapter.attach(block_on(pending));

    let colors: Vec<_> = entries(&log)
        .into_iter()
        .filter(|e| e.starts_with("color:"))
        .collect();
    assert_eq!(colors, vec!["color:1:zoomview:#ff5500"]);
}

#[test]
fn test_points_buffered_until_ready() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log.clone()));
    let peaks = Bytes::from_static(b"track-a");

    adapter
        .set_points(&[PointMarker::new("intro", 0.0), PointMarker::new("drop", 61.0)])
        .unwrap();
    assert!(entries(&log).is_empty());

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    adapter.attach(block_on(pending));

    assert_eq!(
        entries(&log),
        vec![
            "create:1:precomputed",
            "remove_points:1",
            "add_points:1:intro,drop",
        ]
    );
}

#[test]
fn test_set_points_replaces_all() {
    let log = Log::default();
    let (mut adapter, media) = setup(FakeFactory::new(log.clone()));
    let peaks = Bytes::from_static(b"track-a");

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    adapter.attach(block_on(pending));
    adapter
        .set_points(&[PointMarker::new("verse", 10.0)])
        .unwrap();
    adapter.set_points(&[]).unwrap();

    assert_eq!(
        entries(&log)[1..],
        [
            "remove_points:1".to_string(),
            "add_points:1:verse".to_string(),
            "remove_points:1".to_string(),
        ]
    );
    assert!(adapter.points().is_empty());
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_lifecycle_events_published() {
    let log = Log::default();
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let media: MediaHandle = Arc::new(FakeMedia);
    let mut adapter =
        WaveformAdapter::new(Arc::new(FakeFactory::new(log))).with_event_bus(bus);
    let peaks = Bytes::from_static(b"track-a");

    let pending = adapter.initialize(peaks_deps(&media, "a.mp3", &peaks)).unwrap();
    let outcome = pending.await;
    adapter.attach(outcome);
    adapter.teardown();

    assert_eq!(
        rx.recv().await.unwrap(),
        PlayerEvent::Waveform(WaveformEvent::Initializing {
            generation: 1,
            source: "precomputed".to_string(),
        })
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        PlayerEvent::Waveform(WaveformEvent::Ready {
            generation: 1,
            zoom_level: 0,
        })
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        PlayerEvent::Waveform(WaveformEvent::Destroyed { generation: 1 })
    );
}
