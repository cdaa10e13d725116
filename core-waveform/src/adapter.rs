//! # Waveform Adapter
//!
//! Owns the lifecycle of one rendering surface at a time.
//!
//! ## Lifecycle
//!
//! ```text
//!  Idle ──initialize──> Initializing(gen) ──attach(Ok)──> Ready
//!   ▲                        │                              │
//!   │                        └──attach(Err)──> Failed       │
//!   └──────────────────────── teardown ─────────────────────┘
//! ```
//!
//! [`initialize`](WaveformAdapter::initialize) destroys the live surface
//! before asking the factory for a new one, so two surfaces are never bound
//! to the same media element. Creation is asynchronous and cannot be
//! cancelled; every attempt carries a generation number and
//! [`attach`](WaveformAdapter::attach) destroys surfaces from superseded
//! generations instead of attaching them.

use crate::error::{Result, WaveformError};
use crate::pending::{InitOutcome, PendingSurface};
use crate::points::{replace_points, sanitize};
use crate::reconcile::{needs_rebuild, WaveformDeps};
use crate::zoom::{ZoomControls, ZoomDirection};
use bridge_traits::platform::PlatformSend;
use bridge_traits::waveform::{
    PointMarker, SurfaceFactory, SurfaceOptions, SurfaceView, WaveformSurface,
};
use core_runtime::config::ZoomBounds;
use core_runtime::events::{EventBus, PlayerEvent, WaveformEvent};
use core_runtime::logging::redact_url;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Adapter lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterState {
    Idle,
    Initializing { generation: u64 },
    Ready,
    Failed(WaveformError),
}

/// What [`WaveformAdapter::attach`] did with an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachOutcome {
    /// The surface is live.
    Ready { generation: u64, zoom_level: u32 },
    /// Initialization failed; the placeholder should be shown.
    Failed {
        generation: u64,
        error: WaveformError,
    },
    /// The outcome belonged to a superseded generation and was discarded.
    Stale { generation: u64 },
}

/// Invoked once per successful initialization with the new surface.
pub trait ReadyHandler: PlatformSend {
    fn ready(&mut self, surface: &mut dyn WaveformSurface);
}

impl<F> ReadyHandler for F
where
    F: FnMut(&mut dyn WaveformSurface) + PlatformSend,
{
    fn ready(&mut self, surface: &mut dyn WaveformSurface) {
        self(surface)
    }
}

pub struct WaveformAdapter {
    factory: Arc<dyn SurfaceFactory>,
    surface: Option<Box<dyn WaveformSurface>>,
    deps: Option<WaveformDeps>,
    generation: u64,
    state: AdapterState,
    zoom_level: Option<u32>,
    zoom_bounds: ZoomBounds,
    points: Vec<PointMarker>,
    highlight_color: Option<String>,
    on_ready: Option<Box<dyn ReadyHandler>>,
    events: Option<EventBus>,
}

impl WaveformAdapter {
    pub fn new(factory: Arc<dyn SurfaceFactory>) -> Self {
        Self {
            factory,
            surface: None,
            deps: None,
            generation: 0,
            state: AdapterState::Idle,
            zoom_level: None,
            zoom_bounds: ZoomBounds::default(),
            points: Vec::new(),
            highlight_color: None,
            on_ready: None,
            events: None,
        }
    }

    pub fn with_zoom_bounds(mut self, bounds: ZoomBounds) -> Self {
        self.zoom_bounds = bounds;
        self
    }

    /// Color applied to the zoomed view once a surface is ready.
    pub fn with_highlight_color(mut self, color: Option<String>) -> Self {
        self.highlight_color = color;
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Register the readiness callback. Replaces any previous one.
    pub fn on_ready<F>(&mut self, callback: F)
    where
        F: FnMut(&mut dyn WaveformSurface) + PlatformSend + 'static,
    {
        self.on_ready = Some(Box::new(callback));
    }

    pub fn state(&self) -> &AdapterState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Zoom level mirrored from the surface after initialization and after
    /// every zoom change.
    pub fn zoom_level(&self) -> Option<u32> {
        self.zoom_level
    }

    pub fn zoom_controls(&self) -> ZoomControls {
        ZoomControls::for_level(self.zoom_level, &self.zoom_bounds)
    }

    pub fn deps(&self) -> Option<&WaveformDeps> {
        self.deps.as_ref()
    }

    // ------------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------------

    /// Initialize for `deps` unless the current surface was already built
    /// from equivalent dependencies.
    ///
    /// Returns `Ok(None)` when nothing had to change.
    pub fn sync(&mut self, deps: WaveformDeps) -> Result<Option<PendingSurface>> {
        match &self.deps {
            Some(current) if !needs_rebuild(current, &deps) => Ok(None),
            _ => self.initialize(deps).map(Some),
        }
    }

    /// Tear down the current surface and start building a new one.
    ///
    /// Fails with [`WaveformError::MissingSourceData`] when `deps` carries no
    /// audio source. The adapter then stays in the `Failed` state until the
    /// next call.
    pub fn initialize(&mut self, deps: WaveformDeps) -> Result<PendingSurface> {
        self.teardown();

        self.generation += 1;
        let generation = self.generation;
        let source = deps.inputs.resolve();
        self.deps = Some(deps.clone());

        let source = match source {
            Ok(source) => source,
            Err(err) => {
                error!(
                    generation,
                    url = %redact_url(&deps.inputs.url),
                    error = %err,
                    "Cannot initialize waveform"
                );
                self.fail(generation, err.clone());
                return Err(err);
            }
        };

        info!(
            generation,
            source = source.kind(),
            url = %redact_url(&deps.inputs.url),
            "Initializing waveform surface"
        );
        self.emit(WaveformEvent::Initializing {
            generation,
            source: source.kind().to_string(),
        });
        self.state = AdapterState::Initializing { generation };

        let factory = Arc::clone(&self.factory);
        let options = SurfaceOptions {
            media: deps.media,
            source,
        };

        Ok(PendingSurface::new(
            generation,
            Box::pin(async move {
                let result = factory
                    .create(options)
                    .await
                    .map_err(WaveformError::initialization);
                InitOutcome { generation, result }
            }),
        ))
    }

    /// Hand back the outcome of a [`PendingSurface`].
    pub fn attach(&mut self, outcome: InitOutcome) -> AttachOutcome {
        let InitOutcome { generation, result } = outcome;
        let current = matches!(
            self.state,
            AdapterState::Initializing { generation: g } if g == generation
        );

        if !current {
            debug!(generation, current = self.generation, "Discarding stale waveform surface");
            if let Ok(mut surface) = result {
                surface.destroy();
            }
            return AttachOutcome::Stale { generation };
        }

        let mut surface = match result {
            Ok(surface) => surface,
            Err(err) => {
                error!(
                    generation,
                    code = ?err.code(),
                    error = %err,
                    "Waveform initialization failed"
                );
                self.fail(generation, err.clone());
                return AttachOutcome::Failed {
                    generation,
                    error: err,
                };
            }
        };

        if let Some(color) = &self.highlight_color {
            if let Err(err) = surface.set_waveform_color(SurfaceView::Zoom, color) {
                warn!(error = %err, color = %color, "Failed to apply highlight color");
            }
        }

        if !self.points.is_empty() {
            if let Err(err) = replace_points(surface.as_mut(), &self.points) {
                warn!(error = %err, "Failed to apply point markers");
            }
        }

        if let Some(handler) = self.on_ready.as_mut() {
            handler.ready(surface.as_mut());
        }

        let zoom_level = surface.zoom_level();
        self.zoom_level = Some(zoom_level);
        self.surface = Some(surface);
        self.state = AdapterState::Ready;

        info!(generation, zoom_level, "Waveform surface ready");
        self.emit(WaveformEvent::Ready {
            generation,
            zoom_level,
        });
        AttachOutcome::Ready {
            generation,
            zoom_level,
        }
    }

    fn fail(&mut self, generation: u64, err: WaveformError) {
        self.emit(WaveformEvent::Failed {
            generation,
            code: err.code(),
            message: err.to_string(),
        });
        self.state = AdapterState::Failed(err);
    }

    // ------------------------------------------------------------------------
    // Live surface operations
    // ------------------------------------------------------------------------

    /// Zoom one step and re-read the level from the surface.
    pub fn zoom(&mut self, direction: ZoomDirection) -> Result<u32> {
        let surface = self.surface.as_mut().ok_or(WaveformError::NotReady)?;

        match direction {
            ZoomDirection::In => surface.zoom_in()?,
            ZoomDirection::Out => surface.zoom_out()?,
        }

        let level = surface.zoom_level();
        self.zoom_level = Some(level);
        debug!(?direction, level, "Zoom changed");
        self.emit(WaveformEvent::ZoomChanged { level });
        Ok(level)
    }

    /// Replace the point markers.
    ///
    /// Markers supplied before the surface is ready are kept and applied when
    /// it attaches.
    pub fn set_points(&mut self, points: &[PointMarker]) -> Result<()> {
        self.points = sanitize(points);
        match self.surface.as_mut() {
            Some(surface) => replace_points(surface.as_mut(), &self.points),
            None => Ok(()),
        }
    }

    pub fn points(&self) -> &[PointMarker] {
        &self.points
    }

    /// Destroy the live surface, if any, and invalidate in-flight
    /// initializations.
    pub fn teardown(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
            debug!(generation = self.generation, "Waveform surface destroyed");
            self.emit(WaveformEvent::Destroyed {
                generation: self.generation,
            });
        }

        // A pending surface resolves later and is destroyed in `attach`.
        self.zoom_level = None;
        self.state = AdapterState::Idle;
    }

    /// Tear down and forget the dependencies, so the next
    /// [`sync`](Self::sync) always rebuilds.
    pub fn reset(&mut self) {
        self.teardown();
        self.deps = None;
    }

    fn emit(&self, event: WaveformEvent) {
        if let Some(bus) = &self.events {
            let _ = bus.emit(PlayerEvent::Waveform(event));
        }
    }
}

impl Drop for WaveformAdapter {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
    }
}

impl fmt::Debug for WaveformAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaveformAdapter")
            .field("generation", &self.generation)
            .field("state", &self.state)
            .field("zoom_level", &self.zoom_level)
            .field("points", &self.points.len())
            .finish_non_exhaustive()
    }
}
