//! # Player View
//!
//! Composes the playback controller and the waveform adapter behind a
//! mount/update/unmount lifecycle.
//!
//! ```text
//!  PlayerProps ──mount/update──> PlayerView ──> PlaybackController ──> MediaElement
//!                                   │
//!                                   └─────────> WaveformAdapter ──> SurfaceFactory
//!                                                    │
//!                    attach_waveform(outcome) <── PendingSurface
//! ```
//!
//! Surface creation is asynchronous. `mount` and `update` return the
//! [`PendingSurface`] when a (re)build started; the host drives it on its
//! event loop and hands the outcome back through
//! [`attach_waveform`](PlayerView::attach_waveform).
//!
//! Waveform failures never reach the caller: they are logged, published on
//! the event bus and rendered as a placeholder.

use crate::error::{CoreError, Result};
use crate::presentation::{ControlsState, WaveformDisplay};
use crate::props::PlayerProps;
use bridge_traits::media::{MediaEvent, MediaHandle};
use bridge_traits::waveform::SurfaceFactory;
use core_playback::{
    Key, KeyPress, PlaybackController, ShortcutAction, ShortcutRegistry, SkipOutcome,
    TransportState,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::EventBus;
use core_runtime::logging::redact_url;
use core_waveform::{
    AdapterState, AttachOutcome, InitOutcome, PendingSurface, WaveformAdapter, WaveformError,
    ZoomDirection,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct PlayerView {
    config: PlayerConfig,
    media: MediaHandle,
    bus: EventBus,
    adapter: WaveformAdapter,
    shortcuts: ShortcutRegistry,
    controller: Option<PlaybackController>,
    props: Option<PlayerProps>,
}

impl PlayerView {
    /// Create an unmounted view. Fails if `config` does not validate.
    pub fn new(
        config: PlayerConfig,
        media: MediaHandle,
        factory: Arc<dyn SurfaceFactory>,
        bus: EventBus,
    ) -> Result<Self> {
        config.validate()?;

        let adapter = WaveformAdapter::new(factory)
            .with_zoom_bounds(config.zoom)
            .with_highlight_color(config.highlight_color.clone())
            .with_event_bus(bus.clone());

        Ok(Self {
            config,
            media,
            bus,
            adapter,
            shortcuts: ShortcutRegistry::new(),
            controller: None,
            props: None,
        })
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn is_mounted(&self) -> bool {
        self.controller.is_some()
    }

    pub fn props(&self) -> Option<&PlayerProps> {
        self.props.as_ref()
    }

    pub fn controller(&self) -> Option<&PlaybackController> {
        self.controller.as_ref()
    }

    pub fn adapter(&self) -> &WaveformAdapter {
        &self.adapter
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Mount with the first props.
    ///
    /// Registers the keyboard shortcuts, creates the playback state, loads the
    /// track and starts the waveform build. Mounting an already mounted view
    /// behaves like [`update`](Self::update).
    #[instrument(skip_all, fields(url = %redact_url(&props.track.url)))]
    pub fn mount(&mut self, props: PlayerProps) -> Result<Option<PendingSurface>> {
        if self.is_mounted() {
            return self.update(props);
        }
        props.validate()?;

        let mut controller = PlaybackController::new(Arc::clone(&self.media), &self.config)
            .with_event_bus(self.bus.clone());
        controller.set_navigation(props.navigation.clone());
        if let Err(err) = controller.sync_playback_rate() {
            warn!(error = %err, "Failed to apply initial playback rate");
        }
        controller.load_track(props.track.clone())?;
        if let Err(err) = controller.seek_to(props.seek_time) {
            warn!(error = %err, "External seek not applied");
        }
        self.controller = Some(controller);

        self.shortcuts
            .register(Key::Space, ShortcutAction::TogglePlayPause);
        self.adapter.set_points(&props.points)?;
        let pending = self.sync_waveform(&props);

        info!("Player mounted");
        self.props = Some(props);
        Ok(pending)
    }

    /// Apply new props.
    ///
    /// A changed track reloads the media element. The surface is rebuilt
    /// only when its dependencies changed identity. Seek signals and points
    /// are forwarded as-is.
    ///
    /// Invalid props are rejected before anything is applied. A seek the
    /// media element refuses is logged; the rest of the update still lands.
    pub fn update(&mut self, props: PlayerProps) -> Result<Option<PendingSurface>> {
        let controller = self.controller.as_mut().ok_or(CoreError::NotMounted)?;
        props.validate()?;
        let previous = self.props.as_ref();

        controller.set_navigation(props.navigation.clone());

        if previous.map_or(true, |old| old.track != props.track) {
            debug!(url = %redact_url(&props.track.url), "Track changed");
            controller.load_track(props.track.clone())?;
        }

        if let Err(err) = controller.seek_to(props.seek_time) {
            warn!(error = %err, "External seek not applied");
        }

        if previous.map_or(true, |old| old.points != props.points) {
            if let Err(err) = self.adapter.set_points(&props.points) {
                warn!(error = %err, "Failed to update point markers");
            }
        }

        let pending = self.sync_waveform(&props);
        self.props = Some(props);
        Ok(pending)
    }

    /// Deregister shortcuts, destroy the surface and drop playback state.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }

        self.shortcuts.clear();
        self.adapter.reset();
        self.controller = None;
        self.props = None;
        info!("Player unmounted");
    }

    fn sync_waveform(&mut self, props: &PlayerProps) -> Option<PendingSurface> {
        match self.adapter.sync(props.waveform_deps(&self.media)) {
            Ok(pending) => pending,
            // Already logged and published; the placeholder is shown instead.
            Err(_) => None,
        }
    }

    /// Hand back the outcome of a pending surface build.
    pub fn attach_waveform(&mut self, outcome: InitOutcome) -> AttachOutcome {
        if !self.is_mounted() {
            debug!(generation = outcome.generation, "Waveform resolved after unmount");
        }
        self.adapter.attach(outcome)
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Dispatch a key press. Returns `true` when a shortcut handled it and the
    /// host should suppress the default action.
    pub fn handle_key(&mut self, press: &KeyPress) -> Result<bool> {
        let Some(action) = self.shortcuts.dispatch(press) else {
            return Ok(false);
        };

        match action {
            ShortcutAction::TogglePlayPause => {
                self.toggle_play_pause()?;
            }
        }
        Ok(true)
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) -> Result<()> {
        Ok(self.controller_mut()?.handle_media_event(event)?)
    }

    pub fn toggle_play_pause(&mut self) -> Result<TransportState> {
        Ok(self.controller_mut()?.toggle_play_pause()?)
    }

    pub fn seek_relative(&mut self, delta_seconds: f64) -> Result<f64> {
        Ok(self.controller_mut()?.seek_relative(delta_seconds)?)
    }

    pub fn skip_forward(&mut self) -> Result<f64> {
        Ok(self.controller_mut()?.skip_forward()?)
    }

    pub fn skip_backward(&mut self) -> Result<f64> {
        Ok(self.controller_mut()?.skip_backward()?)
    }

    pub fn previous(&mut self) -> Result<SkipOutcome> {
        Ok(self.controller_mut()?.previous()?)
    }

    pub fn next(&mut self) -> Result<SkipOutcome> {
        Ok(self.controller_mut()?.next()?)
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        Ok(self.controller_mut()?.set_playback_rate(rate)?)
    }

    /// Zoom one step.
    ///
    /// Returns `None` when the button would be disabled: no surface yet, or
    /// the level is already at the bound.
    pub fn zoom(&mut self, direction: ZoomDirection) -> Result<Option<u32>> {
        if !self.adapter.zoom_controls().allows(direction) {
            return Ok(None);
        }

        match self.adapter.zoom(direction) {
            Ok(level) => Ok(Some(level)),
            Err(WaveformError::NotReady) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn controller_mut(&mut self) -> Result<&mut PlaybackController> {
        self.controller.as_mut().ok_or(CoreError::NotMounted)
    }

    // ------------------------------------------------------------------------
    // Presentation
    // ------------------------------------------------------------------------

    pub fn controls(&self) -> ControlsState {
        let zoom = self.adapter.zoom_controls();
        let controller = self.controller.as_ref();

        ControlsState {
            is_playing: controller.map_or(false, |c| c.is_playing()),
            playback_rate: controller
                .map_or(self.config.default_playback_rate, |c| c.playback_rate()),
            playback_rates: self.config.playback_rates.clone(),
            can_zoom_in: zoom.can_zoom_in,
            can_zoom_out: zoom.can_zoom_out,
            can_skip_next: controller.map_or(false, |c| c.can_skip_next()),
            can_skip_previous: controller.map_or(false, |c| c.can_skip_previous()),
        }
    }

    pub fn waveform_display(&self) -> WaveformDisplay {
        match (self.adapter.state(), self.adapter.zoom_level()) {
            (AdapterState::Ready, Some(zoom_level)) => WaveformDisplay::Ready { zoom_level },
            (AdapterState::Initializing { .. }, _) => WaveformDisplay::Loading,
            _ => WaveformDisplay::Placeholder {
                height: self.config.placeholder_height_px,
            },
        }
    }
}

impl std::fmt::Debug for PlayerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerView")
            .field("mounted", &self.is_mounted())
            .field("controller", &self.controller)
            .field("adapter", &self.adapter)
            .field("shortcuts", &self.shortcuts.len())
            .finish()
    }
}
