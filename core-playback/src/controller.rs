//! # Playback Controller
//!
//! Owns [`PlaybackState`] and mirrors it onto the media primitive. The
//! controller is the only writer of the media element: play/pause, position
//! and playback rate all go through it.
//!
//! ## State machine
//!
//! ```text
//!            toggle                      toggle
//!   Paused ──────────> Playing ──────────────────> Paused
//!                        │  next / previous / Ended  ▲
//!                        └───────────────────────────┘
//! ```
//!
//! External seeks never change the transport state.
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = PlaybackController::new(media, &PlayerConfig::default());
//! controller.load_track(TrackSource::new(url, "audio/mpeg"))?;
//! controller.toggle_play_pause()?;
//! controller.seek_relative(10.0)?;
//! ```

use crate::error::{PlaybackError, Result};
use crate::navigation::{Direction, Navigation, SkipOutcome};
use crate::seek::SeekSignal;
use crate::state::{PlaybackState, TransportState};
use bridge_traits::media::{MediaEvent, MediaHandle, TrackSource};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{EventBus, NavigationEvent, PlaybackEvent, PlayerEvent};
use core_runtime::logging::redact_url;
use tracing::{debug, instrument, trace, warn};

/// Drives the media primitive from user controls and caller inputs.
pub struct PlaybackController {
    media: MediaHandle,
    state: PlaybackState,
    seek: SeekSignal,
    navigation: Navigation,
    track: Option<TrackSource>,
    duration: Option<f64>,
    last_position: f64,
    restart_threshold_secs: f64,
    seek_step_secs: f64,
    events: Option<EventBus>,
}

impl PlaybackController {
    /// Bind a controller to `media`. The media element is not touched until
    /// the first operation.
    pub fn new(media: MediaHandle, config: &PlayerConfig) -> Self {
        Self {
            media,
            state: PlaybackState::new(config.default_playback_rate),
            seek: SeekSignal::new(),
            navigation: Navigation::default(),
            track: None,
            duration: None,
            last_position: 0.0,
            restart_threshold_secs: config.restart_threshold_secs,
            seek_step_secs: config.seek_step_secs,
            events: None,
        }
    }

    /// Publish transport and navigation events on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn media(&self) -> &MediaHandle {
        &self.media
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn playback_rate(&self) -> f64 {
        self.state.playback_rate
    }

    pub fn track(&self) -> Option<&TrackSource> {
        self.track.as_ref()
    }

    /// Track length, from the last metadata load or the element itself.
    pub fn duration(&self) -> Option<f64> {
        self.duration.or_else(|| self.media.duration())
    }

    /// Position from the most recent time update or seek.
    pub fn last_position(&self) -> f64 {
        self.last_position
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn set_navigation(&mut self, navigation: Navigation) {
        self.navigation = navigation;
    }

    // ------------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------------

    /// Hand a new source to the media element.
    ///
    /// Playback stops and external seek tracking restarts, so a seek value
    /// carried over from the previous track fires again for the new one.
    #[instrument(skip(self, source), fields(url = %redact_url(&source.url)))]
    pub fn load_track(&mut self, source: TrackSource) -> Result<()> {
        self.media.set_source(&source).map_err(|e| {
            warn!(error = %e, "Media element rejected source");
            PlaybackError::from(e)
        })?;

        self.state.transport = TransportState::Paused;
        self.state.pending_seek = None;
        self.seek.reset();
        self.duration = None;
        self.last_position = 0.0;

        debug!(content_type = %source.content_type, "Track loaded");
        self.emit(PlayerEvent::Playback(PlaybackEvent::TrackLoaded {
            url: redact_url(&source.url).to_string(),
        }));
        self.track = Some(source);
        Ok(())
    }

    /// Flip between playing and paused.
    ///
    /// The state only changes once the media element accepted the request,
    /// so a rejected `play()` leaves the player paused.
    pub fn toggle_play_pause(&mut self) -> Result<TransportState> {
        let target = self.state.transport.toggled();
        self.apply_transport(target)?;
        Ok(target)
    }

    pub fn play(&mut self) -> Result<()> {
        self.apply_transport(TransportState::Playing)
    }

    pub fn pause(&mut self) -> Result<()> {
        self.apply_transport(TransportState::Paused)
    }

    fn apply_transport(&mut self, target: TransportState) -> Result<()> {
        let result = match target {
            TransportState::Playing => self.media.play(),
            TransportState::Paused => self.media.pause(),
        };

        if let Err(e) = result {
            warn!(?target, error = %e, "Media element rejected transport change");
            return Err(e.into());
        }

        self.state.transport = target;
        let position = self.media.current_time();
        debug!(?target, position, "Transport changed");

        self.emit(PlayerEvent::Playback(match target {
            TransportState::Playing => PlaybackEvent::Started { position },
            TransportState::Paused => PlaybackEvent::Paused { position },
        }));
        Ok(())
    }

    /// Move the position by `delta_seconds`, clamped to `[0, duration]`.
    ///
    /// Without a known duration only the lower bound applies. Returns the
    /// position that was applied.
    pub fn seek_relative(&mut self, delta_seconds: f64) -> Result<f64> {
        if !delta_seconds.is_finite() {
            return Err(PlaybackError::InvalidSeekPosition(delta_seconds));
        }

        let target = self.clamp_position(self.media.current_time() + delta_seconds);
        self.set_position(target)?;
        Ok(target)
    }

    /// Skip forward by the configured step.
    pub fn skip_forward(&mut self) -> Result<f64> {
        self.seek_relative(self.seek_step_secs)
    }

    /// Skip backward by the configured step.
    pub fn skip_backward(&mut self) -> Result<f64> {
        self.seek_relative(-self.seek_step_secs)
    }

    /// Apply an external seek signal.
    ///
    /// The position is forced only when `time` differs from the previously
    /// supplied value. Returns the applied position, if any.
    pub fn seek_to(&mut self, time: Option<f64>) -> Result<Option<f64>> {
        if let Some(value) = time {
            if !value.is_finite() {
                return Err(PlaybackError::InvalidSeekPosition(value));
            }
        }

        self.state.pending_seek = time;
        let Some(value) = self.seek.observe(time) else {
            return Ok(None);
        };

        let target = self.clamp_position(value);
        trace!(requested = value, applied = target, "External seek");
        self.set_position(target)?;
        Ok(Some(target))
    }

    fn clamp_position(&self, position: f64) -> f64 {
        let lower = position.max(0.0);
        match self.duration() {
            Some(duration) if duration.is_finite() => lower.min(duration),
            _ => lower,
        }
    }

    fn set_position(&mut self, position: f64) -> Result<()> {
        self.media.set_current_time(position).map_err(|e| {
            warn!(position, error = %e, "Media element rejected seek");
            PlaybackError::from(e)
        })?;

        self.last_position = position;
        debug!(position, "Position changed");
        self.emit(PlayerEvent::Playback(PlaybackEvent::Seeked { position }));
        Ok(())
    }

    /// Store `rate` and apply it to the media element.
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PlaybackError::InvalidPlaybackRate(rate));
        }

        self.state.playback_rate = rate;
        self.sync_playback_rate()?;
        debug!(rate, "Playback rate changed");
        self.emit(PlayerEvent::Playback(PlaybackEvent::RateChanged { rate }));
        Ok(())
    }

    /// Re-apply the stored rate. Media elements reset their rate whenever the
    /// source changes.
    pub fn sync_playback_rate(&self) -> Result<()> {
        self.media
            .set_playback_rate(self.state.playback_rate)
            .map_err(|e| {
                warn!(
                    rate = self.state.playback_rate,
                    error = %e,
                    "Media element rejected playback rate"
                );
                PlaybackError::from(e)
            })
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// "Previous" control.
    ///
    /// Past the restart threshold the current track restarts and the
    /// transport state is left alone. Otherwise playback stops and the
    /// caller is asked for the previous track, when one is available.
    pub fn previous(&mut self) -> Result<SkipOutcome> {
        let position = self.media.current_time();

        if position > self.restart_threshold_secs {
            self.set_position(0.0)?;
            debug!(position, "Restarted track");
            self.emit(PlayerEvent::Navigation(NavigationEvent::Restarted));
            return Ok(SkipOutcome::Restarted);
        }

        self.stop_for_navigation()?;
        if self.navigation.signal_previous() {
            debug!(position, "Previous track requested");
            self.emit(PlayerEvent::Navigation(NavigationEvent::Previous));
            Ok(SkipOutcome::Navigated(Direction::Previous))
        } else {
            Ok(SkipOutcome::Stopped)
        }
    }

    /// "Next" control. Always stops playback and signals the caller.
    pub fn next(&mut self) -> Result<SkipOutcome> {
        self.stop_for_navigation()?;
        if self.navigation.signal_next() {
            debug!("Next track requested");
            self.emit(PlayerEvent::Navigation(NavigationEvent::Next));
            Ok(SkipOutcome::Navigated(Direction::Next))
        } else {
            Ok(SkipOutcome::Stopped)
        }
    }

    fn stop_for_navigation(&mut self) -> Result<()> {
        if self.state.is_playing() {
            self.apply_transport(TransportState::Paused)
        } else {
            Ok(())
        }
    }

    pub fn can_skip_next(&self) -> bool {
        self.navigation.next_available
    }

    pub fn can_skip_previous(&self) -> bool {
        self.navigation.previous_available
    }

    // ------------------------------------------------------------------------
    // Media notifications
    // ------------------------------------------------------------------------

    /// React to a notification from the media element.
    pub fn handle_media_event(&mut self, event: MediaEvent) -> Result<()> {
        match event {
            MediaEvent::LoadedMetadata { duration } => {
                self.duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
                debug!(duration = ?self.duration, "Metadata loaded");
                self.sync_playback_rate()
            }
            MediaEvent::TimeUpdate { position } => {
                self.last_position = position;
                Ok(())
            }
            MediaEvent::Ended => {
                self.state.transport = TransportState::Paused;
                debug!("Track ended");
                self.emit(PlayerEvent::Playback(PlaybackEvent::Ended));
                Ok(())
            }
            MediaEvent::Error { code, message } => {
                warn!(?code, %message, "Media element error");
                self.state.transport = TransportState::Paused;
                self.emit(PlayerEvent::Playback(PlaybackEvent::MediaError {
                    code,
                    message,
                }));
                Ok(())
            }
        }
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(bus) = &self.events {
            // No subscribers is fine.
            let _ = bus.emit(event);
        }
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("track", &self.track)
            .field("duration", &self.duration)
            .field("navigation", &self.navigation)
            .finish()
    }
}
