//! # Event Bus System
//!
//! Publishes player events over `tokio::sync::broadcast` so that hosts (and
//! tests) can observe what the player did without holding a reference to it.
//!
//! ## Overview
//!
//! - **Event Types**: [`PlayerEvent`] wrapping playback, waveform and
//!   navigation events
//! - **EventBus**: broadcast sender shared by the player components
//! - **EventStream**: receiver wrapper with optional filtering
//!
//! ```text
//! ┌────────────────────┐   emit   ┌──────────┐  subscribe  ┌────────────┐
//! │ PlaybackController ├─────────>│          ├────────────>│ Host shell │
//! └────────────────────┘          │ EventBus │             └────────────┘
//! ┌────────────────────┐   emit   │          │  subscribe  ┌────────────┐
//! │ PlayerView         ├─────────>│          ├────────────>│ Analytics  │
//! └────────────────────┘          └──────────┘             └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, NavigationEvent, PlayerEvent};
//!
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(PlayerEvent::Navigation(NavigationEvent::Next)).ok();
//! assert_eq!(
//!     rx.try_recv().unwrap(),
//!     PlayerEvent::Navigation(NavigationEvent::Next)
//! );
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events. Non-fatal.
//! - **`RecvError::Closed`**: every sender was dropped; the player unmounted.
//!
//! Emitting with no subscribers returns `Err`; the player ignores that case.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Player Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum PlayerEvent {
    Playback(PlaybackEvent),
    Waveform(WaveformEvent),
    Navigation(NavigationEvent),
}

impl PlayerEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::Playback(e) => e.description(),
            PlayerEvent::Waveform(e) => e.description(),
            PlayerEvent::Navigation(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::Waveform(WaveformEvent::Failed { .. }) => EventSeverity::Warning,
            PlayerEvent::Playback(PlaybackEvent::MediaError { .. }) => EventSeverity::Error,
            PlayerEvent::Waveform(WaveformEvent::Ready { .. })
            | PlayerEvent::Playback(PlaybackEvent::TrackLoaded { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Transport changes made by the playback controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A new source was handed to the media element.
    TrackLoaded { url: String },
    /// Playback started or resumed.
    Started { position: f64 },
    /// Playback paused.
    Paused { position: f64 },
    /// Position moved by a seek (relative, external or restart).
    Seeked { position: f64 },
    /// Playback rate changed.
    RateChanged { rate: f64 },
    /// Track reached its end.
    Ended,
    /// The media element reported an error.
    MediaError { code: Option<u32>, message: String },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::TrackLoaded { .. } => "Track loaded",
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Seeked { .. } => "Playback position changed",
            PlaybackEvent::RateChanged { .. } => "Playback rate changed",
            PlaybackEvent::Ended => "Track ended",
            PlaybackEvent::MediaError { .. } => "Media element error",
        }
    }
}

// ============================================================================
// Waveform Events
// ============================================================================

/// Rendering surface lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum WaveformEvent {
    /// Surface creation started.
    Initializing { generation: u64, source: String },
    /// Surface reported readiness and was attached.
    Ready { generation: u64, zoom_level: u32 },
    /// Surface could not be created; the placeholder is shown.
    Failed {
        generation: u64,
        code: Option<u32>,
        message: String,
    },
    /// Surface was torn down.
    Destroyed { generation: u64 },
    /// Zoom level re-read after a zoom change.
    ZoomChanged { level: u32 },
}

impl WaveformEvent {
    fn description(&self) -> &str {
        match self {
            WaveformEvent::Initializing { .. } => "Waveform initializing",
            WaveformEvent::Ready { .. } => "Waveform ready",
            WaveformEvent::Failed { .. } => "Waveform unavailable",
            WaveformEvent::Destroyed { .. } => "Waveform destroyed",
            WaveformEvent::ZoomChanged { .. } => "Waveform zoom changed",
        }
    }
}

// ============================================================================
// Navigation Events
// ============================================================================

/// Track navigation requested through the skip controls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum NavigationEvent {
    Next,
    Previous,
    /// "Previous" pressed past the restart threshold; the track restarted.
    Restarted,
}

impl NavigationEvent {
    fn description(&self) -> &str {
        match self {
            NavigationEvent::Next => "Next track requested",
            NavigationEvent::Previous => "Previous track requested",
            NavigationEvent::Restarted => "Track restarted",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to player events.
///
/// Cloning the bus clones the sender; every clone publishes to the same
/// subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// Subscribers falling behind by more than `capacity` events receive
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: PlayerEvent) -> Result<usize, SendError<PlayerEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&PlayerEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, PlayerEvent};
///
/// let bus = EventBus::new(16);
/// let waveform_only = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, PlayerEvent::Waveform(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &PlayerEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    pub async fn recv(&mut self) -> Result<PlayerEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching events are currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<PlayerEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every buffered matching event.
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        let _sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        let result = bus.emit(PlayerEvent::Navigation(NavigationEvent::Next));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = PlayerEvent::Playback(PlaybackEvent::RateChanged { rate: 1.5 });
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, PlayerEvent::Waveform(_)));

        bus.emit(PlayerEvent::Navigation(NavigationEvent::Previous))
            .ok();
        let ready = PlayerEvent::Waveform(WaveformEvent::Ready {
            generation: 1,
            zoom_level: 0,
        });
        bus.emit(ready.clone()).ok();

        assert_eq!(stream.recv().await.unwrap(), ready);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for level in 0..5 {
            bus.emit(PlayerEvent::Waveform(WaveformEvent::ZoomChanged { level }))
                .ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_drain_skips_filtered_events() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, PlayerEvent::Navigation(_)));

        bus.emit(PlayerEvent::Playback(PlaybackEvent::Ended)).ok();
        bus.emit(PlayerEvent::Navigation(NavigationEvent::Next)).ok();
        bus.emit(PlayerEvent::Navigation(NavigationEvent::Restarted))
            .ok();

        assert_eq!(
            stream.drain(),
            vec![
                PlayerEvent::Navigation(NavigationEvent::Next),
                PlayerEvent::Navigation(NavigationEvent::Restarted),
            ]
        );
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn test_event_severity() {
        let failed = PlayerEvent::Waveform(WaveformEvent::Failed {
            generation: 3,
            code: Some(4),
            message: "decode error".to_string(),
        });
        assert_eq!(failed.severity(), EventSeverity::Warning);

        let media = PlayerEvent::Playback(PlaybackEvent::MediaError {
            code: Some(2),
            message: "network".to_string(),
        });
        assert_eq!(media.severity(), EventSeverity::Error);

        let seek = PlayerEvent::Playback(PlaybackEvent::Seeked { position: 3.0 });
        assert_eq!(seek.severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        let event = PlayerEvent::Navigation(NavigationEvent::Restarted);
        assert_eq!(event.description(), "Track restarted");
    }

    #[test]
    fn test_event_serialization() {
        let event = PlayerEvent::Waveform(WaveformEvent::Ready {
            generation: 7,
            zoom_level: 2,
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Waveform\""));
        assert!(json.contains("\"event\":\"Ready\""));

        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
