//! Track navigation wiring supplied by the caller.

use bridge_traits::platform::PlatformSendSync;
use std::fmt;
use std::sync::Arc;

/// Callback invoked when the user asks for another track.
pub trait NavigationHandler: PlatformSendSync {
    fn navigate(&self);
}

impl<F> NavigationHandler for F
where
    F: Fn() + PlatformSendSync,
{
    fn navigate(&self) {
        self()
    }
}

pub type NavigationCallback = Arc<dyn NavigationHandler>;

/// Which way the user skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Result of a skip control press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipOutcome {
    /// Position was reset to the start of the current track.
    Restarted,
    /// The caller's navigation callback was invoked.
    Navigated(Direction),
    /// Playback stopped but no callback was available to navigate.
    Stopped,
}

/// Availability flags and callbacks for next/previous navigation.
#[derive(Clone, Default)]
pub struct Navigation {
    pub next_available: bool,
    pub previous_available: bool,
    pub on_next: Option<NavigationCallback>,
    pub on_previous: Option<NavigationCallback>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_next(mut self, available: bool, callback: NavigationCallback) -> Self {
        self.next_available = available;
        self.on_next = Some(callback);
        self
    }

    pub fn with_previous(mut self, available: bool, callback: NavigationCallback) -> Self {
        self.previous_available = available;
        self.on_previous = Some(callback);
        self
    }

    /// Invoke the "next" callback. Returns `false` when none is set.
    pub(crate) fn signal_next(&self) -> bool {
        match &self.on_next {
            Some(callback) => {
                callback.navigate();
                true
            }
            None => false,
        }
    }

    /// Invoke the "previous" callback if a previous track is available.
    pub(crate) fn signal_previous(&self) -> bool {
        match &self.on_previous {
            Some(callback) if self.previous_available => {
                callback.navigate();
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigation")
            .field("next_available", &self.next_available)
            .field("previous_available", &self.previous_available)
            .field("on_next", &self.on_next.is_some())
            .field("on_previous", &self.on_previous.is_some())
            .finish()
    }
}
