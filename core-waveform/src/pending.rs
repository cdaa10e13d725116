//! In-flight surface initialization.

use crate::error::Result;
use bridge_traits::platform::PlatformBoxFuture;
use bridge_traits::waveform::WaveformSurface;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Result of one initialization attempt, tagged with the generation that
/// started it.
pub struct InitOutcome {
    pub generation: u64,
    pub result: Result<Box<dyn WaveformSurface>>,
}

impl fmt::Debug for InitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitOutcome")
            .field("generation", &self.generation)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

/// Future resolving to an [`InitOutcome`].
///
/// There is no way to cancel a surface the rendering library is already
/// building. Dropping this future simply loses the result; handing the
/// outcome back to [`WaveformAdapter::attach`](crate::WaveformAdapter::attach)
/// destroys a surface whose generation was superseded.
pub struct PendingSurface {
    generation: u64,
    future: PlatformBoxFuture<'static, InitOutcome>,
}

impl PendingSurface {
    pub(crate) fn new(generation: u64, future: PlatformBoxFuture<'static, InitOutcome>) -> Self {
        Self { generation, future }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Future for PendingSurface {
    type Output = InitOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSurface")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
