//! Platform-specific helper abstractions used to keep trait bounds aligned with
//! the threading guarantees of each target.
//!
//! Native targets require `Send + Sync` so that media and surface handles can
//! be moved into futures driven by a multi-threaded executor. WebAssembly
//! builds run on the browser's single event-loop thread and cannot satisfy
//! those bounds because `web_sys` objects are not thread-safe. The helper
//! traits below make the required bounds conditional without duplicating every
//! trait definition.

use std::future::Future;
use std::pin::Pin;

/// Marker trait that applies `Send + Sync` on native targets while becoming a
/// no-op on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T: ?Sized> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> PlatformSendSync for T {}

/// Marker trait equivalent to `Send` on native targets.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSend: Send {}

#[cfg(not(target_arch = "wasm32"))]
impl<T: ?Sized> PlatformSend for T where T: Send {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSend {}

#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> PlatformSend for T {}

/// Boxed future that is `Send` when the target allows it.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[cfg(target_arch = "wasm32")]
pub type PlatformBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
