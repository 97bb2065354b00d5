//! Task spawning.
//!
//! Native player callbacks arrive on host threads (JNI or the main
//! dispatch queue), so the helpers here also cover spawning from outside
//! an async context.

pub use tokio::task::{spawn_blocking, yield_now, AbortHandle, JoinError, JoinHandle};

use tokio::runtime::Handle;

/// Spawns a new asynchronous task on the current runtime.
///
/// # Panics
///
/// Panics when called outside a runtime. Use [`try_spawn`] from host
/// callback threads.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Spawns onto the current runtime if there is one.
///
/// Returns `None` when the caller is not inside a runtime, leaving the
/// decision of what to do to the caller.
pub fn try_spawn<F>(future: F) -> Option<JoinHandle<F::Output>>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    Handle::try_current().ok().map(|handle| handle.spawn(future))
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
