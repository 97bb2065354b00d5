//! Async runtime abstraction for the music player core.
//!
//! Every `core-*` and `bridge-*` crate depends on this crate instead of
//! naming tokio directly. That keeps the executor choice in one place and
//! gives the workspace a single pair of entry-point macros:
//!
//! - `#[core_async::main]` for binaries and demos
//! - `#[core_async::test]` for async tests, with an optional
//!   `start_paused` flag that runs the test on virtual time (requires the
//!   `test-util` feature)
//!
//! # Modules
//!
//! - `task`: task spawning and join handles
//! - `time`: sleep, intervals, timeouts
//! - `sync`: channels, locks and cancellation
//! - `runtime`: blocking entry points used by the macros
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub use core_async_macros::{main, test};

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use tokio::select;
pub use time::{sleep, Duration, Instant};
