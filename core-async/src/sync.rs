//! Synchronization primitives.
//!
//! Async-aware channels and locks from tokio plus the cancellation token
//! from tokio-util. The reconciler inbox is an unbounded `mpsc` channel,
//! the store publishes through `watch`, and the event bus is built on
//! `broadcast`.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::{mpsc, CancellationToken};
//!
//! async fn example() {
//!     let (tx, mut rx) = mpsc::unbounded_channel();
//!     tx.send("PLAYING").unwrap();
//!     assert_eq!(rx.recv().await, Some("PLAYING"));
//!
//!     let token = CancellationToken::new();
//!     token.cancel();
//!     assert!(token.is_cancelled());
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

pub use tokio_util::sync::{CancellationToken, DropGuard};
