//! # Player State Reconciliation
//!
//! Canonical player state for a native audio module.
//!
//! ## Overview
//!
//! - [`Track`], [`PlayerState`] and [`PlayerStateSnapshot`]: the data model
//!   every component renders from
//! - [`PlayerStore`]: one session, many readers, a single [`StoreWriter`]
//! - [`Reconciler`]: owns the writer and folds native events, commands and
//!   native-call results into the snapshot, in order
//! - [`ControlBundle`]: commands bound to the current track
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{PlayerStore, Reconciler, Track};
//! use core_runtime::events::EventBus;
//!
//! let (store, writer) = PlayerStore::new();
//! let handle = Reconciler::spawn(audio_module, writer, &store, EventBus::default());
//!
//! store.set_track(Some(Track::new("Intro", "https://cdn.example.com/intro.mp3")));
//! // ...once the reconciler has bound them:
//! store.controls().unwrap().play().await?;
//!
//! handle.shutdown().await?;
//! ```

pub mod controls;
pub mod error;
pub mod reconciler;
pub mod state;
pub mod store;

pub use controls::ControlBundle;
pub use error::{PlaybackError, Result};
pub use reconciler::{Reconciler, ReconcilerHandle};
pub use state::{PlayerState, PlayerStateSnapshot, SnapshotPatch, Track};
pub use store::{PlayerStore, StoreWriter};
