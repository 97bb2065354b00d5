//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the playback crates:
//! - Logging and tracing setup
//! - Player configuration
//! - Event bus for player notifications
//!
//! ## Overview
//!
//! Nothing here knows about audio. The reconciler in `core-playback`
//! publishes on the [`events::EventBus`], reads its cadence and defaults
//! from [`config::PlayerConfig`], and logs through the subscriber installed
//! by [`logging::init_logging`].

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
