//! Workspace façade crate.
//!
//! Re-exports [`core_service`] so host applications can depend on
//! `musicplayer-workspace` and pick platform bridges through the `android`
//! and `ios` features without wiring each crate individually.

pub use core_service::*;
