//! # Android Audio Bridge
//!
//! [`AndroidAudioModule`] implements `bridge_traits::AudioModule` on top of
//! an [`ExoPlayerHandle`] supplied by the host's JNI glue.
//!
//! ## Wiring
//!
//! The host forwards ExoPlayer listener callbacks into the module:
//!
//! - `Player.Listener.onPlaybackStateChanged` →
//!   [`AndroidAudioModule::on_playback_state_changed`]
//! - `Player.Listener.onPlayerError` → [`AndroidAudioModule::on_player_error`]
//! - `MediaSession.Callback` transport controls →
//!   [`AndroidAudioModule::handle_media_session`]
//!
//! ```ignore
//! use bridge_android::{AndroidAudioModule, ExoPlaybackState};
//! use std::sync::Arc;
//!
//! let module = Arc::new(AndroidAudioModule::new(Arc::new(JniExoPlayer::new(env, player))));
//! // from onPlaybackStateChanged(int state)
//! if let Some(state) = ExoPlaybackState::from_code(state) {
//!     module.on_playback_state_changed(state);
//! }
//! ```

mod exoplayer;
mod module;

pub use exoplayer::{
    duration_from_raw, ExoPlaybackState, ExoPlayerHandle, MediaSessionCommand, TIME_UNSET,
};
pub use module::{AndroidAudioModule, DEFAULT_PROGRESS_INTERVAL};
