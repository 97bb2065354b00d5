//! # Control Bundle
//!
//! Commands bound to one track. Each call is queued on the reconciler's
//! inbox and resolves once the reconciler has applied it, including the
//! native call where there is one.

use core_async::sync::{mpsc, oneshot};
use std::fmt;

use crate::error::{PlaybackError, Result};
use crate::reconciler::{Command, Message};

/// Player controls for the track that was current when they were bound.
///
/// Once a different track is selected (or the selection is cleared) the
/// bundle is stale and every call fails with
/// [`PlaybackError::InvalidArgument`]. Fetch fresh controls from
/// `PlayerStore::controls`.
#[derive(Clone)]
pub struct ControlBundle {
    inbox: mpsc::UnboundedSender<Message>,
    generation: u64,
}

impl ControlBundle {
    pub(crate) fn new(inbox: mpsc::UnboundedSender<Message>, generation: u64) -> Self {
        Self { inbox, generation }
    }

    /// Track generation this bundle was bound to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn play(&self) -> Result<()> {
        self.request(Command::Play).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.request(Command::Pause).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.request(Command::Stop).await
    }

    /// Seeks to `seconds`. The native module clamps the position to the
    /// track bounds.
    pub async fn seek(&self, seconds: f64) -> Result<()> {
        self.request(Command::Seek(seconds)).await
    }

    /// Loads the bound track into the native player. A no-op when it is
    /// already loaded or loading.
    pub async fn load_content(&self) -> Result<()> {
        self.request(Command::LoadContent).await
    }

    pub async fn toggle_repeat(&self) -> Result<()> {
        self.request(Command::ToggleRepeat).await
    }

    async fn request(&self, command: Command) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.inbox
            .send(Message::Command {
                generation: self.generation,
                command,
                reply,
            })
            .map_err(|_| PlaybackError::ShutDown)?;
        response.await.map_err(|_| PlaybackError::ShutDown)?
    }
}

impl fmt::Debug for ControlBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlBundle")
            .field("generation", &self.generation)
            .field("closed", &self.inbox.is_closed())
            .finish()
    }
}
