//! Listener registry shared by the platform audio modules.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::{platform::PlatformSendSync, playback::NativeAudioEvent};

/// Receiver of native audio events.
///
/// Called synchronously on whichever thread the native module emits from.
/// Implementations should hand the event off (for example into a channel)
/// rather than doing work inline.
pub trait AudioEventListener: PlatformSendSync {
    fn on_event(&self, event: NativeAudioEvent);
}

impl<F> AudioEventListener for F
where
    F: Fn(NativeAudioEvent) + Send + Sync,
{
    fn on_event(&self, event: NativeAudioEvent) {
        self(event)
    }
}

/// Handle returned by `add_listener`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type ListenerList = Vec<(ListenerId, Arc<dyn AudioEventListener>)>;

/// Thread-safe fan-out of [`NativeAudioEvent`]s to registered listeners.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventEmitter {
    listeners: Arc<RwLock<ListenerList>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn AudioEventListener>) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.write().push((id, listener));
        tracing::debug!(listener = %id, "Audio event listener added");
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        let removed = listeners.len() != before;
        if removed {
            tracing::debug!(listener = %id, "Audio event listener removed");
        }
        removed
    }

    /// Drop every listener, returning how many were registered.
    pub fn remove_all(&self) -> usize {
        let mut listeners = self.listeners.write();
        let count = listeners.len();
        listeners.clear();
        count
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver `event` to every listener in registration order.
    ///
    /// The registry lock is released before listeners run, so a listener
    /// may add or remove listeners without deadlocking.
    pub fn emit(&self, event: NativeAudioEvent) {
        let listeners: Vec<Arc<dyn AudioEventListener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        if listeners.is_empty() {
            tracing::trace!(event = event.name(), "No listeners, dropping audio event");
            return;
        }

        let (last, rest) = match listeners.split_last() {
            Some(split) => split,
            None => return,
        };
        for listener in rest {
            listener.on_event(event.clone());
        }
        last.on_event(event);
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
