//! Player notifications fanned out over a `broadcast` channel.
//!
//! The reconciler publishes one [`PlaybackEvent`] for each hook callback a
//! UI layer would register (`onPlay`, `onPause`, `onStop`, `onSeek`,
//! `onReady`, `onProgress`), plus state changes, track changes and
//! command failures. Lifecycle events cover adapter binding and shutdown.
//!
//! ```text
//! ┌────────────┐   emit    ┌───────────┐  subscribe  ┌──────────────┐
//! │ Reconciler ├──────────>│ EventBus  ├────────────>│ UI callbacks │
//! └────────────┘           │(broadcast)│             └──────────────┘
//! ┌────────────┐   emit    │           │  subscribe  ┌──────────────┐
//! │  Service   ├──────────>│           ├────────────>│  Analytics   │
//! └────────────┘           └───────────┘             └──────────────┘
//! ```
//!
//! Subscribing to playback events only:
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! # core_async::runtime::block_on(async {
//! let bus = EventBus::new(16);
//! let mut stream = bus.stream().filter(|event| matches!(event, CoreEvent::Playback(_)));
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::Played)).ok();
//! assert_eq!(stream.recv().await.unwrap(), CoreEvent::Playback(PlaybackEvent::Played));
//! # });
//! ```
//!
//! ## Receive errors
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind and missed `n`
//!   events. Progress events arrive every second, so a UI that only needs
//!   the latest snapshot should read the store instead.
//! - **`RecvError::Closed`**: every sender is gone, the player shut down.

use serde::{Deserialize, Serialize};
use std::fmt;
use core_async::sync::broadcast;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Per-subscriber backlog used when the config does not set one.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Envelope
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Playback(PlaybackEvent),
    Lifecycle(LifecycleEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Lifecycle(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::StateChanged { state, .. }) if state == "ERROR" => {
                EventSeverity::Warning
            }
            CoreEvent::Playback(PlaybackEvent::Progress { .. }) => EventSeverity::Debug,
            CoreEvent::Playback(_) | CoreEvent::Lifecycle(_) => EventSeverity::Info,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback notifications
// ============================================================================

/// Player notifications, one per observable transition.
///
/// States are carried as their canonical names (`"PLAYING"`, `"PAUSED"`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A new track was selected, or the selection was cleared (`title` and
    /// `url` are `None`).
    TrackChanged {
        title: Option<String>,
        url: Option<String>,
    },
    /// Content loaded and its duration resolved.
    Ready {
        title: String,
        total_duration_secs: f64,
    },
    /// Canonical state changed.
    StateChanged { state: String, previous: String },
    /// Playback position advanced.
    Progress {
        elapsed_secs: f64,
        total_duration_secs: f64,
        /// `0.0..=100.0`
        progress_percent: f64,
    },
    Played,
    Paused,
    Stopped,
    Seeked { position_secs: f64 },
    RepeatToggled { repeat: bool },
    /// A command failed. `kind` is the error category
    /// (`InvalidArgument`, `NotReady`, `NativeFailure`, `Unknown`).
    Error {
        operation: String,
        kind: String,
        message: String,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::TrackChanged { title: Some(_), .. } => "Track selected",
            PlaybackEvent::TrackChanged { title: None, .. } => "Track cleared",
            PlaybackEvent::Ready { .. } => "Track ready",
            PlaybackEvent::StateChanged { .. } => "Player state changed",
            PlaybackEvent::Progress { .. } => "Playback progress",
            PlaybackEvent::Played => "Playback started",
            PlaybackEvent::Paused => "Playback paused",
            PlaybackEvent::Stopped => "Playback stopped",
            PlaybackEvent::Seeked { .. } => "Playback position changed",
            PlaybackEvent::RepeatToggled { .. } => "Repeat toggled",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LifecycleEvent {
    /// The reconciler subscribed to a native audio module.
    AdapterBound { platform: String },
    /// The player was torn down and the native module released.
    Shutdown,
}

impl LifecycleEvent {
    fn description(&self) -> &str {
        match self {
            LifecycleEvent::AdapterBound { .. } => "Audio module bound",
            LifecycleEvent::Shutdown => "Player shut down",
        }
    }
}

// ============================================================================
// Bus
// ============================================================================

/// Sending side shared by the reconciler and the service. Clones publish
/// on the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Each subscriber may fall `capacity` events behind before it lags.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Number of receivers reached. Fails only when nobody is subscribed,
    /// which publishers ignore.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// [`emit`](Self::emit) for a playback notification, result discarded.
    pub fn publish(&self, event: PlaybackEvent) {
        let _ = self.sender.send(CoreEvent::Playback(event));
    }

    /// Raw receiver. Only events emitted after this call are seen.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Subscribes and wraps the receiver in an [`EventStream`].
    pub fn stream(&self) -> EventStream {
        EventStream::new(self.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Filtered subscription
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional predicate.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Next buffered event that passes the filter, `None` when the backlog
    /// holds nothing matching.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        use core_async::sync::broadcast::error::TryRecvError;

        let outcome = loop {
            match self.receiver.try_recv() {
                Ok(event) if self.matches(&event) => break Ok(event),
                Ok(_) => continue,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Lagged(missed)) => break Err(RecvError::Lagged(missed)),
                Err(TryRecvError::Closed) => break Err(RecvError::Closed),
            }
        };
        Some(outcome)
    }

    fn matches(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[core_async::test]
    async fn test_emit_without_subscribers_is_an_error() {
        let bus = EventBus::new(4);
        assert!(bus.emit(CoreEvent::Playback(PlaybackEvent::Played)).is_err());
        // publish swallows it
        bus.publish(PlaybackEvent::Paused);
    }

    #[core_async::test]
    async fn test_every_subscriber_receives() {
        let bus = EventBus::new(4);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let sent = bus
            .emit(CoreEvent::Playback(PlaybackEvent::Seeked { position_secs: 12.0 }))
            .unwrap();

        assert_eq!(sent, 2);
        assert_eq!(first.recv().await.unwrap(), second.recv().await.unwrap());
    }

    #[core_async::test]
    async fn test_stream_filter_skips_non_matching() {
        let bus = EventBus::new(8);
        let mut errors = bus
            .stream()
            .filter(|event| event.severity() == EventSeverity::Error);

        bus.publish(PlaybackEvent::Played);
        bus.publish(PlaybackEvent::Error {
            operation: "play".to_string(),
            kind: "NotReady".to_string(),
            message: "no content loaded".to_string(),
        });

        match errors.recv().await.unwrap() {
            CoreEvent::Playback(PlaybackEvent::Error { operation, .. }) => {
                assert_eq!(operation, "play")
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(errors.try_recv().is_none());
    }

    #[core_async::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut stream = bus.stream();

        for second in 0..5 {
            bus.publish(PlaybackEvent::Progress {
                elapsed_secs: second as f64,
                total_duration_secs: 10.0,
                progress_percent: second as f64 * 10.0,
            });
        }

        assert!(matches!(stream.try_recv(), Some(Err(RecvError::Lagged(3)))));
    }

    #[test]
    fn test_severity_and_description() {
        let progress = CoreEvent::Playback(PlaybackEvent::Progress {
            elapsed_secs: 1.0,
            total_duration_secs: 2.0,
            progress_percent: 50.0,
        });
        assert_eq!(progress.severity(), EventSeverity::Debug);

        let errored = CoreEvent::Playback(PlaybackEvent::StateChanged {
            state: "ERROR".to_string(),
            previous: "PLAYING".to_string(),
        });
        assert_eq!(errored.severity(), EventSeverity::Warning);

        let cleared = CoreEvent::Playback(PlaybackEvent::TrackChanged {
            title: None,
            url: None,
        });
        assert_eq!(cleared.description(), "Track cleared");
        assert_eq!(
            CoreEvent::Lifecycle(LifecycleEvent::Shutdown).severity(),
            EventSeverity::Info
        );
    }

    #[test]
    fn test_serialization_shape() {
        let event = CoreEvent::Playback(PlaybackEvent::RepeatToggled { repeat: true });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Playback");
        assert_eq!(json["payload"]["event"], "RepeatToggled");
        assert_eq!(json["payload"]["repeat"], true);

        let back: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
