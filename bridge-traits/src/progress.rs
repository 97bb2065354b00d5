//! Periodic progress reporting while the native player is playing.

use core_async::sync::CancellationToken;
use core_async::task::{self, JoinHandle};
use core_async::time::{self, Duration};

use crate::{emitter::EventEmitter, playback::NativeAudioEvent};

/// Position sample taken from the native player, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub current_time: f64,
    pub total_duration: f64,
}

impl ProgressSample {
    pub fn new(current_time: f64, total_duration: f64) -> Self {
        Self {
            current_time,
            total_duration,
        }
    }

    pub fn into_event(self) -> NativeAudioEvent {
        NativeAudioEvent::progress(self.current_time, self.total_duration)
    }
}

/// Background task that samples the native position every `period` and
/// emits `onAudioProgress`.
///
/// The first event fires one full period after start. Dropping the ticker
/// cancels it.
#[derive(Debug)]
pub struct ProgressTicker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Start ticking on the current runtime.
    ///
    /// `sample` returns `None` while the position is unknown. Those ticks
    /// are skipped. Returns `None` when called outside a runtime.
    pub fn start<F>(period: Duration, emitter: EventEmitter, sample: F) -> Option<Self>
    where
        F: Fn() -> Option<ProgressSample> + Send + Sync + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = task::try_spawn(async move {
            let mut ticker = time::delayed_interval(period);
            loop {
                core_async::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Some(sample) = sample() {
                            emitter.emit(sample.into_event());
                        }
                    }
                }
            }
            tracing::trace!("Progress ticker stopped");
        });

        match handle {
            Some(handle) => Some(Self { token, handle }),
            None => {
                tracing::warn!("No async runtime available, progress events disabled");
                None
            }
        }
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::AudioEventListener;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn collecting_emitter() -> (EventEmitter, Arc<Mutex<Vec<NativeAudioEvent>>>) {
        let emitter = EventEmitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: Arc<dyn AudioEventListener> =
            Arc::new(move |event: NativeAudioEvent| sink.lock().push(event));
        emitter.add_listener(listener);
        (emitter, seen)
    }

    #[core_async::test(start_paused)]
    async fn emits_once_per_period() {
        let (emitter, seen) = collecting_emitter();
        let position = Arc::new(AtomicU32::new(0));
        let sampled = Arc::clone(&position);

        let ticker = ProgressTicker::start(Duration::from_secs(1), emitter, move || {
            let secs = sampled.fetch_add(1, Ordering::SeqCst) + 1;
            Some(ProgressSample::new(secs as f64, 10.0))
        })
        .expect("runtime is running");

        time::sleep(Duration::from_millis(3500)).await;
        ticker.stop();

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], NativeAudioEvent::progress(3.0, 10.0));
    }

    #[core_async::test(start_paused)]
    async fn skips_unknown_samples_and_stops_on_drop() {
        let (emitter, seen) = collecting_emitter();
        let ticker =
            ProgressTicker::start(Duration::from_secs(1), emitter, || None).expect("runtime");
        time::sleep(Duration::from_millis(2500)).await;
        drop(ticker);
        time::sleep(Duration::from_secs(2)).await;

        assert!(seen.lock().is_empty());
    }

    #[test]
    fn start_outside_runtime_returns_none() {
        let ticker = ProgressTicker::start(Duration::from_secs(1), EventEmitter::new(), || None);
        assert!(ticker.is_none());
    }
}
