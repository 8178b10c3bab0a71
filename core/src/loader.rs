//! The simulated data source: one timed producer task per load.
//!
//! `Loader::load` creates a fresh pending load, schedules a timer for the
//! configured delay, and hands back a [`LoadHandle`]. When the timer fires,
//! the producer publishes the Scheduled → Completed transition and then
//! delivers the payload, exactly once. The handle supports both consumption
//! modes: await it, or attach a continuation with [`LoadHandle::on_ready`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use ersatz_types::{LoadError, LoadId, LoadState, OutputId};

use crate::config::LoaderConfig;
use crate::sink::OutputSink;

/// Simulates a latency-bound fetch of a value.
///
/// Every call to [`Loader::load`] is independent: it gets its own id, its own
/// timer, and its own handle. The loader itself holds no shared mutable
/// state beyond the id counter.
///
/// Loads are driven by spawned tasks, so the loader must be used from within
/// a tokio runtime.
#[derive(Debug)]
pub struct Loader {
    config: LoaderConfig,
    next_id: AtomicU64,
}

impl Loader {
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Start a fresh load.
    ///
    /// The returned handle resolves with the configured payload exactly once,
    /// strictly after the configured delay: never before, never synchronously.
    /// It never resolves with an error under current behavior.
    pub fn load(&self) -> LoadHandle {
        let id = LoadId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (state_tx, state_rx) = watch::channel(LoadState::Scheduled);
        let (value_tx, value_rx) = oneshot::channel();

        let pending = PendingLoad {
            id,
            delay: self.config.delay(),
            payload: self.config.payload().to_string(),
            state: state_tx,
        };
        tracing::debug!(%id, delay = ?pending.delay, "load scheduled");
        tokio::spawn(pending.run(value_tx));

        LoadHandle {
            id,
            state: state_rx,
            value: value_rx,
        }
    }

    /// Start a load and render its payload into `target` when it completes.
    ///
    /// This is continuation-mode consumption wired straight to the sink
    /// boundary. The returned task handle can be joined to wait for the
    /// render.
    pub fn load_into(&self, sink: Arc<dyn OutputSink>, target: OutputId) -> JoinHandle<()> {
        self.load().on_ready(move |outcome| match outcome {
            Ok(text) => sink.render(&target, &text),
            Err(err) => {
                tracing::warn!(target = %target, error = %err, "load failed before render");
            }
        })
    }
}

/// Producer side of one load. Owned by the spawned task.
struct PendingLoad {
    id: LoadId,
    delay: Duration,
    payload: String,
    state: watch::Sender<LoadState>,
}

impl PendingLoad {
    async fn run(self, value: oneshot::Sender<String>) {
        tokio::time::sleep(self.delay).await;

        // The transition must be observable before the value is: a consumer
        // that sees the payload must also see Completed.
        let _ = self.state.send(LoadState::Completed);
        tracing::debug!(id = %self.id, "load completed");

        if value.send(self.payload).is_err() {
            tracing::warn!(id = %self.id, "load completed but the handle was dropped");
        }
    }
}

/// Caller side of one load.
///
/// Await it to suspend until the value arrives, or hand it a continuation
/// with [`LoadHandle::on_ready`]. Either way the value is delivered exactly
/// once, and [`LoadHandle::state`] can observe the lifecycle without
/// consuming the handle.
///
/// Dropping the handle abandons the value; the timer is not stoppable.
#[derive(Debug)]
pub struct LoadHandle {
    id: LoadId,
    state: watch::Receiver<LoadState>,
    value: oneshot::Receiver<String>,
}

impl LoadHandle {
    #[must_use]
    pub fn id(&self) -> LoadId {
        self.id
    }

    /// Current lifecycle state of the load.
    #[must_use]
    pub fn state(&self) -> LoadState {
        *self.state.borrow()
    }

    /// Attach a continuation invoked with the resolved value.
    ///
    /// Behaviorally equivalent to awaiting the handle: the continuation runs
    /// at the same point in time and sees the same value an awaiting caller
    /// would.
    pub fn on_ready<F>(self, f: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<String, LoadError>) + Send + 'static,
    {
        tokio::spawn(async move {
            let outcome = self.await;
            f(outcome);
        })
    }
}

impl Future for LoadHandle {
    type Output = Result<String, LoadError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.value).poll(cx) {
            Poll::Ready(Ok(payload)) => Poll::Ready(Ok(payload)),
            // The producer always sends before dropping its sender; the only
            // way to lose it is runtime shutdown, where nothing polls.
            Poll::Ready(Err(_)) => unreachable!("load producer dropped without sending"),
            Poll::Pending => Poll::Pending,
        }
    }
}
