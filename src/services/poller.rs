//! Poller: lifecycle-bound fixed-interval refresh.
//!
//! DESIGN
//! ======
//! The server never pushes, so every live list is kept fresh by re-fetching
//! on a fixed cadence. A pane implements `Refresh`; mounting it spawns one
//! task that refreshes immediately and then once per interval. The task is
//! owned by the `Mounted` guard and aborted when the guard drops, which is
//! how unmount and key changes cancel polling. There is no pause/resume, no
//! backoff and no retry cap: a failed refresh logs, and the next tick runs
//! on schedule.
//!
//! TRADE-OFFS
//! ==========
//! Ticks from one poll task never overlap, but a refresh triggered outside
//! the task (e.g. right after a post) can race a tick and land stale data.
//! The next tick corrects it.

use std::ops::Deref;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

/// Something that can re-fetch its own state. Failures are handled inside.
#[async_trait::async_trait]
pub trait Refresh: Clone + Send + Sync + 'static {
    async fn refresh(&self);
}

/// Shortest period a poll task will run at. `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Abort-on-drop guard for a spawned poll task.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Spawn the poll task for `target`. Must be called inside a tokio runtime.
    /// A zero `every` is raised to one millisecond.
    pub fn spawn<P: Refresh>(target: P, every: Duration) -> Self {
        let every = every.max(MIN_PERIOD);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!(every_ms = every.as_millis(), "poll tick");
                target.refresh().await;
            }
        });
        Self { task }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A pane together with the poll task bound to its lifetime.
pub struct Mounted<P> {
    target: P,
    poll: PollHandle,
}

impl<P: Refresh> Mounted<P> {
    /// Mount `target`: refresh now, then every `every` until dropped.
    pub fn mount(target: P, every: Duration) -> Self {
        let poll = PollHandle::spawn(target.clone(), every);
        Self { target, poll }
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poll.is_active()
    }
}

impl<P> Deref for Mounted<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.target
    }
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
