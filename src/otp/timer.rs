//! Scoped repeating tick timer.
//!
//! A spawned task emits one tick per period through a channel of capacity one,
//! so at most one tick is ever waiting to be handled. The task ends after the
//! requested number of ticks and is aborted when the `TickTimer` is dropped.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

#[derive(Debug)]
pub struct TickTimer {
    handle: JoinHandle<()>,
    ticks: mpsc::Receiver<()>,
}

impl TickTimer {
    /// Spawn a timer that fires `count` times, once every `period`.
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(period: Duration, count: u32) -> Self {
        let (tx, ticks) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for remaining in (0..count).rev() {
                interval.tick().await;
                trace!(remaining, "tick");
                if tx.send(()).await.is_err() {
                    return;
                }
            }
        });

        Self { handle, ticks }
    }

    /// Wait for the next tick. Returns `false` once the timer has run out.
    pub async fn tick(&mut self) -> bool {
        self.ticks.recv().await.is_some()
    }

    #[cfg(test)]
    pub(crate) fn abort_handle(&self) -> tokio::task::AbortHandle {
        self.handle.abort_handle()
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_requested_number_of_ticks() {
        let mut timer = TickTimer::spawn(Duration::from_secs(1), 3);
        let start = Instant::now();
        for _ in 0..3 {
            assert!(timer.tick().await);
        }
        assert!(!timer.tick().await);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let mut timer = TickTimer::spawn(Duration::from_secs(1), 1);
        let start = Instant::now();
        assert!(timer.tick().await);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_task() {
        let timer = TickTimer::spawn(Duration::from_secs(1), 60);
        let probe = timer.abort_handle();
        assert!(!probe.is_finished());

        drop(timer);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(probe.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_count_finishes_immediately() {
        let mut timer = TickTimer::spawn(Duration::from_secs(1), 0);
        assert!(!timer.tick().await);
    }
}
