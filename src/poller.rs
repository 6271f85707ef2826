//! Fixed-interval poll scheduler.
//!
//! One repeating timer started at session init and toggleable by the
//! user. Each tick tells the session loop to refresh first-page resources
//! and the summary statistics; the tick itself never performs I/O, so a
//! slow fetch stalls only the caller awaiting it, not the timer loop.

use crate::types::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub struct PollScheduler {
    interval: Duration,
    tx: UnboundedSender<AppEvent>,
    handle: Option<JoinHandle<()>>,
}

impl PollScheduler {
    pub fn new(interval_ms: u64, tx: UnboundedSender<AppEvent>) -> Self {
        PollScheduler {
            interval: Duration::from_millis(interval_ms),
            tx,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts the timer. A no-op while already running, so toggling the
    /// scheduler on twice never produces a second timer.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let tx = self.tx.clone();
        let period = self.interval;
        self.handle = Some(tokio::spawn(async move {
            // First tick lands one full period after start, not immediately.
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                if tx.send(AppEvent::PollTick).is_err() {
                    break;
                }
            }
        }));
        log::info!("[poller] started, interval {}ms", self.interval.as_millis());
    }

    /// Cancels the timer. After this returns the handle is cleared and a
    /// later `start` creates exactly one new timer.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::info!("[poller] stopped");
        }
    }

    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test(start_paused = true)]
    async fn ticks_arrive_at_interval() {
        let (tx, mut rx) = unbounded_channel();
        let mut poller = PollScheduler::new(10_000, tx);
        poller.start();

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::PollTick));
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent() {
        let (tx, mut rx) = unbounded_channel();
        let mut poller = PollScheduler::new(10_000, tx);
        poller.start();
        poller.start();
        assert!(poller.is_running());

        // Exactly one timer: one tick per period, not two.
        rx.recv().await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_ticks() {
        let (tx, mut rx) = unbounded_channel();
        let mut poller = PollScheduler::new(10_000, tx);
        poller.start();
        rx.recv().await.unwrap();
        poller.stop();
        assert!(!poller.is_running());

        tokio::time::sleep(Duration::from_millis(30_000)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop_creates_one_timer() {
        let (tx, mut rx) = unbounded_channel();
        let mut poller = PollScheduler::new(10_000, tx);
        poller.start();
        poller.stop();
        poller.start();
        assert!(poller.is_running());

        rx.recv().await.unwrap();
        assert!(rx.try_recv().is_err());
    }
}
