//! # Tickers
//!
//! Periodic tasks that post an event into the kiosk's channel.
//!
//! ```text
//!   ┌──────────────┐  every period   ┌──────────────┐
//!   │   Ticker     │ ──────────────► │  event loop  │
//!   │ select! {    │   KioskEvent    └──────────────┘
//!   │  tick        │
//!   │  shutdown_rx │ ◄── TickerHandle::shutdown()
//!   │ }            │
//!   └──────────────┘
//! ```
//!
//! The first event fires one full period after spawning.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};
use tracing::{debug, trace};

use crate::event::KioskEvent;

/// Handle to a running ticker.
#[derive(Debug)]
pub struct TickerHandle {
    name: &'static str,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Signals the ticker and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
        debug!(ticker = self.name, "Ticker stopped");
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Spawns a ticker that sends `make(now)` every `period`.
///
/// Stops on shutdown or when the receiving side is dropped.
pub fn spawn<F>(
    name: &'static str,
    period: Duration,
    tx: mpsc::Sender<KioskEvent>,
    make: F,
) -> TickerHandle
where
    F: Fn(Instant) -> KioskEvent + Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut ticks = interval_at(start, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            ticker = name,
            period_ms = period.as_millis() as u64,
            "Ticker started"
        );

        loop {
            tokio::select! {
                tick = ticks.tick() => {
                    trace!(ticker = name, "Tick");
                    if tx.send(make(tick.into_std())).await.is_err() {
                        break;
                    }
                }
                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }
    });

    TickerHandle {
        name,
        shutdown_tx,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticker_fires_each_period() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle = spawn("ads", Duration::from_secs(5), tx, |_| KioskEvent::RotateAd);

        tokio::time::sleep(Duration::from_millis(15_100)).await;
        handle.shutdown().await;

        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event, KioskEvent::RotateAd);
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_first_tick() {
        let (tx, mut rx) = mpsc::channel(8);
        let handle = spawn(
            "toasts",
            Duration::from_millis(100),
            tx,
            KioskEvent::PruneNotifications,
        );
        assert_eq!(handle.name(), "toasts");

        handle.shutdown().await;
        assert!(rx.recv().await.is_none());
    }
}
