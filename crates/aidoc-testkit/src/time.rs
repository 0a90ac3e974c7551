//! Simulated time handler for deterministic testing
//!
//! Time only moves when the test says so. `sleep_ms` parks the caller until
//! [`SimulatedTimeHandler::advance`] pushes the virtual clock past its
//! deadline; in auto-advance mode sleeping moves the clock itself and returns
//! after a single yield.

use aidoc_core::effects::{TimeEffects, TimeError};
use aidoc_core::PhysicalTime;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Controllable clock shared by wall and monotonic readings.
///
/// Wall time is `epoch_ms + elapsed`; monotonic time is `elapsed`.
#[derive(Debug)]
pub struct SimulatedTimeHandler {
    epoch_ms: u64,
    elapsed: watch::Sender<u64>,
    auto_advance: AtomicBool,
}

impl SimulatedTimeHandler {
    /// Manual clock whose wall reading starts at `epoch_ms`
    pub fn new(epoch_ms: u64) -> Self {
        let (elapsed, _rx) = watch::channel(0);
        Self {
            epoch_ms,
            elapsed,
            auto_advance: AtomicBool::new(false),
        }
    }

    /// Clock where every sleep advances time by its own duration
    pub fn auto_advancing(epoch_ms: u64) -> Self {
        let handler = Self::new(epoch_ms);
        handler.auto_advance.store(true, Ordering::SeqCst);
        handler
    }

    /// Move the clock forward, waking every sleeper whose deadline passed.
    pub fn advance(&self, ms: u64) {
        self.elapsed.send_modify(|t| *t = t.saturating_add(ms));
    }

    /// Advance, then yield enough times for woken tasks to run.
    pub async fn advance_and_settle(&self, ms: u64) {
        self.advance(ms);
        settle().await;
    }

    /// Milliseconds elapsed since construction
    pub fn elapsed_ms(&self) -> u64 {
        *self.elapsed.borrow()
    }
}

/// Yield repeatedly so spawned tasks on a current-thread runtime get to run.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

#[async_trait]
impl TimeEffects for SimulatedTimeHandler {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        Ok(PhysicalTime::from_millis(self.epoch_ms + self.elapsed_ms()))
    }

    fn monotonic_ms(&self) -> u64 {
        self.elapsed_ms()
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        if self.auto_advance.load(Ordering::SeqCst) {
            self.advance(ms);
            tokio::task::yield_now().await;
            return Ok(());
        }

        let mut rx = self.elapsed.subscribe();
        let deadline = rx.borrow_and_update().saturating_add(ms);
        loop {
            if *rx.borrow_and_update() >= deadline {
                return Ok(());
            }
            rx.changed().await.map_err(|_| TimeError::OperationFailed {
                reason: "simulated clock dropped".to_string(),
            })?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn wall_and_monotonic_move_together() {
        let clock = SimulatedTimeHandler::new(1_000);
        clock.advance(250);
        assert_eq!(clock.monotonic_ms(), 250);
        assert_eq!(clock.physical_time().await.unwrap().ts_ms, 1_250);
    }

    #[tokio::test]
    async fn sleeper_wakes_only_after_deadline() {
        let clock = Arc::new(SimulatedTimeHandler::new(0));
        let sleeper = clock.clone();
        let task = tokio::spawn(async move { sleeper.sleep_ms(100).await });

        settle().await;
        clock.advance_and_settle(99).await;
        assert!(!task.is_finished());

        clock.advance_and_settle(1).await;
        assert!(task.is_finished());
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn zero_sleep_returns_immediately() {
        let clock = SimulatedTimeHandler::new(0);
        clock.sleep_ms(0).await.unwrap();
    }

    #[tokio::test]
    async fn auto_advance_moves_clock() {
        let clock = SimulatedTimeHandler::auto_advancing(0);
        clock.sleep_ms(3_000).await.unwrap();
        clock.sleep_ms(16).await.unwrap();
        assert_eq!(clock.monotonic_ms(), 3_016);
    }
}
