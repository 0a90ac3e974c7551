//! Real time effect handler for production use

use aidoc_core::effects::{TimeEffects, TimeError};
use aidoc_core::PhysicalTime;
use async_trait::async_trait;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::{self, Instant};

/// Wall clock from the OS, monotonic clock and sleeps from tokio.
///
/// The monotonic origin is the handler's construction instant. Because it is
/// a tokio `Instant`, paused test runtimes see virtual time here too.
#[derive(Debug, Clone)]
pub struct RealTimeHandler {
    origin: Instant,
}

impl Default for RealTimeHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

#[async_trait]
impl TimeEffects for RealTimeHandler {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TimeError::ClockUnavailable {
                reason: e.to_string(),
            })?;
        let ts_ms = u64::try_from(since_epoch.as_millis()).map_err(|_| {
            TimeError::ClockUnavailable {
                reason: "timestamp overflow".to_string(),
            }
        })?;
        Ok(PhysicalTime::from_millis(ts_ms))
    }

    fn monotonic_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    }
}
