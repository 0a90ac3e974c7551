//! Time effect interface
//!
//! Two clocks are exposed: a wall clock for record ids and dates, and a
//! monotonic millisecond counter for measuring elapsed animation time.
//! Simulated handlers advance both when asked to sleep.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::time::PhysicalTime;

/// Error type for time operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// The wall clock could not be read
    #[error("Clock unavailable: {reason}")]
    ClockUnavailable {
        /// Handler message
        reason: String,
    },
    /// A sleep or other clock operation failed
    #[error("Operation failed: {reason}")]
    OperationFailed {
        /// Handler message
        reason: String,
    },
}

/// Clock and sleep operations
#[async_trait]
pub trait TimeEffects: Send + Sync {
    /// Current wall-clock time.
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError>;

    /// Milliseconds on a monotonic clock with an arbitrary origin.
    fn monotonic_ms(&self) -> u64;

    /// Suspend the caller for `ms` milliseconds.
    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError>;
}

/// Blanket implementation for Arc<T> where T: TimeEffects
#[async_trait]
impl<T: TimeEffects + ?Sized> TimeEffects for Arc<T> {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        (**self).physical_time().await
    }

    fn monotonic_ms(&self) -> u64 {
        (**self).monotonic_ms()
    }

    async fn sleep_ms(&self, ms: u64) -> Result<(), TimeError> {
        (**self).sleep_ms(ms).await
    }
}
