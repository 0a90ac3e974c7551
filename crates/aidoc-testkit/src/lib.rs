//! AI Doctor Testing Infrastructure
//!
//! Deterministic effect handlers and record builders shared by the test
//! suites of every other crate.
//!
//! ```toml
//! [dev-dependencies]
//! aidoc-testkit = { path = "../aidoc-testkit" }
//! ```
//!
//! ```rust,ignore
//! use aidoc_testkit::TestEffects;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let effects = TestEffects::new();
//!     effects.time.advance(3_000);
//!     // ...
//! }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod builders;
pub mod inference;
pub mod storage;
pub mod time;

pub use builders::{review, ProviderBuilder, UserBuilder};
pub use inference::{InferenceCall, MockInferenceHandler};
pub use storage::MemoryStorageHandler;
pub use time::SimulatedTimeHandler;

use std::sync::Arc;

/// Wall-clock start used by [`TestEffects::new`]: 2024-01-15T12:00:00Z.
pub const TEST_EPOCH_MS: u64 = 1_705_320_000_000;

/// One of each deterministic handler, shared through `Arc`s.
#[derive(Debug, Clone)]
pub struct TestEffects {
    /// In-memory key-value store
    pub storage: Arc<MemoryStorageHandler>,
    /// Manually advanced clock
    pub time: Arc<SimulatedTimeHandler>,
    /// Scripted model
    pub inference: Arc<MockInferenceHandler>,
}

impl TestEffects {
    /// Empty storage, clock at [`TEST_EPOCH_MS`], inference with default
    /// scripted replies.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(MemoryStorageHandler::new()),
            time: Arc::new(SimulatedTimeHandler::new(TEST_EPOCH_MS)),
            inference: Arc::new(MockInferenceHandler::new()),
        }
    }
}

impl Default for TestEffects {
    fn default() -> Self {
        Self::new()
    }
}

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
