//! AI Doctor Effects - Production Effect Handlers
//!
//! Stateless implementations of the effect traits in `aidoc-core`, plus the
//! ambient runtime pieces every host needs.
//!
//! | Concern | Handler |
//! |---|---|
//! | `StorageEffects` | [`FilesystemStorageHandler`] |
//! | `TimeEffects` | [`RealTimeHandler`] |
//! | `InferenceEffects` | [`GeminiInferenceHandler`] |
//! | background work | [`TaskRegistry`], [`CancellationSource`] |
//! | configuration | [`AidocConfig`] |
//! | logging | [`logging::init_tracing`] |
//!
//! Deterministic mocks for tests live in `aidoc-testkit`, not here.

#![forbid(unsafe_code)]

pub mod configuration;
pub mod inference;
pub mod logging;
pub mod storage;
pub mod task;
pub mod time;

pub use configuration::{AidocConfig, ConfigError, InferenceConfig, TripConfig};
pub use inference::GeminiInferenceHandler;
pub use storage::FilesystemStorageHandler;
pub use task::{CancellationSource, TaskRegistry};
pub use time::RealTimeHandler;
