//! Core Effect Trait Definitions
//!
//! Pure trait definitions for every side effect the client performs. This
//! module defines **what** effects can be performed; handlers define **how**.
//!
//! - Production handlers: `aidoc-effects`
//! - Deterministic test handlers: `aidoc-testkit`
//!
//! All effect-using code is parameterized by these traits (usually behind an
//! `Arc<dyn …>`), so tests swap in virtual time, in-memory storage and
//! scripted inference without touching business logic.

pub mod inference;
pub mod storage;
pub mod task;
pub mod time;

pub use inference::{ApiKeySource, InferenceEffects, InferenceError};
pub use storage::{StorageEffects, StorageError};
pub use task::CancellationToken;
pub use time::{TimeEffects, TimeError};
