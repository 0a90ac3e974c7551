//! AI Doctor Core - Domain Model and Effect Interfaces
//!
//! This crate provides the foundational types and effect interfaces shared by
//! every other AI Doctor crate. It contains no I/O: handlers live in
//! `aidoc-effects` (production) and `aidoc-testkit` (deterministic testing).
//!
//! # Layout
//!
//! ## Domain Types
//! - `User`, `Provider`, `Review`: directory and account records
//! - `DiagnosisResult`, `NutritionResult`: captured inference history
//! - `GeoPoint`, `Location`: planar coordinates used by the trip simulation
//!
//! ## Effect Interfaces (Pure Signatures)
//! - `StorageEffects`: durable key-value namespace
//! - `TimeEffects`: wall clock, monotonic clock, sleeping
//! - `InferenceEffects`: remote multimodal model calls
//! - `CancellationToken`: cooperative cancellation for background loops

#![forbid(unsafe_code)]

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Inference request/response types and prompt builders
pub mod inference;

/// Wall-clock value types
pub mod time;

/// Domain records persisted by the store
pub mod types;

pub use inference::{Macros, MediaPart, NutritionAnalysis};
pub use time::PhysicalTime;
pub use types::{
    DiagnosisResult, GeoPoint, Location, NutritionResult, Provider, ProviderKind,
    ProviderProfilePatch, Review, ReviewRating, User, UserProfilePatch,
};
