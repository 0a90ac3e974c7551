//! AI Doctor Store - Local Persistence and Data Access
//!
//! Two layers over a [`StorageEffects`](aidoc_core::effects::StorageEffects)
//! namespace:
//!
//! - [`PersistentStore`]: six JSON collections under fixed keys, first-run
//!   seeding, and the stored inference credential override
//! - [`DataAccessService`]: CRUD, authentication, rating recomputation and
//!   session propagation
//!
//! Session snapshots are denormalized copies. Every write to a user or
//! provider record that matches the active session rewrites the snapshot in
//! the same call.

#![forbid(unsafe_code)]

pub mod adapter;
pub mod error;
pub mod seed;
pub mod service;

pub use adapter::{Collection, PersistentStore, API_KEY_OVERRIDE};
pub use error::{StoreError, StoreResult};
pub use seed::initial_providers;
pub use service::{DataAccessService, RegisterOutcome};
