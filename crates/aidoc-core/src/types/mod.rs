//! Domain records
//!
//! Field names follow the persisted JSON shape (camelCase, with `type` as the
//! discriminator key for users and providers).

pub mod geo;
pub mod provider;
pub mod records;
pub mod user;

pub use geo::{GeoPoint, Location};
pub use provider::{
    mean_rating, Provider, ProviderKind, ProviderProfilePatch, Review, ReviewRating,
};
pub use records::{DiagnosisResult, NutritionResult};
pub use user::{AccountType, User, UserProfilePatch};
