//! View models
//!
//! Plain data derived from domain records for display. Nothing here touches
//! storage or effects.

pub mod notice;
pub mod summary;

pub use notice::{Notice, NoticeLevel};
pub use summary::{ProviderDashboard, ProviderSummary};
