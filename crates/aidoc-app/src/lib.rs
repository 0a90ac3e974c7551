//! # AI Doctor App - Headless Application Core
//!
//! Frontend-independent shell for AI Doctor: screens and navigation gating,
//! process-scoped sessions, the running trip, notices, and the workflows
//! behind every screen.
//!
//! ## Architecture
//!
//! - [`AppCore`]: state owned by the frontend as `Arc<RwLock<AppCore>>`
//! - [`workflows`]: async business logic that persists first, then updates
//!   the core
//! - [`views`]: display-ready summaries and notices
//! - [`errors`]: categorized errors whose text is the user-facing notice
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aidoc_app::{workflows, AppCore, AppEffects, Screen};
//!
//! let config = AidocConfig::load(None)?;
//! let effects = AppEffects::production(&config);
//! let app = Arc::new(RwLock::new(AppCore::bootstrap(config, effects).await?));
//!
//! app.write().await.navigate(Screen::Diagnosis);
//! let record = workflows::diagnosis::diagnose(&app, DiagnosisRequest::symptoms("fever")).await?;
//! ```

#![forbid(unsafe_code)]

pub mod core;
pub mod errors;
pub mod views;
pub mod workflows;

pub use crate::core::{AppCore, AppEffects, NavItem, Role, Screen};
pub use errors::{AppError, ErrorCategory};
pub use views::{Notice, NoticeLevel, ProviderDashboard, ProviderSummary};
pub use workflows::SharedApp;
