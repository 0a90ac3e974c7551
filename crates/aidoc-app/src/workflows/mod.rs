//! # Workflows - Portable Business Logic
//!
//! Multi-step operations shared by every frontend. Each workflow:
//!
//! 1. takes a short read lock on the [`AppCore`](crate::AppCore) to clone
//!    the handles it needs,
//! 2. runs its effects (store, inference, clock) with no lock held,
//! 3. takes a short write lock to update sessions, screen and notices,
//! 4. returns domain types or an [`AppError`](crate::AppError) whose text
//!    is the user-facing notice.
//!
//! Success notices are queued on the core by the workflow; failures are
//! returned and the frontend decides whether to call
//! [`AppCore::report`](crate::AppCore::report).
//!
//! ```rust,ignore
//! let app = Arc::new(RwLock::new(AppCore::bootstrap(config, effects).await?));
//! if let Err(err) = auth::login_user(&app, "ada@example.com", "pw").await {
//!     app.write().await.report(&err);
//! }
//! ```

pub mod auth;
pub mod diagnosis;
pub mod emergency;
pub mod nutrition;
pub mod pharmacy;
pub mod profile;
pub mod registration;
pub mod trip;

use std::sync::Arc;

use aidoc_core::PhysicalTime;
use tokio::sync::RwLock;

use crate::core::AppCore;
use crate::errors::AppError;

/// Shared handle frontends pass to workflows
pub type SharedApp = Arc<RwLock<AppCore>>;

/// Current wall-clock reading from the core's clock.
pub(crate) async fn now(app_core: &SharedApp) -> Result<PhysicalTime, AppError> {
    let time = app_core.read().await.time();
    Ok(time.physical_time().await?)
}
