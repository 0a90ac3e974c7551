//! Patient profile and provider dashboard editing.

use aidoc_core::types::{ProviderProfilePatch, UserProfilePatch};
use aidoc_core::{DiagnosisResult, Provider, User};

use super::SharedApp;
use crate::errors::AppError;
use crate::views::notice::Notice;
use crate::views::summary::ProviderDashboard;

/// Shown after either profile is saved
pub const PROFILE_UPDATED: &str = "Profile Updated Successfully!";

/// Merge `patch` into the signed-in patient and save it. The in-memory
/// session is replaced by the stored session read back after the write.
pub async fn update_user_profile(
    app_core: &SharedApp,
    patch: UserProfilePatch,
) -> Result<User, AppError> {
    let (data, current) = {
        let core = app_core.read().await;
        (core.data().clone(), core.current_user().cloned())
    };
    let current = current.ok_or_else(|| AppError::not_found("signed-in user"))?;

    let updated = patch.apply(&current);
    data.update_user(updated.clone()).await?;
    let refreshed = data.current_user().await?;

    let mut core = app_core.write().await;
    core.set_user(refreshed.clone());
    match refreshed {
        Some(user) if user == updated => {
            core.push_notice(Notice::success(PROFILE_UPDATED));
            Ok(user)
        }
        _ => Err(AppError::not_found(format!("user {}", updated.id))),
    }
}

/// Diagnoses of the signed-in patient, newest first. Empty without a
/// session.
pub async fn user_history(app_core: &SharedApp) -> Result<Vec<DiagnosisResult>, AppError> {
    let (data, user_id) = {
        let core = app_core.read().await;
        (core.data().clone(), core.current_user().map(|u| u.id.clone()))
    };
    match user_id {
        Some(user_id) => Ok(data.diagnosis_history(&user_id).await?),
        None => Ok(Vec::new()),
    }
}

/// Merge `patch` into the signed-in provider and save it, then adopt the
/// stored provider session.
pub async fn update_provider_profile(
    app_core: &SharedApp,
    patch: ProviderProfilePatch,
) -> Result<Provider, AppError> {
    let (data, current) = {
        let core = app_core.read().await;
        (core.data().clone(), core.current_provider().cloned())
    };
    let current = current.ok_or_else(|| AppError::not_found("signed-in provider"))?;

    let updated = patch.apply(&current);
    data.update_provider(updated.clone()).await?;
    let refreshed = data.current_provider().await?;

    let mut core = app_core.write().await;
    core.set_provider(refreshed.clone());
    match refreshed {
        Some(provider) if provider == updated => {
            core.push_notice(Notice::success(PROFILE_UPDATED));
            Ok(provider)
        }
        _ => Err(AppError::not_found(format!("provider {}", updated.id))),
    }
}

/// Dashboard for the signed-in provider
pub async fn provider_dashboard(app_core: &SharedApp) -> Option<ProviderDashboard> {
    let core = app_core.read().await;
    core.current_provider().cloned().map(ProviderDashboard::of)
}
