//! Sign-in and sign-out for patients and providers.

use aidoc_core::{Provider, User};

use super::SharedApp;
use crate::core::Screen;
use crate::errors::AppError;

/// Shown for any failed patient login
pub const INVALID_USER_CREDENTIALS: &str = "Invalid email or password";

/// Shown for any failed provider login
pub const INVALID_PROVIDER_CREDENTIALS: &str = "Invalid provider credentials.";

/// Sign a patient in and return home.
///
/// Unknown email and wrong password produce the same error.
pub async fn login_user(
    app_core: &SharedApp,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let data = app_core.read().await.data().clone();
    let user = data
        .login_user(email, password)
        .await?
        .ok_or_else(|| AppError::input(INVALID_USER_CREDENTIALS))?;

    let mut core = app_core.write().await;
    core.set_user(Some(user.clone()));
    core.set_screen(Screen::Home);
    Ok(user)
}

/// Sign a provider in and open the dashboard.
pub async fn login_provider(
    app_core: &SharedApp,
    email: &str,
    password: &str,
) -> Result<Provider, AppError> {
    let data = app_core.read().await.data().clone();
    let provider = data
        .login_provider(email, password)
        .await?
        .ok_or_else(|| AppError::input(INVALID_PROVIDER_CREDENTIALS))?;

    let mut core = app_core.write().await;
    core.set_provider(Some(provider.clone()));
    core.set_screen(Screen::ProviderDashboard);
    Ok(provider)
}

/// Clear whichever sessions exist and return home.
pub async fn logout(app_core: &SharedApp) -> Result<(), AppError> {
    let (data, had_user, had_provider) = {
        let core = app_core.read().await;
        (
            core.data().clone(),
            core.current_user().is_some(),
            core.current_provider().is_some(),
        )
    };

    if had_user {
        data.logout_user().await?;
    }
    if had_provider {
        data.logout_provider().await?;
    }

    let mut core = app_core.write().await;
    core.set_user(None);
    core.set_provider(None);
    core.set_screen(Screen::Home);
    tracing::info!(had_user, had_provider, "signed out");
    Ok(())
}
