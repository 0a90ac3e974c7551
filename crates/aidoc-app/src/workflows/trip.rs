//! Trip start and review submission.

use std::sync::Arc;

use aidoc_core::Provider;
use aidoc_trip::{TripController, TripOutcome};

use super::SharedApp;
use crate::errors::AppError;
use crate::views::notice::Notice;

/// Start a trip to `provider` and open the trip screen.
pub async fn start_trip(app_core: &SharedApp, provider: Provider) -> Arc<TripController> {
    tracing::info!(provider_id = %provider.id, "starting trip");
    app_core.write().await.start_trip(provider)
}

/// Look up `provider_id` and start a trip to it.
pub async fn start_trip_to(
    app_core: &SharedApp,
    provider_id: &str,
) -> Result<Arc<TripController>, AppError> {
    let data = app_core.read().await.data().clone();
    let provider = data
        .get_provider(provider_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("provider {provider_id}")))?;
    Ok(start_trip(app_core, provider).await)
}

/// Submit the trip review as the signed-in patient, then close the trip and
/// return home.
///
/// Without a patient session no review is stored, a notice asks the user to
/// log in, and the trip still closes.
pub async fn submit_review(app_core: &SharedApp) -> Result<TripOutcome, AppError> {
    let (data, trip, user) = {
        let core = app_core.read().await;
        (
            core.data().clone(),
            core.trip(),
            core.current_user().cloned(),
        )
    };
    let trip = trip.ok_or_else(|| AppError::not_found("active trip"))?;

    let outcome = trip.submit_review(&data, user.as_ref()).await?;

    // Mirror the provider session the store may have refreshed.
    let refreshed = match &outcome {
        TripOutcome::Submitted(_) => data.current_provider().await?,
        TripOutcome::LoginRequired => None,
    };

    let mut core = app_core.write().await;
    if let Some(provider) = refreshed {
        if core.current_provider().map(|p| &p.id) == Some(&provider.id) {
            core.set_provider(Some(provider));
        }
    }
    let notice = match &outcome {
        TripOutcome::Submitted(_) => Notice::success(outcome.notice()),
        TripOutcome::LoginRequired => Notice::info(outcome.notice()),
    };
    core.push_notice(notice);
    core.trip_complete();
    Ok(outcome)
}
