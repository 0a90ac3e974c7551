//! Emergency hospital listing.

use aidoc_core::{Provider, ProviderKind};

use super::SharedApp;
use crate::errors::AppError;
use crate::views::summary::ProviderSummary;

/// Registered hospitals
pub async fn hospitals(app_core: &SharedApp) -> Result<Vec<Provider>, AppError> {
    let data = app_core.read().await.data().clone();
    Ok(data.get_providers(Some(ProviderKind::Hospital)).await?)
}

/// Hospital cards for the listing
pub async fn hospital_cards(app_core: &SharedApp) -> Result<Vec<ProviderSummary>, AppError> {
    Ok(hospitals(app_core)
        .await?
        .iter()
        .map(ProviderSummary::of)
        .collect())
}
