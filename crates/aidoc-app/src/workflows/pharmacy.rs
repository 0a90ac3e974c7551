//! Over-the-counter recommendations and pharmacy listing.

use aidoc_core::{Provider, ProviderKind};

use super::SharedApp;
use crate::errors::AppError;

/// Shown when the model call fails
pub const RECOMMENDATION_FAILED: &str = "Error getting recommendation.";

/// Ask for a medicine recommendation. Empty symptoms do nothing and return
/// `None`.
pub async fn recommend(app_core: &SharedApp, symptoms: &str) -> Result<Option<String>, AppError> {
    if symptoms.is_empty() {
        return Ok(None);
    }
    let inference = app_core.read().await.inference();
    let text = inference
        .recommend_medicine(symptoms)
        .await
        .map_err(|e| AppError::inference(RECOMMENDATION_FAILED, e))?;
    Ok(Some(text))
}

/// Registered pharmacies
pub async fn pharmacies(app_core: &SharedApp) -> Result<Vec<Provider>, AppError> {
    let data = app_core.read().await.data().clone();
    Ok(data.get_providers(Some(ProviderKind::Pharmacy)).await?)
}
