//! Symptom and media diagnosis.

use aidoc_core::{DiagnosisResult, MediaPart, Provider, ProviderKind};

use super::{now, SharedApp};
use crate::errors::AppError;

/// Shown when neither symptoms nor media were supplied
pub const NOTHING_TO_ANALYZE: &str =
    "Please provide either a symptom description or upload an image/video.";

/// Shown when the model call fails
pub const ANALYSIS_FAILED: &str = "Analysis failed. Please try again.";

/// What the patient submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisRequest {
    /// Free-text symptom description
    pub symptoms: String,
    /// Photo, audio or video of the complaint
    pub media: Option<MediaPart>,
}

impl DiagnosisRequest {
    /// Text-only request
    pub fn symptoms(text: impl Into<String>) -> Self {
        Self {
            symptoms: text.into(),
            media: None,
        }
    }

    /// Attach media
    pub fn with_media(mut self, media: MediaPart) -> Self {
        self.media = Some(media);
        self
    }
}

/// Run a diagnosis and save it to the history, linked to the signed-in
/// patient when there is one.
///
/// Nothing is saved when the model call fails.
pub async fn diagnose(
    app_core: &SharedApp,
    request: DiagnosisRequest,
) -> Result<DiagnosisResult, AppError> {
    if request.media.is_none() && request.symptoms.trim().is_empty() {
        return Err(AppError::input(NOTHING_TO_ANALYZE));
    }

    let (data, inference, user_id) = {
        let core = app_core.read().await;
        (
            core.data().clone(),
            core.inference(),
            core.current_user().map(|u| u.id.clone()),
        )
    };

    let analysis = inference
        .diagnose(request.media.as_ref(), &request.symptoms)
        .await
        .map_err(|e| AppError::inference(ANALYSIS_FAILED, e))?;

    let stamp = now(app_core).await?;
    let record = DiagnosisResult {
        id: stamp.id_string(),
        user_id,
        date: stamp.locale_date_string(),
        symptoms: request.symptoms,
        ai_analysis: analysis,
        image: request.media.as_ref().map(MediaPart::data_url),
    };
    data.save_diagnosis(record.clone()).await?;
    tracing::info!(record_id = %record.id, linked = record.user_id.is_some(), "diagnosis saved");
    Ok(record)
}

/// Providers suggested alongside a diagnosis: hospitals, then doctors.
pub async fn specialists(app_core: &SharedApp) -> Result<Vec<Provider>, AppError> {
    let data = app_core.read().await.data().clone();
    let mut providers = data.get_providers(Some(ProviderKind::Hospital)).await?;
    providers.extend(data.get_providers(Some(ProviderKind::Doctor)).await?);
    Ok(providers)
}
