//! Inference effect interface
//!
//! Stateless request/response calls to a remote multimodal model. Handlers do
//! not retry, time out, cache or deduplicate: every call is a fresh round trip.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::inference::{MediaPart, NutritionAnalysis};

/// Error type for inference operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum InferenceError {
    /// Neither configuration nor the stored override holds a key
    #[error("API key not found")]
    MissingCredential,
    /// Transport failure
    #[error("Request failed: {0}")]
    Request(String),
    /// Non-success HTTP status
    #[error("Inference endpoint returned {code}: {body}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Response body as text
        body: String,
    },
    /// Response carried no candidate text
    #[error("Inference endpoint returned no text")]
    EmptyResponse,
    /// Response text did not match the expected shape
    #[error("Malformed inference response: {0}")]
    Parse(String),
}

/// Remote model operations
#[async_trait]
pub trait InferenceEffects: Send + Sync {
    /// Four-section diagnosis report as raw text.
    async fn diagnose(
        &self,
        media: Option<&MediaPart>,
        symptom_text: &str,
    ) -> Result<String, InferenceError>;

    /// Schema-constrained nutrition analysis of a meal photo.
    async fn analyze_nutrition(&self, media: &MediaPart)
        -> Result<NutritionAnalysis, InferenceError>;

    /// Brief over-the-counter medicine recommendation.
    async fn recommend_medicine(&self, symptom_text: &str) -> Result<String, InferenceError>;
}

/// Secondary source for the inference credential, consulted when no key is
/// configured directly.
#[async_trait]
pub trait ApiKeySource: Send + Sync {
    /// The stored key, if any. Lookup failures read as absence.
    async fn api_key(&self) -> Option<String>;
}

/// Blanket implementation for Arc<T> where T: InferenceEffects
#[async_trait]
impl<T: InferenceEffects + ?Sized> InferenceEffects for Arc<T> {
    async fn diagnose(
        &self,
        media: Option<&MediaPart>,
        symptom_text: &str,
    ) -> Result<String, InferenceError> {
        (**self).diagnose(media, symptom_text).await
    }

    async fn analyze_nutrition(
        &self,
        media: &MediaPart,
    ) -> Result<NutritionAnalysis, InferenceError> {
        (**self).analyze_nutrition(media).await
    }

    async fn recommend_medicine(&self, symptom_text: &str) -> Result<String, InferenceError> {
        (**self).recommend_medicine(symptom_text).await
    }
}
