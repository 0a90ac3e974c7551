//! Gemini inference handler
//!
//! Talks to a `generateContent`-compatible REST endpoint with `reqwest`.
//! Request bodies and response decoding are plain functions so they can be
//! checked without a network.
//!
//! The credential is resolved on the first call, not at construction: the
//! configured key wins, otherwise the [`ApiKeySource`] fallback is asked. A
//! resolved key is cached for the life of the handler; a miss is not, so a key
//! stored later is picked up by the next call.

use std::sync::Arc;

use aidoc_core::effects::{ApiKeySource, InferenceEffects, InferenceError};
use aidoc_core::inference::{
    diagnosis_prompt, medicine_prompt, nutrition_response_schema, NUTRITION_PROMPT,
};
use aidoc_core::{MediaPart, NutritionAnalysis};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::configuration::InferenceConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

// ===== Wire Types =====

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

// ===== Request Building =====

impl GenerateContentRequest {
    /// Single-turn request: media (when present) precedes the text part.
    pub fn new(media: Option<&MediaPart>, text: &str) -> Self {
        let mut parts = Vec::with_capacity(2);
        if let Some(media) = media {
            parts.push(RequestPart {
                inline_data: Some(InlineData {
                    mime_type: media.mime_type.clone(),
                    data: media.base64_data(),
                }),
                text: None,
            });
        }
        parts.push(RequestPart {
            inline_data: None,
            text: Some(text.to_string()),
        });

        Self {
            contents: vec![RequestContent { role: "user", parts }],
            generation_config: None,
        }
    }

    /// Constrain the response to JSON matching `schema`.
    pub fn with_json_schema(mut self, schema: serde_json::Value) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        });
        self
    }
}

/// `{endpoint}/models/{model}:generateContent`
pub fn generate_content_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    )
}

/// Concatenate the text parts of the first candidate. `None` when there is
/// no text at all.
pub fn response_text(body: &[u8]) -> Result<Option<String>, InferenceError> {
    let response: GenerateContentResponse =
        serde_json::from_slice(body).map_err(|e| InferenceError::Parse(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    Ok((!text.is_empty()).then_some(text))
}

/// Decode a nutrition analysis. Empty model output reads as `{}`.
pub fn parse_nutrition(text: Option<&str>) -> Result<NutritionAnalysis, InferenceError> {
    let text = text.filter(|t| !t.trim().is_empty()).unwrap_or("{}");
    serde_json::from_str(text).map_err(|e| InferenceError::Parse(e.to_string()))
}

// ===== Credential Resolution =====

struct CredentialResolver {
    configured: Option<String>,
    fallback: Option<Arc<dyn ApiKeySource>>,
    cached: Mutex<Option<String>>,
}

impl CredentialResolver {
    async fn resolve(&self) -> Result<String, InferenceError> {
        let cached = self.cached.lock().clone();
        if let Some(key) = cached {
            return Ok(key);
        }

        let (key, source) = match &self.configured {
            Some(key) => (Some(key.clone()), "config"),
            None => match &self.fallback {
                Some(fallback) => (fallback.api_key().await, "store"),
                None => (None, "none"),
            },
        };

        match key.filter(|k| !k.is_empty()) {
            Some(key) => {
                tracing::info!(source, "inference credential resolved");
                *self.cached.lock() = Some(key.clone());
                Ok(key)
            }
            None => {
                tracing::warn!("no inference credential configured or stored");
                Err(InferenceError::MissingCredential)
            }
        }
    }
}

// ===== Handler =====

/// Production [`InferenceEffects`] backed by the Gemini REST API.
pub struct GeminiInferenceHandler {
    client: reqwest::Client,
    config: InferenceConfig,
    credential: CredentialResolver,
}

impl GeminiInferenceHandler {
    /// Create a handler. `config.api_key` takes precedence over `fallback`.
    pub fn new(config: InferenceConfig, fallback: Option<Arc<dyn ApiKeySource>>) -> Self {
        let credential = CredentialResolver {
            configured: config.api_key.clone(),
            fallback,
            cached: Mutex::new(None),
        };
        Self {
            client: reqwest::Client::new(),
            config,
            credential,
        }
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<Option<String>, InferenceError> {
        let api_key = self.credential.resolve().await?;
        let url = generate_content_url(&self.config.endpoint, model);

        tracing::debug!(model, "sending generateContent request");
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(model, status = status.as_u16(), "inference request rejected");
            return Err(InferenceError::Status {
                code: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        response_text(&body)
    }
}

impl std::fmt::Debug for GeminiInferenceHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiInferenceHandler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InferenceEffects for GeminiInferenceHandler {
    async fn diagnose(
        &self,
        media: Option<&MediaPart>,
        symptom_text: &str,
    ) -> Result<String, InferenceError> {
        let prompt = diagnosis_prompt(media.is_some(), symptom_text);
        let request = GenerateContentRequest::new(media, &prompt);
        self.generate(&self.config.diagnosis_model, &request)
            .await?
            .ok_or(InferenceError::EmptyResponse)
    }

    async fn analyze_nutrition(
        &self,
        media: &MediaPart,
    ) -> Result<NutritionAnalysis, InferenceError> {
        let request = GenerateContentRequest::new(Some(media), NUTRITION_PROMPT)
            .with_json_schema(nutrition_response_schema());
        let text = self.generate(&self.config.nutrition_model, &request).await?;
        parse_nutrition(text.as_deref())
    }

    async fn recommend_medicine(&self, symptom_text: &str) -> Result<String, InferenceError> {
        let request = GenerateContentRequest::new(None, &medicine_prompt(symptom_text));
        self.generate(&self.config.medicine_model, &request)
            .await?
            .ok_or(InferenceError::EmptyResponse)
    }
}
