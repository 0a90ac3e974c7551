//! Scripted inference handler for testing

use aidoc_core::effects::{InferenceEffects, InferenceError};
use aidoc_core::inference::Macros;
use aidoc_core::{MediaPart, NutritionAnalysis};
use async_trait::async_trait;
use parking_lot::Mutex;

/// A recorded call to [`MockInferenceHandler`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceCall {
    /// `diagnose`
    Diagnose {
        /// MIME type of attached media, if any
        media_type: Option<String>,
        /// Symptom text as sent
        symptom_text: String,
    },
    /// `analyze_nutrition`
    AnalyzeNutrition {
        /// MIME type of the meal photo
        media_type: String,
    },
    /// `recommend_medicine`
    RecommendMedicine {
        /// Symptom text as sent
        symptom_text: String,
    },
}

#[derive(Debug)]
struct Script {
    diagnosis: String,
    nutrition: NutritionAnalysis,
    medicine: String,
    failure: Option<InferenceError>,
}

/// [`InferenceEffects`] that replays canned replies and logs every call.
#[derive(Debug)]
pub struct MockInferenceHandler {
    script: Mutex<Script>,
    calls: Mutex<Vec<InferenceCall>>,
}

impl MockInferenceHandler {
    /// Handler with plausible default replies
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script {
                diagnosis: "## Possible Condition\nCommon cold\n\n## Analysis\nMild symptoms.\n\n\
                            ## Recommended Actions\nRest and fluids.\n\n## Disclaimer\n\
                            This is an AI analysis and not a professional medical diagnosis. \
                            Please consult a doctor."
                    .to_string(),
                nutrition: NutritionAnalysis {
                    food_name: "Greek Salad".to_string(),
                    calories: "320 kcal".to_string(),
                    macros: Macros {
                        protein: "9g".to_string(),
                        carbs: "14g".to_string(),
                        fats: "26g".to_string(),
                    },
                    health_score: Some(8.0),
                    recipe: "Chop, toss with olive oil, serve.".to_string(),
                },
                medicine: "Paracetamol 500mg. Consult a doctor if symptoms persist.".to_string(),
                failure: None,
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply to `diagnose` with `text`
    pub fn with_diagnosis(self, text: impl Into<String>) -> Self {
        self.script.lock().diagnosis = text.into();
        self
    }

    /// Reply to `analyze_nutrition` with `analysis`
    pub fn with_nutrition(self, analysis: NutritionAnalysis) -> Self {
        self.script.lock().nutrition = analysis;
        self
    }

    /// Reply to `recommend_medicine` with `text`
    pub fn with_medicine(self, text: impl Into<String>) -> Self {
        self.script.lock().medicine = text.into();
        self
    }

    /// Fail every call with `error` (or stop failing with `None`).
    pub fn set_failure(&self, error: Option<InferenceError>) {
        self.script.lock().failure = error;
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<InferenceCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: InferenceCall) -> Result<(), InferenceError> {
        self.calls.lock().push(call);
        match &self.script.lock().failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockInferenceHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceEffects for MockInferenceHandler {
    async fn diagnose(
        &self,
        media: Option<&MediaPart>,
        symptom_text: &str,
    ) -> Result<String, InferenceError> {
        self.record(InferenceCall::Diagnose {
            media_type: media.map(|m| m.mime_type.clone()),
            symptom_text: symptom_text.to_string(),
        })?;
        Ok(self.script.lock().diagnosis.clone())
    }

    async fn analyze_nutrition(
        &self,
        media: &MediaPart,
    ) -> Result<NutritionAnalysis, InferenceError> {
        self.record(InferenceCall::AnalyzeNutrition {
            media_type: media.mime_type.clone(),
        })?;
        Ok(self.script.lock().nutrition.clone())
    }

    async fn recommend_medicine(&self, symptom_text: &str) -> Result<String, InferenceError> {
        self.record(InferenceCall::RecommendMedicine {
            symptom_text: symptom_text.to_string(),
        })?;
        Ok(self.script.lock().medicine.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failure_is_still_logged() {
        let mock = MockInferenceHandler::new();
        mock.set_failure(Some(InferenceError::MissingCredential));

        let err = mock.recommend_medicine("fever").await.unwrap_err();
        assert_eq!(err, InferenceError::MissingCredential);
        assert_eq!(
            mock.calls(),
            vec![InferenceCall::RecommendMedicine {
                symptom_text: "fever".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn scripted_reply() {
        let mock = MockInferenceHandler::new().with_diagnosis("## Possible Condition\nFlu");
        let media = MediaPart::new("image/jpeg", vec![0xff]);
        assert!(mock.diagnose(Some(&media), "").await.unwrap().ends_with("Flu"));
        assert!(matches!(
            &mock.calls()[0],
            InferenceCall::Diagnose { media_type: Some(t), .. } if t == "image/jpeg"
        ));
    }
}
