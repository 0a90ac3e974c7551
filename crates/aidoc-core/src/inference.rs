//! Inference request/response types and prompt builders
//!
//! Prompts are pure functions so every `InferenceEffects` handler (remote or
//! scripted) sends the same instructions.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Binary media attached to a request (image, audio or video).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPart {
    /// MIME type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl MediaPart {
    /// Wrap raw bytes
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Base64 payload without a data-URL prefix
    pub fn base64_data(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:<mime>;base64,<payload>` preview string stored with diagnoses
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data())
    }
}

/// Macro breakdown returned by nutrition analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macros {
    /// Protein estimate
    pub protein: String,
    /// Carbohydrate estimate
    pub carbs: String,
    /// Fat estimate
    pub fats: String,
}

/// Schema-constrained nutrition analysis result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionAnalysis {
    /// Identified food
    pub food_name: String,
    /// Calorie estimate
    pub calories: String,
    /// Macro breakdown
    pub macros: Macros,
    /// Model-assigned health score
    pub health_score: Option<f64>,
    /// Healthy recipe suggestion
    pub recipe: String,
}

/// Section headings every diagnosis report is asked to contain, in order.
pub const DIAGNOSIS_SECTIONS: [&str; 4] = [
    "Possible Condition",
    "Analysis",
    "Recommended Actions",
    "Disclaimer",
];

/// Instruction sent with every nutrition request.
pub const NUTRITION_PROMPT: &str =
    "Identify this food, estimate calories and macros, and suggest a healthy recipe.";

/// Build the diagnosis prompt. Media, when present, is attached separately.
pub fn diagnosis_prompt(has_media: bool, symptom_text: &str) -> String {
    let focus = if has_media {
        "Analyze this image/audio/video carefully."
    } else {
        "Analyze the described symptoms carefully."
    };
    format!(
        "You are an expert AI medical assistant.\n\
         {focus}\n\
         The user has provided this additional context: \"{symptom_text}\".\n\
         \n\
         Please provide a response in the following Markdown format:\n\
         ## {condition}\n\
         [Name of possible condition or 'Unable to diagnose' if unclear]\n\
         \n\
         ## {analysis}\n\
         [Brief explanation of why]\n\
         \n\
         ## {actions}\n\
         [List of immediate steps, e.g., 'See a doctor', 'Apply ice', etc.]\n\
         \n\
         ## {disclaimer}\n\
         This is an AI analysis and not a professional medical diagnosis. Please consult a doctor.\n",
        condition = DIAGNOSIS_SECTIONS[0],
        analysis = DIAGNOSIS_SECTIONS[1],
        actions = DIAGNOSIS_SECTIONS[2],
        disclaimer = DIAGNOSIS_SECTIONS[3],
    )
}

/// Build the OTC medicine prompt. The consult-a-doctor warning is part of the
/// instructions; responses are not validated for it.
pub fn medicine_prompt(symptom_text: &str) -> String {
    format!(
        "User has these symptoms: {symptom_text}.\n\
         Recommend over-the-counter medicines.\n\
         Keep it brief. Warning: Always advise consulting a doctor.\n"
    )
}

/// JSON response schema for nutrition analysis.
pub fn nutrition_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "foodName": { "type": "STRING" },
            "calories": { "type": "STRING" },
            "macros": {
                "type": "OBJECT",
                "properties": {
                    "protein": { "type": "STRING" },
                    "carbs": { "type": "STRING" },
                    "fats": { "type": "STRING" }
                }
            },
            "healthScore": { "type": "NUMBER" },
            "recipe": { "type": "STRING" }
        }
    })
}
