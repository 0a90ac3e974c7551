//! Inference history records

use serde::{Deserialize, Serialize};

/// A saved AI diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    /// Record id (capture timestamp)
    pub id: String,
    /// Owning user, absent when nobody was logged in at capture time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Locale date string of capture
    pub date: String,
    /// Symptom text as entered
    pub symptoms: String,
    /// Raw report returned by the model
    pub ai_analysis: String,
    /// Attached media preview
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl DiagnosisResult {
    /// True only for an exact owner match; unowned records belong to nobody.
    pub fn belongs_to(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

/// A saved nutrition analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionResult {
    /// Record id (capture timestamp)
    pub id: String,
    /// Locale date string of capture
    pub date: String,
    /// Identified food
    pub food_item: String,
    /// Calorie estimate as reported
    pub calories: String,
    /// JSON-encoded macro breakdown
    pub macros: String,
    /// Suggested recipe
    pub recipe: String,
}
