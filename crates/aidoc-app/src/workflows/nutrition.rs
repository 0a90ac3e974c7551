//! Meal photo analysis.

use aidoc_core::{MediaPart, NutritionAnalysis, NutritionResult};

use super::{now, SharedApp};
use crate::errors::AppError;

/// Shown when the model call or its response fails
pub const NUTRITION_FAILED: &str = "Could not analyze food. Ensure API key is set.";

/// Analyze a meal photo and record the result.
pub async fn analyze_food(
    app_core: &SharedApp,
    photo: MediaPart,
) -> Result<NutritionAnalysis, AppError> {
    let (data, inference) = {
        let core = app_core.read().await;
        (core.data().clone(), core.inference())
    };

    let analysis = inference
        .analyze_nutrition(&photo)
        .await
        .map_err(|e| AppError::inference(NUTRITION_FAILED, e))?;

    // Three string fields; encoding cannot fail.
    let macros = serde_json::to_string(&analysis.macros).unwrap_or_else(|_| "{}".to_string());
    let stamp = now(app_core).await?;
    data.save_nutrition(NutritionResult {
        id: stamp.id_string(),
        date: stamp.locale_date_string(),
        food_item: analysis.food_name.clone(),
        calories: analysis.calories.clone(),
        macros,
        recipe: analysis.recipe.clone(),
    })
    .await?;

    tracing::info!(food = %analysis.food_name, "nutrition analysis saved");
    Ok(analysis)
}

/// Past analyses, newest first
pub async fn history(app_core: &SharedApp) -> Result<Vec<NutritionResult>, AppError> {
    let data = app_core.read().await.data().clone();
    Ok(data.nutrition_history().await?)
}
