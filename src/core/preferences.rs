use validator::Validate;

use crate::core::filters::constraint;
use crate::error::ApiError;
use crate::models::{Preference, UpdatePreferencesRequest};
use crate::services::ProfileStore;

fn check_order(field: &str, min: Option<i32>, max: Option<i32>) -> Result<(), ApiError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ApiError::Validation(format!(
            "min{} must not be greater than max{}",
            field, field
        ))),
        _ => Ok(()),
    }
}

/// Validate a preferences form and normalize `"none"` answers to absence
pub fn normalize_preferences(request: &UpdatePreferencesRequest) -> Result<Preference, ApiError> {
    request.validate()?;
    check_order("Age", request.min_age, request.max_age)?;
    check_order("Height", request.min_height, request.max_height)?;

    Ok(Preference {
        min_age: request.min_age,
        max_age: request.max_age,
        min_height: request.min_height,
        max_height: request.max_height,
        marital_status: constraint(&request.marital_status),
        education: constraint(&request.education),
        occupation: constraint(&request.occupation),
        location: constraint(&request.location),
        caste: constraint(&request.caste),
    })
}

/// Stored preferences of `user_id`
pub async fn get_preferences(
    store: &dyn ProfileStore,
    user_id: &str,
) -> Result<Preference, ApiError> {
    store
        .get_profile(user_id)
        .await?
        .map(|profile| profile.preference)
        .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", user_id)))
}

/// Replace the stored preferences of `user_id`
pub async fn save_preferences(
    store: &dyn ProfileStore,
    user_id: &str,
    request: &UpdatePreferencesRequest,
) -> Result<Preference, ApiError> {
    let preference = normalize_preferences(request)?;

    let saved = store
        .update_preferences(user_id, &preference)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", user_id)))?;

    tracing::info!("Saved partner preferences for user {}", user_id);
    Ok(saved)
}
