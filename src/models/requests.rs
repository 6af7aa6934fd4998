use serde::{Deserialize, Serialize};
use validator::Validate;

/// `{min, max}` pair as sent by the search form
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RangeInput {
    #[serde(default)]
    pub min: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
}

/// Request to search for matches
///
/// Categorical fields, `mode` and `hasPhotos` accept the string `"none"` to
/// mean "no constraint".
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchesRequest {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page: Option<u32>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub age_range: Option<RangeInput>,
    #[serde(default)]
    pub height_range: Option<RangeInput>,
    #[serde(default)]
    pub weight_range: Option<RangeInput>,
    #[serde(default)]
    pub caste: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub complexion: Option<String>,
    #[serde(default)]
    pub physical_status: Option<String>,
    #[serde(default)]
    pub family_type: Option<String>,
    #[serde(default)]
    pub family_status: Option<String>,
    #[serde(default)]
    pub employed_in: Option<String>,
    #[serde(default)]
    pub has_photos: Option<String>,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub location: Option<String>,
}

/// Request to save partner preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    #[validate(range(min = 18, max = 100))]
    #[serde(default)]
    pub min_age: Option<i32>,
    #[validate(range(min = 18, max = 100))]
    #[serde(default)]
    pub max_age: Option<i32>,
    #[validate(range(min = 50, max = 300))]
    #[serde(default)]
    pub min_height: Option<i32>,
    #[validate(range(min = 50, max = 300))]
    #[serde(default)]
    pub max_height: Option<i32>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub caste: Option<String>,
}
