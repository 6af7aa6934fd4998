use serde::{Deserialize, Serialize};
use crate::models::domain::{PublicProfile, ShareToken};

/// Pagination block of a match response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: u32, page_size: u32) -> Self {
        let size = i64::from(page_size);
        let total_pages = if total <= 0 || size == 0 {
            0
        } else {
            (total + size - 1) / size
        };

        Self {
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// Response for the match search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub profiles: Vec<PublicProfile>,
    pub pagination: Pagination,
}

/// Share link details returned to the owner and to viewers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareInfo {
    #[serde(flatten)]
    pub share: ShareToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

/// Response for the public share view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedProfileResponse {
    pub profile: PublicProfile,
    pub share_info: ShareInfo,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
