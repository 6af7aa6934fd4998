use chrono::{NaiveDate, Utc};
use validator::Validate;

use crate::core::filters::build_criteria;
use crate::error::ApiError;
use crate::models::{MatchesRequest, MatchesResponse, PageRequest, Pagination, PublicProfile};
use crate::services::ProfileStore;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Partner search over a profile store
///
/// # Pipeline
/// 1. Validate pagination
/// 2. Resolve the requester and derive the opposite gender
/// 3. Normalize filters into a candidate query
/// 4. Fetch one page plus the total count
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    default_limit: u32,
    max_limit: u32,
}

impl Matcher {
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }

    /// Resolve page/limit defaults; oversized pages are rejected, not clamped
    pub fn page_request(&self, request: &MatchesRequest) -> Result<PageRequest, ApiError> {
        let page = request.page.unwrap_or(1);
        let limit = request.limit.unwrap_or(self.default_limit);

        if page == 0 {
            return Err(ApiError::Validation("page must be at least 1".to_string()));
        }
        if limit == 0 || limit > self.max_limit {
            return Err(ApiError::Validation(format!(
                "limit must be between 1 and {}",
                self.max_limit
            )));
        }

        Ok(PageRequest { page, limit })
    }

    /// Find matches for `requester_id`
    pub async fn find_matches(
        &self,
        store: &dyn ProfileStore,
        requester_id: &str,
        request: &MatchesRequest,
    ) -> Result<MatchesResponse, ApiError> {
        self.find_matches_on(store, requester_id, request, Utc::now().date_naive())
            .await
    }

    /// Same as [`Matcher::find_matches`] with ages computed relative to `today`
    pub async fn find_matches_on(
        &self,
        store: &dyn ProfileStore,
        requester_id: &str,
        request: &MatchesRequest,
        today: NaiveDate,
    ) -> Result<MatchesResponse, ApiError> {
        if requester_id.is_empty() {
            return Err(ApiError::Unauthorized("Authentication required".to_string()));
        }

        request.validate()?;
        let page = self.page_request(request)?;

        let requester = store
            .get_profile(requester_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", requester_id)))?;

        let criteria = build_criteria(&requester, request, today)?;
        tracing::debug!("Match criteria for {}: {:?}", requester_id, criteria);

        let result = store.find_candidates(&criteria, page).await?;

        let profiles = result
            .profiles
            .iter()
            .map(|profile| PublicProfile::from_profile(profile, today))
            .collect();

        Ok(MatchesResponse {
            profiles,
            pagination: Pagination::new(result.total, page.page, page.limit),
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, MAX_LIMIT)
    }
}
