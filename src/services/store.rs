use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{CandidatePage, MatchCriteria, PageRequest, Preference, Profile, ShareToken};

/// Errors that can occur in a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt row: {0}")]
    Decode(String),
}

/// Profile and preference persistence
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Page of candidates matching `criteria`, newest first, plus the total count
    async fn find_candidates(
        &self,
        criteria: &MatchCriteria,
        page: PageRequest,
    ) -> Result<CandidatePage, StoreError>;

    /// Overwrite the stored preferences; `None` when the profile does not exist
    async fn update_preferences(
        &self,
        user_id: &str,
        preference: &Preference,
    ) -> Result<Option<Preference>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Share token persistence.
///
/// Every mutating method is a single atomic step on the backend so that
/// concurrent callers never lose an increment or observe a half-renewed row.
#[async_trait]
pub trait ShareStore: Send + Sync {
    async fn get_share(&self, user_id: &str) -> Result<Option<ShareToken>, StoreError>;

    /// Row matching both owner and token, regardless of expiry
    async fn find_share(&self, user_id: &str, token: &str) -> Result<Option<ShareToken>, StoreError>;

    /// Insert a row with `new_token`, or return the existing one. An existing
    /// row that is expired at `now` is renewed in place to `expires_at`.
    async fn upsert_share(
        &self,
        user_id: &str,
        new_token: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<ShareToken, StoreError>;

    /// Extend expiry and bump the renewal counter; `None` when no row matches
    async fn renew_share(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<ShareToken>, StoreError>;

    /// Increment the view counter of an unexpired row; `None` when missing or expired
    async fn record_view(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShareToken>, StoreError>;
}
