use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::error::{ApiError, ShareMiss};
use crate::models::{PublicProfile, ShareInfo, ShareToken, SharedProfileResponse};
use crate::services::{ProfileStore, ShareStore};

pub const DEFAULT_TTL_DAYS: i64 = 30;

/// Issues and serves time-limited profile share links.
///
/// A share row moves between two states: active while `expires_at > now` and
/// expired afterwards. Renewal, explicit or lazy through
/// [`ShareManager::create_or_get_share`], makes it active again and keeps the
/// token string. Expiry is only ever a timestamp comparison; rows are not
/// deleted.
#[derive(Debug, Clone)]
pub struct ShareManager {
    ttl: Duration,
    public_base_url: Option<String>,
}

/// New opaque token: 32 hex chars from a random v4 UUID
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

impl ShareManager {
    pub fn new(ttl_days: i64, public_base_url: Option<String>) -> Self {
        Self {
            ttl: Duration::days(ttl_days.max(1)),
            public_base_url: public_base_url.filter(|url| !url.trim().is_empty()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn info(&self, share: ShareToken) -> ShareInfo {
        let share_url = self.public_base_url.as_ref().map(|base| {
            format!("{}/{}/{}", base.trim_end_matches('/'), share.user_id, share.token)
        });
        ShareInfo { share, share_url }
    }

    fn require_identity(user_id: &str) -> Result<(), ApiError> {
        if user_id.is_empty() {
            return Err(ApiError::Unauthorized("Authentication required".to_string()));
        }
        Ok(())
    }

    /// Current share row of `owner_id`, expired or not. No side effects.
    pub async fn get_active_share(
        &self,
        shares: &dyn ShareStore,
        owner_id: &str,
    ) -> Result<Option<ShareInfo>, ApiError> {
        Self::require_identity(owner_id)?;
        Ok(shares.get_share(owner_id).await?.map(|share| self.info(share)))
    }

    /// Return the owner's share link, creating it on first use and renewing
    /// it in place when it has expired. Repeated calls while the link is
    /// active return it unchanged.
    pub async fn create_or_get_share(
        &self,
        profiles: &dyn ProfileStore,
        shares: &dyn ShareStore,
        owner_id: &str,
    ) -> Result<ShareInfo, ApiError> {
        Self::require_identity(owner_id)?;

        if profiles.get_profile(owner_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("Profile {} not found", owner_id)));
        }

        let now = Utc::now();
        let share = shares
            .upsert_share(owner_id, &generate_token(), now, now + self.ttl)
            .await?;

        if share.is_expired(now) {
            return Err(ApiError::Internal(format!(
                "share for {} still expired after upsert",
                owner_id
            )));
        }

        tracing::info!(
            "Share link for {} expires at {} (renewals: {})",
            owner_id,
            share.expires_at,
            share.renewal_count
        );

        Ok(self.info(share))
    }

    /// Explicit renewal by the owner. Works for expired and active links.
    pub async fn renew(
        &self,
        shares: &dyn ShareStore,
        owner_id: &str,
        token: &str,
        requesting_user_id: &str,
    ) -> Result<ShareInfo, ApiError> {
        Self::require_identity(requesting_user_id)?;

        // Holding the token does not prove ownership
        if requesting_user_id != owner_id {
            tracing::warn!(
                "User {} attempted to renew the share link of {}",
                requesting_user_id,
                owner_id
            );
            return Err(ApiError::Unauthorized(
                "Only the profile owner can renew this link".to_string(),
            ));
        }

        let now = Utc::now();
        let share = shares
            .renew_share(owner_id, token, now, now + self.ttl)
            .await?
            .ok_or_else(|| ApiError::NotFound("Share link not found".to_string()))?;

        tracing::info!(
            "Renewed share link for {} until {} (renewals: {})",
            owner_id,
            share.expires_at,
            share.renewal_count
        );

        Ok(self.info(share))
    }

    /// Public read path. Counts the view and returns the owner's public
    /// profile; the token itself is the capability.
    pub async fn view_shared(
        &self,
        profiles: &dyn ProfileStore,
        shares: &dyn ShareStore,
        owner_id: &str,
        token: &str,
    ) -> Result<SharedProfileResponse, ApiError> {
        let now = Utc::now();

        let share = match shares.record_view(owner_id, token, now).await? {
            Some(share) => share,
            None => {
                // Best effort: a renewal landing between the two reads reports Expired
                let miss = match shares.find_share(owner_id, token).await? {
                    Some(_) => ShareMiss::Expired,
                    None => ShareMiss::Missing,
                };
                tracing::info!("Share view for {} rejected: {:?}", owner_id, miss);
                return Err(ApiError::NotFoundOrExpired(miss));
            }
        };

        // The view is already counted; a vanished owner is a server-side inconsistency
        let owner = profiles.get_profile(owner_id).await?.ok_or_else(|| {
            ApiError::Internal(format!("share {} has no owner profile", owner_id))
        })?;

        tracing::debug!("Share link of {} viewed ({} views)", owner_id, share.view_count);

        Ok(SharedProfileResponse {
            profile: PublicProfile::from_profile(&owner, now.date_naive()),
            share_info: self.info(share),
        })
    }
}

impl Default for ShareManager {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_DAYS, None)
    }
}
