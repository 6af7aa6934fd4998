use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::core::filters::matches_criteria;
use crate::models::{CandidatePage, MatchCriteria, PageRequest, Preference, Profile, ShareToken};
use crate::services::store::{ProfileStore, ShareStore, StoreError};

#[derive(Default)]
struct MemoryState {
    profiles: HashMap<String, Profile>,
    // keyed by owner user id
    shares: HashMap<String, ShareToken>,
}

/// In-process store with the same atomicity as the PostgreSQL one.
///
/// Every operation holds a single lock for its whole read-modify-write, which
/// stands in for the conditional single-statement updates used in SQL.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_profile(&self, profile: Profile) {
        let mut state = self.state.lock().await;
        state.profiles.insert(profile.user_id.clone(), profile);
    }

    /// Move a share's expiry, e.g. to simulate the passage of time
    pub async fn set_share_expiry(&self, user_id: &str, expires_at: DateTime<Utc>) -> bool {
        let mut state = self.state.lock().await;
        match state.shares.get_mut(user_id) {
            Some(share) => {
                share.expires_at = expires_at;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.profiles.get(user_id).cloned())
    }

    async fn find_candidates(
        &self,
        criteria: &MatchCriteria,
        page: PageRequest,
    ) -> Result<CandidatePage, StoreError> {
        let state = self.state.lock().await;

        let mut candidates: Vec<&Profile> = state
            .profiles
            .values()
            .filter(|profile| matches_criteria(profile, criteria))
            .collect();

        candidates.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.user_id.cmp(&a.user_id))
        });

        let total = candidates.len() as i64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let profiles = candidates
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(CandidatePage { profiles, total })
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        preference: &Preference,
    ) -> Result<Option<Preference>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.profiles.get_mut(user_id).map(|profile| {
            profile.preference = preference.clone();
            profile.updated_at = Utc::now();
            profile.preference.clone()
        }))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn get_share(&self, user_id: &str) -> Result<Option<ShareToken>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.shares.get(user_id).cloned())
    }

    async fn find_share(&self, user_id: &str, token: &str) -> Result<Option<ShareToken>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .shares
            .get(user_id)
            .filter(|share| share.token == token)
            .cloned())
    }

    async fn upsert_share(
        &self,
        user_id: &str,
        new_token: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<ShareToken, StoreError> {
        let mut state = self.state.lock().await;
        let share = state
            .shares
            .entry(user_id.to_string())
            .or_insert_with(|| ShareToken {
                user_id: user_id.to_string(),
                token: new_token.to_string(),
                expires_at,
                view_count: 0,
                renewal_count: 0,
                last_renewed_at: None,
                created_at: now,
            });

        if share.is_expired(now) {
            share.expires_at = expires_at;
            share.renewal_count += 1;
            share.last_renewed_at = Some(now);
        }

        Ok(share.clone())
    }

    async fn renew_share(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<ShareToken>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state
            .shares
            .get_mut(user_id)
            .filter(|share| share.token == token)
            .map(|share| {
                share.expires_at = expires_at;
                share.renewal_count += 1;
                share.last_renewed_at = Some(now);
                share.clone()
            }))
    }

    async fn record_view(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShareToken>, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state
            .shares
            .get_mut(user_id)
            .filter(|share| share.token == token && !share.is_expired(now))
            .map(|share| {
                share.view_count += 1;
                share.clone()
            }))
    }
}
