use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;

use crate::models::{
    CandidatePage, Gender, MatchCriteria, PageRequest, Preference, Profile, Purpose, ShareToken,
};
use crate::services::store::{ProfileStore, ShareStore, StoreError};

const PROFILE_COLUMNS: &str = "user_id, name, email, mobile, mobile_verified, gender, birth_date, \
    height_cm, weight_kg, complexion, physical_status, caste, subcaste, community, \
    marital_status, family_type, family_status, employed_in, education, occupation, location, \
    bio, photos, purpose, is_profile_complete, pref_min_age, pref_max_age, pref_min_height, \
    pref_max_height, pref_marital_status, pref_education, pref_occupation, pref_location, \
    pref_caste, created_at, updated_at";

const SHARE_COLUMNS: &str =
    "user_id, token, expires_at, view_count, renewal_count, last_renewed_at, created_at";

/// PostgreSQL backed store for profiles and share tokens
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

/// Escape `%`, `_` and `\` so user input is matched literally inside LIKE
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Append the WHERE clause for a candidate search.
///
/// Shared by the count and page queries so both always see the same rows.
fn push_candidate_predicates(qb: &mut QueryBuilder<'_, Postgres>, criteria: &MatchCriteria) {
    qb.push(" WHERE is_profile_complete = TRUE AND user_id <> ");
    qb.push_bind(criteria.requester_id.clone());
    qb.push(" AND gender = ");
    qb.push_bind(criteria.gender.as_str());

    if let Some(mode) = criteria.mode {
        qb.push(" AND purpose IN (");
        qb.push_bind(mode.as_purpose().as_str());
        qb.push(", 'Both')");
    }

    if let Some(earliest) = criteria.birth_dates.earliest {
        qb.push(" AND birth_date >= ").push_bind(earliest);
    }
    if let Some(latest) = criteria.birth_dates.latest {
        qb.push(" AND birth_date <= ").push_bind(latest);
    }

    for (column, bounds) in [("height_cm", criteria.height), ("weight_kg", criteria.weight)] {
        if let Some(min) = bounds.min {
            qb.push(format!(" AND {} >= ", column)).push_bind(min);
        }
        if let Some(max) = bounds.max {
            qb.push(format!(" AND {} <= ", column)).push_bind(max);
        }
    }

    let categorical = [
        ("caste", &criteria.caste),
        ("community", &criteria.community),
        ("marital_status", &criteria.marital_status),
        ("complexion", &criteria.complexion),
        ("physical_status", &criteria.physical_status),
        ("family_type", &criteria.family_type),
        ("family_status", &criteria.family_status),
        ("employed_in", &criteria.employed_in),
    ];
    for (column, value) in categorical {
        if let Some(value) = value {
            qb.push(format!(" AND {} = ", column)).push_bind(value.clone());
        }
    }

    match criteria.has_photos {
        Some(true) => {
            qb.push(" AND cardinality(photos) > 0");
        }
        Some(false) => {
            qb.push(" AND cardinality(photos) = 0");
        }
        None => {}
    }

    if let Some(location) = &criteria.location {
        qb.push(" AND location ILIKE ")
            .push_bind(format!("%{}%", escape_like(location)))
            .push(" ESCAPE '\\'");
    }
}

/// `SELECT COUNT(*)` over all candidates matching `criteria`
pub fn build_count_query(criteria: &MatchCriteria) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM profiles");
    push_candidate_predicates(&mut qb, criteria);
    qb
}

/// One page of candidates, newest first with `user_id` as the tie-break
pub fn build_page_query(
    criteria: &MatchCriteria,
    page: PageRequest,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM profiles", PROFILE_COLUMNS));
    push_candidate_predicates(&mut qb, criteria);
    qb.push(" ORDER BY created_at DESC, user_id DESC LIMIT ")
        .push_bind(i64::from(page.limit))
        .push(" OFFSET ")
        .push_bind(page.offset());
    qb
}

fn profile_from_row(row: &PgRow) -> Result<Profile, StoreError> {
    let gender = row
        .try_get::<Option<String>, _>("gender")?
        .map(|g| Gender::parse(&g).ok_or_else(|| StoreError::Decode(format!("gender {:?}", g))))
        .transpose()?;
    let purpose: String = row.try_get("purpose")?;
    let purpose = Purpose::parse(&purpose)
        .ok_or_else(|| StoreError::Decode(format!("purpose {:?}", purpose)))?;

    Ok(Profile {
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        mobile: row.try_get("mobile")?,
        mobile_verified: row.try_get("mobile_verified")?,
        gender,
        birth_date: row.try_get("birth_date")?,
        height_cm: row.try_get("height_cm")?,
        weight_kg: row.try_get("weight_kg")?,
        complexion: row.try_get("complexion")?,
        physical_status: row.try_get("physical_status")?,
        caste: row.try_get("caste")?,
        subcaste: row.try_get("subcaste")?,
        community: row.try_get("community")?,
        marital_status: row.try_get("marital_status")?,
        family_type: row.try_get("family_type")?,
        family_status: row.try_get("family_status")?,
        employed_in: row.try_get("employed_in")?,
        education: row.try_get("education")?,
        occupation: row.try_get("occupation")?,
        location: row.try_get("location")?,
        bio: row.try_get("bio")?,
        photos: row.try_get("photos")?,
        purpose,
        is_profile_complete: row.try_get("is_profile_complete")?,
        preference: preference_from_row(row)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn preference_from_row(row: &PgRow) -> Result<Preference, StoreError> {
    Ok(Preference {
        min_age: row.try_get("pref_min_age")?,
        max_age: row.try_get("pref_max_age")?,
        min_height: row.try_get("pref_min_height")?,
        max_height: row.try_get("pref_max_height")?,
        marital_status: row.try_get("pref_marital_status")?,
        education: row.try_get("pref_education")?,
        occupation: row.try_get("pref_occupation")?,
        location: row.try_get("pref_location")?,
        caste: row.try_get("pref_caste")?,
    })
}

fn share_from_row(row: &PgRow) -> Result<ShareToken, StoreError> {
    Ok(ShareToken {
        user_id: row.try_get("user_id")?,
        token: row.try_get("token")?,
        expires_at: row.try_get("expires_at")?,
        view_count: row.try_get("view_count")?,
        renewal_count: row.try_get("renewal_count")?,
        last_renewed_at: row.try_get("last_renewed_at")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ProfileStore for PostgresClient {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn find_candidates(
        &self,
        criteria: &MatchCriteria,
        page: PageRequest,
    ) -> Result<CandidatePage, StoreError> {
        let mut count_query = build_count_query(criteria);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query = build_page_query(criteria, page);
        tracing::debug!("Candidate query: {}", page_query.sql());

        let rows = page_query.build().fetch_all(&self.pool).await?;
        let profiles = rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CandidatePage { profiles, total })
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        preference: &Preference,
    ) -> Result<Option<Preference>, StoreError> {
        let query = r#"
            UPDATE profiles SET
                pref_min_age = $2,
                pref_max_age = $3,
                pref_min_height = $4,
                pref_max_height = $5,
                pref_marital_status = $6,
                pref_education = $7,
                pref_occupation = $8,
                pref_location = $9,
                pref_caste = $10,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING pref_min_age, pref_max_age, pref_min_height, pref_max_height,
                pref_marital_status, pref_education, pref_occupation, pref_location, pref_caste
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(preference.min_age)
            .bind(preference.max_age)
            .bind(preference.min_height)
            .bind(preference.max_height)
            .bind(&preference.marital_status)
            .bind(&preference.education)
            .bind(&preference.occupation)
            .bind(&preference.location)
            .bind(&preference.caste)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(preference_from_row).transpose()
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ShareStore for PostgresClient {
    async fn get_share(&self, user_id: &str) -> Result<Option<ShareToken>, StoreError> {
        let query = format!("SELECT {} FROM profile_shares WHERE user_id = $1", SHARE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(share_from_row).transpose()
    }

    async fn find_share(&self, user_id: &str, token: &str) -> Result<Option<ShareToken>, StoreError> {
        let query = format!(
            "SELECT {} FROM profile_shares WHERE user_id = $1 AND token = $2",
            SHARE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(share_from_row).transpose()
    }

    /// Uses INSERT ... ON CONFLICT so lookup, creation and lazy renewal
    /// happen in one statement. The SET expressions read the old row.
    async fn upsert_share(
        &self,
        user_id: &str,
        new_token: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<ShareToken, StoreError> {
        let query = format!(
            r#"
            INSERT INTO profile_shares (user_id, token, expires_at, view_count, renewal_count, created_at)
            VALUES ($1, $2, $3, 0, 0, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                expires_at = CASE WHEN profile_shares.expires_at <= $4
                    THEN EXCLUDED.expires_at ELSE profile_shares.expires_at END,
                renewal_count = CASE WHEN profile_shares.expires_at <= $4
                    THEN profile_shares.renewal_count + 1 ELSE profile_shares.renewal_count END,
                last_renewed_at = CASE WHEN profile_shares.expires_at <= $4
                    THEN $4 ELSE profile_shares.last_renewed_at END
            RETURNING {}
            "#,
            SHARE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(new_token)
            .bind(expires_at)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        share_from_row(&row)
    }

    async fn renew_share(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<ShareToken>, StoreError> {
        let query = format!(
            r#"
            UPDATE profile_shares SET
                expires_at = $3,
                renewal_count = renewal_count + 1,
                last_renewed_at = $4
            WHERE user_id = $1 AND token = $2
            RETURNING {}
            "#,
            SHARE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(share_from_row).transpose()
    }

    async fn record_view(
        &self,
        user_id: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShareToken>, StoreError> {
        let query = format!(
            r#"
            UPDATE profile_shares SET view_count = view_count + 1
            WHERE user_id = $1 AND token = $2 AND expires_at > $3
            RETURNING {}
            "#,
            SHARE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(share_from_row).transpose()
    }
}
