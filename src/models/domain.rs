use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Binary gender model used for partner opposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The gender a requester of this gender is matched against
    pub fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Why a profile is on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    Dating,
    Matrimony,
    Both,
}

impl Purpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::Dating => "Dating",
            Purpose::Matrimony => "Matrimony",
            Purpose::Both => "Both",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Dating" => Some(Purpose::Dating),
            "Matrimony" => Some(Purpose::Matrimony),
            "Both" => Some(Purpose::Both),
            _ => None,
        }
    }
}

/// Search mode requested by a match query.
///
/// A candidate satisfies a mode when its purpose is the mode itself or `Both`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    Dating,
    Matrimony,
}

impl MatchMode {
    pub fn as_purpose(self) -> Purpose {
        match self {
            MatchMode::Dating => Purpose::Dating,
            MatchMode::Matrimony => Purpose::Matrimony,
        }
    }

    pub fn accepts(self, purpose: Purpose) -> bool {
        purpose == Purpose::Both || purpose == self.as_purpose()
    }
}

/// Persisted partner preferences, embedded on the profile record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_height: Option<i32>,
    pub max_height: Option<i32>,
    pub marital_status: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub caste: Option<String>,
}

/// Full profile record as stored
#[derive(Debug, Clone)]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub mobile_verified: bool,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub complexion: Option<String>,
    pub physical_status: Option<String>,
    pub caste: Option<String>,
    pub subcaste: Option<String>,
    pub community: Option<String>,
    pub marital_status: Option<String>,
    pub family_type: Option<String>,
    pub family_status: Option<String>,
    pub employed_in: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub photos: Vec<String>,
    pub purpose: Purpose,
    pub is_profile_complete: bool,
    pub preference: Preference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Age in whole years on the given day
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        let mut years = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

/// Read-only projection of a profile that may be shown to other people.
///
/// Contact details, verification state and preferences never leave the
/// service through this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub user_id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<u32>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub complexion: Option<String>,
    pub physical_status: Option<String>,
    pub caste: Option<String>,
    pub subcaste: Option<String>,
    pub community: Option<String>,
    pub marital_status: Option<String>,
    pub family_type: Option<String>,
    pub family_status: Option<String>,
    pub employed_in: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub photos: Vec<String>,
    pub purpose: Purpose,
    pub created_at: DateTime<Utc>,
}

impl PublicProfile {
    pub fn from_profile(profile: &Profile, today: NaiveDate) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            name: profile.name.clone(),
            gender: profile.gender,
            birth_date: profile.birth_date,
            age: profile.age_on(today),
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            complexion: profile.complexion.clone(),
            physical_status: profile.physical_status.clone(),
            caste: profile.caste.clone(),
            subcaste: profile.subcaste.clone(),
            community: profile.community.clone(),
            marital_status: profile.marital_status.clone(),
            family_type: profile.family_type.clone(),
            family_status: profile.family_status.clone(),
            employed_in: profile.employed_in.clone(),
            education: profile.education.clone(),
            occupation: profile.occupation.clone(),
            location: profile.location.clone(),
            bio: profile.bio.clone(),
            photos: profile.photos.clone(),
            purpose: profile.purpose,
            created_at: profile.created_at,
        }
    }
}

/// Share link state for one profile owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareToken {
    pub user_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub view_count: i64,
    pub renewal_count: i64,
    pub last_renewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ShareToken {
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Inclusive numeric bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl Bounds {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Inclusive birth-date window derived from an age range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BirthDateWindow {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

/// Normalized candidate query handed to a profile store.
///
/// Every optional field means "no constraint" when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCriteria {
    pub requester_id: String,
    pub gender: Gender,
    pub mode: Option<MatchMode>,
    pub birth_dates: BirthDateWindow,
    pub height: Bounds,
    pub weight: Bounds,
    pub caste: Option<String>,
    pub community: Option<String>,
    pub marital_status: Option<String>,
    pub complexion: Option<String>,
    pub physical_status: Option<String>,
    pub family_type: Option<String>,
    pub family_status: Option<String>,
    pub employed_in: Option<String>,
    pub has_photos: Option<bool>,
    pub location: Option<String>,
}

/// Offset pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

/// One page of candidate profiles plus the unpaginated total
#[derive(Debug, Clone)]
pub struct CandidatePage {
    pub profiles: Vec<Profile>,
    pub total: i64,
}
