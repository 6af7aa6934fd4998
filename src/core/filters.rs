use chrono::{Months, NaiveDate};

use crate::error::ApiError;
use crate::models::{
    BirthDateWindow, Bounds, MatchCriteria, MatchMode, MatchesRequest, Profile, RangeInput,
};

/// Form value meaning "no constraint"
pub const NO_CONSTRAINT: &str = "none";

const MAX_AGE_YEARS: i32 = 150;
const MAX_HEIGHT_CM: i32 = 300;
const MAX_WEIGHT_KG: i32 = 500;

/// Turn a form value into an optional constraint.
///
/// `"none"` and blank strings mean the caller does not care about the field.
pub fn constraint(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NO_CONSTRAINT)
        .map(str::to_string)
}

pub fn parse_mode(value: &Option<String>) -> Result<Option<MatchMode>, ApiError> {
    match constraint(value).as_deref() {
        None => Ok(None),
        Some("Dating") => Ok(Some(MatchMode::Dating)),
        Some("Matrimony") => Ok(Some(MatchMode::Matrimony)),
        Some(other) => Err(ApiError::Validation(format!(
            "mode must be one of: Dating, Matrimony, none (got {:?})",
            other
        ))),
    }
}

pub fn parse_has_photos(value: &Option<String>) -> Result<Option<bool>, ApiError> {
    match constraint(value).as_deref() {
        None => Ok(None),
        Some("Yes") => Ok(Some(true)),
        Some("No") => Ok(Some(false)),
        Some(other) => Err(ApiError::Validation(format!(
            "hasPhotos must be one of: Yes, No, none (got {:?})",
            other
        ))),
    }
}

/// Validate a `{min, max}` pair against `0..=upper`
pub fn parse_bounds(field: &str, range: Option<RangeInput>, upper: i32) -> Result<Bounds, ApiError> {
    let Some(range) = range else {
        return Ok(Bounds::default());
    };

    for value in [range.min, range.max].into_iter().flatten() {
        if !(0..=upper).contains(&value) {
            return Err(ApiError::Validation(format!(
                "{} values must be between 0 and {}",
                field, upper
            )));
        }
    }

    if let (Some(min), Some(max)) = (range.min, range.max) {
        if min > max {
            return Err(ApiError::Validation(format!(
                "{}.min must not be greater than {}.max",
                field, field
            )));
        }
    }

    Ok(Bounds {
        min: range.min,
        max: range.max,
    })
}

fn years_before(today: NaiveDate, years: i32) -> Option<NaiveDate> {
    let months = u32::try_from(years).ok()?.checked_mul(12)?;
    today.checked_sub_months(Months::new(months))
}

/// Convert an age range into the birth dates it admits.
///
/// The maximum age bounds the earliest birth date and the minimum age bounds
/// the latest one: `today - max years <= birthDate <= today - min years`.
pub fn birth_date_window(age: Bounds, today: NaiveDate) -> BirthDateWindow {
    BirthDateWindow {
        earliest: age.max.and_then(|max| years_before(today, max)),
        latest: age.min.and_then(|min| years_before(today, min)),
    }
}

/// Build the normalized candidate query for a requester.
///
/// The requester must have a gender, otherwise the opposite-gender rule has
/// nothing to oppose.
pub fn build_criteria(
    requester: &Profile,
    request: &MatchesRequest,
    today: NaiveDate,
) -> Result<MatchCriteria, ApiError> {
    let gender = requester.gender.ok_or_else(|| {
        ApiError::InvalidPrecondition(
            "Set your gender on your profile before searching for matches".to_string(),
        )
    })?;

    let age = parse_bounds("ageRange", request.age_range, MAX_AGE_YEARS)?;

    Ok(MatchCriteria {
        requester_id: requester.user_id.clone(),
        gender: gender.opposite(),
        mode: parse_mode(&request.mode)?,
        birth_dates: birth_date_window(age, today),
        height: parse_bounds("heightRange", request.height_range, MAX_HEIGHT_CM)?,
        weight: parse_bounds("weightRange", request.weight_range, MAX_WEIGHT_KG)?,
        caste: constraint(&request.caste),
        community: constraint(&request.community),
        marital_status: constraint(&request.marital_status),
        complexion: constraint(&request.complexion),
        physical_status: constraint(&request.physical_status),
        family_type: constraint(&request.family_type),
        family_status: constraint(&request.family_status),
        employed_in: constraint(&request.employed_in),
        has_photos: parse_has_photos(&request.has_photos)?,
        location: constraint(&request.location),
    })
}

#[inline]
fn within_bounds(value: Option<i32>, bounds: &Bounds) -> bool {
    bounds.is_unbounded() || value.map_or(false, |v| bounds.contains(v))
}

#[inline]
fn within_window(birth_date: Option<NaiveDate>, window: &BirthDateWindow) -> bool {
    if window.earliest.is_none() && window.latest.is_none() {
        return true;
    }

    match birth_date {
        Some(date) => {
            window.earliest.map_or(true, |earliest| date >= earliest)
                && window.latest.map_or(true, |latest| date <= latest)
        }
        None => false,
    }
}

#[inline]
fn equals(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        Some(wanted) => actual.as_deref() == Some(wanted.as_str()),
        None => true,
    }
}

/// Evaluate a candidate query against one profile
pub fn matches_criteria(profile: &Profile, criteria: &MatchCriteria) -> bool {
    // Base eligibility
    if !profile.is_profile_complete
        || profile.user_id == criteria.requester_id
        || profile.gender != Some(criteria.gender)
    {
        return false;
    }

    if let Some(mode) = criteria.mode {
        if !mode.accepts(profile.purpose) {
            return false;
        }
    }

    if !within_window(profile.birth_date, &criteria.birth_dates)
        || !within_bounds(profile.height_cm, &criteria.height)
        || !within_bounds(profile.weight_kg, &criteria.weight)
    {
        return false;
    }

    let categorical = [
        (&criteria.caste, &profile.caste),
        (&criteria.community, &profile.community),
        (&criteria.marital_status, &profile.marital_status),
        (&criteria.complexion, &profile.complexion),
        (&criteria.physical_status, &profile.physical_status),
        (&criteria.family_type, &profile.family_type),
        (&criteria.family_status, &profile.family_status),
        (&criteria.employed_in, &profile.employed_in),
    ];
    if !categorical.iter().all(|(wanted, actual)| equals(wanted, actual)) {
        return false;
    }

    if let Some(has_photos) = criteria.has_photos {
        if has_photos == profile.photos.is_empty() {
            return false;
        }
    }

    if let Some(needle) = &criteria.location {
        let needle = needle.to_lowercase();
        let found = profile
            .location
            .as_ref()
            .map_or(false, |location| location.to_lowercase().contains(&needle));
        if !found {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Preference, Purpose};
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn create_test_profile(id: &str, gender: Gender, purpose: Purpose) -> Profile {
        Profile {
            user_id: id.to_string(),
            name: format!("User {}", id),
            email: None,
            mobile: None,
            mobile_verified: false,
            gender: Some(gender),
            birth_date: NaiveDate::from_ymd_opt(1996, 3, 10),
            height_cm: Some(165),
            weight_kg: Some(60),
            complexion: Some("Fair".to_string()),
            physical_status: Some("Normal".to_string()),
            caste: Some("Nair".to_string()),
            subcaste: None,
            community: Some("Hindu".to_string()),
            marital_status: Some("Never Married".to_string()),
            family_type: Some("Nuclear".to_string()),
            family_status: Some("Middle Class".to_string()),
            employed_in: Some("Private".to_string()),
            education: None,
            occupation: None,
            location: Some("Kochi, Kerala".to_string()),
            bio: None,
            photos: vec!["https://cdn.example.com/p/1.jpg".to_string()],
            purpose,
            is_profile_complete: true,
            preference: Preference::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn criteria_for(requester: &Profile, request: &MatchesRequest) -> MatchCriteria {
        build_criteria(requester, request, today()).unwrap()
    }

    #[test]
    fn test_none_sentinel_is_absent() {
        assert_eq!(constraint(&Some("none".to_string())), None);
        assert_eq!(constraint(&Some("  ".to_string())), None);
        assert_eq!(constraint(&None), None);
        assert_eq!(constraint(&Some("Nair".to_string())), Some("Nair".to_string()));
    }

    #[test]
    fn test_parse_mode_and_photos() {
        assert_eq!(parse_mode(&Some("Dating".into())).unwrap(), Some(MatchMode::Dating));
        assert_eq!(parse_mode(&Some("none".into())).unwrap(), None);
        assert!(parse_mode(&Some("Both".into())).is_err());

        assert_eq!(parse_has_photos(&Some("No".into())).unwrap(), Some(false));
        assert_eq!(parse_has_photos(&Some("Yes".into())).unwrap(), Some(true));
        assert!(parse_has_photos(&Some("maybe".into())).is_err());
    }

    #[test]
    fn test_parse_bounds_rejects_inverted_range() {
        let range = RangeInput { min: Some(40), max: Some(30) };
        assert!(matches!(
            parse_bounds("ageRange", Some(range), 150),
            Err(ApiError::Validation(_))
        ));

        let negative = RangeInput { min: Some(-1), max: None };
        assert!(parse_bounds("heightRange", Some(negative), 300).is_err());
    }

    #[test]
    fn test_birth_date_window_inverts_age() {
        let window = birth_date_window(Bounds { min: Some(25), max: Some(35) }, today());

        assert_eq!(window.earliest, NaiveDate::from_ymd_opt(1991, 6, 15));
        assert_eq!(window.latest, NaiveDate::from_ymd_opt(2001, 6, 15));
    }

    #[test]
    fn test_requester_without_gender_is_rejected() {
        let mut requester = create_test_profile("u1", Gender::Male, Purpose::Both);
        requester.gender = None;

        let result = build_criteria(&requester, &MatchesRequest::default(), today());
        assert!(matches!(result, Err(ApiError::InvalidPrecondition(_))));
    }

    #[test]
    fn test_opposite_gender_and_self_exclusion() {
        let requester = create_test_profile("u1", Gender::Male, Purpose::Both);
        let criteria = criteria_for(&requester, &MatchesRequest::default());

        assert_eq!(criteria.gender, Gender::Female);
        assert!(!matches_criteria(&requester, &criteria));
        assert!(matches_criteria(
            &create_test_profile("f1", Gender::Female, Purpose::Both),
            &criteria
        ));
        assert!(!matches_criteria(
            &create_test_profile("m2", Gender::Male, Purpose::Both),
            &criteria
        ));
    }

    #[test]
    fn test_mode_accepts_both() {
        let requester = create_test_profile("u1", Gender::Male, Purpose::Both);
        let request = MatchesRequest {
            mode: Some("Matrimony".to_string()),
            ..Default::default()
        };
        let criteria = criteria_for(&requester, &request);

        assert!(matches_criteria(&create_test_profile("a", Gender::Female, Purpose::Matrimony), &criteria));
        assert!(matches_criteria(&create_test_profile("b", Gender::Female, Purpose::Both), &criteria));
        assert!(!matches_criteria(&create_test_profile("c", Gender::Female, Purpose::Dating), &criteria));
    }

    #[test]
    fn test_incomplete_profiles_excluded() {
        let requester = create_test_profile("u1", Gender::Male, Purpose::Both);
        let criteria = criteria_for(&requester, &MatchesRequest::default());

        let mut candidate = create_test_profile("f1", Gender::Female, Purpose::Both);
        candidate.is_profile_complete = false;
        assert!(!matches_criteria(&candidate, &criteria));
    }

    #[test]
    fn test_has_photos_filter() {
        let requester = create_test_profile("u1", Gender::Male, Purpose::Both);
        let without = MatchesRequest {
            has_photos: Some("No".to_string()),
            ..Default::default()
        };
        let criteria = criteria_for(&requester, &without);

        let mut candidate = create_test_profile("f1", Gender::Female, Purpose::Both);
        assert!(!matches_criteria(&candidate, &criteria));
        candidate.photos.clear();
        assert!(matches_criteria(&candidate, &criteria));

        let with = MatchesRequest {
            has_photos: Some("Yes".to_string()),
            ..Default::default()
        };
        let criteria = criteria_for(&requester, &with);
        assert!(!matches_criteria(&candidate, &criteria));
        candidate.photos.push("https://cdn.example.com/f1.jpg".to_string());
        assert!(matches_criteria(&candidate, &criteria));
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let requester = create_test_profile("u1", Gender::Male, Purpose::Both);
        let request = MatchesRequest {
            location: Some("KOCHI".to_string()),
            ..Default::default()
        };
        let criteria = criteria_for(&requester, &request);

        assert!(matches_criteria(&create_test_profile("f1", Gender::Female, Purpose::Both), &criteria));
    }

    #[test]
    fn test_categorical_and_range_filters() {
        let requester = create_test_profile("u1", Gender::Male, Purpose::Both);
        let candidate = create_test_profile("f1", Gender::Female, Purpose::Both);

        let matching = MatchesRequest {
            caste: Some("Nair".to_string()),
            complexion: Some("none".to_string()),
            height_range: Some(RangeInput { min: Some(160), max: Some(170) }),
            ..Default::default()
        };
        assert!(matches_criteria(&candidate, &criteria_for(&requester, &matching)));

        let wrong_caste = MatchesRequest {
            caste: Some("Ezhava".to_string()),
            ..Default::default()
        };
        assert!(!matches_criteria(&candidate, &criteria_for(&requester, &wrong_caste)));

        let too_heavy = MatchesRequest {
            weight_range: Some(RangeInput { min: Some(70), max: None }),
            ..Default::default()
        };
        assert!(!matches_criteria(&candidate, &criteria_for(&requester, &too_heavy)));
    }

    #[test]
    fn test_age_range_excludes_missing_birth_date() {
        let requester = create_test_profile("u1", Gender::Male, Purpose::Both);
        let request = MatchesRequest {
            age_range: Some(RangeInput { min: Some(25), max: Some(35) }),
            ..Default::default()
        };
        let criteria = criteria_for(&requester, &request);

        let mut candidate = create_test_profile("f1", Gender::Female, Purpose::Both);
        assert!(matches_criteria(&candidate, &criteria));
        candidate.birth_date = None;
        assert!(!matches_criteria(&candidate, &criteria));
    }
}
