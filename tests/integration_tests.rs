// Integration tests for Matrimony Match

use actix_web::{http::StatusCode, test, web, App};
use chrono::{Duration, Months, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use matrimony_match::auth::{Claims, JwtVerifier};
use matrimony_match::core::{Matcher, ShareManager};
use matrimony_match::models::{
    ErrorResponse, Gender, MatchesResponse, Preference, Profile, Purpose, ShareInfo,
    SharedProfileResponse,
};
use matrimony_match::routes::{self, AppState};
use matrimony_match::services::{MemoryStore, ShareStore};
use serde_json::json;
use std::sync::Arc;

const SECRET: &[u8] = b"integration-secret";

fn years_ago(years: u32) -> NaiveDate {
    Utc::now()
        .date_naive()
        .checked_sub_months(Months::new(years * 12))
        .unwrap()
}

fn create_test_profile(id: &str, gender: Gender, purpose: Purpose, age: u32) -> Profile {
    Profile {
        user_id: id.to_string(),
        name: format!("User {}", id),
        email: Some(format!("{}@example.com", id)),
        mobile: Some("+919999999999".to_string()),
        mobile_verified: true,
        gender: Some(gender),
        birth_date: Some(years_ago(age)),
        height_cm: Some(168),
        weight_kg: Some(62),
        complexion: Some("Fair".to_string()),
        physical_status: Some("Normal".to_string()),
        caste: Some("Reddy".to_string()),
        subcaste: None,
        community: Some("Hindu".to_string()),
        marital_status: Some("Never Married".to_string()),
        family_type: Some("Nuclear".to_string()),
        family_status: Some("Middle Class".to_string()),
        employed_in: Some("Private".to_string()),
        education: Some("B.Tech".to_string()),
        occupation: Some("Engineer".to_string()),
        location: Some("Hyderabad, Telangana".to_string()),
        bio: None,
        photos: vec![format!("https://cdn.example.com/{}.jpg", id)],
        purpose,
        is_profile_complete: true,
        preference: Preference::default(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn bearer(user_id: &str) -> (String, String) {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: now,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
    ("Authorization".to_string(), format!("Bearer {}", token))
}

fn app_state(store: Arc<MemoryStore>) -> AppState {
    AppState {
        profiles: store.clone(),
        shares: store,
        matcher: Matcher::default(),
        share_manager: ShareManager::new(30, None),
        auth: Arc::new(JwtVerifier::new(SECRET)),
    }
}

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($store.clone())))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_scenario_a_matrimony_search() {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(create_test_profile("u1", Gender::Male, Purpose::Both, 30)).await;
    store.insert_profile(create_test_profile("f-mat", Gender::Female, Purpose::Matrimony, 28)).await;
    store.insert_profile(create_test_profile("f-both", Gender::Female, Purpose::Both, 33)).await;
    store.insert_profile(create_test_profile("f-dating", Gender::Female, Purpose::Dating, 27)).await;
    store.insert_profile(create_test_profile("f-old", Gender::Female, Purpose::Matrimony, 45)).await;
    store.insert_profile(create_test_profile("m-mat", Gender::Male, Purpose::Matrimony, 29)).await;
    let mut incomplete = create_test_profile("f-incomplete", Gender::Female, Purpose::Matrimony, 26);
    incomplete.is_profile_complete = false;
    store.insert_profile(incomplete).await;

    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .insert_header(bearer("u1"))
        .set_json(json!({
            "page": 1,
            "limit": 10,
            "mode": "Matrimony",
            "ageRange": { "min": 25, "max": 35 },
            "caste": "none",
            "hasPhotos": "none"
        }))
        .to_request();

    let resp: MatchesResponse = test::call_and_read_body_json(&app, req).await;

    let mut ids: Vec<_> = resp.profiles.iter().map(|p| p.user_id.clone()).collect();
    ids.sort();
    assert_eq!(ids, vec!["f-both".to_string(), "f-mat".to_string()]);

    let earliest = years_ago(35);
    let latest = years_ago(25);
    for profile in &resp.profiles {
        assert_eq!(profile.gender, Some(Gender::Female));
        assert_ne!(profile.user_id, "u1");
        assert!(matches!(profile.purpose, Purpose::Matrimony | Purpose::Both));
        let birth = profile.birth_date.unwrap();
        assert!(birth >= earliest && birth <= latest);
    }

    assert_eq!(resp.pagination.total, 2);
    assert_eq!(resp.pagination.page, 1);
    assert_eq!(resp.pagination.page_size, 10);
    assert_eq!(resp.pagination.total_pages, 1);
}

#[actix_web::test]
async fn test_match_response_hides_private_fields() {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(create_test_profile("u1", Gender::Male, Purpose::Both, 30)).await;
    store.insert_profile(create_test_profile("f1", Gender::Female, Purpose::Both, 28)).await;

    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .insert_header(bearer("u1"))
        .set_json(json!({}))
        .to_request();

    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let profile = &body["profiles"][0];

    assert_eq!(profile["userId"], "f1");
    assert!(profile.get("email").is_none());
    assert!(profile.get("mobile").is_none());
    assert!(profile.get("mobileVerified").is_none());
    assert!(profile.get("preference").is_none());
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[actix_web::test]
async fn test_matches_require_authentication() {
    let store = Arc::new(MemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .set_json(json!({}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_oversized_limit_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(create_test_profile("u1", Gender::Male, Purpose::Both, 30)).await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .insert_header(bearer("u1"))
        .set_json(json!({ "limit": 5000 }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_requester_without_gender_is_reported() {
    let store = Arc::new(MemoryStore::new());
    let mut requester = create_test_profile("u1", Gender::Male, Purpose::Both, 30);
    requester.gender = None;
    store.insert_profile(requester).await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches")
        .insert_header(bearer("u1"))
        .set_json(json!({}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_precondition");
}

#[actix_web::test]
async fn test_scenario_b_share_lifecycle() {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(create_test_profile("u2", Gender::Female, Purpose::Both, 27)).await;
    let app = init_app!(store);

    // Owner creates the link
    let req = test::TestRequest::post()
        .uri("/api/v1/share")
        .insert_header(bearer("u2"))
        .to_request();
    let created: ShareInfo = test::call_and_read_body_json(&app, req).await;
    let token = created.share.token.clone();
    assert_eq!(created.share.view_count, 0);
    assert!(created.share.expires_at > Utc::now() + Duration::days(29));

    // Anonymous viewer before expiry
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/share/u2/{}", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("cache-control").and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    let viewed: SharedProfileResponse = test::read_body_json(resp).await;
    assert_eq!(viewed.share_info.share.view_count, 1);
    assert_eq!(viewed.profile.user_id, "u2");

    // Time passes
    store.set_share_expiry("u2", Utc::now() - Duration::minutes(1)).await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/share/u2/{}", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "share_link_expired");

    // Owner renews
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/share/u2/{}/renew", token))
        .insert_header(bearer("u2"))
        .to_request();
    let renewed: ShareInfo = test::call_and_read_body_json(&app, req).await;
    assert_eq!(renewed.share.token, token);
    assert_eq!(renewed.share.renewal_count, 1);
    assert!(renewed.share.expires_at > Utc::now());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/share/u2/{}", token))
        .to_request();
    let viewed: SharedProfileResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(viewed.share_info.share.view_count, 2);
}

#[actix_web::test]
async fn test_scenario_c_non_owner_cannot_renew() {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(create_test_profile("u2", Gender::Female, Purpose::Both, 27)).await;
    store.insert_profile(create_test_profile("u3", Gender::Male, Purpose::Both, 31)).await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/v1/share")
        .insert_header(bearer("u2"))
        .to_request();
    let created: ShareInfo = test::call_and_read_body_json(&app, req).await;
    let token = created.share.token.clone();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/share/u2/{}/renew", token))
        .insert_header(bearer("u3"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let stored = store.get_share("u2").await.unwrap().unwrap();
    assert_eq!(stored.renewal_count, 0);
    assert_eq!(stored.expires_at, created.share.expires_at);
}

#[actix_web::test]
async fn test_get_share_returns_null_before_creation() {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(create_test_profile("u2", Gender::Female, Purpose::Both, 27)).await;
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/v1/share")
        .insert_header(bearer("u2"))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.is_null());
}

#[actix_web::test]
async fn test_unknown_share_link_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/v1/share/u9/deadbeef")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "share_link_not_found");
}

#[actix_web::test]
async fn test_preferences_round_trip() {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(create_test_profile("u1", Gender::Male, Purpose::Both, 30)).await;
    let app = init_app!(store);

    let req = test::TestRequest::put()
        .uri("/api/v1/preferences")
        .insert_header(bearer("u1"))
        .set_json(json!({
            "minAge": 24,
            "maxAge": 30,
            "maritalStatus": "Never Married",
            "caste": "none"
        }))
        .to_request();
    let saved: Preference = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved.min_age, Some(24));
    assert_eq!(saved.caste, None);

    let req = test::TestRequest::get()
        .uri("/api/v1/preferences")
        .insert_header(bearer("u1"))
        .to_request();
    let fetched: Preference = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, saved);
}

#[actix_web::test]
async fn test_preferences_reject_inverted_range() {
    let store = Arc::new(MemoryStore::new());
    store.insert_profile(create_test_profile("u1", Gender::Male, Purpose::Both, 30)).await;
    let app = init_app!(store);

    let req = test::TestRequest::put()
        .uri("/api/v1/preferences")
        .insert_header(bearer("u1"))
        .set_json(json!({ "minAge": 35, "maxAge": 25 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_health_check() {
    let store = Arc::new(MemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}
