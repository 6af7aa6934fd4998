use actix_web::{web, HttpResponse};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{HealthResponse, MatchesRequest};
use crate::routes::AppState;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::post().to(find_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let db_healthy = state.profiles.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// {
///   "page": 1,
///   "limit": 10,
///   "mode": "Dating|Matrimony|none",
///   "ageRange": { "min": 25, "max": 35 },
///   "heightRange": { "min": 150, "max": 180 },
///   "caste": "none",
///   "hasPhotos": "Yes|No|none",
///   "location": "kochi"
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<MatchesRequest>,
) -> Result<HttpResponse, ApiError> {
    tracing::info!(
        "Finding matches for user: {}, page: {:?}, limit: {:?}",
        user.id(),
        req.page,
        req.limit
    );

    let response = state
        .matcher
        .find_matches(state.profiles.as_ref(), user.id(), &req)
        .await
        .map_err(|e| {
            if let ApiError::Validation(message) = &e {
                tracing::info!("Validation failed for find_matches request: {}", message);
            }
            e
        })?;

    tracing::info!(
        "Returning {} of {} matches for user {}",
        response.profiles.len(),
        response.pagination.total,
        user.id()
    );

    Ok(HttpResponse::Ok().json(response))
}
