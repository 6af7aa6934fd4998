use actix_web::{http::header, web, HttpResponse};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::routes::AppState;

/// Configure profile sharing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/share", web::get().to(get_share))
        .route("/share", web::post().to(create_share))
        .route("/share/{user_id}/{token}", web::get().to(view_shared))
        .route("/share/{user_id}/{token}/renew", web::post().to(renew_share));
}

/// GET /api/v1/share
///
/// Current share link of the caller, or `null`.
async fn get_share(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let share = state
        .share_manager
        .get_active_share(state.shares.as_ref(), user.id())
        .await?;
    Ok(HttpResponse::Ok().json(share))
}

/// POST /api/v1/share
async fn create_share(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let share = state
        .share_manager
        .create_or_get_share(state.profiles.as_ref(), state.shares.as_ref(), user.id())
        .await?;
    Ok(HttpResponse::Ok().json(share))
}

/// POST /api/v1/share/{user_id}/{token}/renew
async fn renew_share(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (owner_id, token) = path.into_inner();
    let share = state
        .share_manager
        .renew(state.shares.as_ref(), &owner_id, &token, user.id())
        .await?;
    Ok(HttpResponse::Ok().json(share))
}

/// GET /api/v1/share/{user_id}/{token}
///
/// Public, unauthenticated. Every hit counts as a view, so the response must
/// never be cached by intermediaries.
async fn view_shared(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (owner_id, token) = path.into_inner();
    let shared = state
        .share_manager
        .view_shared(state.profiles.as_ref(), state.shares.as_ref(), &owner_id, &token)
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(shared))
}
