use actix_web::{web, HttpResponse};

use crate::auth::AuthenticatedUser;
use crate::core::preferences::{get_preferences, save_preferences};
use crate::error::ApiError;
use crate::models::UpdatePreferencesRequest;
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/preferences", web::get().to(show))
        .route("/preferences", web::put().to(update));
}

/// GET /api/v1/preferences
async fn show(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let preference = get_preferences(state.profiles.as_ref(), user.id()).await?;
    Ok(HttpResponse::Ok().json(preference))
}

/// PUT /api/v1/preferences
async fn update(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdatePreferencesRequest>,
) -> Result<HttpResponse, ApiError> {
    let preference = save_preferences(state.profiles.as_ref(), user.id(), &req).await?;
    Ok(HttpResponse::Ok().json(preference))
}
