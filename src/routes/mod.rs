// Route exports
pub mod matches;
pub mod preferences;
pub mod share;

use actix_web::web;
use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::core::{Matcher, ShareManager};
use crate::services::{ProfileStore, ShareStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub shares: Arc<dyn ShareStore>,
    pub matcher: Matcher,
    pub share_manager: ShareManager,
    pub auth: Arc<JwtVerifier>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(preferences::configure)
            .configure(share::configure),
    );
}
