//! Matrimony Match - partner search and profile sharing service
//!
//! This library provides the match query builder and the profile share link
//! manager used by the matrimony app, together with the HTTP routes and the
//! storage backends they run on.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, ShareManager};
pub use error::ApiError;
pub use models::{MatchCriteria, MatchesRequest, MatchesResponse, Profile, PublicProfile, ShareInfo};
pub use routes::AppState;
