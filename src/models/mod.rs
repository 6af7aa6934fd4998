// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Bounds, BirthDateWindow, CandidatePage, Gender, MatchCriteria, MatchMode, PageRequest,
    Preference, Profile, PublicProfile, Purpose, ShareToken,
};
pub use requests::{MatchesRequest, RangeInput, UpdatePreferencesRequest};
pub use responses::{
    ErrorResponse, HealthResponse, MatchesResponse, Pagination, SharedProfileResponse, ShareInfo,
};
