// Core logic exports
pub mod filters;
pub mod matcher;
pub mod preferences;
pub mod share;

pub use filters::{build_criteria, matches_criteria, birth_date_window};
pub use matcher::Matcher;
pub use share::{ShareManager, generate_token};
