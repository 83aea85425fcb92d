// Match lifecycle and the producer side of score updates

pub use handlers::{
    create_match, end_match, get_match_by_code, get_match_stats, get_matches_by_location,
    get_matches_by_status, list_matches, schedule, start_match,
};

mod errors;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;

pub use errors::MatchError;
