//! Green Challenge scoring engine
//!
//! Turns weekly electricity, gas and water readings for each residence hall
//! into size-normalized rankings, weekly points, cumulative standings and a
//! fixed competition timeline. Every view is recomputed from the full
//! reading history.

pub mod admin;
pub mod aggregate;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod halls;
pub mod ingest;
pub mod models;
pub mod scoring;
pub mod seed;
pub mod timeline;

pub use aggregate::{aggregate, chart_series, cumulative_series, leaderboard};
pub use dashboard::build_snapshot;
pub use error::ChallengeError;
pub use halls::normalize;
pub use scoring::score_week;
pub use timeline::generate_timeline;
