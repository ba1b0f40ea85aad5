//! Admin submission of new weekly data

use chrono::{DateTime, Utc};
use log::info;

use crate::error::{ChallengeError, Result};
use crate::halls::{BUILDING_SIZES, roster};
use crate::ingest::{parse_admin_csv, week_from_values};
use crate::models::WeeklyReading;

/// Proof that the caller may submit new weeks. Only [`AdminCapability::authorize`] creates one.
#[derive(Debug)]
pub struct AdminCapability {
    _private: (),
}

impl AdminCapability {
    /// Grants the capability when an admin secret is configured and `presented` matches it.
    pub fn authorize(presented: Option<&str>, configured: Option<&str>) -> Result<Self> {
        match (presented, configured) {
            (Some(token), Some(secret)) if !secret.is_empty() && token == secret => {
                Ok(Self { _private: () })
            }
            _ => Err(ChallengeError::Unauthorized),
        }
    }
}

/// All-zero CSV in roster order, as a starting point for entry.
pub fn csv_template() -> String {
    vec!["0"; BUILDING_SIZES.len() * 3].join(",")
}

/// Validate admin CSV against the roster and build the new week starting at `start`.
///
/// Nothing is produced unless every value passes validation.
pub fn submit_week(
    _cap: &AdminCapability,
    csv: &str,
    start: DateTime<Utc>,
) -> Result<WeeklyReading> {
    let values = parse_admin_csv(csv, BUILDING_SIZES.len())?;
    let week = week_from_values(roster(), &values, start);
    info!(
        "Accepted week starting {} with {} readings",
        week.start.format("%Y-%m-%d"),
        week.readings.len()
    );
    Ok(week)
}
