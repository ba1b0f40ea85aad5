//! Historical seed data for a fresh database

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::halls::roster;
use crate::models::{MeterReading, Resource, WeeklyReading};
use crate::timeline::midnight_utc;

const SEED_FIRST_START: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 8) {
    Some(date) => date,
    None => panic!("invalid seed start"),
};

// Weeks starting after this date are left for admin submission.
const SEED_LAST_START: NaiveDate = match NaiveDate::from_ymd_opt(2024, 3, 31) {
    Some(date) => date,
    None => panic!("invalid seed cutoff"),
};

fn base_range(resource: Resource) -> std::ops::Range<f64> {
    match resource {
        Resource::Electricity => 100_000.0..150_000.0,
        Resource::Gas => 2_000.0..5_000.0,
        Resource::Water => 20_000.0..80_000.0,
    }
}

/// Weekly readings for every roster hall from early January through March.
///
/// Each value is a random base scaled by 0.8..1.2 and rounded. The same seed
/// always yields the same history.
pub fn generate_historical(seed: u64) -> Vec<WeeklyReading> {
    let mut start = SEED_FIRST_START;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut weeks = Vec::new();

    while start <= SEED_LAST_START {
        let mut readings = Vec::new();
        for hall in roster() {
            for resource in Resource::ALL {
                let base = rng.gen_range(base_range(resource));
                let factor = rng.gen_range(0.8..1.2);
                readings.push(MeterReading {
                    hall: hall.to_string(),
                    resource,
                    value: (base * factor).round(),
                });
            }
        }

        weeks.push(WeeklyReading {
            start: midnight_utc(start),
            end: midnight_utc(start + Duration::days(6)),
            readings,
        });
        start = start + Duration::days(7);
    }

    weeks
}
