#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use green_challenge::models::{MeterReading, Resource, WeeklyReading};

/// Midnight UTC on 2024-01-08 plus `days`.
pub fn day(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap() + Duration::days(days)
}

/// Week `index` (0-based) of a contiguous history, one row per hall:
/// (name, electricity, gas, water).
pub fn week(index: i64, rows: &[(&str, f64, f64, f64)]) -> WeeklyReading {
    let start = day(index * 7);
    let mut readings = Vec::new();
    for (hall, e, g, w) in rows {
        for (resource, value) in [
            (Resource::Electricity, *e),
            (Resource::Gas, *g),
            (Resource::Water, *w),
        ] {
            readings.push(MeterReading {
                hall: hall.to_string(),
                resource,
                value,
            });
        }
    }
    WeeklyReading {
        start,
        end: start + Duration::days(6),
        readings,
    }
}

/// Week containing a single resource's readings.
pub fn single_resource_week(resource: Resource, rows: &[(&str, f64)]) -> WeeklyReading {
    let start = day(0);
    WeeklyReading {
        start,
        end: start + Duration::days(6),
        readings: rows
            .iter()
            .map(|(hall, value)| MeterReading {
                hall: hall.to_string(),
                resource,
                value: *value,
            })
            .collect(),
    }
}
