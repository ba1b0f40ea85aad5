//! Weekly scoring: rank halls per resource and convert rank to points

use std::cmp::Ordering;

use crate::halls::normalize;
use crate::models::{Resource, ResourcePoints, WeeklyReading};

/// 1st = 3, 2nd = 2, 3rd = 1, everyone else 0.
pub fn points_for_position(position: usize) -> u32 {
    match position {
        0 => 3,
        1 => 2,
        2 => 1,
        _ => 0,
    }
}

// NaN ranks after every real value.
fn rank_key(value: f64) -> f64 {
    if value.is_nan() { f64::INFINITY } else { value }
}

/// Ascending (lowest consumption first) ordering of normalized values.
/// Equal values fall back to hall name so the order never depends on input order.
pub(crate) fn rank_order(a: (&str, f64), b: (&str, f64)) -> Ordering {
    rank_key(a.1)
        .total_cmp(&rank_key(b.1))
        .then_with(|| a.0.cmp(b.0))
}

/// Halls that reported `resource` this week, best first, with normalized values.
pub fn rank_resource(week: &WeeklyReading, resource: Resource) -> Vec<(String, f64)> {
    let mut ranked: Vec<(&str, f64)> = week
        .values_for(resource)
        .into_iter()
        .map(|(hall, raw)| (hall, normalize(hall, raw)))
        .collect();
    ranked.sort_by(|a, b| rank_order(*a, *b));
    ranked
        .into_iter()
        .map(|(hall, value)| (hall.to_string(), value))
        .collect()
}

/// Points a hall earns in one resource ranking. Unranked halls earn 0.
pub fn resource_points(week: &WeeklyReading, resource: Resource, hall: &str) -> u32 {
    rank_resource(week, resource)
        .iter()
        .position(|(name, _)| name == hall)
        .map(points_for_position)
        .unwrap_or(0)
}

/// Per-resource points for one hall in one week, plus their sum (0..=9).
pub fn score_week_breakdown(week: &WeeklyReading, hall: &str) -> ResourcePoints {
    let mut points = ResourcePoints::default();
    for resource in Resource::ALL {
        let p = resource_points(week, resource, hall);
        points.set(resource, p);
        points.total += p;
    }
    points
}

/// Weekly point total for one hall, independent of any cumulative state.
pub fn score_week(week: &WeeklyReading, hall: &str) -> u32 {
    score_week_breakdown(week, hall).total
}
