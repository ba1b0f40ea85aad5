//! Per-hall dashboard data for the latest week, with full weekly history

use std::collections::BTreeMap;

use log::debug;

use crate::aggregate::cumulative_series;
use crate::halls::normalize;
use crate::models::{
    HallSnapshot, Metrics, Resource, ResourcePoints, WeeklyHistoryEntry, WeeklyReading,
};
use crate::scoring::{points_for_position, rank_order};

fn normalized_metrics(week: &WeeklyReading, hall: &str) -> Metrics {
    let mut metrics = Metrics::default();
    for resource in Resource::ALL {
        let raw = week.value(hall, resource).unwrap_or(0.0);
        metrics.set(resource, normalize(hall, raw));
    }
    metrics
}

/// Build one snapshot per hall present in the most recent week.
///
/// Current-week points rank every snapshot hall on its normalized value (a
/// missing reading counts as 0). `points.total` and each history entry carry
/// cumulative totals; per-resource history points stay 0.
pub fn build_snapshot(weeks: &[WeeklyReading]) -> BTreeMap<String, HallSnapshot> {
    let Some(latest) = weeks.last() else {
        return BTreeMap::new();
    };

    let halls = latest.halls();
    debug!("Building snapshot for {} halls over {} weeks", halls.len(), weeks.len());

    let current: Vec<(&str, Metrics)> = halls
        .iter()
        .map(|hall| (*hall, normalized_metrics(latest, hall)))
        .collect();

    let mut points: BTreeMap<&str, ResourcePoints> =
        halls.iter().map(|hall| (*hall, ResourcePoints::default())).collect();

    for resource in Resource::ALL {
        let mut ranked: Vec<(&str, f64)> = current
            .iter()
            .map(|(hall, metrics)| (*hall, metrics.get(resource)))
            .collect();
        ranked.sort_by(|a, b| rank_order(*a, *b));
        for (position, (hall, _)) in ranked.into_iter().enumerate() {
            if let Some(p) = points.get_mut(hall) {
                p.set(resource, points_for_position(position));
            }
        }
    }

    current
        .into_iter()
        .map(|(hall, metrics)| {
            let series = cumulative_series(weeks, hall);
            let mut hall_points = points.get(hall).copied().unwrap_or_default();
            hall_points.total = series.last().copied().unwrap_or(0);

            let weekly_history = weeks
                .iter()
                .zip(&series)
                .enumerate()
                .map(|(index, (week, total))| WeeklyHistoryEntry {
                    week_number: index + 1,
                    start_date: week.start,
                    end_date: week.end,
                    metrics: normalized_metrics(week, hall),
                    points: ResourcePoints {
                        total: *total,
                        ..ResourcePoints::default()
                    },
                })
                .collect();

            (
                hall.to_string(),
                HallSnapshot {
                    current: metrics,
                    points: hall_points,
                    weekly_history,
                },
            )
        })
        .collect()
}

/// Current-week ranking of all snapshot halls for one resource, best first.
pub fn resource_rankings(
    snapshot: &BTreeMap<String, HallSnapshot>,
    resource: Resource,
) -> Vec<(String, f64, u32)> {
    let mut rows: Vec<(String, f64, u32)> = snapshot
        .iter()
        .map(|(hall, s)| (hall.clone(), s.current.get(resource), s.points.get(resource)))
        .collect();
    rows.sort_by(|a, b| rank_order((a.0.as_str(), a.1), (b.0.as_str(), b.1)));
    rows
}
