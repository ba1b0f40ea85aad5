//! Cumulative scoring across weeks and the overall leaderboard

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::models::{ChartPoint, CumulativeRecord, Standing, WeeklyReading};
use crate::scoring::score_week;

/// Running point total for one hall after each week.
pub fn cumulative_series(weeks: &[WeeklyReading], hall: &str) -> Vec<u32> {
    weeks
        .iter()
        .scan(0u32, |total, week| {
            *total += score_week(week, hall);
            Some(*total)
        })
        .collect()
}

/// Cumulative records for every hall present in the first week.
///
/// Halls that only show up in later weeks are not tracked.
pub fn aggregate(weeks: &[WeeklyReading]) -> BTreeMap<String, CumulativeRecord> {
    let Some(first) = weeks.first() else {
        return BTreeMap::new();
    };

    debug!(
        "Aggregating {} weeks for {} halls",
        weeks.len(),
        first.halls().len()
    );

    first
        .halls()
        .into_iter()
        .map(|hall| {
            let weekly_scores = cumulative_series(weeks, hall);
            let points = weekly_scores.last().copied().unwrap_or(0);
            (
                hall.to_string(),
                CumulativeRecord {
                    weekly_scores,
                    points,
                },
            )
        })
        .collect()
}

/// Standings sorted by points descending, ties by name.
pub fn leaderboard(records: &BTreeMap<String, CumulativeRecord>) -> Vec<Standing> {
    let mut standings: Vec<Standing> = records
        .iter()
        .map(|(name, record)| Standing {
            name: name.clone(),
            points: record.points,
        })
        .collect();
    standings.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.name.cmp(&b.name)));
    standings
}

pub fn top_halls(standings: &[Standing], n: usize) -> &[Standing] {
    &standings[..n.min(standings.len())]
}

/// Per-week cumulative points for one hall, for progress charts.
pub fn chart_series(weeks: &[WeeklyReading], hall: &str) -> Vec<ChartPoint> {
    weeks
        .iter()
        .zip(cumulative_series(weeks, hall))
        .enumerate()
        .map(|(index, (week, points))| ChartPoint {
            week_number: index + 1,
            date: week.start,
            points,
        })
        .collect()
}

/// Leaderboard as of a given week, ready for printing.
#[derive(Debug)]
pub struct LeaderboardReport {
    pub week: usize,
    pub standings: Vec<Standing>,
}

impl LeaderboardReport {
    /// Standings over the first `week` weeks (clamped to the history length).
    pub fn as_of(weeks: &[WeeklyReading], week: usize) -> Self {
        let week = week.min(weeks.len());
        Self {
            week,
            standings: leaderboard(&aggregate(&weeks[..week])),
        }
    }
}

impl fmt::Display for LeaderboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Overall Standings (week {}) ===", self.week)?;
        if self.standings.is_empty() {
            return writeln!(f, "No weekly data yet.");
        }
        for (index, standing) in self.standings.iter().enumerate() {
            writeln!(
                f,
                "{:>3}. {:<24} {:>4} pts",
                index + 1,
                standing.name,
                standing.points
            )?;
        }
        Ok(())
    }
}
