//! Competition calendar and timeline integrity checks

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use log::warn;
use serde::Serialize;

use crate::error::{ChallengeError, Result};
use crate::models::{TimelineEvent, WeeklyReading};

const SPRING_2024_START: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 8) {
    Some(date) => date,
    None => panic!("invalid competition start"),
};

const SPRING_2024_END: NaiveDate = match NaiveDate::from_ymd_opt(2024, 5, 7) {
    Some(date) => date,
    None => panic!("invalid competition end"),
};

/// Fixed competition window. Timeline length depends only on these fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompetitionCalendar {
    start: NaiveDate,
    end: NaiveDate,
    stride_days: u32,
}

impl Default for CompetitionCalendar {
    fn default() -> Self {
        Self {
            start: SPRING_2024_START,
            end: SPRING_2024_END,
            stride_days: 7,
        }
    }
}

impl CompetitionCalendar {
    pub fn new(start: NaiveDate, end: NaiveDate, stride_days: u32) -> Self {
        Self {
            start,
            end,
            stride_days,
        }
    }

    /// (start, end) of every week whose last day falls on or before `end`.
    /// A zero stride yields no weeks.
    pub fn weeks(&self) -> Vec<(NaiveDate, NaiveDate)> {
        let mut weeks = Vec::new();
        if self.stride_days == 0 {
            return weeks;
        }
        let span = Days::new(u64::from(self.stride_days - 1));
        let stride = Days::new(u64::from(self.stride_days));

        let mut start = self.start;
        while let Some(end) = start.checked_add_days(span) {
            if end > self.end {
                break;
            }
            weeks.push((start, end));
            match start.checked_add_days(stride) {
                Some(next) => start = next,
                None => break,
            }
        }
        weeks
    }

    pub fn week_count(&self) -> usize {
        self.weeks().len()
    }

    /// Full calendar with current/future flags. Weeks past `weeks_with_data` are future.
    pub fn generate_timeline(
        &self,
        weeks_with_data: usize,
        now: DateTime<Utc>,
    ) -> Vec<TimelineEvent> {
        let today = now.date_naive();
        self.weeks()
            .into_iter()
            .enumerate()
            .map(|(index, (start_date, end_date))| {
                let week_number = index + 1;
                TimelineEvent {
                    week_number,
                    start_date,
                    end_date,
                    is_current_week: start_date <= today && today <= end_date,
                    is_future: week_number > weeks_with_data,
                }
            })
            .collect()
    }
}

/// Timeline for the default spring calendar.
pub fn generate_timeline(weeks_with_data: usize, now: DateTime<Utc>) -> Vec<TimelineEvent> {
    CompetitionCalendar::default().generate_timeline(weeks_with_data, now)
}

pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// A break between two consecutive weeks of submitted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekGap {
    /// 1-based number of the week that starts late.
    pub week: usize,
    pub previous_end: DateTime<Utc>,
    pub start: DateTime<Utc>,
}

impl WeekGap {
    pub fn gap(&self) -> Duration {
        self.start - self.previous_end
    }
}

/// Every consecutive pair of weeks separated by more than one day.
pub fn find_gaps(weeks: &[WeeklyReading]) -> Vec<WeekGap> {
    weeks
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1].start - pair[0].end > Duration::days(1))
        .map(|(index, pair)| WeekGap {
            week: index + 2,
            previous_end: pair[0].end,
            start: pair[1].start,
        })
        .collect()
}

/// Reports the first gap in the submitted history as an error.
pub fn validate_timeline(weeks: &[WeeklyReading]) -> Result<()> {
    let gaps = find_gaps(weeks);
    for gap in &gaps {
        warn!(
            "Week {} starts {}h after the previous week ended",
            gap.week,
            gap.gap().num_hours()
        );
    }
    match gaps.first() {
        Some(gap) => Err(ChallengeError::TimelineGap {
            week: gap.week,
            gap_hours: gap.gap().num_hours(),
        }),
        None => Ok(()),
    }
}

/// Index of the submitted week whose `[start, end]` contains `now`.
pub fn current_week_index(weeks: &[WeeklyReading], now: DateTime<Utc>) -> Option<usize> {
    weeks.iter().position(|w| w.start <= now && now <= w.end)
}

/// True once data has been submitted for every calendar week.
pub fn is_complete(weeks: &[WeeklyReading], calendar: &CompetitionCalendar) -> bool {
    let total = calendar.week_count();
    total > 0 && weeks.len() >= total
}
