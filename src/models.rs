//! Data models for weekly readings and the structures derived from them

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One independently ranked consumption metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Electricity,
    Gas,
    Water,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Electricity, Resource::Gas, Resource::Water];

    /// Capitalized name used inside reading keys.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Electricity => "Electricity",
            Resource::Gas => "Gas",
            Resource::Water => "Water",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Resource::Electricity => "kW",
            Resource::Gas => "therm",
            Resource::Water => "US gal/min",
        }
    }

    /// Unit of a size-adjusted value.
    pub fn normalized_unit(self) -> &'static str {
        match self {
            Resource::Electricity => "kW/sq ft",
            Resource::Gas => "therm/sq ft",
            Resource::Water => "gal/min/sq ft",
        }
    }

    pub fn from_label(label: &str) -> Option<Resource> {
        Resource::ALL.into_iter().find(|r| r.label() == label)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resource {s:?} (expected electricity, gas or water)"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub hall: String,
    pub resource: Resource,
    pub value: f64,
}

/// One week's raw readings across all halls, decoded from the wide key format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReading {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub readings: Vec<MeterReading>,
}

impl WeeklyReading {
    /// Wide-format key, e.g. `"LXR - Gas : therm"`.
    pub fn key(hall: &str, resource: Resource) -> String {
        format!("{} - {} : {}", hall, resource.label(), resource.unit())
    }

    /// Hall names in the order they first appear.
    pub fn halls(&self) -> Vec<&str> {
        let mut halls: Vec<&str> = Vec::new();
        for r in &self.readings {
            if !halls.contains(&r.hall.as_str()) {
                halls.push(&r.hall);
            }
        }
        halls
    }

    /// Raw value for a hall and resource. A repeated key keeps the last value.
    pub fn value(&self, hall: &str, resource: Resource) -> Option<f64> {
        self.readings
            .iter()
            .rev()
            .find(|r| r.resource == resource && r.hall == hall)
            .map(|r| r.value)
    }

    /// Every hall that reported `resource`, in ingestion order.
    pub fn values_for(&self, resource: Resource) -> Vec<(&str, f64)> {
        self.halls()
            .into_iter()
            .filter_map(|hall| self.value(hall, resource).map(|v| (hall, v)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePoints {
    pub electricity: u32,
    pub gas: u32,
    pub water: u32,
    pub total: u32,
}

impl ResourcePoints {
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Electricity => self.electricity,
            Resource::Gas => self.gas,
            Resource::Water => self.water,
        }
    }

    pub fn set(&mut self, resource: Resource, points: u32) {
        match resource {
            Resource::Electricity => self.electricity = points,
            Resource::Gas => self.gas = points,
            Resource::Water => self.water = points,
        }
    }
}

/// Normalized per-square-foot values for the three resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub electricity: f64,
    pub gas: f64,
    pub water: f64,
}

impl Metrics {
    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Electricity => self.electricity,
            Resource::Gas => self.gas,
            Resource::Water => self.water,
        }
    }

    pub fn set(&mut self, resource: Resource, value: f64) {
        match resource {
            Resource::Electricity => self.electricity = value,
            Resource::Gas => self.gas = value,
            Resource::Water => self.water = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyHistoryEntry {
    pub week_number: usize,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub metrics: Metrics,
    /// Only `total` (cumulative after this week) is populated.
    pub points: ResourcePoints,
}

/// Dashboard view of one hall as of the latest week in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HallSnapshot {
    pub current: Metrics,
    pub points: ResourcePoints,
    pub weekly_history: Vec<WeeklyHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeRecord {
    /// Running total after each week.
    pub weekly_scores: Vec<u32>,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub week_number: usize,
    pub date: DateTime<Utc>,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub week_number: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current_week: bool,
    pub is_future: bool,
}
