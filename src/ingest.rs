//! Ingestion of weekly readings
//!
//! Decodes the wide `"<Hall> - <Metric> : <Unit>"` key format into
//! [`WeeklyReading`] once, validates admin CSV entry, and imports or exports
//! directories of week files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{info, warn};
use regex::Regex;
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::error::{ChallengeError, Result};
use crate::models::{MeterReading, Resource, WeeklyReading};

pub const START_FIELD: &str = "startDateTime";
pub const END_FIELD: &str = "endDateTime";

const HALL_SEPARATOR: &str = " - ";

/// Splits `"<Hall> - <Metric> : <Unit>"` reading keys.
pub struct KeyParser {
    key_re: Regex,
}

impl KeyParser {
    pub fn new() -> Result<Self> {
        // Hall names never contain " - ", so the first separator ends the hall name.
        let key_re = Regex::new(r"^(?P<hall>.+?) - (?P<metric>[^:]+?) : (?P<unit>.+)$")?;
        Ok(Self { key_re })
    }

    /// Split a reading key into hall and resource.
    ///
    /// Returns `None` for keys that are not readings (no `" - "`), and an error
    /// for keys that look like readings but do not follow the format.
    pub fn parse(&self, key: &str) -> Option<Result<(String, Resource)>> {
        if !key.contains(HALL_SEPARATOR) {
            return None;
        }
        let parsed = self.key_re.captures(key).and_then(|cap| {
            let resource = Resource::from_label(cap["metric"].trim())?;
            Some((cap["hall"].to_string(), resource))
        });
        Some(parsed.ok_or_else(|| ChallengeError::MalformedKey(key.to_string())))
    }
}

fn parse_timestamp(map: &Map<String, Value>, field: &'static str) -> Result<DateTime<Utc>> {
    let raw = map
        .get(field)
        .and_then(Value::as_str)
        .ok_or(ChallengeError::MissingField(field))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ChallengeError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}

fn reading_value(key: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ChallengeError::InvalidReading {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Decode one week from its wide key/value form.
pub fn decode_wide_week(map: &Map<String, Value>) -> Result<WeeklyReading> {
    let start = parse_timestamp(map, START_FIELD)?;
    let end = parse_timestamp(map, END_FIELD)?;
    let keys = KeyParser::new()?;

    let mut readings = Vec::new();
    for (key, value) in map {
        let Some(parsed) = keys.parse(key) else {
            continue;
        };
        let (hall, resource) = parsed?;
        readings.push(MeterReading {
            hall,
            resource,
            value: reading_value(key, value)?,
        });
    }

    Ok(WeeklyReading {
        start,
        end,
        readings,
    })
}

/// Inverse of [`decode_wide_week`].
pub fn encode_wide_week(week: &WeeklyReading) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        START_FIELD.to_string(),
        Value::String(week.start.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    map.insert(
        END_FIELD.to_string(),
        Value::String(week.end.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    for r in &week.readings {
        map.insert(WeeklyReading::key(&r.hall, r.resource), Value::from(r.value));
    }
    map
}

/// Validate admin CSV entry: exactly `hall_count * 3` non-negative numbers.
///
/// Checks run in order (count, numeric, sign) and the first failure is returned.
pub fn parse_admin_csv(input: &str, hall_count: usize) -> Result<Vec<f64>> {
    let fields: Vec<&str> = input.trim().split(',').map(str::trim).collect();

    let expected = hall_count * Resource::ALL.len();
    if fields.len() != expected {
        return Err(ChallengeError::InvalidValueCount {
            expected,
            actual: fields.len(),
        });
    }

    let mut values = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        match field.parse::<f64>() {
            Ok(v) if v.is_finite() => values.push(v),
            _ => {
                return Err(ChallengeError::NonNumericValue {
                    position: index + 1,
                    value: field.to_string(),
                });
            }
        }
    }

    if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| **v < 0.0) {
        return Err(ChallengeError::NegativeValue {
            position: index + 1,
            value: *value,
        });
    }

    Ok(values)
}

/// Build a week from hall-major values (electricity, gas, water per hall).
pub fn week_from_values<'a>(
    halls: impl IntoIterator<Item = &'a str>,
    values: &[f64],
    start: DateTime<Utc>,
) -> WeeklyReading {
    let readings = halls
        .into_iter()
        .zip(values.chunks(Resource::ALL.len()))
        .flat_map(|(hall, chunk)| {
            Resource::ALL
                .into_iter()
                .zip(chunk.iter())
                .map(move |(resource, value)| MeterReading {
                    hall: hall.to_string(),
                    resource,
                    value: *value,
                })
        })
        .collect();

    WeeklyReading {
        start,
        end: start + Duration::days(6),
        readings,
    }
}

/// Find all week files (`*.json`) under a directory
pub fn find_week_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

fn read_week_file(path: &Path) -> anyhow::Result<Option<WeeklyReading>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let Value::Object(map) = value else {
        return Ok(None);
    };
    let week =
        decode_wide_week(&map).with_context(|| format!("Invalid week in {}", path.display()))?;
    Ok(Some(week))
}

/// Import every week file under `dir`, ordered by week start.
pub fn import_dir(dir: &Path) -> anyhow::Result<(Vec<WeeklyReading>, ImportStats)> {
    anyhow::ensure!(dir.is_dir(), "{} is not a directory", dir.display());

    let mut stats = ImportStats::default();
    let mut weeks = Vec::new();

    let files = find_week_files(dir);
    info!("Found {} week files in {}", files.len(), dir.display());

    for path in &files {
        match read_week_file(path) {
            Ok(Some(week)) => {
                stats.weeks += 1;
                stats.readings += week.readings.len();
                weeks.push(week);
            }
            Ok(None) => {
                warn!("Skipping {}: not a week object", path.display());
                stats.skipped += 1;
            }
            Err(e) => {
                warn!("{e:#}");
                stats.errors += 1;
            }
        }
    }

    weeks.sort_by_key(|w| w.start);
    Ok((weeks, stats))
}

/// Imported weeks may only extend the history: each must start after the
/// latest stored week ends.
pub fn ensure_appendable(
    history: &[WeeklyReading],
    incoming: &[WeeklyReading],
) -> anyhow::Result<()> {
    let Some(latest) = history.last() else {
        return Ok(());
    };
    let Some(earliest) = incoming.iter().min_by_key(|w| w.start) else {
        return Ok(());
    };
    anyhow::ensure!(
        earliest.start > latest.end,
        "Week starting {} overlaps stored history ending {}; use --clear to replace it",
        earliest.start.to_rfc3339(),
        latest.end.to_rfc3339()
    );
    Ok(())
}

/// Write one `week-NN.json` file per week in wide format.
pub fn export_dir(weeks: &[WeeklyReading], dir: &Path) -> anyhow::Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    for (index, week) in weeks.iter().enumerate() {
        let path = dir.join(format!("week-{:02}.json", index + 1));
        let json = serde_json::to_string_pretty(&Value::Object(encode_wide_week(week)))?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(weeks.len())
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub weeks: usize,
    pub readings: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} weeks ({} readings). Skipped: {}, Errors: {}",
            self.weeks, self.readings, self.skipped, self.errors
        )
    }
}
