use std::fs;

use chrono::{Duration, TimeZone, Utc};
use green_challenge::ChallengeError;
use green_challenge::ingest::{
    decode_wide_week, ensure_appendable, export_dir, import_dir, parse_admin_csv,
    week_from_values,
};
use green_challenge::models::{Resource, WeeklyReading};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use tempfile::TempDir;

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn sample_week() -> Map<String, Value> {
    object(json!({
        "startDateTime": "2024-01-08T00:00:00.000Z",
        "endDateTime": "2024-01-14T00:00:00.000Z",
        "LXR - Electricity : kW": 120000,
        "LXR - Gas : therm": "3100.5",
        "LXR - Water : US gal/min": 40000,
        "Village C West - Electricity : kW": 99000
    }))
}

#[test]
fn decodes_wide_keys_once() {
    let week = decode_wide_week(&sample_week()).unwrap();

    assert_eq!(week.start, Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap());
    assert_eq!(week.end - week.start, Duration::days(6));
    assert_eq!(week.readings.len(), 4);
    assert_eq!(week.value("LXR", Resource::Gas), Some(3100.5));
    assert_eq!(week.value("Village C West", Resource::Electricity), Some(99000.0));
    assert_eq!(week.value("Village C West", Resource::Water), None);
}

#[test]
fn rejects_bad_weeks() {
    let mut missing = sample_week();
    missing.remove("startDateTime");
    assert_eq!(
        decode_wide_week(&missing),
        Err(ChallengeError::MissingField("startDateTime"))
    );

    let mut bad_time = sample_week();
    bad_time.insert("endDateTime".into(), json!("next tuesday"));
    assert!(matches!(
        decode_wide_week(&bad_time),
        Err(ChallengeError::InvalidTimestamp { field: "endDateTime", .. })
    ));

    let mut text = sample_week();
    text.insert("LXR - Gas : therm".into(), json!("lots"));
    assert!(matches!(
        decode_wide_week(&text),
        Err(ChallengeError::InvalidReading { .. })
    ));

    let mut negative = sample_week();
    negative.insert("LXR - Water : US gal/min".into(), json!(-4));
    assert!(matches!(
        decode_wide_week(&negative),
        Err(ChallengeError::InvalidReading { .. })
    ));

    let mut steam = sample_week();
    steam.insert("LXR - Steam : lb".into(), json!(1));
    assert_eq!(
        decode_wide_week(&steam),
        Err(ChallengeError::MalformedKey("LXR - Steam : lb".into()))
    );
}

#[test]
fn csv_validation_reports_count_first() {
    assert_eq!(
        parse_admin_csv("1,2", 1),
        Err(ChallengeError::InvalidValueCount {
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(
        parse_admin_csv("", 20),
        Err(ChallengeError::InvalidValueCount {
            expected: 60,
            actual: 1
        })
    );
}

#[test]
fn csv_validation_reports_non_numeric_before_negative() {
    assert_eq!(
        parse_admin_csv("-1,x,3", 1),
        Err(ChallengeError::NonNumericValue {
            position: 2,
            value: "x".into()
        })
    );
    assert_eq!(
        parse_admin_csv("1,NaN,3", 1),
        Err(ChallengeError::NonNumericValue {
            position: 2,
            value: "NaN".into()
        })
    );
    assert_eq!(
        parse_admin_csv("1,2,-3", 1),
        Err(ChallengeError::NegativeValue {
            position: 3,
            value: -3.0
        })
    );
}

#[test]
fn csv_tolerates_surrounding_whitespace() {
    assert_eq!(parse_admin_csv(" 1, 2.5 ,0\n", 1), Ok(vec![1.0, 2.5, 0.0]));
}

#[test]
fn values_map_hall_major() {
    let start = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
    let week = week_from_values(["A", "B"], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], start);

    assert_eq!(week.end, start + Duration::days(6));
    assert_eq!(week.halls(), vec!["A", "B"]);
    assert_eq!(week.value("A", Resource::Water), Some(3.0));
    assert_eq!(week.value("B", Resource::Electricity), Some(4.0));
    assert_eq!(WeeklyReading::key("B", Resource::Water), "B - Water : US gal/min");
}

#[test]
fn import_orders_weeks_and_counts_problems() {
    let dir = TempDir::new().unwrap();
    let later = json!({
        "startDateTime": "2024-01-15T00:00:00.000Z",
        "endDateTime": "2024-01-21T00:00:00.000Z",
        "LXR - Electricity : kW": 2
    });
    fs::write(dir.path().join("a.json"), later.to_string()).unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(
        dir.path().join("nested/b.json"),
        Value::Object(sample_week()).to_string(),
    )
    .unwrap();
    fs::write(dir.path().join("list.json"), "[1, 2]").unwrap();
    fs::write(dir.path().join("broken.json"), "{").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let (weeks, stats) = import_dir(dir.path()).unwrap();

    assert_eq!((stats.weeks, stats.readings, stats.skipped, stats.errors), (2, 5, 1, 1));
    assert_eq!(weeks[0].value("LXR", Resource::Electricity), Some(120000.0));
    assert_eq!(weeks[1].value("LXR", Resource::Electricity), Some(2.0));
    assert!(stats.to_string().starts_with("Imported 2 weeks (5 readings)"));
}

#[test]
fn import_requires_a_directory() {
    let dir = TempDir::new().unwrap();
    assert!(import_dir(&dir.path().join("missing")).is_err());
}

#[test]
fn exported_files_import_back() {
    let exported = decode_wide_week(&sample_week()).unwrap();
    let dir = TempDir::new().unwrap();

    assert_eq!(export_dir(&[exported.clone()], dir.path()).unwrap(), 1);
    assert!(dir.path().join("week-01.json").exists());

    let (weeks, _) = import_dir(dir.path()).unwrap();
    assert_eq!(weeks, vec![exported]);
}

#[test]
fn import_only_extends_history() {
    let stored = decode_wide_week(&sample_week()).unwrap();
    let history = vec![stored.clone()];

    let err = ensure_appendable(&history, &[stored.clone()]).unwrap_err();
    assert!(err.to_string().contains("--clear"));

    let mut next = stored.clone();
    next.start = stored.start + Duration::days(7);
    next.end = stored.end + Duration::days(7);
    assert!(ensure_appendable(&history, &[next.clone()]).is_ok());
    assert!(ensure_appendable(&[], &[stored.clone()]).is_ok());
    assert!(ensure_appendable(&history, &[]).is_ok());
    // Any older week in the batch is refused.
    assert!(ensure_appendable(&history, &[next, stored]).is_err());
}
