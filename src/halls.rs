//! Participating halls, their floor areas, and per-square-foot normalization

/// Floor area in square feet, in the fixed roster order used by admin CSV entry.
pub const BUILDING_SIZES: [(&str, f64); 20] = [
    ("Darnall Hall", 130_000.0),
    ("Harbin Hall", 120_000.0),
    ("New South Hall", 175_000.0),
    ("Village C West", 115_000.0),
    ("Village C East", 115_000.0),
    ("Copley Hall", 140_000.0),
    ("Kennedy Hall", 75_000.0),
    ("McCarthy Hall", 160_000.0),
    ("Reynolds Hall", 115_000.0),
    ("Ryan Hall", 100_000.0),
    ("Pedro Arrupe Hall", 220_000.0),
    ("Henle Village", 130_000.0),
    ("LXR", 90_000.0),
    ("Nevils", 85_000.0),
    ("Alumni Square", 80_000.0),
    ("Village A", 100_000.0),
    ("Village B", 80_000.0),
    ("Magis Row", 15_000.0),
    ("Ida Ryan Hall", 20_000.0),
    ("Isaac Hawkins Hall", 40_000.0),
];

/// Hall names in roster order.
pub fn roster() -> impl Iterator<Item = &'static str> {
    BUILDING_SIZES.iter().map(|(name, _)| *name)
}

pub fn building_size(hall: &str) -> Option<f64> {
    BUILDING_SIZES
        .iter()
        .find(|(name, _)| *name == hall)
        .map(|(_, size)| *size)
}

/// Size-adjusted value. Halls without a known size pass through unchanged.
pub fn normalize(hall: &str, raw: f64) -> f64 {
    match building_size(hall) {
        Some(size) if size > 0.0 => raw / size,
        _ => raw,
    }
}
