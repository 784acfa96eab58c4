//! Decides which weather categories still need fetching for a coordinate.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::models::{Coordinate, ParameterClass, WeatherParameter, WeatherRecord};

/// Per-waypoint record targets, reflecting typical multi-day hourly forecast
/// coverage. Fixed configuration, not derived.
pub const TIDE_CLASS_TARGET: usize = 60;
pub const WIND_CLASS_TARGET: usize = 200;

/// Return the categories that still need fetching at `coordinate`, given the
/// records a waypoint already holds.
///
/// A record counts toward a tier only when it matches the coordinate
/// (approximately), is not in the past, and actually carries that tier's
/// anchor field (current direction for tide, wind direction for wind). Stale
/// records encountered during the scan are evicted from the set, not merely
/// skipped: expired forecasts never count again and should not linger.
pub fn parameters_needed(
    records: &mut Vec<WeatherRecord>,
    coordinate: Coordinate,
    now: DateTime<Utc>,
) -> BTreeSet<WeatherParameter> {
    records.retain(|record| record.timestamp >= now);

    let tide_count = records
        .iter()
        .filter(|r| r.coordinate.approx_eq(&coordinate) && r.has_current_data())
        .count();
    let wind_count = records
        .iter()
        .filter(|r| r.coordinate.approx_eq(&coordinate) && r.has_wind_data())
        .count();

    let mut needed = BTreeSet::new();
    if tide_count < TIDE_CLASS_TARGET {
        needed.extend(ParameterClass::Tide.members());
    }
    if wind_count < WIND_CLASS_TARGET {
        needed.extend(ParameterClass::Wind.members());
    }
    needed
}
