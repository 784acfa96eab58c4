//! Core data models for route planning and weather reconciliation.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Approximate-equality tolerance for coordinates, in degrees.
///
/// Repeated interpolation drifts coordinates by fractions of a millidegree;
/// records fetched for "the same place" must still match.
pub const COORD_EPSILON_DEG: f64 = 0.01;

/// A latitude/longitude pair in decimal degrees (WGS-84 sphere approximation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Approximate equality within [`COORD_EPSILON_DEG`] on both axes.
    pub fn approx_eq(&self, other: &Coordinate) -> bool {
        (self.lat - other.lat).abs() <= COORD_EPSILON_DEG
            && (self.lon - other.lon).abs() <= COORD_EPSILON_DEG
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// User-placed anchor defining the path, independent of time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePoint {
    /// 0-based ordinal; dense, no gaps.
    pub position: u32,
    pub coordinate: Coordinate,
}

/// Generated, timestamped sample along the interpolated route.
///
/// Owns its weather history; records are kept sorted ascending by timestamp
/// and are never shared across waypoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedWaypoint {
    /// Index in the generated sequence.
    pub position: u32,
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub records: Vec<WeatherRecord>,
}

impl TimedWaypoint {
    pub fn new(position: u32, coordinate: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            position,
            coordinate,
            timestamp,
            records: Vec::new(),
        }
    }
}

/// One forecast sample for one coordinate and time.
///
/// Every measurement is independently optional: `None` means not yet fetched,
/// or not supplied by any provider. Canonical units are km/h for speeds,
/// degrees for directions and meters for lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub wind_direction_deg: Option<f64>,
    #[serde(default)]
    pub wind_speed_kmh: Option<f64>,
    #[serde(default)]
    pub wind_gust_kmh: Option<f64>,
    #[serde(default)]
    pub current_direction_deg: Option<f64>,
    #[serde(default)]
    pub current_speed_kmh: Option<f64>,
    #[serde(default)]
    pub wave_direction_deg: Option<f64>,
    #[serde(default)]
    pub wave_height_m: Option<f64>,
    #[serde(default)]
    pub condition_title: Option<String>,
    #[serde(default)]
    pub condition_icon: Option<String>,
    #[serde(default)]
    pub is_daylight: Option<bool>,
}

impl WeatherRecord {
    /// A record with no measurements yet.
    pub fn empty(coordinate: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            timestamp,
            wind_direction_deg: None,
            wind_speed_kmh: None,
            wind_gust_kmh: None,
            current_direction_deg: None,
            current_speed_kmh: None,
            wave_direction_deg: None,
            wave_height_m: None,
            condition_title: None,
            condition_icon: None,
            is_daylight: None,
        }
    }

    /// Two records are the same forecast sample when their coordinates match
    /// approximately and their timestamps fall in the same calendar hour.
    ///
    /// Hour equality compares date and hour-of-day components, not a fixed
    /// time delta: 14:59 and 15:01 are distinct samples even though they are
    /// two minutes apart. Hourly forecast granularity makes this workable,
    /// but samples near hour boundaries from different providers will not
    /// deduplicate. Preserved literally; do not switch to a window compare.
    pub fn same_sample(&self, other: &WeatherRecord) -> bool {
        self.coordinate.approx_eq(&other.coordinate)
            && self.timestamp.date_naive() == other.timestamp.date_naive()
            && self.timestamp.hour() == other.timestamp.hour()
    }

    /// Whether the tide-class side of this record is populated.
    pub fn has_current_data(&self) -> bool {
        self.current_direction_deg.is_some()
    }

    /// Whether the wind-class side of this record is populated.
    pub fn has_wind_data(&self) -> bool {
        self.wind_direction_deg.is_some()
    }
}

/// A weather data category, as selected for display and as requested from
/// providers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WeatherParameter {
    Wind,
    Current,
    Wave,
    Conditions,
    Solar,
}

impl WeatherParameter {
    pub const ALL: [WeatherParameter; 5] = [
        WeatherParameter::Wind,
        WeatherParameter::Current,
        WeatherParameter::Wave,
        WeatherParameter::Conditions,
        WeatherParameter::Solar,
    ];

    /// The provider coverage tier this category belongs to.
    pub fn class(self) -> ParameterClass {
        match self {
            WeatherParameter::Current | WeatherParameter::Wave => ParameterClass::Tide,
            WeatherParameter::Wind | WeatherParameter::Conditions | WeatherParameter::Solar => {
                ParameterClass::Wind
            }
        }
    }
}

impl fmt::Display for WeatherParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeatherParameter::Wind => "wind",
            WeatherParameter::Current => "current",
            WeatherParameter::Wave => "wave",
            WeatherParameter::Conditions => "conditions",
            WeatherParameter::Solar => "solar",
        };
        f.write_str(name)
    }
}

/// Provider coverage tier used by the sufficiency policy: marine backends
/// supply current/wave, general forecast backends supply the rest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ParameterClass {
    Tide,
    Wind,
}

impl ParameterClass {
    /// The categories that make up this tier.
    pub fn members(self) -> &'static [WeatherParameter] {
        match self {
            ParameterClass::Tide => &[WeatherParameter::Current, WeatherParameter::Wave],
            ParameterClass::Wind => &[
                WeatherParameter::Wind,
                WeatherParameter::Conditions,
                WeatherParameter::Solar,
            ],
        }
    }
}

impl fmt::Display for ParameterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterClass::Tide => f.write_str("tide"),
            ParameterClass::Wind => f.write_str("wind"),
        }
    }
}

/// Forecast horizon handed to a provider fetch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn coordinate_approx_eq_absorbs_interpolation_drift() {
        let a = Coordinate::new(51.5074, -0.1278);
        let b = Coordinate::new(51.5099, -0.1299);
        assert!(a.approx_eq(&b));

        let far = Coordinate::new(51.52, -0.1278);
        assert!(!a.approx_eq(&far));
    }

    #[test]
    fn same_sample_uses_calendar_hour_not_a_window() {
        let coord = Coordinate::new(51.5, -0.1);
        let a = WeatherRecord::empty(coord, Utc.with_ymd_and_hms(2023, 6, 14, 14, 59, 0).unwrap());
        let b = WeatherRecord::empty(coord, Utc.with_ymd_and_hms(2023, 6, 14, 15, 1, 0).unwrap());
        let c = WeatherRecord::empty(coord, Utc.with_ymd_and_hms(2023, 6, 14, 14, 1, 0).unwrap());
        let next_day = WeatherRecord::empty(
            coord,
            Utc.with_ymd_and_hms(2023, 6, 15, 14, 30, 0).unwrap(),
        );

        assert!(!a.same_sample(&b), "two minutes apart but different hours");
        assert!(a.same_sample(&c), "58 minutes apart but same hour bucket");
        assert!(!a.same_sample(&next_day), "same hour of day, different date");
    }

    #[test]
    fn weather_record_fields_default_to_absent_when_deserialized() {
        let json = r#"{
            "coordinate": {"lat": 51.5, "lon": -0.12},
            "timestamp": "2023-06-14T10:00:00Z",
            "wind_direction_deg": 180.0
        }"#;
        let record: WeatherRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.wind_direction_deg, Some(180.0));
        assert_eq!(record.wave_height_m, None);
        assert_eq!(record.condition_title, None);
    }

    #[test]
    fn parameter_classes_partition_all_categories() {
        let mut seen: Vec<WeatherParameter> = ParameterClass::Tide
            .members()
            .iter()
            .chain(ParameterClass::Wind.members())
            .copied()
            .collect();
        seen.sort();
        let mut all = WeatherParameter::ALL.to_vec();
        all.sort();
        assert_eq!(seen, all);
    }
}
