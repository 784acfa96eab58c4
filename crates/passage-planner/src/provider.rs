//! Weather provider port and the raw-observation conversion contract.

use chrono::{DateTime, Utc};
use passage_core::{Coordinate, TimeWindow, WeatherParameter, WeatherRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a provider call failed. The planner treats all of these the same way:
/// log, count, keep going.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("rate limited")]
    RateLimited,
    #[error("authentication failed")]
    Auth,
}

/// One raw forecast sample as translated by a provider adapter, already
/// normalized to canonical units: speeds in km/h, directions in degrees,
/// lengths in meters. Fields a backend does not supply stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawObservation {
    pub timestamp: Option<DateTime<Utc>>,
    pub wind_direction_deg: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_gust_kmh: Option<f64>,
    pub current_direction_deg: Option<f64>,
    pub current_speed_kmh: Option<f64>,
    pub wave_direction_deg: Option<f64>,
    pub wave_height_m: Option<f64>,
    pub condition_title: Option<String>,
    pub condition_icon: Option<String>,
    pub is_daylight: Option<bool>,
}

impl RawObservation {
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Self::default()
        }
    }

    /// Attach the waypoint coordinate to produce a canonical record.
    /// Observations without a timestamp cannot be bucketed and are dropped
    /// by the caller.
    pub fn into_record(self, coordinate: Coordinate) -> Option<WeatherRecord> {
        let timestamp = self.timestamp?;
        Some(WeatherRecord {
            coordinate,
            timestamp,
            wind_direction_deg: self.wind_direction_deg,
            wind_speed_kmh: self.wind_speed_kmh,
            wind_gust_kmh: self.wind_gust_kmh,
            current_direction_deg: self.current_direction_deg,
            current_speed_kmh: self.current_speed_kmh,
            wave_direction_deg: self.wave_direction_deg,
            wave_height_m: self.wave_height_m,
            condition_title: self.condition_title,
            condition_icon: self.condition_icon,
            is_daylight: self.is_daylight,
        })
    }
}

/// Network boundary to one weather backend.
///
/// Implementations own their transport concerns, including timeouts; the
/// planner only ever sees the final result. A backend is queried only for
/// the categories it reports as supported.
#[allow(async_fn_in_trait)]
pub trait WeatherProvider {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Categories this backend can supply.
    fn supported(&self) -> &[WeatherParameter];

    async fn fetch(
        &self,
        coordinate: Coordinate,
        window: TimeWindow,
        categories: &[WeatherParameter],
    ) -> Result<Vec<RawObservation>, ProviderError>;
}
