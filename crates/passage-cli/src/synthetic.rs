//! Synthetic weather backends so the whole pipeline runs offline.
//!
//! Values follow simple diurnal/coordinate-driven curves with random jitter
//! on top, enough to exercise reconciliation and display without any
//! network access.

use chrono::{Duration, Timelike};
use passage_core::{Coordinate, TimeWindow, WeatherParameter};
use passage_planner::{ProviderError, RawObservation, WeatherProvider};
use rand::Rng;

const CONDITIONS: [(&str, &str); 4] = [
    ("clear", "01d"),
    ("partly cloudy", "02d"),
    ("overcast", "04d"),
    ("light rain", "10d"),
];

fn hourly_stamps(window: TimeWindow) -> Vec<chrono::DateTime<chrono::Utc>> {
    let mut stamps = Vec::new();
    let mut ts = window.from;
    while ts < window.to {
        stamps.push(ts);
        ts += Duration::hours(1);
    }
    stamps
}

/// Offline stand-in for a general forecast backend: wind, sky conditions
/// and daylight.
pub struct SyntheticForecast;

impl WeatherProvider for SyntheticForecast {
    fn name(&self) -> &str {
        "synthetic-forecast"
    }

    fn supported(&self) -> &[WeatherParameter] {
        &[
            WeatherParameter::Wind,
            WeatherParameter::Conditions,
            WeatherParameter::Solar,
        ]
    }

    async fn fetch(
        &self,
        coordinate: Coordinate,
        window: TimeWindow,
        _categories: &[WeatherParameter],
    ) -> Result<Vec<RawObservation>, ProviderError> {
        let mut rng = rand::rng();
        let base_direction = (coordinate.lon.abs() * 37.0) % 360.0;

        Ok(hourly_stamps(window)
            .into_iter()
            .map(|ts| {
                let hour = ts.hour() as f64;
                let mut obs = RawObservation::at(ts);
                obs.wind_direction_deg =
                    Some((base_direction + hour * 3.0 + rng.random_range(-10.0..10.0)).rem_euclid(360.0));
                // Light diurnal cycle: breezier in the afternoon.
                let speed = 12.0 + 6.0 * ((hour - 14.0) / 24.0 * std::f64::consts::TAU).cos();
                obs.wind_speed_kmh = Some(speed + rng.random_range(-2.0..2.0));
                obs.wind_gust_kmh = Some(speed * rng.random_range(1.2..1.6));
                let (title, icon) = CONDITIONS[rng.random_range(0..CONDITIONS.len())];
                obs.condition_title = Some(title.to_string());
                obs.condition_icon = Some(icon.to_string());
                obs.is_daylight = Some((6..20).contains(&ts.hour()));
                obs
            })
            .collect())
    }
}

/// Offline stand-in for a marine backend: currents and waves.
pub struct SyntheticMarine;

impl WeatherProvider for SyntheticMarine {
    fn name(&self) -> &str {
        "synthetic-marine"
    }

    fn supported(&self) -> &[WeatherParameter] {
        &[WeatherParameter::Current, WeatherParameter::Wave]
    }

    async fn fetch(
        &self,
        coordinate: Coordinate,
        window: TimeWindow,
        _categories: &[WeatherParameter],
    ) -> Result<Vec<RawObservation>, ProviderError> {
        let mut rng = rand::rng();
        let base_direction = (coordinate.lat.abs() * 53.0) % 360.0;

        Ok(hourly_stamps(window)
            .into_iter()
            .map(|ts| {
                // Rough semi-diurnal tide: two peaks a day.
                let phase = ts.hour() as f64 / 12.42 * std::f64::consts::TAU;
                let mut obs = RawObservation::at(ts);
                obs.current_direction_deg =
                    Some((base_direction + rng.random_range(-15.0..15.0)).rem_euclid(360.0));
                obs.current_speed_kmh = Some((2.0 + 1.5 * phase.sin()).max(0.1));
                obs.wave_direction_deg =
                    Some((base_direction + 180.0 + rng.random_range(-20.0..20.0)).rem_euclid(360.0));
                obs.wave_height_m = Some((0.8 + 0.6 * phase.sin().abs()) + rng.random_range(0.0..0.3));
                obs
            })
            .collect())
    }
}
