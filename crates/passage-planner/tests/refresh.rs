//! End-to-end planner behavior against stub weather backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use passage_core::{
    Coordinate, RoutePoint, SpeedUnit, TimeWindow, VehicleProfile, VehicleType, WeatherParameter,
};
use passage_planner::{ProviderError, RawObservation, RoutePlanner, WeatherProvider};

fn departure() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 14, 10, 0, 0).unwrap()
}

fn route() -> Vec<RoutePoint> {
    // One degree of latitude (~111.2 km): at 100 km/h with a 30 minute
    // interval the leg carries two samples, for three waypoints total.
    vec![
        RoutePoint {
            position: 0,
            coordinate: Coordinate::new(0.0, 0.0),
        },
        RoutePoint {
            position: 1,
            coordinate: Coordinate::new(1.0, 0.0),
        },
    ]
}

fn boat() -> VehicleProfile {
    VehicleProfile::new("test boat", 100.0, SpeedUnit::Kmh, VehicleType::Boat)
}

fn hourly(window: TimeWindow, fill: impl Fn(&mut RawObservation)) -> Vec<RawObservation> {
    let mut observations = Vec::new();
    let mut ts = window.from;
    while ts < window.to {
        let mut obs = RawObservation::at(ts);
        fill(&mut obs);
        observations.push(obs);
        ts += Duration::hours(1);
    }
    observations
}

#[derive(Clone)]
struct ForecastStub {
    calls: Arc<AtomicUsize>,
}

impl ForecastStub {
    fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl WeatherProvider for ForecastStub {
    fn name(&self) -> &str {
        "forecast-stub"
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
        _coordinate: Coordinate,
        window: TimeWindow,
        _categories: &[WeatherParameter],
    ) -> Result<Vec<RawObservation>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(hourly(window, |obs| {
            obs.wind_direction_deg = Some(225.0);
            obs.wind_speed_kmh = Some(18.0);
            obs.condition_title = Some("partly cloudy".to_string());
            obs.is_daylight = Some(true);
        }))
    }
}

#[derive(Clone)]
struct MarineStub {
    calls: Arc<AtomicUsize>,
}

impl MarineStub {
    fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl WeatherProvider for MarineStub {
    fn name(&self) -> &str {
        "marine-stub"
    }

    fn supported(&self) -> &[WeatherParameter] {
        &[WeatherParameter::Current, WeatherParameter::Wave]
    }

    async fn fetch(
        &self,
        _coordinate: Coordinate,
        window: TimeWindow,
        _categories: &[WeatherParameter],
    ) -> Result<Vec<RawObservation>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(hourly(window, |obs| {
            obs.current_direction_deg = Some(90.0);
            obs.current_speed_kmh = Some(3.5);
            obs.wave_height_m = Some(1.2);
        }))
    }
}

struct FailingMarine;

impl WeatherProvider for FailingMarine {
    fn name(&self) -> &str {
        "failing-marine"
    }

    fn supported(&self) -> &[WeatherParameter] {
        &[WeatherParameter::Current, WeatherParameter::Wave]
    }

    async fn fetch(
        &self,
        _coordinate: Coordinate,
        _window: TimeWindow,
        _categories: &[WeatherParameter],
    ) -> Result<Vec<RawObservation>, ProviderError> {
        Err(ProviderError::Request("connection refused".to_string()))
    }
}

struct EmptyMarine;

impl WeatherProvider for EmptyMarine {
    fn name(&self) -> &str {
        "empty-marine"
    }

    fn supported(&self) -> &[WeatherParameter] {
        &[WeatherParameter::Current, WeatherParameter::Wave]
    }

    async fn fetch(
        &self,
        _coordinate: Coordinate,
        _window: TimeWindow,
        _categories: &[WeatherParameter],
    ) -> Result<Vec<RawObservation>, ProviderError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn refresh_populates_every_waypoint_from_both_tiers() {
    let mut planner = RoutePlanner::with_route(
        route(),
        boat(),
        departure(),
        Duration::minutes(30),
        ForecastStub::new(),
        MarineStub::new(),
    )
    .unwrap();
    assert_eq!(planner.waypoints().len(), 3);

    let summary = planner.refresh_weather(departure()).await;
    assert_eq!(summary.refreshed, 3);
    assert_eq!(summary.failed, 0);

    for waypoint in planner.waypoints() {
        assert!(!waypoint.records.is_empty());
        // Same-hour samples from the two backends coalesce into one record.
        let first = &waypoint.records[0];
        assert!(first.wind_direction_deg.is_some());
        assert!(first.current_direction_deg.is_some());
        assert!(first.wave_height_m.is_some());
        for pair in waypoint.records.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }
}

#[tokio::test]
async fn failed_marine_backend_does_not_block_forecast_data() {
    let mut planner = RoutePlanner::with_route(
        route(),
        boat(),
        departure(),
        Duration::minutes(30),
        ForecastStub::new(),
        FailingMarine,
    )
    .unwrap();

    let summary = planner.refresh_weather(departure()).await;
    assert_eq!(summary.refreshed, 3, "forecast data still lands");
    assert_eq!(summary.failed, 3, "every waypoint records the marine failure");
    assert_eq!(summary.errors.len(), 3);

    for waypoint in planner.waypoints() {
        assert!(waypoint.records.iter().any(|r| r.has_wind_data()));
        assert!(!waypoint.records.iter().any(|r| r.has_current_data()));
    }
}

#[tokio::test]
async fn empty_provider_response_is_reported_but_not_fatal() {
    let mut planner = RoutePlanner::with_route(
        route(),
        boat(),
        departure(),
        Duration::minutes(30),
        ForecastStub::new(),
        EmptyMarine,
    )
    .unwrap();

    let summary = planner.refresh_weather(departure()).await;
    assert_eq!(summary.refreshed, 3);
    assert_eq!(summary.failed, 3);
    for waypoint in planner.waypoints() {
        assert!(waypoint.records.iter().any(|r| r.has_wind_data()));
    }
}

#[tokio::test]
async fn sufficient_waypoints_are_not_fetched_again() {
    let forecast = ForecastStub::new();
    let marine = MarineStub::new();
    let forecast_calls = Arc::clone(&forecast.calls);
    let marine_calls = Arc::clone(&marine.calls);

    let mut planner = RoutePlanner::with_route(
        route(),
        boat(),
        departure(),
        Duration::minutes(30),
        forecast,
        marine,
    )
    .unwrap();

    planner.refresh_weather(departure()).await;
    let forecast_after_first = forecast_calls.load(Ordering::SeqCst);
    let marine_after_first = marine_calls.load(Ordering::SeqCst);
    assert_eq!(forecast_after_first, 3);
    assert_eq!(marine_after_first, 3);

    let summary = planner.refresh_weather(departure()).await;
    assert_eq!(summary.already_sufficient, 3);
    assert_eq!(summary.refreshed, 0);
    assert_eq!(forecast_calls.load(Ordering::SeqCst), forecast_after_first);
    assert_eq!(marine_calls.load(Ordering::SeqCst), marine_after_first);
}

#[tokio::test]
async fn departure_change_keeps_weather_by_position() {
    let mut planner = RoutePlanner::with_route(
        route(),
        boat(),
        departure(),
        Duration::minutes(30),
        ForecastStub::new(),
        MarineStub::new(),
    )
    .unwrap();
    planner.refresh_weather(departure()).await;
    let record_counts: Vec<usize> =
        planner.waypoints().iter().map(|w| w.records.len()).collect();

    let new_departure = departure() + Duration::days(1);
    planner.set_departure(new_departure).unwrap();

    assert_eq!(planner.waypoints()[0].timestamp, new_departure);
    let kept: Vec<usize> = planner.waypoints().iter().map(|w| w.records.len()).collect();
    assert_eq!(kept, record_counts, "weather survives the re-timing");
}

#[tokio::test]
async fn removing_a_route_point_truncates_surplus_waypoints() {
    let mut three_anchor_route = route();
    three_anchor_route.push(RoutePoint {
        position: 2,
        coordinate: Coordinate::new(2.0, 0.0),
    });

    let mut planner = RoutePlanner::with_route(
        three_anchor_route,
        boat(),
        departure(),
        Duration::minutes(30),
        ForecastStub::new(),
        MarineStub::new(),
    )
    .unwrap();
    assert_eq!(planner.waypoints().len(), 5);
    planner.refresh_weather(departure()).await;

    planner.remove_route_point(2).unwrap();
    assert_eq!(planner.route().len(), 2);
    assert_eq!(planner.waypoints().len(), 3);
    for waypoint in planner.waypoints() {
        assert!(!waypoint.records.is_empty(), "surviving positions keep data");
    }
}

#[tokio::test]
async fn restore_carries_persisted_weather_across_sessions() {
    let mut planner = RoutePlanner::with_route(
        route(),
        boat(),
        departure(),
        Duration::minutes(30),
        ForecastStub::new(),
        MarineStub::new(),
    )
    .unwrap();
    planner.refresh_weather(departure()).await;

    let saved_route = planner.route().to_vec();
    let saved_waypoints = planner.waypoints().to_vec();

    let restored = RoutePlanner::restore(
        saved_route,
        saved_waypoints,
        boat(),
        departure(),
        Duration::minutes(30),
        ForecastStub::new(),
        MarineStub::new(),
    )
    .unwrap();

    assert_eq!(restored.waypoints().len(), 3);
    for waypoint in restored.waypoints() {
        assert!(!waypoint.records.is_empty());
        assert_eq!(waypoint.timestamp.minute() % 30, 0);
    }
}

#[tokio::test]
async fn summary_reports_distance_and_arrival() {
    let planner = RoutePlanner::with_route(
        route(),
        boat(),
        departure(),
        Duration::minutes(30),
        ForecastStub::new(),
        MarineStub::new(),
    )
    .unwrap();

    let summary = planner.summary();
    assert_eq!(summary.leg_distances_m.len(), 1);
    assert!((summary.total_distance_m - 111_194.9).abs() < 100.0);
    assert_eq!(summary.waypoint_count, 3);
    assert!(summary.estimated_arrival.unwrap() > departure());
}
