//! The route planner: owns the route, regenerates waypoints on every change,
//! and drives provider fetches and reconciliation.

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

use passage_core::{
    geo, interpolate, merge, parameters_needed, Coordinate, ParameterClass, RefreshError,
    RouteError, RoutePoint, TimeWindow, TimedWaypoint, VehicleProfile, WeatherParameter,
    WeatherRecord, TIDE_CLASS_TARGET, WIND_CLASS_TARGET,
};

use crate::provider::WeatherProvider;

/// Outcome of one weather refresh pass. Failures are informational; the
/// refresh itself always completes.
#[derive(Debug, Default, Serialize)]
pub struct RefreshSummary {
    /// Waypoints that received at least one new record batch.
    pub refreshed: usize,
    /// Waypoints with at least one failed provider call.
    pub failed: usize,
    /// Waypoints that already met both coverage targets.
    pub already_sufficient: usize,
    #[serde(skip)]
    pub errors: Vec<RefreshError>,
}

/// Aggregate route figures derived from the anchors and the current waypoint
/// sequence.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub total_distance_m: f64,
    pub leg_distances_m: Vec<f64>,
    pub waypoint_count: usize,
    pub estimated_arrival: Option<DateTime<Utc>>,
}

struct WaypointFetch {
    position: u32,
    coordinate: Coordinate,
    records: Vec<WeatherRecord>,
    errors: Vec<RefreshError>,
}

/// Composes the interpolator, sufficiency evaluator and reconciler over two
/// provider ports: a general forecast backend (wind class) and a marine
/// backend (tide class).
///
/// Waypoints are value records keyed by `(route_id, position)`; every
/// mutation replaces the sequence wholesale, carrying weather history across
/// by position index.
pub struct RoutePlanner<F, M> {
    route_id: Uuid,
    route: Vec<RoutePoint>,
    vehicle: VehicleProfile,
    departure: DateTime<Utc>,
    interval: Duration,
    waypoints: Vec<TimedWaypoint>,
    forecast: F,
    marine: M,
}

impl<F, M> RoutePlanner<F, M>
where
    F: WeatherProvider,
    M: WeatherProvider,
{
    pub fn new(
        vehicle: VehicleProfile,
        departure: DateTime<Utc>,
        interval: Duration,
        forecast: F,
        marine: M,
    ) -> Self {
        Self {
            route_id: Uuid::new_v4(),
            route: Vec::new(),
            vehicle,
            departure,
            interval,
            waypoints: Vec::new(),
            forecast,
            marine,
        }
    }

    /// Build a planner around an existing route, interpolating immediately.
    pub fn with_route(
        route: Vec<RoutePoint>,
        vehicle: VehicleProfile,
        departure: DateTime<Utc>,
        interval: Duration,
        forecast: F,
        marine: M,
    ) -> Result<Self, RouteError> {
        let mut planner = Self::new(vehicle, departure, interval, forecast, marine);
        planner.route = route;
        planner.regenerate()?;
        Ok(planner)
    }

    /// Rebuild a planner from a persisted snapshot. The waypoints are
    /// re-interpolated against the stored route so timestamps and coordinates
    /// reflect the current vehicle and departure time, while stored weather
    /// is carried across by position.
    pub fn restore(
        route: Vec<RoutePoint>,
        waypoints: Vec<TimedWaypoint>,
        vehicle: VehicleProfile,
        departure: DateTime<Utc>,
        interval: Duration,
        forecast: F,
        marine: M,
    ) -> Result<Self, RouteError> {
        let mut planner = Self::new(vehicle, departure, interval, forecast, marine);
        planner.route = route;
        planner.waypoints = waypoints;
        planner.regenerate()?;
        Ok(planner)
    }

    pub fn route_id(&self) -> Uuid {
        self.route_id
    }

    pub fn route(&self) -> &[RoutePoint] {
        &self.route
    }

    /// Read-only view of the current waypoint sequence.
    pub fn waypoints(&self) -> &[TimedWaypoint] {
        &self.waypoints
    }

    pub fn vehicle(&self) -> &VehicleProfile {
        &self.vehicle
    }

    pub fn departure(&self) -> DateTime<Utc> {
        self.departure
    }

    /// Append a route point at the end of the path.
    pub fn add_route_point(&mut self, coordinate: Coordinate) -> Result<(), RouteError> {
        let position = self.route.len() as u32;
        self.route.push(RoutePoint {
            position,
            coordinate,
        });
        self.regenerate()
    }

    /// Remove the route point at `position`; later points shift down so
    /// ordinals stay dense.
    pub fn remove_route_point(&mut self, position: u32) -> Result<(), RouteError> {
        self.route.retain(|point| point.position != position);
        for (index, point) in self.route.iter_mut().enumerate() {
            point.position = index as u32;
        }
        self.regenerate()
    }

    /// Move an existing route point to a new coordinate.
    pub fn move_route_point(
        &mut self,
        position: u32,
        coordinate: Coordinate,
    ) -> Result<(), RouteError> {
        if let Some(point) = self.route.iter_mut().find(|p| p.position == position) {
            point.coordinate = coordinate;
        }
        self.regenerate()
    }

    pub fn set_vehicle(&mut self, vehicle: VehicleProfile) -> Result<(), RouteError> {
        // Validate up front so a rejected speed leaves the planner untouched.
        vehicle.speed_kmh()?;
        self.vehicle = vehicle;
        self.regenerate()
    }

    pub fn set_departure(&mut self, departure: DateTime<Utc>) -> Result<(), RouteError> {
        self.departure = departure;
        self.regenerate()
    }

    /// Recompute the waypoint sequence and reconcile it with the previous one
    /// by position index: coordinates and timestamps always come from the
    /// fresh interpolation, weather history is reused where the position
    /// still exists, surplus old positions are truncated and new positions
    /// start empty. Weather is never recomputed here.
    fn regenerate(&mut self) -> Result<(), RouteError> {
        let mut fresh = interpolate(&self.route, &self.vehicle, self.departure, self.interval)?;

        let previous = std::mem::take(&mut self.waypoints);
        for (waypoint, old) in fresh.iter_mut().zip(previous) {
            waypoint.records = old.records;
        }

        tracing::debug!(
            route_id = %self.route_id,
            waypoints = fresh.len(),
            "regenerated waypoint sequence"
        );
        self.waypoints = fresh;
        Ok(())
    }

    /// Aggregate distance and timing figures for the current route.
    pub fn summary(&self) -> RouteSummary {
        let leg_distances_m: Vec<f64> = self
            .route
            .windows(2)
            .map(|pair| geo::distance_m(pair[0].coordinate, pair[1].coordinate))
            .collect();
        RouteSummary {
            total_distance_m: leg_distances_m.iter().sum(),
            leg_distances_m,
            waypoint_count: self.waypoints.len(),
            estimated_arrival: self.waypoints.last().map(|w| w.timestamp),
        }
    }

    /// Refresh weather along the whole route.
    ///
    /// Sufficiency runs first, serially, so stale records are evicted before
    /// any provider call is issued. Fetches then fan out with one unit of
    /// work per waypoint; a failure at one waypoint or in one tier never
    /// aborts the others. Results are folded back serially, newest-fetched
    /// first, with a position/coordinate identity guard so late results for
    /// waypoints that no longer exist are discarded.
    pub async fn refresh_weather(&mut self, now: DateTime<Utc>) -> RefreshSummary {
        let mut requests = Vec::new();
        let mut already_sufficient = 0usize;
        for waypoint in &mut self.waypoints {
            let needed = parameters_needed(&mut waypoint.records, waypoint.coordinate, now);
            if needed.is_empty() {
                already_sufficient += 1;
            } else {
                requests.push((waypoint.position, waypoint.coordinate, needed));
            }
        }

        tracing::info!(
            route_id = %self.route_id,
            waypoints = self.waypoints.len(),
            to_fetch = requests.len(),
            "starting weather refresh"
        );

        let fetches = requests
            .iter()
            .map(|(position, coordinate, needed)| {
                self.fetch_waypoint(*position, *coordinate, needed, now)
            });
        let results = join_all(fetches).await;

        let mut summary = RefreshSummary {
            already_sufficient,
            ..RefreshSummary::default()
        };
        for outcome in results {
            for error in &outcome.errors {
                tracing::warn!(route_id = %self.route_id, "{error}");
            }

            let target = self
                .waypoints
                .iter_mut()
                .find(|w| w.position == outcome.position && w.coordinate.approx_eq(&outcome.coordinate));
            let Some(waypoint) = target else {
                tracing::debug!(
                    position = outcome.position,
                    "discarding fetch result for a waypoint that no longer exists"
                );
                continue;
            };

            if !outcome.records.is_empty() {
                let existing = std::mem::take(&mut waypoint.records);
                waypoint.records = merge(outcome.records, existing);
                summary.refreshed += 1;
            }
            if !outcome.errors.is_empty() {
                summary.failed += 1;
                summary.errors.extend(outcome.errors);
            }
        }

        tracing::info!(
            route_id = %self.route_id,
            refreshed = summary.refreshed,
            failed = summary.failed,
            "weather refresh complete"
        );
        summary
    }

    /// Fetch every needed tier for one waypoint. The two tiers are fetched
    /// concurrently and fail independently: a dead marine backend never
    /// blocks folding in a successful forecast response.
    async fn fetch_waypoint(
        &self,
        position: u32,
        coordinate: Coordinate,
        needed: &BTreeSet<WeatherParameter>,
        now: DateTime<Utc>,
    ) -> WaypointFetch {
        let wind_categories = class_subset(needed, ParameterClass::Wind);
        let tide_categories = class_subset(needed, ParameterClass::Tide);

        let (wind, tide) = tokio::join!(
            fetch_class(
                &self.forecast,
                ParameterClass::Wind,
                position,
                coordinate,
                &wind_categories,
                now,
            ),
            fetch_class(
                &self.marine,
                ParameterClass::Tide,
                position,
                coordinate,
                &tide_categories,
                now,
            ),
        );

        let mut fetch = WaypointFetch {
            position,
            coordinate,
            records: Vec::new(),
            errors: Vec::new(),
        };
        for outcome in [wind, tide].into_iter().flatten() {
            match outcome {
                Ok(records) => fetch.records.extend(records),
                Err(error) => fetch.errors.push(error),
            }
        }
        fetch
    }
}

fn class_subset(
    needed: &BTreeSet<WeatherParameter>,
    class: ParameterClass,
) -> Vec<WeatherParameter> {
    needed
        .iter()
        .copied()
        .filter(|parameter| parameter.class() == class)
        .collect()
}

/// Hourly coverage targets double as the fetch horizon for each tier.
fn horizon(class: ParameterClass) -> Duration {
    match class {
        ParameterClass::Tide => Duration::hours(TIDE_CLASS_TARGET as i64),
        ParameterClass::Wind => Duration::hours(WIND_CLASS_TARGET as i64),
    }
}

/// Query one provider for one tier. Returns `None` when there is nothing to
/// ask this backend for (tier already satisfied, or unsupported categories).
async fn fetch_class<P: WeatherProvider>(
    provider: &P,
    class: ParameterClass,
    position: u32,
    coordinate: Coordinate,
    categories: &[WeatherParameter],
    now: DateTime<Utc>,
) -> Option<Result<Vec<WeatherRecord>, RefreshError>> {
    let categories: Vec<WeatherParameter> = categories
        .iter()
        .copied()
        .filter(|category| provider.supported().contains(category))
        .collect();
    if categories.is_empty() {
        return None;
    }

    let window = TimeWindow {
        from: now,
        to: now + horizon(class),
    };
    tracing::debug!(
        provider = provider.name(),
        %class,
        position,
        categories = categories.len(),
        "fetching forecast"
    );

    match provider.fetch(coordinate, window, &categories).await {
        Ok(observations) if observations.is_empty() => {
            Some(Err(RefreshError::NoDataReturned { class, position }))
        }
        Ok(observations) => Some(Ok(observations
            .into_iter()
            .filter_map(|observation| observation.into_record(coordinate))
            .collect())),
        Err(error) => Some(Err(RefreshError::ProviderFailure {
            class,
            position,
            reason: error.to_string(),
        })),
    }
}
