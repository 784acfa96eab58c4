//! Route interpolation: anchors + speed + departure time -> timed waypoints.

use chrono::{DateTime, Duration, Utc};

use crate::error::RouteError;
use crate::geo;
use crate::models::{Coordinate, RoutePoint, TimedWaypoint};
use crate::vehicle::VehicleProfile;

/// Expand an ordered list of route points into a time-stamped waypoint
/// sequence.
///
/// The first route point is emitted as waypoint 0 at the departure time. Each
/// leg then contributes `floor(travelTime / interval)` samples, linearly
/// interpolated in latitude/longitude and stamped at whole interval steps
/// from the leg's start time. After a leg, the clock advances by the leg's
/// travel time plus one interval before the next leg's samples begin, so
/// spacing is non-uniform at leg boundaries.
///
/// Linear degree interpolation is not a geodesic arc; at the sampling scale
/// used the positional error is accepted and deliberately not compensated.
///
/// An empty route yields an empty sequence. A single-point route yields
/// exactly one waypoint. Positions are dense and strictly increasing;
/// timestamps are non-decreasing.
pub fn interpolate(
    route: &[RoutePoint],
    vehicle: &VehicleProfile,
    departure: DateTime<Utc>,
    interval: Duration,
) -> Result<Vec<TimedWaypoint>, RouteError> {
    let speed_kmh = vehicle.speed_kmh()?;
    let speed_mps = speed_kmh / 3.6;

    let interval_secs = interval.num_milliseconds() as f64 / 1000.0;
    if interval_secs <= 0.0 {
        return Err(RouteError::InvalidInterval {
            interval_secs: interval.num_seconds(),
        });
    }

    let Some(first) = route.first() else {
        return Ok(Vec::new());
    };

    let mut waypoints = vec![TimedWaypoint::new(0, first.coordinate, departure)];
    let mut current_time = departure;
    let mut position: u32 = 1;

    for pair in route.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let distance_m = geo::distance_m(from.coordinate, to.coordinate);
        let travel_secs = distance_m / speed_mps;

        // Legs shorter than one interval contribute no samples at all.
        let samples = (travel_secs / interval_secs).floor() as i64;

        for j in 1..=samples {
            let ratio = j as f64 / samples as f64;
            let coordinate = Coordinate::new(
                from.coordinate.lat + (to.coordinate.lat - from.coordinate.lat) * ratio,
                from.coordinate.lon + (to.coordinate.lon - from.coordinate.lon) * ratio,
            );
            waypoints.push(TimedWaypoint::new(
                position,
                coordinate,
                current_time + interval * j as i32,
            ));
            position += 1;
        }

        current_time = current_time
            + Duration::milliseconds((travel_secs * 1000.0).round() as i64)
            + interval;
    }

    Ok(waypoints)
}
