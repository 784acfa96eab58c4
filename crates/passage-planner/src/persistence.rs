//! Snapshot persistence port.
//!
//! The planner treats storage as a pass-through snapshot store: it loads a
//! route and its waypoints on startup and saves them after mutations. Cache
//! policy is not implemented here; the sufficiency evaluator already decides
//! what is worth keeping.

use passage_core::{RoutePoint, TimedWaypoint};

pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_route(&self) -> Result<Vec<RoutePoint>, Self::Error>;

    fn load_waypoints(&self) -> Result<Vec<TimedWaypoint>, Self::Error>;

    fn save(&self, route: &[RoutePoint], waypoints: &[TimedWaypoint]) -> Result<(), Self::Error>;
}
