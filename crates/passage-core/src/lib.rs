//! Core logic for travel-route interpolation and multi-provider weather
//! reconciliation: geodesic math, timed waypoint generation, sufficiency
//! policy and record merging. No I/O and no async runtime; orchestration
//! lives in `passage-planner`.

pub mod error;
pub mod geo;
pub mod interpolate;
pub mod models;
pub mod reconcile;
pub mod sufficiency;
pub mod vehicle;

pub use error::{RefreshError, RouteError};
pub use interpolate::interpolate;
pub use models::{
    Coordinate, ParameterClass, RoutePoint, TimeWindow, TimedWaypoint, WeatherParameter,
    WeatherRecord, COORD_EPSILON_DEG,
};
pub use reconcile::merge;
pub use sufficiency::{parameters_needed, TIDE_CLASS_TARGET, WIND_CLASS_TARGET};
pub use vehicle::{SpeedUnit, VehicleProfile, VehicleType};
