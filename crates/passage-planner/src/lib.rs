//! Async orchestration for route planning: the planner aggregate, the
//! provider port for weather backends, and the persistence port for
//! snapshots. Pure route and weather logic lives in `passage-core`.

pub mod persistence;
pub mod planner;
pub mod provider;

pub use persistence::SnapshotStore;
pub use planner::{RefreshSummary, RoutePlanner, RouteSummary};
pub use provider::{ProviderError, RawObservation, WeatherProvider};
