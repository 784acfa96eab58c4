//! Typed errors for the planning pipeline.

use crate::models::ParameterClass;
use thiserror::Error;

/// Errors raised while (re)computing the waypoint sequence.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    /// Non-positive or out-of-range vehicle speed. Rejected before any leg is
    /// interpolated; the route is never partially produced.
    #[error("invalid vehicle speed {speed_kmh:.1} km/h (allowed {min_kmh:.0}..={max_kmh:.0} km/h)")]
    InvalidSpeed {
        speed_kmh: f64,
        min_kmh: f64,
        max_kmh: f64,
    },

    /// Sampling interval must be strictly positive.
    #[error("invalid sampling interval of {interval_secs} seconds")]
    InvalidInterval { interval_secs: i64 },
}

/// Per-waypoint, per-tier failures during a weather refresh. Never fatal to
/// the refresh as a whole; collected into the refresh summary.
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    /// A provider call failed (network, auth, rate limit).
    #[error("{class} provider failed for waypoint {position}: {reason}")]
    ProviderFailure {
        class: ParameterClass,
        position: u32,
        reason: String,
    },

    /// A provider responded successfully but with an empty result set.
    #[error("{class} provider returned no data for waypoint {position}")]
    NoDataReturned { class: ParameterClass, position: u32 },
}

impl RefreshError {
    /// The waypoint index the failure belongs to.
    pub fn position(&self) -> u32 {
        match self {
            RefreshError::ProviderFailure { position, .. } => *position,
            RefreshError::NoDataReturned { position, .. } => *position,
        }
    }
}
