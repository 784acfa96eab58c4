//! Vehicle profiles and speed normalization.

use crate::error::RouteError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    Kmh,
    Knots,
    Mph,
}

impl SpeedUnit {
    /// Convert a speed in this unit to the internal km/h representation.
    pub fn to_kmh(self, value: f64) -> f64 {
        match self {
            SpeedUnit::Kmh => value,
            SpeedUnit::Knots => value * 1.852,
            SpeedUnit::Mph => value * 1.609_344,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Boat,
    Car,
    Plane,
}

impl VehicleType {
    /// Valid cruising speed range in km/h, inclusive.
    pub fn speed_range_kmh(self) -> (f64, f64) {
        match self {
            VehicleType::Boat => (1.0, 120.0),
            VehicleType::Car => (1.0, 300.0),
            VehicleType::Plane => (50.0, 1200.0),
        }
    }
}

/// Named speed configuration consumed by the interpolator; never mutated by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub name: String,
    pub speed: f64,
    pub unit: SpeedUnit,
    pub vehicle_type: VehicleType,
}

impl VehicleProfile {
    pub fn new(
        name: impl Into<String>,
        speed: f64,
        unit: SpeedUnit,
        vehicle_type: VehicleType,
    ) -> Self {
        Self {
            name: name.into(),
            speed,
            unit,
            vehicle_type,
        }
    }

    /// Normalized speed in km/h, validated against the vehicle type's range.
    pub fn speed_kmh(&self) -> Result<f64, RouteError> {
        let kmh = self.unit.to_kmh(self.speed);
        let (min_kmh, max_kmh) = self.vehicle_type.speed_range_kmh();
        if !kmh.is_finite() || kmh <= 0.0 || kmh < min_kmh || kmh > max_kmh {
            return Err(RouteError::InvalidSpeed {
                speed_kmh: kmh,
                min_kmh,
                max_kmh,
            });
        }
        Ok(kmh)
    }
}
