//! Offline building blocks for the `passage` binary: synthetic weather
//! backends and a JSON snapshot store.

pub mod store;
pub mod synthetic;

pub use store::{JsonSnapshotStore, StoreError};
pub use synthetic::{SyntheticForecast, SyntheticMarine};
