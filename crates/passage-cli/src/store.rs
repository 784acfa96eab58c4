//! JSON file snapshot store: the whole planning state in one readable file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use passage_core::{RoutePoint, TimedWaypoint};
use passage_planner::SnapshotStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    route: Vec<RoutePoint>,
    #[serde(default)]
    waypoints: Vec<TimedWaypoint>,
}

/// Stores the route and its waypoints as pretty-printed JSON at a fixed
/// path. A missing file reads back as an empty snapshot so a fresh plan
/// starts from nothing.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Snapshot, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(error) => Err(error.into()),
        }
    }
}

impl SnapshotStore for JsonSnapshotStore {
    type Error = StoreError;

    fn load_route(&self) -> Result<Vec<RoutePoint>, StoreError> {
        Ok(self.read()?.route)
    }

    fn load_waypoints(&self) -> Result<Vec<TimedWaypoint>, StoreError> {
        Ok(self.read()?.waypoints)
    }

    fn save(&self, route: &[RoutePoint], waypoints: &[TimedWaypoint]) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            route: route.to_vec(),
            waypoints: waypoints.to_vec(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}
