//! Snapshot cache for forecast bundles.
//!
//! One JSON file per location key under the platform cache directory. A
//! snapshot is fresh for a short revalidation window; after that callers
//! fetch live data again, and keep the stale snapshot around as a fallback
//! for when the live fetch fails.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::ForecastBundle;

/// How long a stored snapshot counts as fresh, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// A forecast bundle with the time it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub bundle: ForecastBundle,
}

impl Snapshot {
    pub fn new(bundle: ForecastBundle) -> Self {
        Self {
            fetched_at: Utc::now(),
            bundle,
        }
    }

    /// Fresh means fetched within the TTL window. A timestamp in the future
    /// (clock skew, restored backup) is treated as stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl_secs: u64) -> bool {
        let age = now.signed_duration_since(self.fetched_at).num_seconds();
        age >= 0 && (age as u64) < ttl_secs
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open the store in the platform cache directory.
    pub fn open() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform cache directory"))?;
        Ok(Self {
            dir: dirs.cache_dir().to_path_buf(),
        })
    }

    /// Open the store in an explicit directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the snapshot for a location key. Missing or unreadable snapshots
    /// load as absent; a corrupt cache never blocks a live fetch.
    pub fn load(&self, key: &str) -> Option<Snapshot> {
        let path = self.path_for(key);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::debug!("discarding corrupt snapshot {}: {err}", path.display());
                None
            }
        }
    }

    /// Store a snapshot for a location key, creating the directory as needed.
    pub fn store(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create cache directory: {}", self.dir.display())
        })?;

        let path = self.path_for(key);
        let json =
            serde_json::to_string(snapshot).context("Failed to serialize forecast snapshot")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot file: {}", path.display()))?;

        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, CurrentConditions, ForecastBundle};
    use chrono::Duration;

    fn bundle() -> ForecastBundle {
        ForecastBundle {
            name: "Melbourne".to_string(),
            current: CurrentConditions {
                temperature: 18,
                feels_like: 16,
                chance_of_rain: 30,
                wind_speed: 14,
                wind_direction: "SW".to_string(),
                condition: Condition::Cloudy,
                humidity: 60,
                uv_index: 3,
                pressure: 1016,
                visibility: 20,
                cloud_cover: 70,
                dew_point: 10,
                wind_gusts: 22,
            },
            hourly: Vec::new(),
            daily: Vec::new(),
            stories: Vec::new(),
            air_quality: None,
        }
    }

    #[test]
    fn store_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::with_dir(dir.path());

        let snapshot = Snapshot::new(bundle());
        store.store("melbourne", &snapshot).expect("store");

        let loaded = store.load("melbourne").expect("snapshot should load");
        assert_eq!(loaded.bundle, snapshot.bundle);
        assert_eq!(loaded.fetched_at, snapshot.fetched_at);
    }

    #[test]
    fn missing_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::with_dir(dir.path());
        assert!(store.load("melbourne").is_none());
    }

    #[test]
    fn corrupt_snapshot_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::with_dir(dir.path());
        std::fs::write(dir.path().join("melbourne.json"), "{not json").expect("write");
        assert!(store.load("melbourne").is_none());
    }

    #[test]
    fn freshness_window() {
        let now = Utc::now();
        let snapshot = Snapshot {
            fetched_at: now - Duration::seconds(60),
            bundle: bundle(),
        };
        assert!(snapshot.is_fresh(now, DEFAULT_TTL_SECS));

        let stale = Snapshot {
            fetched_at: now - Duration::seconds(301),
            bundle: bundle(),
        };
        assert!(!stale.is_fresh(now, DEFAULT_TTL_SECS));
    }

    #[test]
    fn future_snapshot_is_not_fresh() {
        let now = Utc::now();
        let snapshot = Snapshot {
            fetched_at: now + Duration::seconds(30),
            bundle: bundle(),
        };
        assert!(!snapshot.is_fresh(now, DEFAULT_TTL_SECS));
    }
}
