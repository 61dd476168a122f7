//! Roster provider backed by a JSON dump on disk.
//!
//! The dump holds the activities and flight schedule exported from the crew
//! service:
//!
//! ```json
//! {
//!   "user_id": "12345",
//!   "activities": [{"kind": "flight", "start": "...", ...}],
//!   "flights": [{"flight_number": "AF1234", ...}]
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use crewroster_core::{Activity, DateRange, Roster, ScheduledFlight};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ProviderError, ProviderResult};
use crate::memory::MemoryProvider;
use crate::provider::{BoxFuture, RosterProvider};

/// On-disk layout of a roster dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterDump {
    pub user_id: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub flights: Vec<ScheduledFlight>,
}

/// Serves rosters from a JSON dump loaded at open time.
#[derive(Debug)]
pub struct JsonFileProvider {
    path: PathBuf,
    inner: MemoryProvider,
}

impl JsonFileProvider {
    /// Reads and decodes the dump at `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file cannot be read, `InvalidResponse` if it is not a
    /// valid dump, `ConfigurationError` if it names no crew member.
    pub fn open(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::not_found(format!("cannot read roster dump {}", path.display()))
                .with_provider("json-file")
                .with_source(e)
        })?;
        let dump: RosterDump = serde_json::from_str(&content).map_err(|e| {
            ProviderError::invalid_response(format!("invalid roster dump {}", path.display()))
                .with_provider("json-file")
                .with_source(e)
        })?;
        if dump.user_id.trim().is_empty() {
            return Err(ProviderError::configuration(format!(
                "roster dump {} has no user_id",
                path.display()
            ))
            .with_provider("json-file"));
        }
        info!(
            path = %path.display(),
            user_id = %dump.user_id,
            activities = dump.activities.len(),
            flights = dump.flights.len(),
            "Loaded roster dump"
        );
        Ok(Self::from_dump(path, dump))
    }

    /// Builds a provider from an already decoded dump.
    pub fn from_dump(path: impl Into<PathBuf>, dump: RosterDump) -> Self {
        let inner = MemoryProvider::new(dump.user_id)
            .with_activities(dump.activities)
            .with_flights(dump.flights);
        Self {
            path: path.into(),
            inner,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterProvider for JsonFileProvider {
    fn name(&self) -> &str {
        "json-file"
    }

    fn user_id(&self) -> &str {
        self.inner.user_id()
    }

    fn fetch_roster(&self, range: DateRange) -> BoxFuture<'_, ProviderResult<Roster>> {
        self.inner.fetch_roster(range)
    }

    fn fetch_flight_schedule(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> BoxFuture<'_, ProviderResult<Vec<ScheduledFlight>>> {
        self.inner.fetch_flight_schedule(start, end)
    }
}
