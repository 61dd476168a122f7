//! In-memory roster provider.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use crewroster_core::{Activity, DateRange, Roster, ScheduledFlight};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, RosterProvider};

/// Serves a fixed set of activities and flights.
///
/// Rosters are cut from the stored activities by start date, in stored order.
/// Fetches are counted so callers can observe cache hits.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    user_id: String,
    activities: Vec<Activity>,
    flights: Vec<ScheduledFlight>,
    roster_fetches: AtomicUsize,
    next_error: Mutex<Option<ProviderError>>,
}

impl MemoryProvider {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_activities(mut self, activities: impl IntoIterator<Item = Activity>) -> Self {
        self.activities.extend(activities);
        self
    }

    pub fn with_flights(mut self, flights: impl IntoIterator<Item = ScheduledFlight>) -> Self {
        self.flights.extend(flights);
        self
    }

    /// Makes the next fetch (roster or schedule) fail with `error`.
    pub fn fail_next(&self, error: ProviderError) {
        if let Ok(mut next) = self.next_error.lock() {
            *next = Some(error);
        }
    }

    /// Returns how many roster fetches were served, failed ones included.
    pub fn roster_fetches(&self) -> usize {
        self.roster_fetches.load(Ordering::SeqCst)
    }

    fn take_error(&self) -> Option<ProviderError> {
        self.next_error
            .lock()
            .ok()
            .and_then(|mut next| next.take())
            .map(|error| error.with_provider(self.name()))
    }

    /// Cuts the roster for `range` out of the stored activities.
    pub fn roster_for(&self, range: DateRange) -> Roster {
        Roster::new(self.user_id.clone(), range).with_activities(
            self.activities
                .iter()
                .filter(|activity| range.contains(activity.start_date()))
                .cloned(),
        )
    }

    /// Returns the stored flights departing within the requested days.
    pub fn schedule_for(&self, start: NaiveDate, end: Option<NaiveDate>) -> Vec<ScheduledFlight> {
        let end = end.unwrap_or(start);
        self.flights
            .iter()
            .filter(|flight| {
                let day = flight.departure_time.date_naive();
                start <= day && day <= end
            })
            .cloned()
            .collect()
    }
}

impl RosterProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn fetch_roster(&self, range: DateRange) -> BoxFuture<'_, ProviderResult<Roster>> {
        self.roster_fetches.fetch_add(1, Ordering::SeqCst);
        let result = match self.take_error() {
            Some(error) => Err(error),
            None => {
                let roster = self.roster_for(range);
                debug!(
                    start = %range.start,
                    end = %range.end,
                    activities = roster.len(),
                    "Served roster from memory"
                );
                Ok(roster)
            }
        };
        Box::pin(async move { result })
    }

    fn fetch_flight_schedule(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> BoxFuture<'_, ProviderResult<Vec<ScheduledFlight>>> {
        let result = match self.take_error() {
            Some(error) => Err(error),
            None => match end {
                Some(end) if end < start => Err(ProviderError::bad_request(format!(
                    "schedule end {} is before start {}",
                    end, start
                ))
                .with_provider(self.name())),
                _ => Ok(self.schedule_for(start, end)),
            },
        };
        Box::pin(async move { result })
    }
}
