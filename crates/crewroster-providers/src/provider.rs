//! RosterProvider trait definition.
//!
//! A [`RosterProvider`] is the client of the airline crew service. It owns
//! transport and authentication; callers only see rosters, flight schedules
//! and [`ProviderError`](crate::ProviderError)s.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use crewroster_core::{DateRange, Roster, ScheduledFlight};

use crate::error::ProviderResult;

/// A boxed future, keeping the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of roster and flight-schedule data.
///
/// Implementations must be `Send + Sync` so a calendar can hold them behind
/// an `Arc` and fetch from any task.
pub trait RosterProvider: Send + Sync {
    /// Returns the provider name (e.g., "memory", "json-file").
    fn name(&self) -> &str;

    /// Returns the identifier of the crew member whose roster is served.
    fn user_id(&self) -> &str;

    /// Fetches the roster covering `range`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport, authentication or decoding
    /// failures. Callers do not retry.
    fn fetch_roster(&self, range: DateRange) -> BoxFuture<'_, ProviderResult<Roster>>;

    /// Fetches the airline flight schedule from `start` through `end`, or for
    /// `start` alone when `end` is `None`.
    fn fetch_flight_schedule(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> BoxFuture<'_, ProviderResult<Vec<ScheduledFlight>>>;
}
