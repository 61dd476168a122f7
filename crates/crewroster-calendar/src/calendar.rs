//! Roster calendar entity.
//!
//! Wraps a provider and a [`RosterCache`] and answers the calendar queries of
//! a host: the next event, the events of a window, and periodic refreshes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crewroster_core::{CalendarEvent, DateRange, dedup_events};
use crewroster_providers::RosterProvider;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::RosterCache;
use crate::config::CalendarConfig;
use crate::error::{CalendarError, CalendarResult};

/// A calendar shared between tasks.
pub type SharedCalendar = Arc<RwLock<RosterCalendar>>;

/// Calendar of one crew member's roster.
///
/// Queries that may fetch take `&mut self`; share through [`SharedCalendar`].
pub struct RosterCalendar {
    provider: Arc<dyn RosterProvider>,
    cache: RosterCache,
    config: CalendarConfig,
    last_update: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for RosterCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterCalendar")
            .field("provider", &self.provider.name())
            .field("user_id", &self.provider.user_id())
            .field("cache", &self.cache)
            .field("last_update", &self.last_update)
            .finish()
    }
}

impl RosterCalendar {
    /// Creates a calendar with an empty cache.
    pub fn new(provider: Arc<dyn RosterProvider>, config: CalendarConfig) -> Self {
        Self {
            provider,
            cache: RosterCache::new(),
            config,
            last_update: None,
        }
    }

    /// Wraps the calendar for sharing between tasks.
    pub fn into_shared(self) -> SharedCalendar {
        Arc::new(RwLock::new(self))
    }

    /// Returns the display name, e.g. `Crew Roster [12345]`.
    pub fn name(&self) -> String {
        format!(
            "{} [{}]",
            self.config.calendar_name_prefix,
            self.provider.user_id()
        )
    }

    pub fn cache(&self) -> &RosterCache {
        &self.cache
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Returns when the last successful update ran.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Returns the next event starting after `now`, from the cache only.
    pub fn event(&self, now: DateTime<Utc>) -> Option<CalendarEvent> {
        self.cache.next_upcoming(now)
    }

    /// Returns the events lying fully inside `[start, end]`.
    ///
    /// Fetches `[start.date, end.date]` first when the cache does not cover
    /// the window. Events sharing start, end and summary are reported once.
    ///
    /// # Errors
    ///
    /// `InvalidRange` if `start > end`; `Provider` if the fetch fails, in
    /// which case the cache is left untouched.
    pub async fn get_events(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        if start > end {
            return Err(CalendarError::invalid_range(
                start.date_naive(),
                end.date_naive(),
            ));
        }

        if self.cache.is_range_covered(start, end) {
            debug!(start = %start, end = %end, "Serving events from cache");
        } else {
            let range = DateRange::new(start.date_naive(), end.date_naive());
            self.fetch_and_merge(range).await?;
        }

        let events = dedup_events(
            self.cache
                .activities_in_range(start, end)
                .into_iter()
                .map(CalendarEvent::from_activity),
        );
        Ok(events)
    }

    /// Refreshes the lookahead window starting today.
    ///
    /// Returns `Ok(false)` without fetching when the previous successful
    /// update is more recent than `min_update_interval`.
    pub async fn update(&mut self, now: DateTime<Utc>) -> CalendarResult<bool> {
        if let Some(last) = self.last_update {
            let elapsed = (now - last).to_std().unwrap_or_default();
            if elapsed < self.config.min_update_interval {
                debug!(
                    elapsed_secs = elapsed.as_secs(),
                    "Skipping update, last one is too recent"
                );
                return Ok(false);
            }
        }

        let range = self.config.update_window(now.date_naive());
        self.fetch_and_merge(range).await?;
        self.last_update = Some(now);
        Ok(true)
    }

    async fn fetch_and_merge(&mut self, range: DateRange) -> CalendarResult<()> {
        info!(
            provider = %self.provider.name(),
            start = %range.start,
            end = %range.end,
            "Fetching roster"
        );
        let roster = match self.provider.fetch_roster(range).await {
            Ok(roster) => roster,
            Err(e) => {
                warn!(
                    provider = %self.provider.name(),
                    error = %e,
                    transient = e.is_transient(),
                    "Roster fetch failed"
                );
                return Err(e.into());
            }
        };

        self.cache.merge(roster);
        Ok(())
    }
}
