//! Roster cache.
//!
//! Holds the union of every roster fetched so far and decides whether a
//! requested range can be answered without another fetch.

use chrono::{DateTime, Utc};
use crewroster_core::{Activity, CalendarEvent, DateRange, Roster};
use tracing::{debug, trace};

/// The roster window held by one calendar.
///
/// `merge` takes `&mut self` and the queries take `&self`: a host sharing the
/// cache between tasks must put it behind a lock (single writer, many readers).
#[derive(Debug, Default)]
pub struct RosterCache {
    held: Option<Roster>,
}

impl RosterCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the held roster, if any.
    pub fn roster(&self) -> Option<&Roster> {
        self.held.as_ref()
    }

    /// Returns the held date range, if any.
    pub fn range(&self) -> Option<DateRange> {
        self.held.as_ref().map(Roster::range)
    }

    /// Returns true if nothing has been merged yet.
    pub fn is_empty(&self) -> bool {
        self.held.is_none()
    }

    /// Returns the held activities.
    ///
    /// The first merged roster is kept in provider order; every later merge
    /// leaves them sorted by start.
    pub fn activities(&self) -> &[Activity] {
        self.held
            .as_ref()
            .map(|roster| roster.activities.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `[start, end]` can be answered from the cache.
    ///
    /// The held date range must contain both dates, and at least one held
    /// activity must lie fully inside `[start, end]`. A covered range with no
    /// activities is reported as not covered and will be fetched again.
    pub fn is_range_covered(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let Some(held) = self.held.as_ref() else {
            return false;
        };

        let dates_covered = held.range().contains_range(&DateRange {
            start: start.date_naive(),
            end: end.date_naive(),
        });
        let covered = dates_covered
            && held
                .activities
                .iter()
                .any(|activity| activity.is_within(start, end));

        trace!(
            start = %start,
            end = %end,
            dates_covered,
            covered,
            "Checked roster coverage"
        );
        covered
    }

    /// Merges a freshly fetched roster into the held one.
    ///
    /// Incoming activities starting outside the incoming date range are
    /// dropped, so every held activity starts within the held range.
    ///
    /// Held activities are kept only if they end before `incoming` starts or
    /// start after it ends (by date); everything else is replaced by the
    /// incoming activities. The result is stably sorted by start time and the
    /// held range grows to cover both rosters. No deduplication happens here.
    pub fn merge(&mut self, mut incoming: Roster) {
        drop_out_of_range(&mut incoming);

        let Some(held) = self.held.as_mut() else {
            debug!(
                user_id = %incoming.user_id,
                start = %incoming.start_date,
                end = %incoming.end_date,
                activities = incoming.len(),
                "Adopted first roster"
            );
            self.held = Some(incoming);
            return;
        };

        let before = held.activities.len();
        let incoming_range = incoming.range();

        held.activities.retain(|activity| {
            activity.end_date() < incoming_range.start || activity.start_date() > incoming_range.end
        });
        let kept = held.activities.len();

        held.activities.extend(incoming.activities);
        held.activities.sort_by_key(Activity::start);

        let range = held.range().union(&incoming_range);
        held.start_date = range.start;
        held.end_date = range.end;

        debug!(
            start = %range.start,
            end = %range.end,
            kept,
            replaced = before - kept,
            total = held.activities.len(),
            "Merged roster into cache"
        );
    }

    /// Returns the earliest activity starting strictly after `now`.
    pub fn next_upcoming(&self, now: DateTime<Utc>) -> Option<CalendarEvent> {
        self.activities()
            .iter()
            .filter(|activity| activity.start() > now)
            .min_by_key(|activity| activity.start())
            .map(CalendarEvent::from_activity)
    }

    /// Returns the held activities lying fully inside `[start, end]`.
    ///
    /// Activities that only overlap the window are excluded.
    pub fn activities_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Activity> {
        self.activities()
            .iter()
            .filter(|activity| activity.is_within(start, end))
            .collect()
    }
}

fn drop_out_of_range(roster: &mut Roster) {
    let range = roster.range();
    for activity in roster.out_of_range() {
        debug!(
            start = %activity.start(),
            range_start = %range.start,
            range_end = %range.end,
            "Dropping activity starting outside fetched range"
        );
    }
    roster
        .activities
        .retain(|activity| range.contains(activity.start_date()));
}
