//! Calendar event projection.
//!
//! A [`CalendarEvent`] is what calendar consumers see of an [`Activity`]. It is
//! derived on demand and never stored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Activity;

/// A display-ready view of a roster activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub description: Option<String>,
}

/// Identity used to spot the same event fetched twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    start: i64,
    end: i64,
    summary: String,
}

impl CalendarEvent {
    /// Projects an activity into a calendar event.
    pub fn from_activity(activity: &Activity) -> Self {
        let details = activity.details();
        Self {
            start: activity.start(),
            end: activity.end(),
            summary: activity.title(),
            description: (!details.is_empty()).then(|| details.to_string()),
        }
    }

    /// Returns the deduplication key: start and end timestamps plus summary.
    pub fn key(&self) -> EventKey {
        EventKey {
            start: self.start.timestamp(),
            end: self.end.timestamp(),
            summary: self.summary.clone(),
        }
    }
}

impl From<&Activity> for CalendarEvent {
    fn from(activity: &Activity) -> Self {
        Self::from_activity(activity)
    }
}

/// Removes duplicate events, keeping the position of the first occurrence and
/// the contents of the last one.
pub fn dedup_events(events: impl IntoIterator<Item = CalendarEvent>) -> Vec<CalendarEvent> {
    let mut positions: HashMap<EventKey, usize> = HashMap::new();
    let mut unique: Vec<CalendarEvent> = Vec::new();

    for event in events {
        match positions.get(&event.key()) {
            Some(&index) => unique[index] = event,
            None => {
                positions.insert(event.key(), unique.len());
                unique.push(event);
            }
        }
    }

    unique
}
