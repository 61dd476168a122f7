//! Roster type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::time::DateRange;

/// The activities of one crew member over an inclusive date range.
///
/// Activities are not required to be sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Owner of the roster.
    pub user_id: String,
    /// First covered date.
    pub start_date: NaiveDate,
    /// Last covered date.
    pub end_date: NaiveDate,
    /// Scheduled activities.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Roster {
    /// Creates an empty roster for the given range.
    pub fn new(user_id: impl Into<String>, range: DateRange) -> Self {
        Self {
            user_id: user_id.into(),
            start_date: range.start,
            end_date: range.end,
            activities: Vec::new(),
        }
    }

    /// Builder method to add an activity.
    pub fn with_activity(mut self, activity: impl Into<Activity>) -> Self {
        self.activities.push(activity.into());
        self
    }

    /// Builder method to add several activities.
    pub fn with_activities(mut self, activities: impl IntoIterator<Item = Activity>) -> Self {
        self.activities.extend(activities);
        self
    }

    /// Returns the covered date range.
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Returns the activities whose start date falls outside the covered range.
    pub fn out_of_range(&self) -> impl Iterator<Item = &Activity> {
        let range = self.range();
        self.activities
            .iter()
            .filter(move |activity| !range.contains(activity.start_date()))
    }
}
