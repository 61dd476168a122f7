//! Calendar configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crewroster_core::DateRange;

/// Calendar configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfig {
    /// Days fetched ahead of today on each update.
    pub lookahead_days: u32,

    /// Minimum time between two provider fetches triggered by `update`.
    pub min_update_interval: Duration,

    /// Directory receiving saved `.ics` exports.
    pub export_dir: PathBuf,

    /// Prefix of the calendar display name.
    pub calendar_name_prefix: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            lookahead_days: 30,
            min_update_interval: Duration::from_secs(300), // 5 minutes
            export_dir: PathBuf::from("/config"),
            calendar_name_prefix: "Crew Roster".to_string(),
        }
    }
}

impl CalendarConfig {
    /// Creates a configuration exporting into `export_dir`.
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            ..Default::default()
        }
    }

    /// Builder: set lookahead days.
    pub fn with_lookahead_days(mut self, days: u32) -> Self {
        self.lookahead_days = days;
        self
    }

    /// Builder: set minimum update interval.
    pub fn with_min_update_interval(mut self, interval: Duration) -> Self {
        self.min_update_interval = interval;
        self
    }

    /// Builder: set calendar name prefix.
    pub fn with_calendar_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.calendar_name_prefix = prefix.into();
        self
    }

    /// Returns the window fetched by an update on `today`.
    pub fn update_window(&self, today: NaiveDate) -> DateRange {
        DateRange::from_days(today, i64::from(self.lookahead_days))
    }

    /// Returns where the export for `user_id` is saved.
    pub fn export_path(&self, user_id: &str) -> PathBuf {
        self.export_dir.join(format!("{}_roster.ics", user_id))
    }
}
