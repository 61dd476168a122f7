//! Roster calendar: cache, calendar entity and services.
//!
//! - [`RosterCache`] - union of every roster fetched so far
//! - [`RosterCalendar`] - next event, windowed queries and throttled updates
//! - [`generate_roster_ical`] / [`find_unstaffed_flights`] - one-shot services
//! - [`CalendarConfig`] - lookahead, throttling and export settings

pub mod cache;
pub mod calendar;
pub mod config;
pub mod error;
pub mod services;

pub use cache::RosterCache;
pub use calendar::{RosterCalendar, SharedCalendar};
pub use config::CalendarConfig;
pub use error::{CalendarError, CalendarResult};
pub use services::{
    IcalRequest, IcalResponse, UnstaffedRequest, find_unstaffed_flights, generate_roster_ical,
};
