//! Core types: activities, rosters, calendar events, iCal export

pub mod activity;
pub mod error;
pub mod event;
pub mod ical;
pub mod roster;
pub mod schedule;
pub mod time;
pub mod tracing;

pub use activity::{
    Activity, ActivityCommon, CrewGroup, CrewMember, DeadheadActivity, FlightActivity,
    GenericActivity, HotelActivity, RoleCode,
};
pub use error::{ExportError, UnknownRoleCode};
pub use event::{CalendarEvent, EventKey, dedup_events};
pub use ical::{IcalDocument, IcalExporter};
pub use roster::Roster;
pub use schedule::{ScheduledFlight, UnstaffedFlights, UnstaffedQuery, find_unstaffed};
pub use time::DateRange;
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
