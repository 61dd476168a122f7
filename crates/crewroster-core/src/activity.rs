//! Roster activity types.
//!
//! This module provides the activity model served by the crew roster service:
//! - [`Activity`]: a closed sum over the activity kinds found in a roster
//! - [`ActivityCommon`]: the fields every activity carries
//! - [`CrewMember`] and [`RoleCode`]: crew assigned to a flight
//!
//! Activity intervals are half-open `[start, end)` and stored in UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UnknownRoleCode;

/// Crew role code as used by the roster service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleCode {
    /// Instructor pilot.
    Ipl,
    /// Captain (commandant de bord).
    Cdb,
    /// First officer.
    Opl,
    /// Supernumerary technical crew.
    Supt,
    /// Cabin instructor.
    Ins,
    /// Cabin chief.
    Cc,
    /// Cabin attendant.
    Ca,
    /// Supernumerary cabin crew.
    Supc,
    /// Any code this crate does not know about.
    #[serde(other)]
    Other,
}

/// The crew group a role belongs to in exported descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrewGroup {
    /// Flight deck crew, labelled `T`.
    Technical,
    /// Cabin crew, labelled `C`.
    Cabin,
}

impl CrewGroup {
    /// Returns the single-letter label used in iCal descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Technical => "T",
            Self::Cabin => "C",
        }
    }
}

impl RoleCode {
    /// Every known role code, in display order.
    pub const ALL: [RoleCode; 8] = [
        Self::Ipl,
        Self::Cdb,
        Self::Opl,
        Self::Supt,
        Self::Ins,
        Self::Cc,
        Self::Ca,
        Self::Supc,
    ];

    /// Returns the wire representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipl => "IPL",
            Self::Cdb => "CDB",
            Self::Opl => "OPL",
            Self::Supt => "SUPT",
            Self::Ins => "INS",
            Self::Cc => "CC",
            Self::Ca => "CA",
            Self::Supc => "SUPC",
            Self::Other => "OTHER",
        }
    }

    /// Returns the crew group for this role, if it belongs to one.
    pub fn group(&self) -> Option<CrewGroup> {
        match self {
            Self::Ipl | Self::Cdb | Self::Opl | Self::Supt => Some(CrewGroup::Technical),
            Self::Ins | Self::Cc | Self::Ca | Self::Supc => Some(CrewGroup::Cabin),
            Self::Other => None,
        }
    }
}

impl fmt::Display for RoleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleCode {
    type Err = UnknownRoleCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| UnknownRoleCode(s.to_string()))
    }
}

/// A crew member assigned to a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Short crew code (trigram) identifying the person.
    pub crew_code: String,
    /// The role held on this flight.
    pub role_code: RoleCode,
}

impl CrewMember {
    /// Creates a new crew member.
    pub fn new(crew_code: impl Into<String>, role_code: RoleCode) -> Self {
        Self {
            crew_code: crew_code.into(),
            role_code,
        }
    }
}

/// Fields shared by every activity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCommon {
    /// Activity identifier within the service, if any.
    #[serde(default)]
    pub id: Option<i64>,
    /// Pairing (multi-day trip) identifier, if any.
    #[serde(default)]
    pub pairing_id: Option<i64>,
    /// Start of the activity (inclusive).
    pub start: DateTime<Utc>,
    /// End of the activity (exclusive).
    pub end: DateTime<Utc>,
    /// Category label as reported by the service.
    pub category: String,
    /// Free-form details string.
    #[serde(default)]
    pub details: String,
    /// Optional remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

impl ActivityCommon {
    /// Creates the common part of an activity.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            pairing_id: None,
            start,
            end,
            category: category.into(),
            details: String::new(),
            remarks: None,
        }
    }

    /// Builder method to set the activity and pairing identifiers.
    pub fn with_ids(mut self, pairing_id: Option<i64>, id: Option<i64>) -> Self {
        self.pairing_id = pairing_id;
        self.id = id;
        self
    }

    /// Builder method to set the details string.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Builder method to set remarks.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// An operated flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightActivity {
    #[serde(flatten)]
    pub common: ActivityCommon,
    pub flight_number: String,
    pub origin_iata_code: String,
    pub destination_iata_code: String,
    /// IANA timezone name of the destination airport.
    pub destination_timezone: String,
    pub aircraft_code: String,
    /// Role held by the roster owner on this flight.
    pub role: String,
    #[serde(default)]
    pub crew_members: Vec<CrewMember>,
}

impl FlightActivity {
    /// Creates a flight with no crew members.
    pub fn new(
        common: ActivityCommon,
        flight_number: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        destination_timezone: impl Into<String>,
    ) -> Self {
        Self {
            common,
            flight_number: flight_number.into(),
            origin_iata_code: origin.into(),
            destination_iata_code: destination.into(),
            destination_timezone: destination_timezone.into(),
            aircraft_code: String::new(),
            role: String::new(),
            crew_members: Vec::new(),
        }
    }

    /// Builder method to set the aircraft code.
    pub fn with_aircraft(mut self, aircraft_code: impl Into<String>) -> Self {
        self.aircraft_code = aircraft_code.into();
        self
    }

    /// Builder method to set the owner's role on the flight.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Builder method to add a crew member.
    pub fn with_crew_member(mut self, member: CrewMember) -> Self {
        self.crew_members.push(member);
        self
    }

    /// Returns the crew codes of every member in the given group, in roster order.
    pub fn crew_codes(&self, group: CrewGroup) -> impl Iterator<Item = &str> {
        self.crew_members
            .iter()
            .filter(move |member| member.role_code.group() == Some(group))
            .map(|member| member.crew_code.as_str())
    }
}

/// Repositioning as a passenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadheadActivity {
    #[serde(flatten)]
    pub common: ActivityCommon,
    pub description: String,
    pub origin_iata_code: String,
    pub destination_iata_code: String,
}

impl DeadheadActivity {
    /// Creates a deadhead.
    pub fn new(
        common: ActivityCommon,
        description: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            common,
            description: description.into(),
            origin_iata_code: origin.into(),
            destination_iata_code: destination.into(),
        }
    }
}

/// A hotel stay. Never exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelActivity {
    #[serde(flatten)]
    pub common: ActivityCommon,
}

/// Any other activity (ground duty, standby, day off, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericActivity {
    #[serde(flatten)]
    pub common: ActivityCommon,
    /// Block time in minutes, when the service reports one.
    #[serde(default)]
    pub block_minutes: Option<i64>,
}

impl GenericActivity {
    /// Creates a generic activity without block time.
    pub fn new(common: ActivityCommon) -> Self {
        Self {
            common,
            block_minutes: None,
        }
    }

    /// Builder method to set the block time.
    pub fn with_block_time(mut self, block: Duration) -> Self {
        self.block_minutes = Some(block.num_minutes());
        self
    }
}

/// One scheduled item within a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activity {
    Flight(FlightActivity),
    Deadhead(DeadheadActivity),
    Hotel(HotelActivity),
    Other(GenericActivity),
}

impl Activity {
    /// Returns the fields shared by all kinds.
    pub fn common(&self) -> &ActivityCommon {
        match self {
            Self::Flight(a) => &a.common,
            Self::Deadhead(a) => &a.common,
            Self::Hotel(a) => &a.common,
            Self::Other(a) => &a.common,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.common().start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.common().end
    }

    /// Returns the UTC calendar date the activity starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start().date_naive()
    }

    /// Returns the UTC calendar date the activity ends on.
    pub fn end_date(&self) -> NaiveDate {
        self.end().date_naive()
    }

    pub fn category(&self) -> &str {
        &self.common().category
    }

    pub fn details(&self) -> &str {
        &self.common().details
    }

    /// Returns the remarks, treating an empty string as absent.
    pub fn remarks(&self) -> Option<&str> {
        self.common()
            .remarks
            .as_deref()
            .filter(|remarks| !remarks.is_empty())
    }

    /// Returns the block time, for the kinds that expose one.
    pub fn block_time(&self) -> Option<Duration> {
        match self {
            Self::Other(a) => a.block_minutes.map(Duration::minutes),
            Self::Flight(_) | Self::Deadhead(_) | Self::Hotel(_) => None,
        }
    }

    /// Returns true if the activity takes part in calendar export.
    pub fn is_exportable(&self) -> bool {
        !matches!(self, Self::Hotel(_))
    }

    /// Returns a short human-readable title.
    pub fn title(&self) -> String {
        match self {
            Self::Flight(f) => format!(
                "{} {}-{}",
                f.flight_number, f.origin_iata_code, f.destination_iata_code
            ),
            Self::Deadhead(d) => format!(
                "{} {}*{}",
                d.description, d.origin_iata_code, d.destination_iata_code
            ),
            Self::Hotel(_) | Self::Other(_) => {
                let details = self.details();
                if details.is_empty() {
                    self.category().to_string()
                } else {
                    details.to_string()
                }
            }
        }
    }

    /// Returns true if `[start, end)` lies fully within `[from, to]`.
    pub fn is_within(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.start() >= from && self.end() <= to
    }
}

impl From<FlightActivity> for Activity {
    fn from(value: FlightActivity) -> Self {
        Self::Flight(value)
    }
}

impl From<DeadheadActivity> for Activity {
    fn from(value: DeadheadActivity) -> Self {
        Self::Deadhead(value)
    }
}

impl From<HotelActivity> for Activity {
    fn from(value: HotelActivity) -> Self {
        Self::Hotel(value)
    }
}

impl From<GenericActivity> for Activity {
    fn from(value: GenericActivity) -> Self {
        Self::Other(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn flight() -> FlightActivity {
        FlightActivity::new(
            ActivityCommon::new(utc(2025, 3, 10, 8, 0), utc(2025, 3, 10, 10, 5), "FLT"),
            "AF1234",
            "CDG",
            "NCE",
            "Europe/Paris",
        )
        .with_aircraft("320")
        .with_role("OPL")
    }

    #[test]
    fn role_code_groups() {
        for code in [RoleCode::Ipl, RoleCode::Cdb, RoleCode::Opl, RoleCode::Supt] {
            assert_eq!(code.group(), Some(CrewGroup::Technical));
        }
        for code in [RoleCode::Ins, RoleCode::Cc, RoleCode::Ca, RoleCode::Supc] {
            assert_eq!(code.group(), Some(CrewGroup::Cabin));
        }
        assert_eq!(RoleCode::Other.group(), None);
    }

    #[test]
    fn role_code_from_str() {
        assert_eq!("cdb".parse::<RoleCode>(), Ok(RoleCode::Cdb));
        assert_eq!(" SUPC ".parse::<RoleCode>(), Ok(RoleCode::Supc));
        assert!("PILOT".parse::<RoleCode>().is_err());
        assert!("OTHER".parse::<RoleCode>().is_err());
    }

    #[test]
    fn crew_codes_by_group() {
        let flight = flight()
            .with_crew_member(CrewMember::new("ABC", RoleCode::Cdb))
            .with_crew_member(CrewMember::new("DEF", RoleCode::Cc))
            .with_crew_member(CrewMember::new("GHI", RoleCode::Opl))
            .with_crew_member(CrewMember::new("XYZ", RoleCode::Other));

        let technical: Vec<_> = flight.crew_codes(CrewGroup::Technical).collect();
        let cabin: Vec<_> = flight.crew_codes(CrewGroup::Cabin).collect();
        assert_eq!(technical, vec!["ABC", "GHI"]);
        assert_eq!(cabin, vec!["DEF"]);
    }

    #[test]
    fn remarks_empty_is_absent() {
        let common = ActivityCommon::new(utc(2025, 3, 10, 8, 0), utc(2025, 3, 10, 9, 0), "GRD")
            .with_remarks("");
        let activity = Activity::from(GenericActivity::new(common));
        assert_eq!(activity.remarks(), None);
    }

    #[test]
    fn block_time_only_for_generic() {
        let common = ActivityCommon::new(utc(2025, 3, 10, 8, 0), utc(2025, 3, 10, 9, 0), "SIM");
        let generic = Activity::from(
            GenericActivity::new(common.clone()).with_block_time(Duration::minutes(95)),
        );
        assert_eq!(generic.block_time(), Some(Duration::minutes(95)));

        let hotel = Activity::from(HotelActivity { common });
        assert_eq!(hotel.block_time(), None);
        assert!(!hotel.is_exportable());
        assert!(Activity::from(flight()).is_exportable());
    }

    #[test]
    fn titles() {
        assert_eq!(Activity::from(flight()).title(), "AF1234 CDG-NCE");

        let deadhead = DeadheadActivity::new(
            ActivityCommon::new(utc(2025, 3, 11, 6, 0), utc(2025, 3, 11, 7, 30), "DHD"),
            "AF7700",
            "NCE",
            "ORY",
        );
        assert_eq!(Activity::from(deadhead).title(), "AF7700 NCE*ORY");

        let common = ActivityCommon::new(utc(2025, 3, 12, 0, 0), utc(2025, 3, 13, 0, 0), "OFF");
        assert_eq!(Activity::from(GenericActivity::new(common.clone())).title(), "OFF");
        let with_details = GenericActivity::new(common.with_details("Day off"));
        assert_eq!(Activity::from(with_details).title(), "Day off");
    }

    #[test]
    fn within_is_contained_semantics() {
        let activity = Activity::from(flight());
        assert!(activity.is_within(utc(2025, 3, 10, 8, 0), utc(2025, 3, 10, 10, 5)));
        assert!(!activity.is_within(utc(2025, 3, 10, 9, 0), utc(2025, 3, 10, 12, 0)));
        assert!(!activity.is_within(utc(2025, 3, 10, 0, 0), utc(2025, 3, 10, 10, 0)));
    }

    #[test]
    fn deserialize_tagged_activities() {
        let json = r#"[
            {
                "kind": "flight",
                "id": 42,
                "pairing_id": 7,
                "start": "2025-03-10T08:00:00Z",
                "end": "2025-03-10T10:05:00Z",
                "category": "FLT",
                "flight_number": "AF1234",
                "origin_iata_code": "CDG",
                "destination_iata_code": "NCE",
                "destination_timezone": "Europe/Paris",
                "aircraft_code": "320",
                "role": "OPL",
                "crew_members": [{"crew_code": "ABC", "role_code": "CDB"}]
            },
            {
                "kind": "other",
                "start": "2025-03-12T00:00:00Z",
                "end": "2025-03-13T00:00:00Z",
                "category": "OFF",
                "details": "Day off",
                "block_minutes": 0
            },
            {
                "kind": "hotel",
                "start": "2025-03-10T11:00:00Z",
                "end": "2025-03-11T05:00:00Z",
                "category": "HTL"
            }
        ]"#;

        let activities: Vec<Activity> = serde_json::from_str(json).unwrap();
        assert_eq!(activities.len(), 3);

        match &activities[0] {
            Activity::Flight(f) => {
                assert_eq!(f.common.id, Some(42));
                assert_eq!(f.common.pairing_id, Some(7));
                assert_eq!(f.crew_members[0].role_code, RoleCode::Cdb);
            }
            other => panic!("Expected flight, got {:?}", other),
        }
        assert_eq!(activities[1].details(), "Day off");
        assert_eq!(activities[1].block_time(), Some(Duration::zero()));
        assert!(!activities[2].is_exportable());
    }

    #[test]
    fn unknown_role_code_deserializes_as_other() {
        let member: CrewMember =
            serde_json::from_str(r#"{"crew_code": "QQQ", "role_code": "OBS"}"#).unwrap();
        assert_eq!(member.role_code, RoleCode::Other);
    }
}
