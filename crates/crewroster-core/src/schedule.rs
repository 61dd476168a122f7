//! Flight schedule records and the unstaffed-flight query.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{CrewMember, RoleCode};

/// A flight from the airline-wide schedule, with its crew complement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledFlight {
    pub flight_number: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub origin_iata_code: String,
    pub destination_iata_code: String,
    pub aircraft_type: String,
    /// Number of crew required per role.
    #[serde(default)]
    pub required_crew: BTreeMap<RoleCode, u32>,
    /// Crew currently assigned.
    #[serde(default)]
    pub crew_members: Vec<CrewMember>,
}

impl ScheduledFlight {
    /// Returns how many assigned crew members hold `role`.
    pub fn assigned(&self, role: RoleCode) -> u32 {
        self.crew_members
            .iter()
            .filter(|member| member.role_code == role)
            .count() as u32
    }

    /// Returns how many `role` positions are still open.
    pub fn missing(&self, role: RoleCode) -> u32 {
        self.required_crew
            .get(&role)
            .copied()
            .unwrap_or(0)
            .saturating_sub(self.assigned(role))
    }

    /// Returns true if crew is missing for `role`, or for any role when `None`.
    pub fn is_missing_crew_members(&self, role: Option<RoleCode>) -> bool {
        match role {
            Some(role) => self.missing(role) > 0,
            None => self.required_crew.keys().any(|role| self.missing(*role) > 0),
        }
    }
}

/// Filters for [`find_unstaffed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstaffedQuery {
    /// Only flights operated with this aircraft type.
    pub aircraft_type: Option<String>,
    /// Only flights missing this role; any role when unset.
    pub role: Option<RoleCode>,
}

impl UnstaffedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aircraft_type(mut self, aircraft_type: impl Into<String>) -> Self {
        self.aircraft_type = Some(aircraft_type.into());
        self
    }

    pub fn with_role(mut self, role: RoleCode) -> Self {
        self.role = Some(role);
        self
    }

    /// Returns true if the flight passes every filter.
    pub fn matches(&self, flight: &ScheduledFlight) -> bool {
        let aircraft_ok = self
            .aircraft_type
            .as_deref()
            .is_none_or(|aircraft| flight.aircraft_type == aircraft);

        aircraft_ok && flight.is_missing_crew_members(self.role)
    }
}

/// Result of the unstaffed-flight query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstaffedFlights {
    pub count: usize,
    pub data: Vec<ScheduledFlight>,
}

/// Keeps the flights matching `query`, sorted by departure time.
pub fn find_unstaffed(
    flights: impl IntoIterator<Item = ScheduledFlight>,
    query: &UnstaffedQuery,
) -> UnstaffedFlights {
    let mut data: Vec<_> = flights
        .into_iter()
        .filter(|flight| query.matches(flight))
        .collect();
    data.sort_by_key(|flight| flight.departure_time);

    UnstaffedFlights {
        count: data.len(),
        data,
    }
}
