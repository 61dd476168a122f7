//! Roster services: iCal generation and the unstaffed-flight query.

use std::path::PathBuf;

use chrono::NaiveDate;
use crewroster_core::{
    DateRange, IcalExporter, RoleCode, UnstaffedFlights, UnstaffedQuery, find_unstaffed,
};
use crewroster_providers::RosterProvider;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CalendarConfig;
use crate::error::{CalendarError, CalendarResult};

/// Parameters of [`generate_roster_ical`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcalRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub save_to_file: bool,
}

/// Result of [`generate_roster_ical`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcalResponse {
    pub ical: String,
    /// Where the document was written, when saving was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
}

/// Parameters of [`find_unstaffed_flights`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstaffedRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub aircraft_type: Option<String>,
    pub role: Option<RoleCode>,
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> CalendarResult<DateRange> {
    if start > end {
        return Err(CalendarError::invalid_range(start, end));
    }
    Ok(DateRange::new(start, end))
}

/// Fetches the roster for the requested dates and renders it as iCal.
///
/// With `save_to_file`, the document is also written to
/// `<export_dir>/<user_id>_roster.ics`, creating the directory if needed.
pub async fn generate_roster_ical(
    provider: &dyn RosterProvider,
    exporter: &IcalExporter,
    config: &CalendarConfig,
    request: &IcalRequest,
) -> CalendarResult<IcalResponse> {
    let range = validate_range(request.start, request.end)?;
    let roster = provider.fetch_roster(range).await?;
    let document = exporter.render(&roster);

    info!(
        user_id = %document.user_id(),
        start = %range.start,
        end = %range.end,
        events = document.event_count(),
        "Generated roster calendar"
    );

    let saved_to = if request.save_to_file {
        let path = config.export_path(document.user_id());
        std::fs::create_dir_all(&config.export_dir)?;
        document.write_to_file(&path)?;
        info!(path = %path.display(), "Saved roster calendar");
        Some(path)
    } else {
        None
    };

    Ok(IcalResponse {
        ical: document.into_string(),
        saved_to,
    })
}

/// Lists scheduled flights still missing crew, sorted by departure.
///
/// `start` defaults to `today`. Without `end` only the start day is searched.
pub async fn find_unstaffed_flights(
    provider: &dyn RosterProvider,
    request: &UnstaffedRequest,
    today: NaiveDate,
) -> CalendarResult<UnstaffedFlights> {
    let start = request.start.unwrap_or(today);
    if let Some(end) = request.end {
        validate_range(start, end)?;
    }

    let flights = provider.fetch_flight_schedule(start, request.end).await?;
    let fetched = flights.len();

    let query = UnstaffedQuery {
        aircraft_type: request.aircraft_type.clone(),
        role: request.role,
    };
    let result = find_unstaffed(flights, &query);

    info!(
        start = %start,
        fetched,
        unstaffed = result.count,
        "Searched unstaffed flights"
    );
    Ok(result)
}
