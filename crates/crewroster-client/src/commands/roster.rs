//! Roster commands: events, next, export, unstaffed.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::info;

use crewroster_calendar::{
    CalendarConfig, IcalRequest, RosterCalendar, UnstaffedRequest, find_unstaffed_flights,
    generate_roster_ical,
};
use crewroster_core::{CalendarEvent, DateRange, IcalExporter, RoleCode, UnstaffedFlights};
use crewroster_providers::{JsonFileProvider, RosterProvider};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Everything a roster command needs.
pub struct RosterContext {
    pub provider: Arc<dyn RosterProvider>,
    pub calendar: CalendarConfig,
    pub json: bool,
}

impl RosterContext {
    /// Opens the roster dump named on the command line or in the config.
    pub fn open(cli: &Cli, config: &ClientConfig) -> ClientResult<Self> {
        let source: &Path = match cli.roster.as_deref() {
            Some(path) => path,
            None => config.roster_source()?,
        };
        let provider = JsonFileProvider::open(source)?;
        info!(
            source = %source.display(),
            user_id = %provider.user_id(),
            "Opened roster source"
        );

        Ok(Self {
            provider: Arc::new(provider),
            calendar: config.calendar.to_calendar_config(),
            json: cli.json,
        })
    }

    /// Resolves optional CLI dates to the default lookahead window.
    fn window(
        &self,
        today: NaiveDate,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ClientResult<DateRange> {
        let start = from.unwrap_or(today);
        let end = to.unwrap_or_else(|| self.calendar.update_window(start).end);
        if start > end {
            return Err(ClientError::Config(format!(
                "--from {} is after --to {}",
                start, end
            )));
        }
        Ok(DateRange::new(start, end))
    }
}

/// Returns the first and last instants of a day range.
fn day_bounds(range: DateRange) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = range.start.and_time(NaiveTime::MIN).and_utc();
    let end = (range.end + Duration::days(1)).and_time(NaiveTime::MIN).and_utc()
        - Duration::seconds(1);
    (start, end)
}

/// Lists the events lying within `[from, to]`.
pub async fn events(
    ctx: &RosterContext,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> ClientResult<()> {
    let range = ctx.window(now.date_naive(), from, to)?;
    let (start, end) = day_bounds(range);

    let mut calendar = RosterCalendar::new(ctx.provider.clone(), ctx.calendar.clone());
    let events = calendar.get_events(start, end).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        print!("{}", render_events(&calendar.name(), &events));
    }
    Ok(())
}

/// Shows the next event after `now`.
pub async fn next(ctx: &RosterContext, now: DateTime<Utc>) -> ClientResult<()> {
    let mut calendar = RosterCalendar::new(ctx.provider.clone(), ctx.calendar.clone());
    calendar.update(now).await?;
    let event = calendar.event(now);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        match event {
            Some(event) => println!("{}", render_event(&event)),
            None => println!("No upcoming roster event"),
        }
    }
    Ok(())
}

/// Prints or saves the iCal export of `[from, to]`.
pub async fn export(
    ctx: &RosterContext,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    save: bool,
    now: DateTime<Utc>,
) -> ClientResult<()> {
    let range = ctx.window(now.date_naive(), from, to)?;
    let request = IcalRequest {
        start: range.start,
        end: range.end,
        save_to_file: save,
    };

    let exporter = IcalExporter::new(now);
    let response =
        generate_roster_ical(ctx.provider.as_ref(), &exporter, &ctx.calendar, &request).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if let Some(path) = response.saved_to {
        println!("saved: {}", path.display());
    } else {
        print!("{}", response.ical);
    }
    Ok(())
}

/// Lists flights still missing crew.
pub async fn unstaffed(
    ctx: &RosterContext,
    request: UnstaffedRequest,
    today: NaiveDate,
) -> ClientResult<()> {
    let result = find_unstaffed_flights(ctx.provider.as_ref(), &request, today).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_unstaffed(&result, request.role));
    }
    Ok(())
}

fn render_event(event: &CalendarEvent) -> String {
    let end_format = if event.end.date_naive() == event.start.date_naive() {
        "%H:%M"
    } else {
        "%Y-%m-%d %H:%M"
    };
    format!(
        "{} - {}  {}",
        event.start.format("%Y-%m-%d %H:%M"),
        event.end.format(end_format),
        event.summary
    )
}

fn render_events(name: &str, events: &[CalendarEvent]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} events, UTC)", name, events.len());
    for event in events {
        let _ = writeln!(out, "{}", render_event(event));
    }
    out
}

fn render_unstaffed(result: &UnstaffedFlights, role: Option<RoleCode>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} unstaffed flights", result.count);
    for flight in &result.data {
        let missing: Vec<String> = flight
            .required_crew
            .keys()
            .filter(|code| role.is_none_or(|role| role == **code))
            .filter_map(|code| {
                let missing = flight.missing(*code);
                (missing > 0).then(|| format!("{}x{}", code, missing))
            })
            .collect();
        let _ = writeln!(
            out,
            "{}  {:<8} {}-{}  {:<4} missing {}",
            flight.departure_time.format("%Y-%m-%d %H:%M"),
            flight.flight_number,
            flight.origin_iata_code,
            flight.destination_iata_code,
            flight.aircraft_type,
            missing.join(" ")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::TimeZone;
    use crewroster_core::{CrewMember, ScheduledFlight};
    use crewroster_providers::MemoryProvider;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn utc(d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, min, 0).unwrap()
    }

    fn context() -> RosterContext {
        RosterContext {
            provider: Arc::new(MemoryProvider::new("12345")),
            calendar: CalendarConfig::default().with_lookahead_days(10),
            json: false,
        }
    }

    #[test]
    fn window_defaults_to_lookahead() {
        let ctx = context();
        let range = ctx.window(date(3, 1), None, None).unwrap();
        assert_eq!(range, DateRange::new(date(3, 1), date(3, 11)));

        let range = ctx.window(date(3, 1), Some(date(3, 5)), None).unwrap();
        assert_eq!(range, DateRange::new(date(3, 5), date(3, 15)));

        assert!(ctx.window(date(3, 1), Some(date(3, 5)), Some(date(3, 4))).is_err());
    }

    #[test]
    fn day_bounds_cover_whole_days() {
        let (start, end) = day_bounds(DateRange::new(date(3, 1), date(3, 2)));
        assert_eq!(start, utc(1, 0, 0));
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 2, 23, 59, 59).unwrap());
    }

    #[test]
    fn render_events_lists_each_event() {
        let events = vec![
            CalendarEvent {
                start: utc(2, 8, 0),
                end: utc(2, 10, 5),
                summary: "AF1234 CDG-NCE".to_string(),
                description: None,
            },
            CalendarEvent {
                start: utc(2, 22, 0),
                end: utc(3, 6, 0),
                summary: "Night standby".to_string(),
                description: Some("Night standby".to_string()),
            },
        ];

        assert_eq!(
            render_events("Crew Roster [12345]", &events),
            "Crew Roster [12345] (2 events, UTC)\n\
             2025-03-02 08:00 - 10:05  AF1234 CDG-NCE\n\
             2025-03-02 22:00 - 2025-03-03 06:00  Night standby\n"
        );
    }

    #[test]
    fn render_unstaffed_shows_missing_roles() {
        let flight = ScheduledFlight {
            flight_number: "AF1234".to_string(),
            departure_time: utc(2, 8, 0),
            arrival_time: utc(2, 10, 0),
            origin_iata_code: "CDG".to_string(),
            destination_iata_code: "NCE".to_string(),
            aircraft_type: "320".to_string(),
            required_crew: BTreeMap::from([(RoleCode::Cdb, 1), (RoleCode::Cc, 2)]),
            crew_members: vec![CrewMember::new("AAA", RoleCode::Cc)],
        };
        let result = UnstaffedFlights {
            count: 1,
            data: vec![flight],
        };

        assert_eq!(
            render_unstaffed(&result, None),
            "1 unstaffed flights\n2025-03-02 08:00  AF1234   CDG-NCE  320  missing CDBx1 CCx1\n"
        );
        assert_eq!(
            render_unstaffed(&result, Some(RoleCode::Cc)),
            "1 unstaffed flights\n2025-03-02 08:00  AF1234   CDG-NCE  320  missing CCx1\n"
        );
    }
}
