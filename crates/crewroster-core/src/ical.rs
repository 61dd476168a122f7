//! iCal export of rosters.
//!
//! The exporter renders a [`Roster`] into the simplified iCalendar text the
//! crew web service itself publishes. Output is a pure function of the roster
//! and the exporter's timestamp, so identical input renders byte-identical
//! documents.
//!
//! ```ignore
//! use crewroster_core::ical::IcalExporter;
//!
//! let document = IcalExporter::now().render(&roster);
//! document.write_to_file("/config/12345_roster.ics")?;
//! ```

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::activity::{Activity, CrewGroup, DeadheadActivity, FlightActivity};
use crate::error::ExportError;
use crate::roster::Roster;
use crate::time::{format_block_time, format_ical_timestamp, format_utc_offset};

/// Product identifier written in the calendar header.
pub const PRODUCT_ID: &str = "-//Apm Technologies//CrewWebPlus//EN";

/// Prefix of the per-user calendar identifier.
pub const CALENDAR_ID_PREFIX: &str = "CrewWebPlusCalendar-";

/// iCalendar escape for a newline inside a property value.
const ESCAPED_NEWLINE: &str = "\\n";

/// Sentinel written in UIDs when an identifier is missing or zero.
const MISSING_ID: i64 = -1;

/// Renders rosters as iCal documents.
///
/// The `DTSTAMP` of every event is the timestamp captured when the exporter
/// is built, not the time each event is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcalExporter {
    timestamp: DateTime<Utc>,
}

impl IcalExporter {
    /// Creates an exporter stamping events with the given time.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    /// Creates an exporter stamping events with the current time.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Returns the generation timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Renders a roster, keeping the roster's activity order.
    pub fn render(&self, roster: &Roster) -> IcalDocument {
        let mut writer = LineWriter::default();
        let dtstamp = format_ical_timestamp(self.timestamp);

        writer.line("BEGIN", "VCALENDAR");
        writer.line("VERSION", "2.0");
        writer.line("METHOD", "PUBLISH");
        writer.line("PRODID", PRODUCT_ID);
        writer.line("X-WR-RELCALID", &format!("{}{}", CALENDAR_ID_PREFIX, roster.user_id));

        let mut event_count = 0;
        for activity in &roster.activities {
            if !activity.is_exportable() {
                debug!(start = %activity.start(), "Skipping non-exportable activity");
                continue;
            }
            write_event(&mut writer, &roster.user_id, &dtstamp, activity);
            event_count += 1;
        }

        writer.blank();
        writer.line("END", "VCALENDAR");
        writer.blank();

        debug!(
            user_id = %roster.user_id,
            activities = roster.activities.len(),
            events = event_count,
            "Rendered roster to iCal"
        );

        IcalDocument {
            user_id: roster.user_id.clone(),
            event_count,
            contents: writer.finish(),
        }
    }
}

impl Default for IcalExporter {
    fn default() -> Self {
        Self::now()
    }
}

/// A rendered iCal document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcalDocument {
    user_id: String,
    event_count: usize,
    contents: String,
}

impl IcalDocument {
    /// Returns the owner of the exported roster.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the number of VEVENT blocks.
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    pub fn as_str(&self) -> &str {
        &self.contents
    }

    pub fn into_string(self) -> String {
        self.contents
    }

    /// Writes the document to `path` as UTF-8, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Write`] if the file cannot be created or written.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        let mut file = File::create(path).map_err(|e| ExportError::write(path, e))?;
        file.write_all(self.contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| ExportError::write(path, e))?;

        info!(
            path = %path.display(),
            events = self.event_count,
            "Wrote iCal export"
        );
        Ok(())
    }
}

impl fmt::Display for IcalDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.contents)
    }
}

/// Append-only buffer of `KEY:VALUE` lines.
#[derive(Debug, Default)]
struct LineWriter {
    buf: String,
}

impl LineWriter {
    fn line(&mut self, key: &str, value: &str) {
        self.buf.push_str(key);
        self.buf.push(':');
        self.buf.push_str(value);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// The service treats a zero id like a missing one.
fn uid_part(id: Option<i64>) -> i64 {
    id.filter(|id| *id != 0).unwrap_or(MISSING_ID)
}

fn write_event(writer: &mut LineWriter, user_id: &str, dtstamp: &str, activity: &Activity) {
    let common = activity.common();

    writer.blank();
    writer.line("BEGIN", "VEVENT");
    writer.line(
        "UID",
        &format!(
            "{}#ActId:{}#CmpId:{}",
            user_id,
            uid_part(common.pairing_id),
            uid_part(common.id)
        ),
    );
    writer.line("DTSTAMP", dtstamp);
    writer.line("DTSTART;VALUE=DATE-TIME", &format_ical_timestamp(common.start));
    writer.line("DTEND;VALUE=DATE-TIME", &format_ical_timestamp(common.end));
    writer.line("STATUS", "CONFIRMED");
    writer.line("CATEGORIES", &common.category);
    writer.line("SUMMARY", &summary(activity));
    writer.line("DESCRIPTION", &description(activity));
    writer.line("END", "VEVENT");
}

fn summary(activity: &Activity) -> String {
    match activity {
        Activity::Flight(flight) => flight_summary(flight),
        Activity::Deadhead(deadhead) => deadhead_summary(deadhead),
        Activity::Hotel(_) | Activity::Other(_) => format!(" {}", activity.details()),
    }
}

fn flight_summary(flight: &FlightActivity) -> String {
    let offset = format_utc_offset(&flight.destination_timezone, flight.common.end)
        .unwrap_or_else(|| {
            warn!(
                timezone = %flight.destination_timezone,
                flight = %flight.flight_number,
                "Unknown destination timezone, writing it verbatim"
            );
            flight.destination_timezone.clone()
        });

    format!(
        "{} {}-{}({})",
        flight.flight_number, flight.origin_iata_code, flight.destination_iata_code, offset
    )
}

fn deadhead_summary(deadhead: &DeadheadActivity) -> String {
    format!(
        "{} {}*{}",
        deadhead.description, deadhead.origin_iata_code, deadhead.destination_iata_code
    )
}

fn description(activity: &Activity) -> String {
    match activity {
        Activity::Flight(flight) => flight_description(flight, activity.remarks()),
        Activity::Deadhead(_) | Activity::Hotel(_) | Activity::Other(_) => {
            let block = activity
                .block_time()
                .map(|block| format!("BLK : {}", format_block_time(block)));
            let remark = activity.remarks().map(|remarks| format!("Remark : {}", remarks));

            [block, remark]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(ESCAPED_NEWLINE)
        }
    }
}

fn flight_description(flight: &FlightActivity, remarks: Option<&str>) -> String {
    let technical = flight.crew_codes(CrewGroup::Technical).collect::<Vec<_>>();
    let cabin = flight.crew_codes(CrewGroup::Cabin).collect::<Vec<_>>();

    let mut out = String::new();
    for (label, value) in [
        ("FCT : ", flight.role.as_str()),
        ("A/C : ", flight.aircraft_code.as_str()),
        // BLK repeats the aircraft code, matching the crew web service export.
        ("BLK : ", flight.aircraft_code.as_str()),
    ] {
        out.push_str(label);
        out.push_str(value);
        out.push_str(ESCAPED_NEWLINE);
    }

    out.push_str("Crew Member : ");
    out.push_str(CrewGroup::Technical.label());
    out.push(':');
    out.push_str(&technical.join("-"));
    out.push_str(ESCAPED_NEWLINE);
    out.push_str(CrewGroup::Cabin.label());
    out.push(':');
    out.push_str(&cabin.join("-"));
    out.push_str(ESCAPED_NEWLINE);

    if let Some(remarks) = remarks {
        out.push_str("Remark : ");
        out.push_str(remarks);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{
        ActivityCommon, CrewMember, GenericActivity, HotelActivity, RoleCode,
    };
    use crate::time::DateRange;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn exporter() -> IcalExporter {
        IcalExporter::new(utc(2025, 6, 20, 12, 0))
    }

    fn july() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        )
    }

    fn flight() -> FlightActivity {
        FlightActivity::new(
            ActivityCommon::new(utc(2025, 7, 1, 6, 0), utc(2025, 7, 1, 7, 35), "FLT")
                .with_ids(Some(7), Some(42))
                .with_remarks("Catering check"),
            "AF1234",
            "CDG",
            "NCE",
            "Europe/Paris",
        )
        .with_aircraft("320")
        .with_role("OPL")
        .with_crew_member(CrewMember::new("ABC", RoleCode::Cdb))
        .with_crew_member(CrewMember::new("DEF", RoleCode::Cc))
        .with_crew_member(CrewMember::new("GHI", RoleCode::Opl))
        .with_crew_member(CrewMember::new("JKL", RoleCode::Ca))
    }

    fn hotel(day: u32) -> HotelActivity {
        HotelActivity {
            common: ActivityCommon::new(utc(2025, 7, day, 9, 0), utc(2025, 7, day + 1, 5, 0), "HTL")
                .with_details("Hotel Negresco"),
        }
    }

    fn sample_roster() -> Roster {
        Roster::new("12345", july())
            .with_activity(flight())
            .with_activity(hotel(1))
            .with_activity(DeadheadActivity::new(
                ActivityCommon::new(utc(2025, 7, 2, 6, 0), utc(2025, 7, 2, 7, 20), "DHD")
                    .with_remarks("Seat 3A"),
                "AF7701",
                "NCE",
                "ORY",
            ))
            .with_activity(
                GenericActivity::new(
                    ActivityCommon::new(utc(2025, 7, 3, 8, 0), utc(2025, 7, 3, 12, 0), "SIM")
                        .with_ids(None, Some(99))
                        .with_details("Simulator"),
                )
                .with_block_time(Duration::hours(4)),
            )
            .with_activity(GenericActivity::new(
                ActivityCommon::new(utc(2025, 7, 4, 0, 0), utc(2025, 7, 5, 0, 0), "OFF")
                    .with_details("Day off"),
            ))
    }

    #[test]
    fn golden_roster_export() {
        let document = exporter().render(&sample_roster());
        assert_eq!(document.event_count(), 4);
        assert_eq!(document.user_id(), "12345");

        insta::assert_snapshot!(document.as_str(), @r"
BEGIN:VCALENDAR
VERSION:2.0
METHOD:PUBLISH
PRODID:-//Apm Technologies//CrewWebPlus//EN
X-WR-RELCALID:CrewWebPlusCalendar-12345

BEGIN:VEVENT
UID:12345#ActId:7#CmpId:42
DTSTAMP:20250620T120000Z
DTSTART;VALUE=DATE-TIME:20250701T060000Z
DTEND;VALUE=DATE-TIME:20250701T073500Z
STATUS:CONFIRMED
CATEGORIES:FLT
SUMMARY:AF1234 CDG-NCE(+02:00)
DESCRIPTION:FCT : OPL\nA/C : 320\nBLK : 320\nCrew Member : T:ABC-GHI\nC:DEF-JKL\nRemark : Catering check
END:VEVENT

BEGIN:VEVENT
UID:12345#ActId:-1#CmpId:-1
DTSTAMP:20250620T120000Z
DTSTART;VALUE=DATE-TIME:20250702T060000Z
DTEND;VALUE=DATE-TIME:20250702T072000Z
STATUS:CONFIRMED
CATEGORIES:DHD
SUMMARY:AF7701 NCE*ORY
DESCRIPTION:Remark : Seat 3A
END:VEVENT

BEGIN:VEVENT
UID:12345#ActId:-1#CmpId:99
DTSTAMP:20250620T120000Z
DTSTART;VALUE=DATE-TIME:20250703T080000Z
DTEND;VALUE=DATE-TIME:20250703T120000Z
STATUS:CONFIRMED
CATEGORIES:SIM
SUMMARY: Simulator
DESCRIPTION:BLK : 04:00
END:VEVENT

BEGIN:VEVENT
UID:12345#ActId:-1#CmpId:-1
DTSTAMP:20250620T120000Z
DTSTART;VALUE=DATE-TIME:20250704T000000Z
DTEND;VALUE=DATE-TIME:20250705T000000Z
STATUS:CONFIRMED
CATEGORIES:OFF
SUMMARY: Day off
DESCRIPTION:
END:VEVENT

END:VCALENDAR
");
    }

    #[test]
    fn document_layout_is_exact() {
        let roster = Roster::new("12345", july()).with_activity(GenericActivity::new(
            ActivityCommon::new(utc(2025, 7, 4, 0, 0), utc(2025, 7, 5, 0, 0), "OFF")
                .with_details("Day off")
                .with_remarks("Requested"),
        ));

        let expected = "BEGIN:VCALENDAR\n\
                        VERSION:2.0\n\
                        METHOD:PUBLISH\n\
                        PRODID:-//Apm Technologies//CrewWebPlus//EN\n\
                        X-WR-RELCALID:CrewWebPlusCalendar-12345\n\
                        \n\
                        BEGIN:VEVENT\n\
                        UID:12345#ActId:-1#CmpId:-1\n\
                        DTSTAMP:20250620T120000Z\n\
                        DTSTART;VALUE=DATE-TIME:20250704T000000Z\n\
                        DTEND;VALUE=DATE-TIME:20250705T000000Z\n\
                        STATUS:CONFIRMED\n\
                        CATEGORIES:OFF\n\
                        SUMMARY: Day off\n\
                        DESCRIPTION:Remark : Requested\n\
                        END:VEVENT\n\
                        \n\
                        END:VCALENDAR\n\
                        \n";

        assert_eq!(exporter().render(&roster).as_str(), expected);
    }

    #[test]
    fn render_is_deterministic() {
        let roster = sample_roster();
        let exporter = exporter();

        let first = exporter.render(&roster);
        let second = exporter.render(&roster);
        assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
    }

    #[test]
    fn dtstamp_shared_across_events() {
        let document = exporter().render(&sample_roster());
        let stamps: Vec<_> = document
            .as_str()
            .lines()
            .filter(|line| line.starts_with("DTSTAMP:"))
            .collect();
        assert_eq!(stamps.len(), 4);
        assert!(stamps.iter().all(|line| *line == "DTSTAMP:20250620T120000Z"));
    }

    #[test]
    fn hotel_only_roster_has_no_events() {
        let roster = Roster::new("12345", july())
            .with_activity(hotel(1))
            .with_activity(hotel(2));

        let document = exporter().render(&roster);
        assert_eq!(document.event_count(), 0);
        assert!(!document.as_str().contains("BEGIN:VEVENT"));
        assert_eq!(
            document.as_str(),
            "BEGIN:VCALENDAR\n\
             VERSION:2.0\n\
             METHOD:PUBLISH\n\
             PRODID:-//Apm Technologies//CrewWebPlus//EN\n\
             X-WR-RELCALID:CrewWebPlusCalendar-12345\n\
             \n\
             END:VCALENDAR\n\
             \n"
        );
    }

    #[test]
    fn crew_grouping() {
        let flight = FlightActivity::new(
            ActivityCommon::new(utc(2025, 7, 1, 6, 0), utc(2025, 7, 1, 7, 35), "FLT"),
            "AF1234",
            "CDG",
            "NCE",
            "Europe/Paris",
        )
        .with_crew_member(CrewMember::new("CPT", RoleCode::Cdb))
        .with_crew_member(CrewMember::new("PUR", RoleCode::Cc));

        let roster = Roster::new("12345", july()).with_activity(flight);
        let document = exporter().render(&roster);
        let text = document.as_str();

        assert!(text.contains("Crew Member : T:CPT\\nC:PUR\\n"));
        assert_eq!(text.matches("CPT").count(), 1);
        assert_eq!(text.matches("PUR").count(), 1);
    }

    #[test]
    fn flight_without_remarks_keeps_trailing_escape() {
        let mut flight = flight();
        flight.common.remarks = None;
        let description = description(&Activity::from(flight));
        assert!(description.ends_with("C:DEF-JKL\\n"));
        assert!(!description.contains("Remark"));
    }

    #[test]
    fn unknown_timezone_is_written_verbatim() {
        let mut flight = flight();
        flight.destination_timezone = "Mars/Olympus".to_string();
        assert_eq!(flight_summary(&flight), "AF1234 CDG-NCE(Mars/Olympus)");
    }

    #[test]
    fn zero_and_missing_ids_become_sentinel() {
        let duty = |day: u32, pairing_id: Option<i64>, id: Option<i64>| {
            GenericActivity::new(
                ActivityCommon::new(utc(2025, 7, day, 8, 0), utc(2025, 7, day, 9, 0), "GRD")
                    .with_details("Ground")
                    .with_ids(pairing_id, id),
            )
        };
        let roster = Roster::new("12345", july())
            .with_activity(duty(2, Some(0), Some(0)))
            .with_activity(duty(3, None, None))
            .with_activity(duty(4, Some(3), Some(0)));

        let document = exporter().render(&roster);
        let uids: Vec<&str> = document
            .as_str()
            .lines()
            .filter(|line| line.starts_with("UID:"))
            .collect();
        assert_eq!(
            uids,
            vec![
                "UID:12345#ActId:-1#CmpId:-1",
                "UID:12345#ActId:-1#CmpId:-1",
                "UID:12345#ActId:3#CmpId:-1",
            ]
        );
    }

    #[test]
    fn roster_order_is_preserved() {
        let late = GenericActivity::new(
            ActivityCommon::new(utc(2025, 7, 20, 8, 0), utc(2025, 7, 20, 9, 0), "GRD")
                .with_details("Late"),
        );
        let early = GenericActivity::new(
            ActivityCommon::new(utc(2025, 7, 2, 8, 0), utc(2025, 7, 2, 9, 0), "GRD")
                .with_details("Early"),
        );
        let roster = Roster::new("12345", july())
            .with_activity(late)
            .with_activity(early);

        let document = exporter().render(&roster);
        let text = document.as_str();
        let late_at = text.find("SUMMARY: Late").unwrap();
        let early_at = text.find("SUMMARY: Early").unwrap();
        assert!(late_at < early_at);
    }

    #[test]
    fn write_to_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("12345_roster.ics");
        std::fs::write(&path, "stale content that is longer than nothing at all").unwrap();

        let document = exporter().render(&sample_roster());
        document.write_to_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, document.as_str());
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("roster.ics");

        let result = exporter().render(&sample_roster()).write_to_file(&path);
        match result {
            Err(ExportError::Write { path: failed, .. }) => assert_eq!(failed, path),
            Ok(()) => panic!("Expected write error"),
        }
    }
}
