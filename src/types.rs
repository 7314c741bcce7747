//! Strongly-typed domain model for SOC schedule data.
//!
//! External stores return loosely-typed rows ([`SectionRow`], [`MeetingRow`]);
//! those are converted into the typed model here, at the boundary, so that
//! "unknown" (TBA day, missing credits) is visible in the type system and no
//! duck-typed access leaks into the algorithms.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::time;

/// Rutgers SOC meeting-mode descriptions, keyed by two-digit mode code.
static MEETING_MODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("02", "Lecture"),
        ("03", "Recitation"),
        ("04", "Seminar"),
        ("05", "Laboratory"),
        ("06", "Studio"),
        ("07", "Workshop"),
        ("15", "Individual Study"),
        ("90", "Fully Online"),
        ("91", "Hybrid"),
        ("92", "Remote Synchronous"),
    ])
});

/// Human description for a meeting-mode code, if the code is known.
pub fn meeting_mode_description(code: &str) -> Option<&'static str> {
    MEETING_MODES.get(code).copied()
}

/// Day-of-week as encoded in SOC meeting data (H = Thursday, U = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Parses an SOC single-letter day code.
    pub fn from_code(code: char) -> Option<Day> {
        match code.to_ascii_uppercase() {
            'M' => Some(Day::Monday),
            'T' => Some(Day::Tuesday),
            'W' => Some(Day::Wednesday),
            'H' => Some(Day::Thursday),
            'F' => Some(Day::Friday),
            'S' => Some(Day::Saturday),
            'U' => Some(Day::Sunday),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Day::Monday => 'M',
            Day::Tuesday => 'T',
            Day::Wednesday => 'W',
            Day::Thursday => 'H',
            Day::Friday => 'F',
            Day::Saturday => 'S',
            Day::Sunday => 'U',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn from_weekday(weekday: chrono::Weekday) -> Day {
        match weekday {
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
            chrono::Weekday::Sun => Day::Sunday,
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Academic season, with its SOC term code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// SOC term-code digit: 0=Winter, 1=Spring, 7=Summer, 9=Fall.
    pub fn code(&self) -> char {
        match self {
            Season::Winter => '0',
            Season::Spring => '1',
            Season::Summer => '7',
            Season::Fall => '9',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

/// An academic term such as Spring 2026.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    pub year: i32,
    pub season: Season,
}

impl Term {
    pub fn new(year: i32, season: Season) -> Term {
        Term { year, season }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.season.name(), self.year)
    }
}

/// Rutgers campus, with its SOC campus code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Campus {
    NewBrunswick,
    Newark,
    Camden,
}

impl Campus {
    pub fn from_code(code: &str) -> Option<Campus> {
        match code.to_ascii_uppercase().as_str() {
            "NB" => Some(Campus::NewBrunswick),
            "NK" => Some(Campus::Newark),
            "CM" => Some(Campus::Camden),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Campus::NewBrunswick => "NB",
            Campus::Newark => "NK",
            Campus::Camden => "CM",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Campus::NewBrunswick => "New Brunswick",
            Campus::Newark => "Newark",
            Campus::Camden => "Camden",
        }
    }
}

/// A 5-digit registration index number identifying one section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexNumber(String);

impl IndexNumber {
    /// Validates the 5-digit shape. This runs before any data access, so a
    /// malformed index never reaches the store.
    pub fn parse(s: &str) -> Result<IndexNumber, ScheduleError> {
        let trimmed = s.trim();
        if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(IndexNumber(trimmed.to_string()))
        } else {
            Err(ScheduleError::validation(format!(
                "Index number '{s}' must be exactly 5 digits"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IndexNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A span of minutes within one day. Invariant: `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: u16,
    pub end: u16,
}

impl Interval {
    /// Builds an interval, rejecting non-increasing bounds.
    pub fn checked(start: u16, end: u16) -> Option<Interval> {
        (end > start).then_some(Interval { start, end })
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end - self.start
    }
}

/// One meeting pattern of a section.
///
/// A meeting with no day or no usable start/end time is "TBA": it cannot be
/// checked for conflicts and must be flagged, never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingTime {
    pub day: Option<Day>,
    pub start_minutes: Option<u16>,
    pub end_minutes: Option<u16>,
    pub building: Option<String>,
    pub room: Option<String>,
    pub campus_name: Option<String>,
    pub mode_code: Option<String>,
}

impl MeetingTime {
    /// True when this meeting cannot be placed on the weekly grid.
    pub fn is_tba(&self) -> bool {
        self.day.is_none() || self.timed_interval().is_none()
    }

    /// The meeting's interval, when both endpoints are known and increasing.
    pub fn timed_interval(&self) -> Option<Interval> {
        match (self.start_minutes, self.end_minutes) {
            (Some(start), Some(end)) => Interval::checked(start, end),
            _ => None,
        }
    }

    /// Human description of the meeting mode, e.g. "Lecture".
    pub fn mode_description(&self) -> Option<&'static str> {
        self.mode_code.as_deref().and_then(meeting_mode_description)
    }
}

/// One offered section of a course, with its ordered meeting patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub index: IndexNumber,
    pub course: String,
    pub title: String,
    /// `None` means the catalog does not state credits (e.g. by-arrangement);
    /// unknown propagates into an unknown total, never into zero.
    pub credits: Option<f32>,
    pub open: bool,
    pub meetings: Vec<MeetingTime>,
}

/// A canonical room within a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub building: String,
    pub room: String,
    /// Original room formatting, preserved for presentation.
    pub display_room: String,
}

impl Room {
    pub fn new(building: &str, display_room: &str) -> Room {
        Room {
            building: building.trim().to_ascii_uppercase(),
            room: display_room.trim().to_ascii_uppercase(),
            display_room: display_room.trim().to_string(),
        }
    }

    /// Label used for presentation and for deterministic tie-breaks.
    pub fn label(&self) -> String {
        format!("{}-{}", self.building, self.room)
    }
}

/// A contiguous span during which a room has no scheduled occupant.
/// Always derived per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeWindow {
    pub start_minutes: u16,
    pub end_minutes: u16,
    pub duration_minutes: u16,
}

impl FreeWindow {
    pub fn from_interval(interval: Interval) -> FreeWindow {
        FreeWindow {
            start_minutes: interval.start,
            end_minutes: interval.end,
            duration_minutes: interval.duration_minutes(),
        }
    }
}

// ── Raw rows from the external store ──────────────────────────────

/// A meeting row as an external store returns it, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRow {
    pub meeting_day: Option<String>,
    pub start_time_military: Option<String>,
    pub end_time_military: Option<String>,
    pub building_code: Option<String>,
    pub room_number: Option<String>,
    pub campus_name: Option<String>,
    pub meeting_mode_code: Option<String>,
}

/// A section row as an external store returns it, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRow {
    pub index_number: String,
    pub course_string: String,
    pub title: String,
    pub credits: Option<f32>,
    pub open_status: bool,
    #[serde(default)]
    pub meeting_times: Vec<MeetingRow>,
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parses an optional military time field. Absent or blank means TBA;
/// present but malformed is a hard input error.
fn parse_row_time(
    value: Option<String>,
    index: &str,
    which: &str,
) -> Result<Option<u16>, ScheduleError> {
    match none_if_blank(value) {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim().to_string();
            time::to_minutes(&trimmed).map(Some).ok_or_else(|| {
                ScheduleError::validation(format!(
                    "Section {index} has a malformed {which} time '{trimmed}'"
                ))
            })
        }
    }
}

impl MeetingRow {
    fn into_meeting(self, index: &str) -> Result<MeetingTime, ScheduleError> {
        let day = match none_if_blank(self.meeting_day) {
            None => None,
            Some(code) => {
                let trimmed = code.trim().to_string();
                let mut chars = trimmed.chars();
                match (chars.next().and_then(Day::from_code), chars.next()) {
                    (Some(day), None) => Some(day),
                    _ => {
                        return Err(ScheduleError::validation(format!(
                            "Section {index} has an unrecognized day code '{trimmed}'"
                        )))
                    }
                }
            }
        };

        Ok(MeetingTime {
            day,
            start_minutes: parse_row_time(self.start_time_military, index, "start")?,
            end_minutes: parse_row_time(self.end_time_military, index, "end")?,
            building: none_if_blank(self.building_code).map(|b| b.trim().to_ascii_uppercase()),
            room: none_if_blank(self.room_number).map(|r| r.trim().to_string()),
            campus_name: none_if_blank(self.campus_name),
            mode_code: none_if_blank(self.meeting_mode_code),
        })
    }
}

impl TryFrom<SectionRow> for Section {
    type Error = ScheduleError;

    fn try_from(row: SectionRow) -> Result<Section, ScheduleError> {
        let index = IndexNumber::parse(&row.index_number)?;
        let meetings = row
            .meeting_times
            .into_iter()
            .map(|m| m.into_meeting(index.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Section {
            index,
            course: row.course_string,
            title: row.title,
            credits: row.credits,
            open: row.open_status,
            meetings,
        })
    }
}
