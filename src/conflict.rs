//! Pairwise schedule-conflict detection across a small set of sections.
//!
//! Once the index numbers pass shape validation, this module always returns
//! a report: missing sections, TBA meetings, closed sections, and odd credit
//! loads become warnings rather than failures.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ScheduleError, Warning};
use crate::store::ScheduleStore;
use crate::time;
use crate::types::{Campus, Day, IndexNumber, MeetingTime, Section, Term};

/// Fewest sections worth comparing.
pub const MIN_SECTIONS: usize = 2;
/// Most sections accepted in one request.
pub const MAX_SECTIONS: usize = 10;

const FULL_TIME_CREDITS: f32 = 12.0;
const MAX_STANDARD_CREDITS: f32 = 21.0;

/// A conflict-check request: 2-10 raw index numbers plus term context.
#[derive(Debug, Clone)]
pub struct ConflictRequest {
    pub indexes: Vec<String>,
    pub term: Term,
    pub campus: Campus,
}

/// Identifying summary of one section, for conflict entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub index: IndexNumber,
    pub course: String,
    pub title: String,
}

impl SectionSummary {
    fn of(section: &Section) -> SectionSummary {
        SectionSummary {
            index: section.index.clone(),
            course: section.course.clone(),
            title: section.title.clone(),
        }
    }
}

/// Two meetings of different sections occupying the same time on a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictEntry {
    pub first: SectionSummary,
    pub second: SectionSummary,
    pub day: Day,
    pub overlap_start_minutes: u16,
    pub overlap_end_minutes: u16,
    /// Human-formatted range, e.g. "11:00 AM - 11:40 AM"
    pub overlap: String,
}

/// One meeting in the normalized schedule view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleMeeting {
    pub day: Option<Day>,
    /// "10:20 AM - 11:40 AM", or None for a TBA meeting
    pub time: Option<String>,
    pub location: Option<String>,
    pub mode: Option<&'static str>,
}

/// One section in the normalized schedule view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub index: IndexNumber,
    pub course: String,
    pub title: String,
    pub credits: Option<f32>,
    pub open: bool,
    pub meetings: Vec<ScheduleMeeting>,
}

/// The always-returned result of a conflict check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflicts: Vec<ConflictEntry>,
    pub schedule: Vec<ScheduleEntry>,
    /// None when any section's credits are unknown
    pub total_credits: Option<f32>,
    pub warnings: Vec<Warning>,
}

fn format_range(start: u16, end: u16) -> String {
    format!(
        "{} - {}",
        time::format_minutes(start),
        time::format_minutes(end)
    )
}

fn schedule_meeting(meeting: &MeetingTime) -> ScheduleMeeting {
    let location = match (&meeting.building, &meeting.room) {
        (Some(building), Some(room)) => Some(format!("{building}-{room}")),
        (Some(building), None) => Some(building.clone()),
        _ => None,
    };
    ScheduleMeeting {
        day: meeting.day,
        time: meeting
            .timed_interval()
            .map(|i| format_range(i.start, i.end)),
        location,
        mode: meeting.mode_description(),
    }
}

fn schedule_entry(section: &Section) -> ScheduleEntry {
    ScheduleEntry {
        index: section.index.clone(),
        course: section.course.clone(),
        title: section.title.clone(),
        credits: section.credits,
        open: section.open,
        meetings: section.meetings.iter().map(schedule_meeting).collect(),
    }
}

/// Sum of section credits, or None once any section's credits are unknown.
fn total_credits(sections: &[Section]) -> Option<f32> {
    sections
        .iter()
        .map(|s| s.credits)
        .sum::<Option<f32>>()
}

fn conflicts_between(first: &Section, second: &Section) -> Vec<ConflictEntry> {
    let mut found = Vec::new();
    for m1 in &first.meetings {
        for m2 in &second.meetings {
            let (Some(day1), Some(iv1)) = (m1.day, m1.timed_interval()) else {
                continue;
            };
            let (Some(day2), Some(iv2)) = (m2.day, m2.timed_interval()) else {
                continue;
            };
            if day1 != day2 {
                continue;
            }
            if let Some(overlap) = time::overlap_range(iv1.start, iv1.end, iv2.start, iv2.end) {
                found.push(ConflictEntry {
                    first: SectionSummary::of(first),
                    second: SectionSummary::of(second),
                    day: day1,
                    overlap_start_minutes: overlap.start,
                    overlap_end_minutes: overlap.end,
                    overlap: format_range(overlap.start, overlap.end),
                });
            }
        }
    }
    found
}

/// Checks a set of sections for pairwise time conflicts.
///
/// Fails only on malformed input (index shape, request size) or a store
/// failure; every scheduling oddity downstream of that is reported in the
/// result's warnings.
pub fn detect_conflicts(
    store: &impl ScheduleStore,
    request: &ConflictRequest,
) -> Result<ConflictReport, ScheduleError> {
    info!(
        count = request.indexes.len(),
        term = %request.term,
        campus = request.campus.code(),
        "checking schedule for conflicts"
    );

    if request.indexes.len() < MIN_SECTIONS || request.indexes.len() > MAX_SECTIONS {
        return Err(ScheduleError::validation(format!(
            "Expected between {MIN_SECTIONS} and {MAX_SECTIONS} index numbers, got {}",
            request.indexes.len()
        )));
    }

    // Shape validation happens before any store access.
    let mut indexes: Vec<IndexNumber> = Vec::with_capacity(request.indexes.len());
    for raw in &request.indexes {
        let index = IndexNumber::parse(raw)?;
        if !indexes.contains(&index) {
            indexes.push(index);
        }
    }

    let sections = store.sections_for_indexes(request.term, request.campus, &indexes)?;

    let mut warnings = Vec::new();
    for index in &indexes {
        if !sections.iter().any(|s| &s.index == index) {
            warnings.push(Warning::SectionNotFound {
                index: index.to_string(),
            });
        }
    }

    for section in &sections {
        if section.meetings.iter().any(MeetingTime::is_tba) {
            warnings.push(Warning::TbaMeeting {
                index: section.index.to_string(),
            });
        }
        if !section.open {
            warnings.push(Warning::ClosedSection {
                index: section.index.to_string(),
            });
        }
    }

    let schedule: Vec<ScheduleEntry> = sections.iter().map(schedule_entry).collect();
    let total = total_credits(&sections);
    if let Some(credits) = total {
        if credits < FULL_TIME_CREDITS {
            warnings.push(Warning::BelowFullTime {
                total_credits: credits,
            });
        } else if credits > MAX_STANDARD_CREDITS {
            warnings.push(Warning::ExceedsMaxCredits {
                total_credits: credits,
            });
        }
    }

    if sections.len() < MIN_SECTIONS {
        warnings.push(Warning::NotEnoughSections {
            found: sections.len(),
        });
        return Ok(ConflictReport {
            has_conflicts: false,
            conflicts: Vec::new(),
            schedule,
            total_credits: total,
            warnings,
        });
    }

    let mut conflicts = Vec::new();
    for (i, first) in sections.iter().enumerate() {
        for second in &sections[i + 1..] {
            conflicts.extend(conflicts_between(first, second));
        }
    }
    debug!(conflicts = conflicts.len(), sections = sections.len(), "pairwise check complete");

    Ok(ConflictReport {
        has_conflicts: !conflicts.is_empty(),
        conflicts,
        schedule,
        total_credits: total,
        warnings,
    })
}
