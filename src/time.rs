//! Military-time parsing and interval algebra.
//!
//! All times are minutes since midnight (0..=1439). Intervals are half-open
//! in spirit: an interval ending at 1100 does not collide with one starting
//! at 1100, so back-to-back classes never conflict.

use crate::types::Interval;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Returns true iff `s` is a valid 4-digit 24-hour clock string ("HHMM").
pub fn is_valid_military_time(s: &str) -> bool {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let hours: u16 = s[..2].parse().unwrap_or(u16::MAX);
    let minutes: u16 = s[2..].parse().unwrap_or(u16::MAX);
    hours <= 23 && minutes <= 59
}

/// Converts a valid military time string to minutes since midnight.
///
/// Returns `None` when the string is not a valid military time.
pub fn to_minutes(s: &str) -> Option<u16> {
    if !is_valid_military_time(s) {
        return None;
    }
    let hours: u16 = s[..2].parse().ok()?;
    let minutes: u16 = s[2..].parse().ok()?;
    Some(hours * 60 + minutes)
}

/// Converts minutes since midnight back to a military time string.
///
/// Out-of-range inputs are clamped to [0, 1439].
pub fn from_minutes(minutes: u16) -> String {
    let clamped = minutes.min(MINUTES_PER_DAY - 1);
    format!("{:02}{:02}", clamped / 60, clamped % 60)
}

/// Formats minutes since midnight as a 12-hour clock string, e.g. "10:20 AM".
pub fn format_minutes(minutes: u16) -> String {
    let clamped = minutes.min(MINUTES_PER_DAY - 1);
    let hours = clamped / 60;
    let mins = clamped % 60;
    let meridiem = if hours < 12 { "AM" } else { "PM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hours}:{mins:02} {meridiem}")
}

/// Merges a list of intervals into a sorted, non-overlapping list.
///
/// Touching intervals (next start == running end) are coalesced, which is
/// what occupancy math wants even though touching is not a conflict.
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.to_vec();
    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Strict overlap test: touching endpoints do not overlap.
pub fn times_overlap(start1: u16, end1: u16, start2: u16, end2: u16) -> bool {
    start1 < end2 && start2 < end1
}

/// The shared range of two overlapping intervals, or `None` when disjoint.
pub fn overlap_range(start1: u16, end1: u16, start2: u16, end2: u16) -> Option<Interval> {
    if !times_overlap(start1, end1, start2, end2) {
        return None;
    }
    Some(Interval {
        start: start1.max(start2),
        end: end1.min(end2),
    })
}
