//! Room-availability search: free windows per room, ranked.
//!
//! Given a fuzzy building query, the engine resolves the building, walks
//! each room's occupied intervals within the requested window, and ranks
//! rooms by their longest free window. When too few rooms have a
//! long-enough window, an optional fallback re-ranks using every free
//! window so the student still gets an answer.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ScheduleError, Warning};
use crate::location::{self, ResolvedBuilding};
use crate::store::ScheduleStore;
use crate::term;
use crate::time;
use crate::types::{Campus, Day, FreeWindow, Interval, Room, Term};

/// Latest default search boundary: 10:00 PM.
pub const DEFAULT_WINDOW_END: u16 = 22 * 60;
/// A "long" free window, absent an explicit minimum.
pub const DEFAULT_MIN_FREE_MINUTES: u16 = 60;
/// Fallback kicks in below this many qualifying rooms.
pub const DEFAULT_FALLBACK_THRESHOLD: usize = 3;
/// Rooms returned per search, absent an explicit cap.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A room-availability request. Unset day/window fields default to "today,
/// from now until 10 PM" at execution time.
#[derive(Debug, Clone)]
pub struct AvailabilityRequest {
    pub building: String,
    pub campus: Campus,
    pub term: Term,
    pub day: Option<Day>,
    pub window_start: Option<u16>,
    pub window_end: Option<u16>,
    pub min_free_minutes: u16,
    pub use_shorter_fallback: bool,
    pub fallback_threshold: usize,
    pub max_results: usize,
}

impl AvailabilityRequest {
    /// A request with registration-term and clock-based defaults.
    pub fn new(building: impl Into<String>, campus: Campus) -> AvailabilityRequest {
        AvailabilityRequest {
            building: building.into(),
            campus,
            term: term::current_term(),
            day: None,
            window_start: None,
            window_end: None,
            min_free_minutes: DEFAULT_MIN_FREE_MINUTES,
            use_shorter_fallback: true,
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// What was actually searched, echoed back with the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchContext {
    pub building: String,
    pub room_hint: Option<String>,
    pub day: Day,
    pub window_start_minutes: u16,
    pub window_end_minutes: u16,
    /// "2:00 PM - 10:00 PM"
    pub window: String,
    pub min_free_minutes: u16,
}

/// One room's availability within the search window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomAvailability {
    pub room: Room,
    pub longest_free_minutes: u16,
    /// True when this room was only included by the shorter fallback
    pub is_shorter_fallback: bool,
    pub free_windows: Vec<FreeWindow>,
}

/// The always-structured result of an availability search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityReport {
    pub search_context: SearchContext,
    pub rooms: Vec<RoomAvailability>,
    pub rooms_considered: usize,
    pub rooms_with_long_windows: usize,
    pub fallback_applied: bool,
    pub warnings: Vec<Warning>,
}

/// Clamps occupied intervals to the window and drops degenerate ones.
fn clamp_to_window(occupied: &[Interval], window: Interval) -> Vec<Interval> {
    occupied
        .iter()
        .filter_map(|i| Interval::checked(i.start.max(window.start), i.end.min(window.end)))
        .collect()
}

/// Gaps between merged occupied intervals, walked from the window start.
///
/// `occupied` must already be clamped to the window and merged.
pub fn compute_free_windows(occupied: &[Interval], window: Interval) -> Vec<FreeWindow> {
    let mut free = Vec::new();
    let mut cursor = window.start;
    for interval in occupied {
        if let Some(gap) = Interval::checked(cursor, interval.start) {
            free.push(FreeWindow::from_interval(gap));
        }
        cursor = cursor.max(interval.end);
    }
    if let Some(tail) = Interval::checked(cursor, window.end) {
        free.push(FreeWindow::from_interval(tail));
    }
    free
}

fn room_availability(
    store: &impl ScheduleStore,
    term: Term,
    room: Room,
    day: Day,
    window: Interval,
) -> Result<RoomAvailability, ScheduleError> {
    let occupied = store.occupied_intervals(term, &room, day)?;
    let clamped = clamp_to_window(&occupied, window);
    let merged = time::merge_intervals(&clamped);
    let free_windows = compute_free_windows(&merged, window);
    let longest_free_minutes = free_windows
        .iter()
        .map(|w| w.duration_minutes)
        .max()
        .unwrap_or(0);

    Ok(RoomAvailability {
        room,
        longest_free_minutes,
        is_shorter_fallback: false,
        free_windows,
    })
}

/// Finds rooms with free time in a building, ranked by longest free window.
///
/// Ties break on room label ascending so results are deterministic
/// regardless of inventory ordering.
pub fn find_available_rooms(
    store: &impl ScheduleStore,
    request: &AvailabilityRequest,
) -> Result<AvailabilityReport, ScheduleError> {
    let day = request.day.unwrap_or_else(term::current_day);
    let window_start = request.window_start.unwrap_or_else(term::current_minutes);
    let window_end = request.window_end.unwrap_or(DEFAULT_WINDOW_END);

    info!(
        building = %request.building,
        campus = request.campus.code(),
        term = %request.term,
        day = %day,
        "searching for available rooms"
    );

    let window = Interval::checked(window_start, window_end).ok_or_else(|| {
        ScheduleError::validation(format!(
            "Search window must end after it starts ({} >= {})",
            time::format_minutes(window_start),
            time::format_minutes(window_end)
        ))
    })?;

    let mut warnings = Vec::new();
    let directory = store.building_directory(request.term, request.campus)?;
    let ResolvedBuilding {
        code: building,
        room_hint,
        ..
    } = location::resolve_building(&request.building, &directory, &mut warnings)?;

    let search_context = SearchContext {
        building: building.clone(),
        room_hint,
        day,
        window_start_minutes: window.start,
        window_end_minutes: window.end,
        window: format!(
            "{} - {}",
            time::format_minutes(window.start),
            time::format_minutes(window.end)
        ),
        min_free_minutes: request.min_free_minutes,
    };

    let inventory = store.rooms_in_building(request.term, &building)?;
    if inventory.is_empty() {
        warnings.push(Warning::NoRoomsInBuilding {
            building: building.clone(),
        });
        return Ok(AvailabilityReport {
            search_context,
            rooms: Vec::new(),
            rooms_considered: 0,
            rooms_with_long_windows: 0,
            fallback_applied: false,
            warnings,
        });
    }

    let rooms_considered = inventory.len();
    let mut availabilities = Vec::with_capacity(rooms_considered);
    for room in inventory {
        availabilities.push(room_availability(store, request.term, room, day, window)?);
    }

    let rooms_with_long_windows = availabilities
        .iter()
        .filter(|a| a.longest_free_minutes >= request.min_free_minutes)
        .count();

    let fallback_applied =
        request.use_shorter_fallback && rooms_with_long_windows < request.fallback_threshold;

    let mut ranked: Vec<RoomAvailability> = if fallback_applied {
        // Re-rank over every room with any free time, marking the ones
        // that only got in because the minimum was relaxed.
        warnings.push(Warning::ShorterFallback {
            qualifying: rooms_with_long_windows,
            threshold: request.fallback_threshold,
        });
        availabilities
            .into_iter()
            .filter(|a| !a.free_windows.is_empty())
            .map(|mut a| {
                a.is_shorter_fallback = a.longest_free_minutes < request.min_free_minutes;
                a
            })
            .collect()
    } else {
        availabilities
            .into_iter()
            .filter(|a| a.longest_free_minutes >= request.min_free_minutes)
            .collect()
    };

    ranked.sort_by(|a, b| {
        b.longest_free_minutes
            .cmp(&a.longest_free_minutes)
            .then_with(|| a.room.label().cmp(&b.room.label()))
    });
    ranked.truncate(request.max_results);

    debug!(
        returned = ranked.len(),
        considered = rooms_considered,
        fallback = fallback_applied,
        "availability search complete"
    );

    Ok(AvailabilityReport {
        search_context,
        rooms: ranked,
        rooms_considered,
        rooms_with_long_windows,
        fallback_applied,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::BuildingDirectory;
    use crate::store::InMemoryStore;
    use crate::types::Season;

    fn term_spring() -> Term {
        Term::new(2026, Season::Spring)
    }

    fn iv(start: u16, end: u16) -> Interval {
        Interval { start, end }
    }

    fn window(start: u16, end: u16) -> Interval {
        iv(start, end)
    }

    fn base_store(rooms: &[&str]) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        let mut dir = BuildingDirectory::new();
        dir.add_code("LSH");
        dir.add_code("SEC");
        store.set_directory(term_spring(), Campus::NewBrunswick, dir);
        for r in rooms {
            store.insert_room(term_spring(), Room::new("LSH", r));
        }
        store
    }

    fn request(building: &str) -> AvailabilityRequest {
        AvailabilityRequest {
            building: building.to_string(),
            campus: Campus::NewBrunswick,
            term: term_spring(),
            day: Some(Day::Monday),
            window_start: Some(480),
            window_end: Some(720),
            min_free_minutes: 60,
            use_shorter_fallback: true,
            fallback_threshold: 3,
            max_results: 10,
        }
    }

    #[test]
    fn test_no_occupancy_is_one_full_window() {
        // Empty room over 08:00-12:00: a single 240-minute window
        let free = compute_free_windows(&[], window(480, 720));
        assert_eq!(
            free,
            vec![FreeWindow {
                start_minutes: 480,
                end_minutes: 720,
                duration_minutes: 240
            }]
        );
    }

    #[test]
    fn test_free_windows_around_two_classes() {
        // Occupied 09:00-10:00 and 10:30-11:30 within 08:00-12:00
        let occupied = vec![iv(540, 600), iv(630, 690)];
        let free = compute_free_windows(&occupied, window(480, 720));
        assert_eq!(
            free.iter()
                .map(|w| (w.start_minutes, w.end_minutes, w.duration_minutes))
                .collect::<Vec<_>>(),
            vec![(480, 540, 60), (600, 630, 30), (690, 720, 30)]
        );
    }

    #[test]
    fn test_free_plus_occupied_covers_window() {
        let window = window(480, 1320);
        let raw = vec![iv(400, 520), iv(500, 610), iv(900, 1000), iv(1290, 1400)];
        let clamped = clamp_to_window(&raw, window);
        let merged = crate::time::merge_intervals(&clamped);
        let free = compute_free_windows(&merged, window);

        let occupied_total: u32 = merged.iter().map(|i| i.duration_minutes() as u32).sum();
        let free_total: u32 = free.iter().map(|w| w.duration_minutes as u32).sum();
        assert_eq!(occupied_total + free_total, window.duration_minutes() as u32);
    }

    #[test]
    fn test_clamp_drops_out_of_window_and_degenerate() {
        let window = window(480, 720);
        let raw = vec![iv(100, 200), iv(800, 900), iv(600, 600), iv(650, 640), iv(700, 800)];
        let clamped = clamp_to_window(&raw, window);
        assert_eq!(clamped, vec![iv(700, 720)]);
    }

    #[test]
    fn test_inverted_window_is_validation_error() {
        let store = base_store(&["101"]);
        let mut req = request("LSH");
        req.window_start = Some(720);
        req.window_end = Some(480);
        assert!(matches!(
            find_available_rooms(&store, &req),
            Err(ScheduleError::Validation { .. })
        ));
    }

    #[test]
    fn test_empty_inventory_is_clean_result_with_warning() {
        let store = base_store(&[]);
        let report = find_available_rooms(&store, &request("SEC")).unwrap();
        assert!(report.rooms.is_empty());
        assert_eq!(report.rooms_considered, 0);
        assert!(!report.fallback_applied);
        assert!(report
            .warnings
            .contains(&Warning::NoRoomsInBuilding { building: "SEC".to_string() }));
    }

    #[test]
    fn test_ranking_by_longest_window_then_label() {
        let mut store = base_store(&["201", "103", "102"]);
        // 102 and 103 both end up with a 120-minute best window; 201 with 240
        for r in ["102", "103"] {
            store.insert_occupied(
                term_spring(),
                &Room::new("LSH", r),
                Day::Monday,
                iv(480, 600),
            );
        }

        let report = find_available_rooms(&store, &request("LSH")).unwrap();
        let labels: Vec<String> = report.rooms.iter().map(|r| r.room.label()).collect();
        assert_eq!(labels, ["LSH-201", "LSH-102", "LSH-103"]);
        assert_eq!(report.rooms[0].longest_free_minutes, 240);
        assert!(!report.fallback_applied);
        assert_eq!(report.rooms_with_long_windows, 3);
    }

    #[test]
    fn test_result_cap_truncates() {
        let store = base_store(&["101", "102", "103", "104"]);
        let mut req = request("LSH");
        req.max_results = 2;
        let report = find_available_rooms(&store, &req).unwrap();
        assert_eq!(report.rooms.len(), 2);
        assert_eq!(report.rooms_considered, 4);
    }

    #[test]
    fn test_fallback_ranks_shorter_windows() {
        let mut store = base_store(&["101", "102"]);
        // 101: free 30 minutes at most; 102: fully free
        store.insert_occupied(
            term_spring(),
            &Room::new("LSH", "101"),
            Day::Monday,
            iv(510, 720),
        );

        let report = find_available_rooms(&store, &request("LSH")).unwrap();
        assert!(report.fallback_applied);
        assert_eq!(report.rooms_with_long_windows, 1);
        assert_eq!(report.rooms.len(), 2);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::ShorterFallback { qualifying: 1, threshold: 3 })));

        let short = report
            .rooms
            .iter()
            .find(|r| r.room.room == "101")
            .unwrap();
        assert!(short.is_shorter_fallback);
        assert_eq!(short.longest_free_minutes, 30);
        let long = report.rooms.iter().find(|r| r.room.room == "102").unwrap();
        assert!(!long.is_shorter_fallback);
    }

    #[test]
    fn test_fallback_disabled_returns_only_qualifying() {
        let mut store = base_store(&["101", "102"]);
        store.insert_occupied(
            term_spring(),
            &Room::new("LSH", "101"),
            Day::Monday,
            iv(510, 720),
        );

        let mut req = request("LSH");
        req.use_shorter_fallback = false;
        let report = find_available_rooms(&store, &req).unwrap();
        assert!(!report.fallback_applied);
        assert_eq!(report.rooms.len(), 1);
        assert_eq!(report.rooms[0].room.room, "102");
    }

    #[test]
    fn test_fully_occupied_room_excluded_even_in_fallback() {
        let mut store = base_store(&["101", "102"]);
        store.insert_occupied(
            term_spring(),
            &Room::new("LSH", "101"),
            Day::Monday,
            iv(480, 720),
        );

        let report = find_available_rooms(&store, &request("LSH")).unwrap();
        assert!(report.fallback_applied);
        assert_eq!(report.rooms.len(), 1);
        assert_eq!(report.rooms[0].room.room, "102");
    }

    #[test]
    fn test_classroom_code_query_resolves_building() {
        let store = base_store(&["B116"]);
        let report = find_available_rooms(&store, &request("LSH-B116")).unwrap();
        assert_eq!(report.search_context.building, "LSH");
        assert_eq!(report.search_context.room_hint.as_deref(), Some("B116"));
        assert_eq!(report.rooms.len(), 1);
    }

    #[test]
    fn test_prefix_resolution_warns_but_succeeds() {
        let store = base_store(&["101"]);
        let report = find_available_rooms(&store, &request("LS")).unwrap();
        assert_eq!(report.search_context.building, "LSH");
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::PrefixMatch { .. })));
    }

    #[test]
    fn test_unknown_building_is_resolution_error() {
        let store = base_store(&["101"]);
        assert!(matches!(
            find_available_rooms(&store, &request("Hill Center")),
            Err(ScheduleError::Resolution(_))
        ));
    }

    #[test]
    fn test_occupancy_touching_window_edges() {
        let mut store = base_store(&["101"]);
        let room = Room::new("LSH", "101");
        store.insert_occupied(term_spring(), &room, Day::Monday, iv(480, 540));
        store.insert_occupied(term_spring(), &room, Day::Monday, iv(660, 720));

        let report = find_available_rooms(&store, &request("LSH")).unwrap();
        let windows = &report.rooms[0].free_windows;
        assert_eq!(
            windows
                .iter()
                .map(|w| (w.start_minutes, w.end_minutes))
                .collect::<Vec<_>>(),
            vec![(540, 660)]
        );
    }
}
