//! Scheduling and room-availability core for a Rutgers SOC course-planning
//! assistant.
//!
//! This crate is the pure algorithm layer underneath the chat/tool surface:
//! military-time and interval algebra, pairwise schedule-conflict detection,
//! fuzzy classroom/building resolution, per-room free-window search, and
//! forward-looking term detection. It performs no I/O of its own; callers
//! implement [`store::ScheduleStore`] over records they have already fetched
//! and own all retry, timeout, and caching policy.
//!
//! Design rule throughout: partial, explainable results beat hard failure.
//! Unusual inputs (TBA meetings, closed sections, missing indexes) become
//! [`error::Warning`]s on the result; only malformed requests, unresolvable
//! buildings, and store failures are errors.

pub mod availability;
pub mod conflict;
pub mod error;
pub mod location;
pub mod store;
pub mod term;
pub mod time;
pub mod types;

pub use availability::{find_available_rooms, AvailabilityReport, AvailabilityRequest};
pub use conflict::{detect_conflicts, ConflictReport, ConflictRequest};
pub use error::{DataAccessError, ResolutionError, ScheduleError, Warning};
pub use location::{parse_classroom_code, BuildingDirectory, ClassroomCode};
pub use store::{InMemoryStore, ScheduleStore};
pub use term::{current_term, term_for_date};
pub use types::{
    Campus, Day, FreeWindow, IndexNumber, Interval, MeetingTime, Room, Season, Section, Term,
};
