//! Error and warning types for the scheduling core.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during a scheduling or availability operation.
#[derive(Debug, Error, Clone)]
pub enum ScheduleError {
    /// Input rejected before any data access (bad index number, bad
    /// military time, inverted search window, unparseable classroom code)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Building lookup failed or was ambiguous
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The caller-supplied data source failed; propagated unchanged
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

impl ScheduleError {
    pub fn validation(message: impl Into<String>) -> Self {
        ScheduleError::Validation {
            message: message.into(),
        }
    }

    /// Returns true if this error came from the data source rather than
    /// from the request itself. Only these are worth retrying upstream.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScheduleError::DataAccess(_))
    }
}

/// Errors from resolving free-text building queries to canonical codes.
#[derive(Debug, Error, Clone)]
pub enum ResolutionError {
    /// No known building matched the query
    #[error("No building matching '{query}' found for this term and campus")]
    NotFound { query: String },

    /// More than one building matched; candidates let the caller disambiguate
    #[error("Building query '{query}' is ambiguous: {}", .candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },
}

impl ResolutionError {
    /// Candidate codes for an ambiguous query, empty when none matched.
    pub fn candidates(&self) -> &[String] {
        match self {
            ResolutionError::NotFound { .. } => &[],
            ResolutionError::Ambiguous { candidates, .. } => candidates,
        }
    }
}

/// Failure reported by the caller-supplied [`ScheduleStore`](crate::store::ScheduleStore).
///
/// The core never retries or swallows these; they surface as
/// [`ScheduleError::DataAccess`].
#[derive(Debug, Error, Clone)]
#[error("Data source error: {message}")]
pub struct DataAccessError {
    pub message: String,
}

impl DataAccessError {
    pub fn new(message: impl Into<String>) -> Self {
        DataAccessError {
            message: message.into(),
        }
    }
}

/// Non-fatal conditions collected into a result's warnings list.
///
/// Partial, explainable results are preferred over hard failure whenever an
/// input is merely unusual rather than invalid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// No section with this index number exists for the requested term
    SectionNotFound { index: String },

    /// Section has a meeting with no day or no usable time; that meeting
    /// cannot be checked for conflicts
    TbaMeeting { index: String },

    /// Section is closed to enrollment (still a valid schedule member)
    ClosedSection { index: String },

    /// Fewer than two resolvable sections remain, so there is nothing to compare
    NotEnoughSections { found: usize },

    /// Combined credit load is under the full-time minimum of 12
    BelowFullTime { total_credits: f32 },

    /// Combined credit load exceeds the standard maximum of 21
    ExceedsMaxCredits { total_credits: f32 },

    /// Building was resolved by unique prefix rather than an exact match
    PrefixMatch { query: String, resolved: String },

    /// The resolved building has no rooms on record for the term
    NoRoomsInBuilding { building: String },

    /// Too few rooms had a long-enough window, so shorter windows were ranked too
    ShorterFallback { qualifying: usize, threshold: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::SectionNotFound { index } => {
                write!(f, "No section with index {index} found for this term")
            }
            Warning::TbaMeeting { index } => {
                write!(
                    f,
                    "Section {index} has a TBA meeting that cannot be checked for conflicts"
                )
            }
            Warning::ClosedSection { index } => {
                write!(f, "Section {index} is currently closed")
            }
            Warning::NotEnoughSections { found } => {
                write!(
                    f,
                    "Only {found} section(s) could be resolved; need at least 2 to compare"
                )
            }
            Warning::BelowFullTime { total_credits } => {
                write!(
                    f,
                    "Total of {total_credits} credits is below the full-time minimum of 12"
                )
            }
            Warning::ExceedsMaxCredits { total_credits } => {
                write!(
                    f,
                    "Total of {total_credits} credits exceeds the standard maximum of 21"
                )
            }
            Warning::PrefixMatch { query, resolved } => {
                write!(f, "Interpreted '{query}' as building {resolved}")
            }
            Warning::NoRoomsInBuilding { building } => {
                write!(f, "No rooms on record for building {building} this term")
            }
            Warning::ShorterFallback {
                qualifying,
                threshold,
            } => {
                write!(
                    f,
                    "Only {qualifying} room(s) met the requested duration (threshold {threshold}); including shorter windows"
                )
            }
        }
    }
}
