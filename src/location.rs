//! Classroom-code parsing and fuzzy building resolution.
//!
//! Students type locations three ways: `"LSH-B116"`, `"LSH B116"`, and
//! `"LSHB116"`. All three normalize to the same building/room pair. Free text
//! that is not classroom-shaped (e.g. "Hill Center") is resolved against the
//! campus building directory instead.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{ResolutionError, ScheduleError, Warning};

/// A parsed building/room pair, normalized to uppercase alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassroomCode {
    pub building: String,
    pub room: String,
}

/// What a free-text location string turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    /// A combined building+room code
    Classroom(ClassroomCode),
    /// A building name or code, to be resolved against the directory
    Building(String),
}

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Uppercases and strips everything that is not a letter or digit.
fn normalize_token(s: &str) -> String {
    NON_ALNUM.replace_all(s, "").to_ascii_uppercase()
}

/// Splits a compact code like "LSHB116" at its first digit.
///
/// Heuristic for the letter prefix: when it is 4+ letters long, the final
/// letter belongs to the room ("LSHB116" is LSH room B116, not LSHB room
/// 116). Building codes here run 2-3 letters; a 4th letter is in practice a
/// room-wing prefix. Documented as-is; do not "fix" without checking the
/// real building-code length distribution.
fn split_compact(normalized: &str) -> Option<ClassroomCode> {
    let digit_at = normalized.find(|c: char| c.is_ascii_digit())?;
    if digit_at == 0 {
        return None;
    }
    let (prefix, digits) = normalized.split_at(digit_at);
    if !prefix.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    if prefix.len() >= 4 {
        let (building, room_letter) = prefix.split_at(prefix.len() - 1);
        Some(ClassroomCode {
            building: building.to_string(),
            room: format!("{room_letter}{digits}"),
        })
    } else {
        Some(ClassroomCode {
            building: prefix.to_string(),
            room: digits.to_string(),
        })
    }
}

/// Parses `"BLDG-ROOM"`, `"BLDG ROOM"`, or `"BLDGROOM"` into a
/// [`ClassroomCode`].
///
/// Returns `None` when the input is not classroom-shaped at all, so callers
/// can treat the string as a building query instead of failing outright.
pub fn parse_classroom_code(input: &str) -> Option<ClassroomCode> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Separated forms first: the split point is explicit and unambiguous.
    if let Some((left, right)) = trimmed
        .split_once('-')
        .or_else(|| trimmed.split_once(char::is_whitespace))
    {
        let building = normalize_token(left);
        let room = normalize_token(right);
        let shaped = !building.is_empty()
            && building.bytes().all(|b| b.is_ascii_alphabetic())
            && room.bytes().any(|b| b.is_ascii_digit());
        return shaped.then_some(ClassroomCode { building, room });
    }

    let normalized = normalize_token(trimmed);
    if !normalized.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    split_compact(&normalized)
}

/// Classifies a location string, rejecting classroom-shaped garbage.
///
/// A string containing digits claims to be a classroom code; if no parse
/// branch accepts it, that is a hard input error rather than a building
/// query that will never match anything.
pub fn classify_query(input: &str) -> Result<LocationQuery, ScheduleError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::validation("Location query is empty"));
    }

    if let Some(code) = parse_classroom_code(trimmed) {
        return Ok(LocationQuery::Classroom(code));
    }

    if trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return Err(ScheduleError::validation(format!(
            "'{trimmed}' looks like a classroom code but could not be parsed"
        )));
    }

    Ok(LocationQuery::Building(trimmed.to_string()))
}

/// Alias table and canonical code set for one campus and term, supplied by
/// the caller.
#[derive(Debug, Clone, Default)]
pub struct BuildingDirectory {
    /// Normalized alias ("HILLCENTER") to the canonical codes it names.
    /// An alias mapping to more than one code is ambiguous by definition.
    aliases: HashMap<String, Vec<String>>,
    /// Canonical building codes known for the term, ordered for
    /// deterministic candidate lists.
    codes: BTreeSet<String>,
}

impl BuildingDirectory {
    pub fn new() -> BuildingDirectory {
        BuildingDirectory::default()
    }

    pub fn add_code(&mut self, code: &str) {
        self.codes.insert(normalize_token(code));
    }

    pub fn add_alias(&mut self, alias: &str, code: &str) {
        let entry = self.aliases.entry(normalize_token(alias)).or_default();
        let code = normalize_token(code);
        if !entry.contains(&code) {
            entry.push(code);
        }
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    fn alias_targets(&self, normalized: &str) -> Option<&[String]> {
        self.aliases.get(normalized).map(Vec::as_slice)
    }

    fn has_code(&self, normalized: &str) -> bool {
        self.codes.contains(normalized)
    }

    fn codes_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.codes
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// How a building query was resolved, for logging and result context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPath {
    ClassroomCode,
    Alias,
    ExactCode,
    Prefix,
}

/// A successfully resolved building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBuilding {
    pub code: String,
    pub via: ResolutionPath,
    /// Room the student named, when the query was a combined classroom code.
    pub room_hint: Option<String>,
}

/// Resolves a free-text building query to a canonical code.
///
/// Cascade: combined classroom-code parse, exact alias, exact canonical
/// code, unique prefix. Zero matches or more than one candidate at an
/// ambiguous stage fails with a [`ResolutionError`]; a unique-prefix hit
/// succeeds but records a [`Warning::PrefixMatch`].
pub fn resolve_building(
    query: &str,
    directory: &BuildingDirectory,
    warnings: &mut Vec<Warning>,
) -> Result<ResolvedBuilding, ScheduleError> {
    let (building_text, room_hint, from_code) = match classify_query(query)? {
        LocationQuery::Classroom(code) => (code.building, Some(code.room), true),
        LocationQuery::Building(text) => (text, None, false),
    };

    let normalized = normalize_token(&building_text);

    if let Some(targets) = directory.alias_targets(&normalized) {
        match targets {
            [single] => {
                debug!(query, code = %single, "resolved building via alias");
                return Ok(ResolvedBuilding {
                    code: single.clone(),
                    via: if from_code {
                        ResolutionPath::ClassroomCode
                    } else {
                        ResolutionPath::Alias
                    },
                    room_hint,
                });
            }
            many => {
                return Err(ResolutionError::Ambiguous {
                    query: query.trim().to_string(),
                    candidates: many.to_vec(),
                }
                .into())
            }
        }
    }

    if directory.has_code(&normalized) {
        debug!(query, code = %normalized, "resolved building via exact code");
        return Ok(ResolvedBuilding {
            code: normalized,
            via: if from_code {
                ResolutionPath::ClassroomCode
            } else {
                ResolutionPath::ExactCode
            },
            room_hint,
        });
    }

    let candidates = directory.codes_with_prefix(&normalized);
    match candidates.as_slice() {
        [] => Err(ResolutionError::NotFound {
            query: query.trim().to_string(),
        }
        .into()),
        [single] => {
            debug!(query, code = %single, "resolved building via unique prefix");
            warnings.push(Warning::PrefixMatch {
                query: query.trim().to_string(),
                resolved: single.clone(),
            });
            Ok(ResolvedBuilding {
                code: single.clone(),
                via: ResolutionPath::Prefix,
                room_hint,
            })
        }
        many => Err(ResolutionError::Ambiguous {
            query: query.trim().to_string(),
            candidates: many.to_vec(),
        }
        .into()),
    }
}
