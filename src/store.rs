//! The data-source seam between the pure core and the caller's storage.
//!
//! The core never performs I/O; callers hand it an implementation of
//! [`ScheduleStore`] over records they have already fetched. Store failures
//! surface as [`DataAccessError`] and are propagated unchanged.

use std::collections::HashMap;

use crate::error::DataAccessError;
use crate::location::BuildingDirectory;
use crate::types::{Campus, Day, IndexNumber, Interval, Room, Section, Term};

/// Read access to the materialized schedule data for one request.
pub trait ScheduleStore {
    /// Sections matching the given index numbers for a term and campus.
    /// Indexes with no section are simply absent from the result.
    fn sections_for_indexes(
        &self,
        term: Term,
        campus: Campus,
        indexes: &[IndexNumber],
    ) -> Result<Vec<Section>, DataAccessError>;

    /// Alias table and canonical building codes for a term and campus.
    fn building_directory(
        &self,
        term: Term,
        campus: Campus,
    ) -> Result<BuildingDirectory, DataAccessError>;

    /// All rooms on record in a building for a term.
    fn rooms_in_building(&self, term: Term, building: &str) -> Result<Vec<Room>, DataAccessError>;

    /// Intervals during which a room is occupied on the given day.
    /// May be unsorted and overlapping; the engine normalizes them.
    fn occupied_intervals(
        &self,
        term: Term,
        room: &Room,
        day: Day,
    ) -> Result<Vec<Interval>, DataAccessError>;
}

/// HashMap-backed [`ScheduleStore`] over pre-loaded records.
///
/// Reference implementation for adapters, and the fixture store for tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sections: HashMap<(Term, Campus), Vec<Section>>,
    directories: HashMap<(Term, Campus), BuildingDirectory>,
    rooms: HashMap<(Term, String), Vec<Room>>,
    occupied: HashMap<(Term, String, String, Day), Vec<Interval>>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    pub fn insert_section(&mut self, term: Term, campus: Campus, section: Section) {
        self.sections
            .entry((term, campus))
            .or_default()
            .push(section);
    }

    pub fn set_directory(&mut self, term: Term, campus: Campus, directory: BuildingDirectory) {
        self.directories.insert((term, campus), directory);
    }

    pub fn insert_room(&mut self, term: Term, room: Room) {
        self.rooms
            .entry((term, room.building.clone()))
            .or_default()
            .push(room);
    }

    pub fn insert_occupied(&mut self, term: Term, room: &Room, day: Day, interval: Interval) {
        self.occupied
            .entry((term, room.building.clone(), room.room.clone(), day))
            .or_default()
            .push(interval);
    }
}

impl ScheduleStore for InMemoryStore {
    fn sections_for_indexes(
        &self,
        term: Term,
        campus: Campus,
        indexes: &[IndexNumber],
    ) -> Result<Vec<Section>, DataAccessError> {
        let all = self.sections.get(&(term, campus));
        Ok(indexes
            .iter()
            .filter_map(|index| {
                all.and_then(|sections| sections.iter().find(|s| &s.index == index))
                    .cloned()
            })
            .collect())
    }

    fn building_directory(
        &self,
        term: Term,
        campus: Campus,
    ) -> Result<BuildingDirectory, DataAccessError> {
        Ok(self
            .directories
            .get(&(term, campus))
            .cloned()
            .unwrap_or_default())
    }

    fn rooms_in_building(&self, term: Term, building: &str) -> Result<Vec<Room>, DataAccessError> {
        Ok(self
            .rooms
            .get(&(term, building.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn occupied_intervals(
        &self,
        term: Term,
        room: &Room,
        day: Day,
    ) -> Result<Vec<Interval>, DataAccessError> {
        Ok(self
            .occupied
            .get(&(term, room.building.clone(), room.room.clone(), day))
            .cloned()
            .unwrap_or_default())
    }
}
