//! Problem instance and timetable geometry.
//!
//! A [`ProblemInstance`] is the immutable input shared by every chromosome:
//! rooms, the canonical class table, and the week grid.
//!
//! # Slot Layout
//!
//! The week is flattened day-major, then room, then hour:
//!
//! ```text
//! slot = day * rooms * hours_per_day + room * hours_per_day + hour
//! ```
//!
//! so the hours of one room on one day are contiguous, which lets a class
//! of duration `d` starting at `slot` occupy `slot..slot + d`.

use serde::{Deserialize, Serialize};

use super::{CourseClass, Placement, Room};
use crate::error::TimetableError;
use crate::validation::validate_instance;

/// Dimensions of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    /// Teaching days per week.
    pub days_per_week: usize,
    /// Teaching hours per day.
    pub hours_per_day: usize,
    /// Number of rooms.
    pub rooms: usize,
}

impl Geometry {
    /// Creates a grid geometry.
    pub fn new(days_per_week: usize, hours_per_day: usize, rooms: usize) -> Self {
        Self {
            days_per_week,
            hours_per_day,
            rooms,
        }
    }

    /// Slots in one day across all rooms.
    #[inline]
    pub fn day_size(&self) -> usize {
        self.hours_per_day * self.rooms
    }

    /// Total slots in the week.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.days_per_week * self.day_size()
    }

    /// Flattened slot index of `(day, room, hour)`.
    #[inline]
    pub fn slot_index(&self, day: usize, room: usize, hour: usize) -> usize {
        day * self.day_size() + room * self.hours_per_day + hour
    }

    /// Splits a slot index back into `(day, room, hour)`.
    pub fn placement_of(&self, slot: usize) -> Placement {
        let day_size = self.day_size();
        let within_day = slot % day_size;
        Placement {
            day: slot / day_size,
            room: within_day / self.hours_per_day,
            hour: within_day % self.hours_per_day,
        }
    }

    /// Whether a class of `duration` hours placed at `placement` stays
    /// inside the grid and inside a single day.
    pub fn contains(&self, placement: &Placement, duration: usize) -> bool {
        placement.day < self.days_per_week
            && placement.room < self.rooms
            && placement.hour + duration <= self.hours_per_day
    }
}

/// Immutable description of one timetabling problem.
///
/// The order of [`classes`](Self::classes) is the canonical class order:
/// chromosome placements, crossover points and mutation picks all index
/// into it.
///
/// Deserialization goes through [`InstanceData`] and is validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "InstanceData", into = "InstanceData")]
pub struct ProblemInstance {
    rooms: Vec<Room>,
    classes: Vec<CourseClass>,
    days_per_week: usize,
    hours_per_day: usize,
}

/// Unvalidated wire form of a [`ProblemInstance`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceData {
    /// Rooms in grid order.
    pub rooms: Vec<Room>,
    /// Classes in canonical order.
    pub classes: Vec<CourseClass>,
    /// Teaching days per week.
    pub days_per_week: usize,
    /// Teaching hours per day.
    pub hours_per_day: usize,
}

impl TryFrom<InstanceData> for ProblemInstance {
    type Error = TimetableError;

    fn try_from(data: InstanceData) -> Result<Self, Self::Error> {
        Self::new(data.rooms, data.classes, data.days_per_week, data.hours_per_day)
    }
}

impl From<ProblemInstance> for InstanceData {
    fn from(instance: ProblemInstance) -> Self {
        Self {
            rooms: instance.rooms,
            classes: instance.classes,
            days_per_week: instance.days_per_week,
            hours_per_day: instance.hours_per_day,
        }
    }
}

impl ProblemInstance {
    /// Builds a validated instance.
    ///
    /// # Errors
    /// [`TimetableError::InvalidInstance`] listing every structural problem
    /// (empty grid, class longer than a day, duplicate IDs).
    pub fn new(
        rooms: Vec<Room>,
        classes: Vec<CourseClass>,
        days_per_week: usize,
        hours_per_day: usize,
    ) -> Result<Self, TimetableError> {
        let instance = Self {
            rooms,
            classes,
            days_per_week,
            hours_per_day,
        };
        validate_instance(&instance).map_err(TimetableError::InvalidInstance)?;
        Ok(instance)
    }

    /// Grid geometry derived from this instance.
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.days_per_week, self.hours_per_day, self.rooms.len())
    }

    /// Number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Room by grid index.
    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    /// All rooms in grid order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Classes in canonical order.
    pub fn classes(&self) -> &[CourseClass] {
        &self.classes
    }

    /// Number of classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Canonical index of a class by ID.
    pub fn class_index(&self, id: &str) -> Option<usize> {
        self.classes.iter().position(|c| c.id == id)
    }

    /// Teaching days per week.
    pub fn days_per_week(&self) -> usize {
        self.days_per_week
    }

    /// Teaching hours per day.
    pub fn hours_per_day(&self) -> usize {
        self.hours_per_day
    }
}
