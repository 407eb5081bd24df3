//! Timetable (solution) export model.
//!
//! Flat, serializable views of a chromosome for persistence and reporting:
//! where each class sits in the week, one row per attending group, and the
//! hard constraints it violates.

use serde::{Deserialize, Serialize};

/// Position of a class in the week grid: its day, room and start hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Placement {
    /// Day of week (0-based).
    pub day: usize,
    /// Room grid index.
    pub room: usize,
    /// Start hour within the day (0-based).
    pub hour: usize,
}

impl Placement {
    /// Creates a placement.
    pub fn new(day: usize, room: usize, hour: usize) -> Self {
        Self { day, room, hour }
    }
}

/// A class together with its placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledClass {
    /// Class ID.
    pub class_id: String,
    /// Where the class is held.
    pub placement: Placement,
}

/// One stored timetable row: a class session for a single student group.
///
/// A class attended by several groups yields one row per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    /// Class ID.
    pub class_id: String,
    /// Subject ID.
    pub subject: String,
    /// Professor ID.
    pub professor: String,
    /// Student group ID (empty for classes without groups).
    pub group: String,
    /// Room ID.
    pub room: String,
    /// Day of week (0-based).
    pub day: usize,
    /// Start hour (0-based).
    pub start_hour: usize,
    /// Length in hours.
    pub duration: usize,
}

impl TimetableEntry {
    /// End hour (exclusive).
    #[inline]
    pub fn end_hour(&self) -> usize {
        self.start_hour + self.duration
    }
}

/// A hard-constraint violation of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Offending class ID.
    pub class_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of hard-constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Another class occupies the same room at the same time.
    RoomConflict,
    /// Room has fewer seats than required.
    CapacityExceeded,
    /// Lab required but the room is not a lab.
    LabRequired,
    /// Professor teaches another class at the same time.
    ProfessorOverlap,
    /// A student group attends another class at the same time.
    GroupOverlap,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        class_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            class_id: class_id.into(),
            message: message.into(),
        }
    }
}
