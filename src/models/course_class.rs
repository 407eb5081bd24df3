//! Course class model.
//!
//! A course class is one weekly teaching session: a subject taught by one
//! professor to one or more student groups, lasting a whole number of hours
//! in a single room.

use serde::{Deserialize, Serialize};

/// One teaching session to be placed in the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseClass {
    /// Unique class identifier.
    pub id: String,
    /// Subject (course) identifier.
    #[serde(default)]
    pub subject: String,
    /// Professor identifier.
    pub professor: String,
    /// Student group identifiers attending this class.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Length in hours (consecutive slots).
    pub duration: usize,
    /// Seats the assigned room must provide.
    #[serde(default)]
    pub required_seats: u32,
    /// Whether the class must be held in a lab.
    #[serde(default)]
    pub requires_lab: bool,
}

impl CourseClass {
    /// Creates a one-hour class taught by `professor`.
    pub fn new(id: impl Into<String>, professor: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: String::new(),
            professor: professor.into(),
            groups: Vec::new(),
            duration: 1,
            required_seats: 0,
            requires_lab: false,
        }
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Adds an attending student group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Sets the duration in hours.
    pub fn with_duration(mut self, hours: usize) -> Self {
        self.duration = hours;
        self
    }

    /// Sets the number of required seats.
    pub fn with_seats(mut self, seats: u32) -> Self {
        self.required_seats = seats;
        self
    }

    /// Marks the class as requiring a lab.
    pub fn with_lab(mut self, requires_lab: bool) -> Self {
        self.requires_lab = requires_lab;
        self
    }

    /// Whether both classes are taught by the same professor.
    #[inline]
    pub fn professor_overlaps(&self, other: &CourseClass) -> bool {
        self.professor == other.professor
    }

    /// Whether the classes share at least one student group.
    pub fn groups_overlap(&self, other: &CourseClass) -> bool {
        self.groups.iter().any(|g| other.groups.contains(g))
    }
}
