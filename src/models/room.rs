//! Room model.
//!
//! Rooms are the spatial dimension of the timetable grid. Each room has a
//! seat capacity and may be equipped as a lab.

use serde::{Deserialize, Serialize};

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Number of seats.
    pub capacity: u32,
    /// Whether the room has lab equipment (computers, benches).
    #[serde(default)]
    pub is_lab: bool,
}

impl Room {
    /// Creates a lecture room with the given capacity.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity,
            is_lab: false,
        }
    }

    /// Creates a lab room with the given capacity.
    pub fn lab(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, capacity).with_lab(true)
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the lab flag.
    pub fn with_lab(mut self, is_lab: bool) -> Self {
        self.is_lab = is_lab;
        self
    }

    /// Whether this room can host a class needing `seats` seats and,
    /// optionally, a lab.
    pub fn fits(&self, seats: u32, requires_lab: bool) -> bool {
        self.capacity >= seats && (!requires_lab || self.is_lab)
    }
}
