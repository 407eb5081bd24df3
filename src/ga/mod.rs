//! GA encoding of weekly timetables.
//!
//! Provides the chromosome a population-level GA driver evolves. The driver
//! itself (selection, replacement, generation loop, termination) lives
//! outside this crate and only uses the operations exposed here.
//!
//! # Encoding
//!
//! - **Slots**: occupant list per `(day, room, hour)` cell.
//! - **Placements**: start slot per class in canonical order.
//! - **Criteria**: five hard-constraint flags per class, refreshed on
//!   every evaluation.
//!
//! # Submodules
//!
//! - [`operators`]: Multi-point crossover and relocation mutation
//! - [`fitness`]: Hard/soft constraint scoring
//!
//! # Reference
//! - Abramson & Abela (1991), "A parallel genetic algorithm for solving the
//!   school timetabling problem"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

mod chromosome;
pub mod fitness;
pub mod operators;
mod problem;

pub use chromosome::Chromosome;
pub use fitness::{Criterion, Evaluation, CRITERIA_PER_CLASS};
pub use operators::{multi_point_crossover, relocation_mutation};
pub use problem::TimetableGaProblem;
