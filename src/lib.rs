//! Weekly timetabling for the U-Engine ecosystem.
//!
//! Encodes a complete university timetable as a genetic-algorithm
//! chromosome and scores it against hard and soft scheduling constraints.
//! Population management (selection, replacement, termination) belongs to
//! the GA driver that consumes this crate.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Room`, `CourseClass`, `ProblemInstance`,
//!   `Geometry`, and export types `Placement`, `TimetableEntry`, `Violation`
//! - **`ga`**: `Chromosome` with random construction, crossover, mutation
//!   and fitness evaluation; `TimetableGaProblem` for drivers
//! - **`validation`**: Instance and parameter integrity checks
//! - **`config`**: Operator parameters, fitness weights, TOML loading
//! - **`kpi`**: Timetable quality indicators
//!
//! # Example
//!
//! ```
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use u_timetable::config::ChromosomeParams;
//! use u_timetable::ga::Chromosome;
//! use u_timetable::models::{CourseClass, ProblemInstance, Room};
//!
//! let instance = ProblemInstance::new(
//!     vec![Room::new("R1", 40), Room::lab("L1", 20)],
//!     vec![
//!         CourseClass::new("C1", "P1").with_group("G1").with_duration(2),
//!         CourseClass::new("C2", "P2").with_group("G1").with_lab(true),
//!         CourseClass::new("C3", "P1").with_group("G2"),
//!     ],
//!     5,
//!     4,
//! )
//! .unwrap();
//!
//! let params = ChromosomeParams::default();
//! let mut rng = SmallRng::seed_from_u64(42);
//! let a = Chromosome::new_random(&instance, params, &mut rng).unwrap();
//! let b = Chromosome::new_random(&instance, params, &mut rng).unwrap();
//!
//! let mut child = a.crossover(&b, &instance, &mut rng);
//! child.mutate(&instance, &mut rng);
//! assert!(child.is_consistent(&instance));
//! assert_eq!(child.placements(&instance).len(), 3);
//! ```

pub mod config;
pub mod error;
pub mod ga;
pub mod kpi;
pub mod models;
pub mod validation;

pub use error::TimetableError;
