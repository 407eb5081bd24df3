//! Timetabling domain models.
//!
//! Provides the input description of a timetabling problem (rooms, course
//! classes, week geometry) and the flat export types of a solution.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | School | Training center |
//! |-------------|-----------|--------|-----------------|
//! | CourseClass | Lecture/Lab session | Lesson | Workshop |
//! | Room | Lecture hall/Lab | Classroom | Training room |
//! | Group | Student cohort | Class | Trainee group |
//! | Professor | Instructor | Teacher | Trainer |

mod course_class;
mod instance;
mod room;
mod timetable;

pub use course_class::CourseClass;
pub use instance::{Geometry, InstanceData, ProblemInstance};
pub use room::Room;
pub use timetable::{Placement, ScheduledClass, TimetableEntry, Violation, ViolationType};
