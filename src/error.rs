//! Error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Contract and configuration errors reported to the caller.
///
/// Chromosome operators never fail once construction succeeded; every
/// error here is raised up front.
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("Invalid problem instance: {}", join(.0))]
    InvalidInstance(Vec<ValidationError>),

    #[error("Invalid chromosome parameters: {}", join(.0))]
    InvalidParams(Vec<ValidationError>),

    #[error("Invalid placement for class '{class_id}': {reason}")]
    InvalidPlacement { class_id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseClass, ProblemInstance, Room};

    #[test]
    fn test_display_lists_every_problem() {
        let err = ProblemInstance::new(
            vec![Room::new("R1", 10), Room::new("R1", 10)],
            vec![CourseClass::new("C1", "P1").with_duration(9)],
            5,
            4,
        )
        .unwrap_err();

        let text = err.to_string();
        assert!(text.starts_with("Invalid problem instance"));
        assert!(text.contains("Duplicate room ID: R1"));
        assert!(text.contains("'C1'"));
    }
}
