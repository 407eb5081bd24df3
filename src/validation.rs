//! Input validation for timetabling problems.
//!
//! Checks structural integrity of a problem instance and of chromosome
//! parameters before any chromosome is built. Detects:
//! - Empty week grid (no days, hours or rooms)
//! - Classes that cannot fit in one day
//! - Duplicate room or class IDs
//! - Crossover/mutation settings the operators cannot honor
//! - Fitness weights that break normalization
//!
//! All problems are collected; nothing is reported one at a time.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::ChromosomeParams;
use crate::models::ProblemInstance;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// Zero days, hours per day, or rooms.
    EmptyGrid,
    /// A class has zero duration or is longer than a day.
    InvalidDuration,
    /// Crossover point count is zero or not below the class count.
    InvalidCrossoverPoints,
    /// A probability lies outside `0..=100`.
    InvalidProbability,
    /// A soft weight is negative or not finite, or epsilon is not positive.
    InvalidWeight,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem instance.
///
/// Checks:
/// 1. `days_per_week`, `hours_per_day` and the room count are positive
/// 2. Every class duration is in `1..=hours_per_day`
/// 3. No duplicate room IDs
/// 4. No duplicate class IDs
///
/// An instance without classes is valid.
pub fn validate_instance(instance: &ProblemInstance) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.days_per_week() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "days_per_week must be at least 1",
        ));
    }
    if instance.hours_per_day() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "hours_per_day must be at least 1",
        ));
    }
    if instance.room_count() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "instance has no rooms",
        ));
    }

    let mut room_ids = HashSet::new();
    for room in instance.rooms() {
        if !room_ids.insert(room.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", room.id),
            ));
        }
    }

    let mut class_ids = HashSet::new();
    for class in instance.classes() {
        if !class_ids.insert(class.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate class ID: {}", class.id),
            ));
        }
        if class.duration == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Class '{}' has zero duration", class.id),
            ));
        } else if class.duration > instance.hours_per_day() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Class '{}' lasts {}h but a day has {}h",
                    class.id,
                    class.duration,
                    instance.hours_per_day()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates chromosome parameters against the number of classes.
///
/// Checks:
/// 1. `crossover_points >= 1`
/// 2. `crossover_points < class_count` (skipped for empty instances, where
///    every operator is a no-op)
/// 3. Both probabilities are within `0..=100`
/// 4. Soft weights are finite and non-negative; `epsilon` is positive
pub fn validate_params(params: &ChromosomeParams, class_count: usize) -> ValidationResult {
    let mut errors = Vec::new();

    if params.crossover_points == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCrossoverPoints,
            "crossover_points must be at least 1",
        ));
    } else if class_count > 0 && params.crossover_points >= class_count {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCrossoverPoints,
            format!(
                "crossover_points ({}) must be below the class count ({})",
                params.crossover_points, class_count
            ),
        ));
    }

    if params.crossover_probability > 100 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidProbability,
            format!(
                "crossover_probability {} is outside 0..=100",
                params.crossover_probability
            ),
        ));
    }
    if params.mutation_probability > 100 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidProbability,
            format!(
                "mutation_probability {} is outside 0..=100",
                params.mutation_probability
            ),
        ));
    }

    let weights = &params.weights;
    for (name, value) in [
        ("isolated_penalty", weights.isolated_penalty),
        ("gap_penalty", weights.gap_penalty),
        ("core_bonus", weights.core_bonus),
        ("extreme_penalty", weights.extreme_penalty),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWeight,
                format!("{name} {value} must be finite and non-negative"),
            ));
        }
    }
    if !weights.epsilon.is_finite() || weights.epsilon <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWeight,
            format!("epsilon {} must be finite and positive", weights.epsilon),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
