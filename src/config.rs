//! Configuration.
//!
//! [`ChromosomeParams`] carries the operator settings every chromosome
//! owns, [`FitnessWeights`] the soft-constraint weights used by fitness
//! evaluation, and [`TimetableConfig`] bundles them with the week grid
//! and an optional seed so a whole run can be described in one TOML file.
//!
//! # Example
//!
//! ```
//! use u_timetable::config::TimetableConfig;
//!
//! let config = TimetableConfig::from_toml_str(r#"
//!     days_per_week = 5
//!     hours_per_day = 6
//!     seed = 7
//!
//!     [chromosome]
//!     crossover_points = 3
//!     mutation_probability = 5
//!
//!     [chromosome.weights]
//!     core_start = 2
//! "#).unwrap();
//!
//! assert_eq!(config.hours_per_day, 6);
//! assert_eq!(config.chromosome.crossover_points, 3);
//! assert_eq!(config.chromosome.crossover_probability, 80);
//! assert_eq!(config.chromosome.weights.core_start, 2);
//! ```

use std::path::Path;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::models::{CourseClass, ProblemInstance, Room};

/// Weights and windows of the soft-constraint terms.
///
/// # Defaults
///
/// | Term | Value |
/// |------|-------|
/// | `isolated_penalty` | 0.2 |
/// | `gap_penalty` | 0.15 |
/// | `core_bonus` | 0.1 |
/// | `extreme_penalty` | 0.2 |
/// | `core_start` | 1 |
/// | `core_end` | `hours_per_day - 2` |
/// | `epsilon` | 0.001 |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Penalty per group/day with a single class.
    pub isolated_penalty: f64,
    /// Penalty per group/day with idle hours between classes.
    pub gap_penalty: f64,
    /// Bonus per professor/day whose classes are contiguous inside the core window.
    pub core_bonus: f64,
    /// Penalty per professor/day starting before `core_start`, and again
    /// per professor/day starting after the core end.
    pub extreme_penalty: f64,
    /// First start hour of the preferred core window.
    pub core_start: usize,
    /// Last start hour of the core window. `None` = `hours_per_day - 2`.
    pub core_end: Option<usize>,
    /// Added to the normalizer so empty schedules never divide by zero.
    pub epsilon: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            isolated_penalty: 0.2,
            gap_penalty: 0.15,
            core_bonus: 0.1,
            extreme_penalty: 0.2,
            core_start: 1,
            core_end: None,
            epsilon: 0.001,
        }
    }
}

impl FitnessWeights {
    /// Resolved last core start hour for a day of `hours_per_day` hours.
    pub fn core_end(&self, hours_per_day: usize) -> usize {
        self.core_end
            .unwrap_or_else(|| hours_per_day.saturating_sub(2))
    }

    /// Sets the core window.
    pub fn with_core_window(mut self, start: usize, end: usize) -> Self {
        self.core_start = start;
        self.core_end = Some(end);
        self
    }
}

/// Operator settings owned by every chromosome.
///
/// Probabilities are whole percentages compared against a uniform draw in
/// `0..100`; an operator is skipped when the draw exceeds its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromosomeParams {
    /// Number of crossover points (must be below the class count).
    pub crossover_points: usize,
    /// Classes relocated by one mutation.
    pub mutation_size: usize,
    /// Crossover probability in percent.
    pub crossover_probability: u32,
    /// Mutation probability in percent.
    pub mutation_probability: u32,
    /// Soft-constraint weights used by fitness evaluation.
    pub weights: FitnessWeights,
}

impl Default for ChromosomeParams {
    fn default() -> Self {
        Self {
            crossover_points: 2,
            mutation_size: 2,
            crossover_probability: 80,
            mutation_probability: 3,
            weights: FitnessWeights::default(),
        }
    }
}

impl ChromosomeParams {
    /// Sets the number of crossover points.
    pub fn with_crossover_points(mut self, n: usize) -> Self {
        self.crossover_points = n;
        self
    }

    /// Sets the number of classes moved per mutation.
    pub fn with_mutation_size(mut self, n: usize) -> Self {
        self.mutation_size = n;
        self
    }

    /// Sets the crossover probability (percent, clamped to 100).
    pub fn with_crossover_probability(mut self, percent: u32) -> Self {
        self.crossover_probability = percent.min(100);
        self
    }

    /// Sets the mutation probability (percent, clamped to 100).
    pub fn with_mutation_probability(mut self, percent: u32) -> Self {
        self.mutation_probability = percent.min(100);
        self
    }

    /// Sets the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Complete run configuration: week grid, chromosome settings, seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Teaching days per week.
    pub days_per_week: usize,
    /// Teaching hours per day.
    pub hours_per_day: usize,
    /// Random seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Chromosome operator settings.
    pub chromosome: ChromosomeParams,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            days_per_week: 5,
            hours_per_day: 4,
            seed: None,
            chromosome: ChromosomeParams::default(),
        }
    }
}

impl TimetableConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TimetableError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TimetableError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TimetableError> {
        Ok(toml::from_str(s)?)
    }

    /// Sets the grid dimensions.
    pub fn with_grid(mut self, days_per_week: usize, hours_per_day: usize) -> Self {
        self.days_per_week = days_per_week;
        self.hours_per_day = hours_per_day;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the chromosome parameters.
    pub fn with_chromosome(mut self, params: ChromosomeParams) -> Self {
        self.chromosome = params;
        self
    }

    /// Random source for this run: seeded when `seed` is set.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    /// Builds a validated problem instance on this configuration's grid.
    pub fn instance(
        &self,
        rooms: Vec<Room>,
        classes: Vec<CourseClass>,
    ) -> Result<ProblemInstance, TimetableError> {
        ProblemInstance::new(rooms, classes, self.days_per_week, self.hours_per_day)
    }
}
