//! Timetabling GA problem definition.
//!
//! Bundles a validated [`ProblemInstance`] with the chromosome parameters
//! so a population-level GA driver can create, recombine, mutate and score
//! individuals without threading both through every call.

use rand::Rng;

use super::Chromosome;
use crate::config::{ChromosomeParams, TimetableConfig};
use crate::error::TimetableError;
use crate::models::{CourseClass, ProblemInstance, Room};
use crate::validation::validate_params;

/// GA problem definition for timetabling.
///
/// Fitness is maximized.
///
/// # Example
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use u_timetable::config::ChromosomeParams;
/// use u_timetable::ga::TimetableGaProblem;
/// use u_timetable::models::{CourseClass, ProblemInstance, Room};
///
/// let instance = ProblemInstance::new(
///     vec![Room::new("R1", 30)],
///     vec![CourseClass::new("C1", "P1"), CourseClass::new("C2", "P2")],
///     5,
///     4,
/// )
/// .unwrap();
/// let problem = TimetableGaProblem::new(instance, ChromosomeParams::default().with_crossover_points(1)).unwrap();
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// let a = problem.create_individual(&mut rng);
/// let b = problem.create_individual(&mut rng);
/// let children = problem.crossover(&a, &b, &mut rng);
/// assert_eq!(children.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableGaProblem {
    instance: ProblemInstance,
    params: ChromosomeParams,
}

impl TimetableGaProblem {
    /// Creates a problem, validating `params` against the instance.
    pub fn new(instance: ProblemInstance, params: ChromosomeParams) -> Result<Self, TimetableError> {
        validate_params(&params, instance.class_count()).map_err(TimetableError::InvalidParams)?;
        Ok(Self { instance, params })
    }

    /// Creates a problem from a run configuration and domain data.
    pub fn from_config(
        config: &TimetableConfig,
        rooms: Vec<Room>,
        classes: Vec<CourseClass>,
    ) -> Result<Self, TimetableError> {
        Self::new(config.instance(rooms, classes)?, config.chromosome)
    }

    /// The problem instance.
    pub fn instance(&self) -> &ProblemInstance {
        &self.instance
    }

    /// Chromosome parameters.
    pub fn params(&self) -> &ChromosomeParams {
        &self.params
    }

    /// Creates a random individual.
    pub fn create_individual<R: Rng>(&self, rng: &mut R) -> Chromosome {
        Chromosome::random(&self.instance, self.params, rng)
    }

    /// Re-evaluates an individual and returns its fitness.
    pub fn evaluate(&self, individual: &mut Chromosome) -> f64 {
        individual.evaluate(&self.instance).fitness
    }

    /// Recombines two parents into a single offspring.
    pub fn crossover<R: Rng>(
        &self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut R,
    ) -> Vec<Chromosome> {
        vec![parent1.crossover(parent2, &self.instance, rng)]
    }

    /// Mutates an individual in place.
    pub fn mutate<R: Rng>(&self, individual: &mut Chromosome, rng: &mut R) {
        individual.mutate(&self.instance, rng);
    }
}
