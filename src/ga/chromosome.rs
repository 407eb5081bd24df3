//! Time-space slot chromosome for timetabling.
//!
//! # Encoding
//!
//! A chromosome holds one complete timetable in two views kept in sync:
//! - **Slots**: one occupant list per `(day, room, hour)` cell, flattened
//!   with [`Geometry::slot_index`]. More than one occupant = double booking.
//! - **Placements**: start slot per class, indexed by canonical class
//!   position in [`ProblemInstance::classes`].
//!
//! A class of duration `d` starting at slot `p` is listed in slots
//! `p..p + d`, all within the same day and room.
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated
//! timetabling"

use std::collections::HashMap;

use rand::Rng;
use tracing::debug;

use super::fitness::{Evaluation, CRITERIA_PER_CLASS};
use super::operators::{multi_point_crossover, relocation_mutation};
use crate::config::ChromosomeParams;
use crate::error::TimetableError;
use crate::models::{
    Geometry, Placement, ProblemInstance, ScheduledClass, TimetableEntry,
};
use crate::validation::validate_params;

/// One candidate timetable.
///
/// `Clone` is a deep copy: every clone owns its slot lists, placements and
/// criteria flags. Higher fitness = better timetable (maximization).
#[derive(Debug, Clone)]
pub struct Chromosome {
    pub(super) params: ChromosomeParams,
    pub(super) geometry: Geometry,
    /// Occupant class indices per slot.
    pub(super) slots: Vec<Vec<usize>>,
    /// Start slot per canonical class index.
    pub(super) placements: Vec<usize>,
    /// Hard-constraint flags, [`CRITERIA_PER_CLASS`] per class.
    pub(super) criteria: Vec<bool>,
    pub(super) evaluation: Evaluation,
}

impl Chromosome {
    /// Creates a chromosome with every class at a random position.
    ///
    /// Each class gets a uniform random day, room and start hour such that
    /// it ends within the day. Overlaps are not rejected. Fitness is
    /// evaluated once before returning.
    ///
    /// # Errors
    /// [`TimetableError::InvalidParams`] if `params` cannot be used with
    /// this instance (see [`validate_params`]).
    pub fn new_random<R: Rng>(
        instance: &ProblemInstance,
        params: ChromosomeParams,
        rng: &mut R,
    ) -> Result<Self, TimetableError> {
        validate_params(&params, instance.class_count()).map_err(TimetableError::InvalidParams)?;
        Ok(Self::random(instance, params, rng))
    }

    /// Random construction with already validated parameters.
    pub(super) fn random<R: Rng>(
        instance: &ProblemInstance,
        params: ChromosomeParams,
        rng: &mut R,
    ) -> Self {
        let geometry = instance.geometry();
        let mut chromosome = Self::empty(geometry, params, instance.class_count());

        for (idx, class) in instance.classes().iter().enumerate() {
            let slot = random_slot(&geometry, class.duration, rng);
            chromosome.placements.push(slot);
            chromosome.occupy(idx, slot, class.duration);
        }

        let evaluation = chromosome.evaluate(instance);
        debug!(
            event = "chromosome_created",
            classes = instance.class_count(),
            fitness = evaluation.fitness,
        );
        chromosome
    }

    /// Rebuilds a chromosome from stored placements.
    ///
    /// Every class of the instance needs exactly one entry, matched by ID.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidParams`] for unusable parameters
    /// - [`TimetableError::InvalidPlacement`] for a missing, duplicate,
    ///   unknown, or out-of-grid placement
    pub fn from_placements(
        instance: &ProblemInstance,
        params: ChromosomeParams,
        scheduled: &[ScheduledClass],
    ) -> Result<Self, TimetableError> {
        validate_params(&params, instance.class_count()).map_err(TimetableError::InvalidParams)?;

        let mut by_id: HashMap<&str, Placement> = HashMap::with_capacity(scheduled.len());
        for entry in scheduled {
            if instance.class_index(&entry.class_id).is_none() {
                return Err(TimetableError::InvalidPlacement {
                    class_id: entry.class_id.clone(),
                    reason: "unknown class".into(),
                });
            }
            if by_id.insert(entry.class_id.as_str(), entry.placement).is_some() {
                return Err(TimetableError::InvalidPlacement {
                    class_id: entry.class_id.clone(),
                    reason: "placed more than once".into(),
                });
            }
        }

        let geometry = instance.geometry();
        let mut chromosome = Self::empty(geometry, params, instance.class_count());
        for (idx, class) in instance.classes().iter().enumerate() {
            let placement = by_id.get(class.id.as_str()).copied().ok_or_else(|| {
                TimetableError::InvalidPlacement {
                    class_id: class.id.clone(),
                    reason: "no placement".into(),
                }
            })?;
            if !geometry.contains(&placement, class.duration) {
                return Err(TimetableError::InvalidPlacement {
                    class_id: class.id.clone(),
                    reason: format!(
                        "day {} room {} hour {} (+{}h) is outside the {}x{}x{} grid",
                        placement.day,
                        placement.room,
                        placement.hour,
                        class.duration,
                        geometry.days_per_week,
                        geometry.rooms,
                        geometry.hours_per_day
                    ),
                });
            }
            let slot = geometry.slot_index(placement.day, placement.room, placement.hour);
            chromosome.placements.push(slot);
            chromosome.occupy(idx, slot, class.duration);
        }

        chromosome.evaluate(instance);
        Ok(chromosome)
    }

    /// Empty chromosome with the same parameters and geometry.
    ///
    /// Slots are empty and no class is placed; used as the base that
    /// crossover fills in.
    pub fn skeleton(&self) -> Self {
        Self::empty(self.geometry, self.params, self.criteria.len() / CRITERIA_PER_CLASS)
    }

    fn empty(geometry: Geometry, params: ChromosomeParams, class_count: usize) -> Self {
        Self {
            params,
            geometry,
            slots: vec![Vec::new(); geometry.slot_count()],
            placements: Vec::with_capacity(class_count),
            criteria: vec![false; class_count * CRITERIA_PER_CLASS],
            evaluation: Evaluation::default(),
        }
    }

    /// Recombines with `other`, returning one offspring.
    ///
    /// See [`multi_point_crossover`].
    pub fn crossover<R: Rng>(
        &self,
        other: &Chromosome,
        instance: &ProblemInstance,
        rng: &mut R,
    ) -> Chromosome {
        multi_point_crossover(self, other, instance, rng)
    }

    /// Mutates in place. See [`relocation_mutation`].
    pub fn mutate<R: Rng>(&mut self, instance: &ProblemInstance, rng: &mut R) {
        relocation_mutation(self, instance, rng);
    }

    /// Cached normalized fitness (higher = better).
    pub fn fitness(&self) -> f64 {
        self.evaluation.fitness
    }

    /// Cached raw score: hard score + soft bonus - soft penalty.
    pub fn score(&self) -> f64 {
        self.evaluation.score
    }

    /// Cached breakdown of the last evaluation.
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    /// Operator parameters.
    pub fn params(&self) -> &ChromosomeParams {
        &self.params
    }

    /// Grid geometry.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Occupant class indices per slot.
    pub fn slots(&self) -> &[Vec<usize>] {
        &self.slots
    }

    /// Start slot per canonical class index.
    pub fn start_slots(&self) -> &[usize] {
        &self.placements
    }

    /// Hard-constraint flags, five per class in canonical order.
    pub fn criteria(&self) -> &[bool] {
        &self.criteria
    }

    /// Placement of the class at canonical index `class`.
    pub fn placement(&self, class: usize) -> Option<Placement> {
        self.placements
            .get(class)
            .map(|&slot| self.geometry.placement_of(slot))
    }

    /// Placement of every class, in canonical order.
    pub fn placements(&self, instance: &ProblemInstance) -> Vec<ScheduledClass> {
        instance
            .classes()
            .iter()
            .zip(&self.placements)
            .map(|(class, &slot)| ScheduledClass {
                class_id: class.id.clone(),
                placement: self.geometry.placement_of(slot),
            })
            .collect()
    }

    /// Flattens to one row per (class, group) for storage.
    ///
    /// Classes without groups yield a single row with an empty group.
    pub fn timetable(&self, instance: &ProblemInstance) -> Vec<TimetableEntry> {
        let mut entries = Vec::new();
        for (class, &slot) in instance.classes().iter().zip(&self.placements) {
            let placement = self.geometry.placement_of(slot);
            let room = instance
                .room(placement.room)
                .map(|r| r.id.clone())
                .unwrap_or_default();
            let entry = |group: &str| TimetableEntry {
                class_id: class.id.clone(),
                subject: class.subject.clone(),
                professor: class.professor.clone(),
                group: group.to_string(),
                room: room.clone(),
                day: placement.day,
                start_hour: placement.hour,
                duration: class.duration,
            };
            if class.groups.is_empty() {
                entries.push(entry(""));
            } else {
                entries.extend(class.groups.iter().map(|g| entry(g.as_str())));
            }
        }
        entries
    }

    /// Checks that placements and slot occupancy agree.
    ///
    /// Every class must have one in-grid, single-day placement and be
    /// listed exactly once in each of its `duration` slots and nowhere else.
    pub fn is_consistent(&self, instance: &ProblemInstance) -> bool {
        let classes = instance.classes();
        if self.placements.len() != classes.len()
            || self.slots.len() != self.geometry.slot_count()
        {
            return false;
        }

        let mut listed = 0;
        for (idx, class) in classes.iter().enumerate() {
            let slot = self.placements[idx];
            if slot >= self.slots.len()
                || !self
                    .geometry
                    .contains(&self.geometry.placement_of(slot), class.duration)
            {
                return false;
            }
            for s in slot..slot + class.duration {
                if self.slots[s].iter().filter(|&&c| c == idx).count() != 1 {
                    return false;
                }
            }
            listed += class.duration;
        }

        self.slots.iter().map(Vec::len).sum::<usize>() == listed
    }

    /// Lists `class` in slots `slot..slot + duration`.
    pub(super) fn occupy(&mut self, class: usize, slot: usize, duration: usize) {
        for occupants in &mut self.slots[slot..slot + duration] {
            occupants.push(class);
        }
    }

    /// Removes `class` from slots `slot..slot + duration`.
    pub(super) fn vacate(&mut self, class: usize, slot: usize, duration: usize) {
        for occupants in &mut self.slots[slot..slot + duration] {
            let pos = occupants.iter().position(|&c| c == class);
            debug_assert!(pos.is_some(), "class {class} is not listed in slot occupants");
            if let Some(pos) = pos {
                occupants.remove(pos);
            }
        }
    }

    /// Moves `class` to start at `to`, keeping slots and placements in sync.
    ///
    /// Does not re-evaluate.
    pub(super) fn relocate(&mut self, class: usize, duration: usize, to: usize) {
        let from = self.placements[class];
        self.vacate(class, from, duration);
        self.occupy(class, to, duration);
        self.placements[class] = to;
    }
}

/// Draws a uniform day, room and start hour for a class of `duration`
/// hours such that `hour + duration <= hours_per_day`.
pub(super) fn random_slot<R: Rng>(geometry: &Geometry, duration: usize, rng: &mut R) -> usize {
    let day = rng.random_range(0..geometry.days_per_week);
    let room = rng.random_range(0..geometry.rooms);
    let hour = rng.random_range(0..=geometry.hours_per_day - duration);
    geometry.slot_index(day, room, hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseClass, Room};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_instance() -> ProblemInstance {
        ProblemInstance::new(
            vec![Room::new("R1", 40), Room::lab("L1", 20), Room::new("R2", 100)],
            vec![
                CourseClass::new("C1", "P1").with_group("G1").with_duration(2).with_seats(30),
                CourseClass::new("C2", "P2").with_group("G1").with_group("G2").with_seats(60),
                CourseClass::new("C3", "P1").with_group("G2").with_duration(3).with_lab(true),
                CourseClass::new("C4", "P3").with_group("G3").with_duration(1),
            ],
            5,
            4,
        )
        .unwrap()
    }

    fn params() -> ChromosomeParams {
        ChromosomeParams::default().with_crossover_points(1)
    }

    #[test]
    fn test_random_chromosome() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = Chromosome::new_random(&instance, params(), &mut rng).unwrap();

        assert_eq!(ch.start_slots().len(), 4);
        assert_eq!(ch.slots().len(), 5 * 4 * 3);
        assert_eq!(ch.criteria().len(), 4 * CRITERIA_PER_CLASS);
        assert!(ch.is_consistent(&instance));
        assert!(ch.fitness() > 0.0);
    }

    #[test]
    fn test_random_rejects_bad_params() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let err = Chromosome::new_random(
            &instance,
            ChromosomeParams::default().with_crossover_points(4),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidParams(_)));
    }

    #[test]
    fn test_bounded_start_hour() {
        // 1 room, 1 day, 4 hours: a 2-hour class must start at hour 0, 1 or 2
        let instance = ProblemInstance::new(
            vec![Room::new("R1", 10)],
            vec![CourseClass::new("C1", "P1").with_duration(2)],
            1,
            4,
        )
        .unwrap();
        // No crossover point fits a single class, so sample without the params gate
        assert!(Chromosome::new_random(&instance, params(), &mut SmallRng::seed_from_u64(7)).is_err());
        let mut rng = SmallRng::seed_from_u64(7);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            let ch = Chromosome::random(&instance, params(), &mut rng);
            let p = ch.placement(0).unwrap();
            assert_eq!(p.day, 0);
            assert_eq!(p.room, 0);
            assert!(p.hour + 2 <= 4);
            assert!(ch.is_consistent(&instance));
            seen.insert(p.hour);
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_clone_independence() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(3);
        let original = Chromosome::new_random(&instance, params(), &mut rng).unwrap();
        let snapshot_slots = original.slots().to_vec();
        let snapshot_placements = original.start_slots().to_vec();
        let snapshot_criteria = original.criteria().to_vec();

        let mut copy = original.clone();
        assert_eq!(copy.fitness(), original.fitness());

        let target = if copy.placements[0] == 0 { 4 } else { 0 };
        copy.relocate(0, 2, target);
        copy.criteria.iter_mut().for_each(|f| *f = !*f);

        assert_eq!(original.slots(), snapshot_slots.as_slice());
        assert_eq!(original.start_slots(), snapshot_placements.as_slice());
        assert_eq!(original.criteria(), snapshot_criteria.as_slice());
        assert!(original.is_consistent(&instance));
        assert!(copy.is_consistent(&instance));
    }

    #[test]
    fn test_skeleton_is_empty() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(5);
        let ch = Chromosome::new_random(&instance, params(), &mut rng).unwrap();
        let skeleton = ch.skeleton();

        assert_eq!(skeleton.params(), ch.params());
        assert_eq!(skeleton.geometry(), ch.geometry());
        assert_eq!(skeleton.slots().len(), ch.slots().len());
        assert!(skeleton.slots().iter().all(Vec::is_empty));
        assert!(skeleton.start_slots().is_empty());
        assert_eq!(skeleton.criteria().len(), ch.criteria().len());
        assert_eq!(skeleton.fitness(), 0.0);
    }

    #[test]
    fn test_from_placements_round_trip() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(11);
        let ch = Chromosome::new_random(&instance, params(), &mut rng).unwrap();

        let stored = ch.placements(&instance);
        let reloaded = Chromosome::from_placements(&instance, params(), &stored).unwrap();

        assert_eq!(reloaded.start_slots(), ch.start_slots());
        assert_eq!(reloaded.slots(), ch.slots());
        assert_eq!(reloaded.criteria(), ch.criteria());
        assert_eq!(reloaded.fitness(), ch.fitness());
    }

    #[test]
    fn test_from_placements_rejects_day_wrap() {
        let instance = sample_instance();
        let mut stored = vec![
            ScheduledClass { class_id: "C1".into(), placement: Placement::new(0, 0, 3) },
            ScheduledClass { class_id: "C2".into(), placement: Placement::new(0, 2, 0) },
            ScheduledClass { class_id: "C3".into(), placement: Placement::new(1, 1, 0) },
            ScheduledClass { class_id: "C4".into(), placement: Placement::new(2, 0, 0) },
        ];
        let err = Chromosome::from_placements(&instance, params(), &stored).unwrap_err();
        match err {
            TimetableError::InvalidPlacement { class_id, .. } => assert_eq!(class_id, "C1"),
            other => panic!("unexpected error: {other}"),
        }

        stored[0].placement = Placement::new(0, 0, 2);
        assert!(Chromosome::from_placements(&instance, params(), &stored).is_ok());

        stored.pop();
        let err = Chromosome::from_placements(&instance, params(), &stored).unwrap_err();
        assert!(err.to_string().contains("C4"));
    }

    #[test]
    fn test_from_placements_rejects_unknown_and_duplicate() {
        let instance = sample_instance();
        let unknown = vec![ScheduledClass {
            class_id: "C9".into(),
            placement: Placement::new(0, 0, 0),
        }];
        assert!(Chromosome::from_placements(&instance, params(), &unknown).is_err());

        let twice = vec![
            ScheduledClass { class_id: "C4".into(), placement: Placement::new(0, 0, 0) },
            ScheduledClass { class_id: "C4".into(), placement: Placement::new(1, 0, 0) },
        ];
        let err = Chromosome::from_placements(&instance, params(), &twice).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_relocate_moves_occupancy() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ch = Chromosome::new_random(&instance, params(), &mut rng).unwrap();
        let geometry = ch.geometry();

        // C1 (index 0, 2 hours) from day 0 room 0 hour 0 to day 3 room 2 hour 2
        let from = geometry.slot_index(0, 0, 0);
        let to = geometry.slot_index(3, 2, 2);
        ch.relocate(0, 2, from);
        assert_eq!(ch.start_slots()[0], from);

        ch.relocate(0, 2, to);
        assert_eq!(ch.start_slots()[0], to);
        assert!(!ch.slots()[from].contains(&0));
        assert!(!ch.slots()[from + 1].contains(&0));
        assert!(ch.slots()[to].contains(&0));
        assert!(ch.slots()[to + 1].contains(&0));
        assert!(ch.is_consistent(&instance));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not listed in slot occupants")]
    fn test_vacate_unlisted_class_panics() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(6);
        let mut ch = Chromosome::new_random(&instance, params(), &mut rng).unwrap();
        let slot = ch.placements[3];
        ch.slots[slot].clear();
        ch.relocate(3, 1, slot);
    }

    #[test]
    fn test_timetable_rows_per_group() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(9);
        let ch = Chromosome::new_random(&instance, params(), &mut rng).unwrap();

        let rows = ch.timetable(&instance);
        // C1: G1, C2: G1+G2, C3: G2, C4: G3
        assert_eq!(rows.len(), 5);
        let c2: Vec<_> = rows.iter().filter(|r| r.class_id == "C2").collect();
        assert_eq!(c2.len(), 2);
        assert_eq!(c2[0].room, c2[1].room);
        let c3 = rows.iter().find(|r| r.class_id == "C3").unwrap();
        assert_eq!(c3.duration, 3);
        assert!(c3.end_hour() <= 4);
    }

    #[test]
    fn test_inconsistent_chromosome() {
        let instance = sample_instance();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ch = Chromosome::new_random(&instance, params(), &mut rng).unwrap();
        let slot = ch.placements[3];
        ch.slots[slot].push(3);
        assert!(!ch.is_consistent(&instance));
    }
}
