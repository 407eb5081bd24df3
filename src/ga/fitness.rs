//! Fitness evaluation.
//!
//! # Hard Constraints
//!
//! Each class earns one point per satisfied [`Criterion`], so the hard
//! score lies in `0..=5 * classes`.
//!
//! # Soft Constraints
//!
//! Built from the start hours of every group and professor per day:
//!
//! | Term | Applies per | Condition |
//! |------|-------------|-----------|
//! | isolated penalty | group/day | exactly one class |
//! | gap penalty | group/day | `(max - min) - (count - 1) > 2` |
//! | extreme penalty | professor/day | earliest start before core start; again if latest start after core end |
//! | core bonus | professor/day | starts contiguous and inside the core window |
//!
//! # Normalization
//!
//! ```text
//! score   = hard + bonus - penalty
//! fitness = score / (5 * classes + groups * isolated + professors * extreme + epsilon)
//! ```
//!
//! An instance without classes has fitness 1.0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::Chromosome;
use crate::models::{CourseClass, Placement, ProblemInstance, Violation, ViolationType};

/// Number of hard-constraint flags per class.
pub const CRITERIA_PER_CLASS: usize = 5;

/// Hard constraints checked for every class, in flag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    /// No other class shares the room during any of its hours.
    RoomFree,
    /// The room has enough seats.
    Capacity,
    /// The room is a lab, or no lab is required.
    Lab,
    /// The professor teaches nothing else at the same time.
    ProfessorFree,
    /// No attending group has another class at the same time.
    GroupsFree,
}

impl Criterion {
    /// All criteria in flag order.
    pub const ALL: [Criterion; CRITERIA_PER_CLASS] = [
        Criterion::RoomFree,
        Criterion::Capacity,
        Criterion::Lab,
        Criterion::ProfessorFree,
        Criterion::GroupsFree,
    ];

    /// Offset of this flag within a class's block of flags.
    #[inline]
    pub fn offset(self) -> usize {
        self as usize
    }

    /// Violation type reported when this criterion fails.
    pub fn violation_type(self) -> ViolationType {
        match self {
            Criterion::RoomFree => ViolationType::RoomConflict,
            Criterion::Capacity => ViolationType::CapacityExceeded,
            Criterion::Lab => ViolationType::LabRequired,
            Criterion::ProfessorFree => ViolationType::ProfessorOverlap,
            Criterion::GroupsFree => ViolationType::GroupOverlap,
        }
    }
}

/// Breakdown of one fitness evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Satisfied hard-constraint flags.
    pub hard_score: usize,
    /// `5 * classes`.
    pub max_hard_score: usize,
    /// Group/days with a single class.
    pub isolated_days: usize,
    /// Group/days with idle gaps.
    pub gap_days: usize,
    /// Professor/day boundary violations (early start and late start count separately).
    pub extreme_hours: usize,
    /// Professor/days compact inside the core window.
    pub compact_days: usize,
    /// Total soft bonus.
    pub soft_bonus: f64,
    /// Total soft penalty.
    pub soft_penalty: f64,
    /// `hard_score + soft_bonus - soft_penalty`.
    pub score: f64,
    /// Normalized fitness.
    pub fitness: f64,
}

impl Evaluation {
    /// Whether every hard constraint holds for every class.
    pub fn is_feasible(&self) -> bool {
        self.hard_score == self.max_hard_score
    }
}

/// Start hours per entity per day.
type DailyStarts<'a> = BTreeMap<&'a str, BTreeMap<usize, Vec<usize>>>;

impl Chromosome {
    /// Scores the chromosome, refreshing criteria flags and cached fitness.
    ///
    /// Deterministic for unchanged slots and placements. A chromosome that
    /// does not place every class (such as a [`skeleton`](Self::skeleton))
    /// scores zero with every flag false.
    pub fn evaluate(&mut self, instance: &ProblemInstance) -> Evaluation {
        let classes = instance.classes();
        let geometry = self.geometry;
        let weights = self.params.weights;

        self.criteria.clear();
        self.criteria.resize(classes.len() * CRITERIA_PER_CLASS, false);

        // A skeleton has no placements yet: nothing is satisfied
        if self.placements.len() != classes.len() {
            self.evaluation = Evaluation {
                max_hard_score: classes.len() * CRITERIA_PER_CLASS,
                ..Evaluation::default()
            };
            trace!(
                event = "evaluated_unplaced",
                placed = self.placements.len(),
                classes = classes.len(),
            );
            return self.evaluation;
        }

        let mut hard_score = 0;
        let mut group_days: DailyStarts = BTreeMap::new();
        let mut professor_days: DailyStarts = BTreeMap::new();

        for (idx, class) in classes.iter().enumerate() {
            let slot = self.placements[idx];
            let placement = geometry.placement_of(slot);

            for group in &class.groups {
                group_days
                    .entry(group.as_str())
                    .or_default()
                    .entry(placement.day)
                    .or_default()
                    .push(placement.hour);
            }
            professor_days
                .entry(class.professor.as_str())
                .or_default()
                .entry(placement.day)
                .or_default()
                .push(placement.hour);

            let room_free = self.slots[slot..slot + class.duration]
                .iter()
                .all(|occupants| occupants.len() <= 1);
            let (capacity, lab) = instance
                .room(placement.room)
                .map(|room| {
                    (
                        room.capacity >= class.required_seats,
                        !class.requires_lab || room.is_lab,
                    )
                })
                .unwrap_or((false, false));
            let (professor_clash, group_clash) =
                self.concurrent_clashes(idx, class, classes, &placement);

            let flags = [room_free, capacity, lab, !professor_clash, !group_clash];
            hard_score += flags.iter().filter(|&&ok| ok).count();
            let base = idx * CRITERIA_PER_CLASS;
            self.criteria[base..base + CRITERIA_PER_CLASS].copy_from_slice(&flags);
        }

        let mut isolated_days = 0;
        let mut gap_days = 0;
        for starts in group_days.values().flat_map(|days| days.values()) {
            if starts.len() == 1 {
                isolated_days += 1;
            } else if has_gap(starts) {
                gap_days += 1;
            }
        }

        let core_start = weights.core_start;
        let core_end = weights.core_end(geometry.hours_per_day);
        let mut extreme_hours = 0;
        let mut compact_days = 0;
        for starts in professor_days.values().flat_map(|days| days.values()) {
            let (Some(&first), Some(&last)) = (starts.iter().min(), starts.iter().max()) else {
                continue;
            };
            if first < core_start {
                extreme_hours += 1;
            }
            if last > core_end {
                extreme_hours += 1;
            }
            if last - first + 1 == starts.len() && first >= core_start && last <= core_end {
                compact_days += 1;
            }
        }

        let soft_penalty = isolated_days as f64 * weights.isolated_penalty
            + gap_days as f64 * weights.gap_penalty
            + extreme_hours as f64 * weights.extreme_penalty;
        let soft_bonus = compact_days as f64 * weights.core_bonus;
        let score = hard_score as f64 + soft_bonus - soft_penalty;

        let max_hard_score = classes.len() * CRITERIA_PER_CLASS;
        let fitness = if classes.is_empty() {
            1.0
        } else {
            let soft_normalizer = group_days.len() as f64 * weights.isolated_penalty
                + professor_days.len() as f64 * weights.extreme_penalty;
            score / (max_hard_score as f64 + soft_normalizer + weights.epsilon)
        };

        self.evaluation = Evaluation {
            hard_score,
            max_hard_score,
            isolated_days,
            gap_days,
            extreme_hours,
            compact_days,
            soft_bonus,
            soft_penalty,
            score,
            fitness,
        };
        trace!(
            event = "evaluated",
            hard_score,
            max_hard_score,
            soft_bonus,
            soft_penalty,
            fitness,
        );
        self.evaluation
    }

    /// Checks every room at the class's day and hours for another class
    /// with the same professor or a shared group.
    ///
    /// Returns `(professor_clash, group_clash)`.
    fn concurrent_clashes(
        &self,
        idx: usize,
        class: &CourseClass,
        classes: &[CourseClass],
        placement: &Placement,
    ) -> (bool, bool) {
        let geometry = self.geometry;
        let mut professor_clash = false;
        let mut group_clash = false;

        for room in 0..geometry.rooms {
            for hour in placement.hour..placement.hour + class.duration {
                let slot = geometry.slot_index(placement.day, room, hour);
                for &other in &self.slots[slot] {
                    if other == idx {
                        continue;
                    }
                    let other = &classes[other];
                    professor_clash |= class.professor_overlaps(other);
                    group_clash |= class.groups_overlap(other);
                    if professor_clash && group_clash {
                        return (true, true);
                    }
                }
            }
        }

        (professor_clash, group_clash)
    }

    /// Reads one hard-constraint flag of the class at canonical index `class`.
    pub fn criterion(&self, class: usize, criterion: Criterion) -> Option<bool> {
        self.criteria
            .get(class * CRITERIA_PER_CLASS + criterion.offset())
            .copied()
    }

    /// Lists every failed hard-constraint flag from the last evaluation.
    pub fn violations(&self, instance: &ProblemInstance) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (idx, class) in instance.classes().iter().enumerate() {
            for criterion in Criterion::ALL {
                if self.criterion(idx, criterion) != Some(false) {
                    continue;
                }
                let Some(placement) = self.placement(idx) else {
                    continue;
                };
                let room = instance
                    .room(placement.room)
                    .map(|r| r.id.as_str())
                    .unwrap_or("?");
                let message = match criterion {
                    Criterion::RoomFree => format!(
                        "Room '{room}' is double-booked on day {} from hour {}",
                        placement.day, placement.hour
                    ),
                    Criterion::Capacity => format!(
                        "Room '{room}' has too few seats for {} students",
                        class.required_seats
                    ),
                    Criterion::Lab => format!("Room '{room}' is not a lab"),
                    Criterion::ProfessorFree => format!(
                        "Professor '{}' teaches another class on day {} from hour {}",
                        class.professor, placement.day, placement.hour
                    ),
                    Criterion::GroupsFree => format!(
                        "A group of class '{}' has another class on day {} from hour {}",
                        class.id, placement.day, placement.hour
                    ),
                };
                violations.push(Violation::new(
                    criterion.violation_type(),
                    class.id.clone(),
                    message,
                ));
            }
        }
        violations
    }
}

/// Approximate idle-gap detector over one group's start hours on one day.
fn has_gap(starts: &[usize]) -> bool {
    let (Some(&first), Some(&last)) = (starts.iter().min(), starts.iter().max()) else {
        return false;
    };
    let spread = (last - first) as i64;
    spread - (starts.len() as i64 - 1) > 2
}
