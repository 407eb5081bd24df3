//! Timetable quality metrics (KPIs).
//!
//! Summarizes an evaluated chromosome for reporting.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Hard satisfaction | Satisfied flags / (5 × classes) |
//! | Violations by type | Failed flags per hard constraint |
//! | Double-booked slots | Slots with more than one class |
//! | Room utilization | Occupied slots / slots of the room |

use std::collections::HashMap;

use crate::ga::{Chromosome, Criterion};
use crate::models::{ProblemInstance, ViolationType};

/// Timetable performance indicators.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Normalized fitness.
    pub fitness: f64,
    /// Fraction of hard-constraint flags satisfied (0.0..1.0).
    pub hard_satisfaction: f64,
    /// Failed flag count per violation type.
    pub violations_by_type: HashMap<ViolationType, usize>,
    /// Number of slots holding more than one class.
    pub double_booked_slots: usize,
    /// Per-room utilization (0.0..1.0), keyed by room ID.
    pub utilization_by_room: HashMap<String, f64>,
    /// Mean room utilization (0.0..1.0).
    pub avg_utilization: f64,
}

impl TimetableKpi {
    /// Computes KPIs from an evaluated chromosome.
    pub fn calculate(chromosome: &Chromosome, instance: &ProblemInstance) -> Self {
        let evaluation = chromosome.evaluation();
        let hard_satisfaction = if evaluation.max_hard_score == 0 {
            1.0
        } else {
            evaluation.hard_score as f64 / evaluation.max_hard_score as f64
        };

        let mut violations_by_type = HashMap::new();
        for class in 0..instance.class_count() {
            for criterion in Criterion::ALL {
                if chromosome.criterion(class, criterion) == Some(false) {
                    *violations_by_type
                        .entry(criterion.violation_type())
                        .or_insert(0) += 1;
                }
            }
        }

        let slots = chromosome.slots();
        let double_booked_slots = slots.iter().filter(|s| s.len() > 1).count();

        let geometry = chromosome.geometry();
        let room_slots = geometry.days_per_week * geometry.hours_per_day;
        let mut utilization_by_room = HashMap::new();
        for (room_idx, room) in instance.rooms().iter().enumerate() {
            let occupied = (0..geometry.days_per_week)
                .flat_map(|day| {
                    (0..geometry.hours_per_day).map(move |hour| (day, hour))
                })
                .filter(|&(day, hour)| !slots[geometry.slot_index(day, room_idx, hour)].is_empty())
                .count();
            let utilization = if room_slots == 0 {
                0.0
            } else {
                occupied as f64 / room_slots as f64
            };
            utilization_by_room.insert(room.id.clone(), utilization);
        }

        let avg_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            utilization_by_room.values().sum::<f64>() / utilization_by_room.len() as f64
        };

        Self {
            fitness: evaluation.fitness,
            hard_satisfaction,
            violations_by_type,
            double_booked_slots,
            utilization_by_room,
            avg_utilization,
        }
    }

    /// Total failed hard-constraint flags.
    pub fn total_violations(&self) -> usize {
        self.violations_by_type.values().sum()
    }
}
