//! School timetable (solution) model.
//!
//! A school timetable is the output of one build: a grid per class section,
//! the flat list of lesson assignments behind those grids, and the
//! violations the greedy fallback accepted on the way.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Catalog, ClassSection, Slot, Timetable};

/// Which fallback tier produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationTier {
    /// Qualified, free at the slot, and under the load cap.
    Qualified,
    /// Least-loaded free teacher of any subject.
    LeastLoaded,
    /// Random teacher; the slot is double-booked.
    Conflict,
}

/// One lesson placed in a class grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Class receiving the lesson.
    pub class: ClassSection,
    /// Day × period.
    pub slot: Slot,
    /// Subject shown in the cell.
    pub subject: String,
    /// Teacher taking the lesson.
    pub teacher_id: String,
    /// Fallback tier that chose the teacher.
    pub tier: AllocationTier,
}

/// A class section and its weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassTimetable {
    pub class: ClassSection,
    pub timetable: Timetable,
}

/// A policy compromise accepted during a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Teacher involved.
    pub teacher_id: String,
    /// Class and slot, when the violation is tied to one cell.
    pub class: Option<ClassSection>,
    pub slot: Option<Slot>,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of accepted violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Teacher not qualified in the subject shown.
    SkillMismatch,
    /// Teacher placed in two classes at the same slot.
    DoubleBooking,
    /// Teacher finished the build above the load cap.
    LoadCapExceeded,
}

impl Violation {
    /// Creates a skill mismatch violation.
    pub fn skill_mismatch(assignment: &Assignment, qualified_in: &str) -> Self {
        Self {
            violation_type: ViolationType::SkillMismatch,
            teacher_id: assignment.teacher_id.clone(),
            class: Some(assignment.class.clone()),
            slot: Some(assignment.slot),
            message: format!(
                "{} teaches {} to {} but is qualified in {}",
                assignment.teacher_id, assignment.subject, assignment.class, qualified_in
            ),
            severity: 40,
        }
    }

    /// Creates a double-booking violation.
    pub fn double_booking(assignment: &Assignment) -> Self {
        Self {
            violation_type: ViolationType::DoubleBooking,
            teacher_id: assignment.teacher_id.clone(),
            class: Some(assignment.class.clone()),
            slot: Some(assignment.slot),
            message: format!(
                "{} double-booked at {} for {}",
                assignment.teacher_id, assignment.slot, assignment.class
            ),
            severity: 95,
        }
    }

    /// Creates a load cap violation.
    pub fn load_cap_exceeded(teacher_id: impl Into<String>, load: usize, cap: usize) -> Self {
        let teacher_id = teacher_id.into();
        Self {
            message: format!("{teacher_id} has {load} lessons, cap is {cap}"),
            violation_type: ViolationType::LoadCapExceeded,
            teacher_id,
            class: None,
            slot: None,
            severity: 60,
        }
    }
}

/// Assignment counts per fallback tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Tier 1 assignments.
    pub qualified: usize,
    /// Tier 2 assignments (teacher may lack the subject).
    pub least_loaded: usize,
    /// Tier 3 assignments (double-booked).
    pub conflicts: usize,
}

impl BuildSummary {
    /// Counts one assignment.
    pub fn record(&mut self, tier: AllocationTier) {
        match tier {
            AllocationTier::Qualified => self.qualified += 1,
            AllocationTier::LeastLoaded => self.least_loaded += 1,
            AllocationTier::Conflict => self.conflicts += 1,
        }
    }

    /// Total lessons allocated.
    pub fn total(&self) -> usize {
        self.qualified + self.least_loaded + self.conflicts
    }

    /// Assignments that needed a fallback tier.
    pub fn degraded(&self) -> usize {
        self.least_loaded + self.conflicts
    }
}

/// A teacher committed to more than one class at one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleBooking {
    pub teacher_id: String,
    pub slot: Slot,
    pub classes: Vec<ClassSection>,
}

/// A teacher's weekly view: `cells[day][period]` holds
/// `"<class> - <subject>"` where the teacher has a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherWeek {
    pub teacher_id: String,
    pub cells: Vec<Vec<Option<String>>>,
}

impl TeacherWeek {
    /// Number of occupied cells.
    pub fn lesson_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }
}

/// Output of one timetable build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolTimetable {
    /// Class grids in build order.
    pub classes: Vec<ClassTimetable>,
    /// Every lesson placed, in build order.
    pub assignments: Vec<Assignment>,
    /// Accepted violations.
    pub violations: Vec<Violation>,
    /// Per-tier counts.
    pub summary: BuildSummary,
}

impl SchoolTimetable {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment and counts its tier.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.summary.record(assignment.tier);
        self.assignments.push(assignment);
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether the build needed no compromises.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Grid for a class section.
    pub fn timetable_for(&self, class: &ClassSection) -> Option<&Timetable> {
        self.classes
            .iter()
            .find(|c| &c.class == class)
            .map(|c| &c.timetable)
    }

    /// Grid by display name, e.g. `"Form 1 Rangers"`.
    pub fn timetable_named(&self, name: &str) -> Option<&ClassTimetable> {
        self.classes.iter().find(|c| c.class.to_string() == name)
    }

    /// All assignments for a teacher.
    pub fn assignments_for_teacher(&self, teacher_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.teacher_id == teacher_id)
            .collect()
    }

    /// All assignments for a class.
    pub fn assignments_for_class(&self, class: &ClassSection) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| &a.class == class)
            .collect()
    }

    /// Builds the weekly view for one teacher.
    ///
    /// When a teacher is double-booked the first class in build order wins
    /// the cell; the conflict itself is reported by [`Self::double_bookings`].
    pub fn teacher_week(&self, teacher_id: &str, catalog: &Catalog) -> TeacherWeek {
        let mut cells = vec![vec![None; catalog.periods.len()]; catalog.days.len()];
        for a in self.assignments_for_teacher(teacher_id) {
            if let Some(cell) = cells
                .get_mut(a.slot.day)
                .and_then(|row: &mut Vec<Option<String>>| row.get_mut(a.slot.period))
            {
                if cell.is_none() {
                    *cell = Some(format!("{} - {}", a.class, a.subject));
                }
            }
        }
        TeacherWeek {
            teacher_id: teacher_id.to_string(),
            cells,
        }
    }

    /// Every (teacher, slot) that appears in more than one class.
    pub fn double_bookings(&self) -> Vec<DoubleBooking> {
        let mut by_key: BTreeMap<(&str, Slot), Vec<ClassSection>> = BTreeMap::new();
        for a in &self.assignments {
            by_key
                .entry((a.teacher_id.as_str(), a.slot))
                .or_default()
                .push(a.class.clone());
        }
        by_key
            .into_iter()
            .filter(|(_, classes)| classes.len() > 1)
            .map(|((teacher_id, slot), classes)| DoubleBooking {
                teacher_id: teacher_id.to_string(),
                slot,
                classes,
            })
            .collect()
    }

    /// Lessons per teacher, counted from assignments.
    pub fn lessons_by_teacher(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for a in &self.assignments {
            *counts.entry(a.teacher_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
