//! Teacher and teacher pool models.
//!
//! Teachers are the schedulable resources of a timetable. Each teacher is
//! qualified in one subject, may be the class teacher of one section, and
//! accumulates a booking set of [`Slot`]s during a build.
//!
//! The pool exposes the booking contract used by the builder:
//! `is_booked`, `load`, and `book`. Booking is idempotent and never
//! rejected; avoiding double-booking is the allocator's job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{ClassSection, Slot};

/// A teacher that can be assigned to lesson slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier, e.g. `"JOH07QK"`.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Subject qualification.
    pub subject: String,
    /// Home class, if this teacher is a class teacher.
    pub class_assigned: Option<ClassSection>,
    /// Maximum lessons per week (soft cap).
    pub max_lessons: usize,
    /// Committed (day, period) slots.
    #[serde(default)]
    bookings: BTreeSet<Slot>,
}

impl Teacher {
    /// Creates a teacher with an empty booking set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        subject: impl Into<String>,
        max_lessons: usize,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subject: subject.into(),
            class_assigned: None,
            max_lessons,
            bookings: BTreeSet::new(),
        }
    }

    /// Makes this teacher the class teacher of a section.
    pub fn with_class(mut self, class: ClassSection) -> Self {
        self.class_assigned = Some(class);
        self
    }

    /// Whether the teacher is committed at a slot.
    #[inline]
    pub fn is_booked(&self, slot: Slot) -> bool {
        self.bookings.contains(&slot)
    }

    /// Number of committed slots.
    #[inline]
    pub fn load(&self) -> usize {
        self.bookings.len()
    }

    /// Whether the teacher is still below the load cap.
    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.load() < self.max_lessons
    }

    /// Committed slots in day-major order.
    pub fn bookings(&self) -> impl Iterator<Item = Slot> + '_ {
        self.bookings.iter().copied()
    }

    fn book(&mut self, slot: Slot) -> bool {
        self.bookings.insert(slot)
    }
}

/// The set of teachers available to one timetable build.
///
/// Teachers are addressed by index; the index order is the pool's iteration
/// order and is used as the tie-break wherever one is needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherPool {
    teachers: Vec<Teacher>,
}

impl TeacherPool {
    /// Creates a pool from teachers in iteration order.
    pub fn new(teachers: Vec<Teacher>) -> Self {
        Self { teachers }
    }

    /// Appends a teacher, returning its index.
    pub fn push(&mut self, teacher: Teacher) -> usize {
        self.teachers.push(teacher);
        self.teachers.len() - 1
    }

    /// Number of teachers.
    pub fn len(&self) -> usize {
        self.teachers.len()
    }

    /// Whether the pool has no teachers.
    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty()
    }

    /// All teachers in pool order.
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// Teacher at an index.
    pub fn get(&self, idx: usize) -> Option<&Teacher> {
        self.teachers.get(idx)
    }

    /// Index of the teacher with a given id.
    pub fn position(&self, teacher_id: &str) -> Option<usize> {
        self.teachers.iter().position(|t| t.id == teacher_id)
    }

    /// Teacher with a given id.
    pub fn find(&self, teacher_id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == teacher_id)
    }

    /// Indices of teachers qualified in a subject, in pool order.
    pub fn qualified(&self, subject: &str) -> Vec<usize> {
        self.teachers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.subject == subject)
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether teacher `idx` is committed at `slot`. Unknown indices are
    /// reported as booked so they are never chosen.
    pub fn is_booked(&self, idx: usize, slot: Slot) -> bool {
        self.teachers.get(idx).map_or(true, |t| t.is_booked(slot))
    }

    /// Size of teacher `idx`'s booking set (0 for unknown indices).
    pub fn load(&self, idx: usize) -> usize {
        self.teachers.get(idx).map_or(0, Teacher::load)
    }

    /// Commits teacher `idx` at `slot`.
    ///
    /// Idempotent: returns `false` if the slot was already booked (or the
    /// index is unknown). Never rejects a conflicting booking.
    pub fn book(&mut self, idx: usize, slot: Slot) -> bool {
        self.teachers.get_mut(idx).is_some_and(|t| t.book(slot))
    }

    /// Forgets all bookings so the pool can drive a fresh build.
    pub fn clear_bookings(&mut self) {
        for t in &mut self.teachers {
            t.bookings.clear();
        }
    }

    /// Total committed slots across the pool.
    pub fn total_load(&self) -> usize {
        self.teachers.iter().map(Teacher::load).sum()
    }
}
