//! Single-pass greedy timetable builder.
//!
//! # Algorithm
//!
//! 1. Validate catalog and pool; refuse to start on any error.
//! 2. For each class (generation order), each day, each period:
//!    - non-lesson period: write its fixed label;
//!    - lesson period: allocate (subject, teacher), write the cell, book
//!      the teacher at the slot.
//! 3. Record a violation for every degraded allocation and for every
//!    teacher that ends above the load cap.
//!
//! No backtracking: a written cell is never revisited.
//!
//! # Complexity
//! O(c * d * p * t) where c=classes, d=days, p=periods, t=teachers.

use rand::Rng;
use tracing::{debug, info, warn};

use super::SlotAllocator;
use crate::error::BuildError;
use crate::models::{
    AllocationTier, Assignment, Catalog, Cell, ClassSection, ClassTimetable, SchoolTimetable, Slot,
    TeacherPool, Timetable, Violation,
};
use crate::validation::validate_input;

/// Drives the slot allocator over every class × day × period.
///
/// The pool is borrowed mutably for the whole build, so two builds can
/// never share one pool concurrently.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_timetable::generation::generate_teacher_pool;
/// use u_timetable::models::Catalog;
/// use u_timetable::scheduler::TimetableBuilder;
///
/// let catalog = Catalog::default();
/// let mut rng = StdRng::seed_from_u64(2024);
/// let mut pool = generate_teacher_pool(&catalog, &mut rng);
///
/// let result = TimetableBuilder::new(&catalog)
///     .build(&mut pool, &mut rng)
///     .unwrap();
/// assert_eq!(result.classes.len(), 16);
/// assert!(result.classes.iter().all(|c| c.timetable.is_complete()));
/// ```
#[derive(Debug, Clone)]
pub struct TimetableBuilder<'a> {
    catalog: &'a Catalog,
    allocator: SlotAllocator,
}

impl<'a> TimetableBuilder<'a> {
    /// Creates a builder for a catalog.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            allocator: SlotAllocator::new(catalog),
        }
    }

    /// Replaces the slot allocator.
    pub fn with_allocator(mut self, allocator: SlotAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Builds timetables for every class section in the catalog.
    pub fn build<R: Rng + ?Sized>(
        &self,
        pool: &mut TeacherPool,
        rng: &mut R,
    ) -> Result<SchoolTimetable, BuildError> {
        let classes = self.catalog.class_sections();
        self.build_classes(&classes, pool, rng)
    }

    /// Builds timetables for the given classes, in the given order.
    pub fn build_classes<R: Rng + ?Sized>(
        &self,
        classes: &[ClassSection],
        pool: &mut TeacherPool,
        rng: &mut R,
    ) -> Result<SchoolTimetable, BuildError> {
        if pool.is_empty() {
            return Err(BuildError::EmptyPool);
        }
        if self.allocator.weighted_subjects().is_empty() {
            return Err(BuildError::NoSubjects);
        }
        validate_input(self.catalog, pool).map_err(BuildError::Invalid)?;

        let catalog = self.catalog;
        let mut result = SchoolTimetable::new();

        for class in classes {
            let mut timetable = Timetable::new(catalog.days.len(), catalog.periods.len());

            for slot in catalog.slots() {
                let period = &catalog.periods[slot.period];
                if !period.is_lesson() {
                    let written = timetable.fill(
                        slot,
                        Cell::Fixed {
                            label: period.label().to_string(),
                        },
                    );
                    debug_assert!(written, "cell {slot} written twice");
                    continue;
                }

                let allocation = self
                    .allocator
                    .allocate(slot, pool, rng)
                    .ok_or(BuildError::EmptyPool)?;
                let teacher = &pool.teachers()[allocation.teacher];
                let assignment = Assignment {
                    class: class.clone(),
                    slot,
                    subject: allocation.subject,
                    teacher_id: teacher.id.clone(),
                    tier: allocation.tier,
                };

                match assignment.tier {
                    AllocationTier::Qualified => {}
                    AllocationTier::LeastLoaded => {
                        debug!(
                            class = %class,
                            slot = %catalog.describe_slot(slot),
                            subject = %assignment.subject,
                            teacher = %teacher.id,
                            "no qualified teacher free, using least-loaded teacher"
                        );
                        if teacher.subject != assignment.subject {
                            result.add_violation(Violation::skill_mismatch(
                                &assignment,
                                &teacher.subject,
                            ));
                        }
                    }
                    AllocationTier::Conflict => {
                        warn!(
                            class = %class,
                            slot = %catalog.describe_slot(slot),
                            teacher = %teacher.id,
                            "every teacher booked, accepting double-booking"
                        );
                        result.add_violation(Violation::double_booking(&assignment));
                    }
                }

                let written = timetable.fill(
                    slot,
                    Cell::Lesson {
                        subject: assignment.subject.clone(),
                        teacher_id: assignment.teacher_id.clone(),
                    },
                );
                debug_assert!(written, "cell {slot} written twice");

                pool.book(allocation.teacher, slot);
                result.add_assignment(assignment);
            }

            result.classes.push(ClassTimetable {
                class: class.clone(),
                timetable,
            });
        }

        for t in pool.teachers() {
            if t.load() > t.max_lessons {
                result.add_violation(Violation::load_cap_exceeded(
                    &t.id,
                    t.load(),
                    t.max_lessons,
                ));
            }
        }

        info!(
            classes = result.classes.len(),
            lessons = result.summary.total(),
            least_loaded = result.summary.least_loaded,
            conflicts = result.summary.conflicts,
            "timetable built"
        );

        Ok(result)
    }
}

/// Slots of a class grid that hold lessons, for callers that only need
/// the schedulable cells.
pub fn lesson_slots(catalog: &Catalog) -> Vec<Slot> {
    catalog
        .slots()
        .filter(|s| catalog.periods[s.period].is_lesson())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Period, Teacher};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Two days × (lesson, break, lesson), one form with `streams` streams.
    fn small_catalog(streams: &[&str], cap: usize) -> Catalog {
        Catalog {
            periods: vec![
                Period::lesson("08:00-09:00"),
                Period::fixed("09:00-09:20", crate::models::PeriodKind::Break, "Break"),
                Period::lesson("09:20-10:20"),
            ],
            days: vec!["Monday".into(), "Tuesday".into()],
            forms: vec![1],
            streams: streams.iter().map(|s| s.to_string()).collect(),
            max_lessons_per_week: cap,
            ..Catalog::default()
        }
    }

    fn one_per_subject(catalog: &Catalog) -> TeacherPool {
        TeacherPool::new(
            catalog
                .subjects
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    Teacher::new(
                        format!("T{i:02}"),
                        format!("Teacher {i}"),
                        s.clone(),
                        catalog.max_lessons_per_week,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_every_cell_written_once() {
        let catalog = Catalog::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut pool = crate::generation::generate_teacher_pool(&catalog, &mut rng);
        let result = TimetableBuilder::new(&catalog).build(&mut pool, &mut rng).unwrap();

        assert_eq!(result.classes.len(), 16);
        for ct in &result.classes {
            assert!(ct.timetable.is_complete());
            assert_eq!(ct.timetable.iter().count(), 5 * 19);
            assert_eq!(ct.timetable.lessons().count(), 60);
        }
        assert_eq!(result.assignment_count(), 16 * 60);
        assert_eq!(result.summary.total(), 16 * 60);
    }

    #[test]
    fn test_non_lesson_cells_carry_labels() {
        let catalog = Catalog::default();
        let mut rng = SmallRng::seed_from_u64(12);
        let mut pool = crate::generation::generate_teacher_pool(&catalog, &mut rng);
        let result = TimetableBuilder::new(&catalog).build(&mut pool, &mut rng).unwrap();
        let tt = &result.classes[0].timetable;
        assert_eq!(tt.get(Slot::new(0, 1)).unwrap().to_string(), "Short Break");
        assert_eq!(tt.get(Slot::new(4, 18)).unwrap().to_string(), "Prep (Self Reading)");
        let lesson = tt.get(Slot::new(0, 0)).unwrap().to_string();
        assert!(lesson.ends_with(')') && lesson.contains(" ("));
    }

    #[test]
    fn test_load_cap_respected_with_enough_teachers() {
        // one class, one teacher per subject: 4 lessons/week, cap 28
        let catalog = small_catalog(&["Rangers"], 28);
        let mut pool = one_per_subject(&catalog);
        let mut rng = SmallRng::seed_from_u64(13);
        let result = TimetableBuilder::new(&catalog).build(&mut pool, &mut rng).unwrap();

        assert!(pool.teachers().iter().all(|t| t.load() <= t.max_lessons));
        assert_eq!(result.summary.conflicts, 0);
        assert!(result.double_bookings().is_empty());
        assert_eq!(result.summary.qualified, 4);
    }

    #[test]
    fn test_full_school_has_no_conflicts() {
        // at most 16 classes share a slot, so 44 teachers never run out
        let catalog = Catalog::default();
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut pool = crate::generation::generate_teacher_pool(&catalog, &mut rng);
            let result = TimetableBuilder::new(&catalog).build(&mut pool, &mut rng).unwrap();
            assert_eq!(result.summary.conflicts, 0, "seed {seed}");
            assert!(result.double_bookings().is_empty(), "seed {seed}");
            assert_eq!(pool.total_load(), 16 * 60);
            assert!(pool.teachers().iter().all(|t| t.load() <= 28), "seed {seed}");
        }
    }

    #[test]
    fn test_load_cap_binds_on_full_week() {
        // 13 teachers × cap 5 = 65 >= 60 lessons, but core subjects are drawn
        // more often than their teacher can take
        let catalog = Catalog {
            max_lessons_per_week: 5,
            ..Catalog::default()
        };
        let mut pool = one_per_subject(&catalog);
        let mut rng = SmallRng::seed_from_u64(19);
        let result = TimetableBuilder::new(&catalog)
            .build_classes(&[ClassSection::new(1, "Rangers")], &mut pool, &mut rng)
            .unwrap();

        assert_eq!(result.assignment_count(), 60);
        assert!(pool.teachers().iter().all(|t| t.load() <= t.max_lessons));
        assert!(result.summary.least_loaded > 0);
        assert_eq!(result.summary.conflicts, 0);
        assert!(!result
            .violations
            .iter()
            .any(|v| v.violation_type == crate::models::ViolationType::LoadCapExceeded));
    }

    #[test]
    fn test_too_few_teachers_forces_conflicts() {
        crate::logging::init_test();
        // 4 classes sharing 2 teachers: every lesson slot needs 4 teachers
        let catalog = small_catalog(&["A", "B", "C", "D"], 28);
        let mut pool = TeacherPool::new(vec![
            Teacher::new("T1", "One", "Mathematics", 28),
            Teacher::new("T2", "Two", "English", 28),
        ]);
        let mut rng = SmallRng::seed_from_u64(14);
        let result = TimetableBuilder::new(&catalog).build(&mut pool, &mut rng).unwrap();

        assert_eq!(result.classes.len(), 4);
        assert!(result.classes.iter().all(|c| c.timetable.is_complete()));
        // 4 lesson slots × (4 classes - 2 teachers)
        assert_eq!(result.summary.conflicts, 8);
        assert!(!result.double_bookings().is_empty());
        assert!(result
            .violations
            .iter()
            .any(|v| v.violation_type == crate::models::ViolationType::DoubleBooking));
    }

    #[test]
    fn test_tier2_records_skill_mismatch() {
        // only an Art teacher, subjects drawn only from Mathematics
        let catalog = small_catalog(&["A"], 28);
        let mut pool = TeacherPool::new(vec![Teacher::new("T1", "One", "Art", 28)]);
        let builder = TimetableBuilder::new(&catalog)
            .with_allocator(SlotAllocator::with_subjects(vec!["Mathematics".into()]));
        let mut rng = SmallRng::seed_from_u64(15);
        let result = builder.build(&mut pool, &mut rng).unwrap();

        assert_eq!(result.summary.least_loaded, 4);
        assert_eq!(result.violations.len(), 4);
        assert_eq!(
            result.classes[0].timetable.get(Slot::new(0, 0)).unwrap().to_string(),
            "Mathematics (T1)"
        );
    }

    #[test]
    fn test_load_cap_violation_reported() {
        let catalog = small_catalog(&["A"], 1);
        let mut pool = TeacherPool::new(vec![Teacher::new("T1", "One", "Art", 1)]);
        let mut rng = SmallRng::seed_from_u64(16);
        let result = TimetableBuilder::new(&catalog).build(&mut pool, &mut rng).unwrap();
        assert_eq!(pool.load(0), 4);
        assert!(result
            .violations
            .iter()
            .any(|v| v.violation_type == crate::models::ViolationType::LoadCapExceeded));
    }

    #[test]
    fn test_refuses_bad_inputs() {
        let catalog = small_catalog(&["A"], 28);
        let mut rng = SmallRng::seed_from_u64(17);

        let mut empty = TeacherPool::default();
        assert!(matches!(
            TimetableBuilder::new(&catalog).build(&mut empty, &mut rng),
            Err(BuildError::EmptyPool)
        ));

        let mut dupes = TeacherPool::new(vec![
            Teacher::new("T1", "One", "Art", 28),
            Teacher::new("T1", "Two", "CRE", 28),
        ]);
        assert!(matches!(
            TimetableBuilder::new(&catalog).build(&mut dupes, &mut rng),
            Err(BuildError::Invalid(_))
        ));
        assert_eq!(dupes.total_load(), 0);

        let mut pool = one_per_subject(&catalog);
        let builder =
            TimetableBuilder::new(&catalog).with_allocator(SlotAllocator::with_subjects(vec![]));
        assert!(matches!(
            builder.build(&mut pool, &mut rng),
            Err(BuildError::NoSubjects)
        ));
    }

    #[test]
    fn test_seeded_builds_match() {
        let catalog = Catalog::default();
        let run = || {
            let mut rng = SmallRng::seed_from_u64(99);
            let mut pool = crate::generation::generate_teacher_pool(&catalog, &mut rng);
            TimetableBuilder::new(&catalog)
                .build(&mut pool, &mut rng)
                .unwrap()
                .classes
                .iter()
                .map(|c| c.timetable.to_strings())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_bookings_match_assignments() {
        let catalog = Catalog::default();
        let mut rng = SmallRng::seed_from_u64(18);
        let mut pool = crate::generation::generate_teacher_pool(&catalog, &mut rng);
        let result = TimetableBuilder::new(&catalog).build(&mut pool, &mut rng).unwrap();
        let counts = result.lessons_by_teacher();
        for t in pool.teachers() {
            assert_eq!(counts.get(&t.id).copied().unwrap_or(0), t.load());
        }
    }

    #[test]
    fn test_lesson_slots() {
        let catalog = small_catalog(&["A"], 28);
        assert_eq!(
            lesson_slots(&catalog),
            vec![Slot::new(0, 0), Slot::new(0, 2), Slot::new(1, 0), Slot::new(1, 2)]
        );
    }
}
