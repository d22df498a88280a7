//! Timetable quality metrics (KPIs).
//!
//! Computes load-balance and degradation indicators from a finished
//! build and the pool it booked.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Max / Min Load | Largest and smallest teacher booking count |
//! | Avg Load | Mean bookings per teacher |
//! | Load Spread | Population standard deviation of loads |
//! | Over Cap | Teachers above their load cap |
//! | Idle | Teachers with no lessons |
//! | Qualified Rate | Fraction of lessons from tier 1 |
//! | Core Share | Fraction of lessons in core subjects |

use serde::Serialize;
use std::collections::BTreeMap;

use super::builder::lesson_slots;
use crate::models::{Catalog, SchoolTimetable, TeacherPool};

/// Timetable performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableKpi {
    /// Lessons placed.
    pub lessons: usize,
    /// Lesson cells the catalog grid calls for across all classes.
    pub expected_lessons: usize,
    /// Largest teacher load.
    pub max_load: usize,
    /// Smallest teacher load.
    pub min_load: usize,
    /// Mean teacher load.
    pub avg_load: f64,
    /// Standard deviation of teacher loads.
    pub load_std_dev: f64,
    /// Teachers above their load cap.
    pub teachers_over_cap: usize,
    /// Teachers with no lessons.
    pub idle_teachers: usize,
    /// Fraction of lessons taken by a qualified, under-cap teacher (0.0..1.0).
    pub qualified_rate: f64,
    /// Double-booked (teacher, slot) pairs.
    pub double_bookings: usize,
    /// Fraction of lessons in core subjects (0.0..1.0).
    pub core_share: f64,
    /// Per-teacher load.
    pub load_by_teacher: BTreeMap<String, usize>,
}

impl TimetableKpi {
    /// Computes KPIs from a build and the pool it booked.
    pub fn calculate(timetable: &SchoolTimetable, pool: &TeacherPool, catalog: &Catalog) -> Self {
        let loads: Vec<usize> = pool.teachers().iter().map(|t| t.load()).collect();
        let load_by_teacher = pool
            .teachers()
            .iter()
            .map(|t| (t.id.clone(), t.load()))
            .collect();

        let (avg_load, load_std_dev) = if loads.is_empty() {
            (0.0, 0.0)
        } else {
            let n = loads.len() as f64;
            let mean = loads.iter().sum::<usize>() as f64 / n;
            let var = loads
                .iter()
                .map(|&l| (l as f64 - mean).powi(2))
                .sum::<f64>()
                / n;
            (mean, var.sqrt())
        };

        let lessons = timetable.assignment_count();
        let (qualified_rate, core_share) = if lessons == 0 {
            (1.0, 0.0)
        } else {
            let core = timetable
                .assignments
                .iter()
                .filter(|a| catalog.is_core(&a.subject))
                .count();
            (
                timetable.summary.qualified as f64 / lessons as f64,
                core as f64 / lessons as f64,
            )
        };

        Self {
            lessons,
            expected_lessons: lesson_slots(catalog).len() * timetable.classes.len(),
            max_load: loads.iter().copied().max().unwrap_or(0),
            min_load: loads.iter().copied().min().unwrap_or(0),
            avg_load,
            load_std_dev,
            teachers_over_cap: pool
                .teachers()
                .iter()
                .filter(|t| t.load() > t.max_lessons)
                .count(),
            idle_teachers: loads.iter().filter(|&&l| l == 0).count(),
            qualified_rate,
            double_bookings: timetable.double_bookings().len(),
            core_share,
            load_by_teacher,
        }
    }

    /// Whether every expected lesson was placed.
    pub fn is_complete(&self) -> bool {
        self.lessons == self.expected_lessons
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_double_bookings: usize, min_qualified_rate: f64) -> bool {
        self.double_bookings <= max_double_bookings
            && self.qualified_rate >= min_qualified_rate
            && self.teachers_over_cap == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocationTier, Assignment, ClassSection, Slot, Teacher};

    fn assignment(slot: Slot, subject: &str, teacher: &str, tier: AllocationTier) -> Assignment {
        Assignment {
            class: ClassSection::new(1, "Rangers"),
            slot,
            subject: subject.into(),
            teacher_id: teacher.into(),
            tier,
        }
    }

    fn sample() -> (SchoolTimetable, TeacherPool) {
        let mut pool = TeacherPool::new(vec![
            Teacher::new("T1", "A", "Mathematics", 2),
            Teacher::new("T2", "B", "Art", 2),
            Teacher::new("T3", "C", "CRE", 2),
        ]);
        let mut tt = SchoolTimetable::new();
        for (i, (subject, teacher, tier)) in [
            ("Mathematics", 0, AllocationTier::Qualified),
            ("Mathematics", 0, AllocationTier::Qualified),
            ("Art", 1, AllocationTier::Qualified),
            ("History", 1, AllocationTier::LeastLoaded),
        ]
        .into_iter()
        .enumerate()
        {
            let slot = Slot::new(0, i);
            let id = pool.get(teacher).unwrap().id.clone();
            tt.add_assignment(assignment(slot, subject, &id, tier));
            pool.book(teacher, slot);
        }
        (tt, pool)
    }

    #[test]
    fn test_kpi_loads() {
        let (tt, pool) = sample();
        let kpi = TimetableKpi::calculate(&tt, &pool, &Catalog::default());
        assert_eq!(kpi.lessons, 4);
        assert_eq!(kpi.max_load, 2);
        assert_eq!(kpi.min_load, 0);
        assert_eq!(kpi.idle_teachers, 1);
        assert!((kpi.avg_load - 4.0 / 3.0).abs() < 1e-10);
        // loads 2,2,0: variance = (4/9 + 4/9 + 16/9) / 3 = 8/9
        assert!((kpi.load_std_dev - (8.0f64 / 9.0).sqrt()).abs() < 1e-10);
        assert_eq!(kpi.load_by_teacher["T2"], 2);
    }

    #[test]
    fn test_kpi_rates() {
        let (tt, pool) = sample();
        let kpi = TimetableKpi::calculate(&tt, &pool, &Catalog::default());
        assert!((kpi.qualified_rate - 0.75).abs() < 1e-10);
        assert!((kpi.core_share - 0.5).abs() < 1e-10);
        assert_eq!(kpi.double_bookings, 0);
        assert_eq!(kpi.teachers_over_cap, 0);
        assert!(kpi.meets_thresholds(0, 0.75));
        assert!(!kpi.meets_thresholds(0, 0.8));
    }

    #[test]
    fn test_kpi_over_cap() {
        let (tt, mut pool) = sample();
        pool.book(0, Slot::new(3, 3));
        let kpi = TimetableKpi::calculate(&tt, &pool, &Catalog::default());
        assert_eq!(kpi.teachers_over_cap, 1);
        assert!(!kpi.meets_thresholds(10, 0.0));
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = TimetableKpi::calculate(
            &SchoolTimetable::new(),
            &TeacherPool::default(),
            &Catalog::default(),
        );
        assert_eq!(kpi.lessons, 0);
        assert_eq!(kpi.expected_lessons, 0);
        assert!(kpi.is_complete());
        assert!((kpi.qualified_rate - 1.0).abs() < 1e-10);
        assert!((kpi.avg_load - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_on_full_build() {
        use crate::scheduler::TimetableBuilder;
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let catalog = Catalog::default();
        let mut rng = SmallRng::seed_from_u64(21);
        let mut pool = crate::generation::generate_teacher_pool(&catalog, &mut rng);
        let tt = TimetableBuilder::new(&catalog).build(&mut pool, &mut rng).unwrap();
        let kpi = TimetableKpi::calculate(&tt, &pool, &catalog);
        assert!(kpi.is_complete());
        assert_eq!(kpi.lessons, 960);
        assert_eq!(kpi.double_bookings, 0);
        // 18 of 25 weighted entries are core
        assert!(kpi.core_share > 0.5);
    }
}
