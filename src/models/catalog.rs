//! Static reference data for timetable generation.
//!
//! The catalog holds everything a build treats as fixed: the period grid,
//! weekdays, subjects (with the core subset), grade tables, the teacher
//! load cap, and the class-section enumeration.
//!
//! `Catalog::default()` reproduces the stock school configuration. A JSON
//! document may override any field; missing fields fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ClassSection, Period, PeriodKind, Slot};
use crate::error::CatalogError;
use crate::grading::BoundaryTable;
use crate::validation::validate_catalog;

/// Fixed configuration for one school.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Daily period grid, in order.
    pub periods: Vec<Period>,
    /// Weekday names, in order.
    pub days: Vec<String>,
    /// All subjects taught.
    pub subjects: Vec<String>,
    /// Subjects weighted up in random subject selection.
    pub core_subjects: Vec<String>,
    /// Copies of each core subject in the weighted draw (others get one).
    pub core_weight: usize,
    /// Maximum lessons per teacher per week.
    pub max_lessons_per_week: usize,
    /// Forms, in generation order.
    pub forms: Vec<u8>,
    /// Stream names, in generation order.
    pub streams: Vec<String>,
    /// Size of a generated teacher pool.
    pub total_teachers: usize,
    /// Mark → letter/points table.
    pub subject_grades: BoundaryTable,
    /// Mean or point-sum → letter table.
    pub aggregate_grades: BoundaryTable,
}

impl Default for Catalog {
    fn default() -> Self {
        use PeriodKind::*;

        let periods = vec![
            Period::lesson("07:20-08:00"),
            Period::fixed("08:00-08:20", Break, "Short Break"),
            Period::lesson("08:20-09:00"),
            Period::lesson("09:00-09:40"),
            Period::lesson("09:40-10:20"),
            Period::lesson("10:20-10:50"),
            Period::fixed("10:50-11:10", Break, "Tea Break"),
            Period::lesson("11:10-11:50"),
            Period::lesson("11:50-12:30"),
            Period::lesson("12:30-13:00"),
            Period::fixed("13:00-13:30", Meal, "Lunch Break"),
            Period::lesson("13:30-14:10"),
            Period::lesson("14:10-14:50"),
            Period::lesson("14:50-15:30"),
            Period::lesson("15:30-16:00"),
            Period::fixed("16:00-17:00", Games, "Games"),
            Period::fixed("17:00-18:00", Remedial, "Remedial (Tuition)"),
            Period::fixed("18:00-19:00", Meal, "Supper"),
            Period::fixed("19:00-21:35", Prep, "Prep (Self Reading)"),
        ];

        Self {
            periods,
            days: to_strings(&["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]),
            subjects: to_strings(&[
                "Mathematics",
                "English",
                "Kiswahili",
                "Biology",
                "Chemistry",
                "Physics",
                "History",
                "Geography",
                "Business Studies",
                "Computer Science",
                "CRE",
                "Agriculture",
                "Art",
            ]),
            core_subjects: to_strings(&[
                "Mathematics",
                "English",
                "Kiswahili",
                "Biology",
                "Chemistry",
                "Physics",
            ]),
            core_weight: 3,
            max_lessons_per_week: 28,
            forms: vec![1, 2, 3, 4],
            streams: to_strings(&["Rangers", "Trailblazers", "Horizon", "Elites"]),
            total_teachers: 44,
            subject_grades: BoundaryTable::subject_default(),
            aggregate_grades: BoundaryTable::aggregate_default(),
        }
    }
}

impl Catalog {
    /// Parses and validates a JSON catalog.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        validate_catalog(&catalog).map_err(CatalogError::Invalid)?;
        Ok(catalog)
    }

    /// Reads, parses, and validates a JSON catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Class sections in generation order (forms outer, streams inner).
    pub fn class_sections(&self) -> Vec<ClassSection> {
        self.forms
            .iter()
            .flat_map(|&form| {
                self.streams
                    .iter()
                    .map(move |stream| ClassSection::new(form, stream.clone()))
            })
            .collect()
    }

    /// Subject multiset for the weighted draw: each core subject repeated
    /// `core_weight` times, then every other subject once.
    pub fn weighted_subjects(&self) -> Vec<String> {
        let capacity = self.subjects.len() + self.core_subjects.len() * self.core_weight;
        let mut weighted = Vec::with_capacity(capacity);
        for _ in 0..self.core_weight {
            weighted.extend(self.core_subjects.iter().cloned());
        }
        weighted.extend(
            self.subjects
                .iter()
                .filter(|s| !self.core_subjects.contains(s))
                .cloned(),
        );
        weighted
    }

    /// Whether a subject is in the core subset.
    pub fn is_core(&self, subject: &str) -> bool {
        self.core_subjects.iter().any(|s| s == subject)
    }

    /// Every slot of the week in day-major order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.days.len())
            .flat_map(move |d| (0..self.periods.len()).map(move |p| Slot::new(d, p)))
    }

    /// Number of lesson periods per day.
    pub fn lessons_per_day(&self) -> usize {
        self.periods.iter().filter(|p| p.is_lesson()).count()
    }

    /// Lesson cells per class per week.
    pub fn lessons_per_week(&self) -> usize {
        self.lessons_per_day() * self.days.len()
    }

    /// Human-readable `"<day> <time>"` for a slot.
    pub fn describe_slot(&self, slot: Slot) -> String {
        match (self.days.get(slot.day), self.periods.get(slot.period)) {
            (Some(day), Some(period)) => format!("{day} {}", period.time),
            _ => slot.to_string(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
