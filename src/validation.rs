//! Input validation for timetable builds.
//!
//! Checks structural integrity of the catalog and teacher pool before a
//! build. Detects:
//! - Duplicate subjects, days, streams, forms, and teacher IDs
//! - Core subjects and teacher qualifications outside the subject list
//! - An empty grid (no days, no lesson periods, no classes)
//! - Overlapping grade bands and gaps in the 0..=100 subject table
//!
//! All issues are collected; validation does not stop at the first one.

use crate::grading::BoundaryTable;
use crate::models::{Catalog, TeacherPool};
use std::collections::HashSet;
use std::hash::Hash;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entries share the same name or ID.
    DuplicateId,
    /// A core subject is not in the subject list.
    UnknownCoreSubject,
    /// A teacher is qualified in a subject the catalog does not teach.
    UnknownSubject,
    /// The weekly grid has no schedulable cell.
    EmptyGrid,
    /// No class sections to build for.
    NoClasses,
    /// Load cap of zero.
    ZeroLoadCap,
    /// Two bands of a boundary table overlap.
    OverlappingBands,
    /// Some mark in 0..=100 is not covered by the subject table.
    UncoveredMark,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a catalog.
///
/// Checks:
/// 1. No duplicate subjects, days, streams, or forms
/// 2. Every core subject is in the subject list
/// 3. At least one day, one lesson period, and one class section
/// 4. Load cap above zero
/// 5. No overlapping bands in either grade table
/// 6. Subject table covers every mark 0..=100
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique(&catalog.subjects, "subject", &mut errors);
    check_unique(&catalog.days, "day", &mut errors);
    check_unique(&catalog.streams, "stream", &mut errors);
    check_unique(&catalog.forms, "form", &mut errors);

    for core in &catalog.core_subjects {
        if !catalog.subjects.contains(core) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCoreSubject,
                format!("Core subject '{core}' is not in the subject list"),
            ));
        }
    }

    if catalog.days.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "Catalog has no days",
        ));
    }
    if catalog.lessons_per_day() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "Period grid has no lesson periods",
        ));
    }
    if catalog.forms.is_empty() || catalog.streams.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoClasses,
            "Catalog defines no class sections",
        ));
    }
    if catalog.max_lessons_per_week == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroLoadCap,
            "Maximum lessons per week is zero",
        ));
    }

    check_bands(&catalog.subject_grades, "subject", &mut errors);
    check_bands(&catalog.aggregate_grades, "aggregate", &mut errors);
    check_coverage(&catalog.subject_grades, &mut errors);

    finish(errors)
}

/// Validates a teacher pool against a catalog.
///
/// Checks:
/// 1. No duplicate teacher IDs
/// 2. Every teacher's subject is taught by the catalog
pub fn validate_pool(catalog: &Catalog, pool: &TeacherPool) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for t in pool.teachers() {
        if !ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate teacher ID: {}", t.id),
            ));
        }
        if !catalog.subjects.contains(&t.subject) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSubject,
                format!("Teacher '{}' is qualified in unknown subject '{}'", t.id, t.subject),
            ));
        }
    }

    finish(errors)
}

/// Runs catalog and pool validation together, collecting every issue.
pub fn validate_input(catalog: &Catalog, pool: &TeacherPool) -> ValidationResult {
    let mut errors = validate_catalog(catalog).err().unwrap_or_default();
    errors.extend(validate_pool(catalog, pool).err().unwrap_or_default());
    finish(errors)
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique<T: Hash + Eq + std::fmt::Display>(
    items: &[T],
    what: &str,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what}: {item}"),
            ));
        }
    }
}

/// Bands are sorted by floor descending, so an overlap shows up between
/// neighbours as a lower band reaching into the one above it.
fn check_bands(table: &BoundaryTable, what: &str, errors: &mut Vec<ValidationError>) {
    for pair in table.bands().windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        if lower.high >= upper.low {
            errors.push(ValidationError::new(
                ValidationErrorKind::OverlappingBands,
                format!(
                    "{what} table: band '{}' ({}-{}) overlaps '{}' ({}-{})",
                    lower.letter, lower.low, lower.high, upper.letter, upper.low, upper.high
                ),
            ));
        }
    }
}

fn check_coverage(table: &BoundaryTable, errors: &mut Vec<ValidationError>) {
    let uncovered: Vec<i32> = (0..=100)
        .filter(|&m| !table.bands().iter().any(|b| b.contains(m)))
        .collect();
    if let (Some(first), Some(last)) = (uncovered.first(), uncovered.last()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::UncoveredMark,
            format!(
                "subject table leaves {} mark(s) uncovered between {first} and {last}",
                uncovered.len()
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::GradeBand;
    use crate::models::{Period, Teacher};

    fn sample_pool() -> TeacherPool {
        TeacherPool::new(vec![
            Teacher::new("T1", "Jane Smith", "Mathematics", 28),
            Teacher::new("T2", "John Brown", "English", 28),
        ])
    }

    #[test]
    fn test_default_catalog_is_valid() {
        assert!(validate_catalog(&Catalog::default()).is_ok());
        assert!(validate_input(&Catalog::default(), &sample_pool()).is_ok());
    }

    #[test]
    fn test_duplicate_subject() {
        let mut c = Catalog::default();
        c.subjects.push("Art".into());
        let errors = validate_catalog(&c).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("subject")));
    }

    #[test]
    fn test_unknown_core_subject() {
        let mut c = Catalog::default();
        c.core_subjects.push("Latin".into());
        let errors = validate_catalog(&c).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownCoreSubject));
    }

    #[test]
    fn test_no_lesson_periods() {
        let mut c = Catalog::default();
        c.periods.retain(|p: &Period| !p.is_lesson());
        let errors = validate_catalog(&c).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyGrid));
    }

    #[test]
    fn test_no_classes_and_zero_cap() {
        let mut c = Catalog::default();
        c.streams.clear();
        c.max_lessons_per_week = 0;
        let errors = validate_catalog(&c).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::NoClasses));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::ZeroLoadCap));
    }

    #[test]
    fn test_overlapping_and_gapped_table() {
        let mut c = Catalog::default();
        c.subject_grades = BoundaryTable::new(vec![
            GradeBand::with_points(50, 100, "P", 2),
            GradeBand::with_points(40, 55, "M", 1),
        ])
        .unwrap();
        let errors = validate_catalog(&c).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::OverlappingBands));
        assert!(errors.iter().any(|e| {
            e.kind == ValidationErrorKind::UncoveredMark && e.message.contains("40 mark(s)")
        }));
    }

    #[test]
    fn test_pool_duplicate_and_unknown_subject() {
        let pool = TeacherPool::new(vec![
            Teacher::new("T1", "A", "Mathematics", 28),
            Teacher::new("T1", "B", "Astronomy", 28),
        ]);
        let errors = validate_pool(&Catalog::default(), &pool).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::DuplicateId));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::UnknownSubject));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut c = Catalog::default();
        c.days.clear();
        c.core_subjects.push("Latin".into());
        let pool = TeacherPool::new(vec![Teacher::new("T1", "A", "Latin", 28)]);
        let errors = validate_input(&c, &pool).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
