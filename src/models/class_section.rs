//! Class sections and their weekly timetables.
//!
//! A class section is one (form, stream) pair. Each section owns a grid of
//! cells indexed by [`Slot`]; every cell is written exactly once per build.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Slot;

/// One (form, stream) class, e.g. "Form 2 Horizon".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassSection {
    /// Form (year group), 1..=4 in the default catalog.
    pub form: u8,
    /// Stream name.
    pub stream: String,
}

impl ClassSection {
    /// Creates a class section.
    pub fn new(form: u8, stream: impl Into<String>) -> Self {
        Self {
            form,
            stream: stream.into(),
        }
    }
}

impl fmt::Display for ClassSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Form {} {}", self.form, self.stream)
    }
}

/// Content of one timetable cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    /// Non-lesson period label (break, meal, games, ...).
    Fixed { label: String },
    /// An allocated lesson.
    Lesson { subject: String, teacher_id: String },
}

impl Cell {
    /// Teacher named by a lesson cell.
    pub fn teacher_id(&self) -> Option<&str> {
        match self {
            Cell::Lesson { teacher_id, .. } => Some(teacher_id),
            Cell::Fixed { .. } => None,
        }
    }

    /// Subject of a lesson cell.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Cell::Lesson { subject, .. } => Some(subject),
            Cell::Fixed { .. } => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Fixed { label } => f.write_str(label),
            Cell::Lesson {
                subject,
                teacher_id,
            } => write!(f, "{subject} ({teacher_id})"),
        }
    }
}

/// Weekly grid of one class: `cells[day][period]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    cells: Vec<Vec<Option<Cell>>>,
}

impl Timetable {
    /// Creates an empty grid.
    pub fn new(days: usize, periods: usize) -> Self {
        Self {
            cells: vec![vec![None; periods]; days],
        }
    }

    /// Writes a cell.
    ///
    /// Returns `false` and leaves the grid untouched if the slot is already
    /// filled or outside the grid.
    pub fn fill(&mut self, slot: Slot, cell: Cell) -> bool {
        match self
            .cells
            .get_mut(slot.day)
            .and_then(|row| row.get_mut(slot.period))
        {
            Some(target) if target.is_none() => {
                *target = Some(cell);
                true
            }
            _ => false,
        }
    }

    /// Reads a cell.
    pub fn get(&self, slot: Slot) -> Option<&Cell> {
        self.cells
            .get(slot.day)
            .and_then(|row| row.get(slot.period))
            .and_then(Option::as_ref)
    }

    /// Number of days.
    pub fn day_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of periods per day.
    pub fn period_count(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Whether every cell has been written.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    /// Iterates `(slot, cell)` over filled cells in day-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(d, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(p, c)| c.as_ref().map(|c| (Slot::new(d, p), c)))
        })
    }

    /// Lesson cells only.
    pub fn lessons(&self) -> impl Iterator<Item = (Slot, &Cell)> + '_ {
        self.iter().filter(|(_, c)| matches!(c, Cell::Lesson { .. }))
    }

    /// Renders the grid as strings, empty string for unfilled cells.
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.as_ref().map(ToString::to_string).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(subject: &str, teacher: &str) -> Cell {
        Cell::Lesson {
            subject: subject.into(),
            teacher_id: teacher.into(),
        }
    }

    #[test]
    fn test_class_display() {
        assert_eq!(ClassSection::new(3, "Elites").to_string(), "Form 3 Elites");
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(lesson("Mathematics", "JOH07QK").to_string(), "Mathematics (JOH07QK)");
        let fixed = Cell::Fixed {
            label: "Lunch Break".into(),
        };
        assert_eq!(fixed.to_string(), "Lunch Break");
        assert_eq!(fixed.teacher_id(), None);
    }

    #[test]
    fn test_fill_once() {
        let mut tt = Timetable::new(2, 3);
        let slot = Slot::new(1, 2);
        assert!(tt.fill(slot, lesson("English", "T1")));
        assert!(!tt.fill(slot, lesson("Physics", "T2")));
        assert_eq!(tt.get(slot).and_then(Cell::subject), Some("English"));
    }

    #[test]
    fn test_fill_out_of_range() {
        let mut tt = Timetable::new(1, 1);
        assert!(!tt.fill(Slot::new(0, 5), lesson("Art", "T1")));
        assert!(!tt.fill(Slot::new(3, 0), lesson("Art", "T1")));
    }

    #[test]
    fn test_completeness_and_iteration() {
        let mut tt = Timetable::new(1, 2);
        assert!(!tt.is_complete());
        tt.fill(Slot::new(0, 0), lesson("CRE", "T1"));
        tt.fill(
            Slot::new(0, 1),
            Cell::Fixed {
                label: "Games".into(),
            },
        );
        assert!(tt.is_complete());
        assert_eq!(tt.iter().count(), 2);
        assert_eq!(tt.lessons().count(), 1);
        assert_eq!(tt.to_strings(), vec![vec!["CRE (T1)".to_string(), "Games".to_string()]]);
    }
}
