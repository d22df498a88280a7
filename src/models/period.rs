//! Period grid model.
//!
//! A school day is an ordered sequence of periods. Only `Lesson` periods
//! are schedulable; every other kind carries a fixed label that is written
//! straight into the timetable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a period in the daily grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    /// Teaching slot, filled by the allocator.
    Lesson,
    /// Short or tea break.
    Break,
    /// Lunch, supper.
    Meal,
    /// Afternoon games.
    Games,
    /// Remedial tuition.
    Remedial,
    /// Evening self-reading.
    Prep,
}

impl PeriodKind {
    /// Label used when a period has no explicit display name.
    pub fn default_label(self) -> &'static str {
        match self {
            PeriodKind::Lesson => "Lesson",
            PeriodKind::Break => "Break",
            PeriodKind::Meal => "Meal",
            PeriodKind::Games => "Games",
            PeriodKind::Remedial => "Remedial",
            PeriodKind::Prep => "Prep",
        }
    }
}

/// One entry in the daily period grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Time-range label, e.g. `"07:20-08:00"`.
    pub time: String,
    /// Period classification.
    pub kind: PeriodKind,
    /// Display name for non-lesson periods (e.g. `"Tea Break"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Period {
    /// Creates a lesson period.
    pub fn lesson(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            kind: PeriodKind::Lesson,
            name: None,
        }
    }

    /// Creates a non-lesson period with a display name.
    pub fn fixed(time: impl Into<String>, kind: PeriodKind, name: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            kind,
            name: Some(name.into()),
        }
    }

    /// Whether the allocator fills this period.
    #[inline]
    pub fn is_lesson(&self) -> bool {
        self.kind == PeriodKind::Lesson
    }

    /// Label written into timetable cells for non-lesson periods.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.kind.default_label())
    }
}

/// A (day, period) cell coordinate in the weekly grid.
///
/// Indices refer to the catalog's day list and period grid. Ordering is
/// day-major, matching the builder's iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    /// Index into the weekday list.
    pub day: usize,
    /// Index into the period grid.
    pub period: usize,
}

impl Slot {
    /// Creates a slot.
    #[inline]
    pub fn new(day: usize, period: usize) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}p{}", self.day, self.period)
    }
}
