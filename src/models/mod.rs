//! Timetable domain models.
//!
//! Provides the data types for a school timetabling problem and its
//! solution: the period grid, class sections, teachers, and students.
//!
//! # Domain Mappings
//!
//! | u-timetable | Scheduling term | School |
//! |-------------|-----------------|--------|
//! | Slot | Time bucket | Day × period |
//! | Teacher | Resource | Subject teacher |
//! | ClassSection | Task | Form + stream |
//! | Timetable | Schedule | Weekly class grid |

mod catalog;
mod class_section;
mod period;
mod schedule;
mod student;
mod teacher;

pub use catalog::Catalog;
pub use class_section::{Cell, ClassSection, Timetable};
pub use period::{Period, PeriodKind, Slot};
pub use schedule::{
    AllocationTier, Assignment, BuildSummary, ClassTimetable, DoubleBooking, SchoolTimetable,
    TeacherWeek, Violation, ViolationType,
};
pub use student::{Assessment, ExamResults, LatestExam, ResultBook, Student, SubjectResult};
pub use teacher::{Teacher, TeacherPool};
