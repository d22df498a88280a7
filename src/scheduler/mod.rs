//! Greedy timetable construction and KPI evaluation.
//!
//! # Algorithm
//!
//! `TimetableBuilder` walks every class × day × period once, asking the
//! `SlotAllocator` for a (subject, teacher) pair per lesson cell and booking
//! the teacher immediately. It is not optimal, but it always completes: the
//! allocator's three-tier fallback accepts a conflict rather than fail.
//!
//! # KPI
//!
//! `TimetableKpi` reports teacher load balance, fallback usage, and
//! double-bookings for a finished build.

mod allocator;
mod builder;
mod kpi;

pub use allocator::{choose_teacher, Allocation, SlotAllocator};
pub use builder::{lesson_slots, TimetableBuilder};
pub use kpi::TimetableKpi;
