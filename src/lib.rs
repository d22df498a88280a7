//! School timetable generation and exam ranking.
//!
//! Builds a weekly timetable for every class section from a period grid and
//! a pool of single-subject teachers, then ranks students per form from
//! their latest exam.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Catalog`, `Period`, `Slot`, `ClassSection`,
//!   `Timetable`, `Teacher`, `TeacherPool`, `SchoolTimetable`, `Student`
//! - **`scheduler`**: Greedy slot allocation with a three-tier teacher
//!   fallback, the class-by-class builder, and timetable KPIs
//! - **`grading`**: Boundary tables (mark → letter/points) and per-form
//!   rankings
//! - **`generation`**: Seeded synthetic teachers, students and exam results
//! - **`validation`**: Input integrity checks (duplicate ids, unknown
//!   subjects, uncovered mark ranges)
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use u_timetable::generation::generate_school;
//! use u_timetable::grading::rank_form;
//! use u_timetable::models::Catalog;
//!
//! let catalog = Catalog::default();
//! let mut rng = StdRng::seed_from_u64(7);
//! let school = generate_school(&catalog, 10, &mut rng).unwrap();
//!
//! let grid = school.timetable.timetable_named("Form 2 Horizon").unwrap();
//! assert!(grid.timetable.is_complete());
//!
//! let ranking = rank_form(&school.students, 4, &catalog.aggregate_grades);
//! assert_eq!(ranking.len(), 40);
//! assert_eq!(ranking[0].rank, 1);
//! ```
//!
//! # Determinism
//!
//! All randomness flows through a caller-supplied `rand::Rng`; a seeded
//! generator reproduces the same school and timetable.

pub mod error;
pub mod generation;
pub mod grading;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod validation;
