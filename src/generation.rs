//! Synthetic school data.
//!
//! Generates the inputs a timetable build and a ranking consume: a teacher
//! pool (one class teacher per section, topped up with subject teachers),
//! students per stream, and exam results for three terms.
//!
//! Every generator takes the `Rng` explicitly, so a seeded run reproduces
//! the same school.

use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use tracing::info;

use crate::error::BuildError;
use crate::models::{Assessment, Catalog, SchoolTimetable, Student, Teacher, TeacherPool};
use crate::scheduler::TimetableBuilder;

const FIRST_NAMES: &[&str] = &[
    "John",
    "Jane",
    "Michael",
    "Sarah",
    "David",
    "Emma",
    "James",
    "Olivia",
    "Robert",
    "Sophia",
    "William",
    "Isabella",
    "Joseph",
    "Ava",
    "Charles",
    "Mia",
    "Thomas",
    "Charlotte",
    "Christopher",
    "Amelia",
    "Daniel",
    "Harper",
    "Matthew",
    "Evelyn",
    "Anthony",
    "Abigail",
    "Mark",
    "Emily",
    "Donald",
    "Elizabeth",
    "Steven",
    "Sofia",
    "Paul",
    "Avery",
    "Andrew",
    "Ella",
    "Joshua",
    "Scarlett",
    "Kenneth",
    "Victoria",
];

const LAST_NAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
    "Hernandez",
    "Lopez",
    "Gonzalez",
    "Wilson",
    "Anderson",
    "Thomas",
    "Taylor",
    "Moore",
    "Jackson",
    "Martin",
    "Lee",
    "Perez",
    "Thompson",
    "White",
    "Harris",
    "Sanchez",
    "Clark",
    "Ramirez",
    "Lewis",
    "Robinson",
];

/// First admission number handed out.
pub const FIRST_ADMISSION_NO: u32 = 9990;

/// Terms per school year.
pub const TERMS: u8 = 3;

/// Electives taken by forms 3–4 on top of the core subjects.
pub const ELECTIVES: usize = 2;

/// Default range for generated marks.
pub const DEFAULT_MARKS: RangeInclusive<i32> = 40..=95;

/// A fully generated school.
#[derive(Debug, Clone)]
pub struct School {
    pub teachers: TeacherPool,
    pub students: Vec<Student>,
    pub timetable: SchoolTimetable,
}

/// Generates teachers, students with results, and a timetable.
pub fn generate_school<R: Rng + ?Sized>(
    catalog: &Catalog,
    students_per_stream: usize,
    rng: &mut R,
) -> Result<School, BuildError> {
    let mut teachers = generate_teacher_pool(catalog, rng);
    let mut students = generate_students(catalog, students_per_stream, rng);
    for s in &mut students {
        generate_exam_results(s, catalog, DEFAULT_MARKS, rng);
    }
    let timetable = TimetableBuilder::new(catalog).build(&mut teachers, rng)?;
    Ok(School {
        teachers,
        students,
        timetable,
    })
}

/// Random "First Last" name.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");
    format!("{first} {last}")
}

/// Generates a teacher id unique within `existing` and records it there.
///
/// Format: first three letters of the first name, uppercased and padded
/// with `X`, then two digits and two uppercase letters (`JOH07QK`).
pub fn generate_teacher_id<R: Rng + ?Sized>(
    name: &str,
    existing: &mut HashSet<String>,
    rng: &mut R,
) -> String {
    let mut prefix: String = name
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase()
        .chars()
        .take(3)
        .collect();
    while prefix.chars().count() < 3 {
        prefix.push('X');
    }

    loop {
        let num: u8 = rng.random_range(0..100);
        let a = char::from(b'A' + rng.random_range(0..26u8));
        let b = char::from(b'A' + rng.random_range(0..26u8));
        let id = format!("{prefix}{num:02}{a}{b}");
        if existing.insert(id.clone()) {
            return id;
        }
    }
}

/// Generates a teacher pool of `catalog.total_teachers`.
///
/// One class teacher per (form, stream) comes first, each with a random
/// subject; subject teachers fill the rest. If `total_teachers` is below
/// the number of sections, every section still gets its class teacher.
pub fn generate_teacher_pool<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> TeacherPool {
    let mut existing = HashSet::new();
    let mut pool = TeacherPool::default();
    let cap = catalog.max_lessons_per_week;

    let mut make = |rng: &mut R| {
        let name = random_name(rng);
        let subject = catalog.subjects.choose(rng).cloned().unwrap_or_default();
        let id = generate_teacher_id(&name, &mut existing, rng);
        Teacher::new(id, name, subject, cap)
    };

    for class in catalog.class_sections() {
        let teacher = make(rng).with_class(class);
        pool.push(teacher);
    }
    while pool.len() < catalog.total_teachers {
        let teacher = make(rng);
        pool.push(teacher);
    }

    info!(teachers = pool.len(), "generated teacher pool");
    pool
}

/// Generates `per_stream` students for every section, highest form first,
/// with consecutive admission numbers from [`FIRST_ADMISSION_NO`].
pub fn generate_students<R: Rng + ?Sized>(
    catalog: &Catalog,
    per_stream: usize,
    rng: &mut R,
) -> Vec<Student> {
    let mut forms = catalog.forms.clone();
    forms.sort_unstable_by(|a, b| b.cmp(a));

    let mut students = Vec::with_capacity(forms.len() * catalog.streams.len() * per_stream);
    let mut adm = FIRST_ADMISSION_NO;
    for form in forms {
        for stream in &catalog.streams {
            for _ in 0..per_stream {
                students.push(Student::new(random_name(rng), adm, form, stream.clone()));
                adm += 1;
            }
        }
    }
    students
}

/// Replaces a student's results with random marks for every term and
/// assessment.
///
/// Forms 1–2 sit every subject. Forms 3–4 sit the core subjects plus
/// [`ELECTIVES`] random non-core subjects, drawn per sitting.
pub fn generate_exam_results<R: Rng + ?Sized>(
    student: &mut Student,
    catalog: &Catalog,
    marks: RangeInclusive<i32>,
    rng: &mut R,
) {
    student.results.clear();
    let electives: Vec<&String> = catalog
        .subjects
        .iter()
        .filter(|s| !catalog.is_core(s))
        .collect();

    for term in 1..=TERMS {
        for assessment in Assessment::ALL {
            let taken: Vec<String> = if student.form >= 3 {
                let mut taken = catalog.core_subjects.clone();
                let picked = electives.choose_multiple(rng, ELECTIVES);
                taken.extend(picked.map(|s| (*s).clone()));
                taken
            } else {
                catalog.subjects.clone()
            };

            student.open_sitting(term, assessment);
            for subject in taken {
                let mark = rng.random_range(marks.clone());
                student.record_mark(term, assessment, subject, mark, &catalog.subject_grades);
            }
        }
    }
}
