//! Demo CLI: generates a school from a seed and prints one view of it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use u_timetable::error::{BuildError, CatalogError};
use u_timetable::generation::{generate_school, School};
use u_timetable::grading::{rank_all, RankedStudent};
use u_timetable::logging;
use u_timetable::models::{BuildSummary, Catalog, ClassTimetable, Teacher, TeacherWeek};
use u_timetable::scheduler::TimetableKpi;

mod exitcodes {
    pub const OK: u8 = 0;
    pub const NOT_FOUND: u8 = 1;
    pub const CONFIG: u8 = 2;
    pub const OUTPUT: u8 = 3;
}

#[derive(Debug, Parser)]
#[command(
    name = "u-timetable",
    version,
    about = "Generate a school timetable and exam rankings from a seed"
)]
struct Cli {
    /// Catalog JSON overriding the built-in periods, subjects and tables.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// RNG seed; a random one is drawn and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Students generated per class section.
    #[arg(long, default_value_t = 30)]
    students_per_stream: usize,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Weekly grid of one class section.
    Timetable {
        /// Class name, e.g. "Form 1 Rangers".
        #[arg(long)]
        class: String,
    },
    /// Weekly view of one teacher.
    Teacher {
        /// Teacher id, e.g. "JOH07QK".
        id: String,
    },
    /// Per-form rankings from the latest exam.
    Rankings {
        /// Only this form.
        #[arg(long)]
        form: Option<u8>,
    },
    /// Build report and KPIs.
    Summary,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("no class named {0:?}")]
    UnknownClass(String),

    #[error("no teacher with id {0:?}")]
    UnknownTeacher(String),

    #[error("form {0} is not in the catalog")]
    UnknownForm(u8),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Catalog(_) | AppError::Build(_) => exitcodes::CONFIG,
            AppError::UnknownClass(_) | AppError::UnknownTeacher(_) | AppError::UnknownForm(_) => {
                exitcodes::NOT_FOUND
            }
            AppError::Json(_) => exitcodes::OUTPUT,
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            error!("{e}");
            eprintln!("u-timetable: error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::default(),
    };
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, "generating school");

    let mut rng = StdRng::seed_from_u64(seed);
    let school = generate_school(&catalog, cli.students_per_stream, &mut rng)?;

    match &cli.command {
        Command::Timetable { class } => {
            let grid = school
                .timetable
                .timetable_named(class)
                .ok_or_else(|| AppError::UnknownClass(class.clone()))?;
            if cli.json {
                print_json(grid)
            } else {
                print_class(&catalog, grid);
                Ok(())
            }
        }
        Command::Teacher { id } => {
            let teacher = school
                .teachers
                .find(id)
                .ok_or_else(|| AppError::UnknownTeacher(id.clone()))?;
            let week = school.timetable.teacher_week(id, &catalog);
            if cli.json {
                print_json(&week)
            } else {
                print_teacher(&catalog, teacher, &week);
                Ok(())
            }
        }
        Command::Rankings { form } => {
            let forms = match form {
                Some(f) if !catalog.forms.contains(f) => return Err(AppError::UnknownForm(*f)),
                Some(f) => vec![*f],
                None => catalog.forms.clone(),
            };
            let rankings = rank_all(&school.students, &forms, &catalog.aggregate_grades);
            if cli.json {
                print_json(&rankings)
            } else {
                for (form, rows) in &rankings {
                    print_ranking(*form, rows);
                }
                Ok(())
            }
        }
        Command::Summary => {
            let report = Report::new(seed, &school, &catalog);
            if cli.json {
                print_json(&report)
            } else {
                print_report(&report);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    seed: u64,
    classes: usize,
    teachers: usize,
    students: usize,
    build: &'a BuildSummary,
    violations: usize,
    kpi: TimetableKpi,
}

impl<'a> Report<'a> {
    fn new(seed: u64, school: &'a School, catalog: &Catalog) -> Self {
        Self {
            seed,
            classes: school.timetable.classes.len(),
            teachers: school.teachers.len(),
            students: school.students.len(),
            build: &school.timetable.summary,
            violations: school.timetable.violations.len(),
            kpi: TimetableKpi::calculate(&school.timetable, &school.teachers, catalog),
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_class(catalog: &Catalog, grid: &ClassTimetable) {
    println!("{}", grid.class);
    let rows = grid.timetable.to_strings();
    for (day, cells) in catalog.days.iter().zip(&rows) {
        println!("\n{day}");
        for (period, cell) in catalog.periods.iter().zip(cells) {
            println!("  {:<13} {}", period.time, cell);
        }
    }
}

fn print_teacher(catalog: &Catalog, teacher: &Teacher, week: &TeacherWeek) {
    println!("{} ({}) - {}", teacher.name, teacher.id, teacher.subject);
    if let Some(class) = &teacher.class_assigned {
        println!("Class teacher: {class}");
    }
    println!("Lessons: {} / {}", week.lesson_count(), teacher.max_lessons);
    for (day, cells) in catalog.days.iter().zip(&week.cells) {
        println!("\n{day}");
        for (period, cell) in catalog.periods.iter().zip(cells) {
            if let Some(cell) = cell {
                println!("  {:<13} {}", period.time, cell);
            }
        }
    }
}

fn print_ranking(form: u8, rows: &[RankedStudent]) {
    println!("\nForm {form}");
    println!(
        "{:>4}  {:>6}  {:<22} {:<13} {:>7}  {}",
        "Rank", "Adm", "Name", "Stream", "Score", "Grade"
    );
    for r in rows {
        println!(
            "{:>4}  {:>6}  {:<22} {:<13} {:>7.2}  {}",
            r.rank, r.admission_no, r.name, r.stream, r.score, r.grade
        );
    }
}

fn print_report(report: &Report<'_>) {
    let kpi = &report.kpi;
    println!("Seed:            {}", report.seed);
    println!("Classes:         {}", report.classes);
    println!("Teachers:        {}", report.teachers);
    println!("Students:        {}", report.students);
    println!("Lessons:         {} / {}", kpi.lessons, kpi.expected_lessons);
    println!(
        "Tiers:           {} qualified, {} least-loaded, {} conflict",
        report.build.qualified, report.build.least_loaded, report.build.conflicts
    );
    println!("Violations:      {}", report.violations);
    println!("Double bookings: {}", kpi.double_bookings);
    println!(
        "Load:            min {} / avg {:.1} / max {} (sd {:.2})",
        kpi.min_load, kpi.avg_load, kpi.max_load, kpi.load_std_dev
    );
    println!("Over cap:        {}", kpi.teachers_over_cap);
    println!("Idle teachers:   {}", kpi.idle_teachers);
    println!("Core share:      {:.1}%", kpi.core_share * 100.0);
}
