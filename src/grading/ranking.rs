//! Per-form student rankings.
//!
//! # Score
//!
//! | Forms | Score | Letter from |
//! |-------|-------|-------------|
//! | 1–2 | mean mark of the latest exam | aggregate table on the mean |
//! | 3–4 | sum of subject points of the latest exam | aggregate table on the sum |
//!
//! A student with no exam data scores 0 with letter `N/A`.
//!
//! Rankings sort by score descending with a stable sort, so equal scores
//! keep the order students were supplied in. Ranks are positional (1..=N).

use serde::Serialize;

use super::BoundaryTable;
use crate::models::{Assessment, Student};

/// Letter given to students without exam data.
pub const NOT_AVAILABLE: &str = "N/A";

/// How a score was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBasis {
    /// Mean subject mark (forms 1–2).
    MeanMark,
    /// Sum of subject points (forms 3–4).
    PointSum,
    /// No exam data.
    NoData,
}

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStudent {
    /// 1-based position.
    pub rank: usize,
    pub admission_no: u32,
    pub name: String,
    pub stream: String,
    /// Mean mark or point sum.
    pub score: f64,
    /// Letter from the aggregate table, or `N/A`.
    pub grade: String,
    /// Sum of subject points in the exam used.
    pub total_points: u32,
    pub basis: ScoreBasis,
    /// Sitting the score was taken from.
    pub term: Option<u8>,
    pub assessment: Option<Assessment>,
}

/// Scores and ranks students against an aggregate table.
#[derive(Debug, Clone)]
pub struct RankingEngine<'a> {
    aggregate: &'a BoundaryTable,
}

impl<'a> RankingEngine<'a> {
    /// Creates an engine using an aggregate (mean / point-sum) table.
    pub fn new(aggregate: &'a BoundaryTable) -> Self {
        Self { aggregate }
    }

    /// Computes a student's unranked row (`rank` is 0).
    pub fn score(&self, student: &Student) -> RankedStudent {
        let mut row = RankedStudent {
            rank: 0,
            admission_no: student.admission_no,
            name: student.name.clone(),
            stream: student.stream.clone(),
            score: 0.0,
            grade: NOT_AVAILABLE.to_string(),
            total_points: 0,
            basis: ScoreBasis::NoData,
            term: None,
            assessment: None,
        };

        let Some(exam) = student.latest_exam() else {
            return row;
        };
        let results = exam.results;
        let total_points: u32 = results.values().map(|r| u32::from(r.points())).sum();
        let (score, basis) = if student.form <= 2 {
            let marks: i64 = results.values().map(|r| i64::from(r.mark())).sum();
            (marks as f64 / results.len().max(1) as f64, ScoreBasis::MeanMark)
        } else {
            (f64::from(total_points), ScoreBasis::PointSum)
        };

        row.score = score;
        row.grade = self.aggregate.letter_for(score).to_string();
        row.total_points = total_points;
        row.basis = basis;
        row.term = Some(exam.term);
        row.assessment = Some(exam.assessment);
        row
    }

    /// Ranks the students of one form.
    pub fn rank_form(&self, students: &[Student], form: u8) -> Vec<RankedStudent> {
        let mut rows: Vec<RankedStudent> = students
            .iter()
            .filter(|s| s.form == form)
            .map(|s| self.score(s))
            .collect();
        rows.sort_by(|a, b| b.score.total_cmp(&a.score));
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = i + 1;
        }
        rows
    }
}

/// Ranks the students of one form.
///
/// # Example
///
/// ```
/// use u_timetable::grading::{rank_form, BoundaryTable};
/// use u_timetable::models::{Assessment, Student};
///
/// let marks = BoundaryTable::subject_default();
/// let mut a = Student::new("Jane Smith", 9990, 1, "Rangers");
/// let mut b = Student::new("John Brown", 9991, 1, "Rangers");
/// a.record_mark(1, Assessment::Cat1, "Mathematics", 55, &marks);
/// b.record_mark(1, Assessment::Cat1, "Mathematics", 81, &marks);
///
/// let ranking = rank_form(&[a, b], 1, &BoundaryTable::aggregate_default());
/// assert_eq!(ranking[0].name, "John Brown");
/// assert_eq!(ranking[0].rank, 1);
/// assert_eq!(ranking[0].grade, "A");
/// ```
pub fn rank_form(students: &[Student], form: u8, aggregate: &BoundaryTable) -> Vec<RankedStudent> {
    RankingEngine::new(aggregate).rank_form(students, form)
}

/// Ranks every form present in `forms`, in that order.
pub fn rank_all(
    students: &[Student],
    forms: &[u8],
    aggregate: &BoundaryTable,
) -> Vec<(u8, Vec<RankedStudent>)> {
    let engine = RankingEngine::new(aggregate);
    forms
        .iter()
        .map(|&form| (form, engine.rank_form(students, form)))
        .collect()
}
