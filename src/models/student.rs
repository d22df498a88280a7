//! Student and exam-result model.
//!
//! Results are nested term → assessment → subject. A subject result is a
//! (mark, letter, points) triple whose letter and points are always derived
//! from the mark through a [`BoundaryTable`]; there is no way to build one
//! with an independent letter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::grading::BoundaryTable;

/// Assessment within a term.
///
/// Ordering follows the school calendar: `Cat1` is sat before `Cat2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Assessment {
    #[serde(rename = "CAT 1")]
    Cat1,
    #[serde(rename = "CAT 2")]
    Cat2,
}

impl Assessment {
    /// All assessments in calendar order.
    pub const ALL: [Assessment; 2] = [Assessment::Cat1, Assessment::Cat2];
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assessment::Cat1 => f.write_str("CAT 1"),
            Assessment::Cat2 => f.write_str("CAT 2"),
        }
    }
}

/// Graded mark for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectResult {
    mark: i32,
    letter: String,
    points: u8,
}

impl SubjectResult {
    /// Grades a mark against the subject table.
    pub fn from_mark(mark: i32, table: &BoundaryTable) -> Self {
        let grade = table.grade(mark);
        Self {
            mark,
            letter: grade.letter,
            points: grade.points,
        }
    }

    pub fn mark(&self) -> i32 {
        self.mark
    }

    pub fn letter(&self) -> &str {
        &self.letter
    }

    pub fn points(&self) -> u8 {
        self.points
    }
}

/// Subject → result for one sitting.
pub type ExamResults = BTreeMap<String, SubjectResult>;

/// Term number → assessment → results.
pub type ResultBook = BTreeMap<u8, BTreeMap<Assessment, ExamResults>>;

/// A student and their exam history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub admission_no: u32,
    pub form: u8,
    pub stream: String,
    #[serde(default)]
    pub results: ResultBook,
}

/// The sitting chosen as a student's most recent exam.
#[derive(Debug, Clone, Copy)]
pub struct LatestExam<'a> {
    pub term: u8,
    pub assessment: Assessment,
    pub results: &'a ExamResults,
}

impl Student {
    /// Creates a student with no results.
    pub fn new(
        name: impl Into<String>,
        admission_no: u32,
        form: u8,
        stream: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            admission_no,
            form,
            stream: stream.into(),
            results: ResultBook::new(),
        }
    }

    /// Records (or overwrites) a subject mark, recomputing letter and points.
    ///
    /// The mark is not range-checked; sanitising input is the caller's job.
    pub fn record_mark(
        &mut self,
        term: u8,
        assessment: Assessment,
        subject: impl Into<String>,
        mark: i32,
        table: &BoundaryTable,
    ) {
        self.results
            .entry(term)
            .or_default()
            .entry(assessment)
            .or_default()
            .insert(subject.into(), SubjectResult::from_mark(mark, table));
    }

    /// Ensures a (term, assessment) sitting exists, even if empty.
    pub fn open_sitting(&mut self, term: u8, assessment: Assessment) {
        self.results.entry(term).or_default().entry(assessment).or_default();
    }

    /// Results for one sitting.
    pub fn exam(&self, term: u8, assessment: Assessment) -> Option<&ExamResults> {
        self.results.get(&term).and_then(|t| t.get(&assessment))
    }

    /// Resolves the most recent non-empty sitting.
    ///
    /// Within the latest term, `CAT 2` is preferred over `CAT 1`. If both are
    /// empty, terms are scanned newest first and, within each term,
    /// assessments newest first.
    ///
    /// Note the older-term scan also takes `CAT 2` before `CAT 1`. A scan in
    /// sitting order would return `CAT 1` there instead.
    pub fn latest_exam(&self) -> Option<LatestExam<'_>> {
        let (&latest, sittings) = self.results.iter().next_back()?;
        for assessment in [Assessment::Cat2, Assessment::Cat1] {
            if let Some(results) = sittings.get(&assessment).filter(|r| !r.is_empty()) {
                return Some(LatestExam {
                    term: latest,
                    assessment,
                    results,
                });
            }
        }

        self.results.iter().rev().find_map(|(&term, sittings)| {
            sittings
                .iter()
                .rev()
                .find(|(_, r)| !r.is_empty())
                .map(|(&assessment, results)| LatestExam {
                    term,
                    assessment,
                    results,
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BoundaryTable {
        BoundaryTable::subject_default()
    }

    #[test]
    fn test_record_mark_derives_grade() {
        let mut s = Student::new("Jane Smith", 9990, 1, "Rangers");
        s.record_mark(1, Assessment::Cat1, "Mathematics", 79, &table());
        let r = &s.exam(1, Assessment::Cat1).unwrap()["Mathematics"];
        assert_eq!(r.mark(), 79);
        assert_eq!(r.letter(), "A-");
        assert_eq!(r.points(), 11);

        // overwrite recomputes
        s.record_mark(1, Assessment::Cat1, "Mathematics", 85, &table());
        let r = &s.exam(1, Assessment::Cat1).unwrap()["Mathematics"];
        assert_eq!((r.letter(), r.points()), ("A", 12));
    }

    #[test]
    fn test_latest_prefers_cat2_in_latest_term() {
        let mut s = Student::new("A", 1, 2, "Elites");
        s.record_mark(1, Assessment::Cat2, "English", 50, &table());
        s.record_mark(2, Assessment::Cat1, "English", 60, &table());
        s.record_mark(2, Assessment::Cat2, "English", 70, &table());
        let latest = s.latest_exam().unwrap();
        assert_eq!((latest.term, latest.assessment), (2, Assessment::Cat2));
    }

    #[test]
    fn test_latest_falls_back_to_cat1() {
        let mut s = Student::new("A", 1, 2, "Elites");
        s.record_mark(3, Assessment::Cat1, "English", 60, &table());
        s.open_sitting(3, Assessment::Cat2);
        let latest = s.latest_exam().unwrap();
        assert_eq!((latest.term, latest.assessment), (3, Assessment::Cat1));
    }

    #[test]
    fn test_latest_scans_back_past_empty_term() {
        let mut s = Student::new("A", 1, 1, "Horizon");
        s.record_mark(1, Assessment::Cat1, "Biology", 64, &table());
        s.open_sitting(2, Assessment::Cat1);
        s.open_sitting(2, Assessment::Cat2);
        let latest = s.latest_exam().unwrap();
        assert_eq!((latest.term, latest.assessment), (1, Assessment::Cat1));
        assert_eq!(latest.results["Biology"].mark(), 64);
    }

    #[test]
    fn test_latest_scan_prefers_cat2_in_older_term() {
        let mut s = Student::new("A", 1, 3, "Rangers");
        s.record_mark(1, Assessment::Cat1, "Physics", 45, &table());
        s.record_mark(1, Assessment::Cat2, "Physics", 55, &table());
        s.open_sitting(2, Assessment::Cat1);
        let latest = s.latest_exam().unwrap();
        assert_eq!((latest.term, latest.assessment), (1, Assessment::Cat2));
        assert_eq!(latest.results["Physics"].mark(), 55);
    }

    #[test]
    fn test_latest_none_without_data() {
        let mut s = Student::new("A", 1, 1, "Horizon");
        assert!(s.latest_exam().is_none());
        s.open_sitting(1, Assessment::Cat1);
        assert!(s.latest_exam().is_none());
    }

    #[test]
    fn test_assessment_serde_names() {
        assert_eq!(serde_json::to_string(&Assessment::Cat2).unwrap(), "\"CAT 2\"");
        assert_eq!(Assessment::Cat1.to_string(), "CAT 1");
    }
}
