//! Grade boundary tables and student ranking.
//!
//! Two tables drive grading:
//!
//! | Table | Input | Output | Bands |
//! |-------|-------|--------|-------|
//! | Subject | mark 0..=100 | letter + points 1..=12 | 12 |
//! | Aggregate | mean mark or point sum | letter | 10 |
//!
//! Lookup is floor-based: bands are scanned from the highest floor down and
//! the first band whose floor the value has reached wins. Values below the
//! lowest floor (negative marks included) land in the lowest band.

mod ranking;

pub use ranking::{rank_all, rank_form, RankedStudent, RankingEngine, ScoreBasis};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One inclusive range of a boundary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    /// Inclusive lower bound.
    pub low: i32,
    /// Inclusive upper bound.
    pub high: i32,
    /// Letter grade, e.g. `"A-"`.
    pub letter: String,
    /// Points awarded (subject table only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u8>,
}

impl GradeBand {
    /// Creates a band that awards points.
    pub fn with_points(low: i32, high: i32, letter: impl Into<String>, points: u8) -> Self {
        Self {
            low,
            high,
            letter: letter.into(),
            points: Some(points),
        }
    }

    /// Creates a letter-only band.
    pub fn letter(low: i32, high: i32, letter: impl Into<String>) -> Self {
        Self {
            low,
            high,
            letter: letter.into(),
            points: None,
        }
    }

    /// Whether an integer value falls inside this band.
    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Letter and points for one subject mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub letter: String,
    pub points: u8,
}

/// An ordered, non-empty set of grade bands.
///
/// Bands are kept sorted by `low` descending. Construction rejects an empty
/// list and inverted ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GradeBand>", into = "Vec<GradeBand>")]
pub struct BoundaryTable {
    bands: Vec<GradeBand>,
}

impl BoundaryTable {
    /// Builds a table from bands in any order.
    pub fn new(mut bands: Vec<GradeBand>) -> Result<Self, CatalogError> {
        if bands.is_empty() {
            return Err(CatalogError::InvalidTable("table has no bands".into()));
        }
        if let Some(b) = bands.iter().find(|b| b.low > b.high) {
            return Err(CatalogError::InvalidTable(format!(
                "band '{}' has low {} above high {}",
                b.letter, b.low, b.high
            )));
        }
        bands.sort_by(|a, b| b.low.cmp(&a.low));
        Ok(Self { bands })
    }

    /// The 12-band subject table (mark → letter, points).
    pub fn subject_default() -> Self {
        let bands = [
            (80, 100, "A", 12),
            (75, 79, "A-", 11),
            (70, 74, "B+", 10),
            (65, 69, "B", 9),
            (60, 64, "B-", 8),
            (55, 59, "C+", 7),
            (50, 54, "C", 6),
            (45, 49, "C-", 5),
            (40, 44, "D+", 4),
            (35, 39, "D-", 3),
            (30, 34, "D", 2),
            (0, 29, "E", 1),
        ];
        Self {
            bands: bands
                .iter()
                .map(|&(low, high, letter, pts)| GradeBand::with_points(low, high, letter, pts))
                .collect(),
        }
    }

    /// The 10-band aggregate table (mean mark or point sum → letter).
    pub fn aggregate_default() -> Self {
        let bands = [
            (79, 100, "A"),
            (73, 78, "A-"),
            (66, 72, "B+"),
            (59, 65, "B"),
            (53, 58, "B-"),
            (46, 52, "C+"),
            (40, 45, "C"),
            (35, 39, "D+"),
            (30, 34, "D"),
            (0, 29, "E"),
        ];
        Self {
            bands: bands
                .iter()
                .map(|&(low, high, letter)| GradeBand::letter(low, high, letter))
                .collect(),
        }
    }

    /// Bands, highest floor first.
    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    /// Finds the band for a value.
    ///
    /// Fractional values between two integer bands fall into the lower one
    /// (78.5 reaches the floor of 73–78, not 79–100).
    pub fn lookup(&self, value: f64) -> &GradeBand {
        self.bands
            .iter()
            .find(|b| value >= f64::from(b.low))
            .unwrap_or_else(|| self.lowest())
    }

    /// Letter for an aggregate value.
    pub fn letter_for(&self, value: f64) -> &str {
        &self.lookup(value).letter
    }

    /// Letter and points for a subject mark.
    ///
    /// No range validation: anything at or below the lowest floor maps to the
    /// lowest band, and anything above the highest ceiling (e.g. 101) maps to
    /// the top band rather than falling through to the lowest. Bands without
    /// points award 0.
    pub fn grade(&self, mark: i32) -> Grade {
        let band = self.lookup(f64::from(mark));
        Grade {
            letter: band.letter.clone(),
            points: band.points.unwrap_or(0),
        }
    }

    fn lowest(&self) -> &GradeBand {
        // non-empty by construction
        &self.bands[self.bands.len() - 1]
    }
}

impl TryFrom<Vec<GradeBand>> for BoundaryTable {
    type Error = CatalogError;

    fn try_from(bands: Vec<GradeBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<BoundaryTable> for Vec<GradeBand> {
    fn from(table: BoundaryTable) -> Self {
        table.bands
    }
}
