//! Slot allocator: subject and teacher choice for one lesson cell.
//!
//! # Algorithm
//!
//! 1. Draw a subject uniformly from the weighted multiset (core subjects
//!    repeated `core_weight` times).
//! 2. **Tier 1**: shuffle the qualified teachers once, then take the first
//!    that is free at the slot and under its load cap.
//! 3. **Tier 2**: otherwise take the least-loaded free teacher of any
//!    subject; ties go to the earlier teacher in pool order.
//! 4. **Tier 3**: if every teacher is booked at the slot, pick one at
//!    random and accept the double-booking.
//!
//! The allocator reads the pool but never books it; the caller does.
//! All randomness comes from the `Rng` passed in.
//!
//! # Complexity
//! O(t) per cell where t = teachers in the pool.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::models::{AllocationTier, Catalog, Slot, TeacherPool};

/// A (subject, teacher) choice for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Subject shown in the cell.
    pub subject: String,
    /// Pool index of the chosen teacher.
    pub teacher: usize,
    /// Tier that produced the teacher.
    pub tier: AllocationTier,
}

/// Picks subjects and teachers for lesson cells.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_timetable::models::{AllocationTier, Slot, Teacher, TeacherPool};
/// use u_timetable::scheduler::SlotAllocator;
///
/// let pool = TeacherPool::new(vec![Teacher::new("T1", "Jane Smith", "Mathematics", 28)]);
/// let allocator = SlotAllocator::with_subjects(vec!["Mathematics".into()]);
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let a = allocator.allocate(Slot::new(0, 0), &pool, &mut rng).unwrap();
/// assert_eq!(a.subject, "Mathematics");
/// assert_eq!(a.teacher, 0);
/// assert_eq!(a.tier, AllocationTier::Qualified);
/// ```
#[derive(Debug, Clone)]
pub struct SlotAllocator {
    weighted_subjects: Vec<String>,
}

impl SlotAllocator {
    /// Creates an allocator using the catalog's weighted subject list.
    pub fn new(catalog: &Catalog) -> Self {
        Self::with_subjects(catalog.weighted_subjects())
    }

    /// Creates an allocator over an explicit subject multiset.
    pub fn with_subjects(weighted_subjects: Vec<String>) -> Self {
        Self { weighted_subjects }
    }

    /// The subject multiset.
    pub fn weighted_subjects(&self) -> &[String] {
        &self.weighted_subjects
    }

    /// Chooses a subject and a teacher for `slot`.
    ///
    /// Returns `None` only when there are no subjects or no teachers.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        slot: Slot,
        pool: &TeacherPool,
        rng: &mut R,
    ) -> Option<Allocation> {
        let subject = self.choose_subject(rng)?;
        let (teacher, tier) = choose_teacher(subject, slot, pool, rng)?;
        Some(Allocation {
            subject: subject.to_string(),
            teacher,
            tier,
        })
    }

    /// Uniform draw over the weighted subject multiset.
    pub fn choose_subject<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.weighted_subjects.choose(rng).map(String::as_str)
    }
}

/// Chooses a teacher for `subject` at `slot` using the tier fallback.
///
/// Returns `None` only for an empty pool.
pub fn choose_teacher<R: Rng + ?Sized>(
    subject: &str,
    slot: Slot,
    pool: &TeacherPool,
    rng: &mut R,
) -> Option<(usize, AllocationTier)> {
    if pool.is_empty() {
        return None;
    }

    // Tier 1: shuffled first-fit among qualified teachers
    let mut candidates = pool.qualified(subject);
    candidates.shuffle(rng);
    if let Some(&idx) = candidates
        .iter()
        .find(|&&i| !pool.is_booked(i, slot) && pool.load(i) < max_lessons(pool, i))
    {
        return Some((idx, AllocationTier::Qualified));
    }

    // Tier 2: least-loaded free teacher, first in pool order on ties
    if let Some(idx) = (0..pool.len())
        .filter(|&i| !pool.is_booked(i, slot))
        .min_by_key(|&i| pool.load(i))
    {
        return Some((idx, AllocationTier::LeastLoaded));
    }

    // Tier 3: everyone is busy; accept a conflict
    Some((rng.random_range(0..pool.len()), AllocationTier::Conflict))
}

fn max_lessons(pool: &TeacherPool, idx: usize) -> usize {
    pool.get(idx).map_or(0, |t| t.max_lessons)
}
