//! Grade availability filter for school choice sets.

/// Number of grades, K through 12.
pub const GRADES: usize = 13;

/// Whether a school offering `grades` (K..=12) can take a student aged
/// `age`.
///
/// The student's grade index is `age − 6`, floored at 0 (kindergarten).
/// Grade `i` or `i + 1` is accepted; a 12th-grade index accepts only
/// grade 12.  Older students have no grade.
pub fn school_available(age: u32, grades: &[bool; GRADES]) -> bool {
    let index = age.saturating_sub(6) as usize;
    match index {
        i if i < GRADES - 1 => grades[i] || grades[i + 1],
        i if i == GRADES - 1 => grades[i],
        _ => false,
    }
}
