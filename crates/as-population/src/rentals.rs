//! Rental listing cleanup.

use crate::records::Rental;
use crate::table::Table;

pub const RENT_RANGE: (f64, f64) = (100.0, 10_000.0);
pub const RENT_SQFT_RANGE: (f64, f64) = (0.2, 50.0);

/// Clamp every listing's rent and rent per square foot into
/// [`RENT_RANGE`] and [`RENT_SQFT_RANGE`].  NaN stays NaN.
pub fn clean_rentals(rentals: &mut Table<Rental>) {
    let mut clamped = 0usize;
    for r in rentals.iter_mut() {
        let rent = r.rent.clamp(RENT_RANGE.0, RENT_RANGE.1);
        let rent_sqft = r.rent_sqft.clamp(RENT_SQFT_RANGE.0, RENT_SQFT_RANGE.1);
        if rent.to_bits() != r.rent.to_bits() || rent_sqft.to_bits() != r.rent_sqft.to_bits() {
            clamped += 1;
        }
        r.rent = rent;
        r.rent_sqft = rent_sqft;
    }
    if clamped > 0 {
        log::debug!("clamped {clamped} rental listings");
    }
}
