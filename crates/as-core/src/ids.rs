//! Strongly typed, zero-cost identifier wrappers.
//!
//! Record ids (`HouseholdId`, `PersonId`, …) carry the integer key used in
//! the input tables, so they are `u64`.  `NodeId` is a dense index into a
//! network's CSR arrays and `ZoneId` is a TAZ number; both fit in `u32`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(n: $inner) -> $name {
                $name(n)
            }
        }
    };
}

typed_id! {
    /// Key of a household record.
    pub struct HouseholdId(u64);
}

typed_id! {
    /// Key of a person record.
    pub struct PersonId(u64);
}

typed_id! {
    /// Key of a job record.
    pub struct JobId(u64);
}

typed_id! {
    /// Key of a building record.
    pub struct BuildingId(u64);
}

typed_id! {
    /// Key of a parcel record (`primary_id` in the parcel table).
    pub struct ParcelId(u64);
}

typed_id! {
    /// Key of a residential unit record.
    pub struct UnitId(u64);
}

typed_id! {
    /// Traffic analysis zone number.
    pub struct ZoneId(u32);
}

typed_id! {
    /// Dense index of a network node.  Not the OSM id; see
    /// `as_network::Network::external_id`.
    pub struct NodeId(u32);
}

typed_id! {
    /// Key of a school record.
    pub struct SchoolId(u32);
}

typed_id! {
    /// Caller-supplied id of a point of interest within one POI category.
    pub struct PoiId(u64);
}

impl From<SchoolId> for PoiId {
    #[inline]
    fn from(id: SchoolId) -> PoiId {
        PoiId(id.0 as u64)
    }
}
