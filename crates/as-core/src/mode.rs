//! Primary commute mode shared by the mode-choice stage and the plan writer.

use crate::{CoreError, CoreResult};

/// Alternatives of the primary commute mode choice model.
///
/// The numeric code is the alternative index the model was estimated with.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommuteMode {
    DriveAlone,
    Shared,
    WalkTransitWalk,
    DriveTransitWalk,
    WalkTransitDrive,
    Bike,
    Walk,
}

impl CommuteMode {
    pub const ALL: [CommuteMode; 7] = [
        CommuteMode::DriveAlone,
        CommuteMode::Shared,
        CommuteMode::WalkTransitWalk,
        CommuteMode::DriveTransitWalk,
        CommuteMode::WalkTransitDrive,
        CommuteMode::Bike,
        CommuteMode::Walk,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> CoreResult<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(CoreError::UnknownCode { what: "commute mode", code: code as i64 })
    }

    /// `true` for modes with a transit leg.
    #[inline]
    pub fn uses_transit(self) -> bool {
        matches!(
            self,
            CommuteMode::WalkTransitWalk | CommuteMode::DriveTransitWalk | CommuteMode::WalkTransitDrive
        )
    }

    /// Label written to plan output.
    pub fn as_str(self) -> &'static str {
        match self {
            CommuteMode::DriveAlone       => "drive_alone",
            CommuteMode::Shared           => "shared",
            CommuteMode::WalkTransitWalk  => "walk_transit_walk",
            CommuteMode::DriveTransitWalk => "drive_transit_walk",
            CommuteMode::WalkTransitDrive => "walk_transit_drive",
            CommuteMode::Bike             => "bike",
            CommuteMode::Walk             => "walk",
        }
    }
}

impl std::fmt::Display for CommuteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
