use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a PRTG object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Unknown,
    Collecting,
    Up,
    Warning,
    Down,
    NoProbe,
    PausedByUser,
    PausedByDependency,
    PausedBySchedule,
    Unusual,
    PausedByLicense,
    PausedUntil,
    DownAcknowledged,
    DownPartial,
}

impl Status {
    /// Returns `true` for any of the paused states.
    pub fn is_paused(&self) -> bool {
        matches!(
            self,
            Self::PausedByUser
                | Self::PausedByDependency
                | Self::PausedBySchedule
                | Self::PausedByLicense
                | Self::PausedUntil
        )
    }

    /// Returns `true` for any of the down states.
    pub fn is_down(&self) -> bool {
        matches!(self, Self::Down | Self::DownAcknowledged | Self::DownPartial)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Collecting => "Collecting",
            Self::Up => "Up",
            Self::Warning => "Warning",
            Self::Down => "Down",
            Self::NoProbe => "NoProbe",
            Self::PausedByUser => "PausedByUser",
            Self::PausedByDependency => "PausedByDependency",
            Self::PausedBySchedule => "PausedBySchedule",
            Self::Unusual => "Unusual",
            Self::PausedByLicense => "PausedByLicense",
            Self::PausedUntil => "PausedUntil",
            Self::DownAcknowledged => "DownAcknowledged",
            Self::DownPartial => "DownPartial",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
