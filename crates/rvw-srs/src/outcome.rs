use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::SrsError;

/// Quality threshold below which an attempt counts as forgotten.
pub const PASSING_QUALITY: u8 = 3;

/// Result of a single review attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Map the outcome onto the 0-5 SM-2 quality scale.
    ///
    /// Only the two extremes of the scale are used: a success is a perfect
    /// recall, a failure a complete blackout.
    pub const fn quality(self) -> u8 {
        match self {
            Self::Success => 5,
            Self::Failure => 0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
        }
    }
}

impl FromStr for Outcome {
    type Err = SrsError;

    /// Parse the wire representation. Matching is exact and case sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Success" => Ok(Self::Success),
            "Failure" => Ok(Self::Failure),
            other => Err(SrsError::InvalidOutcome(other.to_string())),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
