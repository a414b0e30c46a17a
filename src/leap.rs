//! Describes `leap` second information, contained in `header`
use crate::{column, error::ParsingError, prelude::TimeScale};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `Leap` to describe leap seconds.
/// GLO = UTC = GPS - ΔtLS
/// GPS = UTC + ΔtLS
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Leap {
    /// current number
    pub leap: u32,
    /// ΔtLS : "future or past leap second(s)",
    /// actual number of leap seconds between GPS/GAL and GLO,
    /// or BDS and UTC.
    pub delta_tls: Option<u32>,
    /// weeks counter
    pub week: Option<u32>,
    /// days counter
    pub day: Option<u32>,
    pub timescale: Option<TimeScale>,
}

fn optional_u32(field: &str) -> Result<Option<u32>, ParsingError> {
    let field = field.trim();
    if field.is_empty() {
        Ok(None)
    } else {
        field
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ParsingError::NumericField(field.to_string()))
    }
}

impl std::str::FromStr for Leap {
    type Err = ParsingError;
    /// Parses "LEAP SECONDS" content: RINEX2 only has the first field,
    /// RINEX3 may describe the next leap event and the time system.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let leap = optional_u32(column(s, 0, 6))?
            .ok_or_else(|| ParsingError::NumericField(s.trim().to_string()))?;
        let timescale = match column(s, 24, 27).trim() {
            "" => None,
            "GPS" => Some(TimeScale::GPST),
            "GAL" => Some(TimeScale::GST),
            "BDS" | "BDT" => Some(TimeScale::BDT),
            "QZS" => Some(TimeScale::QZSST),
            "UTC" => Some(TimeScale::UTC),
            other => return Err(ParsingError::NumericField(other.to_string())),
        };
        Ok(Self {
            leap,
            delta_tls: optional_u32(column(s, 6, 12))?,
            week: optional_u32(column(s, 12, 18))?,
            day: optional_u32(column(s, 18, 24))?,
            timescale,
        })
    }
}
