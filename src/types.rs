//! `RINEX` types description
use crate::error::ParsingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Describes all known `RINEX` file types
#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// Describes Observation Data (OBS),
    /// Phase & Pseudo range measurements
    #[default]
    ObservationData,
    /// Describes Navigation Data (NAV), including the
    /// legacy per constellation letters (G, H, B, L)
    NavigationData,
    /// Describes Meteorological data (MET)
    MeteoData,
    /// Clock Data (CLK)
    ClockData,
    /// Ionosphere Maps (IONEX)
    IonosphereMaps,
}

impl std::fmt::Display for Type {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ObservationData => write!(fmt, "OBSERVATION DATA"),
            Self::NavigationData => write!(fmt, "NAVIGATION DATA"),
            Self::MeteoData => write!(fmt, "METEOROLOGICAL DATA"),
            Self::ClockData => write!(fmt, "CLOCK DATA"),
            Self::IonosphereMaps => write!(fmt, "IONOSPHERE MAPS"),
        }
    }
}

impl Type {
    /// Identifies the file type from the single letter
    /// code found in column 21 of the version line.
    pub fn from_code(code: char) -> Result<Self, ParsingError> {
        match code.to_ascii_uppercase() {
            'O' => Ok(Self::ObservationData),
            'N' | 'G' | 'H' | 'B' | 'L' => Ok(Self::NavigationData),
            'M' => Ok(Self::MeteoData),
            'C' => Ok(Self::ClockData),
            'I' => Ok(Self::IonosphereMaps),
            c => Err(ParsingError::TypeParsing(c.to_string())),
        }
    }
}

impl std::str::FromStr for Type {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.chars().next() {
            Some(c) => Self::from_code(c),
            None => Err(ParsingError::TypeParsing(s.to_string())),
        }
    }
}
