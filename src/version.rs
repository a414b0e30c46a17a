//! `RINEX` revision description
use crate::error::ParsingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Version is used to describe RINEX standards revisions.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    /// Version major number
    pub major: u8,
    /// Version minor number
    pub minor: u8,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl Version {
    /// Builds a new [Version]
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
    /// Only RINEX2 and RINEX3 observations can be examined
    pub fn is_supported(&self) -> bool {
        matches!(self.major, 2 | 3)
    }
}

impl std::str::FromStr for Version {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParsingError::VersionParsing(s.to_string());
        match s.split_once('.') {
            Some((major, minor)) => {
                let major = major.trim().parse::<u8>().map_err(|_| err())?;
                // "3.0" and "3.00" are both 3.0, "2.1" is 2.10
                let minor = match minor.trim() {
                    "" => 0,
                    m if m.len() == 1 => m.parse::<u8>().map_err(|_| err())? * 10,
                    m => m
                        .get(..2)
                        .ok_or_else(err)?
                        .parse::<u8>()
                        .map_err(|_| err())?,
                };
                Ok(Self { major, minor })
            },
            None => Ok(Self {
                major: s.parse::<u8>().map_err(|_| err())?,
                minor: 0,
            }),
        }
    }
}
