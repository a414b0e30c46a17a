//! CRINEX Header definitions
use crate::{
    column,
    epoch::parse_formatted_month,
    error::ParsingError,
    prelude::{Epoch, TimeScale, Version},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// CRINEX specifications
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CRINEX {
    /// Compression program version
    pub version: Version,
    /// Compression program name
    pub prog: String,
    /// Date of compression
    pub date: Option<Epoch>,
}

impl CRINEX {
    /// Parses "CRINEX VERS   / TYPE" content
    pub(crate) fn with_version_line(&self, content: &str) -> Result<Self, ParsingError> {
        let version = column(content, 0, 20).parse::<Version>()?;
        let mut s = self.clone();
        s.version = version;
        Ok(s)
    }

    /// Parses "CRINEX PROG / DATE" content
    pub(crate) fn with_prog_date(&self, content: &str) -> Result<Self, ParsingError> {
        if content.len() < 55 {
            return Err(ParsingError::HeaderLineTooShort);
        }
        let mut s = self.clone();
        s.prog = column(content, 0, 20).trim().to_string();
        s.date = Some(parse_date(column(content, 40, 60).trim())?);
        Ok(s)
    }

    /// CRINEX1 compresses RINEX2, CRINEX3 compresses RINEX3
    pub fn is_rinex3(&self) -> bool {
        self.version.major >= 3
    }
}

/// Parses "dd-Mmm-yy hh:mm"
fn parse_date(desc: &str) -> Result<Epoch, ParsingError> {
    let (date, time) = desc
        .split_once(' ')
        .ok_or(ParsingError::DatetimeFormat)?;

    let items = date.split('-').collect::<Vec<_>>();
    if items.len() != 3 {
        return Err(ParsingError::DatetimeFormat);
    }
    let day = items[0]
        .trim()
        .parse::<u8>()
        .map_err(|_| ParsingError::DatetimeParsing)?;
    let month = parse_formatted_month(items[1].trim())?;
    let mut year = items[2]
        .trim()
        .parse::<i32>()
        .map_err(|_| ParsingError::DatetimeParsing)?;
    year += if year < 80 { 2000 } else { 1900 };

    let (hour, mins) = time
        .trim()
        .split_once(':')
        .ok_or(ParsingError::DatetimeFormat)?;
    let hour = hour
        .parse::<u8>()
        .map_err(|_| ParsingError::DatetimeParsing)?;
    let mins = mins
        .parse::<u8>()
        .map_err(|_| ParsingError::DatetimeParsing)?;

    Epoch::maybe_from_gregorian(year, month, day, hour, mins, 0, 0, TimeScale::UTC)
        .map_err(|_| ParsingError::DatetimeParsing)
}
