//! Epoch flag and epoch / date-time descriptors parsing
use crate::{
    column,
    error::ParsingError,
    prelude::{Duration, Epoch, TimeScale},
};

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `EpochFlag` validates an epoch,
/// or describes possible events that occurred
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EpochFlag {
    /// Epoch is sane
    #[default]
    Ok,
    /// Power failure since previous epoch
    PowerFailure,
    /// Antenna is being moved at current epoch
    AntennaBeingMoved,
    /// Site has changed, received has moved since last epoch
    NewSiteOccupation,
    /// New information to come after this epoch
    HeaderInformationFollows,
    /// External event - significant event in this epoch
    ExternalEvent,
    /// Cycle slip at this epoch
    CycleSlip,
}

impl EpochFlag {
    /// Returns True if self is a valid epoch
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
    /// Events (flags 2 to 5) are followed by special records
    /// instead of observations.
    pub fn is_event(self) -> bool {
        matches!(
            self,
            Self::AntennaBeingMoved
                | Self::NewSiteOccupation
                | Self::HeaderInformationFollows
                | Self::ExternalEvent
        )
    }
}

impl FromStr for EpochFlag {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Self::Ok),
            "1" => Ok(Self::PowerFailure),
            "2" => Ok(Self::AntennaBeingMoved),
            "3" => Ok(Self::NewSiteOccupation),
            "4" => Ok(Self::HeaderInformationFollows),
            "5" => Ok(Self::ExternalEvent),
            "6" => Ok(Self::CycleSlip),
            other => Err(ParsingError::EpochFlag(other.to_string())),
        }
    }
}

impl std::fmt::Display for EpochFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Ok => "0".fmt(f),
            Self::PowerFailure => "1".fmt(f),
            Self::AntennaBeingMoved => "2".fmt(f),
            Self::NewSiteOccupation => "3".fmt(f),
            Self::HeaderInformationFollows => "4".fmt(f),
            Self::ExternalEvent => "5".fmt(f),
            Self::CycleSlip => "6".fmt(f),
        }
    }
}

/// Content of an epoch descriptor, common to both revisions.
/// Event records may leave the date blank.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EpochLine {
    pub epoch: Option<Epoch>,
    pub flag: EpochFlag,
    /// Number of satellites, or number of special records for events
    pub count: usize,
}

/// Parses a three letters month ("Jan")
pub(crate) fn parse_formatted_month(desc: &str) -> Result<u8, ParsingError> {
    match desc {
        "Jan" => Ok(1),
        "Feb" => Ok(2),
        "Mar" => Ok(3),
        "Apr" => Ok(4),
        "May" => Ok(5),
        "Jun" => Ok(6),
        "Jul" => Ok(7),
        "Aug" => Ok(8),
        "Sep" => Ok(9),
        "Oct" => Ok(10),
        "Nov" => Ok(11),
        "Dec" => Ok(12),
        _ => Err(ParsingError::MonthParsing(desc.to_string())),
    }
}

/// Splits "ss.sssssss" into integer seconds and nanoseconds,
/// without going through floating point.
fn parse_seconds(s: &str) -> Result<(u8, u32), ParsingError> {
    let (secs, frac) = s.split_once('.').unwrap_or((s, ""));
    let secs = secs
        .parse::<u8>()
        .map_err(|_| ParsingError::DatetimeParsing)?;
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParsingError::DatetimeParsing);
    }
    let mut nanos = 0_u32;
    for i in 0..9 {
        let digit = frac
            .as_bytes()
            .get(i)
            .map(|b| (b - b'0') as u32)
            .unwrap_or(0);
        nanos = nanos * 10 + digit;
    }
    Ok((secs, nanos))
}

/// Parses "y m d h m s.s" whitespace separated items.
/// Two digit years follow the RINEX2 convention (80-99: 19xx).
pub(crate) fn parse_datetime(content: &str, ts: TimeScale) -> Result<Epoch, ParsingError> {
    let items: Vec<&str> = content.split_ascii_whitespace().collect();
    if items.len() != 6 {
        return Err(ParsingError::DatetimeFormat);
    }

    let mut year = items[0]
        .parse::<i32>()
        .map_err(|_| ParsingError::DatetimeParsing)?;
    if items[0].len() <= 2 {
        year += if year < 80 { 2000 } else { 1900 };
    }

    let mut fields = [0_u8; 4];
    for (i, item) in items[1..5].iter().enumerate() {
        fields[i] = item
            .parse::<u8>()
            .map_err(|_| ParsingError::DatetimeParsing)?;
    }
    let (secs, nanos) = parse_seconds(items[5])?;

    // some receivers round up to "60.0000000"
    let (secs, carry) = if (60..120).contains(&secs) {
        (secs - 60, Duration::from_seconds(60.0))
    } else {
        (secs, Duration::ZERO)
    };

    let epoch = Epoch::maybe_from_gregorian(
        year, fields[0], fields[1], fields[2], fields[3], secs, nanos, ts,
    )
    .map_err(|_| ParsingError::DatetimeParsing)?;
    Ok(epoch + carry)
}

fn parse_count(s: &str) -> Result<usize, ParsingError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }
    s.parse::<usize>()
        .map_err(|_| ParsingError::NumericField(s.to_string()))
}

fn parse_epoch_fields(
    date: &str,
    flag: &str,
    count: &str,
    ts: TimeScale,
) -> Result<EpochLine, ParsingError> {
    let flag = EpochFlag::from_str(flag)?;
    let count = parse_count(count)?;
    let epoch = if date.trim().is_empty() {
        if !flag.is_event() {
            return Err(ParsingError::DatetimeFormat);
        }
        None
    } else {
        Some(parse_datetime(date, ts)?)
    };
    Ok(EpochLine { epoch, flag, count })
}

/// Parses a RINEX2 epoch line: " yy mm dd hh mm ss.sssssss  f nnn"
pub(crate) fn parse_v2(line: &str, ts: TimeScale) -> Result<EpochLine, ParsingError> {
    if line.len() < 29 || line.starts_with('>') {
        return Err(ParsingError::DatetimeFormat);
    }
    parse_epoch_fields(
        column(line, 0, 26),
        column(line, 26, 29),
        column(line, 29, 32),
        ts,
    )
}

/// Parses a RINEX3 epoch line: "> yyyy mm dd hh mm ss.sssssss  f nnn"
pub(crate) fn parse_v3(line: &str, ts: TimeScale) -> Result<EpochLine, ParsingError> {
    if !line.starts_with('>') || line.len() < 32 {
        return Err(ParsingError::DatetimeFormat);
    }
    parse_epoch_fields(
        column(line, 1, 29),
        column(line, 29, 32),
        column(line, 32, 35),
        ts,
    )
}

/// Maps a RINEX time system code
pub(crate) fn parse_time_system(code: &str) -> Option<TimeScale> {
    match code.trim() {
        "GPS" => Some(TimeScale::GPST),
        "GLO" | "UTC" => Some(TimeScale::UTC),
        "GAL" => Some(TimeScale::GST),
        "BDT" => Some(TimeScale::BDT),
        "QZS" => Some(TimeScale::QZSST),
        "IRN" => Some(TimeScale::GPST),
        _ => None,
    }
}

/// Parses "TIME OF FIRST OBS" / "TIME OF LAST OBS" content.
/// Returns the declared time system, if any, next to the [Epoch].
pub(crate) fn parse_header_time(
    content: &str,
    default: TimeScale,
) -> Result<(Epoch, Option<TimeScale>), ParsingError> {
    let system = parse_time_system(column(content, 48, 51));
    let epoch = parse_datetime(column(content, 0, 43), system.unwrap_or(default))?;
    Ok((epoch, system))
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn epoch_flags() {
        assert_eq!(EpochFlag::from_str("0").unwrap(), EpochFlag::Ok);
        assert_eq!(EpochFlag::from_str(" 4").unwrap(), EpochFlag::HeaderInformationFollows);
        assert!(EpochFlag::from_str("7").is_err());
        assert!(EpochFlag::Ok.is_ok());
        assert!(!EpochFlag::CycleSlip.is_event());
        assert!(!EpochFlag::PowerFailure.is_event());
        assert!(EpochFlag::ExternalEvent.is_event());
        assert_eq!(EpochFlag::NewSiteOccupation.to_string(), "3");
    }
    #[test]
    fn seconds() {
        assert_eq!(parse_seconds("15.0000000").unwrap(), (15, 0));
        assert_eq!(parse_seconds("0.5").unwrap(), (0, 500_000_000));
        assert_eq!(parse_seconds("59.1234567891").unwrap(), (59, 123_456_789));
        assert_eq!(parse_seconds("30").unwrap(), (30, 0));
        assert!(parse_seconds("1.2a").is_err());
    }
    #[test]
    fn rinex2_epoch() {
        let line = " 21 12 21  0  0 30.0000000  0 12G01G03G08G14G21R02R11R17G10G22G27G32";
        let parsed = parse_v2(line, TimeScale::GPST).unwrap();
        assert_eq!(
            parsed.epoch,
            Some(Epoch::from_gregorian(2021, 12, 21, 0, 0, 30, 0, TimeScale::GPST))
        );
        assert_eq!(parsed.flag, EpochFlag::Ok);
        assert_eq!(parsed.count, 12);

        let line = " 99 12 31 23 58 15.0000000  0  4G01  5G12G30";
        let parsed = parse_v2(line, TimeScale::GPST).unwrap();
        assert_eq!(
            parsed.epoch,
            Some(Epoch::from_gregorian(1999, 12, 31, 23, 58, 15, 0, TimeScale::GPST))
        );

        // events may omit the date
        let line = "                            4  2";
        let parsed = parse_v2(line, TimeScale::GPST).unwrap();
        assert_eq!(parsed.epoch, None);
        assert_eq!(parsed.flag, EpochFlag::HeaderInformationFollows);
        assert_eq!(parsed.count, 2);

        // observations may not
        assert!(parse_v2("                            0  2", TimeScale::GPST).is_err());
        assert!(parse_v2("     C1        L1", TimeScale::GPST).is_err());
        assert!(parse_v2(" 21 13 21  0  0 30.0000000  0  1G01", TimeScale::GPST).is_err());
    }
    #[test]
    fn rounded_up_seconds() {
        let line = "> 2022 01 01 00 00 60.0000000  0  2";
        let parsed = parse_v3(line, TimeScale::GPST).unwrap();
        assert_eq!(
            parsed.epoch,
            Some(Epoch::from_gregorian(2022, 1, 1, 0, 1, 0, 0, TimeScale::GPST))
        );
    }
    #[test]
    fn rinex3_epoch() {
        let line = "> 2021 12 21 00 05 30.0000000  0 11";
        let parsed = parse_v3(line, TimeScale::GPST).unwrap();
        assert_eq!(
            parsed.epoch,
            Some(Epoch::from_gregorian(2021, 12, 21, 0, 5, 30, 0, TimeScale::GPST))
        );
        assert_eq!(parsed.count, 11);

        let line = "> 2021 12 21 00 05 30.0000000  0 11       0.000000000000";
        assert!(parse_v3(line, TimeScale::GPST).is_ok());

        assert!(parse_v3("G01  20243517.560", TimeScale::GPST).is_err());
        assert!(parse_v3("> 2021 12 21", TimeScale::GPST).is_err());
    }
    #[test]
    fn header_time() {
        let content = "  2021    12    21     0     0    0.0000000     GPS         ";
        let (epoch, ts) = parse_header_time(content, TimeScale::UTC).unwrap();
        assert_eq!(ts, Some(TimeScale::GPST));
        assert_eq!(
            epoch,
            Epoch::from_gregorian(2021, 12, 21, 0, 0, 0, 0, TimeScale::GPST)
        );

        let content = "  1999    12    31    23    58   15.0000000                 ";
        let (epoch, ts) = parse_header_time(content, TimeScale::GPST).unwrap();
        assert_eq!(ts, None);
        assert_eq!(
            epoch,
            Epoch::from_gregorian(1999, 12, 31, 23, 58, 15, 0, TimeScale::GPST)
        );
    }
    #[test]
    fn months() {
        assert_eq!(parse_formatted_month("Jan").unwrap(), 1);
        assert_eq!(parse_formatted_month("Dec").unwrap(), 12);
        assert!(parse_formatted_month("Foo").is_err());
    }
}
