//! Satellite system identification helpers
use crate::{
    error::ParsingError,
    prelude::{Constellation, TimeScale, SV},
};

/// Identifies a [Constellation] from its single letter RINEX code.
/// Returns None for unknown letters (including 'M', which is not a system).
pub fn from_letter(letter: char) -> Option<Constellation> {
    match letter.to_ascii_uppercase() {
        'G' => Some(Constellation::GPS),
        'R' => Some(Constellation::Glonass),
        'E' => Some(Constellation::Galileo),
        'C' => Some(Constellation::BeiDou),
        'J' => Some(Constellation::QZSS),
        'I' => Some(Constellation::IRNSS),
        'S' => Some(Constellation::SBAS),
        _ => None,
    }
}

/// Folds all augmentation systems into [Constellation::SBAS]
pub fn normalize(constellation: Constellation) -> Constellation {
    if constellation.is_sbas() {
        Constellation::SBAS
    } else {
        constellation
    }
}

/// Default [TimeScale] of a file produced for this [Constellation]
pub fn default_timescale(constellation: Constellation) -> TimeScale {
    match normalize(constellation) {
        Constellation::Galileo => TimeScale::GST,
        Constellation::BeiDou => TimeScale::BDT,
        Constellation::Glonass => TimeScale::UTC,
        _ => TimeScale::GPST,
    }
}

/// Human readable name
pub fn long_name(constellation: Constellation) -> &'static str {
    match normalize(constellation) {
        Constellation::GPS => "GPS",
        Constellation::Glonass => "GLONASS",
        Constellation::Galileo => "Galileo",
        Constellation::BeiDou => "BeiDou",
        Constellation::QZSS => "QZSS",
        Constellation::IRNSS => "IRNSS/NavIC",
        Constellation::SBAS => "SBAS",
        Constellation::Mixed => "Mixed",
        _ => "Unknown",
    }
}

/// Parses a 3 character vehicle identifier ("G01", "R 4", " 12").
/// A blank system letter means `default`, as allowed by RINEX2.
pub fn parse_vehicle(id: &str, default: Constellation) -> Result<SV, ParsingError> {
    let mut chars = id.chars();
    let letter = chars
        .next()
        .ok_or_else(|| ParsingError::SatelliteParsing(id.to_string()))?;

    let constellation = if letter == ' ' {
        default
    } else if letter.is_ascii_digit() {
        // "12 " packed without letter nor padding
        return parse_prn(id.trim()).map(|prn| SV::new(default, prn));
    } else {
        from_letter(letter).ok_or_else(|| ParsingError::UnknownSystem(letter.to_string()))?
    };

    let prn = parse_prn(chars.as_str().trim())?;
    Ok(SV::new(constellation, prn))
}

fn parse_prn(s: &str) -> Result<u8, ParsingError> {
    s.parse::<u8>()
        .map_err(|_| ParsingError::SatelliteParsing(s.to_string()))
}
