//! Observation code validation
use regex::Regex;

use crate::{constellation::normalize, prelude::Constellation};

lazy_static! {
    /// RINEX2: pseudo range, phase, doppler, raw signal strength + band
    static ref V2_CODE: Regex = Regex::new(r"^[CPLDS][1-8]$").unwrap();
    /// RINEX3: type + band + attribute
    static ref V3_CODE: Regex = Regex::new(r"^[CLDS]([0-9])[A-Z]$").unwrap();
}

/// Frequency bands a satellite system transmits on
fn bands(constellation: Constellation) -> &'static [char] {
    match normalize(constellation) {
        Constellation::GPS => &['1', '2', '5'],
        Constellation::Glonass => &['1', '2', '3', '4', '6'],
        Constellation::Galileo => &['1', '5', '6', '7', '8'],
        Constellation::BeiDou => &['1', '2', '5', '6', '7', '8'],
        Constellation::QZSS => &['1', '2', '5', '6'],
        Constellation::IRNSS => &['1', '5', '9'],
        Constellation::SBAS => &['1', '5'],
        _ => &[],
    }
}

/// Returns true if `code` is a valid RINEX2 observation code
pub fn is_known_v2(code: &str) -> bool {
    V2_CODE.is_match(code)
}

/// Returns true if `code` is a valid RINEX3 observation code
/// for this [Constellation]. X1 is the receiver channel number.
pub fn is_known_v3(constellation: Constellation, code: &str) -> bool {
    if code == "X1" {
        return true;
    }
    match V3_CODE.captures(code) {
        Some(caps) => caps
            .get(1)
            .and_then(|band| band.as_str().chars().next())
            .map(|band| bands(constellation).contains(&band))
            .unwrap_or(false),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn rinex2_codes() {
        for code in ["C1", "P1", "P2", "L1", "L2", "D1", "S2", "C5", "L8"] {
            assert!(is_known_v2(code), "{} should be valid", code);
        }
        for code in ["C9", "X1", "C1C", "", "L", "XX"] {
            assert!(!is_known_v2(code), "{} should be invalid", code);
        }
    }
    #[test]
    fn rinex3_codes() {
        assert!(is_known_v3(Constellation::GPS, "C1C"));
        assert!(is_known_v3(Constellation::GPS, "L5Q"));
        assert!(!is_known_v3(Constellation::GPS, "C7Q"));
        assert!(is_known_v3(Constellation::Glonass, "C3Q"));
        assert!(is_known_v3(Constellation::Galileo, "L7Q"));
        assert!(!is_known_v3(Constellation::Galileo, "L2W"));
        assert!(is_known_v3(Constellation::BeiDou, "C2I"));
        assert!(is_known_v3(Constellation::IRNSS, "L9A"));
        assert!(is_known_v3(Constellation::EGNOS, "C1C"));
        assert!(is_known_v3(Constellation::GPS, "X1"));
        assert!(!is_known_v3(Constellation::GPS, "P1"));
        assert!(!is_known_v3(Constellation::GPS, "C1"));
        assert!(!is_known_v3(Constellation::GPS, "Z1C"));
    }
}
