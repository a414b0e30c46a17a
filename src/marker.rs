//! Geodetic marker description
use strum::{Display, EnumString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MarkerType {
    /// Earth fixed & high precision
    #[strum(serialize = "GEODETIC")]
    Geodetic,
    /// Earth fixed & low precision
    #[strum(to_string = "NON_GEODETIC", serialize = "NON GEODETIC")]
    NonGeodetic,
    /// Generated from network
    #[strum(to_string = "NON_PHYSICAL", serialize = "NON PHYSICAL")]
    NonPhysical,
    /// Orbiting space vehicle
    #[strum(to_string = "SPACEBORNE", serialize = "SPACE BORNE")]
    Spaceborne,
    /// Aircraft, balloon..
    #[strum(to_string = "AIRBORNE", serialize = "AIR BORNE")]
    Airborne,
    /// Mobile water craft
    #[strum(to_string = "WATER_CRAFT", serialize = "WATER CRAFT")]
    Watercraft,
    /// Mobile terrestrial vehicle
    #[strum(to_string = "GROUND_CRAFT", serialize = "GROUND CRAFT")]
    Groundcraft,
    /// Fixed on water surface
    #[strum(to_string = "FIXED_BUOY", serialize = "FIXED BUOY")]
    FixedBuoy,
    /// Floating on water surface
    #[strum(to_string = "FLOATING_BUOY", serialize = "FLOATING BUOY")]
    FloatingBuoy,
    /// Floating on ice
    #[strum(to_string = "FLOATING_ICE", serialize = "FLOATING ICE")]
    FloatingIce,
    /// Fixed on glacier
    #[strum(serialize = "GLACIER")]
    Glacier,
    /// Rockets, shells, etc..
    #[strum(serialize = "BALLISTIC")]
    Ballistic,
    /// Animal carrying a receiver
    #[strum(serialize = "ANIMAL")]
    Animal,
    /// Human being carrying a receiver
    #[strum(serialize = "HUMAN")]
    Human,
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    #[test]
    fn marker_types() {
        assert_eq!(MarkerType::from_str("GEODETIC").unwrap(), MarkerType::Geodetic);
        assert_eq!(
            MarkerType::from_str("NON_GEODETIC").unwrap(),
            MarkerType::NonGeodetic
        );
        assert_eq!(
            MarkerType::from_str("NON GEODETIC").unwrap(),
            MarkerType::NonGeodetic
        );
        assert_eq!(MarkerType::Geodetic.to_string(), "GEODETIC");
        assert!(MarkerType::from_str("SUBMARINE").is_err());
    }
}
