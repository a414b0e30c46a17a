//! Station position, as geodetic coordinates
use map_3d::{ecef2geodetic, Ellipsoid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [GeodeticPosition] is the WGS84 view of the header's approximate
/// ECEF position. It is approximate: the header position itself is a
/// rough estimate and no datum or epoch transformation is applied.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticPosition {
    /// Latitude, in decimal degrees
    pub latitude_ddeg: f64,
    /// Longitude, in decimal degrees
    pub longitude_ddeg: f64,
    /// Height above the ellipsoid, in meters
    pub height_m: f64,
    /// Always set: serialized outputs carry the approximate nature
    /// of the position along with the coordinates.
    pub approximate: bool,
}

impl GeodeticPosition {
    /// Converts ECEF coordinates (in meters). Returns None for
    /// the null vector, which means "no position" in RINEX.
    pub fn from_ecef(x: f64, y: f64, z: f64) -> Option<Self> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return None;
        }
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return None;
        }
        let (lat, lon, alt) = ecef2geodetic(x, y, z, Ellipsoid::WGS84);
        Some(Self {
            latitude_ddeg: lat.to_degrees(),
            longitude_ddeg: lon.to_degrees(),
            height_m: alt,
            approximate: true,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn reference_conversion() {
        let pos = GeodeticPosition::from_ecef(3582105.2910, 532589.7313, 5232754.8054).unwrap();
        assert!((pos.latitude_ddeg - 55.493562765).abs() < 1.0E-6);
        assert!((pos.longitude_ddeg - 8.456821389).abs() < 1.0E-6);
        assert!((pos.height_m - 59.4765).abs() < 1.0E-2);
        assert!(pos.approximate);
    }
    #[cfg(feature = "serde")]
    #[test]
    fn serialized_as_approximate() {
        let pos = GeodeticPosition::from_ecef(3582105.2910, 532589.7313, 5232754.8054).unwrap();
        let json = serde_json::to_value(pos).unwrap();
        assert_eq!(json["approximate"], serde_json::Value::Bool(true));
        assert!(json["latitude_ddeg"].is_f64());
    }
    #[test]
    fn null_position() {
        assert!(GeodeticPosition::from_ecef(0.0, 0.0, 0.0).is_none());
        assert!(GeodeticPosition::from_ecef(f64::NAN, 0.0, 1.0).is_none());
    }
}
