//! Hardware: receiver, antenna informations
use crate::column;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GNSS receiver description
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Receiver {
    /// Receiver (hardware) model
    pub model: String,
    /// Receiver (hardware) identification info
    pub sn: String,
    /// Receiver embedded software info
    pub firmware: String,
}

impl Receiver {
    /// Parses "REC # / TYPE / VERS" content
    pub(crate) fn from_content(content: &str) -> Self {
        Self {
            sn: column(content, 0, 20).trim().to_string(),
            model: column(content, 20, 40).trim().to_string(),
            firmware: column(content, 40, 60).trim().to_string(),
        }
    }
}

/// Antenna description
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Antenna {
    /// Hardware model / make descriptor
    pub model: String,
    /// Serial number / identification number
    pub sn: String,
    /// Optionnal `h` eccentricity (height component),
    /// referenced to base/reference point, in meter
    pub height: Option<f64>,
    /// Optionnal `eastern` eccentricity (eastern component),
    /// referenced to base/reference point, in meter
    pub eastern: Option<f64>,
    /// Optionnal `northern` eccentricity (northern component),
    /// referenced to base/reference point, in meter
    pub northern: Option<f64>,
}

impl Antenna {
    /// Parses "ANT # / TYPE" content
    pub(crate) fn from_content(content: &str) -> Self {
        Self {
            sn: column(content, 0, 20).trim().to_string(),
            model: column(content, 20, 40).trim().to_string(),
            ..Default::default()
        }
    }
    /// Sets antenna `h` eccentricity component
    pub fn with_height(&self, h: f64) -> Self {
        let mut s = self.clone();
        s.height = Some(h);
        s
    }
    /// Sets antenna `eastern` coordinates component
    pub fn with_eastern_component(&self, e: f64) -> Self {
        let mut s = self.clone();
        s.eastern = Some(e);
        s
    }
    /// Sets antenna `northern` coordinates component
    pub fn with_northern_component(&self, n: f64) -> Self {
        let mut s = self.clone();
        s.northern = Some(n);
        s
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn receiver() {
        let content = "3001376             SEPT POLARX5        5.3.2               ";
        let rcvr = Receiver::from_content(content);
        assert_eq!(rcvr.sn, "3001376");
        assert_eq!(rcvr.model, "SEPT POLARX5");
        assert_eq!(rcvr.firmware, "5.3.2");

        // short lines are tolerated
        let rcvr = Receiver::from_content("1234");
        assert_eq!(rcvr.sn, "1234");
        assert!(rcvr.model.is_empty());
    }
    #[test]
    fn antenna() {
        let content = "CR620012101         ASH701945C_M    SCIS                    ";
        let antenna = Antenna::from_content(content)
            .with_height(0.1)
            .with_eastern_component(0.0);
        assert_eq!(antenna.sn, "CR620012101");
        assert_eq!(antenna.model, "ASH701945C_M    SCIS");
        assert_eq!(antenna.height, Some(0.1));
        assert_eq!(antenna.eastern, Some(0.0));
        assert_eq!(antenna.northern, None);
    }
}
