//! Examination report
use std::collections::BTreeSet;

use crate::{
    compression::Compression,
    constellation::normalize,
    error::{Outcome, Warning},
    header::{Header, Observables},
    observable::is_known_v3,
    position::GeodeticPosition,
    prelude::{Constellation, Duration, Epoch, Version, SV},
    sampling::IntervalStatistics,
    scanner::EpochSummary,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Examined source
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Source {
    /// Name (or path) as presented
    pub name: String,
    /// Compression layers that were stripped, outermost first
    pub compression: Vec<Compression>,
}

/// [Report] is everything we could learn about one observation file.
/// It is immutable once assembled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Report {
    source: Source,
    header: Header,
    summary: EpochSummary,
    duration: Option<Duration>,
    constellations: BTreeSet<Constellation>,
    declared_constellations: BTreeSet<Constellation>,
    observed_constellations: BTreeSet<Constellation>,
    position: Option<GeodeticPosition>,
    warnings: Vec<Warning>,
}

/// Systems with at least one valid observation type (RINEX3)
fn declared_constellations(header: &Header) -> BTreeSet<Constellation> {
    match &header.observables {
        Observables::PerSystem(map) => map
            .iter()
            .filter(|(constellation, codes)| {
                codes.iter().any(|code| is_known_v3(**constellation, code))
            })
            .map(|(constellation, _)| normalize(*constellation))
            .collect(),
        Observables::Shared(_) => BTreeSet::new(),
    }
}

impl Report {
    /// Merges all facts gathered along the pipeline.
    /// `warnings` are the ones raised before the body was scanned.
    pub(crate) fn assemble(
        source: Source,
        header: Header,
        body: Outcome<EpochSummary>,
        mut warnings: Vec<Warning>,
    ) -> Self {
        let Outcome {
            value: summary,
            warnings: body_warnings,
        } = body;
        for warning in body_warnings {
            crate::error::push_unique(&mut warnings, warning);
        }

        let duration = match (summary.first, summary.last) {
            (Some(first), Some(last)) => Some(last - first),
            _ => None,
        };

        let observed_constellations = summary
            .vehicles
            .iter()
            .map(|sv| normalize(sv.constellation))
            .collect::<BTreeSet<_>>();

        let declared_constellations = declared_constellations(&header);

        let constellations = if declared_constellations.is_empty() {
            observed_constellations.clone()
        } else {
            declared_constellations.clone()
        };

        let position = header
            .approx_position
            .and_then(|(x, y, z)| GeodeticPosition::from_ecef(x, y, z));

        Self {
            source,
            header,
            summary,
            duration,
            constellations,
            declared_constellations,
            observed_constellations,
            position,
            warnings,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn version(&self) -> Version {
        self.header.version
    }

    pub fn summary(&self) -> &EpochSummary {
        &self.summary
    }

    /// Number of observation epochs
    pub fn epochs(&self) -> usize {
        self.summary.count
    }

    /// Number of event epochs
    pub fn events(&self) -> usize {
        self.summary.events
    }

    pub fn first_epoch(&self) -> Option<Epoch> {
        self.summary.first
    }

    pub fn last_epoch(&self) -> Option<Epoch> {
        self.summary.last
    }

    /// Last - first observation epoch
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Satellite systems in this file: declared with valid observation
    /// types (RINEX3), otherwise observed in the epochs.
    pub fn constellations(&self) -> &BTreeSet<Constellation> {
        &self.constellations
    }

    pub fn declared_constellations(&self) -> &BTreeSet<Constellation> {
        &self.declared_constellations
    }

    pub fn observed_constellations(&self) -> &BTreeSet<Constellation> {
        &self.observed_constellations
    }

    /// Vehicles encountered
    pub fn vehicles(&self) -> &BTreeSet<SV> {
        &self.summary.vehicles
    }

    /// Approximate geodetic position of the marker (WGS84).
    /// This is not a geodetic grade coordinate.
    pub fn position(&self) -> Option<GeodeticPosition> {
        self.position
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// INTERVAL header field
    pub fn declared_interval(&self) -> Option<Duration> {
        self.header.sampling_interval
    }

    /// Dominant interval of the leading epochs. Prefer this one.
    pub fn calculated_interval(&self) -> Option<Duration> {
        self.summary
            .sampling
            .as_ref()
            .map(|stats| stats.calculated_interval())
    }

    pub fn sampling(&self) -> Option<&IntervalStatistics> {
        self.summary.sampling.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::TimeScale;
    use std::collections::BTreeMap;

    fn summary(vehicles: &[SV]) -> EpochSummary {
        EpochSummary {
            count: 2,
            first: Some(Epoch::from_gregorian(2022, 1, 1, 0, 0, 0, 0, TimeScale::GPST)),
            last: Some(Epoch::from_gregorian(2022, 1, 1, 0, 0, 30, 0, TimeScale::GPST)),
            vehicles: vehicles.iter().copied().collect(),
            max_satellites: vehicles.len(),
            ..Default::default()
        }
    }

    #[test]
    fn observed_constellations() {
        let header = Header::default();
        let report = Report::assemble(
            Source::default(),
            header,
            Outcome::new(summary(&[
                SV::new(Constellation::GPS, 1),
                SV::new(Constellation::Glonass, 4),
                SV::new(Constellation::EGNOS, 23),
            ])),
            Vec::new(),
        );
        assert_eq!(
            report.constellations(),
            &BTreeSet::from([Constellation::GPS, Constellation::Glonass, Constellation::SBAS])
        );
        assert_eq!(report.duration(), Some(Duration::from_seconds(30.0)));
        assert!(report.position().is_none());
        assert!(report.declared_constellations().is_empty());
    }

    #[test]
    fn declared_constellations() {
        let mut map = BTreeMap::new();
        map.insert(
            Constellation::GPS,
            vec!["C1C".to_string(), "L1C".to_string()],
        );
        map.insert(Constellation::Galileo, vec!["Z9Z".to_string()]);
        let header = Header {
            observables: Observables::PerSystem(map),
            approx_position: Some((3582105.2910, 532589.7313, 5232754.8054)),
            ..Default::default()
        };
        let report = Report::assemble(
            Source::default(),
            header,
            Outcome::new(summary(&[SV::new(Constellation::GPS, 1)])),
            vec![Warning::MalformedEpoch { line: 10 }],
        );
        assert_eq!(
            report.constellations(),
            &BTreeSet::from([Constellation::GPS])
        );
        assert!(report.position().is_some());
        assert_eq!(report.warnings().len(), 1);
    }
}
