//! Observation body scanning
use std::collections::BTreeSet;

use crate::{
    dialect::{EpochParsing, Step},
    error::{push_unique, Error, Outcome, Warning},
    header::Header,
    prelude::{Epoch, SV},
    reader::SourceStream,
    sampling::IntervalStatistics,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interval statistics are derived from this many leading epochs, at most.
/// This bounds the analysis cost whatever the file size.
pub const MAX_SAMPLING_EPOCHS: usize = 100;

/// [EpochSummary] is what remains of the observation body once scanned.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpochSummary {
    /// Number of observation epochs
    pub count: usize,
    /// Number of event epochs (flags 2 to 5)
    pub events: usize,
    /// First observation epoch
    pub first: Option<Epoch>,
    /// Last observation epoch
    pub last: Option<Epoch>,
    /// Sampling analysis of the leading epochs
    pub sampling: Option<IntervalStatistics>,
    /// Vehicles encountered
    pub vehicles: BTreeSet<SV>,
    /// Largest number of satellites in one epoch
    pub max_satellites: usize,
}

/// [EpochScanner] streams the observation body,
/// one epoch at a time, and folds it into an [EpochSummary].
pub struct EpochScanner<'a, P: EpochParsing> {
    parser: P,
    stream: &'a mut SourceStream,
    header: &'a Header,
}

impl<'a, P: EpochParsing> EpochScanner<'a, P> {
    pub fn new(parser: P, stream: &'a mut SourceStream, header: &'a Header) -> Self {
        Self {
            parser,
            stream,
            header,
        }
    }

    /// Scans until end of stream. Truncated or malformed content
    /// is reported as [Warning]s: only I/O and decoding errors are fatal.
    pub fn scan(mut self) -> Result<Outcome<EpochSummary>, Error> {
        let mut summary = EpochSummary::default();
        let mut warnings = Vec::<Warning>::new();
        let mut sampled = Vec::<Epoch>::with_capacity(MAX_SAMPLING_EPOCHS);
        let mut truncated = false;

        while let Some(step) = self
            .parser
            .next_epoch(self.stream, self.header, &mut warnings)?
        {
            match step {
                Step::Observation(record) => {
                    summary.count += 1;
                    if summary.first.is_none() {
                        summary.first = Some(record.epoch);
                    }
                    summary.last = Some(record.epoch);
                    if sampled.len() < MAX_SAMPLING_EPOCHS {
                        sampled.push(record.epoch);
                    }
                    summary.max_satellites = summary.max_satellites.max(record.vehicles.len());
                    summary.vehicles.extend(record.vehicles);
                },
                Step::Event(_) => {
                    summary.events += 1;
                },
                Step::Malformed { line } => {
                    push_unique(&mut warnings, Warning::MalformedEpoch { line });
                },
                Step::Truncated { line, epoch } => {
                    push_unique(&mut warnings, Warning::TruncatedBody { line, epoch });
                    truncated = true;
                    break;
                },
            }
        }

        summary.sampling = IntervalStatistics::from_epochs(&sampled);
        self.consistency_checks(&summary, truncated, &mut warnings);

        Ok(Outcome::with_warnings(summary, warnings))
    }

    /// Cross checks the body against the header.
    /// A truncated body cannot reach the declared last epoch.
    fn consistency_checks(
        &self,
        summary: &EpochSummary,
        truncated: bool,
        warnings: &mut Vec<Warning>,
    ) {
        if let Some(stats) = &summary.sampling {
            let calculated = stats.calculated_interval();
            if let Some(declared) = self.header.sampling_interval {
                if declared != calculated {
                    push_unique(
                        warnings,
                        Warning::IntervalMismatch {
                            declared,
                            calculated,
                        },
                    );
                }
            }
            if !stats.is_steady() {
                push_unique(
                    warnings,
                    Warning::IrregularSampling {
                        min: stats.min,
                        max: stats.max,
                    },
                );
            }
        }

        for (label, declared, observed) in [
            ("TIME OF FIRST OBS", self.header.first_epoch, summary.first),
            ("TIME OF LAST OBS", self.header.last_epoch, summary.last),
        ] {
            if truncated && label == "TIME OF LAST OBS" {
                continue;
            }
            if let (Some(declared), Some(observed)) = (declared, observed) {
                if declared != observed {
                    push_unique(
                        warnings,
                        Warning::HeaderTimeMismatch {
                            label: label.to_string(),
                            declared,
                            observed,
                        },
                    );
                }
            }
        }
    }
}
