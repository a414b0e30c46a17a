//! Sampling interval analysis
use crate::prelude::{Duration, Epoch};
use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gaps below this value are considered duplicated epochs
const MIN_INTERVAL_NANOS: i128 = 1_000_000;

/// Gaps above this value are considered data gaps, not sampling
const MAX_INTERVAL_NANOS: i128 = 3_600_000_000_000;

/// Maximal spread of the gaps, relative to their mean,
/// for the sampling to be considered steady (in percent).
const STEADY_SPREAD_PERCENT: i128 = 1;

/// [IntervalStatistics] describes the gaps between consecutive epochs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntervalStatistics {
    /// Number of epochs analyzed
    pub epochs: usize,
    /// Smallest gap
    pub min: Duration,
    /// Largest gap
    pub max: Duration,
    /// Median gap (lower middle value)
    pub median: Duration,
    /// Most frequent gap
    pub mode: Duration,
    /// Average gap
    pub mean: Duration,
    /// Gaps population, in ascending order
    pub histogram: Vec<(Duration, usize)>,
}

impl IntervalStatistics {
    /// Analyzes the gaps between consecutive [Epoch]s.
    /// Gaps outside of [1 ms, 1 h] are ignored.
    /// Returns None when no valid gap exists.
    pub fn from_epochs(epochs: &[Epoch]) -> Option<Self> {
        let mut gaps = epochs
            .windows(2)
            .map(|w| (w[1] - w[0]).total_nanoseconds())
            .filter(|dt| (MIN_INTERVAL_NANOS..=MAX_INTERVAL_NANOS).contains(dt))
            .collect::<Vec<_>>();

        if gaps.is_empty() {
            return None;
        }
        gaps.sort_unstable();

        let n = gaps.len();
        let mean = gaps.iter().sum::<i128>() / n as i128;

        let histogram = gaps
            .iter()
            .dedup_with_count()
            .map(|(pop, dt)| (*dt, pop))
            .collect::<Vec<_>>();

        // ties are resolved to the smallest gap
        let mut mode = histogram[0];
        for (dt, pop) in histogram.iter() {
            if *pop > mode.1 {
                mode = (*dt, *pop);
            }
        }

        Some(Self {
            epochs: epochs.len(),
            min: Duration::from_total_nanoseconds(gaps[0]),
            max: Duration::from_total_nanoseconds(gaps[n - 1]),
            median: Duration::from_total_nanoseconds(gaps[(n - 1) / 2]),
            mode: Duration::from_total_nanoseconds(mode.0),
            mean: Duration::from_total_nanoseconds(mean),
            histogram: histogram
                .into_iter()
                .map(|(dt, pop)| (Duration::from_total_nanoseconds(dt), pop))
                .collect(),
        })
    }

    /// Returns the calculated sampling interval, which is the dominant gap.
    /// It is authoritative over the declared interval.
    pub fn calculated_interval(&self) -> Duration {
        self.mode
    }

    /// True if all gaps are within 1% of the mean gap
    pub fn is_steady(&self) -> bool {
        let spread = self.max.total_nanoseconds() - self.min.total_nanoseconds();
        spread * 100 <= self.mean.total_nanoseconds() * STEADY_SPREAD_PERCENT
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::TimeScale;

    fn epochs(offsets_s: &[i64]) -> Vec<Epoch> {
        let t0 = Epoch::from_gregorian(2021, 12, 21, 0, 0, 0, 0, TimeScale::GPST);
        offsets_s
            .iter()
            .map(|s| t0 + Duration::from_seconds(*s as f64))
            .collect()
    }

    #[test]
    fn steady() {
        let stats = IntervalStatistics::from_epochs(&epochs(&[0, 30, 60, 90, 120])).unwrap();
        assert_eq!(stats.epochs, 5);
        assert_eq!(stats.min, Duration::from_seconds(30.0));
        assert_eq!(stats.max, Duration::from_seconds(30.0));
        assert_eq!(stats.mode, Duration::from_seconds(30.0));
        assert_eq!(stats.median, Duration::from_seconds(30.0));
        assert_eq!(stats.mean, Duration::from_seconds(30.0));
        assert_eq!(stats.histogram, vec![(Duration::from_seconds(30.0), 4)]);
        assert!(stats.is_steady());
    }

    #[test]
    fn irregular() {
        // gaps: 15 15 30 60 15
        let stats = IntervalStatistics::from_epochs(&epochs(&[0, 15, 30, 60, 120, 135])).unwrap();
        assert_eq!(stats.min, Duration::from_seconds(15.0));
        assert_eq!(stats.max, Duration::from_seconds(60.0));
        assert_eq!(stats.mode, Duration::from_seconds(15.0));
        assert_eq!(stats.median, Duration::from_seconds(15.0));
        assert_eq!(stats.mean, Duration::from_seconds(27.0));
        assert_eq!(stats.calculated_interval(), Duration::from_seconds(15.0));
        assert!(!stats.is_steady());
        assert_eq!(
            stats.histogram,
            vec![
                (Duration::from_seconds(15.0), 3),
                (Duration::from_seconds(30.0), 1),
                (Duration::from_seconds(60.0), 1),
            ]
        );
    }

    #[test]
    fn mode_ties() {
        // gaps: 30 10 30 10
        let stats = IntervalStatistics::from_epochs(&epochs(&[0, 30, 40, 70, 80])).unwrap();
        assert_eq!(stats.mode, Duration::from_seconds(10.0));
        // lower middle
        assert_eq!(stats.median, Duration::from_seconds(10.0));
    }

    #[test]
    fn filtered_gaps() {
        // duplicated epoch and a 2 hour data gap are not sampling
        let stats = IntervalStatistics::from_epochs(&epochs(&[0, 0, 30, 7230, 7260])).unwrap();
        assert_eq!(stats.histogram, vec![(Duration::from_seconds(30.0), 2)]);
        assert!(IntervalStatistics::from_epochs(&epochs(&[0])).is_none());
        assert!(IntervalStatistics::from_epochs(&[]).is_none());
        assert!(IntervalStatistics::from_epochs(&epochs(&[0, 0])).is_none());
    }
}
