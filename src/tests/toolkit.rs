//! Shared test helpers
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::prelude::{Constellation, Epoch, Report, Version, Warning};

/// Builds the path to a file of the test pool
pub fn test_resource(parts: &[&str]) -> PathBuf {
    let mut path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_resources");
    for part in parts {
        path = path.join(part);
    }
    path
}

/// Reads a file of the test pool
pub fn read_resource(parts: &[&str]) -> Vec<u8> {
    std::fs::read(test_resource(parts)).unwrap()
}

/// Formats a header line, label in column 61
pub fn header_line(content: &str, label: &str) -> String {
    format!("{:<60}{}\n", content, label)
}

/// Generates a RINEX3 observation file: one G01 observation per epoch.
/// `segments` are (number of epochs, gap in seconds) and
/// chain from 2022-01-01T00:00:00 GPST.
pub fn synthetic_v3(segments: &[(usize, u64)], interval: Option<f64>) -> String {
    let mut content = header_line(
        "     3.04           OBSERVATION DATA    G",
        "RINEX VERSION / TYPE",
    );
    content.push_str(&header_line("SYNTH", "MARKER NAME"));
    content.push_str(&header_line("G    2 C1C L1C", "SYS / # / OBS TYPES"));
    if let Some(interval) = interval {
        content.push_str(&header_line(&format!("{:10.3}", interval), "INTERVAL"));
    }
    content.push_str(&header_line("", "END OF HEADER"));

    let mut t = 0_u64;
    let mut first = true;
    for (count, gap) in segments {
        for _ in 0..*count {
            if !first {
                t += gap;
            }
            first = false;
            content.push_str(&format!(
                "> 2022 01 {:02} {:02} {:02} {:2}.0000000  0  1\n",
                1 + t / 86400,
                (t / 3600) % 24,
                (t / 60) % 60,
                t % 60,
            ));
            content.push_str("G01  24821356.079   109392463.266 7\n");
        }
    }
    content
}

/// Verifies the main attributes of an examination [Report]
#[allow(clippy::too_many_arguments)]
pub fn generic_observation_test(
    report: &Report,
    version: &str,
    marker: &str,
    epochs: usize,
    events: usize,
    first: &str,
    last: &str,
    constellations: &[Constellation],
) {
    assert_eq!(
        report.version(),
        Version::from_str(version).unwrap(),
        "bad version"
    );
    assert_eq!(
        report.header().marker_name.as_deref(),
        Some(marker),
        "bad marker name"
    );
    assert_eq!(report.epochs(), epochs, "bad number of epochs");
    assert_eq!(report.events(), events, "bad number of events");
    assert_eq!(
        report.first_epoch(),
        Some(Epoch::from_str(first).unwrap()),
        "bad first epoch"
    );
    assert_eq!(
        report.last_epoch(),
        Some(Epoch::from_str(last).unwrap()),
        "bad last epoch"
    );
    let expected = constellations.iter().copied().collect::<BTreeSet<_>>();
    assert_eq!(report.constellations(), &expected, "bad constellations");
}

/// True if a [Warning] of this kind was raised
pub fn has_warning(report: &Report, f: fn(&Warning) -> bool) -> bool {
    report.warnings().iter().any(f)
}
