//! Describes a `RINEX` observation header
use crate::{
    column,
    constellation::default_timescale,
    dialect::{HeaderParsing, Parser},
    epoch::parse_header_time,
    error::{push_unique, Error, Warning},
    format::Format,
    hardware::{Antenna, Receiver},
    leap::Leap,
    marker::MarkerType,
    prelude::{Constellation, Duration, Epoch, RinexType, TimeScale, Version},
    reader::SourceStream,
};

use std::{collections::BTreeMap, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Observation types, as declared in the header.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Observables {
    /// RINEX2: one list shared by all satellite systems
    Shared(Vec<String>),
    /// RINEX3: one list per satellite system
    PerSystem(BTreeMap<Constellation, Vec<String>>),
}

impl Default for Observables {
    fn default() -> Self {
        Self::Shared(Vec::new())
    }
}

impl Observables {
    /// Returns the codes that apply to given [Constellation]
    pub fn codes(&self, constellation: Constellation) -> Option<&[String]> {
        match self {
            Self::Shared(codes) => Some(codes.as_slice()),
            Self::PerSystem(map) => map.get(&constellation).map(|codes| codes.as_slice()),
        }
    }
    /// True if no code was declared at all
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Shared(codes) => codes.is_empty(),
            Self::PerSystem(map) => map.values().all(|codes| codes.is_empty()),
        }
    }
}

/// Describes a `RINEX` observation file header
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// revision for this `RINEX`
    pub version: Version,
    /// type of `RINEX` file
    pub rinex_type: RinexType,
    /// satellite system declared in the version line
    pub constellation: Constellation,
    /// program name
    pub program: Option<String>,
    /// program `run by`
    pub run_by: Option<String>,
    /// program's `date`, as written
    pub date: Option<String>,
    /// comments extracted from `header` section
    pub comments: Vec<String>,
    /// station label
    pub marker_name: Option<String>,
    /// station identifier
    pub marker_number: Option<String>,
    /// marker type
    pub marker_type: Option<MarkerType>,
    /// observer
    pub observer: Option<String>,
    /// observer's agency
    pub agency: Option<String>,
    /// optionnal receiver infos
    pub receiver: Option<Receiver>,
    /// optionnal antenna infos
    pub antenna: Option<Antenna>,
    /// station approximate coordinates, in meter ECEF.
    /// Absent when not declared or declared as (0, 0, 0).
    pub approx_position: Option<(f64, f64, f64)>,
    /// declared sampling interval
    pub sampling_interval: Option<Duration>,
    /// TIME OF FIRST OBS
    pub first_epoch: Option<Epoch>,
    /// TIME OF LAST OBS
    pub last_epoch: Option<Epoch>,
    /// time system declared next to TIME OF FIRST OBS
    pub time_system: Option<TimeScale>,
    /// possible `leap seconds` counter
    pub leap: Option<Leap>,
    /// observation codes
    pub observables: Observables,
    /// receiver clock offsets have been applied to the data
    pub clock_offset_applied: bool,
    /// # OF SATELLITES
    pub satellites: Option<usize>,
    /// SIGNAL STRENGTH UNIT
    pub signal_strength_unit: Option<String>,
}

/// Trimmed field, None when blank
fn declared(field: &str) -> Option<String> {
    let field = field.trim();
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

/// Splits a header line into its content (columns 1-60) and label.
pub(crate) fn split_record(line: &str) -> (&str, &str) {
    match line.get(60..) {
        Some(label) => (column(line, 0, 60), label.trim()),
        None => (line, ""),
    }
}

fn parse_float(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    // some producers use Fortran D exponents
    f64::from_str(&field.replace(['D', 'd'], "E")).ok()
}

fn parse_triplet(content: &str) -> Option<(f64, f64, f64)> {
    Some((
        parse_float(column(content, 0, 14))?,
        parse_float(column(content, 14, 28))?,
        parse_float(column(content, 28, 42))?,
    ))
}

impl Header {
    pub(crate) fn new(format: &Format) -> Self {
        Self {
            version: format.version,
            rinex_type: format.rinex_type,
            constellation: format.constellation,
            ..Default::default()
        }
    }

    /// [TimeScale] this file is expressed in
    pub fn timescale(&self) -> TimeScale {
        self.time_system
            .unwrap_or_else(|| default_timescale(self.constellation))
    }

    /// Parses all header records following the version line,
    /// up to and including END OF HEADER.
    pub fn parse(
        stream: &mut SourceStream,
        format: &Format,
        parser: &mut Parser,
        warnings: &mut Vec<Warning>,
    ) -> Result<Self, Error> {
        let mut header = Self::new(format);

        loop {
            let line = match stream.next_line()? {
                Some(line) => line,
                None => return Err(Error::TruncatedHeader),
            };
            let (content, label) = split_record(&line);
            if label == "END OF HEADER" {
                break;
            }
            if !header.parse_record(label, content, warnings) {
                // revision specific or unknown (ignored)
                let _ = parser.parse_header_record(label, content, &mut header, warnings);
            }
        }

        parser.finish_header(&mut header, warnings);

        // a header that is not followed by any epoch
        // is the most common form of truncation
        if stream.at_end()? {
            return Err(Error::TruncatedHeader);
        }
        Ok(header)
    }

    /// Parses the records common to both revisions.
    /// Returns false if this record was not handled.
    fn parse_record(&mut self, label: &str, content: &str, warnings: &mut Vec<Warning>) -> bool {
        let mut malformed = false;
        match label {
            "PGM / RUN BY / DATE" => {
                self.program = declared(column(content, 0, 20));
                self.run_by = declared(column(content, 20, 40));
                self.date = declared(column(content, 40, 60));
            },
            "COMMENT" => {
                self.comments.push(content.trim_end().to_string());
            },
            "MARKER NAME" => {
                self.marker_name = declared(content);
            },
            "MARKER NUMBER" => {
                self.marker_number = declared(column(content, 0, 20));
            },
            "MARKER TYPE" => match MarkerType::from_str(column(content, 0, 20).trim()) {
                Ok(marker_type) => self.marker_type = Some(marker_type),
                Err(_) => malformed = true,
            },
            "OBSERVER / AGENCY" => {
                self.observer = declared(column(content, 0, 20));
                self.agency = declared(column(content, 20, 60));
            },
            "REC # / TYPE / VERS" => {
                self.receiver = Some(Receiver::from_content(content));
            },
            "ANT # / TYPE" => {
                let parsed = Antenna::from_content(content);
                let antenna = self.antenna.get_or_insert_with(Antenna::default);
                antenna.sn = parsed.sn;
                antenna.model = parsed.model;
            },
            "APPROX POSITION XYZ" => match parse_triplet(content) {
                Some((x, y, z)) => {
                    self.approx_position = if x == 0.0 && y == 0.0 && z == 0.0 {
                        None
                    } else {
                        Some((x, y, z))
                    };
                },
                None => malformed = true,
            },
            "ANTENNA: DELTA H/E/N" => match parse_triplet(content) {
                Some((h, e, n)) => {
                    let antenna = self.antenna.get_or_insert_with(Antenna::default);
                    *antenna = antenna
                        .with_height(h)
                        .with_eastern_component(e)
                        .with_northern_component(n);
                },
                None => malformed = true,
            },
            "INTERVAL" => match parse_float(column(content, 0, 10)) {
                Some(interval) if interval > 0.0 => {
                    self.sampling_interval = Some(Duration::from_seconds(interval));
                },
                // 0.000 is used to say "unknown"
                Some(_) => {},
                None => malformed = true,
            },
            "TIME OF FIRST OBS" => {
                match parse_header_time(content, default_timescale(self.constellation)) {
                    Ok((epoch, system)) => {
                        self.first_epoch = Some(epoch);
                        self.time_system = system;
                    },
                    Err(_) => malformed = true,
                }
            },
            "TIME OF LAST OBS" => match parse_header_time(content, self.timescale()) {
                Ok((epoch, _)) => self.last_epoch = Some(epoch),
                Err(_) => malformed = true,
            },
            "LEAP SECONDS" => match Leap::from_str(content) {
                Ok(leap) => self.leap = Some(leap),
                Err(_) => malformed = true,
            },
            "RCV CLOCK OFFS APPL" => match column(content, 0, 6).trim() {
                "1" => self.clock_offset_applied = true,
                "0" | "" => self.clock_offset_applied = false,
                _ => malformed = true,
            },
            "# OF SATELLITES" => match column(content, 0, 6).trim().parse::<usize>() {
                Ok(n) => self.satellites = Some(n),
                Err(_) => malformed = true,
            },
            "SIGNAL STRENGTH UNIT" => {
                let unit = column(content, 0, 20).trim();
                if !unit.is_empty() {
                    self.signal_strength_unit = Some(unit.to_string());
                }
            },
            _ => return false,
        }
        if malformed {
            push_unique(
                warnings,
                Warning::MalformedHeaderField {
                    label: label.to_string(),
                },
            );
        }
        true
    }
}
