//! Revision specific header records and epoch layouts.
//!
//! RINEX2 and RINEX3 differ in how observation codes are declared
//! and in how an epoch and its satellites are laid out. Both revisions
//! implement [HeaderParsing] and [EpochParsing]; [Parser] is the variant
//! picked once by the format detection.
use crate::{
    column,
    constellation::{from_letter, parse_vehicle},
    epoch::{self, EpochFlag},
    error::{push_unique, Error, ParsingError, Warning},
    header::{split_record, Header, Observables},
    observable::{is_known_v2, is_known_v3},
    prelude::{Constellation, Epoch, SV},
    reader::SourceStream,
};

use std::collections::BTreeMap;

/// Number of satellites per RINEX2 epoch line
const V2_SATELLITES_PER_LINE: usize = 12;

/// Number of observations per RINEX2 data line
const V2_OBSERVATIONS_PER_LINE: usize = 5;

/// Revision specific header records
pub trait HeaderParsing {
    /// Handles a header record. Returns false if the label is unknown.
    fn parse_header_record(
        &mut self,
        label: &str,
        content: &str,
        header: &mut Header,
        warnings: &mut Vec<Warning>,
    ) -> bool;
    /// Called once END OF HEADER has been reached
    fn finish_header(&mut self, header: &mut Header, warnings: &mut Vec<Warning>);
}

/// A single observation epoch: its timestamp and the vehicles it lists.
/// Observation values are read past, never retained.
#[derive(Clone, Debug, PartialEq)]
pub struct EpochRecord {
    pub epoch: Epoch,
    pub flag: EpochFlag,
    pub vehicles: Vec<SV>,
}

/// Outcome of one [EpochParsing::next_epoch] step
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Complete observation epoch
    Observation(EpochRecord),
    /// Event (flags 2 to 5) and its special records were consumed
    Event(EpochFlag),
    /// Stream ended in the middle of an epoch
    Truncated { line: usize, epoch: Option<Epoch> },
    /// Unexpected content: the parser resynchronizes on the next epoch
    Malformed { line: usize },
}

/// Revision specific epoch layout
pub trait EpochParsing {
    /// Consumes the next epoch. Returns None at end of stream.
    fn next_epoch(
        &mut self,
        stream: &mut SourceStream,
        header: &Header,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<Step>, Error>;
}

/// Blank system letters are allowed in single constellation files
fn default_system(header: &Header) -> Constellation {
    match header.constellation {
        Constellation::Mixed => Constellation::GPS,
        c => c,
    }
}

/// Parses a vehicle identifier, reporting unknown systems.
/// Returns Err for identifiers that are not a vehicle at all.
fn vehicle(
    id: &str,
    header: &Header,
    warnings: &mut Vec<Warning>,
) -> Result<Option<SV>, ParsingError> {
    match parse_vehicle(id, default_system(header)) {
        Ok(sv) => Ok(Some(sv)),
        Err(ParsingError::UnknownSystem(letter)) => {
            push_unique(warnings, Warning::UnknownSatelliteSystem(letter));
            Ok(None)
        },
        Err(e) => Err(e),
    }
}

fn malformed(stream: &mut SourceStream, epoch: Option<Epoch>) -> Result<Step, Error> {
    if stream.at_end()? {
        Ok(Step::Truncated {
            line: stream.line_number(),
            epoch,
        })
    } else {
        #[cfg(feature = "log")]
        log::debug!("malformed epoch at line {}: resynchronizing", stream.line_number());
        Ok(Step::Malformed {
            line: stream.line_number(),
        })
    }
}

/// Skips the special records of an event,
/// handing each of them to `f`.
fn skip_special_records<F: FnMut(&str)>(
    stream: &mut SourceStream,
    count: usize,
    mut f: F,
) -> Result<bool, Error> {
    for _ in 0..count {
        match stream.next_line()? {
            Some(line) => f(&line),
            None => return Ok(false),
        }
    }
    Ok(true)
}

/// RINEX2 observations
#[derive(Debug, Default, Clone)]
pub struct Version2Parser {
    /// Declared number of observation types
    declared: Option<usize>,
    /// Listed observation codes
    codes: Vec<String>,
    /// Observation types per satellite, which defines the body layout
    n_types: usize,
    /// True while looking for the next valid epoch
    desync: bool,
}

impl Version2Parser {
    /// Handles "# / TYPES OF OBSERV" and its continuation lines
    fn types_record(&mut self, content: &str) {
        let count = column(content, 0, 6).trim();
        if !count.is_empty() {
            self.declared = count.parse::<usize>().ok();
            self.codes.clear();
        }
        self.codes.extend(
            column(content, 6, 60)
                .split_ascii_whitespace()
                .map(|code| code.to_string()),
        );
        self.n_types = self.declared.unwrap_or(self.codes.len());
    }

    /// Number of data lines per satellite
    fn lines_per_satellite(&self) -> usize {
        self.n_types.div_ceil(V2_OBSERVATIONS_PER_LINE).max(1)
    }
}

impl HeaderParsing for Version2Parser {
    fn parse_header_record(
        &mut self,
        label: &str,
        content: &str,
        header: &mut Header,
        _: &mut Vec<Warning>,
    ) -> bool {
        if label != "# / TYPES OF OBSERV" {
            return false;
        }
        self.types_record(content);
        header.observables = Observables::Shared(self.codes.clone());
        true
    }

    fn finish_header(&mut self, _: &mut Header, warnings: &mut Vec<Warning>) {
        if let Some(declared) = self.declared {
            if declared != self.codes.len() {
                push_unique(
                    warnings,
                    Warning::ObservationCountMismatch {
                        constellation: None,
                        declared,
                        listed: self.codes.len(),
                    },
                );
            }
        }
        for code in self.codes.iter() {
            if !is_known_v2(code) {
                push_unique(
                    warnings,
                    Warning::UnknownObservationCode {
                        constellation: None,
                        code: code.clone(),
                    },
                );
            }
        }
    }
}

impl EpochParsing for Version2Parser {
    fn next_epoch(
        &mut self,
        stream: &mut SourceStream,
        header: &Header,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<Step>, Error> {
        let ts = header.timescale();
        loop {
            let line = match stream.next_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            if line.trim().is_empty() {
                continue;
            }

            let parsed = match epoch::parse_v2(&line, ts) {
                Ok(parsed) => parsed,
                Err(_) => {
                    if self.desync {
                        continue;
                    }
                    self.desync = true;
                    return malformed(stream, None).map(Some);
                },
            };
            self.desync = false;

            if parsed.flag.is_event() {
                let redefinition = parsed.flag == EpochFlag::HeaderInformationFollows;
                let complete = skip_special_records(stream, parsed.count, |record| {
                    let (content, label) = split_record(record);
                    if redefinition && label == "# / TYPES OF OBSERV" {
                        self.types_record(content);
                    }
                })?;
                if !complete {
                    return Ok(Some(Step::Truncated {
                        line: stream.line_number(),
                        epoch: parsed.epoch,
                    }));
                }
                return Ok(Some(Step::Event(parsed.flag)));
            }

            let epoch = match parsed.epoch {
                Some(epoch) => epoch,
                None => return malformed(stream, None).map(Some),
            };

            // satellites list, continued every 12 slots
            let mut vehicles = Vec::with_capacity(parsed.count);
            let mut current = line;
            for i in 0..parsed.count {
                let slot = i % V2_SATELLITES_PER_LINE;
                if i > 0 && slot == 0 {
                    current = match stream.next_line()? {
                        Some(line) => line,
                        None => {
                            return Ok(Some(Step::Truncated {
                                line: stream.line_number(),
                                epoch: Some(epoch),
                            }))
                        },
                    };
                }
                let id = column(&current, 32 + 3 * slot, 35 + 3 * slot);
                match vehicle(id, header, warnings) {
                    Ok(Some(sv)) => vehicles.push(sv),
                    Ok(None) => {},
                    Err(_) => {
                        self.desync = true;
                        return malformed(stream, Some(epoch)).map(Some);
                    },
                }
            }

            // observations are read past
            let lines = parsed.count * self.lines_per_satellite();
            for _ in 0..lines {
                if stream.next_line()?.is_none() {
                    return Ok(Some(Step::Truncated {
                        line: stream.line_number(),
                        epoch: Some(epoch),
                    }));
                }
            }

            return Ok(Some(Step::Observation(EpochRecord {
                epoch,
                flag: parsed.flag,
                vehicles,
            })));
        }
    }
}

/// RINEX3 observations
#[derive(Debug, Default, Clone)]
pub struct Version3Parser {
    /// Declared number of observation types, per system
    declared: BTreeMap<Constellation, usize>,
    /// System being described by "SYS / # / OBS TYPES" continuation lines.
    /// None after an unknown system letter.
    current: Option<Constellation>,
    /// True while looking for the next valid epoch
    desync: bool,
}

impl HeaderParsing for Version3Parser {
    fn parse_header_record(
        &mut self,
        label: &str,
        content: &str,
        header: &mut Header,
        warnings: &mut Vec<Warning>,
    ) -> bool {
        if label != "SYS / # / OBS TYPES" {
            return false;
        }

        let letter = column(content, 0, 1);
        if !letter.trim().is_empty() {
            self.current = letter.chars().next().and_then(from_letter);
            match self.current {
                Some(constellation) => {
                    if let Ok(declared) = column(content, 1, 6).trim().parse::<usize>() {
                        self.declared.insert(constellation, declared);
                    }
                },
                None => {
                    push_unique(warnings, Warning::UnknownSatelliteSystem(letter.to_string()));
                },
            }
        }

        let constellation = match self.current {
            Some(constellation) => constellation,
            None => return true,
        };

        if !matches!(header.observables, Observables::PerSystem(_)) {
            header.observables = Observables::PerSystem(BTreeMap::new());
        }
        if let Observables::PerSystem(map) = &mut header.observables {
            let codes = map.entry(constellation).or_default();
            if !letter.trim().is_empty() {
                codes.clear();
            }
            codes.extend(
                column(content, 6, 60)
                    .split_ascii_whitespace()
                    .map(|code| code.to_string()),
            );
        }
        true
    }

    fn finish_header(&mut self, header: &mut Header, warnings: &mut Vec<Warning>) {
        let map = match &header.observables {
            Observables::PerSystem(map) => map,
            Observables::Shared(_) => return,
        };
        for (constellation, codes) in map.iter() {
            if let Some(declared) = self.declared.get(constellation) {
                if *declared != codes.len() {
                    push_unique(
                        warnings,
                        Warning::ObservationCountMismatch {
                            constellation: Some(*constellation),
                            declared: *declared,
                            listed: codes.len(),
                        },
                    );
                }
            }
            for code in codes.iter() {
                if !is_known_v3(*constellation, code) {
                    push_unique(
                        warnings,
                        Warning::UnknownObservationCode {
                            constellation: Some(*constellation),
                            code: code.clone(),
                        },
                    );
                }
            }
        }
    }
}

impl EpochParsing for Version3Parser {
    fn next_epoch(
        &mut self,
        stream: &mut SourceStream,
        header: &Header,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<Step>, Error> {
        let ts = header.timescale();
        loop {
            let line = match stream.next_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            if line.trim().is_empty() {
                continue;
            }

            let parsed = match epoch::parse_v3(&line, ts) {
                Ok(parsed) => parsed,
                Err(_) => {
                    if self.desync {
                        continue;
                    }
                    self.desync = true;
                    return malformed(stream, None).map(Some);
                },
            };
            self.desync = false;

            if parsed.flag.is_event() {
                if !skip_special_records(stream, parsed.count, |_| {})? {
                    return Ok(Some(Step::Truncated {
                        line: stream.line_number(),
                        epoch: parsed.epoch,
                    }));
                }
                return Ok(Some(Step::Event(parsed.flag)));
            }

            let epoch = match parsed.epoch {
                Some(epoch) => epoch,
                None => return malformed(stream, None).map(Some),
            };

            // one line per satellite, starting with its identifier
            let mut vehicles = Vec::with_capacity(parsed.count);
            for _ in 0..parsed.count {
                let line = match stream.next_line()? {
                    Some(line) => line,
                    None => {
                        return Ok(Some(Step::Truncated {
                            line: stream.line_number(),
                            epoch: Some(epoch),
                        }))
                    },
                };
                if line.starts_with('>') {
                    // interrupted epoch: drop it, resume on this marker
                    stream.push_back(line);
                    return Ok(Some(Step::Malformed {
                        line: stream.line_number() + 1,
                    }));
                }
                match vehicle(column(&line, 0, 3), header, warnings) {
                    Ok(Some(sv)) => vehicles.push(sv),
                    Ok(None) => {},
                    Err(_) => {
                        self.desync = true;
                        return malformed(stream, Some(epoch)).map(Some);
                    },
                }
            }

            return Ok(Some(Step::Observation(EpochRecord {
                epoch,
                flag: parsed.flag,
                vehicles,
            })));
        }
    }
}

/// Revision specific parser, selected once by [crate::format::Format::parser]
#[derive(Debug, Clone)]
pub enum Parser {
    V2(Version2Parser),
    V3(Version3Parser),
}

impl HeaderParsing for Parser {
    fn parse_header_record(
        &mut self,
        label: &str,
        content: &str,
        header: &mut Header,
        warnings: &mut Vec<Warning>,
    ) -> bool {
        match self {
            Self::V2(p) => p.parse_header_record(label, content, header, warnings),
            Self::V3(p) => p.parse_header_record(label, content, header, warnings),
        }
    }
    fn finish_header(&mut self, header: &mut Header, warnings: &mut Vec<Warning>) {
        match self {
            Self::V2(p) => p.finish_header(header, warnings),
            Self::V3(p) => p.finish_header(header, warnings),
        }
    }
}

impl EpochParsing for Parser {
    fn next_epoch(
        &mut self,
        stream: &mut SourceStream,
        header: &Header,
        warnings: &mut Vec<Warning>,
    ) -> Result<Option<Step>, Error> {
        match self {
            Self::V2(p) => p.next_epoch(stream, header, warnings),
            Self::V3(p) => p.next_epoch(stream, header, warnings),
        }
    }
}
