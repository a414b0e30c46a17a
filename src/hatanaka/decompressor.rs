//! CRINEX decompression, line by line
use std::{
    collections::HashMap,
    io::{BufRead, Read},
};

use super::{Error, NumDiff, TextDiff, CRINEX};

use crate::{
    column,
    compression::Compression,
    error::CorruptStream,
    header::split_record,
};

/// Decompression state machine
#[derive(Debug, Copy, Clone, PartialEq)]
enum State {
    /// Expecting "CRINEX VERS   / TYPE"
    Version,
    /// Expecting "CRINEX PROG / DATE"
    Program,
    /// RINEX header, passed through
    Header,
    /// Expecting an epoch descriptor
    Epoch,
    /// Expecting the receiver clock offset line
    Clock,
    /// One line per satellite
    Observations,
    /// Special records of an event, passed through
    SpecialRecords,
}

/// Formats an integer scaled by 10^decimals as a fixed point number
fn fixed_point(value: i64, decimals: u32) -> String {
    let scale = 10_u64.pow(decimals);
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!(
        "{}{}.{:0width$}",
        sign,
        abs / scale,
        abs % scale,
        width = decimals as usize
    )
}

/// [Decompressor] recovers RINEX from CRINEX, one line at a time.
/// It supports both CRINEX1 (RINEX2) and CRINEX3 (RINEX3).
#[derive(Debug)]
pub struct Decompressor {
    state: State,
    crinex: CRINEX,
    /// RINEX2: number of observations per satellite
    shared_types: usize,
    /// RINEX3: number of observations per system letter
    system_types: HashMap<char, usize>,
    /// Epoch descriptor recovery
    epoch: TextDiff,
    /// Satellites of the current epoch
    satellites: Vec<String>,
    /// Next satellite to recover
    sat_index: usize,
    /// Remaining special records
    special: usize,
    /// Receiver clock offset recovery
    clock: Option<NumDiff>,
    /// Observation recovery, per satellite and observable index
    kernels: HashMap<(String, usize), NumDiff>,
    /// Flags recovery, per satellite
    flags: HashMap<String, TextDiff>,
}

impl Default for Decompressor {
    fn default() -> Self {
        Self {
            state: State::Version,
            crinex: CRINEX::default(),
            shared_types: 0,
            system_types: HashMap::new(),
            epoch: TextDiff::default(),
            satellites: Vec::new(),
            sat_index: 0,
            special: 0,
            clock: None,
            kernels: HashMap::new(),
            flags: HashMap::new(),
        }
    }
}

impl Decompressor {
    /// Decompresses one line (without termination).
    /// Recovered lines are appended to `out`, each terminated.
    pub fn decompress_line(&mut self, line: &str, out: &mut String) -> Result<(), Error> {
        match self.state {
            State::Version => {
                let (content, label) = split_record(line);
                if label != "CRINEX VERS   / TYPE" {
                    return Err(Error::NotCrinex);
                }
                self.crinex = self.crinex.with_version_line(content)?;
                if !matches!(self.crinex.version.major, 1 | 3) {
                    return Err(Error::UnsupportedRevision(self.crinex.version.to_string()));
                }
                self.state = State::Program;
            },
            State::Program => {
                let (content, label) = split_record(line);
                if label != "CRINEX PROG / DATE" {
                    return Err(Error::NotCrinex);
                }
                // the compression date is informative only
                self.crinex = match self.crinex.with_prog_date(content) {
                    Ok(crinex) => crinex,
                    Err(_) => {
                        let mut crinex = self.crinex.clone();
                        crinex.prog = column(content, 0, 20).trim().to_string();
                        crinex
                    },
                };
                self.state = State::Header;
            },
            State::Header => {
                self.header_record(line);
                out.push_str(line);
                out.push('\n');
            },
            State::Epoch => {
                if !line.trim().is_empty() {
                    self.epoch_descriptor(line, out)?;
                }
            },
            State::SpecialRecords => {
                out.push_str(line);
                out.push('\n');
                self.special = self.special.saturating_sub(1);
                if self.special == 0 {
                    self.state = State::Epoch;
                }
            },
            State::Clock => {
                let clock = self.recover_clock(line)?;
                self.write_epoch(clock, out);
                self.sat_index = 0;
                self.state = if self.satellites.is_empty() {
                    State::Epoch
                } else {
                    State::Observations
                };
            },
            State::Observations => {
                self.recover_observations(line, out)?;
                self.sat_index += 1;
                if self.sat_index == self.satellites.len() {
                    self.state = State::Epoch;
                }
            },
        }
        Ok(())
    }

    /// Collects the number of observations per satellite
    fn header_record(&mut self, line: &str) {
        let (content, label) = split_record(line);
        match label {
            "# / TYPES OF OBSERV" => {
                if let Ok(n) = column(content, 0, 6).trim().parse::<usize>() {
                    self.shared_types = n;
                }
            },
            "SYS / # / OBS TYPES" => {
                if let Some(letter) = column(content, 0, 1).chars().next() {
                    if letter != ' ' {
                        if let Ok(n) = column(content, 1, 6).trim().parse::<usize>() {
                            self.system_types.insert(letter, n);
                        }
                    }
                }
            },
            "END OF HEADER" => {
                self.state = State::Epoch;
            },
            _ => {},
        }
    }

    fn epoch_descriptor(&mut self, line: &str, out: &mut String) -> Result<(), Error> {
        let v3 = self.crinex.is_rinex3();
        if v3 && line.starts_with('>') {
            self.epoch.force_init(line);
        } else if !v3 && line.starts_with('&') {
            self.epoch.force_init(&format!(" {}", &line[1..]));
        } else {
            self.epoch.decompress(line);
        }
        let desc = self.epoch.as_str().to_string();

        let (flag, count, start) = if v3 {
            (column(&desc, 31, 32), column(&desc, 32, 35), 41)
        } else {
            (column(&desc, 28, 29), column(&desc, 29, 32), 32)
        };
        let count = count
            .trim()
            .parse::<usize>()
            .map_err(|_| Error::EpochDescriptor(desc.clone()))?;

        if matches!(flag, "2" | "3" | "4" | "5") {
            out.push_str(desc.trim_end());
            out.push('\n');
            self.special = count;
            if count > 0 {
                self.state = State::SpecialRecords;
            }
            return Ok(());
        }

        self.satellites.clear();
        for i in 0..count {
            let sv = column(&desc, start + 3 * i, start + 3 * i + 3);
            if sv.len() != 3 {
                return Err(Error::EpochDescriptor(desc.clone()));
            }
            self.satellites.push(sv.to_string());
        }

        // kernels only survive for satellites that remain in sight
        let satellites = &self.satellites;
        self.kernels.retain(|(sv, _), _| satellites.contains(sv));
        self.flags.retain(|sv, _| satellites.contains(sv));

        self.state = State::Clock;
        Ok(())
    }

    fn recover_clock(&mut self, line: &str) -> Result<Option<i64>, Error> {
        let line = line.trim();
        if line.is_empty() {
            self.clock = None;
            return Ok(None);
        }
        if let Some((order, value)) = line.split_once('&') {
            let order = order
                .parse::<usize>()
                .map_err(|_| Error::NumericField(line.to_string()))?;
            let value = value
                .parse::<i64>()
                .map_err(|_| Error::NumericField(line.to_string()))?;
            self.clock = Some(NumDiff::new(order, value)?);
            return Ok(Some(value));
        }
        let diff = line
            .parse::<i64>()
            .map_err(|_| Error::NumericField(line.to_string()))?;
        let clock = self.clock.as_mut().ok_or(Error::UninitializedKernel)?;
        Ok(Some(clock.recover(diff)?))
    }

    fn write_epoch(&self, clock: Option<i64>, out: &mut String) {
        let desc = self.epoch.as_str();
        if self.crinex.is_rinex3() {
            let mut line = column(desc, 0, 35).trim_end().to_string();
            if let Some(clock) = clock {
                line = format!("{:<41}{:>15}", line, fixed_point(clock, 12));
            }
            out.push_str(&line);
            out.push('\n');
            return;
        }

        for (i, chunk) in self.satellites.chunks(12).enumerate() {
            let mut line = if i == 0 {
                column(desc, 0, 32).to_string()
            } else {
                " ".repeat(32)
            };
            line.push_str(&chunk.concat());
            if i == 0 {
                if let Some(clock) = clock {
                    line = format!("{:<68}{:>12}", line, fixed_point(clock, 9));
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        if self.satellites.is_empty() {
            out.push_str(column(desc, 0, 32).trim_end());
            out.push('\n');
        }
    }

    fn recover_observations(&mut self, line: &str, out: &mut String) -> Result<(), Error> {
        let sv = self.satellites[self.sat_index].clone();
        let ntypes = if self.crinex.is_rinex3() {
            let letter = sv.chars().next().unwrap_or(' ');
            *self
                .system_types
                .get(&letter)
                .ok_or_else(|| Error::UndeclaredSystem(sv.clone()))?
        } else {
            self.shared_types
        };

        // space separated fields, an empty field is a missing observation
        let mut values = Vec::<Option<i64>>::with_capacity(ntypes);
        let mut p = 0;
        for index in 0..ntypes {
            let key = (sv.clone(), index);
            if p >= line.len() || line.as_bytes()[p] == b' ' {
                self.kernels.remove(&key);
                values.push(None);
                p += 1;
                continue;
            }
            let end = line[p..].find(' ').map(|e| p + e).unwrap_or(line.len());
            let field = &line[p..end];
            p = end + 1;

            match field.split_once('&') {
                Some((order, value)) => {
                    let order = order
                        .parse::<usize>()
                        .map_err(|_| Error::NumericField(field.to_string()))?;
                    let value = value
                        .parse::<i64>()
                        .map_err(|_| Error::NumericField(field.to_string()))?;
                    self.kernels.insert(key, NumDiff::new(order, value)?);
                    values.push(Some(value));
                },
                None => {
                    let diff = field
                        .parse::<i64>()
                        .map_err(|_| Error::NumericField(field.to_string()))?;
                    let kernel = self
                        .kernels
                        .get_mut(&key)
                        .ok_or(Error::UninitializedKernel)?;
                    values.push(Some(kernel.recover(diff)?));
                },
            }
        }

        // remaining content: LLI and SSI flags, two per observation
        let flags_diff = line.get(p..).unwrap_or("");
        let flags = self.flags.entry(sv.clone()).or_default();
        let flags = flags.decompress(flags_diff).chars().collect::<Vec<_>>();

        let fields = values
            .iter()
            .enumerate()
            .map(|(index, value)| match value {
                Some(value) => format!(
                    "{:>14}{}{}",
                    fixed_point(*value, 3),
                    flags.get(2 * index).unwrap_or(&' '),
                    flags.get(2 * index + 1).unwrap_or(&' '),
                ),
                None => " ".repeat(16),
            })
            .collect::<Vec<_>>();

        if self.crinex.is_rinex3() {
            let line = format!("{}{}", sv, fields.concat());
            out.push_str(line.trim_end());
            out.push('\n');
        } else {
            for chunk in fields.chunks(5) {
                out.push_str(chunk.concat().trim_end());
                out.push('\n');
            }
        }
        Ok(())
    }
}

/// [DecompressorIO] exposes a CRINEX stream as a [Read]able RINEX stream.
pub struct DecompressorIO<R: BufRead> {
    reader: R,
    decompressor: Decompressor,
    /// raw input line
    line: Vec<u8>,
    /// pending output
    output: Vec<u8>,
    /// read pointer in pending output
    rd_ptr: usize,
}

impl<R: BufRead> DecompressorIO<R> {
    /// Builds a new [DecompressorIO] from a buffered CRINEX source
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decompressor: Decompressor::default(),
            line: Vec::with_capacity(128),
            output: Vec::with_capacity(1024),
            rd_ptr: 0,
        }
    }
}

impl<R: BufRead> Read for DecompressorIO<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.rd_ptr == self.output.len() {
            self.output.clear();
            self.rd_ptr = 0;
            self.line.clear();

            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(0);
            }
            while matches!(self.line.last(), Some(b'\n') | Some(b'\r')) {
                self.line.pop();
            }

            let line = String::from_utf8_lossy(&self.line);
            let mut recovered = String::new();
            self.decompressor
                .decompress_line(&line, &mut recovered)
                .map_err(|e| CorruptStream::into_io(Compression::Hatanaka, e))?;
            self.output = recovered.into_bytes();
        }

        let size = std::cmp::min(buf.len(), self.output.len() - self.rd_ptr);
        buf[..size].copy_from_slice(&self.output[self.rd_ptr..self.rd_ptr + size]);
        self.rd_ptr += size;
        Ok(size)
    }
}
