#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

#[macro_use]
extern crate lazy_static;

pub mod codec;
pub mod compression;
pub mod constellation;
pub mod dialect;
pub mod epoch;
pub mod error;
pub mod format;
pub mod hardware;
pub mod header;
pub mod leap;
pub mod marker;
pub mod observable;
pub mod position;
pub mod reader;
pub mod report;
pub mod sampling;
pub mod scanner;
pub mod types;
pub mod version;

#[cfg(feature = "hatanaka")]
#[cfg_attr(docsrs, doc(cfg(feature = "hatanaka")))]
pub mod hatanaka;

#[cfg(feature = "compress")]
#[cfg_attr(docsrs, doc(cfg(feature = "compress")))]
pub mod lzw;

#[cfg(test)]
mod tests;

use std::{
    fs::File,
    io::{Cursor, Read},
    path::Path,
};

use codec::Codecs;
use compression::resolve;
use error::Error;
use format::Format;
use header::Header;
use reader::SourceStream;
use report::{Report, Source};
use scanner::EpochScanner;

#[cfg(feature = "log")]
use log::debug;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        codec::{Capability, Codecs},
        compression::Compression,
        epoch::EpochFlag,
        error::{Error, FormatError, Outcome, ParsingError, Warning},
        examine,
        hardware::{Antenna, Receiver},
        header::{Header, Observables},
        leap::Leap,
        marker::MarkerType,
        position::GeodeticPosition,
        report::{Report, Source},
        sampling::IntervalStatistics,
        scanner::{EpochSummary, MAX_SAMPLING_EPOCHS},
        types::Type as RinexType,
        version::Version,
        Examiner,
    };
    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}

/// Returns `line[start..end]`, clamped to the line length.
/// Short lines are common: trailing blanks are often stripped.
pub(crate) fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

/// [Examiner] runs the examination pipeline: compression layers are
/// stripped, the format is classified, then the header is parsed
/// and the body scanned. Sources are never modified.
#[derive(Debug, Copy, Clone, Default)]
pub struct Examiner {
    codecs: Codecs,
}

impl Examiner {
    /// Builds an [Examiner] with every decoder compiled into this library
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies and returns [Examiner] with specific [Codecs]
    pub fn with_codecs(&self, codecs: Codecs) -> Self {
        let mut s = *self;
        s.codecs = codecs;
        s
    }

    pub fn codecs(&self) -> &Codecs {
        &self.codecs
    }

    /// Examines a local file. The file handle is released
    /// on every exit path.
    pub fn examine_file<P: AsRef<Path>>(&self, path: P) -> Result<Report, Error> {
        let path = path.as_ref();
        let fd = File::open(path)?;
        self.examine_reader(&path.to_string_lossy(), fd)
    }

    /// Examines in memory content. `name` is only used to
    /// cross check the file extension.
    pub fn examine_bytes(&self, name: &str, bytes: Vec<u8>) -> Result<Report, Error> {
        self.examine_reader(name, Cursor::new(bytes))
    }

    /// Examines any [Read]able source.
    pub fn examine_reader<R: Read + 'static>(&self, name: &str, reader: R) -> Result<Report, Error> {
        let resolved = resolve(name, Box::new(reader), &self.codecs)?;
        let mut warnings = resolved.warnings;

        let mut stream = SourceStream::new(resolved.reader);
        let format = Format::detect(&mut stream)?;

        let mut parser = format.parser();
        let header = Header::parse(&mut stream, &format, &mut parser, &mut warnings)?;

        #[cfg(feature = "log")]
        debug!("{}: header parsed, scanning epochs", name);

        let body = EpochScanner::new(parser, &mut stream, &header).scan()?;

        let source = Source {
            name: name.to_string(),
            compression: resolved.layers,
        };
        Ok(Report::assemble(source, header, body, warnings))
    }
}

/// Examines a local file with the default [Examiner]
pub fn examine<P: AsRef<Path>>(path: P) -> Result<Report, Error> {
    Examiner::default().examine_file(path)
}
