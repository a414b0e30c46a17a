//! Fatal errors and non fatal warnings
use thiserror::Error;

use crate::{
    compression::Compression,
    prelude::{Constellation, Duration, Epoch, RinexType, Version},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that may rise when parsing a single field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("header line too short")]
    HeaderLineTooShort,
    #[error("invalid version \"{0}\"")]
    VersionParsing(String),
    #[error("invalid rinex type \"{0}\"")]
    TypeParsing(String),
    #[error("failed to parse date/time")]
    DatetimeParsing,
    #[error("invalid date/time format")]
    DatetimeFormat,
    #[error("invalid month \"{0}\"")]
    MonthParsing(String),
    #[error("invalid epoch flag \"{0}\"")]
    EpochFlag(String),
    #[error("invalid numeric field \"{0}\"")]
    NumericField(String),
    #[error("invalid satellite identifier \"{0}\"")]
    SatelliteParsing(String),
    #[error("unknown satellite system \"{0}\"")]
    UnknownSystem(String),
}

/// Reasons for which a stream is rejected as non examinable
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("not a RINEX file")]
    NotRinex,
    #[error("not a RINEX observation file ({0})")]
    NotObservation(RinexType),
    #[error("unsupported RINEX version {0}")]
    UnsupportedVersion(Version),
    #[error("\"{extension}\" extension does not match the file content")]
    SignatureMismatch { extension: String },
}

/// Decoder failure, carried inside [std::io::Error] by our streaming decoders
/// so it can be told apart from a genuine I/O error.
#[derive(Error, Debug, Clone)]
#[error("corrupt {compression} stream: {reason}")]
pub struct CorruptStream {
    pub compression: Compression,
    pub reason: String,
}

impl CorruptStream {
    pub(crate) fn into_io(compression: Compression, reason: impl ToString) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            Self {
                compression,
                reason: reason.to_string(),
            },
        )
    }
}

/// Fatal errors: no report is produced
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(std::io::Error),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(#[from] FormatError),
    #[error("{compression} compressed data requires an optional decoder that is missing: {remedy}")]
    DecompressionUnavailable {
        compression: Compression,
        remedy: &'static str,
    },
    #[error("corrupt {compression} stream: {reason}")]
    Decompression {
        compression: Compression,
        reason: String,
    },
    #[error("truncated header: stream ended before END OF HEADER")]
    TruncatedHeader,
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if let Some(corrupt) = e
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<CorruptStream>())
        {
            return Self::Decompression {
                compression: corrupt.compression,
                reason: corrupt.reason.clone(),
            };
        }
        Self::Io(e)
    }
}

/// Non fatal anomalies, accumulated in the report
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Warning {
    #[error("truncated body at line {line}: last epoch is incomplete")]
    TruncatedBody { line: usize, epoch: Option<Epoch> },
    #[error("declared interval ({declared}) differs from calculated interval ({calculated})")]
    IntervalMismatch {
        declared: Duration,
        calculated: Duration,
    },
    #[error("unknown observation code \"{code}\"")]
    UnknownObservationCode {
        constellation: Option<Constellation>,
        code: String,
    },
    #[error("irregular sampling: gaps range from {min} to {max}")]
    IrregularSampling { min: Duration, max: Duration },
    #[error("unknown satellite system \"{0}\"")]
    UnknownSatelliteSystem(String),
    #[error("malformed \"{label}\" header field")]
    MalformedHeaderField { label: String },
    #[error("malformed epoch at line {line}")]
    MalformedEpoch { line: usize },
    #[error("{label} declares {declared} but data says {observed}")]
    HeaderTimeMismatch {
        label: String,
        declared: Epoch,
        observed: Epoch,
    },
    #[error("\"{extension}\" extension but content is {detected}")]
    ExtensionMismatch { extension: String, detected: String },
    #[error("{declared} observation types declared but {listed} listed")]
    ObservationCountMismatch {
        constellation: Option<Constellation>,
        declared: usize,
        listed: usize,
    },
}

/// Records a [Warning] once.
pub(crate) fn push_unique(warnings: &mut Vec<Warning>, warning: Warning) {
    if !warnings.contains(&warning) {
        #[cfg(feature = "log")]
        log::warn!("{}", warning);
        warnings.push(warning);
    }
}

/// [Outcome] is a successful result that may still carry
/// a list of non fatal [Warning]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    /// Builds a clean [Outcome]
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }
    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }
}
