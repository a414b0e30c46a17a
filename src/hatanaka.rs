//! CRINEX (compact RINEX) decompression,
//! as designed by Y. Hatanaka.
use thiserror::Error;

mod crinex;
mod decompressor;
mod numdiff;
mod textdiff;

pub use crinex::CRINEX;
pub use decompressor::{Decompressor, DecompressorIO};
pub use numdiff::NumDiff;
pub use textdiff::TextDiff;

use crate::error::ParsingError;

/// Hatanaka decompression related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("not a CRINEX stream: first line should be CRINEX VERS / TYPE")]
    NotCrinex,
    #[error("unsupported CRINEX revision {0}")]
    UnsupportedRevision(String),
    #[error("CRINEX header error: {0}")]
    Header(#[from] ParsingError),
    #[error("order cannot be greater than {0}")]
    OrderTooBig(usize),
    #[error("invalid epoch descriptor \"{0}\"")]
    EpochDescriptor(String),
    #[error("no observation types declared for \"{0}\"")]
    UndeclaredSystem(String),
    #[error("invalid compressed field \"{0}\"")]
    NumericField(String),
    #[error("differential field before kernel initialization")]
    UninitializedKernel,
    #[error("recovered value overflows")]
    Overflow,
}
