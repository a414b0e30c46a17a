//! Compression layers: identification and stripping
use std::io::{Cursor, Read};

use itertools::Itertools;
use regex::Regex;

use crate::{
    codec::Codecs,
    error::{push_unique, Error, FormatError, Warning},
    header::split_record,
};

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of bytes inspected to identify a layer
const HEAD_SIZE: usize = 256;

/// Deepest supported nesting, like .crx.gz
const MAX_LAYERS: usize = 4;

lazy_static! {
    /// RINEX2 short name, Hatanaka compressed observations: .YYd
    static ref CRINEX_V2_EXTENSION: Regex = Regex::new(r"\.\d{2}d$").unwrap();
}

/// Supported compression schemes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Compression {
    /// gzip (.gz)
    Gzip,
    /// Hatanaka compact RINEX (.crx, .YYd)
    Hatanaka,
    /// Unix compress (.Z)
    UnixCompress,
    /// bzip2 (.bz2)
    Bzip2,
    /// zip archive (.zip)
    Zip,
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Gzip => write!(f, "gzip"),
            Self::Hatanaka => write!(f, "Hatanaka (CRINEX)"),
            Self::UnixCompress => write!(f, "Unix compress"),
            Self::Bzip2 => write!(f, "bzip2"),
            Self::Zip => write!(f, "zip"),
        }
    }
}

/// What the first bytes of a stream look like
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Signature {
    /// Plain RINEX
    Plain,
    /// One compression layer
    Compressed(Compression),
    /// Neither
    Unknown,
}

/// Identifies a stream from its first bytes.
pub fn sniff(head: &[u8]) -> Signature {
    if head.starts_with(&[0x1f, 0x8b]) {
        return Signature::Compressed(Compression::Gzip);
    }
    if head.starts_with(&[0x1f, 0x9d]) {
        return Signature::Compressed(Compression::UnixCompress);
    }
    if head.starts_with(b"BZh") {
        return Signature::Compressed(Compression::Bzip2);
    }
    if head.starts_with(b"PK\x03\x04") {
        return Signature::Compressed(Compression::Zip);
    }
    let text = String::from_utf8_lossy(head);
    let first = text.lines().find(|line| !line.trim().is_empty());
    match first.map(|line| split_record(line).1) {
        Some("CRINEX VERS   / TYPE") => Signature::Compressed(Compression::Hatanaka),
        Some("RINEX VERSION / TYPE") => Signature::Plain,
        _ => Signature::Unknown,
    }
}

/// Compression layers suggested by a file name, outermost first.
pub fn extension_layers(name: &str) -> Vec<Compression> {
    let mut name = name.to_lowercase();
    let mut layers = Vec::new();
    while layers.len() < MAX_LAYERS {
        let (layer, suffix) = if name.ends_with(".gz") {
            (Compression::Gzip, ".gz")
        } else if name.ends_with(".z") {
            (Compression::UnixCompress, ".z")
        } else if name.ends_with(".bz2") {
            (Compression::Bzip2, ".bz2")
        } else if name.ends_with(".zip") {
            (Compression::Zip, ".zip")
        } else {
            break;
        };
        layers.push(layer);
        name.truncate(name.len() - suffix.len());
    }
    if name.ends_with(".crx") || CRINEX_V2_EXTENSION.is_match(&name) {
        layers.push(Compression::Hatanaka);
    }
    layers
}

/// Extension of a file name, from its first dot
fn extension(name: &str) -> String {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    file_name
        .split_once('.')
        .map(|(_, ext)| format!(".{}", ext))
        .unwrap_or_default()
}

fn describe(layers: &[Compression]) -> String {
    if layers.is_empty() {
        "plain RINEX".to_string()
    } else {
        layers.iter().join(" + ")
    }
}

/// Reads the first bytes and puts them back in front of the stream.
fn peek(mut reader: Box<dyn Read>) -> Result<(Vec<u8>, Box<dyn Read>), Error> {
    let mut head = Vec::with_capacity(HEAD_SIZE);
    reader.by_ref().take(HEAD_SIZE as u64).read_to_end(&mut head)?;
    let reader: Box<dyn Read> = Box::new(Cursor::new(head.clone()).chain(reader));
    Ok((head, reader))
}

/// A stream stripped of all its compression layers
pub struct Resolved {
    /// Decoded content
    pub reader: Box<dyn Read>,
    /// Layers that were stripped, outermost first
    pub layers: Vec<Compression>,
    /// Extension related anomalies
    pub warnings: Vec<Warning>,
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("layers", &self.layers)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Strips every compression layer of `reader`. Content has the last word,
/// the file `name` only serves to report inconsistencies.
pub fn resolve(name: &str, reader: Box<dyn Read>, codecs: &Codecs) -> Result<Resolved, Error> {
    let hints = extension_layers(name);
    let mut layers = Vec::<Compression>::new();
    let mut warnings = Vec::<Warning>::new();
    let mut reader = reader;

    loop {
        let (head, peeked) = peek(reader)?;
        reader = peeked;
        match sniff(&head) {
            Signature::Compressed(compression) => {
                if layers.len() == MAX_LAYERS {
                    return Err(Error::Decompression {
                        compression,
                        reason: "too many nested layers".to_string(),
                    });
                }
                let decoder = codecs.decoder(compression)?;
                #[cfg(feature = "log")]
                debug!("{}: {} layer", name, compression);
                reader = decoder(reader)?;
                layers.push(compression);
            },
            Signature::Plain => break,
            Signature::Unknown => {
                if hints.iter().any(|hint| !layers.contains(hint)) {
                    return Err(Error::UnsupportedFormat(FormatError::SignatureMismatch {
                        extension: extension(name),
                    }));
                }
                // not RINEX: left to the format detector
                break;
            },
        }
    }

    if hints != layers {
        push_unique(
            &mut warnings,
            Warning::ExtensionMismatch {
                extension: extension(name),
                detected: describe(&layers),
            },
        );
    }

    Ok(Resolved {
        reader,
        layers,
        warnings,
    })
}
