//! Decoders and their availability
use std::io::{ErrorKind, Read};

use flate2::read::MultiGzDecoder;

use crate::{
    compression::Compression,
    error::{CorruptStream, Error},
};

/// Stacks a decoder on top of a stream
pub type Decoder = fn(Box<dyn Read>) -> std::io::Result<Box<dyn Read>>;

/// Availability of one decoder, resolved once.
#[derive(Debug, Copy, Clone)]
pub enum Capability {
    /// Decoder is ready to use
    Available(Decoder),
    /// Decoder is missing: remedy for the user
    Unavailable(&'static str),
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Remedy when a decoder was disabled at runtime
pub const DISABLED: &str = "decoder disabled by configuration";

/// Remedy when a decoder was not compiled in
pub fn remedy(compression: Compression) -> &'static str {
    match compression {
        Compression::Gzip => "",
        Compression::Hatanaka => {
            "build with the \"hatanaka\" feature, or expand the file with CRX2RNX first"
        },
        Compression::UnixCompress => {
            "build with the \"compress\" feature, or expand the file with uncompress first"
        },
        Compression::Bzip2 => {
            "build with the \"bzip2\" feature, or expand the file with bunzip2 first"
        },
        Compression::Zip => "build with the \"zip\" feature, or extract the archive first",
    }
}

lazy_static! {
    static ref PROBED: Codecs = Codecs::probe();
}

/// [Codecs] tells which compression schemes can be decoded.
/// Gzip is always available.
#[derive(Debug, Copy, Clone)]
pub struct Codecs {
    hatanaka: Capability,
    compress: Capability,
    bzip2: Capability,
    zip: Capability,
}

impl Default for Codecs {
    /// Capabilities compiled into this library, probed once per process
    fn default() -> Self {
        *PROBED
    }
}

impl Codecs {
    /// Probes the capabilities compiled into this library
    pub fn probe() -> Self {
        Self {
            hatanaka: hatanaka_capability(),
            compress: compress_capability(),
            bzip2: bzip2_capability(),
            zip: zip_capability(),
        }
    }

    /// No optional decoder
    pub fn gzip_only() -> Self {
        Self {
            hatanaka: Capability::Unavailable(remedy(Compression::Hatanaka)),
            compress: Capability::Unavailable(remedy(Compression::UnixCompress)),
            bzip2: Capability::Unavailable(remedy(Compression::Bzip2)),
            zip: Capability::Unavailable(remedy(Compression::Zip)),
        }
    }

    /// Disables one decoder. Gzip cannot be disabled.
    pub fn without(&self, compression: Compression) -> Self {
        self.with_capability(compression, Capability::Unavailable(DISABLED))
    }

    /// Overrides one capability. Gzip cannot be overridden.
    pub fn with_capability(&self, compression: Compression, capability: Capability) -> Self {
        let mut s = *self;
        match compression {
            Compression::Gzip => {},
            Compression::Hatanaka => s.hatanaka = capability,
            Compression::UnixCompress => s.compress = capability,
            Compression::Bzip2 => s.bzip2 = capability,
            Compression::Zip => s.zip = capability,
        }
        s
    }

    pub fn capability(&self, compression: Compression) -> Capability {
        match compression {
            Compression::Gzip => Capability::Available(decode_gzip),
            Compression::Hatanaka => self.hatanaka,
            Compression::UnixCompress => self.compress,
            Compression::Bzip2 => self.bzip2,
            Compression::Zip => self.zip,
        }
    }

    pub fn is_available(&self, compression: Compression) -> bool {
        self.capability(compression).is_available()
    }

    /// Support status of every scheme
    pub fn status(&self) -> Vec<(Compression, Capability)> {
        [
            Compression::Gzip,
            Compression::Hatanaka,
            Compression::UnixCompress,
            Compression::Bzip2,
            Compression::Zip,
        ]
        .into_iter()
        .map(|compression| (compression, self.capability(compression)))
        .collect()
    }

    /// Returns the [Decoder] for this scheme, or the
    /// [Error::DecompressionUnavailable] to report.
    pub fn decoder(&self, compression: Compression) -> Result<Decoder, Error> {
        match self.capability(compression) {
            Capability::Available(decoder) => Ok(decoder),
            Capability::Unavailable(remedy) => Err(Error::DecompressionUnavailable {
                compression,
                remedy,
            }),
        }
    }
}

/// Tags decoding failures with their [Compression] scheme,
/// so they are not mistaken for I/O errors.
fn tag(compression: Compression, e: std::io::Error) -> std::io::Error {
    let tagged = e
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<CorruptStream>())
        .is_some();
    if tagged {
        return e;
    }
    match e.kind() {
        ErrorKind::InvalidData | ErrorKind::InvalidInput | ErrorKind::UnexpectedEof => {
            CorruptStream::into_io(compression, e)
        },
        _ => e,
    }
}

struct Tagged<R: Read> {
    compression: Compression,
    inner: R,
}

impl<R: Read> Tagged<R> {
    fn boxed(compression: Compression, inner: R) -> Box<dyn Read>
    where
        R: 'static,
    {
        Box::new(Self { compression, inner })
    }
}

impl<R: Read> Read for Tagged<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner
            .read(buf)
            .map_err(|e| tag(self.compression, e))
    }
}

fn decode_gzip(reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
    Ok(Tagged::boxed(
        Compression::Gzip,
        MultiGzDecoder::new(reader),
    ))
}

#[cfg(feature = "hatanaka")]
fn decode_hatanaka(reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
    use crate::hatanaka::DecompressorIO;
    use std::io::BufReader;
    Ok(Tagged::boxed(
        Compression::Hatanaka,
        DecompressorIO::new(BufReader::new(reader)),
    ))
}

#[cfg(feature = "hatanaka")]
fn hatanaka_capability() -> Capability {
    Capability::Available(decode_hatanaka)
}

#[cfg(not(feature = "hatanaka"))]
fn hatanaka_capability() -> Capability {
    Capability::Unavailable(remedy(Compression::Hatanaka))
}

#[cfg(feature = "compress")]
fn decode_unix(reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
    let decoder =
        crate::lzw::Decoder::new(reader).map_err(|e| tag(Compression::UnixCompress, e))?;
    Ok(Tagged::boxed(Compression::UnixCompress, decoder))
}

#[cfg(feature = "compress")]
fn compress_capability() -> Capability {
    Capability::Available(decode_unix)
}

#[cfg(not(feature = "compress"))]
fn compress_capability() -> Capability {
    Capability::Unavailable(remedy(Compression::UnixCompress))
}

#[cfg(feature = "bzip2")]
fn decode_bzip2(reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
    Ok(Tagged::boxed(
        Compression::Bzip2,
        bzip2::read::MultiBzDecoder::new(reader),
    ))
}

#[cfg(feature = "bzip2")]
fn bzip2_capability() -> Capability {
    Capability::Available(decode_bzip2)
}

#[cfg(not(feature = "bzip2"))]
fn bzip2_capability() -> Capability {
    Capability::Unavailable(remedy(Compression::Bzip2))
}

/// Only the first file of the archive is examined
#[cfg(feature = "zip")]
fn decode_zip(mut reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
    use std::io::Cursor;

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| CorruptStream::into_io(Compression::Zip, e))?;

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| CorruptStream::into_io(Compression::Zip, e))?;
        if file.is_dir() {
            continue;
        }
        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)
            .map_err(|e| tag(Compression::Zip, e))?;
        return Ok(Box::new(Cursor::new(content)));
    }

    Err(CorruptStream::into_io(
        Compression::Zip,
        "archive holds no file",
    ))
}

#[cfg(feature = "zip")]
fn zip_capability() -> Capability {
    Capability::Available(decode_zip)
}

#[cfg(not(feature = "zip"))]
fn zip_capability() -> Capability {
    Capability::Unavailable(remedy(Compression::Zip))
}
