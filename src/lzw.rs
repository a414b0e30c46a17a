//! Unix `compress` (.Z) stream decoding.
//!
//! Adaptive LZW, 9 to 16 bit codes packed LSB first,
//! as produced by `compress` and `ncompress`.
use std::io::{BufRead, BufReader, Read};

use thiserror::Error;

use crate::{compression::Compression, error::CorruptStream};

/// .Z magic bytes
pub const MAGIC: [u8; 2] = [0x1f, 0x9d];

const INIT_BITS: u32 = 9;
const MAX_BITS: u32 = 16;
const CLEAR: u32 = 256;

/// LZW decoding errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("missing .Z magic bytes")]
    BadMagic,
    #[error("{0} bit codes are not supported")]
    MaxBits(u32),
    #[error("invalid code {code} (next free entry is {free})")]
    InvalidCode { code: u32, free: u32 },
    #[error("first code should be a literal, got {0}")]
    InvalidFirstCode(u32),
}

/// [Decoder] decodes a .Z stream, exposing the decoded content as [Read].
pub struct Decoder<R: Read> {
    inner: BufReader<R>,
    /// bit accumulator
    acc: u64,
    acc_bits: u32,
    /// bits consumed since the current code group started
    consumed: u64,
    block_mode: bool,
    maxbits: u32,
    n_bits: u32,
    maxcode: u32,
    maxmaxcode: u32,
    free_ent: u32,
    prefix: Vec<u16>,
    suffix: Vec<u8>,
    oldcode: Option<u32>,
    finchar: u8,
    stack: Vec<u8>,
    output: Vec<u8>,
    rd_ptr: usize,
    done: bool,
}

impl<R: Read> Decoder<R> {
    /// Builds a [Decoder], consuming the 3 byte .Z header
    pub fn new(inner: R) -> std::io::Result<Self> {
        let mut inner = BufReader::new(inner);
        let mut header = [0_u8; 3];
        inner
            .read_exact(&mut header)
            .map_err(|_| CorruptStream::into_io(Compression::UnixCompress, Error::BadMagic))?;
        if header[..2] != MAGIC {
            return Err(CorruptStream::into_io(
                Compression::UnixCompress,
                Error::BadMagic,
            ));
        }
        let maxbits = (header[2] & 0x1f) as u32;
        if !(INIT_BITS..=MAX_BITS).contains(&maxbits) {
            return Err(CorruptStream::into_io(
                Compression::UnixCompress,
                Error::MaxBits(maxbits),
            ));
        }
        let block_mode = header[2] & 0x80 > 0;
        let size = 1 << MAX_BITS;
        Ok(Self {
            inner,
            acc: 0,
            acc_bits: 0,
            consumed: 0,
            block_mode,
            maxbits,
            n_bits: INIT_BITS,
            maxcode: (1 << INIT_BITS) - 1,
            maxmaxcode: 1 << maxbits,
            free_ent: if block_mode { CLEAR + 1 } else { CLEAR },
            prefix: vec![0; size],
            suffix: (0..size).map(|i| i as u8).collect(),
            oldcode: None,
            finchar: 0,
            stack: Vec::with_capacity(size),
            output: Vec::with_capacity(4096),
            rd_ptr: 0,
            done: false,
        })
    }

    fn next_byte(&mut self) -> std::io::Result<Option<u8>> {
        let byte = match self.inner.fill_buf()?.first() {
            Some(byte) => *byte,
            None => return Ok(None),
        };
        self.inner.consume(1);
        Ok(Some(byte))
    }

    /// Reads `n` bits, None once the stream cannot provide them
    fn read_bits(&mut self, n: u32) -> std::io::Result<Option<u32>> {
        while self.acc_bits < n {
            match self.next_byte()? {
                Some(byte) => {
                    self.acc |= (byte as u64) << self.acc_bits;
                    self.acc_bits += 8;
                },
                None => return Ok(None),
            }
        }
        let value = (self.acc & ((1 << n) - 1)) as u32;
        self.acc >>= n;
        self.acc_bits -= n;
        self.consumed += n as u64;
        Ok(Some(value))
    }

    /// Codes come in groups of `n_bits` bytes: the remainder
    /// of the current group is discarded on width change and reset.
    fn align(&mut self) -> std::io::Result<()> {
        let group = (self.n_bits * 8) as u64;
        let mut skip = (group - self.consumed % group) % group;
        while skip > 0 {
            let n = skip.min(16) as u32;
            if self.read_bits(n)?.is_none() {
                self.done = true;
                break;
            }
            skip -= n as u64;
        }
        self.consumed = 0;
        Ok(())
    }

    /// Decodes the next code, appending to the output buffer.
    fn decode_next(&mut self) -> std::io::Result<()> {
        if self.free_ent > self.maxcode {
            self.align()?;
            self.n_bits += 1;
            self.maxcode = if self.n_bits == self.maxbits {
                self.maxmaxcode
            } else {
                (1 << self.n_bits) - 1
            };
        }
        if self.done {
            return Ok(());
        }
        let mut code = match self.read_bits(self.n_bits)? {
            Some(code) => code,
            None => {
                self.done = true;
                return Ok(());
            },
        };

        let oldcode = match self.oldcode {
            Some(oldcode) => oldcode,
            None => {
                if code > 255 {
                    return Err(CorruptStream::into_io(
                        Compression::UnixCompress,
                        Error::InvalidFirstCode(code),
                    ));
                }
                self.oldcode = Some(code);
                self.finchar = code as u8;
                self.output.push(self.finchar);
                return Ok(());
            },
        };

        if code == CLEAR && self.block_mode {
            self.free_ent = CLEAR;
            self.align()?;
            self.n_bits = INIT_BITS;
            self.maxcode = (1 << INIT_BITS) - 1;
            return Ok(());
        }

        let incode = code;
        self.stack.clear();
        if code >= self.free_ent {
            // KwKwK: code is being defined right now
            if code > self.free_ent {
                return Err(CorruptStream::into_io(
                    Compression::UnixCompress,
                    Error::InvalidCode {
                        code,
                        free: self.free_ent,
                    },
                ));
            }
            self.stack.push(self.finchar);
            code = oldcode;
        }
        while code > 255 {
            self.stack.push(self.suffix[code as usize]);
            code = self.prefix[code as usize] as u32;
        }
        self.finchar = code as u8;
        self.stack.push(self.finchar);
        self.output.extend(self.stack.iter().rev());

        if self.free_ent < self.maxmaxcode {
            self.prefix[self.free_ent as usize] = oldcode as u16;
            self.suffix[self.free_ent as usize] = self.finchar;
            self.free_ent += 1;
        }
        self.oldcode = Some(incode);
        Ok(())
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        while self.rd_ptr == self.output.len() {
            if self.done {
                return Ok(0);
            }
            self.output.clear();
            self.rd_ptr = 0;
            self.decode_next()?;
        }
        let size = std::cmp::min(buf.len(), self.output.len() - self.rd_ptr);
        buf[..size].copy_from_slice(&self.output[self.rd_ptr..self.rd_ptr + size]);
        self.rd_ptr += size;
        Ok(size)
    }
}
