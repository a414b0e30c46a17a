//! Line oriented reader over the decoded content.
use std::io::{BufRead, BufReader, Read};

// RINEX is \n termination based, and always made of rather short lines.
const BUF_SIZE: usize = 8192;

/// [SourceStream] is the sequential, already decoded text source that
/// every parsing stage consumes. It never sees compressed bytes: decoders
/// are stacked underneath it by the resolver.
pub struct SourceStream {
    reader: BufReader<Box<dyn Read>>,
    /// Raw line buffer
    buf: Vec<u8>,
    /// Lines consumed so far (1 based numbering of the last line)
    line_number: usize,
    /// Line handed back by a parser that read too far
    pending: Option<String>,
}

impl SourceStream {
    /// Builds a new [SourceStream] over a decoded [Read]able interface
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self {
            reader: BufReader::with_capacity(BUF_SIZE, reader),
            buf: Vec::with_capacity(128),
            line_number: 0,
            pending: None,
        }
    }

    /// Returns next line, without its termination, or None at end of stream.
    /// Invalid UTF-8 is replaced, not rejected: some receivers
    /// write latin-1 comments.
    pub fn next_line(&mut self) -> std::io::Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            self.line_number += 1;
            return Ok(Some(line));
        }
        self.buf.clear();
        let size = self.reader.read_until(b'\n', &mut self.buf)?;
        if size == 0 {
            return Ok(None);
        }
        while matches!(self.buf.last(), Some(b'\n') | Some(b'\r')) {
            self.buf.pop();
        }
        self.line_number += 1;
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Hands a line back: it is returned by the next [Self::next_line] call.
    pub fn push_back(&mut self, line: String) {
        self.line_number = self.line_number.saturating_sub(1);
        self.pending = Some(line);
    }

    /// Number of the last line returned
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// True once all content has been consumed
    pub fn at_end(&mut self) -> std::io::Result<bool> {
        if self.pending.is_some() {
            return Ok(false);
        }
        Ok(self.reader.fill_buf()?.is_empty())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn stream(content: &'static str) -> SourceStream {
        SourceStream::new(Box::new(Cursor::new(content.as_bytes())))
    }

    #[test]
    fn lines_and_terminations() {
        let mut s = stream("first\r\nsecond\n\nlast");
        assert_eq!(s.next_line().unwrap().as_deref(), Some("first"));
        assert_eq!(s.next_line().unwrap().as_deref(), Some("second"));
        assert_eq!(s.line_number(), 2);
        assert_eq!(s.next_line().unwrap().as_deref(), Some(""));
        assert!(!s.at_end().unwrap());
        assert_eq!(s.next_line().unwrap().as_deref(), Some("last"));
        assert!(s.at_end().unwrap());
        assert_eq!(s.next_line().unwrap(), None);
        assert_eq!(s.line_number(), 4);
    }

    #[test]
    fn push_back() {
        let mut s = stream("a\nb\n");
        let a = s.next_line().unwrap().unwrap();
        let b = s.next_line().unwrap().unwrap();
        assert!(s.at_end().unwrap());
        s.push_back(b);
        assert!(!s.at_end().unwrap());
        assert_eq!(s.line_number(), 1);
        assert_eq!(s.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(a, "a");
        assert_eq!(s.line_number(), 2);
    }

    #[test]
    fn invalid_utf8() {
        let mut s = SourceStream::new(Box::new(Cursor::new(vec![b'a', 0xff, b'b', b'\n'])));
        let line = s.next_line().unwrap().unwrap();
        assert!(line.starts_with('a'));
        assert!(line.ends_with('b'));
    }
}
