//! JSON Lines input and output.

use std::io::{self, BufRead, Write};

/// Reads newline-delimited input, yielding `(line_number, bytes)` pairs.
///
/// Line numbers start at 1. Trailing `\n` and `\r\n` are stripped; a final
/// line without a terminator is still returned.
pub struct JsonLinesReader<R> {
    inner: R,
    line: usize,
}

impl<R: BufRead> JsonLinesReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, line: 0 }
    }

    /// Number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for JsonLinesReader<R> {
    type Item = io::Result<(usize, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.inner.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line += 1;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok((self.line, buf)))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Writes one JSON document per line.
pub struct JsonLinesWriter<W> {
    inner: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write `json` followed by a newline.
    pub fn write_line(&mut self, json: &[u8]) -> io::Result<()> {
        self.inner.write_all(json)?;
        self.inner.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// True for lines with nothing but whitespace.
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}
