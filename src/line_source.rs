//! Sequential line access shared by the extractor and the classifier.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A source of text lines, read one at a time until `Ok(None)`.
///
/// Lines are returned without their terminator (`\n`, `\r\n` or a bare `\r`).
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<L: LineSource + ?Sized> LineSource for &mut L {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}

impl<L: LineSource + ?Sized> LineSource for Box<L> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}

/// Line source over any buffered reader.
///
/// A line ends at `\n`, `\r` or `\r\n`. Bytes that are not valid UTF-8 are
/// replaced with U+FFFD rather than failing the read.
#[derive(Debug)]
pub struct ReaderLineSource<R> {
    reader: R,
    /// Previous line ended with `\r`; a leading `\n` belongs to it
    skip_lf: bool,
}

impl<R: BufRead> ReaderLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            skip_lf: false,
        }
    }
}

impl ReaderLineSource<BufReader<File>> {
    /// Open a file for line-by-line reading
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource for ReaderLineSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut bytes = Vec::new();
        let mut read_any = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(read_any.then(|| decode(bytes)));
            }

            let mut start = 0;
            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    start = 1;
                }
            }

            match available[start..]
                .iter()
                .position(|&b| b == b'\n' || b == b'\r')
            {
                Some(pos) => {
                    let end = start + pos;
                    bytes.extend_from_slice(&available[start..end]);
                    self.skip_lf = available[end] == b'\r';
                    self.reader.consume(end + 1);
                    return Ok(Some(decode(bytes)));
                }
                None => {
                    let len = available.len();
                    bytes.extend_from_slice(&available[start..]);
                    read_any |= len > start;
                    self.reader.consume(len);
                }
            }
        }
    }
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Line source over an in-memory document, with the same line endings as
/// [`ReaderLineSource`]
#[derive(Debug, Clone)]
pub struct StrLineSource<'a> {
    rest: &'a str,
}

impl<'a> StrLineSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl LineSource for StrLineSource<'_> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.rest.is_empty() {
            return Ok(None);
        }

        let line = match self.rest.find(['\n', '\r']) {
            Some(end) => {
                let terminator = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
                let line = &self.rest[..end];
                self.rest = &self.rest[end + terminator..];
                line
            }
            None => std::mem::take(&mut self.rest),
        };
        Ok(Some(line.to_string()))
    }
}
