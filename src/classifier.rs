//! Dialect classification from the namespace-bearing lines near the top of a document.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::line_source::{LineSource, ReaderLineSource};

/// Attribute marker; the leading space keeps names like `foo-xmlns` from matching
const NAMESPACE_ATTR: &str = " xmlns";
const TEI_MARKER: &str = "http://www.tei-";
const RAM_MARKER: &str = "ram.xsd";

/// Lines without a namespace attribute tolerated after the first one
pub const MAX_NAMESPACE_FREE_LINES: usize = 5;

/// Known document conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    Tei,
    Ram,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Generic, Dialect::Tei, Dialect::Ram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Tei => "tei",
            Dialect::Ram => "ram",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Dialect::Generic),
            "tei" => Ok(Dialect::Tei),
            "ram" => Ok(Dialect::Ram),
            other => Err(format!("Unknown dialect: {}", other)),
        }
    }
}

/// Line-by-line classification state.
///
/// `feed` returns `Some` once the scan should stop.
#[derive(Debug, Default)]
pub struct DialectScan {
    found_namespace: bool,
    namespace_free_lines: usize,
}

impl DialectScan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> Option<Dialect> {
        let has_namespace = line.contains(NAMESPACE_ATTR);
        if !self.found_namespace {
            self.found_namespace = has_namespace;
        }
        if !self.found_namespace {
            return None;
        }

        if !has_namespace {
            // cumulative, never reset by later namespace lines
            self.namespace_free_lines += 1;
            if self.namespace_free_lines > MAX_NAMESPACE_FREE_LINES {
                return Some(Dialect::Generic);
            }
            return None;
        }

        if line.contains(TEI_MARKER) {
            Some(Dialect::Tei)
        } else if line.contains(RAM_MARKER) {
            Some(Dialect::Ram)
        } else {
            None
        }
    }
}

/// Classify a document, stopping as soon as the dialect is decided.
///
/// Never fails: a read fault ends the scan with [`Dialect::Generic`].
/// The source is dropped before returning on every path.
pub fn classify_dialect<L: LineSource>(mut source: L) -> Dialect {
    let mut scan = DialectScan::new();
    loop {
        match source.next_line() {
            Ok(Some(line)) => {
                if let Some(dialect) = scan.feed(&line) {
                    return dialect;
                }
            }
            Ok(None) => return Dialect::Generic,
            Err(e) => {
                debug!("Dialect scan stopped by read error: {}", e);
                return Dialect::Generic;
            }
        }
    }
}

/// Classify an in-memory document
pub fn classify_dialect_from_str(text: &str) -> Dialect {
    classify_dialect(ReaderLineSource::new(Cursor::new(text)))
}

/// Classify a file on disk; a file that cannot be opened is [`Dialect::Generic`].
///
/// Invalid UTF-8 is decoded lossily and does not end the scan.
pub fn classify_dialect_from_path(path: &Path) -> Dialect {
    match ReaderLineSource::open(path) {
        Ok(source) => classify_dialect(source),
        Err(e) => {
            debug!("Cannot open {} for dialect scan: {}", path.display(), e);
            Dialect::Generic
        }
    }
}
