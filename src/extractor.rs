//! Namespace extraction by textual marker scanning.
//!
//! Every line is scanned independently for three markers:
//! - `xmlns="` declares a default namespace
//! - `:noNamespaceSchemaLocation="` gives a schema location without a namespace
//! - `xmlns:` declares a prefixed namespace, possibly several per line
//!
//! No XML parsing happens; markers inside comments or text content count too.

use std::io::Cursor;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SniffError};
use crate::line_source::{LineSource, ReaderLineSource};
use crate::namespace::{NamespaceDeclaration, NamespaceSet};

const DEFAULT_NS_MARKER: &str = "xmlns=\"";
const NO_NAMESPACE_MARKER: &str = ":noNamespaceSchemaLocation=\"";
const PREFIXED_NS_MARKER: &str = "xmlns:";
const ASSIGN_MARKER: &str = "=\"";
const INSTANCE_NAMESPACE: &str = "XMLSchema-instance";

/// Scan every line of `source` and collect all namespace declarations.
///
/// The source is consumed and released before returning, on success and on error.
pub fn extract_namespaces<L: LineSource>(mut source: L) -> Result<NamespaceSet> {
    let mut namespaces = NamespaceSet::new();
    let mut line_no = 0;

    loop {
        line_no += 1;
        let line = match source.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                return Err(SniffError::ScanAborted {
                    line: line_no,
                    source: err,
                });
            }
        };
        LineScanner::new(&line, line_no).scan_into(&mut namespaces)?;
    }

    debug!(
        "Extracted {} namespace declarations from {} lines",
        namespaces.len(),
        line_no - 1
    );
    Ok(namespaces)
}

/// Extract namespaces from an in-memory document
pub fn extract_namespaces_from_str(text: &str) -> Result<NamespaceSet> {
    extract_namespaces(ReaderLineSource::new(Cursor::new(text)))
}

/// Extract namespaces from a file on disk.
///
/// Bytes that are not valid UTF-8 are decoded as U+FFFD, so a stray Latin-1
/// byte never fails the scan.
pub fn extract_namespaces_from_path(path: &Path) -> Result<NamespaceSet> {
    let source = ReaderLineSource::open(path)?;
    extract_namespaces(source)
}

/// Scans a single line for the three declaration markers
struct LineScanner<'a> {
    line: &'a str,
    line_no: usize,
}

impl<'a> LineScanner<'a> {
    fn new(line: &'a str, line_no: usize) -> Self {
        Self { line, line_no }
    }

    fn scan_into(&self, namespaces: &mut NamespaceSet) -> Result<()> {
        if let Some(start) = self.line.find(DEFAULT_NS_MARKER) {
            let url = self.quoted_value(start, start + DEFAULT_NS_MARKER.len())?;
            namespaces.insert(NamespaceDeclaration::default_namespace(url));
        }

        if let Some(start) = self.line.find(NO_NAMESPACE_MARKER) {
            let url = self.quoted_value(start, start + NO_NAMESPACE_MARKER.len())?;
            namespaces.insert(NamespaceDeclaration::no_namespace_location(url));
        }

        let mut search_from = 0;
        while let Some(offset) = self.line[search_from..].find(PREFIXED_NS_MARKER) {
            let marker_start = search_from + offset;
            let prefix_start = marker_start + PREFIXED_NS_MARKER.len();

            let assign = self.line[prefix_start..]
                .find(ASSIGN_MARKER)
                .map(|pos| prefix_start + pos)
                .ok_or_else(|| {
                    self.malformed(marker_start, "missing `=\"` after `xmlns:`")
                })?;
            let prefix = &self.line[prefix_start..assign];

            let url_start = assign + ASSIGN_MARKER.len();
            let url_end = self.closing_quote(marker_start, url_start)?;
            let url = &self.line[url_start..url_end];

            if url.contains(INSTANCE_NAMESPACE) {
                debug!("Skipping instance namespace binding `{}`", prefix);
            } else {
                namespaces.insert(NamespaceDeclaration::prefixed(prefix, url));
            }

            search_from = url_end;
        }

        Ok(())
    }

    /// Text between `value_start` and the next `"`
    fn quoted_value(&self, marker_start: usize, value_start: usize) -> Result<&'a str> {
        let end = self.closing_quote(marker_start, value_start)?;
        Ok(&self.line[value_start..end])
    }

    fn closing_quote(&self, marker_start: usize, value_start: usize) -> Result<usize> {
        self.line[value_start..]
            .find('"')
            .map(|pos| value_start + pos)
            .ok_or_else(|| self.malformed(marker_start, "missing closing quote"))
    }

    fn malformed(&self, marker_start: usize, details: &str) -> SniffError {
        SniffError::MalformedDeclaration {
            line: self.line_no,
            column: marker_start + 1,
            details: details.to_string(),
        }
    }
}
