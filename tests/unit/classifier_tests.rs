use std::io::Write;

use tempfile::NamedTempFile;
use xmlns_sniff::{
    Dialect, DialectScan, MAX_NAMESPACE_FREE_LINES, StrLineSource, classify_dialect,
    classify_dialect_from_path, classify_dialect_from_str,
};

use crate::common::test_helpers::{GENERIC_XML, PLAIN_XML, RAM_XML, TEI_XML};

#[test]
fn test_fixture_dialects() {
    assert_eq!(classify_dialect_from_str(TEI_XML), Dialect::Tei);
    assert_eq!(classify_dialect_from_str(RAM_XML), Dialect::Ram);
    assert_eq!(classify_dialect_from_str(GENERIC_XML), Dialect::Generic);
    assert_eq!(classify_dialect_from_str(PLAIN_XML), Dialect::Generic);
}

#[test]
fn test_tei_p5_marker() {
    let text = "<?xml version=\"1.0\"?>\n<TEI xmlns=\"http://www.tei-p5.xml\">";
    assert_eq!(classify_dialect_from_str(text), Dialect::Tei);
}

#[test]
fn test_marker_on_later_namespace_line() {
    let text = "<root xmlns=\"urn:a\"\n      xmlns:r=\"http://example.org/ram.xsd\">";
    assert_eq!(classify_dialect_from_str(text), Dialect::Ram);
}

#[test]
fn test_bail_out_after_namespace_free_lines() {
    let mut lines = vec!["<root xmlns=\"urn:a\">".to_string()];
    lines.extend((0..=MAX_NAMESPACE_FREE_LINES).map(|i| format!("<p>{}</p>", i)));
    lines.push("<x xmlns=\"http://www.tei-c.org/ns/1.0\"/>".to_string());

    assert_eq!(classify_dialect_from_str(&lines.join("\n")), Dialect::Generic);
}

#[test]
fn test_five_free_lines_are_tolerated() {
    let mut lines = vec!["<root xmlns=\"urn:a\">".to_string()];
    lines.extend((0..MAX_NAMESPACE_FREE_LINES).map(|i| format!("<p>{}</p>", i)));
    lines.push("<x xmlns=\"http://www.tei-c.org/ns/1.0\"/>".to_string());

    assert_eq!(classify_dialect_from_str(&lines.join("\n")), Dialect::Tei);
}

#[test]
fn test_lines_before_first_namespace_are_not_counted() {
    let mut lines: Vec<String> = (0..20).map(|i| format!("<!-- {} -->", i)).collect();
    lines.push("<TEI xmlns=\"http://www.tei-c.org/ns/1.0\">".to_string());

    assert_eq!(classify_dialect_from_str(&lines.join("\n")), Dialect::Tei);
}

#[test]
fn test_attribute_without_leading_space_is_ignored() {
    let text = "<root\txmlns=\"http://www.tei-c.org/ns/1.0\">";
    assert_eq!(classify_dialect_from_str(text), Dialect::Generic);
}

#[test]
fn test_dialect_scan_feed() {
    let mut scan = DialectScan::new();
    assert_eq!(scan.feed("<?xml version=\"1.0\"?>"), None);
    assert_eq!(scan.feed("<root xmlns=\"urn:a\">"), None);
    assert_eq!(scan.feed("<p/>"), None);
    assert_eq!(scan.feed("<q xmlns:r=\"ram.xsd\"/>"), Some(Dialect::Ram));
}

#[test]
fn test_borrowed_source_can_be_reused() {
    let mut source = StrLineSource::new(TEI_XML);
    assert_eq!(classify_dialect(&mut source), Dialect::Tei);
    // the scan stopped on the root line; the rest is still there
    assert_eq!(classify_dialect(&mut source), Dialect::Generic);
}

#[test]
fn test_classify_from_path() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", RAM_XML).unwrap();
    assert_eq!(classify_dialect_from_path(file.path()), Dialect::Ram);

    assert_eq!(
        classify_dialect_from_path(std::path::Path::new("/nonexistent/doc.xml")),
        Dialect::Generic
    );
}

#[test]
fn test_invalid_utf8_does_not_stop_scan() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"<root xmlns=\"urn:a\">\n<p>caf\xe9</p>\n<x xmlns=\"http://www.tei-c.org/ns/1.0\"/>\n")
        .unwrap();
    assert_eq!(classify_dialect_from_path(file.path()), Dialect::Tei);
}

#[test]
fn test_carriage_return_only_document_bails_out() {
    let mut lines = vec!["<root xmlns=\"urn:a\">".to_string()];
    lines.extend((0..=MAX_NAMESPACE_FREE_LINES).map(|i| format!("<p>{}</p>", i)));
    lines.push("<x xmlns=\"http://www.tei-c.org/ns/1.0\"/>".to_string());
    let doc = lines.join("\r");

    assert_eq!(classify_dialect_from_str(&doc), Dialect::Generic);

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", doc).unwrap();
    assert_eq!(classify_dialect_from_path(file.path()), Dialect::Generic);
}

#[test]
fn test_dialect_parsing_and_display() {
    for dialect in Dialect::ALL {
        assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
    }
    assert_eq!("TEI".parse::<Dialect>().unwrap(), Dialect::Tei);
    assert!("docbook".parse::<Dialect>().is_err());
    assert_eq!(Dialect::default(), Dialect::Generic);
}
