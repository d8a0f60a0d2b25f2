use std::path::PathBuf;
use std::time::Duration;

use xmlns_sniff::{
    Dialect, FileSniffResult, NamespaceDeclaration, Output, OutputFormat, SniffError,
    SniffResults, VerbosityLevel,
};

fn sample_results() -> SniffResults {
    let files = vec![
        FileSniffResult::scanned(
            PathBuf::from("a.xml"),
            Dialect::Ram,
            vec![NamespaceDeclaration::no_namespace_location("http://example.org/ram.xsd")],
            Duration::from_millis(3),
        ),
        FileSniffResult::scanned(
            PathBuf::from("b.xml"),
            Dialect::Generic,
            vec![
                NamespaceDeclaration::default_namespace("http://example.com/catalog"),
                NamespaceDeclaration::prefixed("dc", "http://purl.org/dc/elements/1.1/"),
            ],
            Duration::from_millis(1),
        ),
        FileSniffResult::failed(
            PathBuf::from("c.xml"),
            &SniffError::Timeout {
                file: PathBuf::from("c.xml"),
                timeout_seconds: 5,
            },
            Duration::from_secs(5),
        ),
    ];
    SniffResults::aggregate(files, Duration::from_secs(5))
}

#[test]
fn test_default_prefix_used_for_rendering() {
    let formatted = Output::new(OutputFormat::Human, VerbosityLevel::Verbose, "cat")
        .with_colors(false)
        .format_results(&sample_results())
        .unwrap();

    assert!(formatted.contains(r#"xmlns:cat="http://example.com/catalog""#));
    assert!(formatted.contains(r#"xmlns:dc="http://purl.org/dc/elements/1.1/""#));
    assert!(formatted.contains(r#"xmlns="http://example.org/ram.xsd""#));
}

#[test]
fn test_failure_message_in_human_output() {
    let formatted = Output::new(OutputFormat::Human, VerbosityLevel::Normal, "jxt")
        .with_colors(false)
        .format_results(&sample_results())
        .unwrap();

    assert!(formatted.contains("FAILED"));
    assert!(formatted.contains("after 5 seconds"));
    assert!(formatted.contains("Dialects: generic 1, tei 0, ram 1"));
}

#[test]
fn test_colors_only_when_enabled() {
    let results = sample_results();
    let plain = Output::new(OutputFormat::Summary, VerbosityLevel::Normal, "jxt")
        .with_colors(false)
        .format_results(&results)
        .unwrap();
    let colored = Output::new(OutputFormat::Summary, VerbosityLevel::Normal, "jxt")
        .with_colors(true)
        .format_results(&results)
        .unwrap();

    assert!(!plain.contains("\x1b["));
    assert!(colored.contains("\x1b[32mScanned:\x1b[0m"));
}

#[test]
fn test_json_lists_every_file() {
    let formatted = Output::new(OutputFormat::Json, VerbosityLevel::Quiet, "jxt")
        .format_results(&sample_results())
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();

    // quiet does not thin out machine-readable output
    assert_eq!(value["files"].as_array().unwrap().len(), 3);
    assert_eq!(value["failed_files"], 1);
    assert_eq!(value["files"][1]["namespaces"][0]["effective_prefix"], "jxt");
    assert_eq!(value["files"][0]["namespaces"][0]["effective_prefix"], "");
}
