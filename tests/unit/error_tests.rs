use std::path::PathBuf;

use xmlns_sniff::{ConfigError, ErrorReporter, SniffError, VerbosityLevel};

#[test]
fn test_error_display_messages() {
    let cases = [
        (
            SniffError::MalformedDeclaration {
                line: 4,
                column: 12,
                details: "missing closing quote".to_string(),
            },
            "Malformed namespace declaration at line 4, column 12: missing closing quote",
        ),
        (
            SniffError::ScanFailed {
                file: PathBuf::from("doc.xml"),
                details: "boom".to_string(),
            },
            "Scan failed: doc.xml - boom",
        ),
        (
            SniffError::Config("bad glob".to_string()),
            "Configuration error: bad glob",
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_is_malformed() {
    let malformed = SniffError::MalformedDeclaration {
        line: 1,
        column: 1,
        details: String::new(),
    };
    let io = SniffError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));

    assert!(malformed.is_malformed());
    assert!(!io.is_malformed());
}

#[test]
fn test_reporter_formats_by_verbosity() {
    let error = SniffError::FileSystemTraversal {
        path: PathBuf::from("/corpus"),
        reason: "not a regular file or directory".to_string(),
    };

    let normal = ErrorReporter::new(VerbosityLevel::Normal).format_sniff_error(&error);
    assert_eq!(normal, error.to_string());

    let verbose = ErrorReporter::new(VerbosityLevel::Verbose).format_sniff_error(&error);
    assert!(verbose.starts_with(&error.to_string()));
    assert!(verbose.contains("Suggestion:"));
}

#[test]
fn test_config_error_wraps_into_sniff_error() {
    let error: SniffError = ConfigError::UnsupportedFormat("yaml".to_string()).into();
    assert_eq!(
        error.to_string(),
        "Configuration error: Unsupported configuration file format: yaml"
    );
}
