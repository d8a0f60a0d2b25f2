//! # xmlns-sniff Library
//!
//! Line-oriented extraction of XML namespace declarations and a cheap
//! dialect classifier (generic, TEI, RAM), usable on a single stream or
//! concurrently over a directory tree. Nothing here parses XML: both scans
//! look for textual markers one line at a time.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod error_reporter;
pub mod extractor;
pub mod file_discovery;
pub mod line_source;
pub mod namespace;
pub mod output;
pub mod sniffer;

pub use classifier::{
    Dialect, DialectScan, MAX_NAMESPACE_FREE_LINES, classify_dialect, classify_dialect_from_path,
    classify_dialect_from_str,
};
pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigManager, EnvProvider, SystemEnvProvider};
pub use error::{ConfigError, SniffError};
pub use error_reporter::ErrorReporter;
pub use extractor::{extract_namespaces, extract_namespaces_from_path, extract_namespaces_from_str};
pub use file_discovery::{Discovery, FileDiscovery};
pub use line_source::{LineSource, ReaderLineSource, StrLineSource};
pub use namespace::{DEFAULT_PREFIX, NamespaceDeclaration, NamespaceKey, NamespaceSet};
pub use output::Output;
pub use sniffer::{
    DialectCounts, FileSniffResult, ProgressCallback, SniffConfig, SniffEngine, SniffPhase,
    SniffProgress, SniffResults, SniffStatus,
};
