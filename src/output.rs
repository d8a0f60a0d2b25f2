//! Output and Reporting
//!
//! Renders sniff results as human-readable text, a summary, or JSON.

use serde::Serialize;
use std::time::Duration;

use crate::classifier::Dialect;
use crate::cli::{OutputFormat, VerbosityLevel};
use crate::namespace::NamespaceDeclaration;
use crate::sniffer::{FileSniffResult, SniffResults, SniffStatus};

/// Formatter for batch results
pub struct Output {
    format: OutputFormat,
    verbosity: VerbosityLevel,
    default_prefix: String,
    show_colors: bool,
}

/// JSON view of one declaration, with its rendered form
#[derive(Serialize)]
struct JsonNamespace<'a> {
    prefix: Option<&'a str>,
    url: &'a str,
    no_namespace: bool,
    effective_prefix: &'a str,
    attribute: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    default_prefix: &'a str,
    total_files: usize,
    scanned_files: usize,
    failed_files: usize,
    dialects: &'a crate::sniffer::DialectCounts,
    namespace_urls: &'a [String],
    duration_ms: u128,
    files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    status: &'a SniffStatus,
    dialect: Option<Dialect>,
    namespaces: Vec<JsonNamespace<'a>>,
}

impl Output {
    pub fn new(format: OutputFormat, verbosity: VerbosityLevel, default_prefix: &str) -> Self {
        Self {
            format,
            verbosity,
            default_prefix: default_prefix.to_string(),
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn with_colors(mut self, show_colors: bool) -> Self {
        self.show_colors = show_colors;
        self
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_results(&self, results: &SniffResults) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Json => self.format_json(results),
            OutputFormat::Summary => Ok(self.format_summary(results)),
            OutputFormat::Human => Ok(self.format_human(results)),
        }
    }

    fn format_human(&self, results: &SniffResults) -> String {
        let mut output = String::new();

        for file_result in &results.file_results {
            if self.verbosity == VerbosityLevel::Quiet && file_result.status.is_scanned() {
                continue;
            }
            output.push_str(&self.format_file_result(file_result));
            output.push('\n');
        }

        if self.verbosity == VerbosityLevel::Quiet {
            if results.has_failures() {
                output.push_str(&format!("Failed: {}\n", results.failed_files));
            }
            return output;
        }

        if !results.file_results.is_empty() {
            output.push('\n');
        }
        output.push_str(&self.format_summary(results));
        output
    }

    pub fn format_file_result(&self, result: &FileSniffResult) -> String {
        let path_display = result.path.display();
        let duration_str = format_duration(result.duration);

        match (&result.status, result.dialect) {
            (SniffStatus::Scanned, dialect) => {
                let dialect = dialect.unwrap_or_default();
                let label = format!("{:<8}", dialect.as_str().to_uppercase());
                let mut output = format!(
                    "{}  {} ({}) - {} namespace{}",
                    self.colorize(&label, dialect_color(dialect)),
                    path_display,
                    duration_str,
                    result.namespaces.len(),
                    if result.namespaces.len() == 1 { "" } else { "s" }
                );

                if self.verbosity >= VerbosityLevel::Verbose {
                    for ns in &result.namespaces {
                        output.push_str(&format!("\n    {}", self.format_namespace(ns)));
                    }
                }
                output
            }
            (SniffStatus::Failed { message }, _) => format!(
                "{}  {} ({}) - {}",
                self.colorize("FAILED  ", "31"),
                path_display,
                duration_str,
                message
            ),
        }
    }

    fn format_namespace(&self, ns: &NamespaceDeclaration) -> String {
        let attribute = ns.to_attribute(&self.default_prefix);
        if ns.no_namespace {
            format!("{} (no-namespace schema location)", attribute)
        } else if ns.is_default() {
            format!("{} (default namespace)", attribute)
        } else {
            attribute
        }
    }

    pub fn format_summary(&self, results: &SniffResults) -> String {
        let mut output = String::new();
        output.push_str("Sniff Summary:\n");
        output.push_str(&format!("  Total files: {}\n", results.total_files));
        output.push_str(&format!(
            "  {} {}\n",
            self.colorize("Scanned:", "32"),
            results.scanned_files
        ));
        if results.failed_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Failed:", "31"),
                results.failed_files
            ));
        }

        let dialects = Dialect::ALL
            .iter()
            .map(|d| format!("{} {}", d, results.dialects.get(*d)))
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!("  Dialects: {}\n", dialects));
        output.push_str(&format!(
            "  Distinct namespaces: {}\n",
            results.namespace_urls.len()
        ));
        if results.discovery_errors > 0 {
            output.push_str(&format!(
                "  Unreadable entries: {}\n",
                results.discovery_errors
            ));
        }
        output.push_str(&format!(
            "  Duration: {}\n",
            format_duration(results.total_duration)
        ));

        if self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&format!(
                "  Throughput: {:.1} files/sec\n",
                results.files_per_second()
            ));
            for url in &results.namespace_urls {
                output.push_str(&format!("    {}\n", url));
            }
        }

        output
    }

    fn format_json(&self, results: &SniffResults) -> Result<String, serde_json::Error> {
        let files = results
            .file_results
            .iter()
            .map(|file| JsonFile {
                path: file.path.display().to_string(),
                status: &file.status,
                dialect: file.dialect,
                namespaces: file
                    .namespaces
                    .iter()
                    .map(|ns| JsonNamespace {
                        prefix: ns.prefix.as_deref(),
                        url: &ns.url,
                        no_namespace: ns.no_namespace,
                        effective_prefix: ns.effective_prefix(&self.default_prefix),
                        attribute: ns.to_attribute(&self.default_prefix),
                    })
                    .collect(),
            })
            .collect();

        let report = JsonReport {
            default_prefix: &self.default_prefix,
            total_files: results.total_files,
            scanned_files: results.scanned_files,
            failed_files: results.failed_files,
            dialects: &results.dialects,
            namespace_urls: &results.namespace_urls,
            duration_ms: results.total_duration.as_millis(),
            files,
        };
        serde_json::to_string_pretty(&report)
    }
}

fn dialect_color(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Generic => "36",
        Dialect::Tei => "32",
        Dialect::Ram => "35",
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
