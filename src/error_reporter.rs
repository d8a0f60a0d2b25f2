use crate::cli::VerbosityLevel;
use crate::error::{ConfigError, SniffError};
use std::path::Path;

/// Error reporter with configurable verbosity; everything goes to stderr
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
}

impl ErrorReporter {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Report an error that stopped the run
    pub fn report_sniff_error(&self, error: &SniffError) {
        eprintln!("{}", self.format_sniff_error(error));
    }

    pub fn report_config_error(&self, error: &ConfigError) {
        eprintln!("{}", self.format_config_error(error));
    }

    /// Report progress of the scanning phase
    pub fn report_progress(&self, current: usize, total: usize, current_file: Option<&Path>) {
        if self.verbosity == VerbosityLevel::Quiet || total == 0 {
            return;
        }

        let percentage = (current as f64 / total as f64 * 100.0) as u32;
        match (self.verbosity, current_file) {
            (VerbosityLevel::Verbose, Some(file)) => eprint!(
                "\rProgress: {}/{} ({}%) - {}",
                current,
                total,
                percentage,
                file.display()
            ),
            _ => eprint!("\rProgress: {}/{} ({}%)", current, total, percentage),
        }

        if current == total {
            eprintln!();
        }
    }

    pub fn format_sniff_error(&self, error: &SniffError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("ERROR: {}", error),
            VerbosityLevel::Normal => error.to_string(),
            VerbosityLevel::Verbose => {
                let mut output = error.to_string();
                if let Some(hint) = sniff_hint(error) {
                    output.push_str("\nSuggestion: ");
                    output.push_str(hint);
                }

                let mut current: &dyn std::error::Error = error;
                let mut level = 0;
                while let Some(source) = current.source() {
                    level += 1;
                    output.push_str(&format!("\n  {}: {}", level, source));
                    current = source;
                }
                output
            }
        }
    }

    pub fn format_config_error(&self, error: &ConfigError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("Config error: {}", error),
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                format!("Configuration Error: {}\n{}", error, config_help(error))
            }
        }
    }
}

fn sniff_hint(error: &SniffError) -> Option<&'static str> {
    match error {
        SniffError::MalformedDeclaration { .. } => {
            Some("Every xmlns declaration must have a quoted value on a single line")
        }
        SniffError::ScanAborted { .. } => Some("Check that the file is readable UTF-8 text"),
        SniffError::Timeout { .. } => Some("Raise the limit with --timeout"),
        SniffError::FileSystemTraversal { .. } | SniffError::Io(_) => {
            Some("Check the path and its permissions")
        }
        _ => None,
    }
}

fn config_help(error: &ConfigError) -> &'static str {
    match error {
        ConfigError::Io(_) => "Check that the configuration file exists and is readable",
        ConfigError::TomlParsing(_) | ConfigError::JsonParsing(_) => {
            "Check the configuration file syntax (TOML/JSON format expected)"
        }
        ConfigError::Validation(_) => "Fix the offending value in the file, environment, or flags",
        ConfigError::Environment(_) => "Fix or unset the XMLNS_SNIFF_* environment variable",
        ConfigError::UnsupportedFormat(_) => "Use a .toml or .json configuration file",
    }
}
