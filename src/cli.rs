use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show failures
    Quiet,
    /// Show the summary
    #[default]
    Normal,
    /// Show every file with its namespaces
    Verbose,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One block per file plus a summary
    #[default]
    Human,
    /// Machine-readable JSON document
    Json,
    /// Summary counts only
    Summary,
}

/// Sniff namespace declarations and dialects out of XML documents
#[derive(Parser, Debug, Clone)]
#[command(name = "xmlns-sniff")]
#[command(about = "Report namespace declarations and the dialect (generic, TEI, RAM) of XML documents")]
#[command(version)]
#[command(after_help = "EXAMPLES:
  xmlns-sniff corpus/
  xmlns-sniff -e xml,tei --format json corpus/ > report.json
  xmlns-sniff --default-prefix tei --verbose letter.xml")]
pub struct Cli {
    /// Directory or file to scan
    pub path: PathBuf,

    /// File extensions to process, comma-separated [default: xml]
    #[arg(short = 'e', long = "extensions")]
    pub extensions: Option<String>,

    /// Number of files scanned concurrently
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// List every file with its namespace declarations
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only report failures
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Prefix rendered for default namespaces
    #[arg(long = "default-prefix")]
    pub default_prefix: Option<String>,

    /// Per-file scan timeout in seconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Maximum directory depth to descend
    #[arg(long = "max-depth")]
    pub max_depth: Option<usize>,

    /// Include file patterns (glob syntax)
    #[arg(long = "include", action = clap::ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude file patterns (glob syntax)
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Stop at the first file that cannot be scanned
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Extensions given on the command line, or `xml`
    pub fn get_extensions(&self) -> Vec<String> {
        self.extensions
            .as_deref()
            .unwrap_or("xml")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.path.exists() {
            return Err(format!("Path does not exist: {}", self.path.display()));
        }
        if let Some(threads) = self.threads
            && threads == 0
        {
            return Err("Number of threads must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}
