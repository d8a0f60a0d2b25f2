use crate::cli::{Cli, OutputFormat, VerbosityLevel};
use crate::error::{ConfigError, ConfigResult as Result};
use crate::namespace::DEFAULT_PREFIX;
use crate::sniffer::SniffConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_NAMES: [&str; 4] = [
    "xmlns-sniff.toml",
    "xmlns-sniff.json",
    ".xmlns-sniff.toml",
    ".xmlns-sniff.json",
];

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub output: OutputConfig,
    pub files: FileConfig,
}

/// Scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of files scanned concurrently
    pub threads: Option<usize>,
    /// Stop at the first file that cannot be scanned
    pub fail_fast: bool,
    /// Per-file timeout in seconds
    pub timeout_seconds: u64,
    /// Prefix rendered for default namespaces
    pub default_prefix: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
}

/// File selection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// File extensions to process
    pub extensions: Vec<String>,
    /// Include patterns (glob syntax)
    pub include_patterns: Vec<String>,
    /// Exclude patterns (glob syntax)
    pub exclude_patterns: Vec<String>,
    /// Maximum directory depth (unlimited when absent)
    pub max_depth: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threads: None,
            fail_fast: false,
            timeout_seconds: 30,
            default_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_patterns: vec![],
            exclude_patterns: vec![],
            max_depth: None,
        }
    }
}

impl Config {
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.output.quiet {
            VerbosityLevel::Quiet
        } else if self.output.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let config = match &cli.config {
            Some(config_path) => Self::load_from_file(config_path).await?,
            None => Self::find_config_file().await?.unwrap_or_default(),
        };

        let config = Self::apply_environment_overrides(config)?;
        let config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON); missing keys take defaults
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => match toml::from_str::<Config>(&content) {
                Ok(config) => Ok(config),
                Err(_) => Ok(serde_json::from_str(&content)?),
            },
        }
    }

    /// Find a configuration file in the current directory or the user config directory
    pub async fn find_config_file() -> Result<Option<Config>> {
        let mut dirs_to_search = vec![PathBuf::from(".")];
        if let Some(config_dir) = dirs::config_dir() {
            dirs_to_search.push(config_dir.join("xmlns-sniff"));
        }

        for dir in dirs_to_search {
            for name in CONFIG_NAMES {
                let path = dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(threads) = env.get("XMLNS_SNIFF_THREADS") {
            config.scan.threads = Some(parse_env("XMLNS_SNIFF_THREADS", &threads)?);
        }

        if let Some(fail_fast) = env.get("XMLNS_SNIFF_FAIL_FAST") {
            config.scan.fail_fast = parse_env("XMLNS_SNIFF_FAIL_FAST", &fail_fast)?;
        }

        if let Some(timeout) = env.get("XMLNS_SNIFF_TIMEOUT") {
            config.scan.timeout_seconds = parse_env("XMLNS_SNIFF_TIMEOUT", &timeout)?;
        }

        if let Some(prefix) = env.get("XMLNS_SNIFF_DEFAULT_PREFIX") {
            config.scan.default_prefix = prefix;
        }

        if let Some(verbose) = env.get("XMLNS_SNIFF_VERBOSE") {
            config.output.verbose = parse_env("XMLNS_SNIFF_VERBOSE", &verbose)?;
        }

        if let Some(quiet) = env.get("XMLNS_SNIFF_QUIET") {
            config.output.quiet = parse_env("XMLNS_SNIFF_QUIET", &quiet)?;
        }

        if let Some(format) = env.get("XMLNS_SNIFF_FORMAT") {
            config.output.format = match format.to_lowercase().as_str() {
                "human" => OutputFormat::Human,
                "json" => OutputFormat::Json,
                "summary" => OutputFormat::Summary,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid XMLNS_SNIFF_FORMAT value: {}",
                        format
                    )));
                }
            };
        }

        if let Some(extensions) = env.get("XMLNS_SNIFF_EXTENSIONS") {
            config.files.extensions = extensions
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if cli.threads.is_some() {
            config.scan.threads = cli.threads;
        }
        if cli.fail_fast {
            config.scan.fail_fast = true;
        }
        if let Some(timeout) = cli.timeout {
            config.scan.timeout_seconds = timeout;
        }
        if let Some(prefix) = &cli.default_prefix {
            config.scan.default_prefix = prefix.clone();
        }

        if let Some(format) = cli.output_format {
            config.output.format = format;
        }
        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
        }

        if cli.extensions.is_some() {
            config.files.extensions = cli.get_extensions();
        }
        if !cli.include_patterns.is_empty() {
            config.files.include_patterns = cli.include_patterns.clone();
        }
        if !cli.exclude_patterns.is_empty() {
            config.files.exclude_patterns = cli.exclude_patterns.clone();
        }
        if cli.max_depth.is_some() {
            config.files.max_depth = cli.max_depth;
        }

        config
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if let Some(threads) = config.scan.threads {
            if threads == 0 {
                return Err(ConfigError::Validation(
                    "Number of threads must be greater than 0".to_string(),
                ));
            }
            if threads > 1000 {
                return Err(ConfigError::Validation(
                    "Number of threads cannot exceed 1000".to_string(),
                ));
            }
        }

        if config.scan.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        let prefix = &config.scan.default_prefix;
        if prefix.is_empty() || prefix.contains(':') || prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "Invalid default prefix: '{}'",
                prefix
            )));
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        if config.files.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "At least one file extension must be specified".to_string(),
            ));
        }

        for ext in &config.files.extensions {
            if ext.contains('/') || ext.contains('\\') || ext.contains('.') {
                return Err(ConfigError::Validation(format!(
                    "Invalid file extension: {}",
                    ext
                )));
            }
        }

        Ok(())
    }

    /// Get the effective thread count
    pub fn get_thread_count(config: &Config) -> usize {
        config.scan.threads.unwrap_or_else(num_cpus::get)
    }

    pub fn get_timeout_duration(config: &Config) -> Duration {
        Duration::from_secs(config.scan.timeout_seconds)
    }

    /// Engine settings derived from the scan section
    pub fn sniff_config(config: &Config) -> SniffConfig {
        SniffConfig {
            max_concurrent_scans: Self::get_thread_count(config),
            scan_timeout: Self::get_timeout_duration(config),
            fail_fast: config.scan.fail_fast,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value)))
}
