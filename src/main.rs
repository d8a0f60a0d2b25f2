use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::prelude::*;

use xmlns_sniff::{
    Cli, ConfigManager, ErrorReporter, FileDiscovery, Output, ProgressCallback, SniffEngine,
    SniffError, SniffPhase, SniffProgress, VerbosityLevel,
};

const EXIT_FAILURES: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_args();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        return Ok(ExitCode::from(EXIT_USAGE));
    }

    let config = match ConfigManager::load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            ErrorReporter::new(cli.verbosity()).report_config_error(&e);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let verbosity = config.verbosity();
    init_tracing(verbosity);
    let reporter = ErrorReporter::new(verbosity);
    tracing::debug!("Effective configuration: {:?}", config);

    let discovery = match FileDiscovery::new()
        .with_extensions(config.files.extensions.clone())
        .with_max_depth(config.files.max_depth)
        .with_include_patterns(config.files.include_patterns.clone())
        .and_then(|d| d.with_exclude_patterns(config.files.exclude_patterns.clone()))
    {
        Ok(discovery) => discovery,
        Err(e) => {
            reporter.report_sniff_error(&e);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let engine = SniffEngine::new(ConfigManager::sniff_config(&config))?;

    let progress = (verbosity == VerbosityLevel::Verbose && atty::is(atty::Stream::Stderr))
        .then(|| progress_callback(verbosity));

    let results = match engine
        .sniff_path_with_progress(&cli.path, &discovery, progress)
        .await
    {
        Ok(results) => results,
        Err(e) => {
            reporter.report_sniff_error(&e);
            let code = match e {
                SniffError::Config(_) => EXIT_USAGE,
                _ => EXIT_FAILURES,
            };
            return Ok(ExitCode::from(code));
        }
    };

    let output = Output::new(config.output.format, verbosity, &config.scan.default_prefix);
    let rendered = output
        .format_results(&results)
        .context("Failed to render results")?;
    print!("{}", rendered);

    if results.has_failures() {
        Ok(ExitCode::from(EXIT_FAILURES))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn progress_callback(verbosity: VerbosityLevel) -> ProgressCallback {
    let reporter = ErrorReporter::new(verbosity);
    Arc::new(move |progress: SniffProgress| {
        if progress.phase == SniffPhase::Scanning {
            reporter.report_progress(
                progress.completed,
                progress.total,
                progress.current_file.as_deref(),
            );
        }
    })
}

/// Log to stderr; RUST_LOG wins over the verbosity default
fn init_tracing(verbosity: VerbosityLevel) {
    let default_filter = match verbosity {
        VerbosityLevel::Verbose => "warn,xmlns_sniff=debug",
        VerbosityLevel::Normal | VerbosityLevel::Quiet => "warn",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
