//! Concurrent sniffing of many documents
//!
//! Files are discovered asynchronously, then every file is scanned in its own
//! tokio task. The scans themselves are plain blocking reads, so each one runs
//! under `spawn_blocking`; a semaphore bounds how many run at once.

use futures::future::try_join_all;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::classifier::{Dialect, classify_dialect_from_path};
use crate::error::{Result, SniffError};
use crate::extractor::extract_namespaces_from_path;
use crate::file_discovery::FileDiscovery;
use crate::namespace::NamespaceDeclaration;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SniffConfig {
    /// Number of files scanned at the same time
    pub max_concurrent_scans: usize,
    /// Upper bound for scanning a single file
    pub scan_timeout: Duration,
    /// Stop at the first file that cannot be scanned
    pub fail_fast: bool,
}

impl Default for SniffConfig {
    fn default() -> Self {
        Self {
            max_concurrent_scans: num_cpus::get(),
            scan_timeout: Duration::from_secs(30),
            fail_fast: false,
        }
    }
}

/// Outcome of scanning a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SniffStatus {
    Scanned,
    Failed { message: String },
}

impl SniffStatus {
    pub fn is_scanned(&self) -> bool {
        matches!(self, SniffStatus::Scanned)
    }
}

/// What was learned about one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSniffResult {
    pub path: PathBuf,
    pub status: SniffStatus,
    /// None when the file could not be scanned
    pub dialect: Option<Dialect>,
    /// Declarations in discovery order
    pub namespaces: Vec<NamespaceDeclaration>,
    pub duration: Duration,
}

impl FileSniffResult {
    pub fn scanned(
        path: PathBuf,
        dialect: Dialect,
        namespaces: Vec<NamespaceDeclaration>,
        duration: Duration,
    ) -> Self {
        Self {
            path,
            status: SniffStatus::Scanned,
            dialect: Some(dialect),
            namespaces,
            duration,
        }
    }

    pub fn failed(path: PathBuf, error: &SniffError, duration: Duration) -> Self {
        Self {
            path,
            status: SniffStatus::Failed {
                message: error.to_string(),
            },
            dialect: None,
            namespaces: Vec::new(),
            duration,
        }
    }
}

/// Number of scanned files per dialect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectCounts {
    pub generic: usize,
    pub tei: usize,
    pub ram: usize,
}

impl DialectCounts {
    pub fn record(&mut self, dialect: Dialect) {
        match dialect {
            Dialect::Generic => self.generic += 1,
            Dialect::Tei => self.tei += 1,
            Dialect::Ram => self.ram += 1,
        }
    }

    pub fn get(&self, dialect: Dialect) -> usize {
        match dialect {
            Dialect::Generic => self.generic,
            Dialect::Tei => self.tei,
            Dialect::Ram => self.ram,
        }
    }
}

/// Aggregated results of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SniffResults {
    pub total_files: usize,
    pub scanned_files: usize,
    pub failed_files: usize,
    pub dialects: DialectCounts,
    /// Distinct namespace URLs over all scanned files, sorted
    pub namespace_urls: Vec<String>,
    /// Directory entries that could not be read during discovery
    pub discovery_errors: usize,
    pub total_duration: Duration,
    pub file_results: Vec<FileSniffResult>,
}

impl SniffResults {
    pub fn aggregate(file_results: Vec<FileSniffResult>, total_duration: Duration) -> Self {
        let mut scanned_files = 0;
        let mut failed_files = 0;
        let mut dialects = DialectCounts::default();
        let mut namespace_urls = BTreeSet::new();

        for result in &file_results {
            match result.status {
                SniffStatus::Scanned => scanned_files += 1,
                SniffStatus::Failed { .. } => failed_files += 1,
            }
            if let Some(dialect) = result.dialect {
                dialects.record(dialect);
            }
            for ns in &result.namespaces {
                namespace_urls.insert(ns.url.clone());
            }
        }

        Self {
            total_files: file_results.len(),
            scanned_files,
            failed_files,
            dialects,
            namespace_urls: namespace_urls.into_iter().collect(),
            discovery_errors: 0,
            total_duration,
            file_results,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed_files > 0
    }

    pub fn files_per_second(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs > 0.0 {
            self.total_files as f64 / secs
        } else {
            0.0
        }
    }
}

/// Phase of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffPhase {
    Discovery,
    Scanning,
    Complete,
}

/// Progress update for a batch run
#[derive(Debug, Clone)]
pub struct SniffProgress {
    pub current_file: Option<PathBuf>,
    pub completed: usize,
    pub total: usize,
    pub phase: SniffPhase,
}

/// Progress callback type for batch updates
pub type ProgressCallback = Arc<dyn Fn(SniffProgress) + Send + Sync>;

/// Batch engine running the extractor and classifier over many files
pub struct SniffEngine {
    config: SniffConfig,
}

impl SniffEngine {
    pub fn new(config: SniffConfig) -> Result<Self> {
        if config.max_concurrent_scans == 0 {
            return Err(SniffError::Config(
                "Number of concurrent scans must be greater than 0".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SniffConfig {
        &self.config
    }

    pub async fn sniff_path(&self, path: &Path, discovery: &FileDiscovery) -> Result<SniffResults> {
        self.sniff_path_with_progress(path, discovery, None).await
    }

    /// Discover the files under `path` and sniff each of them
    pub async fn sniff_path_with_progress(
        &self,
        path: &Path,
        discovery: &FileDiscovery,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<SniffResults> {
        let start = Instant::now();
        notify(&progress_callback, None, 0, 0, SniffPhase::Discovery);

        let found = discovery.discover(path).await?;
        debug!(
            "Discovered {} files under {} ({} unreadable entries)",
            found.files.len(),
            path.display(),
            found.errors.len()
        );

        let file_results = self
            .sniff_files_with_progress(found.files, progress_callback.clone())
            .await?;

        let mut results = SniffResults::aggregate(file_results, start.elapsed());
        results.discovery_errors = found.errors.len();

        notify(
            &progress_callback,
            None,
            results.total_files,
            results.total_files,
            SniffPhase::Complete,
        );
        Ok(results)
    }

    pub async fn sniff_files(&self, files: Vec<PathBuf>) -> Result<Vec<FileSniffResult>> {
        self.sniff_files_with_progress(files, None).await
    }

    /// Sniff the given files concurrently; results keep the input order
    pub async fn sniff_files_with_progress(
        &self,
        files: Vec<PathBuf>,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<Vec<FileSniffResult>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let total = files.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_scans));

        let tasks: Vec<_> = files
            .into_iter()
            .map(|path| {
                let semaphore = Arc::clone(&semaphore);
                let completed = Arc::clone(&completed);
                let progress_callback = progress_callback.clone();
                let timeout = self.config.scan_timeout;
                let fail_fast = self.config.fail_fast;

                tokio::spawn(async move {
                    let permit = semaphore.acquire_owned().await.map_err(|_| {
                        SniffError::Concurrency {
                            details: "Failed to acquire scan semaphore".to_string(),
                        }
                    })?;

                    let result = Self::sniff_with_timeout(path.clone(), timeout, permit).await;

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    notify(
                        &progress_callback,
                        Some(path.clone()),
                        done,
                        total,
                        SniffPhase::Scanning,
                    );

                    if fail_fast && let SniffStatus::Failed { message } = &result.status {
                        return Err(SniffError::ScanFailed {
                            file: path,
                            details: message.clone(),
                        });
                    }
                    Ok::<FileSniffResult, SniffError>(result)
                })
            })
            .collect();

        let joined = try_join_all(tasks)
            .await
            .map_err(|e| SniffError::Concurrency {
                details: format!("Task join error: {}", e),
            })?;

        joined.into_iter().collect()
    }

    /// A blocking read cannot be cancelled, so the permit travels with it and
    /// is only released once the read returns, even after a timeout.
    async fn sniff_with_timeout(
        path: PathBuf,
        timeout: Duration,
        permit: OwnedSemaphorePermit,
    ) -> FileSniffResult {
        let start = Instant::now();
        let scan_path = path.clone();
        let scan = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            Self::sniff_file(&scan_path)
        });

        match tokio::time::timeout(timeout, scan).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => FileSniffResult::failed(
                path,
                &SniffError::Concurrency {
                    details: format!("Join error: {}", e),
                },
                start.elapsed(),
            ),
            Err(_) => {
                let error = SniffError::Timeout {
                    file: path.clone(),
                    timeout_seconds: timeout.as_secs(),
                };
                FileSniffResult::failed(path, &error, start.elapsed())
            }
        }
    }

    /// Sniff one file on the current thread.
    ///
    /// Namespaces and dialect are read in two independent passes, each with its
    /// own file handle.
    pub fn sniff_file(path: &Path) -> FileSniffResult {
        let start = Instant::now();

        let namespaces = match extract_namespaces_from_path(path) {
            Ok(namespaces) => namespaces,
            Err(e) => {
                debug!("Namespace scan of {} failed: {}", path.display(), e);
                return FileSniffResult::failed(path.to_path_buf(), &e, start.elapsed());
            }
        };
        let dialect = classify_dialect_from_path(path);
        debug!(
            "{}: {} ({} namespaces)",
            path.display(),
            dialect,
            namespaces.len()
        );

        FileSniffResult::scanned(
            path.to_path_buf(),
            dialect,
            namespaces.into_vec(),
            start.elapsed(),
        )
    }
}

fn notify(
    callback: &Option<ProgressCallback>,
    current_file: Option<PathBuf>,
    completed: usize,
    total: usize,
    phase: SniffPhase,
) {
    if let Some(callback) = callback {
        callback(SniffProgress {
            current_file,
            completed,
            total,
            phase,
        });
    }
}
