use crate::error::{Result, SniffError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Async discovery of XML documents below a directory
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// File extensions to include, lowercase without the dot (e.g. ["xml", "tei"])
    extensions: Vec<String>,
    include_set: Option<GlobSet>,
    exclude_set: Option<GlobSet>,
    /// Maximum directory depth (None = unlimited)
    max_depth: Option<usize>,
}

/// Files found by a discovery run plus the entries that could not be read
#[derive(Debug, Default, Clone)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub errors: Vec<(PathBuf, String)>,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_set: None,
            exclude_set: None,
            max_depth: None,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Only files matching at least one of these globs are kept
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.include_set = build_glob_set(&patterns, "include")?;
        Ok(self)
    }

    /// Files matching any of these globs are dropped
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.exclude_set = build_glob_set(&patterns, "exclude")?;
        Ok(self)
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Discover matching files in `path` (a file or a directory), sorted by path
    pub async fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.discover(path).await?.files)
    }

    /// Like [`discover_files`](Self::discover_files) but also reports unreadable entries.
    ///
    /// Failing to read the root itself is an error; failures below it are collected.
    pub async fn discover(&self, path: &Path) -> Result<Discovery> {
        let metadata = fs::metadata(path).await?;
        let mut found = Discovery::default();

        if metadata.is_file() {
            if self.should_process(path) {
                found.files.push(path.to_path_buf());
            }
            return Ok(found);
        }

        if !metadata.is_dir() {
            return Err(SniffError::FileSystemTraversal {
                path: path.to_path_buf(),
                reason: "not a regular file or directory".to_string(),
            });
        }

        // (directory, depth of its entries)
        let mut pending = vec![(path.to_path_buf(), 0usize)];
        while let Some((dir, depth)) = pending.pop() {
            let mut read_dir = match fs::read_dir(&dir).await {
                Ok(read_dir) => read_dir,
                Err(e) => {
                    warn!("Cannot read directory {}: {}", dir.display(), e);
                    found.errors.push((dir, e.to_string()));
                    continue;
                }
            };

            loop {
                let entry = match read_dir.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Error listing {}: {}", dir.display(), e);
                        found.errors.push((dir.clone(), e.to_string()));
                        break;
                    }
                };
                let entry_path = entry.path();

                // symlinks are never followed, so the walk cannot loop
                if entry_path.is_symlink() {
                    continue;
                }

                let metadata = match fs::metadata(&entry_path).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!("Skipping {}: {}", entry_path.display(), e);
                        found.errors.push((entry_path, e.to_string()));
                        continue;
                    }
                };

                if metadata.is_file() {
                    if self.should_process(&entry_path) {
                        found.files.push(entry_path);
                    }
                } else if metadata.is_dir() && self.may_descend(depth) {
                    pending.push((entry_path, depth + 1));
                }
            }
        }

        found.files.sort();
        Ok(found)
    }

    fn may_descend(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }

    /// Check a file against the extension list and the glob filters
    pub fn should_process(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        if !self.extensions.contains(&extension.to_lowercase()) {
            return false;
        }

        if let Some(exclude_set) = &self.exclude_set
            && exclude_set.is_match(path)
        {
            return false;
        }

        match &self.include_set {
            Some(include_set) => include_set.is_match(path),
            None => true,
        }
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

fn build_glob_set(patterns: &[String], kind: &str) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| SniffError::Config(format!("Invalid glob pattern '{}': {}", pattern, e)))?;
        builder.add(glob);
    }

    let set = builder
        .build()
        .map_err(|e| SniffError::Config(format!("Failed to build {} glob set: {}", kind, e)))?;
    Ok(Some(set))
}
