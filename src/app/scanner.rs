use crate::app::error::{ExcerptError, Result};
use crate::app::models::{FileEntry, RuntimeConfig};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};

/// Case-sensitive tail match against a set of suffixes.
#[derive(Debug, Clone)]
pub struct SuffixFilter {
    suffixes: Vec<String>,
}

impl SuffixFilter {
    pub fn new(suffixes: Vec<String>) -> Self {
        Self { suffixes }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }
}

pub struct Scanner {
    root: PathBuf,
    filter: SuffixFilter,
    exclude_set: GlobSet,
    sort: bool,
}

impl Scanner {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            root: config.root.clone(),
            filter: SuffixFilter::new(config.suffixes.clone()),
            exclude_set: build_globset(&config.exclude)?,
            sort: config.sort,
        })
    }

    /// Walks the root depth-first and returns every non-hidden file that
    /// passes the suffix filter.
    ///
    /// Order is whatever the platform's directory listing yields unless
    /// sorting was requested. The first unreadable directory aborts the walk.
    pub fn scan(&self) -> Result<Vec<FileEntry>> {
        validate_root(&self.root)?;

        let mut entries = Vec::new();

        // No ignore files; only dot-prefixed names are skipped, and hidden
        // directories are never descended into.
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .build();

        for result in walker {
            let entry = result.map_err(|source| ExcerptError::DirectoryReadFailure {
                path: walk_error_path(&source).unwrap_or(&self.root).to_path_buf(),
                source,
            })?;

            let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
            if is_dir {
                continue;
            }

            if let Some(processed) = self.process_file(entry.path()) {
                entries.push(processed);
            }
        }

        if self.sort {
            entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        }
        Ok(entries)
    }

    fn process_file(&self, path: &Path) -> Option<FileEntry> {
        let file_name = path.file_name()?.to_string_lossy();
        if !self.filter.matches(&file_name) {
            return None;
        }

        let relative_path = relative_path(&self.root, path);
        if self.exclude_set.is_match(&relative_path) {
            log::debug!("Excluded {}", relative_path);
            return None;
        }

        Some(FileEntry {
            path: path.to_path_buf(),
            relative_path,
        })
    }
}

/// Path a walk error refers to, looking through depth/line wrappers.
fn walk_error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        _ => None,
    }
}

fn validate_root(root: &Path) -> Result<()> {
    let meta = fs::metadata(root).map_err(|source| ExcerptError::DirectoryNotFound {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ExcerptError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// `/`-separated path of `path` below `root`, without a leading separator.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    let normalized = relative.to_string_lossy().replace('\\', "/");
    match normalized.strip_prefix('/') {
        Some(rest) => rest.to_string(),
        None => normalized,
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).map_err(|source| ExcerptError::InvalidPattern {
            pattern: pat.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ExcerptError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}
