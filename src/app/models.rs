use std::path::PathBuf;

/// Final configuration after merging presets and CLI args. Immutable once built.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub suffixes: Vec<String>,
    pub name: String,
    pub output: PathBuf,
    pub exclude: Vec<String>,
    pub sort: bool,
}

/// A source file discovered during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated, no leading separator.
    pub relative_path: String,
}
