use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Build a front/back excerpt document of a codebase's source files"
)]
pub struct Cli {
    /// Root directory to scan (may come from a preset instead)
    #[arg(short = 'r', long = "root")]
    pub root: Option<PathBuf>,

    /// Semicolon-separated file suffixes to include (e.g. ".go;.vue") [default: .go]
    #[arg(short = 'f', long = "suffixes")]
    pub suffixes: Option<String>,

    /// Text shown in the page header
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Output document path [default: 程序鉴别材料.docx]
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Glob patterns (relative to the root) for files to leave out
    #[arg(short = 'e', long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Sort files by relative path instead of directory listing order
    #[arg(long)]
    pub sort: bool,

    /// Use a named preset from presets.toml
    #[arg(long)]
    pub preset: Option<String>,
}
