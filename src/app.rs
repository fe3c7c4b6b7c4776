// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;

use self::cli::Cli;
use self::config::resolve_config;
use self::report::{DocxReport, ReportAssembler};
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Project name from the working directory, used to pick a preset
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let project_name = current_dir.file_name().and_then(|n| n.to_str());

    // 3. Resolve Configuration
    let config = resolve_config(args, project_name)?;

    // 4. Walk the root once
    let scanner = Scanner::new(&config)?;
    let files = scanner.scan()?;

    if files.is_empty() {
        log::warn!(
            "No files ending in {} under {}",
            config.suffixes.join(", "),
            config.root.display()
        );
    } else {
        log::info!("Found {} files under {}", files.len(), config.root.display());
    }

    // 5. Front and back sections
    let (report, summary) = ReportAssembler::new(DocxReport::new(&config.name)).assemble(files)?;

    // 6. Persist
    report.save(&config.output)?;

    log::info!(
        "Wrote {} ({} front files, {} back files, {} paragraphs, ~{} pages)",
        config.output.display(),
        summary.front_files,
        summary.back_files,
        summary.paragraphs,
        summary.estimated_pages
    );

    Ok(())
}
