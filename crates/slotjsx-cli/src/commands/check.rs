//! Check markup files for slotting errors.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;
use rayon::prelude::*;
use slotjsx::{
    create_element, parse_markup, with_slot_with, Builder, CollectingReporter, Scope, SlotOptions,
};
use walkdir::WalkDir;

use super::config::ConfigFile;

/// Problems found in one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub problems: Vec<String>,
}

/// Run the check command.
pub fn run(config: &ConfigFile, path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("{} does not exist", path.display());
    }

    // Fail fast on a bad [components] table rather than once per file
    config.registry()?;

    let files = collect_files(path, &config.check.extensions);
    tracing::info!("Checking {} file(s)...", files.len());

    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|file| check_file(config, file))
        .collect();

    let mut total = 0;
    for report in &reports {
        for problem in &report.problems {
            tracing::error!("{}: {}", report.path.display(), problem);
        }
        total += report.problems.len();
    }

    if total > 0 {
        anyhow::bail!("Found {} problem(s) in {} file(s)", total, files.len());
    }

    tracing::info!("No problems found");
    Ok(())
}

/// Collect markup files under `path`, or `path` itself if it is a file.
fn collect_files(path: &Path, extensions: &[String]) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| e == ext))
        })
        .collect();

    files.sort();
    files
}

/// Build one file and collect parse, build and slotting errors.
pub fn check_file(config: &ConfigFile, path: &Path) -> FileReport {
    let problems = match fs::read_to_string(path) {
        Ok(source) => check_source(config, &source, &path.display().to_string()),
        Err(e) => vec![format!("Failed to read: {}", e)],
    };
    tracing::debug!("Checked {} ({} problem(s))", path.display(), problems.len());

    FileReport {
        path: path.to_path_buf(),
        problems,
    }
}

fn check_source(config: &ConfigFile, source: &str, file_name: &str) -> Vec<String> {
    let markup = match parse_markup(source) {
        Ok(markup) => markup,
        Err(e) => return vec![e.to_string()],
    };
    let registry = match config.registry() {
        Ok(registry) => registry,
        Err(e) => return vec![e.to_string()],
    };

    let reporter = Rc::new(CollectingReporter::new());
    let options = SlotOptions::new()
        .with_merge(config.merge.strategy)
        .with_reporter(Rc::clone(&reporter));
    let jsx = with_slot_with(create_element, options);
    let scope = Scope::new();

    if let Err(e) = Builder::new(&registry, &scope)
        .file_name(file_name)
        .build(&markup, &jsx)
    {
        return vec![e.to_string()];
    }

    reporter.take().iter().map(ToString::to_string).collect()
}
