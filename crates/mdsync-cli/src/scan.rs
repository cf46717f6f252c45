use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use mdsync_core::markdown::partition_image_urls;
use mdsync_core::UrlFilter;

pub struct ScanOptions {
    pub md_dir: String,
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub accepted: Vec<String>,
    pub excluded: Vec<String>,
}

pub fn run_scan(opts: ScanOptions, filter: &UrlFilter) -> Result<(), String> {
    let reports = scan_dir(Path::new(&opts.md_dir), filter)?;

    if opts.json {
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    let mut accepted = 0usize;
    let mut excluded = 0usize;
    for report in &reports {
        println!("{}", report.file);
        for url in &report.accepted {
            println!("  {}", url);
        }
        accepted += report.accepted.len();
        excluded += report.excluded.len();
    }

    println!();
    println!("Markdown files: {}", reports.len());
    println!("Accepted images: {}", accepted);
    println!("Excluded images: {}", excluded);

    Ok(())
}

pub fn scan_dir(md_dir: &Path, filter: &UrlFilter) -> Result<Vec<FileReport>, String> {
    let mut reports = Vec::new();

    for path in markdown_files(md_dir)? {
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        let urls = partition_image_urls(&content, filter).map_err(|e| e.to_string())?;

        log::debug!(
            "{}: {} accepted, {} excluded",
            path.display(),
            urls.accepted.len(),
            urls.excluded.len()
        );

        reports.push(FileReport {
            file: path.file_name().unwrap_or_default().to_string_lossy().into_owned(),
            accepted: urls.accepted,
            excluded: urls.excluded,
        });
    }

    Ok(reports)
}

/// `*.md` files directly inside `dir`, sorted by name.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read '{}': {}", dir.display(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read '{}': {}", dir.display(), e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
