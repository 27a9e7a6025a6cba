//! Depth-first directory traversal with per-directory reporting.
//!
//! Files directly inside a directory are checked before its
//! subdirectories are entered. Each reported directory gets a bracketed
//! header, one result line per candidate file, and a totals line from its
//! own tally. Entries are sorted by file name so transcripts are
//! deterministic across platforms.

use crate::classifier;
use crate::errors::Result;
use crate::runner::{self, RunOutcome};
use crate::tally::{DirTally, ScanStats};
use crate::transcript::Transcript;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Target container extension. Only Matroska files are checked.
pub const TARGET_EXTENSIONS: &[&str] = &["mkv"];

/// Immutable parameters for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub tool: PathBuf,
    pub timeout: Duration,
}

/// True for files the scan should validate (extension match, case
/// folded).
pub fn is_candidate(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    TARGET_EXTENSIONS.contains(&ext.as_str())
}

/// Scan the tree under `config.root` and emit the full transcript.
pub fn scan(config: &ScanConfig, out: &mut Transcript) -> Result<ScanStats> {
    out.line(&format!("🔍 Scanning {}", config.root.display()))?;

    let mut stats = ScanStats::default();
    scan_directory(config, &config.root, out, &mut stats)?;

    out.line("Done!")?;
    info!(
        directories = stats.directories,
        files = stats.files,
        passed = stats.passed,
        failed = stats.failed,
        "Scan complete"
    );
    Ok(stats)
}

fn scan_directory(
    config: &ScanConfig,
    dir: &Path,
    out: &mut Transcript,
    stats: &mut ScanStats,
) -> Result<()> {
    let (files, subdirs) = collect_level(dir);

    // A directory with no candidates reports nothing, but its
    // subdirectories are still scanned.
    if !files.is_empty() {
        out.line(&format!("[{}]", relative_display(config, dir)))?;

        let mut tally = DirTally::new();
        for file in &files {
            let passed = check_file(config, file)?;
            if passed {
                tally.record_pass();
            } else {
                tally.record_fail();
            }
            out.line(&format!(
                "{} -- {}",
                relative_display(config, file),
                if passed { "OK" } else { "FAIL" }
            ))?;
        }

        out.line(&format!(
            "[Totals: {} success(es), {} failure(s)]",
            tally.passed(),
            tally.failed()
        ))?;
        stats.absorb(&tally);
    }

    for sub in &subdirs {
        scan_directory(config, sub, out, stats)?;
    }
    Ok(())
}

/// Enumerate one directory level: candidate files and subdirectories,
/// each sorted by file name. Unreadable entries are logged and skipped.
fn collect_level(dir: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            subdirs.push(entry.into_path());
        } else if entry.file_type().is_file() && is_candidate(entry.path()) {
            files.push(entry.into_path());
        }
    }

    (files, subdirs)
}

/// Validate and classify one candidate file. Timeouts and classification
/// defects both count as failure for this file only.
fn check_file(config: &ScanConfig, file: &Path) -> Result<bool> {
    match runner::validate(&config.tool, file, config.timeout)? {
        RunOutcome::TimedOut => {
            warn!(
                file = %file.display(),
                timeout_secs = config.timeout.as_secs_f64(),
                "Validation timed out; counting as failure"
            );
            Ok(false)
        }
        RunOutcome::Completed(text) => match classifier::classify(&text) {
            Ok(verdict) => {
                for line in verdict.error_lines() {
                    warn!(file = %file.display(), diagnostic = %line, "Corruption diagnostic");
                }
                Ok(verdict.passed())
            }
            Err(e) => {
                error!(
                    file = %file.display(),
                    error = %e,
                    "Diagnostic classification failed; counting as failure"
                );
                Ok(false)
            }
        },
    }
}

fn relative_display(config: &ScanConfig, path: &Path) -> String {
    match path.strip_prefix(&config.root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
