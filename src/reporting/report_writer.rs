//! Quarantine relocation and the audit report
//!
//! Every duplicate is moved into the quarantine directory under its base
//! file name and gets exactly one report line:
//!
//! ```text
//! - Duplicate: <path> (Original: <path>) - Moved
//! - Error moving: <path> <error message>
//! ```
//!
//! Lines are written as each move finishes, so an interrupted run leaves a
//! report covering the moves that already happened.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::error::{DedupError, DedupResult};
use crate::scanner::duplicate_detector::DuplicatePair;

/// What happened to one duplicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RelocationOutcome {
    Moved { destination: PathBuf },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RelocationRecord {
    #[serde(flatten)]
    pub pair: DuplicatePair,
    pub outcome: RelocationOutcome,
}

/// Result of relocating a batch of duplicates
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelocationSummary {
    pub records: Vec<RelocationRecord>,
    /// `None` when there was nothing to report
    pub report_path: Option<PathBuf>,
    pub interrupted: bool,
}

impl RelocationSummary {
    pub fn moved(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RelocationOutcome::Moved { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.moved()
    }
}

pub fn format_moved_line(pair: &DuplicatePair) -> String {
    format!(
        "- Duplicate: {} (Original: {}) - Moved\n",
        pair.duplicate.display(),
        pair.original.display()
    )
}

pub fn format_error_line(duplicate: &Path, message: &str) -> String {
    format!("- Error moving: {} {}\n", duplicate.display(), message)
}

/// Create the quarantine directory and any missing parents
pub fn ensure_quarantine_dir(dir: &Path) -> DedupResult<()> {
    fs::create_dir_all(dir).map_err(|source| DedupError::Quarantine {
        path: dir.to_path_buf(),
        source,
    })
}

/// Pick a free destination for `file_name` inside `dir`
///
/// `name.ext` is used when free, then `name_1.ext`, `name_2.ext`, ... so a
/// duplicate never overwrites something already in quarantine.
pub fn quarantine_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !path_taken(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    let mut counter = 1u64;
    loop {
        let numbered = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = dir.join(numbered);
        if !path_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn path_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Move `src` to `dest`
///
/// Tries a plain rename first and falls back to copy + remove (e.g. across
/// devices). If the copy or the source removal fails, whatever landed at
/// `dest` is removed again; a failure to do so is logged.
pub fn move_file(src: &Path, dest: &Path) -> io::Result<()> {
    fs::symlink_metadata(src)?;

    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            log::debug!(
                "rename {} -> {} failed ({}), copying instead",
                src.display(),
                dest.display(),
                rename_err
            );
            if let Err(e) = fs::copy(src, dest) {
                discard_partial_copy(dest);
                return Err(e);
            }
            if let Err(e) = fs::remove_file(src) {
                discard_partial_copy(dest);
                return Err(e);
            }
            Ok(())
        }
    }
}

fn discard_partial_copy(dest: &Path) {
    match fs::remove_file(dest) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!(
            "Could not remove leftover copy {}: {}",
            dest.display(),
            e
        ),
    }
}

/// Move every duplicate into quarantine and write the report
///
/// # Arguments
/// * `pairs` - Duplicates in detection order
/// * `quarantine_dir` - Destination directory, created if missing
/// * `report_path` - Report file, truncated if it exists
/// * `stop` - Checked before each move; set to end the run early
///
/// # Returns
/// One record per attempted move. With no pairs, nothing is created on disk.
pub fn relocate_duplicates(
    pairs: &[DuplicatePair],
    quarantine_dir: &Path,
    report_path: &Path,
    stop: &AtomicBool,
) -> DedupResult<RelocationSummary> {
    if pairs.is_empty() {
        return Ok(RelocationSummary::default());
    }

    ensure_quarantine_dir(quarantine_dir)?;

    let report_err = |source: io::Error| DedupError::Report {
        path: report_path.to_path_buf(),
        source,
    };
    let mut report = File::create(report_path).map_err(report_err)?;

    let mut summary = RelocationSummary {
        records: Vec::with_capacity(pairs.len()),
        report_path: Some(report_path.to_path_buf()),
        interrupted: false,
    };

    for pair in pairs {
        if stop.load(Ordering::SeqCst) {
            log::warn!(
                "Interrupted, {} duplicate(s) left in place",
                pairs.len() - summary.records.len()
            );
            summary.interrupted = true;
            break;
        }

        let outcome = match relocate_one(&pair.duplicate, quarantine_dir) {
            Ok(destination) => {
                log::info!("Moved {} -> {}", pair.duplicate.display(), destination.display());
                report
                    .write_all(format_moved_line(pair).as_bytes())
                    .map_err(report_err)?;
                RelocationOutcome::Moved { destination }
            }
            Err(e) => {
                let message = e.to_string();
                let line = format_error_line(&pair.duplicate, &message);
                log::debug!("{}", line.trim_end());
                report.write_all(line.as_bytes()).map_err(report_err)?;
                RelocationOutcome::Failed { message }
            }
        };

        summary.records.push(RelocationRecord {
            pair: pair.clone(),
            outcome,
        });
    }

    report.flush().map_err(report_err)?;
    Ok(summary)
}

fn relocate_one(duplicate: &Path, quarantine_dir: &Path) -> DedupResult<PathBuf> {
    let file_name = duplicate.file_name().ok_or_else(|| {
        DedupError::moving(
            duplicate,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;

    let destination = quarantine_destination(quarantine_dir, &file_name.to_string_lossy());
    move_file(duplicate, &destination).map_err(|e| DedupError::moving(duplicate, e))?;
    Ok(destination)
}
