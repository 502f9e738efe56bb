//! One end-to-end duplicate run
//!
//! Scan → classify → relocate. All state for the run (digest index, duplicate
//! list, counters) lives inside [`DedupRun::execute`] and is dropped when it
//! returns.

use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::config::RunConfig;
use super::digest::{ContentHasher, HashAlgorithm};
use super::error::{DedupError, DedupResult};
use crate::reporting::report_writer::{
    ensure_quarantine_dir, relocate_duplicates, RelocationOutcome, RelocationRecord,
};
use crate::scanner::duplicate_detector::Classifier;
use crate::scanner::file_scanner::collect_candidate_files;

/// Summary of a finished (or interrupted) run
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub algorithm: HashAlgorithm,
    pub files_scanned: usize,
    pub originals: usize,
    pub read_errors: Vec<PathBuf>,
    pub duplicates_found: usize,
    pub relocations: Vec<RelocationRecord>,
    /// `None` when no duplicates were found
    pub report_path: Option<PathBuf>,
    pub interrupted: bool,
}

impl RunOutcome {
    pub fn moved(&self) -> usize {
        self.relocations
            .iter()
            .filter(|r| matches!(r.outcome, RelocationOutcome::Moved { .. }))
            .count()
    }

    pub fn move_errors(&self) -> usize {
        self.relocations.len() - self.moved()
    }

    pub fn has_duplicates(&self) -> bool {
        self.duplicates_found > 0
    }

    /// Whether any file could not be read or moved
    pub fn had_file_errors(&self) -> bool {
        !self.read_errors.is_empty() || self.move_errors() > 0
    }
}

pub struct DedupRun {
    config: RunConfig,
    shutdown: Arc<AtomicBool>,
}

impl DedupRun {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a flag that stops the run between files when set
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    /// Run with the configured hash algorithm
    pub fn execute(&self, progress: &ProgressBar) -> DedupResult<RunOutcome> {
        self.execute_with_hasher(self.config.algorithm, progress)
    }

    /// Run with an arbitrary digest function
    pub fn execute_with_hasher<H: ContentHasher>(
        &self,
        hasher: H,
        progress: &ProgressBar,
    ) -> DedupResult<RunOutcome> {
        let config = &self.config;
        config.validate()?;
        ensure_quarantine_dir(&config.quarantine_dir)?;

        let files = collect_candidate_files(&config.root, &config.filter, config.excluded_dir())?;
        progress.set_length(files.len() as u64);
        log::info!(
            "Scanning {} file(s) under {} with {}",
            files.len(),
            config.root.display(),
            config.algorithm
        );

        let mut classifier = Classifier::new(hasher);
        let mut read_errors = Vec::new();
        let mut files_scanned = 0;
        let mut interrupted = false;

        for entry in &files {
            if self.shutdown.load(Ordering::SeqCst) {
                interrupted = true;
                break;
            }

            match classifier.classify(&entry.path) {
                Ok(_) => files_scanned += 1,
                Err(DedupError::Read { path, source }) => {
                    log::warn!("Error reading file: {} - {}", path.display(), source);
                    read_errors.push(path);
                }
                Err(e) => return Err(e),
            }
            progress.inc(1);
        }

        let originals = classifier.originals();
        let pairs = classifier.into_duplicates();

        let mut outcome = RunOutcome {
            algorithm: config.algorithm,
            files_scanned,
            originals,
            read_errors,
            duplicates_found: pairs.len(),
            relocations: Vec::new(),
            report_path: None,
            interrupted,
        };

        if interrupted {
            log::warn!("Interrupted during scan, no files were moved");
            return Ok(outcome);
        }

        let summary = relocate_duplicates(
            &pairs,
            &config.quarantine_dir,
            &config.report_path,
            &self.shutdown,
        )?;
        outcome.relocations = summary.records;
        outcome.report_path = summary.report_path;
        outcome.interrupted = summary.interrupted;

        Ok(outcome)
    }
}
