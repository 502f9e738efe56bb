//! Duplicate file detection by content digest

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::digest::{ContentHasher, Digest};
use crate::core::error::{DedupError, DedupResult};

/// A file whose content matches an earlier one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    pub duplicate: PathBuf,
    pub original: PathBuf,
}

/// How a single file was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Original,
    Duplicate { original: PathBuf },
}

/// Read a whole file and digest its content
///
/// # Arguments
/// * `path` - Path to the file
/// * `hasher` - Run-wide digest function
pub fn compute_file_digest<H: ContentHasher + ?Sized>(path: &Path, hasher: &H) -> DedupResult<Digest> {
    let content = fs::read(path).map_err(|e| DedupError::read(path, e))?;
    Ok(hasher.digest(&content))
}

/// Splits files into originals and duplicates as they are fed in.
///
/// The first path seen for a digest stays its original for the rest of the
/// run; every later match becomes a [`DuplicatePair`] pointing at it.
pub struct Classifier<H> {
    hasher: H,
    index: HashMap<Digest, PathBuf>,
    duplicates: Vec<DuplicatePair>,
}

impl<H: ContentHasher> Classifier<H> {
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            index: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Hash `path` and record it
    ///
    /// Returns `DedupError::Read` when the file cannot be read; nothing is
    /// recorded in that case and the caller can move on.
    pub fn classify(&mut self, path: &Path) -> DedupResult<Classification> {
        let digest = compute_file_digest(path, &self.hasher)?;
        Ok(self.record(path, digest))
    }

    fn record(&mut self, path: &Path, digest: Digest) -> Classification {
        match self.index.get(&digest) {
            Some(original) => {
                log::debug!("{} duplicates {}", path.display(), original.display());
                self.duplicates.push(DuplicatePair {
                    duplicate: path.to_path_buf(),
                    original: original.clone(),
                });
                Classification::Duplicate {
                    original: original.clone(),
                }
            }
            None => {
                log::trace!("{} {}", digest, path.display());
                self.index.insert(digest, path.to_path_buf());
                Classification::Original
            }
        }
    }

    /// Number of distinct digests seen so far
    pub fn originals(&self) -> usize {
        self.index.len()
    }

    pub fn duplicates(&self) -> &[DuplicatePair] {
        &self.duplicates
    }

    /// Hand over the duplicate pairs in detection order
    pub fn into_duplicates(self) -> Vec<DuplicatePair> {
        self.duplicates
    }
}

/// Classify a list of paths, skipping unreadable files
///
/// # Returns
/// Duplicate pairs in detection order
pub fn find_duplicates<H: ContentHasher>(paths: &[PathBuf], hasher: H) -> Vec<DuplicatePair> {
    let mut classifier = Classifier::new(hasher);

    for path in paths {
        if let Err(e) = classifier.classify(path) {
            log::warn!("Error reading file: {}", e);
        }
    }

    classifier.into_duplicates()
}
