//! File scanning and duplicate classification

pub mod file_scanner;
pub mod duplicate_detector;

pub use file_scanner::{collect_candidate_files, FileEntry};
pub use duplicate_detector::{compute_file_digest, find_duplicates, Classification, Classifier, DuplicatePair};
