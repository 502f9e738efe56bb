//! Duplicate Quarantine Library
//!
//! Finds files with identical content under a directory, moves every copy
//! after the first into a quarantine directory and writes an audit report.

pub mod core;
pub mod logging;
pub mod scanner;
pub mod reporting;

pub use crate::core::run;
pub use crate::scanner::file_scanner;
pub use crate::reporting::report_writer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::config::{ExtensionFilter, RunConfig, DEFAULT_REPORT_FILE};
    pub use crate::core::digest::{ContentHasher, Digest, HashAlgorithm};
    pub use crate::core::error::{DedupError, DedupResult};
    pub use crate::core::run::{DedupRun, RunOutcome};
    pub use crate::scanner::file_scanner::{collect_candidate_files, FileEntry};
    pub use crate::scanner::duplicate_detector::{
        compute_file_digest, find_duplicates, Classification, Classifier, DuplicatePair,
    };
    pub use crate::reporting::report_writer::{
        format_error_line, format_moved_line, move_file, quarantine_destination,
        relocate_duplicates, RelocationOutcome, RelocationSummary,
    };
}
