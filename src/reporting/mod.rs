//! Relocation of duplicates and report writing

pub mod report_writer;

pub use report_writer::{
    ensure_quarantine_dir, relocate_duplicates, RelocationOutcome, RelocationRecord,
    RelocationSummary,
};
