//! Run configuration, digests, errors and the run pipeline

pub mod config;
pub mod digest;
pub mod error;
pub mod run;
