//! Error types
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("empty sample set")]
    EmptySampleSet,
    #[error("feature length mismatch: expected {expected}, found {found}")]
    FeatureLenMismatch { expected: usize, found: usize },
    #[error("records and targets disagree: {records} rows, {targets} targets")]
    RecordsTargetsMismatch { records: usize, targets: usize },
}
