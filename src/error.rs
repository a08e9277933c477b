//! Error types for vulcan

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VulcanError {
    /// Malformed input problem; `unit` names the offending input unit.
    #[error("input error in {unit}: {message}")]
    Input { unit: String, message: String },

    #[error("sort mismatch for {symbol}: expected {expected}, found {found}")]
    SortMismatch {
        symbol: String,
        expected: String,
        found: String,
    },

    #[error("arity mismatch for {symbol}: expected {expected} arguments, found {found}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, VulcanError>;
