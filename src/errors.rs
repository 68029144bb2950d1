//! Error types for the automatic differentiation crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error variants for tape and variable operations.
pub enum ADError {
    #[error("Tape position {index} was invalidated by a tape reset")]
    /// The record a variable points at was removed by `Tape::clear`.
    StalePosition {
        /// Index the variable was recorded at.
        index: usize,
    },
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, ADError>;
