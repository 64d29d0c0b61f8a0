//! Error types for date identifier parsing.

use thiserror::Error;

/// Failure to turn a string into a calendar day identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateIdError {
    /// The input is not shaped like `YYYY-MM-DD`.
    #[error("malformed date id `{input}`: expected `YYYY-MM-DD`")]
    Malformed {
        /// The rejected input.
        input: String,
    },
    /// The input is shaped correctly but names a day that does not exist.
    #[error("date id `{input}` does not name a calendar day")]
    OutOfRange {
        /// The rejected input.
        input: String,
    },
}
