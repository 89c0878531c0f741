//! Error types for corral

use std::fmt;

/// Result type alias for corral operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction.
///
/// Construction is the only fallible point: every cache operation is a total
/// function over its inputs, and "key not present" is reported through
/// boolean/`Option` results rather than errors.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be a positive number
    ZeroCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroCapacity => write!(f, "cache capacity must be a positive number"),
        }
    }
}

impl std::error::Error for Error {}
