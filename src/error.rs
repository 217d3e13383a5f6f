use std::fmt;

/// The error type for fallible map and cursor operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The requested key is not present in the map.
    KeyNotFound,
    /// The cursor cannot be used for the requested operation.
    ///
    /// Raised when stepping past either end of the map, dereferencing the end cursor, erasing
    /// the end cursor, or presenting a cursor to a map other than the one that issued it.
    InvalidCursor,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::InvalidCursor => write!(f, "invalid cursor"),
        }
    }
}

impl std::error::Error for Error {}

/// A `Result` alias with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
