//! Common error types used throughout versecast.
//!
//! This module provides a unified error type covering the failure cases the
//! playlist pipeline can hit: unresolvable references, missing stream
//! variants, database failures, and malformed input.

/// Common error type for versecast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested fileset, file, or playlist was not found.
    #[error("Reference not found: {0}")]
    NotFound(String),

    /// The file exists but has no matching stream variant.
    #[error("Stream variant unavailable: {0}")]
    VariantUnavailable(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new VariantUnavailable error.
    pub fn variant_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::VariantUnavailable(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("fileset ENGESVN2DA");
        assert_eq!(err.to_string(), "Reference not found: fileset ENGESVN2DA");

        let err = Error::variant_unavailable("av720p.m3u8");
        assert_eq!(err.to_string(), "Stream variant unavailable: av720p.m3u8");

        let err = Error::database("connection failed");
        assert_eq!(err.to_string(), "Database error: connection failed");

        let err = Error::invalid_input("bad location key");
        assert_eq!(err.to_string(), "Invalid input: bad location key");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(Error::not_found("x"), Error::NotFound(_)));
        assert!(matches!(
            Error::variant_unavailable("x"),
            Error::VariantUnavailable(_)
        ));
        assert!(matches!(Error::database("x"), Error::Database(_)));
        assert!(matches!(Error::invalid_input("x"), Error::InvalidInput(_)));
        assert!(matches!(Error::internal("x"), Error::Internal(_)));
    }
}
