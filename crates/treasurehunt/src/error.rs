//! Error types for treasurehunt.
//!
//! All fallible operations in the crate return [`Result`]. Absent hunts and
//! absent treasure ids are not errors; they are reported as `Option`/`bool`
//! values by the operations that produce them.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for treasurehunt operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record codec errors ===
    /// A record block could not be decoded.
    #[error("corrupt record data: {0}")]
    CorruptRecord(String),

    /// A text field does not fit the fixed record layout.
    #[error("{field} is {len} bytes, the record layout allows at most {max}")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Byte length of the supplied value.
        len: usize,
        /// Maximum encodable byte length.
        max: usize,
    },

    // === Filesystem errors ===
    /// Failed to create a hunt directory.
    #[error("failed to create hunt directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a hunt directory.
    #[error("failed to remove hunt directory {path}: {source}")]
    DirectoryRemove {
        /// Path that couldn't be removed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the discoverable log link.
    #[error("failed to create log link {path}: {source}")]
    LinkCreate {
        /// Path of the link.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Any other file system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Configuration errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    // === Serialization errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for treasurehunt operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a corrupt-record error.
    #[must_use]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptRecord(message.into())
    }

    /// Check if this error wraps a not-found I/O error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_record_display() {
        let err = Error::corrupt("short read at offset 600");
        let msg = err.to_string();
        assert!(msg.contains("corrupt record data"));
        assert!(msg.contains("short read at offset 600"));
    }

    #[test]
    fn test_field_too_long_display() {
        let err = Error::FieldTooLong {
            field: "owner",
            len: 70,
            max: 63,
        };
        let msg = err.to_string();
        assert!(msg.contains("owner"));
        assert!(msg.contains("70"));
        assert!(msg.contains("63"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_is_not_found_other_kinds() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(!err.is_not_found());

        let err = Error::corrupt("truncated");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_directory_create_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
