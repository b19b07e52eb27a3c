//! Error types for file handle operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.
//!
//! Every platform failure is wrapped where it happens, tagged with the
//! [`Operation`] that failed and the path involved. The underlying
//! `std::io::Error` stays reachable through [`std::error::Error::source`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::mode::Operation;

/// Failure of one of the four file handle operations.
///
/// Renders as `Error trying to <operation> the file: <path>. <description>`.
#[derive(Error, Debug)]
#[error("Error trying to {operation} the file: {}. {description}", .path.display())]
pub struct FileOperationError {
    operation: Operation,
    path: PathBuf,
    description: String,
    #[source]
    source: Option<io::Error>,
}

impl FileOperationError {
    /// Wrap a platform error with operation context.
    pub fn from_io(operation: Operation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            operation,
            path: path.into(),
            description: source.to_string(),
            source: Some(source),
        }
    }

    /// A precondition failure with no underlying cause (handle closed, wrong mode).
    pub fn precondition(
        operation: Operation,
        path: impl Into<PathBuf>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            path: path.into(),
            description: description.into(),
            source: None,
        }
    }

    /// The operation that failed.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The path the handle was bound to when the operation failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Description of the failure, without the operation/path prefix.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The underlying I/O error, if the failure came from the platform.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()
    }

    /// True when the handle was misused rather than the platform failing.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.source.is_none()
    }
}

/// Result alias used throughout the crate.
pub type FileResult<T> = Result<T, FileOperationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_message_format() {
        let err = FileOperationError::from_io(
            Operation::Open,
            "/tmp/test.txt",
            io::Error::new(io::ErrorKind::NotFound, "Open error"),
        );
        assert_eq!(
            err.to_string(),
            "Error trying to open the file: /tmp/test.txt. Open error"
        );
        assert_eq!(err.description(), "Open error");
    }

    #[test]
    fn test_source_is_preserved() {
        let err = FileOperationError::from_io(
            Operation::Write,
            "out.txt",
            io::Error::new(io::ErrorKind::StorageFull, "disk full"),
        );
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "disk full");
        assert_eq!(err.io_error().unwrap().kind(), io::ErrorKind::StorageFull);
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_precondition_has_no_source() {
        let err = FileOperationError::precondition(Operation::Read, "", "file is not open for reading");
        assert_eq!(err.operation(), Operation::Read);
        assert!(err.source().is_none());
        assert!(err.is_precondition());
        assert_eq!(
            err.to_string(),
            "Error trying to read the file: . file is not open for reading"
        );
    }
}
