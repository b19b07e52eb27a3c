#![allow(clippy::doc_markdown)]

//! omni-file - Single-owner file handle for Omni DevEnv
//!
//! A thin layer over open/write/close with typed errors and async line
//! streaming.
//!
//! # Features
//!
//! - **Closed mode set**: `OpenMode` replaces free-form `"r"`/`"w+"` strings
//! - **Typed errors**: every failure is a `FileOperationError` tagged with the
//!   operation (open/close/read/write) and path, wrapping the `io::Error`
//! - **Line streaming**: CR, LF and CRLF aware, exposed as a `futures::Stream`
//! - **Tracing**: per-handle span, no global console output
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-file/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # FileOperationError
//! ├── mode.rs     # OpenMode & Operation
//! ├── config.rs   # HandleConfig
//! ├── lines.rs    # LineReader (AsyncBufRead -> lines)
//! ├── handle.rs   # FileHandle & LineStream
//! └── main.rs     # omni-file CLI
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_file::{FileHandle, OpenMode};
//!
//! let mut handle = FileHandle::new();
//! handle.open("log.txt", OpenMode::Append)?;
//! handle.write_to_file("started")?;
//! handle.close()?;
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod config;
mod error;
mod handle;
mod lines;
mod mode;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use config::{
    ConfigError, DEFAULT_READ_BUFFER_CAPACITY, HandleConfig, MAX_READ_BUFFER_CAPACITY,
};
pub use error::{FileOperationError, FileResult};
pub use handle::{FileHandle, LineStream};
pub use lines::LineReader;
pub use mode::{OpenMode, Operation, ParseModeError};
