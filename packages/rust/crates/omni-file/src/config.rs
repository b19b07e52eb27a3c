//! Handle configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default capacity of the line reader's buffer (8 KiB).
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Upper bound for the line reader's buffer (16 MiB); larger values are clamped.
pub const MAX_READ_BUFFER_CAPACITY: usize = 16 * 1024 * 1024;

/// Tunables for a [`FileHandle`](crate::FileHandle).
///
/// Missing fields fall back to [`HandleConfig::default`], so partial JSON
/// files are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Buffer capacity of the line reader attached in read mode.
    pub read_buffer_capacity: usize,
    /// Emit a debug event for every line produced by the reader.
    pub trace_lines: bool,
    /// Sync written data before closing a writable descriptor, so deferred
    /// write failures are reported by `close`.
    pub sync_on_close: bool,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            trace_lines: false,
            sync_on_close: true,
        }
    }
}

impl HandleConfig {
    /// Load a config from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Buffer capacity actually allocated: at least one byte, at most
    /// [`MAX_READ_BUFFER_CAPACITY`].
    pub(crate) fn effective_buffer_capacity(&self) -> usize {
        self.read_buffer_capacity.clamp(1, MAX_READ_BUFFER_CAPACITY)
    }
}

/// Failure loading a [`HandleConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Config file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `HandleConfig`.
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
