//! Single-owner file handle.
//!
//! Open, close and write are synchronous. Reading is asynchronous and goes
//! through a [`LineStream`], which borrows the handle for as long as lines
//! are being consumed.

use std::fs;
use std::io::Write;
use std::mem;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::io::BufReader;
use tracing::{Span, debug, error, info};

use crate::config::HandleConfig;
use crate::error::{FileOperationError, FileResult};
use crate::lines::LineReader;
use crate::mode::{OpenMode, Operation};

type FileLines = LineReader<BufReader<tokio::fs::File>>;

/// Native descriptor held by a handle. `Closed` is the sentinel.
///
/// In read mode the descriptor is owned by the line reader, so the reader is
/// present exactly when the handle is open for reading.
#[derive(Debug, Default)]
enum Descriptor {
    #[default]
    Closed,
    File(fs::File),
    Lines(FileLines),
}

/// A file handle bound to at most one open file at a time.
///
/// # Example
///
/// ```rust,ignore
/// use omni_file::{FileHandle, OpenMode};
///
/// let mut handle = FileHandle::new();
/// handle.open("notes.txt", OpenMode::Write)?;
/// handle.write_to_file("first line")?;
/// handle.close()?;
///
/// handle.open("notes.txt", OpenMode::Read)?;
/// let mut lines = handle.read_lines()?;
/// while let Some(line) = lines.next_line().await? {
///     println!("{line}");
/// }
/// ```
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    mode: Option<OpenMode>,
    descriptor: Descriptor,
    config: HandleConfig,
    span: Span,
}

impl Default for FileHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandle {
    /// Create an empty, closed handle with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HandleConfig::default())
    }

    /// Create an empty, closed handle with the given config.
    #[must_use]
    pub fn with_config(config: HandleConfig) -> Self {
        Self {
            path: PathBuf::new(),
            mode: None,
            descriptor: Descriptor::Closed,
            config,
            span: tracing::info_span!("file_handle"),
        }
    }

    /// Emit this handle's trace events inside `span` instead of the default
    /// `file_handle` span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Path of the open file. Empty when closed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the file is open with, `None` when closed.
    #[must_use]
    pub fn mode(&self) -> Option<OpenMode> {
        self.mode
    }

    /// Whether a descriptor is held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.descriptor, Descriptor::Closed)
    }

    /// Whether a line reader is attached (open in read mode).
    #[must_use]
    pub fn has_line_reader(&self) -> bool {
        matches!(self.descriptor, Descriptor::Lines(_))
    }

    /// Raw descriptor number, `None` when closed.
    #[cfg(unix)]
    #[must_use]
    pub fn raw_fd(&self) -> Option<std::os::unix::io::RawFd> {
        use std::os::unix::io::AsRawFd;

        match &self.descriptor {
            Descriptor::Closed => None,
            Descriptor::File(file) => Some(file.as_raw_fd()),
            Descriptor::Lines(reader) => Some(reader.get_ref().get_ref().as_raw_fd()),
        }
    }

    /// Open `path` with `mode`.
    ///
    /// In [`OpenMode::Read`] a line reader is attached to the descriptor.
    ///
    /// # Errors
    /// Returns an [`Operation::Open`] error if the path is empty, the handle
    /// is already open, or the platform refuses to open the file.
    pub fn open(&mut self, path: impl AsRef<Path>, mode: OpenMode) -> FileResult<()> {
        let _enter = self.span.enter();
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            error!(operation = "open", "Error opening file: empty path");
            return Err(FileOperationError::precondition(
                Operation::Open,
                path,
                "path must not be empty",
            ));
        }
        if self.is_open() {
            error!(
                operation = "open",
                path = %path.display(),
                current = %self.path.display(),
                "Error opening file: handle already open"
            );
            return Err(FileOperationError::precondition(
                Operation::Open,
                path,
                format!("handle is already open on {}", self.path.display()),
            ));
        }

        let file = match mode.options().open(path) {
            Ok(file) => file,
            Err(e) => {
                error!(
                    operation = "open",
                    path = %path.display(),
                    mode = %mode,
                    error = %e,
                    "Error opening file"
                );
                return Err(FileOperationError::from_io(Operation::Open, path, e));
            }
        };

        self.descriptor = if mode.is_read() {
            let capacity = self.config.effective_buffer_capacity();
            let source = BufReader::with_capacity(capacity, tokio::fs::File::from_std(file));
            Descriptor::Lines(LineReader::new(source))
        } else {
            Descriptor::File(file)
        };
        self.path = path.to_path_buf();
        self.mode = Some(mode);

        info!(path = %self.path.display(), mode = %mode, "File opened");
        Ok(())
    }

    /// Close the file.
    ///
    /// The handle is reset to the closed state whether or not the close
    /// succeeds. A failure reports the path the handle had before the reset.
    ///
    /// # Errors
    /// Returns an [`Operation::Close`] error if the handle is not open, or if
    /// syncing a writable descriptor fails.
    pub fn close(&mut self) -> FileResult<()> {
        let _enter = self.span.enter();

        let path = mem::take(&mut self.path);
        self.mode = None;
        let result = match mem::take(&mut self.descriptor) {
            Descriptor::Closed => {
                error!(operation = "close", "Error closing file: handle is not open");
                return Err(FileOperationError::precondition(
                    Operation::Close,
                    path,
                    "file is not open",
                ));
            }
            Descriptor::Lines(reader) => {
                drop(reader);
                debug!(path = %path.display(), "Line reader closed");
                Ok(())
            }
            Descriptor::File(file) => {
                let synced = if self.config.sync_on_close {
                    file.sync_data()
                } else {
                    Ok(())
                };
                drop(file);
                synced
            }
        };

        match result {
            Ok(()) => {
                info!(path = %path.display(), "File closed");
                Ok(())
            }
            Err(e) => {
                error!(
                    operation = "close",
                    path = %path.display(),
                    error = %e,
                    "Error closing file"
                );
                Err(FileOperationError::from_io(Operation::Close, path, e))
            }
        }
    }

    /// Write `data` followed by a single `\n` at the current position.
    ///
    /// Performs one `write` call and returns the byte count it reports, which
    /// may be short. Short writes are not retried.
    ///
    /// # Errors
    /// Returns an [`Operation::Write`] error if the handle is closed, opened
    /// for reading only, or the platform write fails.
    pub fn write_to_file(&mut self, data: &str) -> FileResult<usize> {
        let file = match &mut self.descriptor {
            Descriptor::File(file) => file,
            Descriptor::Lines(_) => {
                return Err(FileOperationError::precondition(
                    Operation::Write,
                    &self.path,
                    "file is not open for writing",
                ));
            }
            Descriptor::Closed => {
                return Err(FileOperationError::precondition(
                    Operation::Write,
                    &self.path,
                    "file is not open",
                ));
            }
        };

        let mut buffer = Vec::with_capacity(data.len() + 1);
        buffer.extend_from_slice(data.as_bytes());
        buffer.push(b'\n');

        file.write(&buffer)
            .map_err(|e| FileOperationError::from_io(Operation::Write, &self.path, e))
    }

    /// Stream the remaining lines of a file opened in [`OpenMode::Read`].
    ///
    /// Lines already consumed are not produced again, so a second call only
    /// yields what the first one left.
    ///
    /// # Errors
    /// Returns an [`Operation::Read`] error, before any line is produced, if
    /// no line reader is attached.
    ///
    /// # Panics
    /// The returned stream reads through `tokio::fs`, so it panics if polled
    /// outside a Tokio runtime.
    pub fn read_lines(&mut self) -> FileResult<LineStream<'_>> {
        match &mut self.descriptor {
            Descriptor::Lines(reader) => Ok(LineStream {
                reader,
                path: &self.path,
                span: &self.span,
                trace_lines: self.config.trace_lines,
            }),
            Descriptor::File(_) | Descriptor::Closed => Err(FileOperationError::precondition(
                Operation::Read,
                &self.path,
                "file is not open for reading",
            )),
        }
    }
}

/// Lines produced by [`FileHandle::read_lines`].
///
/// Implements [`Stream`]; [`LineStream::next_line`] is the same thing
/// without needing `StreamExt`. Either way it must be polled from within a
/// Tokio runtime.
#[derive(Debug)]
pub struct LineStream<'a> {
    reader: &'a mut FileLines,
    path: &'a Path,
    span: &'a Span,
    trace_lines: bool,
}

impl LineStream<'_> {
    /// Next line, or `None` once the file is exhausted.
    ///
    /// # Errors
    /// Returns an [`Operation::Read`] error if reading from the file fails.
    ///
    /// # Panics
    /// Panics if awaited outside a Tokio runtime.
    pub async fn next_line(&mut self) -> FileResult<Option<String>> {
        std::future::poll_fn(|cx| self.poll_line(cx)).await
    }

    fn poll_line(&mut self, cx: &mut Context<'_>) -> Poll<FileResult<Option<String>>> {
        let _enter = self.span.enter();
        self.reader.poll_next_line(cx).map(|result| match result {
            Ok(Some(line)) => {
                if self.trace_lines {
                    debug!(path = %self.path.display(), bytes = line.len(), "Line read");
                }
                Ok(Some(line))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(FileOperationError::from_io(Operation::Read, self.path, e)),
        })
    }
}

impl Stream for LineStream<'_> {
    type Item = FileResult<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_line(cx).map(Result::transpose)
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        if self.is_open() {
            let _enter = self.span.enter();
            debug!(path = %self.path.display(), "Dropping open file handle");
        }
    }
}
