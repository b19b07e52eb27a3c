//! Open modes and operation tags.
//!
//! Both are closed sets: an unknown mode can only appear when parsing a flag
//! string, and is rejected there.

use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mode a [`FileHandle`](crate::FileHandle) is opened with.
///
/// | Variant           | Flag | Semantics                             |
/// |-------------------|------|---------------------------------------|
/// | `Append`          | `a`  | append, create if missing             |
/// | `Read`            | `r`  | read only, must exist                 |
/// | `ReadWrite`       | `r+` | read and write, must exist            |
/// | `Write`           | `w`  | write, create or truncate             |
/// | `WriteReadCreate` | `w+` | read and write, create or truncate    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OpenMode {
    /// `a`
    Append,
    /// `r`
    #[default]
    Read,
    /// `r+`
    ReadWrite,
    /// `w`
    Write,
    /// `w+`
    WriteReadCreate,
}

impl OpenMode {
    /// All modes, in flag order.
    pub const ALL: [OpenMode; 5] = [
        OpenMode::Append,
        OpenMode::Read,
        OpenMode::ReadWrite,
        OpenMode::Write,
        OpenMode::WriteReadCreate,
    ];

    /// The short flag string for this mode (`"a"`, `"r"`, `"r+"`, `"w"`, `"w+"`).
    #[must_use]
    pub const fn as_flag(self) -> &'static str {
        match self {
            OpenMode::Append => "a",
            OpenMode::Read => "r",
            OpenMode::ReadWrite => "r+",
            OpenMode::Write => "w",
            OpenMode::WriteReadCreate => "w+",
        }
    }

    /// Only plain `Read` gets a line reader attached.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, OpenMode::Read)
    }

    /// Whether `write_to_file` is allowed in this mode.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !self.is_read()
    }

    /// Translate the mode into `std::fs::OpenOptions`.
    #[must_use]
    pub fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Append => options.append(true).create(true),
            OpenMode::Read => options.read(true),
            OpenMode::ReadWrite => options.read(true).write(true),
            OpenMode::Write => options.write(true).create(true).truncate(true),
            OpenMode::WriteReadCreate => options.read(true).write(true).create(true).truncate(true),
        };
        options
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// Error returned when parsing an unknown mode flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown open mode: {0:?} (expected one of a, r, r+, w, w+)")]
pub struct ParseModeError(pub String);

impl FromStr for OpenMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpenMode::ALL
            .into_iter()
            .find(|mode| mode.as_flag() == s)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

impl TryFrom<String> for OpenMode {
    type Error = ParseModeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OpenMode> for String {
    fn from(mode: OpenMode) -> Self {
        mode.as_flag().to_string()
    }
}

/// Operation a [`FileOperationError`](crate::FileOperationError) is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Acquiring the descriptor.
    Open,
    /// Releasing the descriptor.
    Close,
    /// Producing lines from the reader.
    Read,
    /// Writing bytes to the descriptor.
    Write,
}

impl Operation {
    /// Lowercase verb used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Open => "open",
            Operation::Close => "close",
            Operation::Read => "read",
            Operation::Write => "write",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
