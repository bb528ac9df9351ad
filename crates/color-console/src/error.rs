//! Error types for console output.
//!
//! Most console operations cannot fail in interesting ways: a missing
//! terminal just turns layout-dependent features into no-ops. The errors
//! here are the argument checks that the caller can actually violate, plus
//! the I/O failures of the underlying stream.

use std::io;

/// Error type for all console operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A raw foreground code outside the backend's valid range.
    #[error("text color must be a recognised name or a code in 0..=0x0F, got `{0}`")]
    InvalidForeground(String),

    /// A raw background code outside the backend's valid range.
    #[error("background color must be a recognised name or a code in 0..=0xF0, got `{0}`")]
    InvalidBackground(String),

    /// A line-clear request for fewer than one line.
    #[error("number of lines to clear ({0}) must be > 0")]
    InvalidLineCount(usize),

    /// A row whose cell count differs from the number of column widths.
    #[error("row has {actual} cells but {expected} column widths were given")]
    ColumnMismatch { expected: usize, actual: usize },

    /// A progress update with a total of zero steps.
    #[error("progress total must be greater than zero")]
    ZeroProgressTotal,

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Failure writing to the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_yaml::Error> for ConsoleError {
    fn from(err: serde_yaml::Error) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConsoleError>;
