/*!
 * Error types for the aegichanges application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::fmt;
use thiserror::Error;

/// Which of the two compared files an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The old (reference) file
    Old,
    /// The new (revised) file
    New,
    /// Both files
    Both,
}

impl Side {
    // @returns: Side covering the failed flags, None when neither failed
    pub fn from_flags(old_failed: bool, new_failed: bool) -> Option<Self> {
        match (old_failed, new_failed) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Old),
            (false, true) => Some(Self::New),
            (false, false) => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => write!(f, "old file"),
            Self::New => write!(f, "new file"),
            Self::Both => write!(f, "both files"),
        }
    }
}

/// Errors that can occur while extracting events from a subtitle script
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubtitleError {
    /// The script has no `[Events]` section
    #[error("[Events] section not found")]
    SectionNotFound,

    /// An event row has too few comma separated fields
    #[error("Malformed event on line {line_number}: expected at least 4 fields, found {fields}")]
    MalformedEvent {
        /// 1-based line number in the raw file
        line_number: usize,
        /// Number of fields found on the line
        fields: usize,
    },
}

/// Errors that can occur when comparing two loaded scripts
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompareError {
    /// One or both files have not been loaded yet
    #[error("{}", no_input_message(.0))]
    NoInputSelected(Side),

    /// One or both files lack an `[Events]` section
    #[error("[Events] section not found in {0}")]
    SectionNotFound(Side),

    /// An event row of one file could not be parsed
    #[error("Invalid event in {side}: {source}")]
    Malformed {
        side: Side,
        #[source]
        source: SubtitleError,
    },
}

fn no_input_message(side: &Side) -> &'static str {
    match side {
        Side::Both => "Files not selected",
        Side::Old => "Old file not selected",
        Side::New => "New file not selected",
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// A file could not be read, decoded or written
    #[error("File error: {0}")]
    File(String),

    /// Error from comparing two scripts
    #[error("Compare error: {0}")]
    Compare(#[from] CompareError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

// Utility functions for error conversion
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
