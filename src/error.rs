//! Error handling for the interface picker
//!
//! Every failure is terminal for the run. The binary maps each variant to
//! exit status 1; malformed listing lines are not errors at all and never
//! reach this module.

use std::{fmt, io};
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, PickerError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// The listing command (or input file) could not be opened
    #[error("Error opening pipe for command: {command} - {message}")]
    CommandUnavailable { command: String, message: String },

    /// The user picked something that is not in `1..=count`
    #[error("Invalid interface index: {input:?} (expected a number between 1 and {count})")]
    InvalidSelection { input: String, count: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {operation} - {message}")]
    Io { operation: String, message: String },
}

impl PickerError {
    /// Create a command-unavailable error
    pub fn command_unavailable<C: Into<String>, M: Into<String>>(command: C, message: M) -> Self {
        Self::CommandUnavailable {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create an invalid selection error
    pub fn invalid_selection<I: Into<String>>(input: I, count: usize) -> Self {
        Self::InvalidSelection {
            input: input.into(),
            count,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io<O: Into<String>, M: Into<String>>(operation: O, message: M) -> Self {
        Self::Io {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        1
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CommandUnavailable { .. } => ErrorKind::CommandUnavailable,
            Self::InvalidSelection { .. } => ErrorKind::InvalidSelection,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Coarse error classes, used as a structured field in log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CommandUnavailable,
    InvalidSelection,
    Configuration,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandUnavailable => write!(f, "command_unavailable"),
            Self::InvalidSelection => write!(f, "invalid_selection"),
            Self::Configuration => write!(f, "configuration"),
            Self::Io => write!(f, "io"),
        }
    }
}

/// Attach an operation name to IO failures
pub trait IoContext<T> {
    fn with_operation(self, operation: &str) -> Result<T>;
}

impl<T> IoContext<T> for std::result::Result<T, io::Error> {
    fn with_operation(self, operation: &str) -> Result<T> {
        self.map_err(|e| PickerError::io(operation, e.to_string()))
    }
}
