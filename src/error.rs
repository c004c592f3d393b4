//! Error types for cmdmenu.
//!
//! Every failure a launched command can produce maps to its own variant so
//! the engine can report exactly which stage of a run went wrong. A failed
//! run never yields a partial result: the run's error replaces its output.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cmdmenu operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for cmdmenu.
#[derive(Error, Debug)]
pub enum Error {
    /// The shell process could not be started.
    #[error("'{command}' failed to start: {source}")]
    Spawn {
        /// The resolved command line that was being launched
        command: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The payload could not be written to the child's standard input.
    #[error("'{command}' failed to write stdin: {source}")]
    StdinWrite {
        /// The resolved command line
        command: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The child's standard input could not be closed after the payload.
    #[error("'{command}' failed to close stdin: {source}")]
    StdinClose {
        /// The resolved command line
        command: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// One of the child's output streams could not be drained.
    #[error("'{command}' failed to read {stream}: {source}")]
    PipeRead {
        /// The resolved command line
        command: String,
        /// Which stream failed ("stdout" or "stderr")
        stream: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The child's exit status could not be collected.
    #[error("'{command}' failed to wait on: {source}")]
    Wait {
        /// The resolved command line
        command: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse config file '{path}': {source}")]
    ConfigParse {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },
}

impl Error {
    /// The resolved command line the error originated from, if any.
    pub fn command(&self) -> Option<&str> {
        match self {
            Error::Spawn { command, .. }
            | Error::StdinWrite { command, .. }
            | Error::StdinClose { command, .. }
            | Error::PipeRead { command, .. }
            | Error::Wait { command, .. } => Some(command),
            Error::ConfigRead { .. } | Error::ConfigParse { .. } => None,
        }
    }
}
