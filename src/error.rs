//! Error types for script generation and packaging.
//!
//! User-input problems are not errors here: validators return
//! [`crate::validate::Validation`] so callers can re-prompt. Everything in this
//! module is fatal to the operation that produced it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all generator operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration field is missing or inconsistent
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors without additional context
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Filesystem operation failed on a specific path
    #[error("{context} ({path}): {source}")]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Template registration or rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// An external command could not be spawned
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command name
        command: String,
        /// Spawn error
        error: std::io::Error,
    },

    /// An external command ran and exited unsuccessfully
    #[error("`{tool}` exited with {}:\n{output}", code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()))]
    Subprocess {
        /// Tool name
        tool: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured stdout followed by stderr
        output: String,
    },

    /// A required external tool is not installed
    #[error("required tool `{tool}` was not found. {hint}")]
    ToolAbsent {
        /// Tool name
        tool: String,
        /// Installation hint
        hint: String,
    },

    /// The user interrupted an interactive operation
    #[error("operation cancelled by user")]
    Cancelled,

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

/// Missing or contradictory configuration detected before deriving artifacts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Entry file was never set
    #[error("entry file is not set")]
    MissingEntryFile,

    /// Entry file is not located under the project root
    #[error("entry file {entry} is not inside project directory {project}")]
    EntryOutsideProject {
        /// Entry file path
        entry: PathBuf,
        /// Project root
        project: PathBuf,
    },

    /// Packaging was requested without an application name
    #[error("application name is required for package generation")]
    MissingAppName,
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Generated file could not be written
    #[error("could not write {path}: {reason}")]
    WriteFailed {
        /// Target file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

impl Error {
    /// Exit code the binary should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Cancelled => crate::cli::EXIT_CANCELLED,
            Error::Subprocess { code: Some(code), .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Attach filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wrap the error with a description and the path it concerns.
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.into(),
            source,
        })
    }
}

/// Convert options and foreign errors into [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Attach a message.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(e: handlebars::RenderError) -> Self {
        Error::Template(e.to_string())
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(e: handlebars::TemplateError) -> Self {
        Error::Template(e.to_string())
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subprocess_error_keeps_exit_code() {
        let err = Error::Subprocess {
            tool: "nfpm".into(),
            code: Some(3),
            output: "boom".into(),
        };
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn cancelled_maps_to_reserved_code() {
        assert_eq!(Error::Cancelled.exit_code(), crate::cli::EXIT_CANCELLED);
    }

    #[test]
    fn fs_context_mentions_path() {
        let io: std::io::Result<()> = Err(std::io::Error::other("denied"));
        let err = io.fs_context("writing script", "/tmp/x.py").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("writing script"));
        assert!(msg.contains("/tmp/x.py"));
    }
}
