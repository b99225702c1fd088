//! Generator for reusable Python build scripts.
//!
//! Collects build options for a Python project, compiles them into a Nuitka
//! or PyInstaller command line and writes a standalone Python script that
//! runs the build. The script can also produce Linux packages (.deb/.rpm)
//! through nfpm or fpm, and the same packaging is available in-process.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod args;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod metadata;
pub mod package;
pub mod report;
pub mod requirements;
pub mod script;
pub mod validate;

// Re-export commonly used types
pub use config::{Configuration, ConfigurationBuilder};
pub use error::{CliError, ConfigurationError, Error, Result};
