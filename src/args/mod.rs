//! Argument compiler.
//!
//! Maps a [`Configuration`] to the exact argument vector the chosen backend is
//! invoked with. The first element is always the backend command and the last
//! is always the entry file relative to the project root. Functions here are
//! pure: no I/O, no logging.

mod bundler;
mod native;

pub use bundler::bundler_args;
pub use native::native_args;

use crate::config::{Backend, Configuration};
use crate::error::Result;

/// Compiles the argument vector for the configured backend.
///
/// # Errors
///
/// Returns a configuration error when no entry file is set or when the entry
/// file is not under the project root.
///
/// # Examples
///
/// ```no_run
/// use pyforge::config::{ConfigurationBuilder, TargetPlatform};
///
/// let config = ConfigurationBuilder::new()
///     .project_dir("/work/app")
///     .entry_file("/work/app/main.py")
///     .platform(TargetPlatform::Linux)
///     .build();
/// let args = pyforge::args::compile_args(&config)?;
/// assert_eq!(args.first().map(String::as_str), Some("nuitka"));
/// assert_eq!(args.last().map(String::as_str), Some("main.py"));
/// # Ok::<(), pyforge::error::Error>(())
/// ```
pub fn compile_args(config: &Configuration) -> Result<Vec<String>> {
    match config.backend() {
        Backend::Nuitka => native_args(config),
        Backend::PyInstaller => bundler_args(config),
    }
}

/// Renders an argument vector as a single command line for display.
pub fn display_line(args: &[String]) -> String {
    args.join(" ")
}

/// Entry path as emitted into arguments, using forward slashes.
fn entry_arg(config: &Configuration) -> Result<String> {
    let relative = config.entry_relative()?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}

fn path_arg(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
