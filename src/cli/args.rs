//! Command line argument parsing.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// What the interactive run produces.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Mode {
    /// Build script, with Linux packaging embedded when enabled
    #[default]
    Full,
    /// Build script only
    Compile,
    /// Standalone Linux packaging script
    Package,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Full, Mode::Compile, Mode::Package];

    pub fn describe(self) -> &'static str {
        match self {
            Mode::Full => "Full: build script plus Linux packages",
            Mode::Compile => "Compile only: build script",
            Mode::Package => "Package only: packaging script for an existing executable",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Full => "full",
            Mode::Compile => "compile",
            Mode::Package => "package",
        })
    }
}

/// Interactive generator for Nuitka/PyInstaller build scripts and Linux packages
#[derive(Parser, Debug)]
#[command(
    name = "pyforge",
    version,
    about = "Generates reusable Python build scripts for Nuitka or PyInstaller",
    long_about = "Asks a series of questions about a Python project and writes a standalone build \
script that runs Nuitka or PyInstaller with the chosen options. The script can also produce \
.deb/.rpm packages with nfpm or fpm.

Usage:
  pyforge                      interactive run, mode chosen at the first prompt
  pyforge --mode compile       build script only
  pyforge --mode package       packaging script for an already built executable
  pyforge --check-env          report installed tools and exit

Type ? at any prompt for help. Exit code 130 means the run was cancelled."
)]
pub struct Args {
    /// Report installed build and packaging tools, then exit
    #[arg(long)]
    pub check_env: bool,

    /// Skip the mode prompt
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub mode: Option<Mode>,

    /// Default offered for the project directory prompt
    #[arg(short = 'C', long, value_name = "DIR", env = "PYFORGE_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Only print errors and the generated file paths
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print extra detail
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    mode: Option<Mode>,
    project_dir: String,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
            mode: args.mode,
            project_dir: args
                .project_dir
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| ".".to_string()),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Mode given on the command line, if any.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Default answer for the project directory prompt.
    pub fn project_dir(&self) -> &str {
        &self.project_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn mode_and_project_dir_are_parsed() {
        let args = Args::try_parse_from(["pyforge", "--mode", "package", "-C", "app"]).unwrap();
        let runtime = RuntimeConfig::from(&args);
        assert_eq!(runtime.mode(), Some(Mode::Package));
        assert_eq!(runtime.project_dir(), "app");
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Args::try_parse_from(["pyforge", "-q", "-v"]).is_err());
    }
}
