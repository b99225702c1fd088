//! Command line interface for pyforge.
//!
//! Parses flags, then either prints the environment report (`--check-env`)
//! or runs the interactive generator.

mod args;
mod check;
pub mod collector;
pub mod generate;
mod output;
pub mod plugins;
pub mod prompt;

pub use args::{Args, Mode, RuntimeConfig};
pub use check::print_report;
pub use collector::Collector;
pub use output::OutputManager;
pub use prompt::{Prompter, StdinPrompter};

use crate::error::Result;

/// Exit code for a run the user cancelled.
pub const EXIT_CANCELLED: i32 = 130;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let runtime = RuntimeConfig::from(&args);

    if args.check_env {
        return check::check_env(runtime.output()).await;
    }
    generate::run(&runtime).await
}
