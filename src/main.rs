//! pyforge - interactive generator for Nuitka/PyInstaller build scripts.
//!
//! This binary asks about a Python project and writes a standalone build
//! script, optionally with Linux (.deb/.rpm) packaging.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match pyforge::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
