//! `--check-env` and the requirement check shown before writing scripts.

use super::OutputManager;
use crate::env::{CheckReport, CheckStatus, EnvironmentChecker};
use crate::error::{Error, Result};
use crate::requirements::Requirements;

/// Runs the full environment check and prints it. Always informational.
pub async fn check_env(output: &OutputManager) -> Result<i32> {
    output.section("Environment check")?;
    let report = blocking(|| EnvironmentChecker::new().full_check()).await?;
    print_report(output, &report)?;
    Ok(0)
}

/// Checks exactly the tools `requirements` names.
pub async fn check_requirements(requirements: Requirements) -> Result<CheckReport> {
    blocking(move || EnvironmentChecker::new().check_requirements(&requirements)).await
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::GenericError(format!("environment probe task failed: {e}")))
}

/// Prints every section, then the summary and install hints.
pub fn print_report(output: &OutputManager, report: &CheckReport) -> std::io::Result<()> {
    for section in &report.sections {
        output.progress(&section.title)?;
        for check in &section.checks {
            let line = match &check.details {
                Some(details) => format!("{}: {details}", check.name),
                None => check.name.clone(),
            };
            match check.status {
                CheckStatus::Pass => output.success(&line)?,
                CheckStatus::Warn => output.warn(&line)?,
                CheckStatus::Fail => output.error(&line)?,
            }
        }
    }

    output.info(&format!(
        "{} available, {} optional missing, {} required missing",
        report.count(CheckStatus::Pass),
        report.count(CheckStatus::Warn),
        report.count(CheckStatus::Fail),
    ))?;
    for hint in report.recommendations() {
        output.indent(&hint)?;
    }
    Ok(())
}
