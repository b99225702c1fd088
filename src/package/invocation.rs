//! Packaging tool invocation.

use super::plan::PackagePlan;
use crate::config::PackageFormat;
use crate::error::{Error, Result};
use crate::report::Reporter;
use std::path::{Path, PathBuf};

/// A fully resolved packaging command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PackageCommand {
    /// Command line for display.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `nfpm package --packager <fmt> --config <file> --target <output>`
pub fn nfpm_command(
    program: &str,
    format: PackageFormat,
    manifest_file: &str,
    target: &str,
) -> PackageCommand {
    PackageCommand {
        program: program.to_string(),
        args: vec![
            "package".into(),
            "--packager".into(),
            format.extension().into(),
            "--config".into(),
            manifest_file.into(),
            "--target".into(),
            target.into(),
        ],
    }
}

/// `fpm -s dir -t <fmt> ...`, mapping the executable straight to its install path.
pub fn fpm_command(
    plan: &PackagePlan,
    program: &str,
    format: PackageFormat,
    executable: &str,
    target: &str,
) -> PackageCommand {
    let mut args: Vec<String> = vec![
        "-s".into(),
        "dir".into(),
        "-t".into(),
        format.extension().into(),
        "-n".into(),
        plan.name.clone(),
        "-v".into(),
        plan.version.clone(),
        "--description".into(),
        plan.description.clone(),
        "--maintainer".into(),
        plan.maintainer.clone(),
        "--license".into(),
        plan.license.clone(),
        "--force".into(),
        "-p".into(),
        target.into(),
        format!(
            "{}={}",
            executable.replace('\\', "/"),
            plan.installed_executable()
        ),
        "--architecture".into(),
        plan.arch.as_str().into(),
    ];

    if let Some(url) = &plan.homepage {
        args.push("--url".into());
        args.push(url.clone());
    }
    for dep in plan.depends_for(format) {
        args.push("-d".into());
        args.push(dep);
    }

    PackageCommand {
        program: program.to_string(),
        args,
    }
}

/// Deletes every existing artifact of `format` in `dir`.
///
/// Runs before each packaging attempt, whether or not the attempt succeeds.
/// Files that cannot be removed are reported and skipped.
pub fn remove_stale(dir: &Path, format: PackageFormat, reporter: &dyn Reporter) -> Vec<PathBuf> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        format.extension()
    );

    let Ok(entries) = glob::glob(&pattern) else {
        log::debug!("invalid stale-artifact pattern {pattern}");
        return Vec::new();
    };

    let mut removed = Vec::new();
    for path in entries.flatten() {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                reporter.info(&format!("removed previous package {}", path.display()));
                removed.push(path);
            }
            Err(e) => reporter.warn(&format!("cannot remove {}: {e}", path.display())),
        }
    }
    removed
}

/// Runs a packaging command to completion and returns its stdout.
///
/// No timeout applies. The child is killed if the returned future is dropped.
///
/// # Errors
///
/// [`Error::CommandFailed`] when the tool cannot be spawned, and
/// [`Error::Subprocess`] with stdout followed by stderr when it exits nonzero.
pub async fn run(command: &PackageCommand) -> Result<String> {
    log::debug!("running {}", command.display());

    let output = tokio::process::Command::new(&command.program)
        .args(&command.args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: command.program.clone(),
            error,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = [stdout.trim_end(), stderr.trim_end()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Err(Error::Subprocess {
        tool: command.program.clone(),
        code: output.status.code(),
        output: combined,
    })
}
